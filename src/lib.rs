// qovcheck - QOV container conformance checker
//
// Pipeline: bytes -> header -> chunk walk (validated per chunk) -> end
// sentinel -> summary. Two results can then be diffed with `compare`.

use serde::Serialize;
use std::path::Path;

pub mod compare;
pub mod error;
pub mod issue;
pub mod qov;
pub mod report;
pub mod utils;
pub mod validator;

pub use compare::{compare, diff_chunks, diff_headers, Comparison, COMPARED_CHUNK_LIMIT};
pub use error::{QovError, QovResult};
pub use issue::{Issue, IssueKind};
pub use qov::{
    check_end_marker, parse_header, walk_chunks, Chunk, ChunkScan, ChunkType, ContainerBuilder, Header,
    WalkStop, DEFAULT_CHUNK_SCAN_LIMIT, HEADER_SIZE,
};
pub use report::{summarize, Summary};
pub use validator::{validate_chunk, validate_header};

/// Analysis tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeOptions {
    /// Maximum number of chunk records walked
    pub chunk_scan_limit: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        AnalyzeOptions {
            chunk_scan_limit: DEFAULT_CHUNK_SCAN_LIMIT,
        }
    }
}

/// Everything learned from one buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub file_size: usize,
    /// `None` when the buffer is shorter than the header
    pub header: Option<Header>,
    pub chunks: Vec<Chunk>,
    /// Header issues first, then chunk issues in walk order, then the end marker
    pub issues: Vec<Issue>,
    /// `None` when the chunk walk never ran
    pub walk_stop: Option<WalkStop>,
}

impl AnalysisResult {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn summary(&self) -> Summary {
        summarize(self.header.as_ref(), &self.chunks, &self.issues)
    }

    /// True when the chunk list was cut short by the scan limit
    pub fn chunks_truncated(&self) -> bool {
        matches!(self.walk_stop, Some(WalkStop::ScanLimit { .. }))
    }
}

/// Analyse a buffer with the default options
pub fn analyze(bytes: &[u8]) -> AnalysisResult {
    analyze_with(bytes, &AnalyzeOptions::default())
}

/// Analyse a buffer.
///
/// A buffer too short for the header yields a result with no header and a
/// single `InsufficientData` issue; nothing else is checked. Otherwise every
/// stage runs regardless of what earlier stages found.
pub fn analyze_with(bytes: &[u8], options: &AnalyzeOptions) -> AnalysisResult {
    let header = match parse_header(bytes) {
        Ok(header) => header,
        Err(err) => {
            tracing::debug!(error = %err, "header not parsed");
            return AnalysisResult {
                file_size: bytes.len(),
                header: None,
                chunks: Vec::new(),
                issues: vec![Issue::new(IssueKind::InsufficientData {
                    needed: HEADER_SIZE,
                    available: bytes.len(),
                })],
                walk_stop: None,
            };
        }
    };

    let mut issues = validate_header(&header);

    let scan = walk_chunks(bytes, options.chunk_scan_limit);
    issues.extend(scan.issues);

    issues.extend(check_end_marker(bytes));

    AnalysisResult {
        file_size: bytes.len(),
        header: Some(header),
        chunks: scan.chunks,
        issues,
        walk_stop: Some(scan.stop),
    }
}

/// Read a whole file and analyse it
pub fn analyze_file<P: AsRef<Path>>(path: P, options: &AnalyzeOptions) -> QovResult<AnalysisResult> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| QovError::io(path, e))?;
    tracing::debug!(path = %path.display(), size = bytes.len(), "read input");
    Ok(analyze_with(&bytes, options))
}

/// Analyse two files concurrently
pub fn analyze_pair<P: AsRef<Path> + Sync>(
    path_a: P,
    path_b: P,
    options: &AnalyzeOptions,
) -> (QovResult<AnalysisResult>, QovResult<AnalysisResult>) {
    std::thread::scope(|scope| {
        let handle = scope.spawn(|| analyze_file(&path_b, options));
        let result_a = analyze_file(&path_a, options);
        let result_b = match handle.join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        };
        (result_a, result_b)
    })
}
