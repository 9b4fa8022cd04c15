// Verdict and chunk summary for one analysis

use serde::Serialize;
use std::collections::BTreeMap;

use crate::issue::Issue;
use crate::qov::{Chunk, ChunkType, Header};

/// Aggregated outcome of an analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub valid: bool,
    pub has_header: bool,
    pub total_chunks: usize,
    pub issue_count: usize,
    /// Chunks per type, ordered by type byte
    pub counts: BTreeMap<ChunkType, usize>,
}

/// Aggregate header, chunks and issues into a verdict.
///
/// The verdict depends on the issue list alone.
pub fn summarize(header: Option<&Header>, chunks: &[Chunk], issues: &[Issue]) -> Summary {
    let mut counts = BTreeMap::new();
    for chunk in chunks {
        *counts.entry(chunk.chunk_type).or_insert(0) += 1;
    }

    Summary {
        valid: issues.is_empty(),
        has_header: header.is_some(),
        total_chunks: chunks.len(),
        issue_count: issues.len(),
        counts,
    }
}
