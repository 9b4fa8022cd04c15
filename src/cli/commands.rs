// CLI command implementations
//
// Each command returns whether it passed; main turns that into the exit code.

use chrono::{DateTime, Utc};
use std::io::{self, Write};
use std::path::Path;

use crate::cli::output::BatchEntry;
use crate::cli::{CliError, CliResult, OutputFormatter};
use qovcheck::{analyze_file, analyze_pair, compare, AnalyzeOptions, ContainerBuilder, QovError};

fn modified_time(path: &Path) -> Option<DateTime<Utc>> {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .map(DateTime::<Utc>::from)
}

/// Validate a single file
pub fn command_check(file: &Path, max_chunks: usize, formatter: &OutputFormatter) -> CliResult<bool> {
    let options = AnalyzeOptions {
        chunk_scan_limit: max_chunks,
    };
    let result = analyze_file(file, &options)?;

    let mut stdout = io::stdout().lock();
    formatter.output_analysis(&file.display().to_string(), modified_time(file), &result, &mut stdout)?;
    stdout.flush()?;

    Ok(result.is_valid())
}

/// Analyse two files and compare their structure
pub fn command_compare(
    files: (&Path, &Path),
    labels: (&str, &str),
    max_chunks: usize,
    require_valid: bool,
    formatter: &OutputFormatter,
) -> CliResult<bool> {
    let options = AnalyzeOptions {
        chunk_scan_limit: max_chunks,
    };
    let (result_a, result_b) = analyze_pair(files.0, files.1, &options);
    let result_a = result_a?;
    let result_b = result_b?;

    let comparison = compare(&result_a, &result_b).map_err(|e| match e {
        QovError::MissingHeader { which } => QovError::MissingHeader {
            which: if which == "A" { labels.0.to_string() } else { labels.1.to_string() },
        },
        other => other,
    })?;

    let mut passed = comparison.passed();
    if require_valid && !(result_a.is_valid() && result_b.is_valid()) {
        passed = false;
    }

    let mut stdout = io::stdout().lock();
    formatter.output_comparison(labels, (&result_a, &result_b), &comparison, passed, &mut stdout)?;
    stdout.flush()?;

    Ok(passed)
}

/// Validate every file in `directory` matching `pattern`.
///
/// A pattern without wildcards is a file name searched for recursively.
pub fn command_batch(directory: &Path, pattern: &str, formatter: &OutputFormatter) -> CliResult<bool> {
    use glob::glob;

    let glob_pattern = if pattern.contains('*') || pattern.contains('?') {
        format!("{}/{}", directory.display(), pattern)
    } else {
        format!("{}/**/{}", directory.display(), pattern)
    };

    let mut files = Vec::new();
    for entry in glob(&glob_pattern)? {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    files.push(path);
                }
            }
            Err(e) => {
                formatter.print_error(&format!("Error reading path: {}", e));
            }
        }
    }

    if files.is_empty() {
        formatter.print_info("No files found matching pattern");
        return Ok(true);
    }

    formatter.print_info(&format!("Processing {} files...", files.len()));

    let options = AnalyzeOptions::default();
    let mut entries = Vec::with_capacity(files.len());
    for path in &files {
        let name = path.display().to_string();
        let entry = match analyze_file(path, &options) {
            Ok(result) => {
                if result.is_valid() {
                    formatter.print_success(&name);
                } else {
                    formatter.print_error(&format!("{}: {} issue(s)", name, result.issues.len()));
                }
                BatchEntry {
                    file: name,
                    valid: result.is_valid(),
                    issue_count: result.issues.len(),
                    error: None,
                }
            }
            Err(e) => {
                formatter.print_error(&format!("{}: {}", name, e));
                BatchEntry {
                    file: name,
                    valid: false,
                    issue_count: 0,
                    error: Some(e.to_string()),
                }
            }
        };
        entries.push(entry);
    }

    let mut stdout = io::stdout().lock();
    formatter.output_batch(&entries, &mut stdout)?;
    stdout.flush()?;

    Ok(entries.iter().all(|e| e.valid))
}

const SAMPLE_FPS: u32 = 30;

/// Largest frame count whose last timestamp still fits in 32 bits
pub const MAX_SAMPLE_FRAMES: u32 = 128_849_019;

/// Millisecond timestamp of `frame` at the sample frame rate
fn frame_timestamp(frame: u32) -> Option<u32> {
    u32::try_from(u64::from(frame) * 1000 / u64::from(SAMPLE_FPS)).ok()
}

/// Build the reference file written by `sample`
pub fn sample_container(frames: u32) -> CliResult<ContainerBuilder> {
    if let Some(last) = frames.checked_sub(1) {
        frame_timestamp(last).ok_or(CliError::TooManyFrames {
            frames,
            max: MAX_SAMPLE_FRAMES,
        })?;
    }

    let mut builder = ContainerBuilder::new().header(|h| {
        h.total_frames = frames;
        h.audio_channels = 0;
        h.audio_rate = 0;
    });

    builder = builder.sync(0);
    for frame in 0..frames {
        let timestamp = frame_timestamp(frame).ok_or(CliError::TooManyFrames {
            frames,
            max: MAX_SAMPLE_FRAMES,
        })?;
        let chunk_type = if frame == 0 { 0x01 } else { 0x02 };
        let payload = [(frame & 0xFF) as u8; 16];
        builder = builder.chunk(chunk_type, 0x00, timestamp, &payload);
    }
    Ok(builder.end())
}

/// Write a conformant reference file
pub fn command_sample(output: &Path, frames: u32, formatter: &OutputFormatter) -> CliResult<bool> {
    let bytes = sample_container(frames)?.build();
    std::fs::write(output, &bytes).map_err(|e| CliError::Qov(QovError::io(output, e)))?;
    formatter.print_success(&format!("Wrote {} ({} bytes, {} frames)", output.display(), bytes.len(), frames));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qovcheck::{analyze_with, ChunkType};

    #[test]
    fn test_sample_container_is_valid() {
        let bytes = sample_container(10).unwrap().build();
        let result = analyze_with(&bytes, &AnalyzeOptions { chunk_scan_limit: 100 });
        assert!(result.is_valid(), "{:?}", result.issues);
        assert_eq!(result.chunks.len(), 12);
        assert_eq!(result.chunks[1].chunk_type, ChunkType::Keyframe);
        assert_eq!(result.chunks[11].chunk_type, ChunkType::End);
        assert_eq!(result.header.unwrap().total_frames, 10);
    }

    #[test]
    fn test_sample_and_check_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.qov");
        let formatter = OutputFormatter::new(crate::cli::OutputFormat::Json, true);

        assert!(command_sample(&path, 3, &formatter).unwrap());
        assert!(command_check(&path, 20, &formatter).unwrap());
        assert!(command_batch(dir.path(), "*.qov", &formatter).unwrap());
        assert!(command_compare((path.as_path(), path.as_path()), ("A", "B"), 20, true, &formatter).unwrap());
    }

    #[test]
    fn test_frame_timestamp_boundary() {
        assert_eq!(frame_timestamp(0), Some(0));
        assert_eq!(frame_timestamp(3), Some(100));
        assert_eq!(frame_timestamp(4_294_970), Some(143_165_666));
        assert_eq!(frame_timestamp(MAX_SAMPLE_FRAMES - 1), Some(4_294_967_266));
        assert_eq!(frame_timestamp(MAX_SAMPLE_FRAMES), None);
        assert_eq!(frame_timestamp(u32::MAX), None);
    }

    #[test]
    fn test_sample_rejects_too_many_frames() {
        for frames in [MAX_SAMPLE_FRAMES + 1, u32::MAX] {
            match sample_container(frames) {
                Err(CliError::TooManyFrames { frames: got, max }) => {
                    assert_eq!(got, frames);
                    assert_eq!(max, MAX_SAMPLE_FRAMES);
                }
                other => panic!("expected TooManyFrames for {}, got {:?}", frames, other.map(|_| ())),
            }
        }
    }

    #[test]
    fn test_sample_zero_frames() {
        let bytes = sample_container(0).unwrap().build();
        let result = analyze_with(&bytes, &AnalyzeOptions::default());
        assert!(result.is_valid(), "{:?}", result.issues);
        assert_eq!(result.chunks.len(), 2);
    }

    #[test]
    fn test_batch_plain_name_searches_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("encoder_a").join("run1");
        std::fs::create_dir_all(&nested).unwrap();
        let bytes = sample_container(2).unwrap().build();
        std::fs::write(nested.join("ref.qov"), &bytes).unwrap();
        std::fs::write(dir.path().join("broken.qov"), &bytes[..10]).unwrap();

        let formatter = OutputFormatter::new(crate::cli::OutputFormat::Json, true);
        // Wildcard patterns stay at the top level and only see the broken file
        assert!(!command_batch(dir.path(), "*.qov", &formatter).unwrap());
        // A plain name is found in nested directories
        assert!(command_batch(dir.path(), "ref.qov", &formatter).unwrap());
    }

    #[test]
    fn test_check_missing_file_is_error() {
        let formatter = OutputFormatter::new(crate::cli::OutputFormat::Json, true);
        let err = command_check(Path::new("/nonexistent/missing.qov"), 20, &formatter).unwrap_err();
        assert!(matches!(err, CliError::Qov(QovError::Io { .. })));
    }
}
