// Output formatting for CLI

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

use crate::cli::{CliResult, OutputFormat};
use qovcheck::utils::encoding::hex_bytes;
use qovcheck::{AnalysisResult, Comparison, Issue, IssueKind, Summary, WalkStop};

const RULE_WIDTH: usize = 50;

/// JSON document for a single file
#[derive(Serialize)]
struct AnalysisDocument<'a> {
    file: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    modified: Option<String>,
    summary: Summary,
    #[serde(flatten)]
    analysis: &'a AnalysisResult,
}

/// JSON document for a comparison
#[derive(Serialize)]
struct ComparisonDocument<'a> {
    label_a: &'a str,
    label_b: &'a str,
    valid_a: bool,
    valid_b: bool,
    passed: bool,
    #[serde(flatten)]
    comparison: &'a Comparison,
}

/// One row of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub file: String,
    pub valid: bool,
    pub issue_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Format and output reports
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output the report for one analysed file
    pub fn output_analysis(
        &self,
        file: &str,
        modified: Option<DateTime<Utc>>,
        result: &AnalysisResult,
        writer: &mut impl Write,
    ) -> CliResult<()> {
        match self.format {
            OutputFormat::Json => {
                let document = AnalysisDocument {
                    file,
                    modified: modified.map(|m| m.to_rfc3339()),
                    summary: result.summary(),
                    analysis: result,
                };
                writeln!(writer, "{}", serde_json::to_string_pretty(&document)?)?;
            }
            OutputFormat::Pretty => self.pretty_analysis(file, modified, result, writer)?,
        }
        Ok(())
    }

    fn pretty_analysis(
        &self,
        file: &str,
        modified: Option<DateTime<Utc>>,
        result: &AnalysisResult,
        writer: &mut impl Write,
    ) -> CliResult<()> {
        writeln!(writer, "=== Analyzing {} ===", file)?;
        writeln!(writer, "File size: {} bytes", result.file_size)?;
        if let Some(modified) = modified {
            writeln!(writer, "Modified: {}", modified.format("%Y-%m-%d %H:%M:%S UTC"))?;
        }

        if let Some(header) = &result.header {
            let issues = &result.issues;
            writeln!(writer, "\n=== Header Analysis ===")?;
            writeln!(writer, "{} Magic: {}", mark(issues, "InvalidMagic"), header.magic_text())?;
            writeln!(writer, "{} Version: 0x{:02x}", mark(issues, "InvalidVersion"), header.version)?;
            writeln!(writer, "✓ Flags: 0x{:02x} (HAS_INDEX={})", header.flags, header.has_index())?;
            writeln!(
                writer,
                "{} Dimensions: {}x{}",
                mark(issues, "InvalidDimensions"),
                header.width,
                header.height
            )?;
            writeln!(
                writer,
                "{} Frame rate: {}/{}",
                mark(issues, "InvalidFrameRate"),
                header.fps_num,
                header.fps_den
            )?;
            writeln!(writer, "  Total frames: {}", header.total_frames)?;
            writeln!(writer, "{} Audio channels: {}", mark(issues, "InvalidAudioChannels"), header.audio_channels)?;
            writeln!(writer, "{} Audio rate: {}", mark(issues, "InvalidAudioRate"), header.audio_rate)?;
            writeln!(writer, "{} Colorspace: 0x{:02x}", mark(issues, "InvalidColorspace"), header.colorspace)?;
            writeln!(writer, "{} Reserved: 0x{:02x}", mark(issues, "InvalidReserved"), header.reserved)?;
        }

        if let Some(stop) = &result.walk_stop {
            writeln!(writer, "\n=== Chunk Analysis ===")?;
            for (index, chunk) in result.chunks.iter().enumerate() {
                writeln!(writer, "Chunk {}: {}", index, chunk.chunk_type)?;
                writeln!(writer, "  Offset: {} (0x{:02X})", chunk.offset, chunk.offset)?;
                writeln!(writer, "  Type: 0x{:02x}", chunk.chunk_type.as_byte())?;
                writeln!(writer, "  Flags: 0x{:02x}", chunk.flags)?;
                writeln!(writer, "  Size: {}", chunk.size)?;
                writeln!(writer, "  Timestamp: {}", chunk.timestamp)?;
            }
            match stop {
                WalkStop::ScanLimit { limit } => writeln!(writer, "... (stopped at {} chunks)", limit)?,
                WalkStop::Overrun { next_offset, buffer_len } => writeln!(
                    writer,
                    "! Last chunk runs past end of file (next record at {}, file is {} bytes)",
                    next_offset, buffer_len
                )?,
                WalkStop::EndOfData { .. } => {}
            }

            writeln!(writer, "\n=== End Marker Check ===")?;
            match end_marker_issue(&result.issues) {
                Some(issue) => writeln!(writer, "✗ {}", issue.kind)?,
                None => writeln!(writer, "✓ Valid end marker: {}", hex_bytes(&qovcheck::qov::END_MARKER))?,
            }
        }

        let summary = result.summary();
        writeln!(writer, "\n{}", "=".repeat(RULE_WIDTH))?;
        if summary.valid {
            writeln!(writer, "✓✓✓ FILE IS VALID ✓✓✓")?;
            writeln!(writer, "Total chunks: {}", summary.total_chunks)?;
            writeln!(writer, "\nChunk summary:")?;
            for (chunk_type, count) in &summary.counts {
                writeln!(writer, "  {}: {}", chunk_type, count)?;
            }
        } else {
            writeln!(writer, "✗✗✗ FILE IS INVALID ✗✗✗")?;
            writeln!(writer, "Found {} issue(s):", summary.issue_count)?;
            for issue in &result.issues {
                writeln!(writer, "  • {}", issue)?;
            }
        }
        Ok(())
    }

    /// Output a comparison between two analysed files
    pub fn output_comparison(
        &self,
        labels: (&str, &str),
        results: (&AnalysisResult, &AnalysisResult),
        comparison: &Comparison,
        passed: bool,
        writer: &mut impl Write,
    ) -> CliResult<()> {
        let (label_a, label_b) = labels;
        let (result_a, result_b) = results;

        if self.format == OutputFormat::Json {
            let document = ComparisonDocument {
                label_a,
                label_b,
                valid_a: result_a.is_valid(),
                valid_b: result_b.is_valid(),
                passed,
                comparison,
            };
            writeln!(writer, "{}", serde_json::to_string_pretty(&document)?)?;
            return Ok(());
        }

        writeln!(writer, "=== Header Comparison ===")?;
        if let (Some(header_a), Some(header_b)) = (&result_a.header, &result_b.header) {
            for field in qovcheck::compare::HeaderField::ALL {
                let value_a = field.value(header_a);
                let value_b = field.value(header_b);
                if value_a == value_b {
                    writeln!(writer, "✓ {}: {}", field, value_a)?;
                } else {
                    writeln!(writer, "✗ {}: {} vs {}", field, value_a, value_b)?;
                }
            }
        }

        writeln!(writer, "\n=== Chunk Comparison ===")?;
        let chunks = &comparison.chunks;
        for index in 0..chunks.compared {
            let chunk_a = &result_a.chunks[index];
            let chunk_b = &result_b.chunks[index];
            writeln!(writer, "\nChunk {}:", index)?;
            for (field, value_a, value_b) in [
                ("Type", chunk_a.chunk_type.as_byte(), chunk_b.chunk_type.as_byte()),
                ("Flags", chunk_a.flags, chunk_b.flags),
            ] {
                if value_a == value_b {
                    writeln!(writer, "  ✓ {}: 0x{:02x}", field, value_a)?;
                } else {
                    writeln!(writer, "  ✗ {}: 0x{:02x} vs 0x{:02x}", field, value_a, value_b)?;
                }
            }
            writeln!(writer, "  {} - Size: {}, Timestamp: {}", label_a, chunk_a.size, chunk_a.timestamp)?;
            writeln!(writer, "  {} - Size: {}, Timestamp: {}", label_b, chunk_b.size, chunk_b.timestamp)?;
        }
        writeln!(writer, "\nChunk count: {} vs {}", chunks.count_a, chunks.count_b)?;

        writeln!(writer, "\n{}", "=".repeat(RULE_WIDTH))?;
        writeln!(writer, "{} valid: {}", label_a, result_a.is_valid())?;
        writeln!(writer, "{} valid: {}", label_b, result_b.is_valid())?;
        if passed {
            writeln!(writer, "✓ Comparison PASSED")?;
        } else {
            let mismatches = comparison.header_diffs.len() + chunks.diffs.len();
            writeln!(writer, "✗ Comparison FAILED ({} mismatch(es))", mismatches)?;
        }
        Ok(())
    }

    /// Output the collected rows of a batch run
    pub fn output_batch(&self, entries: &[BatchEntry], writer: &mut impl Write) -> CliResult<()> {
        match self.format {
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string_pretty(entries)?)?;
            }
            OutputFormat::Pretty => {
                let valid = entries.iter().filter(|e| e.valid).count();
                writeln!(writer, "Completed: {} valid, {} invalid", valid, entries.len() - valid)?;
            }
        }
        Ok(())
    }

    /// Print success message
    pub fn print_success(&self, message: &str) {
        if !self.quiet {
            println!("✓ {}", message);
        }
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            println!("  {}", message);
        }
    }
}

fn mark(issues: &[Issue], name: &str) -> &'static str {
    if issues.iter().any(|issue| issue.name() == name) {
        "✗"
    } else {
        "✓"
    }
}

fn end_marker_issue(issues: &[Issue]) -> Option<&Issue> {
    issues.iter().find(|issue| {
        matches!(
            issue.kind,
            IssueKind::InvalidEndMarker { .. } | IssueKind::MissingEndMarker { .. }
        )
    })
}
