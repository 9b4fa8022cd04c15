// CLI configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use qovcheck::DEFAULT_CHUNK_SCAN_LIMIT;

/// qovcheck - QOV container conformance tool
#[derive(Parser, Debug)]
#[command(name = "qovcheck")]
#[command(about = "Validate QOV video container files and compare encoder outputs", long_about = None)]
#[command(version)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Quiet mode (suppress progress messages)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (log every walked chunk to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable report
    #[default]
    Pretty,
    /// JSON document
    Json,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a single QOV file
    Check {
        /// QOV file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum number of chunks to walk
        #[arg(long, default_value_t = DEFAULT_CHUNK_SCAN_LIMIT)]
        max_chunks: usize,
    },

    /// Compare two QOV files produced by different encoders
    Compare {
        /// First file
        #[arg(value_name = "FILE_A")]
        file_a: PathBuf,

        /// Second file
        #[arg(value_name = "FILE_B")]
        file_b: PathBuf,

        /// Display name for the first file
        #[arg(long, default_value = "A")]
        label_a: String,

        /// Display name for the second file
        #[arg(long, default_value = "B")]
        label_b: String,

        /// Maximum number of chunks to walk in each file
        #[arg(long, default_value_t = DEFAULT_CHUNK_SCAN_LIMIT)]
        max_chunks: usize,

        /// Also fail when either file is not valid on its own
        #[arg(long)]
        require_valid: bool,
    },

    /// Validate every matching file in a directory
    Batch {
        /// Directory path
        #[arg(short, long)]
        directory: PathBuf,

        /// File pattern; a plain file name is searched for in subdirectories too
        #[arg(short, long, default_value = "*.qov")]
        pattern: String,
    },

    /// Write a small conformant reference file
    Sample {
        /// Output path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Number of frame chunks to write
        #[arg(long, default_value_t = 10)]
        frames: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_defaults() {
        let config = Config::try_parse_from(["qovcheck", "check", "video.qov"]).unwrap();
        assert_eq!(config.format, OutputFormat::Pretty);
        match config.command {
            Commands::Check { file, max_chunks } => {
                assert_eq!(file, PathBuf::from("video.qov"));
                assert_eq!(max_chunks, 20);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let config =
            Config::try_parse_from(["qovcheck", "compare", "a.qov", "b.qov", "--label-a", "csharp", "-f", "json", "-q"])
                .unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.quiet);
        match config.command {
            Commands::Compare { label_a, label_b, require_valid, .. } => {
                assert_eq!(label_a, "csharp");
                assert_eq!(label_b, "B");
                assert!(!require_valid);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_check_requires_file() {
        assert!(Config::try_parse_from(["qovcheck", "check"]).is_err());
    }
}
