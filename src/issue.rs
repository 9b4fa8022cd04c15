// Validation issues
//
// Every conformance problem found during an analysis is an Issue. Issues are
// plain data: they never abort the analysis and are only ever appended.

use serde::Serialize;
use std::fmt;

use crate::qov::ChunkType;
use crate::utils::encoding::{decode_ascii_lossy, hex_bytes};

/// What went wrong, with the offending values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum IssueKind {
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },
    InvalidVersion { expected: [u8; 2], actual: u8 },
    InvalidDimensions { width: u16, height: u16 },
    InvalidFrameRate { fps_num: u16, fps_den: u16 },
    InvalidAudioChannels { max: u8, actual: u8 },
    InvalidAudioRate { max: u32, actual: u32 },
    InvalidColorspace { expected: [u8; 8], actual: u8 },
    InvalidReserved { actual: u8 },
    ChunkSizeMismatch { chunk_type: ChunkType, expected: u32, actual: u32 },
    ChunkFlagsMismatch { chunk_type: ChunkType, expected: u8, actual: u8 },
    ChunkTimestampMismatch { chunk_type: ChunkType, expected: u32, actual: u32 },
    InvalidFrameChunkSize { chunk_type: ChunkType, max: u32, actual: u32 },
    MissingEndMarker { available: usize },
    InvalidEndMarker { expected: [u8; 8], actual: [u8; 8] },
    InsufficientData { needed: usize, available: usize },
}

/// A single validation issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    #[serde(flatten)]
    pub kind: IssueKind,
    /// Byte offset of the record the issue belongs to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Issue {
    pub fn new(kind: IssueKind) -> Self {
        Issue { kind, offset: None }
    }

    /// Attach the byte offset of the offending record
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Stable variant name, e.g. "ChunkSizeMismatch"
    pub fn name(&self) -> &'static str {
        match self.kind {
            IssueKind::InvalidMagic { .. } => "InvalidMagic",
            IssueKind::InvalidVersion { .. } => "InvalidVersion",
            IssueKind::InvalidDimensions { .. } => "InvalidDimensions",
            IssueKind::InvalidFrameRate { .. } => "InvalidFrameRate",
            IssueKind::InvalidAudioChannels { .. } => "InvalidAudioChannels",
            IssueKind::InvalidAudioRate { .. } => "InvalidAudioRate",
            IssueKind::InvalidColorspace { .. } => "InvalidColorspace",
            IssueKind::InvalidReserved { .. } => "InvalidReserved",
            IssueKind::ChunkSizeMismatch { .. } => "ChunkSizeMismatch",
            IssueKind::ChunkFlagsMismatch { .. } => "ChunkFlagsMismatch",
            IssueKind::ChunkTimestampMismatch { .. } => "ChunkTimestampMismatch",
            IssueKind::InvalidFrameChunkSize { .. } => "InvalidFrameChunkSize",
            IssueKind::MissingEndMarker { .. } => "MissingEndMarker",
            IssueKind::InvalidEndMarker { .. } => "InvalidEndMarker",
            IssueKind::InsufficientData { .. } => "InsufficientData",
        }
    }
}

impl From<IssueKind> for Issue {
    fn from(kind: IssueKind) -> Self {
        Issue::new(kind)
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::InvalidMagic { actual, .. } => {
                write!(f, "Invalid magic bytes: {:?} ({})", decode_ascii_lossy(actual), hex_bytes(actual))
            }
            IssueKind::InvalidVersion { expected, actual } => {
                write!(f, "Invalid version: 0x{:02x} (expected one of {})", actual, hex_bytes(expected))
            }
            IssueKind::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions: {}x{}", width, height)
            }
            IssueKind::InvalidFrameRate { fps_num, fps_den } => {
                write!(f, "Invalid frame rate: {}/{}", fps_num, fps_den)
            }
            IssueKind::InvalidAudioChannels { max, actual } => {
                write!(f, "Invalid audio_channels: {} (must be 0-{})", actual, max)
            }
            IssueKind::InvalidAudioRate { max, actual } => {
                write!(f, "Invalid audio_rate: {} (must be 0-{})", actual, max)
            }
            IssueKind::InvalidColorspace { expected, actual } => {
                write!(f, "Invalid colorspace: 0x{:02x} (expected one of {})", actual, hex_bytes(expected))
            }
            IssueKind::InvalidReserved { actual } => write!(f, "Invalid reserved byte: 0x{:02x}", actual),
            IssueKind::ChunkSizeMismatch { chunk_type, expected, actual } => {
                write!(f, "{} chunk should have size {}, got {}", chunk_type, expected, actual)
            }
            IssueKind::ChunkFlagsMismatch { chunk_type, expected, actual } => {
                write!(f, "{} chunk flags should be 0x{:02x}, got 0x{:02x}", chunk_type, expected, actual)
            }
            IssueKind::ChunkTimestampMismatch { chunk_type, expected, actual } => {
                write!(f, "{} chunk timestamp should be {}, got {}", chunk_type, expected, actual)
            }
            IssueKind::InvalidFrameChunkSize { chunk_type, max, actual } => {
                write!(f, "Invalid {} chunk size: {} (must be 1-{})", chunk_type, actual, max)
            }
            IssueKind::MissingEndMarker { available } => {
                write!(f, "File too small for end marker ({} bytes)", available)
            }
            IssueKind::InvalidEndMarker { expected, actual } => {
                write!(f, "Invalid end marker: {} (expected {})", hex_bytes(actual), hex_bytes(expected))
            }
            IssueKind::InsufficientData { needed, available } => {
                write!(f, "File too small: {} bytes (need at least {})", available, needed)
            }
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} (at offset {})", self.kind, offset),
            None => write!(f, "{}", self.kind),
        }
    }
}
