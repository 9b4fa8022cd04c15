// Cross-implementation comparison of two analysed QOV files
//
// Two encoders fed the same input should produce structurally equivalent
// files. Headers must match field for field; the leading chunks must agree on
// type and flags. Sizes and timestamps are allowed to differ.

use serde::Serialize;
use std::fmt;

use crate::error::{QovError, QovResult};
use crate::qov::{Chunk, Header};
use crate::utils::encoding::decode_ascii_lossy;
use crate::AnalysisResult;

/// Number of leading chunk pairs compared
pub const COMPARED_CHUNK_LIMIT: usize = 5;

/// The twelve header fields, in file order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderField {
    Magic,
    Version,
    Flags,
    Width,
    Height,
    FpsNum,
    FpsDen,
    TotalFrames,
    AudioChannels,
    AudioRate,
    Colorspace,
    Reserved,
}

impl HeaderField {
    pub const ALL: [HeaderField; 12] = [
        HeaderField::Magic,
        HeaderField::Version,
        HeaderField::Flags,
        HeaderField::Width,
        HeaderField::Height,
        HeaderField::FpsNum,
        HeaderField::FpsDen,
        HeaderField::TotalFrames,
        HeaderField::AudioChannels,
        HeaderField::AudioRate,
        HeaderField::Colorspace,
        HeaderField::Reserved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeaderField::Magic => "magic",
            HeaderField::Version => "version",
            HeaderField::Flags => "flags",
            HeaderField::Width => "width",
            HeaderField::Height => "height",
            HeaderField::FpsNum => "fps_num",
            HeaderField::FpsDen => "fps_den",
            HeaderField::TotalFrames => "total_frames",
            HeaderField::AudioChannels => "audio_channels",
            HeaderField::AudioRate => "audio_rate",
            HeaderField::Colorspace => "colorspace",
            HeaderField::Reserved => "reserved",
        }
    }

    /// Read this field out of a header
    pub fn value(&self, header: &Header) -> FieldValue {
        match self {
            HeaderField::Magic => FieldValue::Bytes(header.magic),
            HeaderField::Version => FieldValue::Int(header.version as u32),
            HeaderField::Flags => FieldValue::Int(header.flags as u32),
            HeaderField::Width => FieldValue::Int(header.width as u32),
            HeaderField::Height => FieldValue::Int(header.height as u32),
            HeaderField::FpsNum => FieldValue::Int(header.fps_num as u32),
            HeaderField::FpsDen => FieldValue::Int(header.fps_den as u32),
            HeaderField::TotalFrames => FieldValue::Int(header.total_frames),
            HeaderField::AudioChannels => FieldValue::Int(header.audio_channels as u32),
            HeaderField::AudioRate => FieldValue::Int(header.audio_rate),
            HeaderField::Colorspace => FieldValue::Int(header.colorspace as u32),
            HeaderField::Reserved => FieldValue::Int(header.reserved as u32),
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A header field value, widened for comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bytes([u8; 4]),
    Int(u32),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Bytes(bytes) => write!(f, "{:?}", decode_ascii_lossy(bytes)),
            FieldValue::Int(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: HeaderField,
    pub value_a: FieldValue,
    pub value_b: FieldValue,
}

/// Chunk attributes that take part in the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkField {
    Type,
    Flags,
}

impl fmt::Display for ChunkField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkField::Type => write!(f, "type"),
            ChunkField::Flags => write!(f, "flags"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkDiff {
    pub index: usize,
    pub field: ChunkField,
    pub value_a: u8,
    pub value_b: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkComparison {
    pub count_a: usize,
    pub count_b: usize,
    pub count_mismatch: bool,
    /// Number of leading pairs that were compared
    pub compared: usize,
    pub diffs: Vec<ChunkDiff>,
}

/// Full structural comparison of two analyses
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comparison {
    pub header_diffs: Vec<FieldDiff>,
    pub chunks: ChunkComparison,
}

impl Comparison {
    pub fn header_matches(&self) -> bool {
        self.header_diffs.is_empty()
    }

    /// Headers equal and every compared chunk pair agrees.
    ///
    /// A differing chunk count alone does not fail the comparison.
    pub fn passed(&self) -> bool {
        self.header_matches() && self.chunks.diffs.is_empty()
    }
}

/// Field-by-field header comparison, in file order
pub fn diff_headers(a: &Header, b: &Header) -> Vec<FieldDiff> {
    HeaderField::ALL
        .iter()
        .filter_map(|field| {
            let value_a = field.value(a);
            let value_b = field.value(b);
            (value_a != value_b).then_some(FieldDiff {
                field: *field,
                value_a,
                value_b,
            })
        })
        .collect()
}

/// Compare type and flags of the leading chunk pairs
pub fn diff_chunks(a: &[Chunk], b: &[Chunk]) -> ChunkComparison {
    let compared = a.len().min(b.len()).min(COMPARED_CHUNK_LIMIT);
    let mut diffs = Vec::new();

    for (index, (chunk_a, chunk_b)) in a.iter().zip(b.iter()).take(compared).enumerate() {
        let type_a = chunk_a.chunk_type.as_byte();
        let type_b = chunk_b.chunk_type.as_byte();
        if type_a != type_b {
            diffs.push(ChunkDiff {
                index,
                field: ChunkField::Type,
                value_a: type_a,
                value_b: type_b,
            });
        }
        if chunk_a.flags != chunk_b.flags {
            diffs.push(ChunkDiff {
                index,
                field: ChunkField::Flags,
                value_a: chunk_a.flags,
                value_b: chunk_b.flags,
            });
        }
    }

    ChunkComparison {
        count_a: a.len(),
        count_b: b.len(),
        count_mismatch: a.len() != b.len(),
        compared,
        diffs,
    }
}

/// Compare two complete analyses. Both must have a parsed header.
pub fn compare(a: &AnalysisResult, b: &AnalysisResult) -> QovResult<Comparison> {
    let header_a = a.header.as_ref().ok_or_else(|| QovError::MissingHeader { which: "A".to_string() })?;
    let header_b = b.header.as_ref().ok_or_else(|| QovError::MissingHeader { which: "B".to_string() })?;

    Ok(Comparison {
        header_diffs: diff_headers(header_a, header_b),
        chunks: diff_chunks(&a.chunks, &b.chunks),
    })
}
