// QOV chunk records and the chunk walker

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Cursor;

use crate::issue::Issue;
use crate::qov::{CHUNK_HEADER_SIZE, HEADER_SIZE};
use crate::utils::io::{read_be_u32, read_u8};
use crate::validator::validate_chunk;

/// QOV chunk types
///
/// Equality, ordering and hashing all go through the raw type byte, so a
/// hand-built `Unknown(0x00)` is the same type as `Sync`.
#[derive(Debug, Clone, Copy)]
pub enum ChunkType {
    Sync,
    Keyframe,
    PFrame,
    BFrame,
    Audio,
    Index,
    End,
    Unknown(u8),
}

impl ChunkType {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => ChunkType::Sync,
            0x01 => ChunkType::Keyframe,
            0x02 => ChunkType::PFrame,
            0x03 => ChunkType::BFrame,
            0x10 => ChunkType::Audio,
            0xF0 => ChunkType::Index,
            0xFF => ChunkType::End,
            other => ChunkType::Unknown(other),
        }
    }

    pub fn as_byte(&self) -> u8 {
        match self {
            ChunkType::Sync => 0x00,
            ChunkType::Keyframe => 0x01,
            ChunkType::PFrame => 0x02,
            ChunkType::BFrame => 0x03,
            ChunkType::Audio => 0x10,
            ChunkType::Index => 0xF0,
            ChunkType::End => 0xFF,
            ChunkType::Unknown(byte) => *byte,
        }
    }

    /// The named variant for this type's byte, when there is one
    pub fn canonical(self) -> Self {
        ChunkType::from_byte(self.as_byte())
    }

    pub fn is_frame(&self) -> bool {
        matches!(self.canonical(), ChunkType::Keyframe | ChunkType::PFrame)
    }
}

impl From<u8> for ChunkType {
    fn from(byte: u8) -> Self {
        ChunkType::from_byte(byte)
    }
}

impl PartialEq for ChunkType {
    fn eq(&self, other: &Self) -> bool {
        self.as_byte() == other.as_byte()
    }
}

impl Eq for ChunkType {}

impl Hash for ChunkType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_byte().hash(state);
    }
}

// Ordered by the raw type byte so summaries list types in stream-id order
impl Ord for ChunkType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_byte().cmp(&other.as_byte())
    }
}

impl PartialOrd for ChunkType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical() {
            ChunkType::Sync => write!(f, "SYNC"),
            ChunkType::Keyframe => write!(f, "KEYFRAME"),
            ChunkType::PFrame => write!(f, "PFRAME"),
            ChunkType::BFrame => write!(f, "BFRAME"),
            ChunkType::Audio => write!(f, "AUDIO"),
            ChunkType::Index => write!(f, "INDEX"),
            ChunkType::End => write!(f, "END"),
            ChunkType::Unknown(byte) => write!(f, "UNKNOWN(0x{:02x})", byte),
        }
    }
}

impl Serialize for ChunkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One chunk record. The payload itself is never read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub chunk_type: ChunkType,
    pub flags: u8,
    pub size: u32,
    pub timestamp: u32,
    /// Position of the 10-byte chunk header within the file
    pub offset: usize,
}

impl Chunk {
    fn read(bytes: &[u8], offset: usize) -> std::io::Result<Self> {
        let mut reader = Cursor::new(&bytes[offset..offset + CHUNK_HEADER_SIZE]);
        Ok(Chunk {
            chunk_type: ChunkType::from_byte(read_u8(&mut reader)?),
            flags: read_u8(&mut reader)?,
            size: read_be_u32(&mut reader)?,
            timestamp: read_be_u32(&mut reader)?,
            offset,
        })
    }

    /// Offset just past this chunk's payload, where the next record starts
    pub fn end_offset(&self) -> usize {
        self.offset
            .saturating_add(CHUNK_HEADER_SIZE)
            .saturating_add(self.size as usize)
    }
}

/// Why the chunk walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum WalkStop {
    /// Fewer than 10 bytes were left; `trailing` bytes were not walked
    EndOfData { trailing: usize },
    /// The scan limit was reached while more records could still be read
    ScanLimit { limit: usize },
    /// The last chunk declared a payload running past the end of the buffer
    Overrun { next_offset: usize, buffer_len: usize },
}

/// Result of walking the chunk sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkScan {
    pub chunks: Vec<Chunk>,
    pub issues: Vec<Issue>,
    pub stop: WalkStop,
}

impl ChunkScan {
    pub fn truncated(&self) -> bool {
        matches!(self.stop, WalkStop::ScanLimit { .. })
    }
}

/// Walk the chunk records following the header.
///
/// At most `limit` records are produced. Each record is validated as it is
/// read and its issues carry the record's offset. A record whose declared size
/// runs past the buffer ends the walk without raising an issue; the overrun is
/// visible only through [`WalkStop::Overrun`].
pub fn walk_chunks(bytes: &[u8], limit: usize) -> ChunkScan {
    let mut chunks = Vec::new();
    let mut issues = Vec::new();
    let mut pos = HEADER_SIZE;

    while pos <= bytes.len() && bytes.len() - pos >= CHUNK_HEADER_SIZE && chunks.len() < limit {
        let chunk = match Chunk::read(bytes, pos) {
            Ok(chunk) => chunk,
            Err(_) => break,
        };

        tracing::debug!(
            index = chunks.len(),
            offset = chunk.offset,
            chunk_type = %chunk.chunk_type,
            flags = chunk.flags,
            size = chunk.size,
            timestamp = chunk.timestamp,
            "walked chunk"
        );

        issues.extend(
            validate_chunk(chunk.chunk_type, chunk.flags, chunk.size, chunk.timestamp)
                .into_iter()
                .map(|issue| issue.at(chunk.offset)),
        );

        pos = chunk.end_offset();
        chunks.push(chunk);
    }

    let remaining = bytes.len().saturating_sub(pos);
    let stop = if pos > bytes.len() && !chunks.is_empty() {
        WalkStop::Overrun {
            next_offset: pos,
            buffer_len: bytes.len(),
        }
    } else if remaining >= CHUNK_HEADER_SIZE {
        WalkStop::ScanLimit { limit }
    } else {
        WalkStop::EndOfData { trailing: remaining }
    };

    tracing::debug!(chunks = chunks.len(), issues = issues.len(), stop = ?stop, "chunk walk finished");

    ChunkScan { chunks, issues, stop }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;
    use crate::qov::{ContainerBuilder, DEFAULT_CHUNK_SCAN_LIMIT};

    #[test]
    fn test_chunk_type_mapping() {
        for byte in 0..=255u8 {
            assert_eq!(ChunkType::from_byte(byte).as_byte(), byte);
        }
        assert_eq!(ChunkType::from_byte(0x42), ChunkType::Unknown(0x42));
        assert_eq!(ChunkType::Unknown(0x42).to_string(), "UNKNOWN(0x42)");
        assert!(ChunkType::PFrame.is_frame());
        assert!(!ChunkType::BFrame.is_frame());
    }

    #[test]
    fn test_chunk_type_orders_by_byte() {
        let mut types = vec![ChunkType::End, ChunkType::Unknown(0x20), ChunkType::Audio, ChunkType::Sync];
        types.sort();
        assert_eq!(
            types,
            vec![ChunkType::Sync, ChunkType::Audio, ChunkType::Unknown(0x20), ChunkType::End]
        );
    }

    #[test]
    fn test_unknown_with_known_byte_is_same_type() {
        use std::collections::BTreeMap;

        assert_eq!(ChunkType::Unknown(0x00), ChunkType::Sync);
        assert_eq!(ChunkType::Unknown(0x00).cmp(&ChunkType::Sync), Ordering::Equal);
        assert_ne!(ChunkType::Unknown(0x42), ChunkType::Unknown(0x43));
        assert_eq!(ChunkType::Unknown(0x01).to_string(), "KEYFRAME");
        assert!(ChunkType::Unknown(0x02).is_frame());

        let mut counts = BTreeMap::new();
        for chunk_type in [ChunkType::Sync, ChunkType::Unknown(0x00), ChunkType::Unknown(0xFF)] {
            *counts.entry(chunk_type).or_insert(0) += 1;
        }
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[&ChunkType::Sync], 2);
        assert_eq!(counts[&ChunkType::End], 1);
    }

    #[test]
    fn test_walk_records_offsets() {
        let bytes = ContainerBuilder::new()
            .sync(0)
            .chunk(0x01, 0, 0, &[1, 2, 3])
            .end()
            .build();

        let scan = walk_chunks(&bytes, DEFAULT_CHUNK_SCAN_LIMIT);
        let offsets: Vec<usize> = scan.chunks.iter().map(|c| c.offset).collect();
        assert_eq!(offsets, vec![24, 42, 55]);
        assert_eq!(scan.chunks[1].chunk_type, ChunkType::Keyframe);
        assert_eq!(scan.chunks[1].size, 3);
        assert!(scan.issues.is_empty());
        // the 8-byte sentinel is too short for another record
        assert_eq!(scan.stop, WalkStop::EndOfData { trailing: 8 });
    }

    #[test]
    fn test_scan_limit_caps_chunk_list() {
        let mut builder = ContainerBuilder::new();
        for i in 0..25 {
            builder = builder.sync(i);
        }
        let bytes = builder.build();

        let scan = walk_chunks(&bytes, DEFAULT_CHUNK_SCAN_LIMIT);
        assert_eq!(scan.chunks.len(), 20);
        assert!(scan.truncated());
        assert_eq!(scan.stop, WalkStop::ScanLimit { limit: 20 });
        assert!(scan.issues.is_empty());
    }

    #[test]
    fn test_exactly_limit_chunks_is_not_truncated() {
        let mut builder = ContainerBuilder::new();
        for i in 0..20 {
            builder = builder.sync(i);
        }
        let scan = walk_chunks(&builder.build(), 20);
        assert_eq!(scan.chunks.len(), 20);
        assert!(!scan.truncated());
    }

    #[test]
    fn test_oversized_chunk_truncates_silently() {
        let mut bytes = ContainerBuilder::new().sync(0).build_without_end_marker();
        // KEYFRAME header claiming far more payload than exists
        bytes.extend_from_slice(&[0x01, 0x00, 0x00, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        bytes.extend_from_slice(&[0xAB; 16]);

        let scan = walk_chunks(&bytes, DEFAULT_CHUNK_SCAN_LIMIT);
        assert_eq!(scan.chunks.len(), 2);
        assert!(scan.issues.is_empty());
        match scan.stop {
            WalkStop::Overrun { next_offset, buffer_len } => {
                assert_eq!(next_offset, 42 + 10 + 0x0010_0000);
                assert_eq!(buffer_len, bytes.len());
            }
            other => panic!("expected overrun, got {:?}", other),
        }
    }

    #[test]
    fn test_walk_attaches_offsets_to_issues() {
        let bytes = ContainerBuilder::new()
            .sync(0)
            .chunk(0x00, 0x01, 0, &[0; 4])
            .build();

        let scan = walk_chunks(&bytes, DEFAULT_CHUNK_SCAN_LIMIT);
        assert_eq!(scan.issues.len(), 2);
        assert!(scan.issues.iter().all(|issue| issue.offset == Some(42)));
        assert_eq!(
            scan.issues[0].kind,
            IssueKind::ChunkSizeMismatch { chunk_type: ChunkType::Sync, expected: 8, actual: 4 }
        );
    }

    #[test]
    fn test_header_only_buffer_has_no_chunks() {
        let bytes = ContainerBuilder::new().build_without_end_marker();
        let scan = walk_chunks(&bytes, DEFAULT_CHUNK_SCAN_LIMIT);
        assert!(scan.chunks.is_empty());
        assert_eq!(scan.stop, WalkStop::EndOfData { trailing: 0 });
    }
}
