// QOV container support
//
// QOV File Structure (all multi-byte integers big-endian):
// - Header (24 bytes)
//   - Magic: "qovf" (4 bytes)
//   - Version (1 byte), Flags (1 byte, bit 2 = HAS_INDEX)
//   - Width, Height (2 bytes each)
//   - Frame rate numerator, denominator (2 bytes each)
//   - Total frames (4 bytes)
//   - Audio channels (1 byte), Audio rate (3 bytes)
//   - Colorspace (1 byte), Reserved (1 byte, must be 0)
// - Chunk records, repeated
//   - Type (1 byte), Flags (1 byte), Size (4 bytes), Timestamp (4 bytes)
//   - Payload (Size bytes, opaque)
// - End sentinel: the final 8 bytes of the file, 00 00 00 00 00 00 00 01

pub mod builder;
pub mod chunk;
pub mod end_marker;
pub mod header;

pub use builder::ContainerBuilder;
pub use chunk::{walk_chunks, Chunk, ChunkScan, ChunkType, WalkStop};
pub use end_marker::check_end_marker;
pub use header::{parse_header, Header};

// QOV signature
pub const QOV_MAGIC: &[u8; 4] = b"qovf";

pub const HEADER_SIZE: usize = 24;
pub const CHUNK_HEADER_SIZE: usize = 10;

/// Header flag: an INDEX chunk is present in the stream
pub const FLAG_HAS_INDEX: u8 = 0x04;

pub const SUPPORTED_VERSIONS: [u8; 2] = [0x01, 0x02];

/// Colorspace tags a conforming header may carry
pub const VALID_COLORSPACES: [u8; 8] = [0x00, 0x01, 0x02, 0x03, 0x10, 0x11, 0x12, 0x13];

pub const MAX_AUDIO_CHANNELS: u8 = 8;
pub const MAX_AUDIO_RATE: u32 = 0xFF_FFFF;

/// Largest payload a KEYFRAME or PFRAME chunk may declare
pub const MAX_FRAME_CHUNK_SIZE: u32 = 0xFF_FFFF;

pub const END_MARKER: [u8; 8] = [0, 0, 0, 0, 0, 0, 0, 1];
pub const END_MARKER_SIZE: usize = END_MARKER.len();

/// Number of chunk records walked before the scan stops
pub const DEFAULT_CHUNK_SCAN_LIMIT: usize = 20;
