// QOV header parsing and encoding

use serde::Serialize;
use std::io::Cursor;

use crate::error::{QovError, QovResult};
use crate::qov::{FLAG_HAS_INDEX, HEADER_SIZE};
use crate::utils::encoding::decode_ascii_lossy;
use crate::utils::io::{read_array, read_be_u16, read_be_u24, read_be_u32, read_u8, write_be_u24};

/// QOV file header, with every field as stored on disk.
///
/// Values are not interpreted here; see [`crate::validator::validate_header`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub magic: [u8; 4],
    pub version: u8,
    pub flags: u8,
    pub width: u16,
    pub height: u16,
    pub fps_num: u16,
    pub fps_den: u16,
    pub total_frames: u32,
    pub audio_channels: u8,
    /// 24-bit on disk
    pub audio_rate: u32,
    pub colorspace: u8,
    pub reserved: u8,
}

impl Header {
    /// Read the fixed header from the start of `bytes`
    pub fn parse(bytes: &[u8]) -> QovResult<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(QovError::InsufficientData {
                needed: HEADER_SIZE,
                available: bytes.len(),
            });
        }

        let mut reader = Cursor::new(&bytes[..HEADER_SIZE]);
        Self::read_fields(&mut reader).map_err(|_| QovError::InsufficientData {
            needed: HEADER_SIZE,
            available: bytes.len(),
        })
    }

    fn read_fields(reader: &mut Cursor<&[u8]>) -> std::io::Result<Self> {
        Ok(Header {
            magic: read_array(reader)?,
            version: read_u8(reader)?,
            flags: read_u8(reader)?,
            width: read_be_u16(reader)?,
            height: read_be_u16(reader)?,
            fps_num: read_be_u16(reader)?,
            fps_den: read_be_u16(reader)?,
            total_frames: read_be_u32(reader)?,
            audio_channels: read_u8(reader)?,
            audio_rate: read_be_u24(reader)?,
            colorspace: read_u8(reader)?,
            reserved: read_u8(reader)?,
        })
    }

    /// Encode into the on-disk layout. Only the low 24 bits of `audio_rate` are kept.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = Vec::with_capacity(HEADER_SIZE);
        out.extend_from_slice(&self.magic);
        out.push(self.version);
        out.push(self.flags);
        out.extend_from_slice(&self.width.to_be_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&self.fps_num.to_be_bytes());
        out.extend_from_slice(&self.fps_den.to_be_bytes());
        out.extend_from_slice(&self.total_frames.to_be_bytes());
        out.push(self.audio_channels);
        write_be_u24(&mut out, self.audio_rate);
        out.push(self.colorspace);
        out.push(self.reserved);

        let mut bytes = [0u8; HEADER_SIZE];
        bytes.copy_from_slice(&out);
        bytes
    }

    pub fn has_index(&self) -> bool {
        self.flags & FLAG_HAS_INDEX != 0
    }

    /// Magic as text, with non-ASCII bytes dropped
    pub fn magic_text(&self) -> String {
        decode_ascii_lossy(&self.magic)
    }
}

/// Parse the 24-byte header at the start of a buffer
pub fn parse_header(bytes: &[u8]) -> QovResult<Header> {
    Header::parse(bytes)
}
