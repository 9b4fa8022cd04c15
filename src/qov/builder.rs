// QOV container writer
//
// Produces byte-exact QOV buffers from header values and chunk records. Used
// to emit reference files and to build fixtures.

use crate::qov::{Header, END_MARKER, HEADER_SIZE, QOV_MAGIC};

/// Builder for an in-memory QOV container
#[derive(Debug, Clone)]
pub struct ContainerBuilder {
    header: Header,
    body: Vec<u8>,
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    /// Start from a minimal conformant header: 100x50 at 30/1, 10 frames,
    /// stereo 44100 Hz audio, colorspace 0
    pub fn new() -> Self {
        ContainerBuilder {
            header: Header {
                magic: *QOV_MAGIC,
                version: 0x01,
                flags: 0x00,
                width: 100,
                height: 50,
                fps_num: 30,
                fps_den: 1,
                total_frames: 10,
                audio_channels: 2,
                audio_rate: 44_100,
                colorspace: 0x00,
                reserved: 0x00,
            },
            body: Vec::new(),
        }
    }

    pub fn with_header(header: Header) -> Self {
        ContainerBuilder {
            header,
            body: Vec::new(),
        }
    }

    /// Adjust header fields in place
    pub fn header(mut self, edit: impl FnOnce(&mut Header)) -> Self {
        edit(&mut self.header);
        self
    }

    /// Append a chunk record with an explicit type byte and payload
    pub fn chunk(mut self, chunk_type: u8, flags: u8, timestamp: u32, payload: &[u8]) -> Self {
        self.body.push(chunk_type);
        self.body.push(flags);
        self.body.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        self.body.extend_from_slice(&timestamp.to_be_bytes());
        self.body.extend_from_slice(payload);
        self
    }

    /// Append a well-formed SYNC chunk (8-byte payload, no flags)
    pub fn sync(self, timestamp: u32) -> Self {
        self.chunk(0x00, 0x00, timestamp, &[0u8; 8])
    }

    /// Append a well-formed END chunk
    pub fn end(self) -> Self {
        self.chunk(0xFF, 0x00, 0, &[])
    }

    /// Append raw bytes after the current records
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(bytes);
        self
    }

    /// Header, records, then the 8-byte end sentinel
    pub fn build(&self) -> Vec<u8> {
        let mut out = self.build_without_end_marker();
        out.extend_from_slice(&END_MARKER);
        out
    }

    pub fn build_without_end_marker(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.body.len() + END_MARKER.len());
        out.extend_from_slice(&self.header.to_bytes());
        out.extend_from_slice(&self.body);
        out
    }
}
