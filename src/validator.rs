// Conformance rules for headers and chunk records
//
// Both entry points are pure: they look at values only and return every issue
// found. No rule short-circuits another.

use crate::issue::{Issue, IssueKind};
use crate::qov::{
    ChunkType, Header, MAX_AUDIO_CHANNELS, MAX_AUDIO_RATE, MAX_FRAME_CHUNK_SIZE, QOV_MAGIC,
    SUPPORTED_VERSIONS, VALID_COLORSPACES,
};

/// Check every header field independently
pub fn validate_header(header: &Header) -> Vec<Issue> {
    let mut issues = Vec::new();

    if &header.magic != QOV_MAGIC {
        issues.push(Issue::new(IssueKind::InvalidMagic {
            expected: *QOV_MAGIC,
            actual: header.magic,
        }));
    }

    if !SUPPORTED_VERSIONS.contains(&header.version) {
        issues.push(Issue::new(IssueKind::InvalidVersion {
            expected: SUPPORTED_VERSIONS,
            actual: header.version,
        }));
    }

    // flags: only HAS_INDEX is defined and no bit is constrained

    if header.width == 0 || header.height == 0 {
        issues.push(Issue::new(IssueKind::InvalidDimensions {
            width: header.width,
            height: header.height,
        }));
    }

    if header.fps_num == 0 || header.fps_den == 0 {
        issues.push(Issue::new(IssueKind::InvalidFrameRate {
            fps_num: header.fps_num,
            fps_den: header.fps_den,
        }));
    }

    if header.audio_channels > MAX_AUDIO_CHANNELS {
        issues.push(Issue::new(IssueKind::InvalidAudioChannels {
            max: MAX_AUDIO_CHANNELS,
            actual: header.audio_channels,
        }));
    }

    if header.audio_rate > MAX_AUDIO_RATE {
        issues.push(Issue::new(IssueKind::InvalidAudioRate {
            max: MAX_AUDIO_RATE,
            actual: header.audio_rate,
        }));
    }

    if !VALID_COLORSPACES.contains(&header.colorspace) {
        issues.push(Issue::new(IssueKind::InvalidColorspace {
            expected: VALID_COLORSPACES,
            actual: header.colorspace,
        }));
    }

    if header.reserved != 0 {
        issues.push(Issue::new(IssueKind::InvalidReserved { actual: header.reserved }));
    }

    issues
}

/// Check one chunk record against the rules for its type.
///
/// BFRAME, AUDIO, INDEX and unknown types carry no constraints. New rules for
/// them belong here as explicit match arms.
pub fn validate_chunk(chunk_type: ChunkType, flags: u8, size: u32, timestamp: u32) -> Vec<Issue> {
    let mut issues = Vec::new();
    let chunk_type = chunk_type.canonical();

    match chunk_type {
        ChunkType::Sync => {
            if size != 8 {
                issues.push(Issue::new(IssueKind::ChunkSizeMismatch { chunk_type, expected: 8, actual: size }));
            }
            if flags != 0 {
                issues.push(Issue::new(IssueKind::ChunkFlagsMismatch { chunk_type, expected: 0, actual: flags }));
            }
        }
        ChunkType::End => {
            if size != 0 {
                issues.push(Issue::new(IssueKind::ChunkSizeMismatch { chunk_type, expected: 0, actual: size }));
            }
            if flags != 0 {
                issues.push(Issue::new(IssueKind::ChunkFlagsMismatch { chunk_type, expected: 0, actual: flags }));
            }
            if timestamp != 0 {
                issues.push(Issue::new(IssueKind::ChunkTimestampMismatch {
                    chunk_type,
                    expected: 0,
                    actual: timestamp,
                }));
            }
        }
        ChunkType::Keyframe | ChunkType::PFrame => {
            if size == 0 || size > MAX_FRAME_CHUNK_SIZE {
                issues.push(Issue::new(IssueKind::InvalidFrameChunkSize {
                    chunk_type,
                    max: MAX_FRAME_CHUNK_SIZE,
                    actual: size,
                }));
            }
        }
        ChunkType::BFrame | ChunkType::Audio | ChunkType::Index | ChunkType::Unknown(_) => {}
    }

    issues
}
