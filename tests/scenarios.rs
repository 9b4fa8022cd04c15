// End-to-end scenarios over files on disk

use std::io::Write;

use qovcheck::{
    analyze_file, analyze_pair, compare, AnalyzeOptions, ChunkType, ContainerBuilder, IssueKind, QovError,
};

fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn minimal_valid_file() {
    let file = write_temp(&ContainerBuilder::new().build());
    let result = analyze_file(file.path(), &AnalyzeOptions::default()).unwrap();

    assert_eq!(result.file_size, 32);
    assert!(result.chunks.is_empty());
    assert!(result.issues.is_empty());
    assert!(result.summary().valid);
}

#[test]
fn invalid_reserved_byte() {
    let file = write_temp(&ContainerBuilder::new().header(|h| h.reserved = 0x05).build());
    let result = analyze_file(file.path(), &AnalyzeOptions::default()).unwrap();

    assert_eq!(result.issues.len(), 1);
    assert_eq!(result.issues[0].kind, IssueKind::InvalidReserved { actual: 0x05 });
    assert!(!result.summary().valid);
}

#[test]
fn malformed_sync_chunk() {
    let file = write_temp(&ContainerBuilder::new().chunk(0x00, 0x01, 0, &[0; 4]).build());
    let result = analyze_file(file.path(), &AnalyzeOptions::default()).unwrap();

    assert_eq!(
        result.issues.iter().map(|i| &i.kind).collect::<Vec<_>>(),
        vec![
            &IssueKind::ChunkSizeMismatch { chunk_type: ChunkType::Sync, expected: 8, actual: 4 },
            &IssueKind::ChunkFlagsMismatch { chunk_type: ChunkType::Sync, expected: 0, actual: 1 },
        ]
    );
    assert!(result.issues.iter().all(|i| i.offset == Some(24)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyze_file(dir.path().join("absent.qov"), &AnalyzeOptions::default()).unwrap_err();
    assert!(matches!(err, QovError::Io { .. }));
}

#[test]
fn pair_of_encoder_outputs() {
    let reference = ContainerBuilder::new()
        .sync(0)
        .chunk(0x01, 0x00, 0, &[1; 64])
        .chunk(0x02, 0x00, 33, &[2; 12])
        .end();
    // a second encoder compresses differently: sizes and timestamps move
    let other = ContainerBuilder::new()
        .sync(0)
        .chunk(0x01, 0x00, 0, &[1; 80])
        .chunk(0x02, 0x00, 34, &[2; 9])
        .end();

    let file_a = write_temp(&reference.build());
    let file_b = write_temp(&other.build());

    let (a, b) = analyze_pair(file_a.path(), file_b.path(), &AnalyzeOptions::default());
    let (a, b) = (a.unwrap(), b.unwrap());
    let comparison = compare(&a, &b).unwrap();
    assert!(comparison.header_matches());
    assert!(comparison.chunks.diffs.is_empty());
    assert!(comparison.passed());
}

#[test]
fn pair_with_differing_frame_types() {
    let file_a = write_temp(&ContainerBuilder::new().sync(0).chunk(0x01, 0, 0, &[1]).build());
    let file_b = write_temp(
        &ContainerBuilder::new()
            .header(|h| h.total_frames = 11)
            .sync(0)
            .chunk(0x02, 0, 0, &[1])
            .build(),
    );

    let (a, b) = analyze_pair(file_a.path(), file_b.path(), &AnalyzeOptions::default());
    let comparison = compare(&a.unwrap(), &b.unwrap()).unwrap();
    assert_eq!(comparison.header_diffs.len(), 1);
    assert_eq!(comparison.chunks.diffs.len(), 1);
    assert_eq!(comparison.chunks.diffs[0].index, 1);
    assert!(!comparison.passed());
}
