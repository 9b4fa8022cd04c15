// End sentinel check
//
// The sentinel is the last 8 bytes of the buffer. Where the chunk walk ended,
// and whether an END chunk exists, plays no part in this check.

use crate::issue::{Issue, IssueKind};
use crate::qov::{END_MARKER, END_MARKER_SIZE};

/// Compare the trailing 8 bytes of the buffer against the end sentinel
pub fn check_end_marker(bytes: &[u8]) -> Option<Issue> {
    if bytes.len() < END_MARKER_SIZE {
        return Some(Issue::new(IssueKind::MissingEndMarker { available: bytes.len() }));
    }

    let start = bytes.len() - END_MARKER_SIZE;
    let mut actual = [0u8; END_MARKER_SIZE];
    actual.copy_from_slice(&bytes[start..]);

    if actual == END_MARKER {
        None
    } else {
        Some(
            Issue::new(IssueKind::InvalidEndMarker {
                expected: END_MARKER,
                actual,
            })
            .at(start),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qov::ContainerBuilder;

    #[test]
    fn test_sentinel_alone() {
        assert_eq!(check_end_marker(&END_MARKER), None);
    }

    #[test]
    fn test_too_short() {
        let issue = check_end_marker(&[0, 0, 1]).unwrap();
        assert_eq!(issue.kind, IssueKind::MissingEndMarker { available: 3 });
    }

    #[test]
    fn test_mismatch_carries_actual_bytes() {
        let bytes = [0xAA, 0, 0, 0, 0, 0, 0, 0, 2];
        let issue = check_end_marker(&bytes).unwrap();
        assert_eq!(
            issue.kind,
            IssueKind::InvalidEndMarker {
                expected: END_MARKER,
                actual: [0, 0, 0, 0, 0, 0, 0, 2],
            }
        );
        assert_eq!(issue.offset, Some(1));
    }

    #[test]
    fn test_independent_of_end_chunk() {
        // no END chunk at all, sentinel present
        let bytes = ContainerBuilder::new().sync(0).build();
        assert_eq!(check_end_marker(&bytes), None);

        // END chunk present, sentinel missing
        let bytes = ContainerBuilder::new().sync(0).end().build_without_end_marker();
        assert!(check_end_marker(&bytes).is_some());
    }
}
