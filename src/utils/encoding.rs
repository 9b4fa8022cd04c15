// Text decoding helpers

/// Decode a fixed tag permissively as ASCII.
///
/// Bytes at or above 0x80 are dropped instead of failing. ASCII control
/// bytes, NUL included, are kept as they are.
pub fn decode_ascii_lossy(data: &[u8]) -> String {
    data.iter().filter(|b| b.is_ascii()).map(|&b| char::from(b)).collect()
}

/// Render bytes as space separated lowercase hex pairs
pub fn hex_bytes(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii_lossy() {
        assert_eq!(decode_ascii_lossy(b"qovf"), "qovf");
        assert_eq!(decode_ascii_lossy(&[b'q', 0xFF, b'o', 0x80]), "qo");
        assert_eq!(decode_ascii_lossy(&[0, 0, 0, 0]), "\0\0\0\0");
        assert_eq!(decode_ascii_lossy(&[b'q', 0x07, 0xC3, b'f']), "q\u{7}f");
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(hex_bytes(&[0, 0, 0x0a, 0xff]), "00 00 0a ff");
        assert_eq!(hex_bytes(&[]), "");
    }
}
