// Big-endian field readers used by the header and chunk parsers

use std::io::Read;

/// Read a single byte
pub fn read_u8<R: Read>(reader: &mut R) -> std::io::Result<u8> {
    let mut buffer = [0u8; 1];
    reader.read_exact(&mut buffer)?;
    Ok(buffer[0])
}

/// Read big-endian 16-bit integer
pub fn read_be_u16<R: Read>(reader: &mut R) -> std::io::Result<u16> {
    let mut buffer = [0u8; 2];
    reader.read_exact(&mut buffer)?;
    Ok(u16::from_be_bytes(buffer))
}

/// Read big-endian 24-bit integer into the low bits of a u32
pub fn read_be_u24<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 3];
    reader.read_exact(&mut buffer)?;
    Ok(((buffer[0] as u32) << 16) |
       ((buffer[1] as u32) << 8) |
       (buffer[2] as u32))
}

/// Read big-endian 32-bit integer
pub fn read_be_u32<R: Read>(reader: &mut R) -> std::io::Result<u32> {
    let mut buffer = [0u8; 4];
    reader.read_exact(&mut buffer)?;
    Ok(u32::from_be_bytes(buffer))
}

/// Read a fixed-size byte array
pub fn read_array<R: Read, const N: usize>(reader: &mut R) -> std::io::Result<[u8; N]> {
    let mut buffer = [0u8; N];
    reader.read_exact(&mut buffer)?;
    Ok(buffer)
}

/// Append the low 24 bits of `value` in big-endian order
pub fn write_be_u24(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_be_bytes()[1..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_be_readers() {
        let mut cursor = Cursor::new(vec![0x01, 0x02, 0x03, 0xAC, 0x44, 0x00, 0x00, 0x00, 0x2A]);
        assert_eq!(read_be_u16(&mut cursor).unwrap(), 0x0102);
        assert_eq!(read_u8(&mut cursor).unwrap(), 0x03);
        assert_eq!(read_be_u24(&mut cursor).unwrap(), 0xAC4400);
        assert_eq!(read_be_u24(&mut cursor).unwrap(), 0x00002A);
        assert!(read_u8(&mut cursor).is_err());
    }

    #[test]
    fn test_u24_write_drops_high_byte() {
        let mut out = Vec::new();
        write_be_u24(&mut out, 0x12AC_4401);
        assert_eq!(out, vec![0xAC, 0x44, 0x01]);
    }
}
