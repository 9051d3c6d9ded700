//! Length-prefixed modified UTF-8 strings.
//!
//! Stream paths in the lookup map use the compact convention of the
//! documents this format descends from: a big-endian u16 prefix counting
//! encoded bytes, then a modified UTF-8 body. Modified UTF-8 differs from
//! standard UTF-8 in two ways: U+0000 is written as the two-byte sequence
//! `C0 80` (so the body never contains a zero byte), and characters outside
//! the BMP are written as two three-byte encoded UTF-16 surrogates rather
//! than one four-byte sequence.

use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::Error;

/// Number of bytes `s` occupies once encoded, excluding the length prefix.
pub fn encoded_len(s: &str) -> usize {
    s.encode_utf16().map(unit_len).sum()
}

fn unit_len(unit: u16) -> usize {
    match unit {
        0x0001..=0x007F => 1,
        0x0000 | 0x0080..=0x07FF => 2,
        _ => 3,
    }
}

/// Write `s` as a length-prefixed modified UTF-8 string.
///
/// Fails with [`Error::StringTooLong`] if the encoded body does not fit the
/// u16 prefix.
pub fn write_str<W: Write>(writer: &mut W, s: &str) -> Result<(), Error> {
    let len = encoded_len(s);
    if len > u16::MAX as usize {
        return Err(Error::StringTooLong(len));
    }

    let mut body = Vec::with_capacity(len);
    for unit in s.encode_utf16() {
        match unit {
            0x0001..=0x007F => body.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                body.push(0xC0 | (unit >> 6) as u8);
                body.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                body.push(0xE0 | (unit >> 12) as u8);
                body.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                body.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }

    writer.write_u16::<BigEndian>(len as u16)?;
    writer.write_all(&body)?;
    Ok(())
}

/// Read one length-prefixed modified UTF-8 string.
pub fn read_str<R: Read>(reader: &mut R) -> Result<String, Error> {
    let len = reader.read_u16::<BigEndian>()? as usize;
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    decode(&body)
}

/// Decode a modified UTF-8 body into a `String`.
///
/// Group boundaries follow the lead byte's top nibble; anything outside the
/// one-, two-, and three-byte shapes is malformed, as are bad continuation
/// bytes, sequences cut short by the declared length, and unpaired
/// surrogates.
pub fn decode(body: &[u8]) -> Result<String, Error> {
    let mut units: Vec<u16> = Vec::with_capacity(body.len());

    let mut i = 0;
    while i < body.len() {
        let a = body[i];
        match a >> 4 {
            0x0..=0x7 => {
                units.push(u16::from(a));
                i += 1;
            }
            0xC | 0xD => {
                let b = continuation(body, i + 1)?;
                units.push((u16::from(a) & 0x1F) << 6 | b);
                i += 2;
            }
            0xE => {
                let b = continuation(body, i + 1)?;
                let c = continuation(body, i + 2)?;
                units.push((u16::from(a) & 0x0F) << 12 | b << 6 | c);
                i += 3;
            }
            _ => return Err(Error::InvalidMutf8),
        }
    }

    String::from_utf16(&units).map_err(|_| Error::InvalidMutf8)
}

fn continuation(body: &[u8], index: usize) -> Result<u16, Error> {
    let byte = *body.get(index).ok_or(Error::InvalidMutf8)?;
    if byte & 0xC0 != 0x80 {
        return Err(Error::InvalidMutf8);
    }
    Ok(u16::from(byte) & 0x3F)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(s: &str) -> Vec<u8> {
        let mut buf = Vec::new();
        write_str(&mut buf, s).unwrap();
        buf
    }

    #[test]
    fn ascii_path() {
        let bytes = encode("/content/page1.dat");
        assert_eq!(bytes[0..2], [0, 18]);
        assert_eq!(&bytes[2..], b"/content/page1.dat");

        let decoded = read_str(&mut bytes.as_slice()).unwrap();
        assert_eq!(decoded, "/content/page1.dat");
    }

    #[test]
    fn empty_string() {
        let bytes = encode("");
        assert_eq!(bytes, [0, 0]);
        assert_eq!(read_str(&mut bytes.as_slice()).unwrap(), "");
    }

    #[test]
    fn nul_uses_two_bytes() {
        let bytes = encode("\0");
        assert_eq!(bytes, [0, 2, 0xC0, 0x80]);
        assert_eq!(read_str(&mut bytes.as_slice()).unwrap(), "\0");
    }

    #[test]
    fn two_and_three_byte_units() {
        // U+00E9 (2 bytes) and U+4E2D (3 bytes)
        let s = "é中";
        assert_eq!(encoded_len(s), 5);
        let bytes = encode(s);
        assert_eq!(bytes[0..2], [0, 5]);
        assert_eq!(&bytes[2..], [0xC3, 0xA9, 0xE4, 0xB8, 0xAD]);
        assert_eq!(read_str(&mut bytes.as_slice()).unwrap(), s);
    }

    #[test]
    fn supplementary_char_encodes_as_surrogate_pair() {
        // U+1F4C4 becomes two 3-byte encoded surrogates, not 4-byte UTF-8
        let s = "📄";
        assert_eq!(encoded_len(s), 6);
        let bytes = encode(s);
        assert_eq!(bytes[0..2], [0, 6]);
        assert_eq!(&bytes[2..5], [0xED, 0xA0, 0xBD]);
        assert_eq!(read_str(&mut bytes.as_slice()).unwrap(), s);
    }

    #[test]
    fn rejects_invalid_lead_byte() {
        // 0xF0 starts a 4-byte sequence in standard UTF-8; not valid here
        assert!(matches!(decode(&[0xF0, 0x9F, 0x93, 0x84]), Err(Error::InvalidMutf8)));
        assert!(matches!(decode(&[0x80]), Err(Error::InvalidMutf8)));
    }

    #[test]
    fn rejects_truncated_sequence() {
        assert!(matches!(decode(&[0xC3]), Err(Error::InvalidMutf8)));
        assert!(matches!(decode(&[0xE4, 0xB8]), Err(Error::InvalidMutf8)));
    }

    #[test]
    fn rejects_bad_continuation() {
        assert!(matches!(decode(&[0xC3, 0xC3]), Err(Error::InvalidMutf8)));
    }

    #[test]
    fn rejects_unpaired_surrogate() {
        // High surrogate U+D83D with no low surrogate following
        assert!(matches!(decode(&[0xED, 0xA0, 0xBD]), Err(Error::InvalidMutf8)));
    }

    #[test]
    fn read_stops_at_declared_length() {
        let mut bytes = encode("/a");
        bytes.extend_from_slice(b"trailing");
        let mut cursor = bytes.as_slice();
        assert_eq!(read_str(&mut cursor).unwrap(), "/a");
        assert_eq!(cursor, b"trailing");
    }
}
