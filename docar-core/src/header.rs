use byteorder::{BigEndian, ByteOrder};

use crate::{Error, HEADER_SIZE};

/// Container header (16 bytes).
///
/// Both fields are written as big-endian signed 64-bit integers. The writer
/// emits a zeroed header first and backpatches the real values once the
/// lookup map and stream section have been laid out, so a crashed pack run
/// leaves an obviously invalid header behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Byte offset where the stream data section begins.
    pub stream_offset: i64,
    /// Number of entry records in the lookup map.
    pub entry_count: i64,
}

impl Header {
    pub fn new(stream_offset: i64, entry_count: i64) -> Header {
        Header {
            stream_offset,
            entry_count,
        }
    }

    /// Serialize the header to its on-disk form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        BigEndian::write_i64(&mut bytes[0..8], self.stream_offset);
        BigEndian::write_i64(&mut bytes[8..16], self.entry_count);
        bytes
    }

    /// Parse a header from its on-disk form.
    ///
    /// Parsing cannot fail; use [`Header::validate`] to check the fields
    /// against the actual container size.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Header {
        Header {
            stream_offset: BigEndian::read_i64(&bytes[0..8]),
            entry_count: BigEndian::read_i64(&bytes[8..16]),
        }
    }

    /// Check the header against the container's actual byte length.
    ///
    /// The stream section must start at or after the end of the header and
    /// must not point past the end of the file; a file shorter than the
    /// declared stream offset is a truncated container.
    pub fn validate(&self, container_len: u64) -> Result<(), Error> {
        if self.stream_offset < HEADER_SIZE as i64 {
            return Err(Error::StreamOffsetOutOfBounds {
                offset: self.stream_offset,
                len: container_len,
            });
        }
        if self.stream_offset as u64 > container_len {
            return Err(Error::Truncated {
                needed: self.stream_offset as u64,
                len: container_len,
            });
        }
        if self.entry_count < 0 {
            return Err(Error::InvalidEntryCount(self.entry_count));
        }
        Ok(())
    }

    /// Length of the stream data section implied by `container_len`.
    ///
    /// Only meaningful after [`Header::validate`] has passed.
    pub fn stream_len(&self, container_len: u64) -> u64 {
        container_len.saturating_sub(self.stream_offset as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_roundtrip() {
        let header = Header::new(0x1234, 7);
        let parsed = Header::from_bytes(&header.to_bytes());
        assert_eq!(header, parsed);
    }

    #[test]
    fn header_layout_is_big_endian() {
        let bytes = Header::new(16, 2).to_bytes();
        assert_eq!(
            bytes,
            [0, 0, 0, 0, 0, 0, 0, 16, 0, 0, 0, 0, 0, 0, 0, 2]
        );
    }

    #[test]
    fn validate_accepts_empty_container() {
        // A pack of an empty tree: header only, no entries, no streams
        let header = Header::new(HEADER_SIZE as i64, 0);
        assert!(header.validate(HEADER_SIZE as u64).is_ok());
        assert_eq!(header.stream_len(HEADER_SIZE as u64), 0);
    }

    #[test]
    fn validate_rejects_offset_inside_header() {
        let header = Header::new(8, 0);
        assert!(matches!(
            header.validate(100),
            Err(Error::StreamOffsetOutOfBounds { offset: 8, .. })
        ));
    }

    #[test]
    fn validate_rejects_truncated_container() {
        let header = Header::new(4096, 1);
        assert!(matches!(
            header.validate(100),
            Err(Error::Truncated {
                needed: 4096,
                len: 100
            })
        ));
    }

    #[test]
    fn validate_rejects_negative_count() {
        let header = Header::new(16, -1);
        assert!(matches!(
            header.validate(16),
            Err(Error::InvalidEntryCount(-1))
        ));
    }
}
