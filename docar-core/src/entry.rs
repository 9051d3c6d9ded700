use std::fmt;
use std::io::{Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::{mutf8, Error};

/// One record of the lookup map, describing a single packed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Canonical forward-slash path, unique in the archive, starting with `/`.
    pub path: String,
    /// Byte offset of the stream data, relative to the stream section.
    pub offset: u64,
    /// Byte length of the stream data.
    pub size: u64,
}

impl Entry {
    pub fn new(path: impl Into<String>, offset: u64, size: u64) -> Entry {
        Entry {
            path: path.into(),
            offset,
            size,
        }
    }

    /// Serialize this record: length-prefixed path, then offset and size as
    /// big-endian i64.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), Error> {
        mutf8::write_str(writer, &self.path)?;
        writer.write_i64::<BigEndian>(i64::try_from(self.offset).map_err(|_| Error::Overflow)?)?;
        writer.write_i64::<BigEndian>(i64::try_from(self.size).map_err(|_| Error::Overflow)?)?;
        Ok(())
    }

    /// Deserialize one record from the lookup map.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Entry, Error> {
        let path = mutf8::read_str(reader)?;
        let offset = reader.read_i64::<BigEndian>()?;
        let size = reader.read_i64::<BigEndian>()?;

        if offset < 0 || size < 0 {
            return Err(Error::NegativeEntryField { path });
        }

        Ok(Entry {
            path,
            offset: offset as u64,
            size: size as u64,
        })
    }

    /// Number of bytes this record occupies in the lookup map.
    pub fn encoded_size(&self) -> Result<usize, Error> {
        let path_len = mutf8::encoded_len(&self.path);
        if path_len > u16::MAX as usize {
            return Err(Error::StringTooLong(path_len));
        }
        Ok(2 + path_len + 16)
    }

    /// Check that this entry's declared range fits inside a stream section
    /// of `stream_len` bytes.
    pub fn validate(&self, stream_len: u64) -> Result<(), Error> {
        let end = self.offset.checked_add(self.size).ok_or(Error::Overflow)?;
        if end > stream_len {
            return Err(Error::EntryOutOfBounds {
                path: self.path.clone(),
                offset: self.offset,
                size: self.size,
                available: stream_len,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "path={:?} offset={} size={}",
            self.path, self.offset, self.size
        )
    }
}
