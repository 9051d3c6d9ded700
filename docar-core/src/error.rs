use std::io;

/// Errors raised while encoding or decoding the container format.
///
/// Everything except [`Error::Io`] means the bytes on disk are not a
/// well-formed container (truncated, or internally inconsistent with the
/// actual file size).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("i/o: {0}")]
    Io(#[from] io::Error),

    #[error("container truncated: lookup map declares {needed} bytes, file has {len}")]
    Truncated { needed: u64, len: u64 },

    #[error("stream section offset {offset} out of bounds for a {len}-byte container")]
    StreamOffsetOutOfBounds { offset: i64, len: u64 },

    #[error("invalid entry count {0}")]
    InvalidEntryCount(i64),

    #[error("entry {path:?}: range {offset}+{size} exceeds the {available}-byte stream section")]
    EntryOutOfBounds {
        path: String,
        offset: u64,
        size: u64,
        available: u64,
    },

    #[error("entry {path:?}: negative offset or length in lookup map")]
    NegativeEntryField { path: String },

    #[error("string of {0} encoded bytes too long for a u16 length prefix")]
    StringTooLong(usize),

    #[error("malformed modified UTF-8 sequence")]
    InvalidMutf8,

    #[error("arithmetic overflow computing archive layout")]
    Overflow,
}
