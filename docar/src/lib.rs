//! Pack a directory tree of report artifacts into one compound container
//! file, and expand such a container back into a byte-identical tree.
//!
//! The container format itself lives in `docar-core`; this crate owns the
//! filesystem side: walking the source tree, path normalization, the
//! writer/reader pair, and the scratch-area helpers collaborators use to
//! stage trees before packing.

pub mod path;

mod container;
mod order;
mod pack;
mod scratch;
mod skip;
mod walk;

pub use container::{expand, Container};
pub use order::StreamOrdering;
pub use pack::{pack, pack_with};
pub use scratch::{delete_all, generate_unique_name, ScratchNamer};
pub use skip::{SkipList, READER_COUNT_PATH};
pub use walk::enumerate_files;

use std::io;
use std::path::PathBuf;

pub use docar_core as core;

const COPY_BUF_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{context}{}", .path.as_ref().map(|p| format!(": {}", p.display())).unwrap_or_default())]
    Io {
        source: io::Error,
        path: Option<PathBuf>,
        context: &'static str,
    },

    #[error(transparent)]
    Format(#[from] docar_core::Error),

    #[error("size of {} changed during packing: lookup map says {expected} bytes, copied {actual}", .path.display())]
    LengthMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },
}

/// Build a closure mapping an `io::Error` into [`Error::Io`] with context,
/// for use with `map_err`.
macro_rules! wrap_io_err {
    ($path:expr, $context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: Some(::std::path::PathBuf::from(&$path)),
            context: $context,
        }
    };
    ($context:expr) => {
        |source| $crate::Error::Io {
            source,
            path: None,
            context: $context,
        }
    };
}
pub(crate) use wrap_io_err;

/// Copy `read` to completion into `write` through `buf`, returning the
/// number of bytes moved.
pub(crate) fn copy_stream<R, W>(mut read: R, write: &mut W, buf: &mut [u8]) -> io::Result<u64>
where
    R: io::Read,
    W: io::Write,
{
    let mut total = 0;
    loop {
        let count = read.read(buf)?;
        if count == 0 {
            break;
        }
        write.write_all(&buf[..count])?;
        total += count as u64;
    }
    Ok(total)
}
