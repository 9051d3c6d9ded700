use std::fs::{self, File};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{Entry, Header, HEADER_SIZE};
use crate::{copy_stream, path, wrap_io_err, Error, COPY_BUF_SIZE};

/// An opened compound container.
///
/// Opening reads and validates the header and the whole lookup map up
/// front, so a truncated or internally inconsistent container fails before
/// anything is written to disk rather than halfway through an expansion.
#[derive(Debug)]
pub struct Container {
    path: PathBuf,
    src: BufReader<File>,
    header: Header,
    entries: Vec<Entry>,
}

impl Container {
    pub fn open(source: impl AsRef<Path>) -> Result<Container, Error> {
        let source_path = source.as_ref().to_path_buf();

        let file = File::open(&source_path).map_err(wrap_io_err!(source_path, "opening archive"))?;
        let len = file
            .metadata()
            .map_err(wrap_io_err!(source_path, "reading archive size"))?
            .len();
        let mut src = BufReader::new(file);

        let mut header_bytes = [0u8; HEADER_SIZE];
        src.read_exact(&mut header_bytes)
            .map_err(wrap_io_err!(source_path, "reading header"))?;
        let header = Header::from_bytes(&header_bytes);
        header.validate(len)?;

        let stream_len = header.stream_len(len);
        let mut entries = Vec::new();
        for _ in 0..header.entry_count {
            let entry = Entry::read_from(&mut src)?;
            entry.validate(stream_len)?;
            entries.push(entry);
        }

        debug!(
            archive = %source_path.display(),
            entries = entries.len(),
            "opened container"
        );

        Ok(Container {
            path: source_path,
            src,
            header,
            entries,
        })
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// The lookup map, in pack order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Expand every stream into a file under `dest_root`.
    ///
    /// Parent directories are created as needed; directories that contained
    /// no files in the source tree are never materialized, since the format
    /// stores no directory entries. Already-expanded files are not rolled
    /// back on failure.
    pub fn expand_into(&mut self, dest_root: impl AsRef<Path>) -> Result<(), Error> {
        let dest_root = dest_root.as_ref();
        let stream_base = self.header.stream_offset as u64;
        let mut buf = vec![0u8; COPY_BUF_SIZE];

        for index in 0..self.entries.len() {
            let entry = self.entries[index].clone();
            let target = path::resolve(dest_root, &entry.path);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(wrap_io_err!(parent, "creating parent directories"))?;
            }

            let mut out =
                File::create(&target).map_err(wrap_io_err!(target, "creating expanded file"))?;

            self.src
                .seek(SeekFrom::Start(stream_base + entry.offset))
                .map_err(wrap_io_err!(self.path, "seeking stream data"))?;

            let copied = copy_stream((&mut self.src).take(entry.size), &mut out, &mut buf)
                .map_err(wrap_io_err!(target, "copying stream data"))?;

            if copied != entry.size {
                // The map passed bounds checks, so a short read means the
                // file shrank underneath us.
                return Err(Error::Format(crate::core::Error::Truncated {
                    needed: stream_base + entry.offset + entry.size,
                    len: stream_base + entry.offset + copied,
                }));
            }
        }

        debug!(
            archive = %self.path.display(),
            dest = %dest_root.display(),
            entries = self.entries.len(),
            "expanded container"
        );

        Ok(())
    }
}

/// Expand the container at `source_file` into a tree under `dest_root`.
pub fn expand(source_file: impl AsRef<Path>, dest_root: impl AsRef<Path>) -> Result<(), Error> {
    Container::open(source_file)?.expand_into(dest_root)
}
