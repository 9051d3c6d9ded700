use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::{Entry, Header};
use crate::order::StreamOrdering;
use crate::skip::SkipList;
use crate::{copy_stream, path, scratch, walk, wrap_io_err, Error, COPY_BUF_SIZE};

/// Pack every regular file under `source_root` into a compound container
/// at `dest`, using the default skip list.
///
/// See [`pack_with`].
pub fn pack(
    source_root: impl AsRef<Path>,
    ordering: Option<&dyn StreamOrdering>,
    dest: impl AsRef<Path>,
) -> Result<(), Error> {
    pack_with(source_root, ordering, &SkipList::default(), dest)
}

/// Pack every regular file under `source_root` into a compound container
/// at `dest`.
///
/// Anything already at `dest`, file or directory, is destroyed first,
/// then the container is written in a single forward pass: a provisional
/// zeroed header, the lookup map, the concatenated stream data, and finally
/// the header again with the real stream-section offset and entry count
/// backpatched in. Paths matched by `skip` are left out of both the map and
/// the data section. When `ordering` returns a list, streams are packed in
/// that order instead of enumeration order.
///
/// On failure the destination is left behind in a partial, non-conformant
/// state; callers needing atomicity should pack to a scratch path and
/// rename after success.
pub fn pack_with(
    source_root: impl AsRef<Path>,
    ordering: Option<&dyn StreamOrdering>,
    skip: &SkipList,
    dest: impl AsRef<Path>,
) -> Result<(), Error> {
    let dest = dest.as_ref();

    // A stale file or expanded folder may sit at the destination path.
    scratch::delete_all(dest);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(dest)
        .map_err(wrap_io_err!(dest, "creating archive"))?;
    let mut out = BufWriter::new(file);

    out.write_all(&Header::new(0, 0).to_bytes())
        .map_err(wrap_io_err!(dest, "writing provisional header"))?;

    // Canonical root so relative paths strip cleanly. A root that cannot be
    // canonicalized (typically missing) is used as given and packs empty.
    let given_root = source_root.as_ref();
    let root = fs::canonicalize(given_root).unwrap_or_else(|_| given_root.to_path_buf());

    let mut files = walk::enumerate_files(&root).map_err(wrap_io_err!(root, "walking source tree"))?;

    if let Some(ordering) = ordering {
        let names: Vec<String> = files.iter().map(|file| path::relativize(&root, file)).collect();
        if let Some(ordered) = ordering.reorder(&names) {
            files = ordered.iter().map(|name| path::resolve(&root, name)).collect();
        }
    }

    // Lookup map first: one record per non-skipped file, offsets counted
    // from the start of the yet-to-be-written stream section.
    let mut entries: Vec<(PathBuf, Entry)> = Vec::with_capacity(files.len());
    let mut offset: u64 = 0;
    for file_path in &files {
        let relative = path::relativize(&root, file_path);
        if skip.matches(&relative) {
            continue;
        }

        let size = fs::metadata(file_path)
            .map_err(wrap_io_err!(file_path, "reading source file size"))?
            .len();

        let entry = Entry::new(relative, offset, size);
        entry.write_to(&mut out)?;

        offset = offset
            .checked_add(size)
            .ok_or(Error::Format(crate::core::Error::Overflow))?;
        entries.push((file_path.clone(), entry));
    }

    let stream_offset = out
        .stream_position()
        .map_err(wrap_io_err!(dest, "locating stream section"))?;

    // Stream section: raw bytes, same order as the map. The map already
    // fixed each stream's length, so a file that changed size since is an
    // error rather than a silently corrupt container.
    let mut buf = vec![0u8; COPY_BUF_SIZE];
    for (file_path, entry) in &entries {
        let source = fs::File::open(file_path)
            .map_err(wrap_io_err!(file_path, "opening source file"))?;
        let copied = copy_stream(source, &mut out, &mut buf)
            .map_err(wrap_io_err!(file_path, "copying stream data"))?;

        if copied != entry.size {
            return Err(Error::LengthMismatch {
                path: file_path.clone(),
                expected: entry.size,
                actual: copied,
            });
        }
    }

    let header = Header::new(
        i64::try_from(stream_offset).map_err(|_| Error::Format(crate::core::Error::Overflow))?,
        entries.len() as i64,
    );

    out.seek(SeekFrom::Start(0))
        .map_err(wrap_io_err!(dest, "seeking to header"))?;
    out.write_all(&header.to_bytes())
        .map_err(wrap_io_err!(dest, "backpatching header"))?;
    out.flush().map_err(wrap_io_err!(dest, "flushing archive"))?;

    debug!(
        archive = %dest.display(),
        entries = entries.len(),
        stream_offset,
        "packed container"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::HEADER_SIZE;

    #[test]
    fn missing_root_packs_empty_container() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("out.dar");

        pack(tmp.path().join("never-staged"), None, &dest).unwrap();

        let bytes = fs::read(&dest).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        let header = Header::from_bytes(&bytes.try_into().unwrap());
        assert_eq!(header, Header::new(HEADER_SIZE as i64, 0));
    }

    #[test]
    fn existing_directory_at_dest_is_replaced() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("stage");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("a.txt"), b"a").unwrap();

        let dest = tmp.path().join("out.dar");
        fs::create_dir(&dest).unwrap();
        fs::write(dest.join("stale"), b"x").unwrap();

        pack(&root, None, &dest).unwrap();
        assert!(dest.is_file());
    }
}
