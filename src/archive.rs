use anyhow::{Context, Result};
use memmap2::Mmap;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::warn;
use zip::ZipArchive;

use crate::scan::{CLASS_SUFFIX, has_suffix};

pub type OpenArchive = ZipArchive<Cursor<Mmap>>;

/// Opens a jar or zip file without extracting it.
pub fn open_archive(archive_path: &Path) -> Result<OpenArchive> {
    let file = File::open(archive_path)
        .with_context(|| format!("Failed to open archive: {}", archive_path.display()))?;
    // SAFETY: The file is opened read-only and the mapping is only ever read.
    // The mapping stays valid after `file` is dropped.
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("Failed to mmap archive: {}", archive_path.display()))?;
    ZipArchive::new(Cursor::new(mmap))
        .with_context(|| format!("Failed to read zip structure: {}", archive_path.display()))
}

/// Streams every class entry of `archive_path` through `visit`.
///
/// Directory entries and non-class entries are skipped. An entry that cannot be
/// opened is logged and skipped; only failing to open the archive itself is an
/// error. Returns the number of entries handed to `visit`.
pub fn for_each_class_entry<F>(archive_path: &Path, mut visit: F) -> Result<usize>
where
    F: FnMut(&str, &mut dyn Read),
{
    let mut archive = open_archive(archive_path)?;
    let mut visited = 0usize;

    for i in 0..archive.len() {
        let mut entry = match archive.by_index(i) {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    archive = %archive_path.display(),
                    index = i,
                    error = %err,
                    "Can't open archive entry"
                );
                continue;
            }
        };
        if entry.is_dir() || !has_suffix(entry.name(), CLASS_SUFFIX) {
            continue;
        }
        let name = entry.name().to_string();
        visit(&name, &mut entry);
        visited += 1;
    }

    Ok(visited)
}
