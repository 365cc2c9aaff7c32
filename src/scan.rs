use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const CLASS_SUFFIX: &str = ".class";
pub const JAR_SUFFIX: &str = ".jar";
pub const ZIP_SUFFIX: &str = ".zip";

pub fn has_suffix(name: &str, suffix: &str) -> bool {
    name.len() >= suffix.len()
        && name.is_char_boundary(name.len() - suffix.len())
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn path_has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .is_some_and(|name| has_suffix(&name.to_string_lossy(), suffix))
}

pub fn is_jar(path: &Path) -> bool {
    path_has_suffix(path, JAR_SUFFIX)
}

pub fn is_zip(path: &Path) -> bool {
    path_has_suffix(path, ZIP_SUFFIX)
}

pub fn is_archive(path: &Path) -> bool {
    is_jar(path) || is_zip(path)
}

/// Files found under a directory, split by what they contain.
#[derive(Debug, Default)]
pub struct DirectoryContents {
    pub class_files: Vec<PathBuf>,
    pub archives: Vec<PathBuf>,
}

/// Recursively collects every regular file under `dir` whose name ends with one
/// of `suffixes`. Symlinks are followed and entries are visited in file-name
/// order, so a given tree always yields the same sequence.
pub fn find_files_with_suffix(dir: &Path, suffixes: &[&str]) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "Can't read directory entry");
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if suffixes.iter().any(|s| path_has_suffix(path, s)) {
            files.push(path.to_path_buf());
        }
    }
    files
}

/// Walks `dir` once and returns its class files and nested archives.
pub fn scan_directory(dir: &Path) -> DirectoryContents {
    let mut contents = DirectoryContents::default();
    for path in find_files_with_suffix(dir, &[CLASS_SUFFIX, JAR_SUFFIX, ZIP_SUFFIX]) {
        if is_archive(&path) {
            contents.archives.push(path);
        } else {
            contents.class_files.push(path);
        }
    }
    contents
}
