//! Search roots and manifest `Class-Path` expansion.

use std::collections::{HashSet, VecDeque};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::manifest::read_manifest;
use crate::scan::{is_jar, is_zip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    Directory,
    Jar,
    Zip,
}

impl RootKind {
    pub fn is_archive(self) -> bool {
        matches!(self, RootKind::Jar | RootKind::Zip)
    }
}

/// A directory or archive to scan, identified by its canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchRoot {
    pub path: PathBuf,
    pub kind: RootKind,
}

impl SearchRoot {
    /// Classifies `path`, returning `None` when it cannot contain classes: it does
    /// not exist, or it is a file that is neither a jar nor a zip.
    pub fn classify(path: &Path) -> Option<Self> {
        let canonical = std::fs::canonicalize(path).ok()?;
        let metadata = std::fs::metadata(&canonical).ok()?;

        let kind = if metadata.is_dir() {
            RootKind::Directory
        } else if metadata.is_file() && is_jar(&canonical) {
            RootKind::Jar
        } else if metadata.is_file() && is_zip(&canonical) {
            RootKind::Zip
        } else {
            return None;
        };

        Some(Self {
            path: canonical,
            kind,
        })
    }
}

/// Ordered, de-duplicated set of search roots.
///
/// Adding an archive reads its manifest and appends every `Class-Path` element
/// (resolved against the archive's directory) through the same acceptance rules,
/// transitively. Expansion is a work queue bounded by the canonical-path set, so
/// manifests that reference each other terminate.
#[derive(Debug, Default, Clone)]
pub struct SearchRoots {
    roots: Vec<SearchRoot>,
    seen: HashSet<PathBuf>,
}

impl SearchRoots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path` and anything its manifest pulls in. Returns whether `path`
    /// itself can contain classes; re-adding a known root returns `true` and
    /// changes nothing.
    pub fn add(&mut self, path: &Path) -> bool {
        let mut queue = VecDeque::from([path.to_path_buf()]);
        let mut accepted = false;
        let mut first = true;

        while let Some(candidate) = queue.pop_front() {
            let is_requested = std::mem::take(&mut first);
            let Some(root) = SearchRoot::classify(&candidate) else {
                info!(path = %candidate.display(), "Path cannot contain classes, skipping");
                continue;
            };
            if is_requested {
                accepted = true;
            }
            if !self.seen.insert(root.path.clone()) {
                continue;
            }

            info!(path = %root.path.display(), kind = ?root.kind, "Adding search root");
            if root.kind.is_archive() {
                queue.extend(manifest_class_path(&root.path));
            }
            self.roots.push(root);
        }

        accepted
    }

    /// Adds every path, returning how many were suitable.
    pub fn add_all<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        paths
            .into_iter()
            .filter(|p| self.add(p.as_ref()))
            .count()
    }

    pub fn clear(&mut self) {
        self.roots.clear();
        self.seen.clear();
    }

    pub fn as_slice(&self) -> &[SearchRoot] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Resolves the manifest `Class-Path` of `archive` against its parent directory.
fn manifest_class_path(archive: &Path) -> Vec<PathBuf> {
    let manifest = match read_manifest(archive) {
        Ok(Some(manifest)) => manifest,
        Ok(None) => return Vec::new(),
        Err(err) => {
            warn!(archive = %archive.display(), error = %err, "I/O error processing archive manifest");
            return Vec::new();
        }
    };

    let parent = archive.parent().unwrap_or_else(|| Path::new(""));
    manifest
        .class_path()
        .into_iter()
        .map(|element| {
            let resolved = parent.join(relative_part(Path::new(element)));
            debug!(from = %archive.display(), element = %resolved.display(), "Manifest Class-Path entry");
            resolved
        })
        .collect()
}

/// Drops any root or prefix so the element always resolves beneath the
/// archive's directory.
fn relative_part(element: &Path) -> PathBuf {
    element
        .components()
        .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
        .collect()
}
