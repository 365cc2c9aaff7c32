//! Parallel ingestion of search roots into a [`ClassRegistry`].
//!
//! Every top-level root becomes one task on a fixed-size rayon pool. Tasks write
//! into a shared [`RegistryBuilder`]; [`ParallelClassLoader::load`] blocks until
//! all of them have finished and only then freezes the registry.
//!
//! Failures are contained where they happen: a class file that cannot be parsed
//! is skipped, an archive that cannot be opened contributes nothing, and the
//! remaining work carries on either way.

use rayon::ThreadPool;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, trace, warn};

use crate::archive::for_each_class_entry;
use crate::classfile::{BytecodeReader, ClassFileReader};
use crate::error::Result;
use crate::info::ClassInfo;
use crate::registry::{ClassRegistry, RegistryBuilder};
use crate::roots::{RootKind, SearchRoot};
use crate::scan::scan_directory;

/// Counters collected during one load.
#[derive(Debug, Default)]
pub struct LoadStats {
    pub roots: AtomicU64,
    pub archives_opened: AtomicU64,
    pub archives_failed: AtomicU64,
    pub records_read: AtomicU64,
    pub records_failed: AtomicU64,
}

/// Plain-value copy of [`LoadStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub roots: u64,
    pub archives_opened: u64,
    pub archives_failed: u64,
    pub records_read: u64,
    pub records_failed: u64,
}

impl LoadStats {
    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            roots: self.roots.load(Ordering::Relaxed),
            archives_opened: self.archives_opened.load(Ordering::Relaxed),
            archives_failed: self.archives_failed.load(Ordering::Relaxed),
            records_read: self.records_read.load(Ordering::Relaxed),
            records_failed: self.records_failed.load(Ordering::Relaxed),
        }
    }
}

pub struct ParallelClassLoader {
    pool: ThreadPool,
    reader: Arc<dyn ClassFileReader>,
}

impl ParallelClassLoader {
    /// Builds a loader with `threads` workers, or one per available core.
    pub fn new(threads: Option<usize>) -> Result<Self> {
        Self::with_reader(threads, Arc::new(BytecodeReader))
    }

    pub fn with_reader(threads: Option<usize>, reader: Arc<dyn ClassFileReader>) -> Result<Self> {
        let threads = threads.unwrap_or_else(default_parallelism).max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("class-finder-{i}"))
            .build()?;
        Ok(Self { pool, reader })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn load(&self, roots: &[SearchRoot]) -> ClassRegistry {
        self.load_with_stats(roots).0
    }

    pub fn load_with_stats(&self, roots: &[SearchRoot]) -> (ClassRegistry, LoadSummary) {
        let registry = RegistryBuilder::new();
        let stats = LoadStats::default();

        self.pool.install(|| {
            roots.par_iter().for_each(|root| {
                stats.roots.fetch_add(1, Ordering::Relaxed);
                self.load_root(root, &registry, &stats);
            });
        });

        let summary = stats.summary();
        info!(
            roots = summary.roots,
            classes = registry.len(),
            failed = summary.records_failed + summary.archives_failed,
            "Loaded classes"
        );
        (registry.finish(), summary)
    }

    fn load_root(&self, root: &SearchRoot, registry: &RegistryBuilder, stats: &LoadStats) {
        info!(path = %root.path.display(), "Finding classes");
        match root.kind {
            RootKind::Jar | RootKind::Zip => self.load_archive(&root.path, registry, stats),
            RootKind::Directory => self.load_directory(&root.path, registry, stats),
        }
    }

    fn load_archive(&self, archive: &Path, registry: &RegistryBuilder, stats: &LoadStats) {
        let outcome = for_each_class_entry(archive, |entry, input| {
            trace!(archive = %archive.display(), entry, "Loading");
            match self.reader.read_class(input, archive) {
                Ok(info) => {
                    stats.records_read.fetch_add(1, Ordering::Relaxed);
                    registry.insert(info);
                }
                Err(err) => {
                    stats.records_failed.fetch_add(1, Ordering::Relaxed);
                    warn!(archive = %archive.display(), entry, error = %err, "Can't load class from archive");
                }
            }
        });

        match outcome {
            Ok(_) => {
                stats.archives_opened.fetch_add(1, Ordering::Relaxed);
            }
            Err(err) => {
                stats.archives_failed.fetch_add(1, Ordering::Relaxed);
                warn!(archive = %archive.display(), error = %format!("{err:#}"), "Can't open archive");
            }
        }
    }

    /// Loads every class file under `dir`, then every archive nested in it.
    fn load_directory(&self, dir: &Path, registry: &RegistryBuilder, stats: &LoadStats) {
        let contents = scan_directory(dir);

        for path in &contents.class_files {
            trace!(path = %path.display(), "Loading");
            match self.read_class_file(path, dir) {
                Ok(info) => {
                    stats.records_read.fetch_add(1, Ordering::Relaxed);
                    registry.insert(info);
                }
                Err(err) => {
                    stats.records_failed.fetch_add(1, Ordering::Relaxed);
                    warn!(path = %path.display(), error = %err, "Can't load class file");
                }
            }
        }

        for archive in &contents.archives {
            self.load_archive(archive, registry, stats);
        }
    }

    fn read_class_file(&self, path: &Path, location: &Path) -> Result<ClassInfo> {
        let mut input = BufReader::new(File::open(path)?);
        self.reader.read_class(&mut input, location)
    }
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
