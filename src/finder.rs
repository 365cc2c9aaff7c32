//! The discovery facade.
//!
//! A [`ClassFinder`] owns a set of search roots. Every call to
//! [`ClassFinder::discover`] or [`ClassFinder::discover_filtered`] ingests all of
//! them into a fresh registry, filters it, and drops it again, so changes on
//! disk between calls are always picked up.

use std::path::Path;
use std::sync::Arc;
use tracing::{info, trace};

use crate::classfile::{BytecodeReader, ClassFileReader};
use crate::config::FinderConfig;
use crate::error::{FinderError, Result};
use crate::filter::ClassFilter;
use crate::hierarchy::HierarchyResolver;
use crate::info::ClassInfo;
use crate::loader::ParallelClassLoader;
use crate::roots::{SearchRoot, SearchRoots};

pub struct ClassFinder {
    roots: SearchRoots,
    config: FinderConfig,
    reader: Arc<dyn ClassFileReader>,
}

impl Default for ClassFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassFinder {
    pub fn new() -> Self {
        Self::with_config(FinderConfig::default())
    }

    pub fn with_config(config: FinderConfig) -> Self {
        Self::with_reader(config, Arc::new(BytecodeReader))
    }

    /// Uses `reader` to decode every class-file blob.
    pub fn with_reader(config: FinderConfig, reader: Arc<dyn ClassFileReader>) -> Self {
        Self {
            roots: SearchRoots::new(),
            config,
            reader,
        }
    }

    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    pub fn set_error_if_empty(&mut self, error_if_empty: bool) {
        self.config.error_if_empty = error_if_empty;
    }

    /// Adds a directory, `.jar` or `.zip` to search, plus anything its manifest
    /// `Class-Path` references. Returns `false` when `path` cannot contain classes.
    pub fn add_root(&mut self, path: impl AsRef<Path>) -> bool {
        self.roots.add(path.as_ref())
    }

    /// Adds every path, returning how many were accepted.
    pub fn add_roots<I, P>(&mut self, paths: I) -> usize
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.roots.add_all(paths)
    }

    /// Adds each element of a platform path list, such as the value of
    /// `CLASSPATH`. Returns how many were accepted.
    pub fn add_class_path(&mut self, class_path: &str) -> usize {
        self.add_roots(std::env::split_paths(class_path))
    }

    pub fn clear_roots(&mut self) {
        self.roots.clear();
    }

    pub fn roots(&self) -> &[SearchRoot] {
        self.roots.as_slice()
    }

    /// Every class found under the current roots.
    pub fn discover(&self) -> Result<Vec<Arc<ClassInfo>>> {
        self.run(None)
    }

    /// Every class under the current roots accepted by `filter`.
    pub fn discover_filtered(&self, filter: &ClassFilter) -> Result<Vec<Arc<ClassInfo>>> {
        self.run(Some(filter))
    }

    fn run(&self, filter: Option<&ClassFilter>) -> Result<Vec<Arc<ClassInfo>>> {
        let loader =
            ParallelClassLoader::with_reader(self.config.worker_threads, Arc::clone(&self.reader))?;
        let registry = loader.load(self.roots.as_slice());
        let resolver = HierarchyResolver::new(&registry);

        let mut accepted = Vec::new();
        for class in registry.iter() {
            let keep = filter.is_none_or(|f| f.accept(class, &resolver));
            trace!(class = class.name(), keep, "Filtered");
            if keep {
                accepted.push(Arc::clone(class));
            }
        }

        info!(
            loaded = registry.len(),
            accepted = accepted.len(),
            "Discovery finished"
        );

        if accepted.is_empty() && self.config.error_if_empty {
            return Err(FinderError::NoClassesFound);
        }
        Ok(accepted)
    }
}
