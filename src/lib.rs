//! # class-finder
//!
//! Parallel discovery of Java classes across directories, jars and zips, with
//! composable filtering over the discovered class hierarchy.
//!
//! ## Architecture
//!
//! - **info**: Class, field, method and annotation records and modifier sets
//! - **classfile**: Class-file decoding behind the `ClassFileReader` seam
//! - **scan**: Recursive directory walks for class files and nested archives
//! - **archive**: Memory-mapped archive access and class-entry iteration
//! - **manifest**: `META-INF/MANIFEST.MF` parsing and `Class-Path` extraction
//! - **roots**: Search-root classification, de-duplication and manifest expansion
//! - **registry**: Concurrent class namespace, frozen once ingestion completes
//! - **loader**: Thread-pool ingestion of every search root into a registry
//! - **hierarchy**: Transitive superclass and interface resolution
//! - **filter**: Class predicates and their boolean combinators
//! - **finder**: The `ClassFinder` facade tying the pieces together
//! - **config**: Finder settings and worker-count resolution
//! - **cli**: Command-line arguments for the `class-finder` binary

pub mod archive;
pub mod classfile;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod finder;
pub mod hierarchy;
pub mod info;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod roots;
pub mod scan;

#[cfg(test)]
mod testing;

pub use error::FinderError;
pub use filter::ClassFilter;
pub use finder::ClassFinder;
pub use info::ClassInfo;
