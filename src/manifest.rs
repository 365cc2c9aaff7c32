//! Jar manifest reading.
//!
//! Only the main section of `META-INF/MANIFEST.MF` is parsed; per-entry sections
//! are ignored.

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use zip::result::ZipError;

use crate::archive::open_archive;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";
pub const CLASS_PATH_KEY: &str = "Class-Path";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    main: Vec<(String, String)>,
}

impl Manifest {
    pub fn parse(text: &str) -> Self {
        let mut main: Vec<(String, String)> = Vec::new();
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

        for line in normalized.lines() {
            if line.is_empty() {
                // The main section ends at the first blank line.
                break;
            }
            if let Some(continuation) = line.strip_prefix(' ') {
                if let Some((_, value)) = main.last_mut() {
                    value.push_str(continuation);
                }
                continue;
            }
            if let Some((key, value)) = line.split_once(':') {
                let value = value.strip_prefix(' ').unwrap_or(value);
                main.push((key.trim().to_string(), value.to_string()));
            }
        }

        Self { main }
    }

    /// Looks up a main-section attribute. Attribute names are case-insensitive.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.main
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whitespace-separated elements of the `Class-Path` attribute.
    pub fn class_path(&self) -> Vec<&str> {
        self.get(CLASS_PATH_KEY)
            .map(|v| v.split_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Reads the manifest embedded in `archive_path`, or `None` if it has none.
pub fn read_manifest(archive_path: &Path) -> Result<Option<Manifest>> {
    let mut archive = open_archive(archive_path)?;
    let mut entry = match archive.by_name(MANIFEST_PATH) {
        Ok(entry) => entry,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to open manifest in: {}", archive_path.display())
            });
        }
    };

    let mut raw = Vec::new();
    entry
        .read_to_end(&mut raw)
        .with_context(|| format!("Failed to read manifest in: {}", archive_path.display()))?;
    Ok(Some(Manifest::parse(&String::from_utf8_lossy(&raw))))
}
