use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

use crate::cli::Cli;

/// Environment override for the ingestion pool size.
pub const THREADS_ENV: &str = "CLASS_FINDER_THREADS";

/// Settings for one [`crate::finder::ClassFinder`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    /// Fail a discovery that accepts no classes instead of returning an empty list.
    pub error_if_empty: bool,
    /// Ingestion pool size; `None` uses one worker per available core.
    pub worker_threads: Option<usize>,
}

impl FinderConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(Self {
            error_if_empty: cli.error_if_empty,
            worker_threads: resolve_worker_threads(cli)?,
        })
    }
}

pub fn resolve_worker_threads(cli: &Cli) -> Result<Option<usize>> {
    if let Some(n) = cli.threads {
        return Ok(Some(n));
    }

    match env::var(THREADS_ENV) {
        Ok(raw) => parse_threads(&raw)
            .with_context(|| format!("Invalid {THREADS_ENV} value: {raw:?}"))
            .map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_threads(raw: &str) -> Result<usize> {
    let n: usize = raw.trim().parse()?;
    if n == 0 {
        anyhow::bail!("worker count must be at least 1");
    }
    Ok(n)
}
