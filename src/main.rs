use anyhow::{Context, Result};
use clap::Parser;
use class_finder::cli::{Cli, OutputFormat};
use class_finder::config::FinderConfig;
use class_finder::filter::ClassFilter;
use class_finder::finder::ClassFinder;
use class_finder::info::ClassInfo;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut finder = ClassFinder::with_config(FinderConfig::from_cli(&cli)?);
    for path in &cli.paths {
        if !finder.add_root(path) {
            warn!(path = %path.display(), "Ignoring path that cannot contain classes");
        }
    }

    let classes = match build_filter(&cli)? {
        Some(filter) => finder.discover_filtered(&filter)?,
        None => finder.discover()?,
    };
    write_output(&sorted(classes), cli.format)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// ANDs together every filter flag that was given.
fn build_filter(cli: &Cli) -> Result<Option<ClassFilter>> {
    let mut parts = Vec::new();

    if let Some(pattern) = &cli.name {
        parts.push(
            ClassFilter::name(pattern)
                .with_context(|| format!("Invalid --name pattern: {pattern}"))?,
        );
    }
    if cli.interface {
        parts.push(ClassFilter::Interface);
    }
    if cli.no_interface {
        parts.push(ClassFilter::not(ClassFilter::Interface));
    }
    if cli.abstract_only {
        parts.push(ClassFilter::Abstract);
    }
    if cli.concrete {
        parts.push(ClassFilter::not(ClassFilter::Abstract));
    }
    parts.extend(cli.subclass_of.iter().map(ClassFilter::subclass_of));
    parts.extend(cli.annotated.iter().map(ClassFilter::annotated_with));

    Ok(match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(ClassFilter::all_of(parts)),
    })
}

fn sorted(mut classes: Vec<Arc<ClassInfo>>) -> Vec<Arc<ClassInfo>> {
    classes.sort_by(|a, b| a.name().cmp(b.name()));
    classes
}

fn write_output(classes: &[Arc<ClassInfo>], format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let records: Vec<&ClassInfo> = classes.iter().map(Arc::as_ref).collect();
            serde_json::to_writer_pretty(&mut out, &records)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for class in classes {
                writeln!(out, "{class}")?;
            }
        }
    }
    Ok(())
}
