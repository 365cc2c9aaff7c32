use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-finder")]
#[command(about = "Find Java classes in directories, jars and zips")]
pub struct Cli {
    /// Directories, `.jar` or `.zip` files to search.
    #[arg(value_name = "PATHS", required = true)]
    pub paths: Vec<PathBuf>,

    /// Keep classes whose name contains a match for REGEX.
    #[arg(long, value_name = "REGEX")]
    pub name: Option<String>,

    #[arg(long, conflicts_with = "no_interface")]
    pub interface: bool,

    #[arg(long)]
    pub no_interface: bool,

    #[arg(long = "abstract", conflicts_with = "concrete")]
    pub abstract_only: bool,

    #[arg(long)]
    pub concrete: bool,

    /// Keep subtypes of NAME. Repeatable.
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub subclass_of: Vec<String>,

    /// Keep classes annotated with NAME. Repeatable.
    #[arg(long, value_name = "NAME", action = ArgAction::Append)]
    pub annotated: Vec<String>,

    /// Exit with an error when nothing matches.
    #[arg(long)]
    pub error_if_empty: bool,

    #[arg(long, value_name = "N", value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
