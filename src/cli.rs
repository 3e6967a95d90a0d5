//! Command-line argument parsing for the bindkit host
//!
//! Supports:
//! - Checking a bind file against the default control catalog and listing
//!   the resulting combos
//! - Dumping the effective binds as YAML or JSON
//! - Listing the control catalog
//! - Running a press script through a live bind manager

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Validate, inspect and simulate input bind files
#[derive(Parser, Debug)]
#[command(name = "bindkit", version, about = "Validate, inspect and simulate input bind files")]
pub struct CliArgs {
    /// Bind file to use instead of the layered defaults
    #[arg(long, global = true, value_name = "PATH")]
    pub binds: Option<PathBuf>,

    /// Engine config to use instead of ~/.config/bindkit/config.yaml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Apply the binds and report every rejected entry
    Check,
    /// Print the effective binds
    Dump {
        #[arg(long, value_enum, default_value_t = DumpFormat::Yaml)]
        format: DumpFormat,
    },
    /// List the control catalog
    Controls,
    /// Run a YAML press script and print the events it fires
    Simulate {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
    Yaml,
    Json,
}
