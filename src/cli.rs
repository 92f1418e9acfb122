//! Command-line parsing for the bond yield viewer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the data-loading code.

use clap::{Parser, Subcommand};

use crate::domain::SourceKind;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "obv", version, about = "Polish treasury bond yield viewer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive TUI.
    ///
    /// This is the default: running `obv` with no subcommand behaves like
    /// `obv tui`.
    Tui(SourceArgs),
    /// Print the list of available bonds.
    List(SourceArgs),
    /// Fetch one bond's series and print it (table or JSON).
    Dump(DumpArgs),
}

/// Options shared by every data-touching command.
#[derive(Debug, Parser, Clone)]
pub struct SourceArgs {
    /// Serving root URL, where endpoint.json and the asset bundle live.
    /// Overrides OBLIGACJE_ROOT_URL from the environment (.env).
    #[arg(long)]
    pub root: Option<String>,

    /// Data source variant.
    #[arg(long, value_enum, default_value_t = SourceKind::Api)]
    pub source: SourceKind,
}

#[derive(Debug, Parser, Clone)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Bond identifier (as printed by `obv list`). Defaults to the first
    /// bond in the catalog, matching the UI's auto-selection.
    pub bond: Option<String>,

    /// Print the parsed series as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Print the full chart description as JSON.
    #[arg(long, conflicts_with = "json")]
    pub chart: bool,
}
