//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the run configuration (flags plus environment)
//! - dispatches to the TUI or to the plain-terminal subcommands

use clap::Parser;

use crate::cli::{Command, DumpArgs, SourceArgs};
use crate::domain::RunConfig;
use crate::error::AppError;

pub mod pipeline;

/// Environment variable naming the serving root URL.
pub const ROOT_URL_VAR: &str = "OBLIGACJE_ROOT_URL";

/// Install the diagnostic logging channel.
///
/// Raw transport errors go here (stderr, `RUST_LOG`-filtered) and are never
/// shown in the UI. Off by default, so the TUI's alternate screen stays clean.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point for the `obv` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `obv` (and `obv --source assets`) to behave like
    // `obv tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while keeping the zero-argument UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => crate::tui::run(&run_config(&args)?),
        Command::List(args) => handle_list(&run_config(&args)?),
        Command::Dump(args) => {
            let config = run_config(&args.source)?;
            handle_dump(&config, &args)
        }
    }
}

fn handle_list(config: &RunConfig) -> Result<(), AppError> {
    let store = pipeline::connect(config)?;
    let catalog = store.list_bonds()?;
    print!("{}", crate::report::format_catalog(&catalog));
    Ok(())
}

fn handle_dump(config: &RunConfig, args: &DumpArgs) -> Result<(), AppError> {
    let store = pipeline::connect(config)?;
    let run = pipeline::load_bond(&store, args.bond.as_deref())?;

    if args.chart {
        println!("{}", to_json(&run.chart)?);
    } else if args.json {
        println!("{}", to_json(&run.series)?);
    } else {
        print!("{}", crate::report::format_series(&run.bond, &run.series));
    }
    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| AppError::new(4, format!("Failed to serialize output: {e}")))
}

/// Resolve the run configuration from flags and the environment.
fn run_config(args: &SourceArgs) -> Result<RunConfig, AppError> {
    dotenvy::dotenv().ok();
    let root_url = match &args.root {
        Some(root) => root.clone(),
        None => std::env::var(ROOT_URL_VAR).map_err(|_| {
            AppError::new(
                2,
                format!("Missing serving root URL. Pass --root or set {ROOT_URL_VAR} in the environment (.env)."),
            )
        })?,
    };

    Ok(RunConfig {
        root_url: root_url.trim_end_matches('/').to_string(),
        source: args.source,
    })
}

/// Rewrite argv so `obv` defaults to `obv tui`.
///
/// Rules:
/// - `obv`                     -> `obv tui`
/// - `obv --source assets ...` -> `obv tui --source assets ...`
/// - `obv --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "list" | "dump");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["obv"])), argv(&["obv", "tui"]));
    }

    #[test]
    fn leading_flag_is_treated_as_tui_flags() {
        assert_eq!(
            rewrite_args(argv(&["obv", "--source", "assets"])),
            argv(&["obv", "tui", "--source", "assets"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(argv(&["obv", "list"])),
            argv(&["obv", "list"])
        );
        assert_eq!(
            rewrite_args(argv(&["obv", "--help"])),
            argv(&["obv", "--help"])
        );
    }
}
