//! cabinet-cutlist-mcp: cut-list engine and MCP server for modular cabinets
//!
//! Runs as an MCP server on stdio by default. With `--layout` it computes a
//! single cabinet and prints the result instead.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use cabinet_cutlist_mcp::config::{self, Config};
use cabinet_cutlist_mcp::engine::{compute_cut_list, CabinetSpec};
use cabinet_cutlist_mcp::export;
use cabinet_cutlist_mcp::mcp::server::McpServer;

/// Cut-list engine and MCP server for modular cabinets.
///
/// Turns a cabinet layout into the panels to cut, the hardware to buy and a
/// cost estimate.
#[derive(Parser, Debug)]
#[command(name = "cabinet-cutlist-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,

    /// Compute one cabinet layout (JSON file) and print the result instead of serving
    #[arg(short, long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Print the result of --layout as a CSV cut sheet instead of JSON
    #[arg(long, requires = "layout")]
    csv: bool,
}

/// Determines the log level from CLI arguments.
#[allow(clippy::match_same_arms)] // Explicit "warn" arm for clarity
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::WARN, // Default to warn for unknown levels
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Computes one layout file and prints the result on stdout.
fn run_once(cfg: &Config, layout: &Path, csv: bool) -> ExitCode {
    let spec = match CabinetSpec::load(layout) {
        Ok(spec) => spec,
        Err(e) => {
            eprintln!("Layout error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cut_list = compute_cut_list(&spec, &cfg.catalog);
    let margin = cfg.pricing.margin_multiplier;

    if csv {
        return match export::to_csv(&cut_list, margin) {
            Ok(sheet) => {
                print!("{sheet}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Export error: {e}");
                for diagnostic in &cut_list.diagnostics {
                    eprintln!("  {diagnostic}");
                }
                ExitCode::FAILURE
            }
        };
    }

    match serde_json::to_string_pretty(&cut_list) {
        Ok(json) => {
            println!("{json}");
            if cut_list.is_valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!(error = %e, "Failed to serialise cut list");
            ExitCode::FAILURE
        }
    }
}

/// Entry point for the cabinet-cutlist-mcp server.
fn main() -> ExitCode {
    let args = Args::parse();

    // Load configuration
    let config_path = args.config.as_deref();
    let cfg = match config::load_config(config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            if config_path.is_none() {
                if let Some(default_path) = config::default_config_path() {
                    eprintln!("\nConfig read from: {}", default_path.display());
                }
            }
            return ExitCode::FAILURE;
        }
    };

    // Initialise logging
    let log_level = get_log_level(args.verbose, args.quiet, &cfg.logging.level);
    init_tracing(log_level);

    if let Some(layout) = args.layout.as_deref() {
        return run_once(&cfg, layout, args.csv);
    }

    // Display GPL license notice (required by GPLv3 Section 5d)
    eprintln!(
        "cabinet-cutlist-mcp {}  Copyright (C) 2026  The Cabinet Cut-List Contributors",
        env!("CARGO_PKG_VERSION")
    );
    eprintln!("This program comes with ABSOLUTELY NO WARRANTY.");
    eprintln!("This is free software, licensed under GPL-3.0-or-later.");
    eprintln!();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting cabinet-cutlist-mcp server"
    );

    // Get allowed paths from config
    let allowed_paths = if cfg.allowed_paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cfg.allowed_paths
    };

    info!(
        allowed_paths = ?allowed_paths,
        margin = cfg.pricing.margin_multiplier,
        "Allowed paths configured"
    );

    let mut server = McpServer::new(allowed_paths, cfg.catalog, cfg.pricing.margin_multiplier);

    info!("MCP server ready, waiting for client connection...");

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!(error = %e, "Failed to create Tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server.run()) {
        Ok(()) => {
            info!("Server shut down gracefully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }

    #[test]
    fn log_level_from_flags() {
        assert_eq!(get_log_level(0, true, "trace"), Level::ERROR);
        assert_eq!(get_log_level(2, false, "warn"), Level::DEBUG);
        assert_eq!(get_log_level(0, false, "INFO"), Level::INFO);
        assert_eq!(get_log_level(0, false, "loud"), Level::WARN);
    }

    #[test]
    fn csv_requires_layout() {
        assert!(Args::try_parse_from(["cabinet-cutlist-mcp", "--csv"]).is_err());
        let args =
            Args::try_parse_from(["cabinet-cutlist-mcp", "--layout", "base.json", "--csv"]).unwrap();
        assert!(args.csv);
    }
}
