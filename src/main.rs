//! gnconfig - GameNative container config converter
//!
//! Command-line entry point.
//!
//! # Overview
//!
//! - `convert`: raw dump text → export JSON, naming the container from the
//!   Steam store when the config id is `STEAM_<appid>`
//! - `preview`: same conversion, default container name, never touches the network
//! - `import`: load an exported JSON, normalize it and re-export it as an editor export
//!
//! # Execution Flow
//!
//! 1. Load `settings.yaml` (plus `GNCONFIG_*` overrides) from the config directory
//!    (`~/.config/gnconfig` unless `--config-dir` is given)
//! 2. Initialize logging → `<config_dir>/<log_dir>/gnconfig.<date>`, console on stderr
//! 3. Run the subcommand; conversion errors abort without writing any output
//! 4. Log the metrics summary

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use gamenative_config::config::default_config_dir;
use gamenative_config::logging::{self, LogOptions};
use gamenative_config::services::{
    import_export_json, GameNameLookup, NoLookup, SteamStoreLookup,
};
use gamenative_config::{ConfigManager, ExportData, ExportService, Metrics, ToolSettings, APP_NAME, VERSION};
use std::fs;
use std::io::{self, Read};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gnconfig", version)]
#[command(about = "Convert raw GameNative container dumps into importable JSON", long_about = None)]
struct Cli {
    /// Directory holding settings.yaml [default: per-user config dir]
    #[arg(long, global = true)]
    config_dir: Option<Utf8PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Only log to the log file
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a raw dump into an export file
    Convert {
        /// Dump file (reads stdin when omitted)
        input: Option<Utf8PathBuf>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,

        /// Container name, skipping the game name lookup
        #[arg(long)]
        name: Option<String>,

        /// Do not look up game names online
        #[arg(long)]
        no_lookup: bool,
    },

    /// Print the converted JSON with the default container name
    Preview {
        /// Dump file (reads stdin when omitted)
        input: Option<Utf8PathBuf>,
    },

    /// Re-export an exported JSON after normalizing it
    Import {
        /// Exported JSON file
        input: Utf8PathBuf,

        /// Output file (defaults to <id>_export.json)
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli.config_dir.clone().unwrap_or_else(default_config_dir);
    let config_manager = ConfigManager::new(&config_dir);
    let mut settings = config_manager.load_settings()?;
    if cli.debug {
        settings.debug_mode = true;
    }

    let _guard = logging::init(&LogOptions::from_settings(&settings, &config_manager, !cli.quiet))?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let metrics = Arc::new(Metrics::new());
    let result = run(cli.command, &settings, metrics.clone());

    metrics.log_summary();
    result
}

fn run(command: Commands, settings: &ToolSettings, metrics: Arc<Metrics>) -> Result<()> {
    match command {
        Commands::Convert {
            input,
            output,
            name,
            no_lookup,
        } => {
            let text = read_input(input.as_deref())?;

            let export = if let Some(name) = name {
                offline_service(settings, metrics).export_named(&text, &name)?
            } else if no_lookup || !settings.lookup_enabled {
                offline_service(settings, metrics).preview(&text)?
            } else {
                let lookup = SteamStoreLookup::new(
                    settings.proxies.clone(),
                    Duration::from_secs(settings.lookup_timeout_secs),
                )
                .context("Failed to create HTTP client")?;
                let service = ExportService::new(Arc::new(lookup), settings.default_container_name.clone())
                    .with_metrics(metrics);

                // Single-threaded runtime; the lookup is the only async work
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(service.export(&text))?
            };

            tracing::info!("Container name: {}", export.container_name);
            write_export(&export, output.as_deref(), settings.pretty_output)
        }

        Commands::Preview { input } => {
            let text = read_input(input.as_deref())?;
            let export = offline_service(settings, metrics).preview(&text)?;
            write_export(&export, None, true)
        }

        Commands::Import { input, output } => {
            let text = fs::read_to_string(&input)
                .with_context(|| format!("Failed to read export file: {}", input))?;
            let editable = import_export_json(&text)
                .with_context(|| format!("Failed to import {}", input))?;

            let output = output.unwrap_or_else(|| Utf8PathBuf::from(editable.export_file_name()));
            write_export(&editable.to_export(), Some(&output), settings.pretty_output)
        }
    }
}

fn offline_service(settings: &ToolSettings, metrics: Arc<Metrics>) -> ExportService {
    let lookup: Arc<dyn GameNameLookup> = Arc::new(NoLookup);
    ExportService::new(lookup, settings.default_container_name.clone()).with_metrics(metrics)
}

fn read_input(input: Option<&Utf8Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path)),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn write_export(export: &ExportData, output: Option<&Utf8Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        export.to_json_pretty()
    } else {
        export.to_json()
    }
    .context("Failed to serialize export")?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write output: {}", path))?;
            tracing::info!("Wrote {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}
