//! CLI entry point for social-hub.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use social_hub_core::{
    AppError, Database, DraftStore, SafeStorage, SourceRegistry, SqliteBackend, StorageSettings,
    format_error_for_display,
};
use tracing::{debug, info};

mod app_config;
mod cli;
mod commands;
mod output;

use app_config::{LoadedConfig, load_default_file_config, resolve_default_database_path};
use cli::{Args, Command, ConfigCommand};

/// Used when neither the flag, the config file nor a home directory gives a path.
const FALLBACK_DATABASE_PATH: &str = "social-hub.db";

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let json = args.json;

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err, json);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let loaded_config = load_default_file_config()?;
    init_tracing(&args, &loaded_config);
    debug!(?args, "CLI arguments parsed");

    let file_config = loaded_config.config.clone().unwrap_or_default();
    let settings = file_config.storage_settings(StorageSettings::default());
    let database_path =
        resolve_database_path(args.database.as_ref(), file_config.database_path.as_ref());

    match &args.command {
        Command::Validate { url, platform } => {
            commands::run_validate_command(url, platform.as_deref(), args.json)
        }
        Command::Placeholder { key } => commands::run_placeholder_command(key, args.json),
        Command::Config {
            command: ConfigCommand::Show,
        } => commands::run_config_show_command(&loaded_config, &settings, &database_path, args.json),
        Command::Sources { command } => {
            let storage = open_storage(&database_path, settings).await?;
            let registry = SourceRegistry::new(storage);
            commands::run_sources_command(&registry, command, args.json).await
        }
        Command::Drafts { command } => {
            let storage = open_storage(&database_path, settings).await?;
            let store = DraftStore::new(storage);
            commands::run_drafts_command(&store, command, args.json).await
        }
        Command::Store { command } => {
            let storage = open_storage(&database_path, settings).await?;
            commands::run_store_command(&storage, command, args.json).await
        }
    }
}

/// Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info.
fn init_tracing(args: &Args, loaded_config: &LoadedConfig) {
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => loaded_config
                .config
                .as_ref()
                .and_then(|config| config.verbosity)
                .map_or("info", app_config::VerbositySetting::filter),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}

fn resolve_database_path(flag: Option<&PathBuf>, configured: Option<&PathBuf>) -> PathBuf {
    flag.or(configured)
        .cloned()
        .or_else(resolve_default_database_path)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATABASE_PATH))
}

async fn open_storage(database_path: &Path, settings: StorageSettings) -> Result<SafeStorage> {
    let db = Database::new(database_path)
        .await
        .with_context(|| format!("Failed to open database '{}'", database_path.display()))?;
    info!(path = %database_path.display(), namespace = %settings.namespace, "storage ready");

    Ok(SafeStorage::new(Arc::new(SqliteBackend::new(db)), settings))
}

fn report_failure(err: &anyhow::Error, json: bool) {
    let Some(app_error) = err.downcast_ref::<AppError>() else {
        eprintln!("Error: {err:#}");
        return;
    };

    if json && let Ok(rendered) = serde_json::to_string_pretty(app_error) {
        eprintln!("{rendered}");
        return;
    }
    for line in output::display_error_lines(&format_error_for_display(app_error)) {
        eprintln!("{line}");
    }
}
