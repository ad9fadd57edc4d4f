//! Config command handlers: show effective configuration.

use std::path::Path;

use anyhow::Result;
use serde_json::json;
use social_hub_core::StorageSettings;

use crate::app_config::{LoadedConfig, VerbositySetting};
use crate::output;

pub fn run_config_show_command(
    loaded_config: &LoadedConfig,
    settings: &StorageSettings,
    database_path: &Path,
    json: bool,
) -> Result<()> {
    let resolved_path = loaded_config.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    let verbosity = loaded_config
        .config
        .as_ref()
        .and_then(|config| config.verbosity)
        .unwrap_or(VerbositySetting::Default);
    let freshness_days = settings.freshness.as_secs() / 86_400;
    let retry_delay_ms = settings.retry.base_delay().as_millis();

    if json {
        return output::print_json(&json!({
            "config_path": resolved_path,
            "config_file": loaded_config.config.is_some(),
            "database_path": database_path.display().to_string(),
            "namespace": settings.namespace,
            "quota_bytes": settings.quota_bytes,
            "freshness_days": freshness_days,
            "save_attempts": settings.retry.max_attempts(),
            "retry_delay_ms": retry_delay_ms,
            "verbosity": verbosity.as_str(),
        }));
    }

    println!("config_path = {resolved_path}");
    println!(
        "config_file = {}",
        if loaded_config.config.is_some() {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    println!("database_path = {}", database_path.display());
    println!("namespace = {}", settings.namespace);
    println!("quota_bytes = {}", settings.quota_bytes);
    println!("freshness_days = {freshness_days}");
    println!("save_attempts = {}", settings.retry.max_attempts());
    println!("retry_delay_ms = {retry_delay_ms}");
    println!("verbosity = {}", verbosity.as_str());

    Ok(())
}
