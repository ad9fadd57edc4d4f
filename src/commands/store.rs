//! Store command handlers: raw access to persisted keys.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{Value, json};
use social_hub_core::{RetryPolicy, SafeStorage};
use social_hub_core::failure::{ErrorContext, ErrorDetails, ErrorKind, create_error};

use crate::cli::StoreCommand;
use crate::output;

pub async fn run_store_command(
    storage: &SafeStorage,
    command: &StoreCommand,
    json: bool,
) -> Result<()> {
    match command {
        StoreCommand::Get { key } => {
            let value = storage.load::<Value>(key).await?;
            match (value, json) {
                (value, true) => output::print_json(&value)?,
                (Some(value), false) => println!("{}", serde_json::to_string_pretty(&value)?),
                (None, false) => println!("(not set)"),
            }
        }
        StoreCommand::Set {
            key,
            value: raw,
            attempts,
            retry_delay_ms,
        } => {
            let value = parse_value(key, raw)?;
            let policy = call_policy(&storage.settings().retry, *attempts, *retry_delay_ms);
            storage.save_with(key, &value, &policy).await?;
            report(json, "saved", key)?;
        }
        StoreCommand::Remove { key } => {
            storage.remove(key).await?;
            report(json, "removed", key)?;
        }
        StoreCommand::Clear => {
            let removed = storage.clear_all().await?;
            if json {
                output::print_json(&json!({ "removed": removed }))?;
            } else {
                println!("Removed {removed} key(s)");
            }
        }
        StoreCommand::Info => {
            let info = storage.get_storage_info().await?;
            if json {
                output::print_json(&info)?;
            } else {
                println!("used = {}", output::format_bytes(info.used));
                println!("available = {}", output::format_bytes(info.available));
                println!("total = {}", output::format_bytes(info.total));
                println!("keys = {}", info.keys.join(", "));
            }
        }
        StoreCommand::Export { output: path } => {
            let exported = storage.export_data().await;
            let rendered = serde_json::to_string_pretty(&exported)?;
            match path {
                Some(path) => {
                    fs::write(path, rendered).with_context(|| {
                        format!("Failed to write export file '{}'", path.display())
                    })?;
                    if !json {
                        println!("Exported {} key(s) to {}", exported.len(), path.display());
                    }
                }
                None => println!("{rendered}"),
            }
        }
        StoreCommand::Import { file } => {
            let data = read_export(file)?;
            storage.import_data(&data).await?;
            if json {
                output::print_json(&json!({ "imported": data.len() }))?;
            } else {
                println!("Imported {} key(s)", data.len());
            }
        }
    }
    Ok(())
}

fn report(json: bool, action: &str, key: &str) -> Result<()> {
    if json {
        output::print_json(&json!({ "key": key, "status": action }))
    } else {
        println!("{action} {key}");
        Ok(())
    }
}

/// The handle's policy with any per-call overrides applied.
fn call_policy(
    default: &RetryPolicy,
    attempts: Option<u32>,
    retry_delay_ms: Option<u64>,
) -> RetryPolicy {
    RetryPolicy::new(
        attempts.unwrap_or(default.max_attempts()),
        retry_delay_ms.map_or(default.base_delay(), Duration::from_millis),
        default.backoff(),
    )
}

fn parse_value(key: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|e| {
        create_error(
            ErrorKind::FormInvalidInput,
            Some(ErrorDetails::new().field(key)),
            Some(ErrorContext::new("StoreCommand", "set").with_data(json!({ "key": key }))),
        )
        .with_cause(e)
        .into()
    })
}

fn read_export(path: &Path) -> Result<BTreeMap<String, Value>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Import file '{}' is not a JSON object", path.display()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use social_hub_core::{AppError, MemoryBackend, StorageSettings};

    fn storage() -> SafeStorage {
        SafeStorage::new(Arc::new(MemoryBackend::new()), StorageSettings::default())
    }

    #[tokio::test]
    async fn test_store_set_then_get() {
        let storage = storage();
        let set = StoreCommand::Set {
            key: "prefs".into(),
            value: r#"{"theme":"dark"}"#.into(),
            attempts: None,
            retry_delay_ms: None,
        };
        run_store_command(&storage, &set, false).await.unwrap();

        let value: Option<Value> = storage.load("prefs").await.unwrap();
        assert_eq!(value, Some(json!({ "theme": "dark" })));
    }

    #[tokio::test]
    async fn test_store_set_invalid_json_is_invalid_input() {
        let set = StoreCommand::Set {
            key: "prefs".into(),
            value: "{not json".into(),
            attempts: Some(1),
            retry_delay_ms: None,
        };
        let err = run_store_command(&storage(), &set, false).await.unwrap_err();
        let app_error = err.downcast_ref::<AppError>().unwrap();
        assert_eq!(app_error.code(), ErrorKind::FormInvalidInput);
    }

    #[test]
    fn test_call_policy_overrides_only_given_fields() {
        let default = RetryPolicy::default();
        assert_eq!(call_policy(&default, None, None), default);

        let policy = call_policy(&default, Some(5), None);
        assert_eq!(policy.max_attempts(), 5);
        assert_eq!(policy.base_delay(), Duration::from_secs(1));

        let policy = call_policy(&default, None, Some(250));
        assert_eq!(policy.max_attempts(), 3);
        assert_eq!(policy.base_delay(), Duration::from_millis(250));
    }

    #[tokio::test]
    async fn test_store_export_import_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dump.json");

        let source = storage();
        source.save("a", &json!([1, 2])).await.unwrap();
        let export = StoreCommand::Export {
            output: Some(path.clone()),
        };
        run_store_command(&source, &export, true).await.unwrap();

        let target = storage();
        let import = StoreCommand::Import { file: path };
        run_store_command(&target, &import, true).await.unwrap();
        let value: Option<Value> = target.load("a").await.unwrap();
        assert_eq!(value, Some(json!([1, 2])));
    }

    #[tokio::test]
    async fn test_store_import_missing_file_fails() {
        let import = StoreCommand::Import {
            file: "/nonexistent/dump.json".into(),
        };
        let err = run_store_command(&storage(), &import, false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read import file"));
    }
}
