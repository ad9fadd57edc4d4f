//! Inspiration source command handlers.

use anyhow::Result;
use social_hub_core::SourceRegistry;

use crate::cli::{SourceAddArgs, SourcesCommand};
use crate::output;

const NAME_COLUMN_WIDTH: usize = 24;

pub async fn run_sources_command(
    registry: &SourceRegistry,
    command: &SourcesCommand,
    json: bool,
) -> Result<()> {
    match command {
        SourcesCommand::Add(args) => run_sources_add(registry, args, json).await,
        SourcesCommand::List => run_sources_list(registry, json).await,
        SourcesCommand::Remove { id } => {
            let removed = registry.remove(id).await?;
            if json {
                output::print_json(&removed)?;
            } else {
                println!("Removed source {} ({})", removed.id, removed.name);
            }
            Ok(())
        }
    }
}

async fn run_sources_add(registry: &SourceRegistry, args: &SourceAddArgs, json: bool) -> Result<()> {
    let source = registry.add(args.kind, &args.url, &args.name).await?;
    if json {
        output::print_json(&source)?;
    } else {
        println!("Added source {}", source.id);
        println!("  name = {}", source.name);
        println!("  type = {}", source.kind);
        println!("  url = {}", source.url);
    }
    Ok(())
}

async fn run_sources_list(registry: &SourceRegistry, json: bool) -> Result<()> {
    let sources = registry.list().await?;
    if json {
        return output::print_json(&sources);
    }
    if sources.is_empty() {
        println!("No inspiration sources yet. Add one with `social-hub sources add`.");
        return Ok(());
    }

    let url_width = output::terminal_width()
        .saturating_sub(NAME_COLUMN_WIDTH + 32)
        .max(20);
    for source in &sources {
        println!(
            "{:<15} {:<10} {:<width$} {}",
            source.id,
            source.kind.to_string(),
            output::truncate_to_width(&source.name, NAME_COLUMN_WIDTH),
            output::truncate_to_width(&source.url, url_width),
            width = NAME_COLUMN_WIDTH,
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use social_hub_core::{
        AppError, ErrorKind, MemoryBackend, SafeStorage, SourceKind, StorageSettings,
    };

    fn registry() -> SourceRegistry {
        SourceRegistry::new(SafeStorage::new(
            Arc::new(MemoryBackend::new()),
            StorageSettings::default(),
        ))
    }

    #[tokio::test]
    async fn test_sources_add_then_remove() {
        let registry = registry();
        let add = SourcesCommand::Add(SourceAddArgs {
            kind: Some(SourceKind::Youtube),
            url: "youtube.com/@rustlang".into(),
            name: "Rust".into(),
        });
        run_sources_command(&registry, &add, true).await.unwrap();

        let sources = registry.list().await.unwrap();
        assert_eq!(sources.len(), 1);

        let remove = SourcesCommand::Remove {
            id: sources[0].id.clone(),
        };
        run_sources_command(&registry, &remove, false).await.unwrap();
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sources_list_empty() {
        run_sources_command(&registry(), &SourcesCommand::List, false)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_sources_add_missing_kind_fails() {
        let add = SourcesCommand::Add(SourceAddArgs {
            kind: None,
            url: "youtube.com/@rustlang".into(),
            name: "Rust".into(),
        });
        let err = run_sources_command(&registry(), &add, false)
            .await
            .unwrap_err();
        let app_error = err.downcast_ref::<AppError>().unwrap();
        assert_eq!(app_error.code(), ErrorKind::FormRequiredField);
        assert_eq!(app_error.details(), Some("The field \"Source Type\" is required"));
    }
}
