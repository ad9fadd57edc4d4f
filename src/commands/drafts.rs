//! Content draft command handlers.

use anyhow::Result;
use chrono::Utc;
use social_hub_core::DraftStore;
use social_hub_core::drafts::{ContentDraft, NewDraft};

use crate::cli::{DraftAddArgs, DraftsCommand};
use crate::output;

const PREVIEW_WIDTH: usize = 48;

pub async fn run_drafts_command(
    store: &DraftStore,
    command: &DraftsCommand,
    json: bool,
) -> Result<()> {
    match command {
        DraftsCommand::Add(args) => {
            let draft = store.add(new_draft(args)).await?;
            report(&draft, "Added", json)
        }
        DraftsCommand::List { upcoming } => {
            let drafts = if *upcoming {
                store.upcoming(Utc::now()).await?
            } else {
                store.list().await?
            };
            print_drafts(&drafts, json)
        }
        DraftsCommand::Schedule { id, at } => {
            let draft = store.schedule(id, *at).await?;
            report(&draft, "Scheduled", json)
        }
        DraftsCommand::Status { id, status } => {
            let draft = store.set_status(id, *status).await?;
            report(&draft, "Updated", json)
        }
        DraftsCommand::Remove { id } => {
            let draft = store.remove(id).await?;
            report(&draft, "Removed", json)
        }
    }
}

fn new_draft(args: &DraftAddArgs) -> NewDraft {
    NewDraft {
        platform: args.platform,
        title: args.title.clone(),
        content: args.content.clone(),
        topic: args.topic.clone(),
    }
}

fn report(draft: &ContentDraft, action: &str, json: bool) -> Result<()> {
    if json {
        return output::print_json(draft);
    }
    println!("{action} draft {}", draft.id);
    println!("  platform = {}", draft.platform);
    println!("  status = {}", draft.status);
    if let Some(at) = draft.scheduled_at {
        println!("  scheduled = {}", at.to_rfc3339());
    }
    Ok(())
}

fn print_drafts(drafts: &[ContentDraft], json: bool) -> Result<()> {
    if json {
        return output::print_json(drafts);
    }
    if drafts.is_empty() {
        println!("No drafts. Create one with `social-hub drafts add`.");
        return Ok(());
    }
    for draft in drafts {
        let when = draft
            .scheduled_at
            .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        let label = if draft.title.is_empty() {
            draft.content.lines().next().unwrap_or_default()
        } else {
            draft.title.as_str()
        };
        println!(
            "{:<15} {:<10} {:<9} {:<16} {}",
            draft.id,
            draft.platform.to_string(),
            draft.status.to_string(),
            when,
            output::truncate_to_width(label, PREVIEW_WIDTH),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use chrono::Duration;
    use social_hub_core::{
        AppError, Channel, DraftStatus, ErrorKind, MemoryBackend, SafeStorage, StorageSettings,
    };

    fn store() -> DraftStore {
        DraftStore::new(SafeStorage::new(
            Arc::new(MemoryBackend::new()),
            StorageSettings::default(),
        ))
    }

    fn add_args(content: &str) -> DraftsCommand {
        DraftsCommand::Add(DraftAddArgs {
            platform: Some(Channel::Linkedin),
            title: String::new(),
            content: content.into(),
            topic: None,
        })
    }

    #[tokio::test]
    async fn test_drafts_add_schedule_remove() {
        let store = store();
        run_drafts_command(&store, &add_args("Five things about lifetimes"), false)
            .await
            .unwrap();
        let id = store.list().await.unwrap()[0].id.clone();

        let schedule = DraftsCommand::Schedule {
            id: id.clone(),
            at: Utc::now() + Duration::days(1),
        };
        run_drafts_command(&store, &schedule, true).await.unwrap();
        let upcoming = store.upcoming(Utc::now()).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].status, DraftStatus::Scheduled);

        run_drafts_command(&store, &DraftsCommand::List { upcoming: true }, false)
            .await
            .unwrap();
        run_drafts_command(&store, &DraftsCommand::Remove { id }, false)
            .await
            .unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_drafts_add_without_content_fails() {
        let err = run_drafts_command(&store(), &add_args(""), false)
            .await
            .unwrap_err();
        let app_error = err.downcast_ref::<AppError>().unwrap();
        assert_eq!(app_error.code(), ErrorKind::FormRequiredField);
    }

    #[tokio::test]
    async fn test_drafts_status_scheduled_is_rejected() {
        let store = store();
        run_drafts_command(&store, &add_args("body"), false)
            .await
            .unwrap();
        let id = store.list().await.unwrap()[0].id.clone();

        let status = DraftsCommand::Status {
            id,
            status: DraftStatus::Scheduled,
        };
        let err = run_drafts_command(&store, &status, false)
            .await
            .unwrap_err();
        let app_error = err.downcast_ref::<AppError>().unwrap();
        assert_eq!(app_error.code(), ErrorKind::FormInvalidInput);
    }
}
