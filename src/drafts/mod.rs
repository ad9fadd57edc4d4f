//! Content drafts and their publish schedule.
//!
//! Drafts are kept newest-first as one list under the `contentDrafts`
//! storage key. Scheduling is not a separate entity: a scheduled draft is a
//! draft with status [`DraftStatus::Scheduled`] and a `scheduledAt`
//! timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::clock::now_millis;
use crate::failure::{AppError, ErrorContext, ErrorDetails, ErrorKind, create_error, log_error};
use crate::storage::SafeStorage;

/// Storage key holding the draft list.
pub const DRAFTS_KEY: &str = "contentDrafts";

const COMPONENT: &str = "DraftStore";

/// Where a draft is meant to be published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Linkedin,
    Twitter,
    Instagram,
    Tiktok,
    Threads,
    Newsletter,
}

impl Channel {
    pub const ALL: [Self; 6] = [
        Self::Linkedin,
        Self::Twitter,
        Self::Instagram,
        Self::Tiktok,
        Self::Threads,
        Self::Newsletter,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
            Self::Threads => "threads",
            Self::Newsletter => "newsletter",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown channel '{0}' (expected one of: linkedin, twitter, instagram, tiktok, threads, newsletter)")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("x") {
            return Ok(Self::Twitter);
        }
        Self::ALL
            .into_iter()
            .find(|channel| channel.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

/// Lifecycle of a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Draft,
    Ready,
    Scheduled,
    Published,
    Failed,
}

impl DraftStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Ready => "ready",
            Self::Scheduled => "scheduled",
            Self::Published => "published",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DraftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown draft status '{0}' (expected one of: draft, ready, scheduled, published, failed)")]
pub struct UnknownDraftStatus(pub String);

impl FromStr for DraftStatus {
    type Err = UnknownDraftStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        [
            Self::Draft,
            Self::Ready,
            Self::Scheduled,
            Self::Published,
            Self::Failed,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| UnknownDraftStatus(s.to_string()))
    }
}

/// A piece of content waiting to be published.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDraft {
    pub id: String,
    pub platform: Channel,
    #[serde(default)]
    pub title: String,
    pub content: String,
    /// Topic the draft was written from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub status: DraftStatus,
    /// Set exactly when `status` is `scheduled`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Fields supplied when creating a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDraft {
    pub platform: Option<Channel>,
    pub title: String,
    pub content: String,
    pub topic: Option<String>,
}

/// CRUD and scheduling over the persisted draft list.
#[derive(Debug, Clone)]
pub struct DraftStore {
    storage: SafeStorage,
}

impl DraftStore {
    #[must_use]
    pub fn new(storage: SafeStorage) -> Self {
        Self { storage }
    }

    /// Returns all drafts, newest first.
    ///
    /// # Errors
    ///
    /// Propagates the storage failure.
    pub async fn list(&self) -> Result<Vec<ContentDraft>, AppError> {
        self.storage.load_or(DRAFTS_KEY, Vec::new()).await
    }

    /// Scheduled drafts due after `now`, soonest first.
    ///
    /// # Errors
    ///
    /// Propagates the storage failure.
    pub async fn upcoming(&self, now: DateTime<Utc>) -> Result<Vec<ContentDraft>, AppError> {
        let mut upcoming: Vec<ContentDraft> = self
            .list()
            .await?
            .into_iter()
            .filter(|draft| {
                draft.status == DraftStatus::Scheduled
                    && draft.scheduled_at.is_some_and(|at| at > now)
            })
            .collect();
        upcoming.sort_by_key(|draft| draft.scheduled_at);
        Ok(upcoming)
    }

    /// Creates a draft with status `draft` at the front of the list.
    ///
    /// # Errors
    ///
    /// - `FORM_REQUIRED_FIELD` naming "Platform" or "Content"
    /// - any storage failure
    #[instrument(skip(self, new), fields(platform = ?new.platform))]
    pub async fn add(&self, new: NewDraft) -> Result<ContentDraft, AppError> {
        let required = |field: &str| {
            let error = create_error(
                ErrorKind::FormRequiredField,
                Some(ErrorDetails::new().field(field)),
                Some(
                    ErrorContext::new(COMPONENT, "addDraft")
                        .with_data(json!({ "platform": new.platform, "title": new.title })),
                ),
            );
            log_error(&error);
            error
        };

        let Some(platform) = new.platform else {
            return Err(required("Platform"));
        };
        if new.content.trim().is_empty() {
            return Err(required("Content"));
        }

        let mut drafts = self.list().await?;
        let now = Utc::now();
        let draft = ContentDraft {
            id: next_id(&drafts),
            platform,
            title: new.title.trim().to_string(),
            content: new.content,
            topic: new.topic.filter(|topic| !topic.trim().is_empty()),
            status: DraftStatus::Draft,
            scheduled_at: None,
            created_at: now,
            last_modified: now,
        };
        drafts.insert(0, draft.clone());
        self.storage.save(DRAFTS_KEY, &drafts).await?;

        info!(id = %draft.id, platform = %draft.platform, "draft added");
        Ok(draft)
    }

    /// Schedules a draft for `at`, replacing any earlier time.
    ///
    /// # Errors
    ///
    /// `UNKNOWN_ERROR` ("Draft not found") for an unknown id; any storage
    /// failure.
    #[instrument(skip(self))]
    pub async fn schedule(&self, id: &str, at: DateTime<Utc>) -> Result<ContentDraft, AppError> {
        self.update(id, "scheduleDraft", |draft| {
            draft.status = DraftStatus::Scheduled;
            draft.scheduled_at = Some(at);
        })
        .await
    }

    /// Moves a draft to `status`. Leaving `scheduled` clears the publish
    /// time, except for `published` and `failed` which keep it as a record.
    ///
    /// # Errors
    ///
    /// - `FORM_INVALID_INPUT` for `scheduled`; use [`schedule`](Self::schedule)
    /// - `UNKNOWN_ERROR` ("Draft not found") for an unknown id
    /// - any storage failure
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &str, status: DraftStatus) -> Result<ContentDraft, AppError> {
        if status == DraftStatus::Scheduled {
            let error = create_error(
                ErrorKind::FormInvalidInput,
                Some(
                    ErrorDetails::new()
                        .field("status")
                        .message("A scheduled draft needs a publish time"),
                ),
                Some(
                    ErrorContext::new(COMPONENT, "updateDraft")
                        .with_data(json!({ "id": id, "status": status })),
                ),
            );
            log_error(&error);
            return Err(error);
        }

        self.update(id, "updateDraft", |draft| {
            if matches!(status, DraftStatus::Draft | DraftStatus::Ready) {
                draft.scheduled_at = None;
            }
            draft.status = status;
        })
        .await
    }

    /// Deletes the draft with `id` and returns it.
    ///
    /// # Errors
    ///
    /// Same as [`schedule`](Self::schedule).
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<ContentDraft, AppError> {
        let mut drafts = self.list().await?;
        let index = position(&drafts, id, "deleteDraft")?;
        let removed = drafts.remove(index);
        self.storage.save(DRAFTS_KEY, &drafts).await?;
        debug!(id, "draft removed");
        Ok(removed)
    }

    async fn update<F>(&self, id: &str, action: &str, apply: F) -> Result<ContentDraft, AppError>
    where
        F: FnOnce(&mut ContentDraft),
    {
        let mut drafts = self.list().await?;
        let index = position(&drafts, id, action)?;
        let draft = &mut drafts[index];
        apply(draft);
        draft.last_modified = Utc::now();
        let updated = draft.clone();
        self.storage.save(DRAFTS_KEY, &drafts).await?;
        debug!(id, status = %updated.status, "draft updated");
        Ok(updated)
    }
}

fn position(drafts: &[ContentDraft], id: &str, action: &str) -> Result<usize, AppError> {
    drafts.iter().position(|d| d.id == id).ok_or_else(|| {
        let error = create_error(
            ErrorKind::UnknownError,
            Some(ErrorDetails::new().message("Draft not found")),
            Some(ErrorContext::new(COMPONENT, action).with_data(json!({ "id": id }))),
        );
        log_error(&error);
        error
    })
}

fn next_id(drafts: &[ContentDraft]) -> String {
    let mut candidate = now_millis();
    while drafts.iter().any(|d| d.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::storage::{MemoryBackend, StorageSettings};

    fn store() -> DraftStore {
        DraftStore::new(SafeStorage::new(
            Arc::new(MemoryBackend::new()),
            StorageSettings::default(),
        ))
    }

    fn new_draft(platform: Channel, content: &str) -> NewDraft {
        NewDraft {
            platform: Some(platform),
            title: "Ownership".into(),
            content: content.into(),
            topic: None,
        }
    }

    #[test]
    fn test_channel_from_str() {
        assert_eq!("LinkedIn".parse::<Channel>().unwrap(), Channel::Linkedin);
        assert_eq!("x".parse::<Channel>().unwrap(), Channel::Twitter);
        assert_eq!("newsletter".parse::<Channel>().unwrap(), Channel::Newsletter);
        assert!("myspace".parse::<Channel>().is_err());
    }

    #[test]
    fn test_draft_status_from_str() {
        assert_eq!("READY".parse::<DraftStatus>().unwrap(), DraftStatus::Ready);
        assert!("archived".parse::<DraftStatus>().is_err());
    }

    #[test]
    fn test_draft_serializes_camel_case() {
        let at = Utc.with_ymd_and_hms(2026, 11, 2, 9, 30, 0).unwrap();
        let draft = ContentDraft {
            id: "1".into(),
            platform: Channel::Threads,
            title: String::new(),
            content: "hello".into(),
            topic: None,
            status: DraftStatus::Scheduled,
            scheduled_at: Some(at),
            created_at: at,
            last_modified: at,
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["platform"], "threads");
        assert_eq!(json["status"], "scheduled");
        assert_eq!(json["scheduledAt"], "2026-11-02T09:30:00Z");
        assert!(json.get("topic").is_none());

        let back: ContentDraft = serde_json::from_value(json).unwrap();
        assert_eq!(back, draft);
    }

    #[tokio::test]
    async fn test_add_requires_platform_then_content() {
        let store = store();
        let err = store.add(NewDraft::default()).await.unwrap_err();
        assert_eq!(err.code(), ErrorKind::FormRequiredField);
        assert_eq!(err.details(), Some("The field \"Platform\" is required"));

        let err = store
            .add(new_draft(Channel::Linkedin, "   "))
            .await
            .unwrap_err();
        assert_eq!(err.details(), Some("The field \"Content\" is required"));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_puts_newest_first() {
        let store = store();
        let first = store
            .add(new_draft(Channel::Linkedin, "first"))
            .await
            .unwrap();
        let second = store
            .add(NewDraft {
                topic: Some("Borrow checker".into()),
                ..new_draft(Channel::Twitter, "second")
            })
            .await
            .unwrap();

        assert_eq!(first.status, DraftStatus::Draft);
        assert_eq!(second.topic.as_deref(), Some("Borrow checker"));
        assert_ne!(first.id, second.id);

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_schedule_and_upcoming_order() {
        let store = store();
        let now = Utc::now();
        let late = store.add(new_draft(Channel::Linkedin, "late")).await.unwrap();
        let soon = store.add(new_draft(Channel::Instagram, "soon")).await.unwrap();
        let past = store.add(new_draft(Channel::Tiktok, "past")).await.unwrap();
        store.add(new_draft(Channel::Threads, "unscheduled")).await.unwrap();

        store.schedule(&late.id, now + Duration::days(2)).await.unwrap();
        let scheduled = store.schedule(&soon.id, now + Duration::hours(1)).await.unwrap();
        store.schedule(&past.id, now - Duration::hours(1)).await.unwrap();

        assert_eq!(scheduled.status, DraftStatus::Scheduled);
        assert!(scheduled.last_modified >= scheduled.created_at);

        let upcoming: Vec<String> = store
            .upcoming(now)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(upcoming, vec![soon.id, late.id]);
    }

    #[tokio::test]
    async fn test_set_status_rules() {
        let store = store();
        let draft = store.add(new_draft(Channel::Newsletter, "body")).await.unwrap();
        let at = Utc::now() + Duration::hours(3);
        store.schedule(&draft.id, at).await.unwrap();

        let err = store
            .set_status(&draft.id, DraftStatus::Scheduled)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorKind::FormInvalidInput);

        let published = store
            .set_status(&draft.id, DraftStatus::Published)
            .await
            .unwrap();
        assert_eq!(published.scheduled_at, Some(at));

        let back = store.set_status(&draft.id, DraftStatus::Ready).await.unwrap();
        assert_eq!(back.status, DraftStatus::Ready);
        assert_eq!(back.scheduled_at, None);
    }

    #[tokio::test]
    async fn test_remove_and_unknown_id() {
        let store = store();
        let draft = store.add(new_draft(Channel::Linkedin, "bye")).await.unwrap();
        assert_eq!(store.remove(&draft.id).await.unwrap().id, draft.id);
        assert!(store.list().await.unwrap().is_empty());

        let err = store.remove(&draft.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorKind::UnknownError);
        assert_eq!(err.details(), Some("Draft not found"));

        let err = store
            .schedule("nope", Utc::now())
            .await
            .unwrap_err();
        assert_eq!(err.details(), Some("Draft not found"));
    }
}
