//! Registry of user-registered inspiration sources.
//!
//! Sources are kept as one list under the `inspirationSources` storage key.
//! Adding a source validates and normalizes its URL against the platform
//! implied by its kind and rejects duplicates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::clock::now_millis;
use crate::failure::{AppError, ErrorContext, ErrorDetails, ErrorKind, create_error, log_error};
use crate::storage::SafeStorage;
use crate::validator::validate;

/// Storage key holding the source list.
pub const SOURCES_KEY: &str = "inspirationSources";

const COMPONENT: &str = "SourceRegistry";

/// What kind of place a source is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Youtube,
    Linkedin,
    Twitter,
    Instagram,
    Tiktok,
    Website,
    Blog,
}

impl SourceKind {
    pub const ALL: [Self; 7] = [
        Self::Youtube,
        Self::Linkedin,
        Self::Twitter,
        Self::Instagram,
        Self::Tiktok,
        Self::Website,
        Self::Blog,
    ];

    /// Lowercase key, also used as the expected platform during validation.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Instagram => "instagram",
            Self::Tiktok => "tiktok",
            Self::Website => "website",
            Self::Blog => "blog",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error returned when parsing an unknown source kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown source kind '{0}' (expected one of: youtube, linkedin, twitter, instagram, tiktok, website, blog)")]
pub struct UnknownSourceKind(pub String);

impl FromStr for SourceKind {
    type Err = UnknownSourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("x") {
            return Ok(Self::Twitter);
        }
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSourceKind(s.to_string()))
    }
}

/// Health of a source after its last scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStatus {
    Active,
    Inactive,
    Error,
}

/// A registered source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspirationSource {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Normalized URL.
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_scraped: Option<u64>,
    pub status: SourceStatus,
}

/// CRUD over the persisted source list.
#[derive(Debug, Clone)]
pub struct SourceRegistry {
    storage: SafeStorage,
}

impl SourceRegistry {
    #[must_use]
    pub fn new(storage: SafeStorage) -> Self {
        Self { storage }
    }

    /// Returns all sources in insertion order.
    ///
    /// # Errors
    ///
    /// Propagates the storage failure.
    pub async fn list(&self) -> Result<Vec<InspirationSource>, AppError> {
        self.storage.load_or(SOURCES_KEY, Vec::new()).await
    }

    /// Registers a source.
    ///
    /// # Errors
    ///
    /// - `FORM_REQUIRED_FIELD` naming "Source Type", "URL" or "Display Name"
    /// - the URL rejection's error (format, domain, platform mismatch, ...)
    /// - `FORM_DUPLICATE_ENTRY` for an existing URL or (case-insensitive) name
    /// - any storage failure
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        kind: Option<SourceKind>,
        url: &str,
        name: &str,
    ) -> Result<InspirationSource, AppError> {
        let context = || {
            ErrorContext::new(COMPONENT, "addSource")
                .with_data(json!({ "type": kind, "url": url, "name": name }))
        };
        let required = |field: &str| {
            let error = create_error(
                ErrorKind::FormRequiredField,
                Some(ErrorDetails::new().field(field)),
                Some(context()),
            );
            log_error(&error);
            error
        };

        let Some(kind) = kind else {
            return Err(required("Source Type"));
        };
        if url.trim().is_empty() {
            return Err(required("URL"));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(required("Display Name"));
        }

        let validated = validate(url, Some(kind.key()))
            .into_result()
            .map_err(|rejection| {
                let error = rejection.to_app_error(url).with_context(context());
                log_error(&error);
                error
            })?;

        let mut sources = self.list().await?;
        let duplicate = sources.iter().any(|source| {
            source.url == validated.normalized_url || source.name.to_lowercase() == name.to_lowercase()
        });
        if duplicate {
            let error = create_error(
                ErrorKind::FormDuplicateEntry,
                Some(ErrorDetails::new().url(&validated.normalized_url).field(name)),
                Some(context()),
            );
            log_error(&error);
            return Err(error);
        }

        let source = InspirationSource {
            id: next_id(&sources),
            kind,
            url: validated.normalized_url,
            name: name.to_string(),
            description: None,
            last_scraped: None,
            status: SourceStatus::Active,
        };
        sources.push(source.clone());
        self.storage.save(SOURCES_KEY, &sources).await?;

        info!(id = %source.id, url = %source.url, "source added");
        Ok(source)
    }

    /// Removes the source with `id` and returns it.
    ///
    /// # Errors
    ///
    /// `UNKNOWN_ERROR` ("Source not found") for an unknown id; any storage
    /// failure.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<InspirationSource, AppError> {
        let mut sources = self.list().await?;
        let index = position(&sources, id, "removeSource")?;
        let removed = sources.remove(index);
        self.storage.save(SOURCES_KEY, &sources).await?;
        debug!(id, "source removed");
        Ok(removed)
    }

    /// Records a scrape outcome: sets `status` and stamps `last_scraped`.
    ///
    /// # Errors
    ///
    /// Same as [`remove`](Self::remove).
    #[instrument(skip(self))]
    pub async fn mark_scraped(
        &self,
        id: &str,
        status: SourceStatus,
    ) -> Result<InspirationSource, AppError> {
        let mut sources = self.list().await?;
        let index = position(&sources, id, "markScraped")?;
        let source = &mut sources[index];
        source.status = status;
        source.last_scraped = Some(now_millis());
        let updated = source.clone();
        self.storage.save(SOURCES_KEY, &sources).await?;
        Ok(updated)
    }
}

fn position(sources: &[InspirationSource], id: &str, action: &str) -> Result<usize, AppError> {
    sources.iter().position(|s| s.id == id).ok_or_else(|| {
        let error = create_error(
            ErrorKind::UnknownError,
            Some(ErrorDetails::new().message("Source not found")),
            Some(ErrorContext::new(COMPONENT, action).with_data(json!({ "id": id }))),
        );
        log_error(&error);
        error
    })
}

/// Millisecond timestamp, bumped past any id already in use.
fn next_id(sources: &[InspirationSource]) -> String {
    let mut candidate = now_millis();
    while sources.iter().any(|s| s.id == candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}
