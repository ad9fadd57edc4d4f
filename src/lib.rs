//! Social Hub Core Library
//!
//! Shared plumbing for a content-repurposing hub: a user pastes social
//! profile or content URLs, the hub validates and normalizes them, keeps
//! them as inspiration sources, and persists state with corruption
//! detection, quota checks and retries.
//!
//! # Architecture
//!
//! - [`validator`] - URL validation, platform detection and normalization
//! - [`failure`] - error taxonomy, classification and user-facing rendering
//! - [`storage`] - namespaced, versioned persistence over a pluggable backend
//! - [`db`] - SQLite connection and schema management
//! - [`sources`] - the inspiration source registry
//! - [`drafts`] - content drafts and their publish schedule
//! - [`scrape`] - content fetching through an external scrape service

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod clock;
pub mod db;
pub mod drafts;
pub mod failure;
pub mod scrape;
pub mod sources;
pub mod storage;
pub mod validator;

// Re-export commonly used types
pub use db::{Database, DbError};
pub use drafts::{Channel, ContentDraft, DraftStatus, DraftStore};
pub use failure::{AppError, ErrorKind, Severity, classify, create_error, format_error_for_display};
pub use scrape::{Scraper, fetch_content};
pub use sources::{InspirationSource, SourceKind, SourceRegistry};
pub use storage::{
    MemoryBackend, RetryPolicy, SafeStorage, SqliteBackend, StorageBackend, StorageSettings,
};
pub use validator::{Platform, UrlRejection, ValidationResult, validate};
