//! Persistence seam for [`SafeStorage`](super::SafeStorage).
//!
//! A backend is a flat string-keyed get/set/remove/enumerate surface. It
//! knows nothing about namespaces or envelopes.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use super::retry::FailureType;

/// Structured classification for backend failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Backend capacity is exhausted; retrying will not help.
    QuotaExceeded,
    /// `SQLite` returned busy/locked under concurrent access.
    BusyOrLocked,
    /// Constraint failure (unique/check/not-null).
    ConstraintViolation,
    /// Connection pool timed out waiting for a free connection.
    PoolTimeout,
    /// Connection pool is closed.
    PoolClosed,
    /// Filesystem or transport IO failure.
    Io,
    /// Unclassified failure.
    Other,
}

impl BackendErrorKind {
    #[must_use]
    pub fn from_sqlx(error: &sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => Self::PoolTimeout,
            sqlx::Error::PoolClosed => Self::PoolClosed,
            sqlx::Error::Io(_) => Self::Io,
            sqlx::Error::Database(database_error) => {
                classify_database_error(database_error.as_ref())
            }
            _ => Self::Other,
        }
    }

    /// Whether a failed write of this kind is worth retrying.
    #[must_use]
    pub fn failure_type(self) -> FailureType {
        match self {
            Self::QuotaExceeded | Self::ConstraintViolation | Self::PoolClosed => {
                FailureType::Permanent
            }
            Self::BusyOrLocked | Self::PoolTimeout | Self::Io | Self::Other => {
                FailureType::Transient
            }
        }
    }
}

impl fmt::Display for BackendErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::QuotaExceeded => "quota_exceeded",
            Self::BusyOrLocked => "busy_or_locked",
            Self::ConstraintViolation => "constraint_violation",
            Self::PoolTimeout => "pool_timeout",
            Self::PoolClosed => "pool_closed",
            Self::Io => "io",
            Self::Other => "other",
        };
        write!(f, "{label}")
    }
}

fn classify_database_error(
    database_error: &(dyn sqlx::error::DatabaseError + 'static),
) -> BackendErrorKind {
    let code = database_error.code();
    match code.as_deref() {
        Some("SQLITE_BUSY" | "SQLITE_LOCKED" | "5" | "6") => return BackendErrorKind::BusyOrLocked,
        Some("SQLITE_FULL" | "13") => return BackendErrorKind::QuotaExceeded,
        _ => {}
    }

    if database_error.is_unique_violation()
        || database_error.is_check_violation()
        || code
            .as_deref()
            .is_some_and(|value| value.starts_with("SQLITE_CONSTRAINT"))
    {
        return BackendErrorKind::ConstraintViolation;
    }

    let message = database_error.message().to_ascii_lowercase();
    if message.contains("database is locked") || message.contains("database is busy") {
        return BackendErrorKind::BusyOrLocked;
    }
    if message.contains("disk is full") {
        return BackendErrorKind::QuotaExceeded;
    }

    BackendErrorKind::Other
}

/// A failed backend call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend error ({kind}): {message}")]
pub struct BackendError {
    pub kind: BackendErrorKind,
    pub message: String,
}

impl BackendError {
    #[must_use]
    pub fn new(kind: BackendErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(BackendErrorKind::QuotaExceeded, message)
    }

    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        self.kind == BackendErrorKind::QuotaExceeded
    }
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        Self {
            kind: BackendErrorKind::from_sqlx(&err),
            message: err.to_string(),
        }
    }
}

/// Flat string key-value store.
///
/// Implementations must be safe to share across tasks; callers that need
/// ordering on a single key serialize their own calls.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Returns the raw value for `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn remove(&self, key: &str) -> Result<(), BackendError>;

    /// Lists every key in the backend, including foreign ones.
    async fn keys(&self) -> Result<Vec<String>, BackendError>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message() {
        let err = BackendError::new(BackendErrorKind::Io, "disk unplugged");
        let msg = err.to_string();
        assert!(msg.contains("io"));
        assert!(msg.contains("disk unplugged"));
    }

    #[test]
    fn test_quota_is_permanent() {
        let err = BackendError::quota_exceeded("capacity reached");
        assert!(err.is_quota_exceeded());
        assert_eq!(err.kind.failure_type(), FailureType::Permanent);
        assert_eq!(
            BackendErrorKind::BusyOrLocked.failure_type(),
            FailureType::Transient
        );
    }

    #[test]
    fn test_from_sqlx_pool_errors() {
        assert_eq!(
            BackendError::from(sqlx::Error::PoolTimedOut).kind,
            BackendErrorKind::PoolTimeout
        );
        assert_eq!(
            BackendError::from(sqlx::Error::PoolClosed).kind,
            BackendErrorKind::PoolClosed
        );
    }
}
