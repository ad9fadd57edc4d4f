//! Mapping arbitrary failures into the taxonomy, plus logging and display.

use std::any::Any;
use std::error::Error as StdError;
use std::sync::Arc;

use serde::Serialize;

use super::app_error::{AppError, ErrorContext, create_error};
use super::kind::{ErrorDetails, ErrorKind, Severity};

/// Keyword signals checked in order; the first group with a hit wins.
const SIGNALS: [(ErrorKind, &[&str]); 3] = [
    (
        ErrorKind::ApiNetworkError,
        &["fetch", "network", "connection refused", "connection reset"],
    ),
    (ErrorKind::StorageQuotaExceeded, &["quota", "storage"]),
    (
        ErrorKind::ApiRateLimit,
        &["rate limit", "rate-limit", "too many requests"],
    ),
];

/// Classifies any error into an [`AppError`].
///
/// An error that already is an [`AppError`] is returned unchanged (its
/// context is kept, the new one ignored). Anything else is matched on its
/// message; the original error becomes the `cause`. Never panics.
#[must_use]
pub fn classify<E>(error: E, context: Option<ErrorContext>) -> AppError
where
    E: Into<Box<dyn StdError + Send + Sync + 'static>>,
{
    let boxed: Box<dyn StdError + Send + Sync + 'static> = error.into();
    match boxed.downcast::<AppError>() {
        Ok(app_error) => *app_error,
        Err(other) => {
            let message = other.to_string();
            classify_message(&message, context).with_shared_cause(Arc::from(other))
        }
    }
}

/// Classifies a bare failure message.
#[must_use]
pub fn classify_message(message: &str, context: Option<ErrorContext>) -> AppError {
    let kind = signal_kind(message);
    create_error(kind, Some(ErrorDetails::new().message(message)), context)
}

/// Classifies a panic payload (the only "thrown value" Rust has).
///
/// String payloads keep their text; anything else is reported generically.
#[must_use]
pub fn classify_panic(payload: &(dyn Any + Send), context: Option<ErrorContext>) -> AppError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string());
    create_error(
        ErrorKind::UnknownError,
        Some(ErrorDetails::new().message(message)),
        context,
    )
}

fn signal_kind(message: &str) -> ErrorKind {
    let lowered = message.to_lowercase();
    SIGNALS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map_or(ErrorKind::UnknownError, |(kind, _)| *kind)
}

/// Writes one structured diagnostic event for `error`.
///
/// Level follows severity: critical/high → ERROR, medium → WARN, low → INFO.
pub fn log_error(error: &AppError) {
    let details = error.details().unwrap_or("");
    let context = error
        .context()
        .map(ToString::to_string)
        .unwrap_or_default();
    let suggestions = error.suggestions().join("; ");
    let cause = error.cause().map(ToString::to_string).unwrap_or_default();

    macro_rules! emit {
        ($level:ident) => {
            tracing::$level!(
                code = %error.code(),
                severity = %error.severity(),
                details,
                context = %context,
                suggestions = %suggestions,
                cause = %cause,
                "{} ERROR: {}",
                error.severity().as_str().to_uppercase(),
                error.message()
            )
        };
    }

    match error.severity() {
        Severity::Critical | Severity::High => emit!(error),
        Severity::Medium => emit!(warn),
        Severity::Low => emit!(info),
    }
}

/// UI-facing projection of an [`AppError`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayError {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<String>>,
    pub severity: Severity,
}

/// Projects an error into title/description/suggestions for display.
#[must_use]
pub fn format_error_for_display(error: &AppError) -> DisplayError {
    DisplayError {
        title: error.message().to_string(),
        description: error
            .details()
            .unwrap_or("An error occurred while processing your request")
            .to_string(),
        suggestions: if error.suggestions().is_empty() {
            None
        } else {
            Some(error.suggestions().to_vec())
        },
        severity: error.severity(),
    }
}
