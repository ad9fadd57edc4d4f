//! The runtime error value carried across component boundaries.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::kind::{ErrorDetails, ErrorKind, Severity};
use crate::clock::now_millis;

/// Shared, clonable underlying cause.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Where and while doing what an error happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorContext {
    pub component: String,
    pub action: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl ErrorContext {
    /// Creates a context stamped with the current time.
    #[must_use]
    pub fn new(component: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            component: component.into(),
            action: action.into(),
            data: Value::Null,
            timestamp: now_millis(),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.component, self.action)?;
        if !self.data.is_null() {
            write!(f, " {}", self.data)?;
        }
        Ok(())
    }
}

/// An error classified into the [`ErrorKind`] taxonomy.
///
/// Created at the point of failure, optionally enriched with context, then
/// logged and/or shown to the user. Never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct AppError {
    code: ErrorKind,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    suggestions: Vec<String>,
    severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    context: Option<ErrorContext>,
    #[serde(skip)]
    cause: Option<Cause>,
}

impl AppError {
    /// Builds an error by rendering the template for `kind`.
    #[must_use]
    pub fn new(kind: ErrorKind, details: Option<&ErrorDetails>) -> Self {
        let template = kind.render(details);
        Self {
            code: kind,
            message: template.message.to_string(),
            details: template.details,
            suggestions: template
                .suggestions
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            severity: template.severity,
            context: None,
            cause: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    #[must_use]
    pub fn with_cause<E>(self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.with_shared_cause(Arc::new(cause))
    }

    #[must_use]
    pub fn with_shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    #[must_use]
    pub fn code(&self) -> ErrorKind {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn context(&self) -> Option<&ErrorContext> {
        self.context.as_ref()
    }

    #[must_use]
    pub fn cause(&self) -> Option<&Cause> {
        self.cause.as_ref()
    }

    /// Returns `true` if this error has the given kind.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.code == kind
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Creates an [`AppError`] for `kind`, rendering its template with `details`
/// and attaching `context`.
#[must_use]
pub fn create_error(
    kind: ErrorKind,
    details: Option<ErrorDetails>,
    context: Option<ErrorContext>,
) -> AppError {
    let error = AppError::new(kind, details.as_ref());
    match context {
        Some(context) => error.with_context(context),
        None => error,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_error_renders_template() {
        let err = create_error(
            ErrorKind::FormRequiredField,
            Some(ErrorDetails::new().field("URL")),
            None,
        );
        assert_eq!(err.code(), ErrorKind::FormRequiredField);
        assert_eq!(err.message(), "Required field missing");
        assert_eq!(err.details(), Some("The field \"URL\" is required"));
        assert_eq!(err.severity(), Severity::Low);
        assert_eq!(err.suggestions().len(), 2);
        assert!(err.context().is_none());
    }

    #[test]
    fn test_create_error_attaches_context() {
        let ctx = ErrorContext::new("SafeStorage", "save")
            .with_data(serde_json::json!({ "key": "k", "attempt": 2 }));
        let err = create_error(ErrorKind::StorageSaveFailed, None, Some(ctx.clone()));
        assert_eq!(err.context(), Some(&ctx));
        assert!(ctx.timestamp > 0);
    }

    #[test]
    fn test_display_is_message() {
        let err = AppError::new(ErrorKind::ApiRateLimit, None);
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_cause_is_kept() {
        let io = std::io::Error::other("disk gone");
        let err = AppError::new(ErrorKind::StorageSaveFailed, None).with_cause(io);
        assert_eq!(err.cause().unwrap().to_string(), "disk gone");
        assert_eq!(StdError::source(&err).unwrap().to_string(), "disk gone");
    }

    #[test]
    fn test_serialize_skips_cause_and_empty_fields() {
        let err = AppError::new(ErrorKind::UrlInvalidFormat, None);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "URL_INVALID_FORMAT");
        assert_eq!(json["severity"], "medium");
        assert!(json.get("details").is_none());
        assert!(json.get("cause").is_none());
    }

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("Registry", "add");
        assert_eq!(ctx.to_string(), "Registry::add");
    }
}
