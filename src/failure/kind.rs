//! Closed set of error kinds and their rendered message templates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How prominently a caller should surface an error.
///
/// Severity never changes control flow inside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Returns the stable lowercase label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every failure this crate can report, grouped by area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    // URL validation
    UrlInvalidFormat,
    UrlMissingProtocol,
    UrlInvalidDomain,
    UrlPlatformMismatch,
    UrlSuspiciousDomain,
    UrlUnreachable,

    // Storage
    StorageSaveFailed,
    StorageLoadFailed,
    StorageQuotaExceeded,
    StorageCorruptedData,

    // External services
    ApiNetworkError,
    ApiRateLimit,
    ApiUnauthorized,
    ApiContentScrapingFailed,
    ApiAiGenerationFailed,

    // Form input
    FormRequiredField,
    FormInvalidInput,
    FormDuplicateEntry,

    // Catch-all
    UnknownError,
    FeatureNotAvailable,
}

impl ErrorKind {
    /// All kinds in declaration order.
    pub const ALL: [Self; 20] = [
        Self::UrlInvalidFormat,
        Self::UrlMissingProtocol,
        Self::UrlInvalidDomain,
        Self::UrlPlatformMismatch,
        Self::UrlSuspiciousDomain,
        Self::UrlUnreachable,
        Self::StorageSaveFailed,
        Self::StorageLoadFailed,
        Self::StorageQuotaExceeded,
        Self::StorageCorruptedData,
        Self::ApiNetworkError,
        Self::ApiRateLimit,
        Self::ApiUnauthorized,
        Self::ApiContentScrapingFailed,
        Self::ApiAiGenerationFailed,
        Self::FormRequiredField,
        Self::FormInvalidInput,
        Self::FormDuplicateEntry,
        Self::UnknownError,
        Self::FeatureNotAvailable,
    ];

    /// Returns the stable string code (e.g. `STORAGE_QUOTA_EXCEEDED`).
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::UrlInvalidFormat => "URL_INVALID_FORMAT",
            Self::UrlMissingProtocol => "URL_MISSING_PROTOCOL",
            Self::UrlInvalidDomain => "URL_INVALID_DOMAIN",
            Self::UrlPlatformMismatch => "URL_PLATFORM_MISMATCH",
            Self::UrlSuspiciousDomain => "URL_SUSPICIOUS_DOMAIN",
            Self::UrlUnreachable => "URL_UNREACHABLE",
            Self::StorageSaveFailed => "STORAGE_SAVE_FAILED",
            Self::StorageLoadFailed => "STORAGE_LOAD_FAILED",
            Self::StorageQuotaExceeded => "STORAGE_QUOTA_EXCEEDED",
            Self::StorageCorruptedData => "STORAGE_CORRUPTED_DATA",
            Self::ApiNetworkError => "API_NETWORK_ERROR",
            Self::ApiRateLimit => "API_RATE_LIMIT",
            Self::ApiUnauthorized => "API_UNAUTHORIZED",
            Self::ApiContentScrapingFailed => "API_CONTENT_SCRAPING_FAILED",
            Self::ApiAiGenerationFailed => "API_AI_GENERATION_FAILED",
            Self::FormRequiredField => "FORM_REQUIRED_FIELD",
            Self::FormInvalidInput => "FORM_INVALID_INPUT",
            Self::FormDuplicateEntry => "FORM_DUPLICATE_ENTRY",
            Self::UnknownError => "UNKNOWN_ERROR",
            Self::FeatureNotAvailable => "FEATURE_NOT_AVAILABLE",
        }
    }

    /// Renders the message template for this kind.
    ///
    /// Templates read only the detail fields they mention; anything else in
    /// `details` is ignored.
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn render(self, details: Option<&ErrorDetails>) -> ErrorTemplate {
        let d = details.cloned().unwrap_or_default();
        match self {
            Self::UrlInvalidFormat => ErrorTemplate {
                message: "Invalid URL format",
                details: d
                    .original_url
                    .map(|url| format!("The URL \"{url}\" is not properly formatted")),
                suggestions: &[
                    "Make sure the URL starts with http:// or https://",
                    "Check for typos in the domain name",
                    "Ensure the URL is complete and properly formatted",
                ],
                severity: Severity::Medium,
            },
            Self::UrlMissingProtocol => ErrorTemplate {
                message: "URL missing protocol",
                details: Some("URLs must start with http:// or https://".to_string()),
                suggestions: &[
                    "Add https:// to the beginning of your URL",
                    "Most modern websites use https://",
                ],
                severity: Severity::Low,
            },
            Self::UrlInvalidDomain => ErrorTemplate {
                message: "Invalid domain name",
                details: d
                    .domain
                    .map(|domain| format!("The domain \"{domain}\" appears to be invalid")),
                suggestions: &[
                    "Check the spelling of the domain name",
                    "Make sure the domain has a valid extension (.com, .org, etc.)",
                    "Verify the website exists and is accessible",
                ],
                severity: Severity::Medium,
            },
            Self::UrlPlatformMismatch => ErrorTemplate {
                message: "URL doesn't match selected platform",
                details: match (d.expected, d.detected) {
                    (Some(expected), Some(detected)) => {
                        Some(format!("Expected {expected} URL, but detected {detected}"))
                    }
                    _ => None,
                },
                suggestions: &[
                    "Make sure you've selected the correct platform type",
                    "Verify the URL belongs to the chosen social media platform",
                    "Try selecting \"Website\" if it's a general web URL",
                ],
                severity: Severity::Medium,
            },
            Self::UrlSuspiciousDomain => ErrorTemplate {
                message: "Suspicious or blocked domain",
                details: Some(
                    "This domain appears to be a test, local, or blocked domain".to_string(),
                ),
                suggestions: &[
                    "Use a real, publicly accessible website URL",
                    "Avoid localhost, test domains, or example URLs",
                    "Make sure the website is live and accessible",
                ],
                severity: Severity::High,
            },
            Self::UrlUnreachable => ErrorTemplate {
                message: "URL is not accessible",
                details: Some("The website could not be reached or is currently down".to_string()),
                suggestions: &[
                    "Check if the website is currently online",
                    "Verify your internet connection",
                    "Try again later if the site is temporarily down",
                    "Make sure the URL is correct and publicly accessible",
                ],
                severity: Severity::Medium,
            },
            Self::StorageSaveFailed => ErrorTemplate {
                message: "Failed to save data",
                details: Some(match d.key {
                    Some(key) => format!("Data for \"{key}\" could not be saved to storage"),
                    None => "Your data could not be saved to storage".to_string(),
                }),
                suggestions: &[
                    "Check that the storage location is writable",
                    "Free up some space if storage is full",
                    "Try saving again",
                ],
                severity: Severity::High,
            },
            Self::StorageLoadFailed => ErrorTemplate {
                message: "Failed to load saved data",
                details: Some("Previously saved data could not be loaded".to_string()),
                suggestions: &[
                    "Your saved data may be corrupted",
                    "Try clearing saved data and starting fresh",
                    "Check the logs for more details",
                ],
                severity: Severity::Medium,
            },
            Self::StorageQuotaExceeded => ErrorTemplate {
                message: "Storage quota exceeded",
                details: Some("Storage is full and cannot save more data".to_string()),
                suggestions: &[
                    "Clear some saved data to free up space",
                    "Remove old inspiration sources or topic ideas",
                    "Consider exporting your data before clearing",
                ],
                severity: Severity::High,
            },
            Self::StorageCorruptedData => ErrorTemplate {
                message: "Corrupted data detected",
                details: Some(
                    "Some saved data appears to be corrupted and cannot be loaded".to_string(),
                ),
                suggestions: &[
                    "Clear corrupted data and start fresh",
                    "Check the logs for more details",
                    "Report this issue if it persists",
                ],
                severity: Severity::Medium,
            },
            Self::ApiNetworkError => ErrorTemplate {
                message: "Network connection error",
                details: Some("Unable to connect to the service".to_string()),
                suggestions: &[
                    "Check your internet connection",
                    "Try again in a few moments",
                    "Disable any VPN or proxy that might interfere",
                ],
                severity: Severity::Medium,
            },
            Self::ApiRateLimit => ErrorTemplate {
                message: "Rate limit exceeded",
                details: Some("Too many requests made in a short time".to_string()),
                suggestions: &[
                    "Wait a few minutes before trying again",
                    "Reduce the number of sources processed at once",
                    "Consider upgrading your plan for higher limits",
                ],
                severity: Severity::Medium,
            },
            Self::ApiUnauthorized => ErrorTemplate {
                message: "Authentication required",
                details: Some("You need to be logged in to perform this action".to_string()),
                suggestions: &[
                    "Make sure you're logged in",
                    "Refresh the page and try again",
                    "Check if your session has expired",
                ],
                severity: Severity::High,
            },
            Self::ApiContentScrapingFailed => ErrorTemplate {
                message: "Failed to scrape content",
                details: d.url.map(|url| format!("Could not extract content from {url}")),
                suggestions: &[
                    "The website may be blocking automated access",
                    "Try a different URL from the same source",
                    "Some social media profiles may be private",
                    "Verify the URL is publicly accessible",
                ],
                severity: Severity::Medium,
            },
            Self::ApiAiGenerationFailed => ErrorTemplate {
                message: "AI generation failed",
                details: Some("The AI service could not process your request".to_string()),
                suggestions: &[
                    "Try again with different content",
                    "Reduce the amount of text being processed",
                    "Check if the service is temporarily unavailable",
                ],
                severity: Severity::Medium,
            },
            Self::FormRequiredField => ErrorTemplate {
                message: "Required field missing",
                details: d
                    .field
                    .map(|field| format!("The field \"{field}\" is required")),
                suggestions: &[
                    "Fill in all required fields before submitting",
                    "Check for any highlighted or marked fields",
                ],
                severity: Severity::Low,
            },
            Self::FormInvalidInput => ErrorTemplate {
                message: "Invalid input provided",
                details: d.field.map(|field| format!("Invalid value for \"{field}\"")),
                suggestions: &[
                    "Check the format requirements for each field",
                    "Make sure all inputs are properly formatted",
                ],
                severity: Severity::Low,
            },
            Self::FormDuplicateEntry => ErrorTemplate {
                message: "Duplicate entry detected",
                details: Some("This item already exists in your list".to_string()),
                suggestions: &[
                    "Check if you've already added this source",
                    "Use a different name or URL",
                    "Update the existing entry instead",
                ],
                severity: Severity::Low,
            },
            Self::UnknownError => ErrorTemplate {
                message: "An unexpected error occurred",
                details: Some(d.message.unwrap_or_else(|| "Something went wrong".to_string())),
                suggestions: &[
                    "Try the operation again",
                    "Check the logs for more details",
                    "Report this issue if it persists",
                ],
                severity: Severity::Medium,
            },
            Self::FeatureNotAvailable => ErrorTemplate {
                message: "Feature not available",
                details: Some("This feature is currently not available".to_string()),
                suggestions: &[
                    "Try again later",
                    "Check if you have the required permissions",
                    "Contact support if this feature should be available",
                ],
                severity: Severity::Low,
            },
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when parsing an unknown error code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code '{0}'")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorKind {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// A fully rendered template for one [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTemplate {
    pub message: &'static str,
    pub details: Option<String>,
    pub suggestions: &'static [&'static str],
    pub severity: Severity,
}

/// Values a template may interpolate, plus free-form diagnostic data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl ErrorDetails {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn original_url(mut self, value: impl Into<String>) -> Self {
        self.original_url = Some(value.into());
        self
    }

    #[must_use]
    pub fn domain(mut self, value: impl Into<String>) -> Self {
        self.domain = Some(value.into());
        self
    }

    #[must_use]
    pub fn mismatch(mut self, expected: impl Into<String>, detected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.detected = Some(detected.into());
        self
    }

    #[must_use]
    pub fn url(mut self, value: impl Into<String>) -> Self {
        self.url = Some(value.into());
        self
    }

    #[must_use]
    pub fn field(mut self, value: impl Into<String>) -> Self {
        self.field = Some(value.into());
        self
    }

    #[must_use]
    pub fn message(mut self, value: impl Into<String>) -> Self {
        self.message = Some(value.into());
        self
    }

    #[must_use]
    pub fn key(mut self, value: impl Into<String>) -> Self {
        self.key = Some(value.into());
        self
    }

    /// Attaches an extra diagnostic value that no template reads.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}
