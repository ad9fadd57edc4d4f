//! Reasons a URL fails validation.

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::platform::Platform;
use crate::failure::{AppError, ErrorDetails, ErrorKind};

/// Maximum URL length to accept (standard browser limit).
pub const MAX_URL_LENGTH: usize = 2000;

/// Why a URL was rejected. `Display` is the human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    #[error("URL is required")]
    Required,

    #[error("URL cannot be empty")]
    Empty,

    #[error("URL is too long ({length} chars, max {MAX_URL_LENGTH})")]
    TooLong { length: usize },

    #[error("Invalid URL format")]
    InvalidFormat,

    #[error("Invalid hostname in URL")]
    InvalidHostname { host: String },

    #[error("URL must contain a valid domain")]
    MissingDomain { host: String },

    #[error("URL must use a domain name, not an IP address")]
    IpAddress { host: String },

    #[error("URL doesn't match expected platform ({expected}). Detected: {detected}")]
    PlatformMismatch {
        expected: Platform,
        detected: Platform,
    },

    #[error("Invalid YouTube video URL format")]
    InvalidYouTubeVideo,

    #[error("LinkedIn profile URL appears to be incomplete")]
    IncompleteLinkedInProfile,

    #[error("Invalid Instagram username length")]
    InvalidInstagramUsername,

    #[error("Invalid TikTok username format")]
    InvalidTikTokHandle,

    #[error("URL appears to be a test or local domain")]
    SuspiciousDomain { host: String },
}

impl UrlRejection {
    /// Returns the taxonomy kind this rejection maps to.
    #[must_use]
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            Self::Required | Self::Empty => ErrorKind::FormRequiredField,
            Self::TooLong { .. }
            | Self::InvalidFormat
            | Self::InvalidYouTubeVideo
            | Self::IncompleteLinkedInProfile
            | Self::InvalidInstagramUsername
            | Self::InvalidTikTokHandle => ErrorKind::UrlInvalidFormat,
            Self::InvalidHostname { .. } | Self::MissingDomain { .. } | Self::IpAddress { .. } => {
                ErrorKind::UrlInvalidDomain
            }
            Self::PlatformMismatch { .. } => ErrorKind::UrlPlatformMismatch,
            Self::SuspiciousDomain { .. } => ErrorKind::UrlSuspiciousDomain,
        }
    }

    /// Converts the rejection into an [`AppError`] for the user-supplied URL.
    #[must_use]
    pub fn to_app_error(&self, original_url: &str) -> AppError {
        let details = ErrorDetails::new().message(self.to_string());
        let details = match self {
            Self::Required | Self::Empty => details.field("URL"),
            Self::InvalidHostname { host }
            | Self::MissingDomain { host }
            | Self::IpAddress { host }
            | Self::SuspiciousDomain { host } => details.domain(host.clone()),
            Self::PlatformMismatch { expected, detected } => {
                details.mismatch(expected.name(), detected.name())
            }
            _ => details.original_url(original_url),
        };
        AppError::new(self.error_kind(), Some(&details))
    }
}

impl Serialize for UrlRejection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
