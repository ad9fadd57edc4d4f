//! URL validation and normalization against known social platforms.
//!
//! # Overview
//!
//! [`validate`] classifies a raw URL into a [`Platform`] using the ordered
//! [`PLATFORM_RULES`] table, normalizes it, and applies platform-specific and
//! domain checks. The result is a [`ValidationResult`]; use
//! [`ValidationResult::into_result`] for `?`-style handling.
//!
//! # Example
//!
//! ```
//! use social_hub_core::validator::{Platform, validate};
//!
//! let result = validate("http://youtu.be/dQw4w9WgXcQ", None);
//! assert!(result.is_valid);
//! assert_eq!(result.platform, Some(Platform::YouTube));
//! assert_eq!(
//!     result.normalized_url.as_deref(),
//!     Some("https://youtube.com/watch?v=dQw4w9WgXcQ")
//! );
//! ```

mod error;
mod platform;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, trace};
use url::{Host, Url};

pub use error::{MAX_URL_LENGTH, UrlRejection};
pub use platform::{PLATFORM_RULES, Platform, PlatformRule, detect, platform_placeholder};

/// Hostname substrings that mark test or local inputs.
const BLOCKED_HOST_FRAGMENTS: [&str; 6] = [
    "localhost",
    "127.0.0.1",
    "0.0.0.0",
    "example.com",
    "test.com",
    "fake.com",
];

#[allow(clippy::expect_used)]
static VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("video id regex is valid") // Static pattern, safe to panic
});

#[allow(clippy::expect_used)]
static TIKTOK_HANDLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^@[A-Za-z0-9_.]{2,24}$").expect("handle regex is valid") // Static pattern, safe to panic
});

/// Outcome of a single [`validate`] call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<UrlRejection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_url: Option<String>,
}

/// A URL that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    /// `None` when no rule matched but the URL is structurally sound.
    pub platform: Option<Platform>,
    pub normalized_url: String,
}

impl ValidationResult {
    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the [`UrlRejection`] when the URL was invalid.
    pub fn into_result(self) -> Result<ValidatedUrl, UrlRejection> {
        match (self.error, self.normalized_url) {
            (Some(rejection), _) => Err(rejection),
            (None, Some(normalized_url)) => Ok(ValidatedUrl {
                platform: self.platform,
                normalized_url,
            }),
            (None, None) => Err(UrlRejection::InvalidFormat),
        }
    }
}

impl From<Result<ValidatedUrl, UrlRejection>> for ValidationResult {
    fn from(result: Result<ValidatedUrl, UrlRejection>) -> Self {
        match result {
            Ok(valid) => Self {
                is_valid: true,
                error: None,
                platform: valid.platform,
                normalized_url: Some(valid.normalized_url),
            },
            Err(rejection) => Self {
                is_valid: false,
                error: Some(rejection),
                platform: None,
                normalized_url: None,
            },
        }
    }
}

/// Validates and normalizes `raw`, optionally against an expected platform.
///
/// `expected` is matched with [`Platform::resolve`]; names it does not know
/// skip the mismatch check. A missing `http://`/`https://` prefix is repaired
/// by prepending `https://`.
#[tracing::instrument(skip(raw), fields(raw_len = raw.len()))]
#[must_use]
pub fn validate(raw: &str, expected: Option<&str>) -> ValidationResult {
    let result = check(raw, expected);
    match &result {
        Ok(valid) => debug!(url = %valid.normalized_url, platform = ?valid.platform, "URL validated"),
        Err(rejection) => debug!(reason = %rejection, "URL rejected"),
    }
    result.into()
}

fn check(raw: &str, expected: Option<&str>) -> Result<ValidatedUrl, UrlRejection> {
    if raw.is_empty() {
        return Err(UrlRejection::Required);
    }
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlRejection::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlRejection::TooLong {
            length: trimmed.len(),
        });
    }

    let url = repair_scheme(trimmed);
    let parsed = Url::parse(&url).map_err(|_| UrlRejection::InvalidFormat)?;
    check_host(&parsed)?;

    let Some(rule) = detect(&url) else {
        trace!(url = %url, "no platform rule matched");
        return finish(None, url);
    };
    let detected = rule.platform;
    let normalized = rule.apply(&url);

    if let Some(expected) = expected.and_then(Platform::resolve)
        && expected != detected
    {
        return Err(UrlRejection::PlatformMismatch { expected, detected });
    }

    let normalized_parsed = Url::parse(&normalized).map_err(|_| UrlRejection::InvalidFormat)?;
    check_platform(detected, &normalized_parsed)?;
    finish(Some(detected), normalized)
}

fn finish(platform: Option<Platform>, normalized_url: String) -> Result<ValidatedUrl, UrlRejection> {
    let parsed = Url::parse(&normalized_url).map_err(|_| UrlRejection::InvalidFormat)?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    if BLOCKED_HOST_FRAGMENTS.iter().any(|b| host.contains(b)) {
        return Err(UrlRejection::SuspiciousDomain { host });
    }
    Ok(ValidatedUrl {
        platform,
        normalized_url,
    })
}

fn repair_scheme(url: &str) -> String {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn check_host(parsed: &Url) -> Result<(), UrlRejection> {
    let host = parsed.host_str().unwrap_or_default();
    if host.len() < 3 {
        return Err(UrlRejection::InvalidHostname {
            host: host.to_string(),
        });
    }
    if !host.contains('.') {
        return Err(UrlRejection::MissingDomain {
            host: host.to_string(),
        });
    }
    if matches!(parsed.host(), Some(Host::Ipv4(_) | Host::Ipv6(_))) {
        return Err(UrlRejection::IpAddress {
            host: host.to_string(),
        });
    }
    Ok(())
}

fn first_segment(parsed: &Url) -> Option<&str> {
    parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .filter(|s| !s.is_empty())
}

fn check_platform(platform: Platform, parsed: &Url) -> Result<(), UrlRejection> {
    match platform {
        Platform::YouTube if parsed.path() == "/watch" => {
            let video_id = parsed
                .query_pairs()
                .find(|(name, _)| name == "v")
                .map(|(_, value)| value.into_owned())
                .unwrap_or_default();
            if !VIDEO_ID.is_match(&video_id) {
                return Err(UrlRejection::InvalidYouTubeVideo);
            }
        }
        Platform::LinkedIn => {
            let mut segments = parsed.path_segments().into_iter().flatten();
            if segments.next() == Some("in")
                && segments.next().is_none_or(|slug| slug.chars().count() < 3)
            {
                return Err(UrlRejection::IncompleteLinkedInProfile);
            }
        }
        Platform::Instagram => {
            let len = first_segment(parsed).map_or(0, |u| u.chars().count());
            if !(1..=30).contains(&len) {
                return Err(UrlRejection::InvalidInstagramUsername);
            }
        }
        Platform::TikTok => {
            if let Some(handle) = first_segment(parsed).filter(|s| s.starts_with('@'))
                && !TIKTOK_HANDLE.is_match(handle)
            {
                return Err(UrlRejection::InvalidTikTokHandle);
            }
        }
        _ => {}
    }
    Ok(())
}

/// Returns the detected platform of a valid URL.
#[must_use]
pub fn get_platform_from_url(url: &str) -> Option<Platform> {
    check(url, None).ok().and_then(|valid| valid.platform)
}

/// Returns the normalized form of `url`, or `url` unchanged if it is invalid.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    check(url, None).map_or_else(|_| url.to_string(), |valid| valid.normalized_url)
}
