//! Supported platforms and the ordered detection table.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// A platform a URL can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "YouTube")]
    YouTube,
    #[serde(rename = "LinkedIn")]
    LinkedIn,
    #[serde(rename = "X (Twitter)")]
    X,
    #[serde(rename = "Instagram")]
    Instagram,
    #[serde(rename = "TikTok")]
    TikTok,
    #[serde(rename = "Website")]
    Website,
}

impl Platform {
    pub const ALL: [Self; 6] = [
        Self::YouTube,
        Self::LinkedIn,
        Self::X,
        Self::Instagram,
        Self::TikTok,
        Self::Website,
    ];

    /// Canonical display name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::YouTube => "YouTube",
            Self::LinkedIn => "LinkedIn",
            Self::X => "X (Twitter)",
            Self::Instagram => "Instagram",
            Self::TikTok => "TikTok",
            Self::Website => "Website",
        }
    }

    /// Lowercase key used by forms and placeholders.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::YouTube => "youtube",
            Self::LinkedIn => "linkedin",
            Self::X => "twitter",
            Self::Instagram => "instagram",
            Self::TikTok => "tiktok",
            Self::Website => "website",
        }
    }

    /// Resolves a caller-supplied platform name.
    ///
    /// Accepts the canonical name or the key, case-insensitively, plus `x`.
    /// Returns `None` for anything else (e.g. `blog`).
    #[must_use]
    pub fn resolve(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.eq_ignore_ascii_case("x") {
            return Some(Self::X);
        }
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(input) || p.key().eq_ignore_ascii_case(input))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of the detection table.
pub struct PlatformRule {
    pub platform: Platform,
    /// Tested in order against the protocol-repaired URL.
    pub patterns: Vec<Regex>,
    pub normalize: Option<fn(&str) -> String>,
}

impl PlatformRule {
    /// Returns `true` if any pattern matches `url`.
    #[must_use]
    pub fn matches(&self, url: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(url))
    }

    /// Applies the normalizer, or returns `url` unchanged if there is none.
    #[must_use]
    pub fn apply(&self, url: &str) -> String {
        self.normalize.map_or_else(|| url.to_string(), |f| f(url))
    }
}

impl fmt::Debug for PlatformRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlatformRule")
            .field("platform", &self.platform)
            .field(
                "patterns",
                &self.patterns.iter().map(Regex::as_str).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

#[allow(clippy::expect_used)]
fn patterns(sources: &[&str]) -> Vec<Regex> {
    sources
        .iter()
        .map(|s| Regex::new(s).expect("platform regex is valid")) // Static patterns, safe to panic
        .collect()
}

/// Ordered detection table. First matching rule wins, so every specific
/// platform precedes the `Website` catch-all.
pub static PLATFORM_RULES: LazyLock<Vec<PlatformRule>> = LazyLock::new(|| {
    vec![
        PlatformRule {
            platform: Platform::YouTube,
            patterns: patterns(&[
                r"(?i)^https?://(www\.|m\.)?(youtube\.com|youtu\.be)([/?#:]|$)",
            ]),
            normalize: Some(normalize_youtube),
        },
        PlatformRule {
            platform: Platform::LinkedIn,
            patterns: patterns(&[
                r"(?i)^https?://(www\.)?linkedin\.com/in/[\w-]+",
                r"(?i)^https?://(www\.)?linkedin\.com/company/[\w-]+",
                r"(?i)^https?://(www\.)?linkedin\.com/school/[\w-]+",
            ]),
            normalize: Some(normalize_social),
        },
        PlatformRule {
            platform: Platform::X,
            patterns: patterns(&[r"(?i)^https?://(www\.)?(twitter\.com|x\.com)/[\w-]+"]),
            normalize: Some(normalize_x),
        },
        PlatformRule {
            platform: Platform::Instagram,
            patterns: patterns(&[r"(?i)^https?://(www\.)?instagram\.com/[\w.-]+"]),
            normalize: Some(normalize_social),
        },
        PlatformRule {
            platform: Platform::TikTok,
            patterns: patterns(&[
                r"(?i)^https?://(www\.)?tiktok\.com/@[\w.-]+",
                r"(?i)^https?://(www\.)?tiktok\.com/[\w.-]+",
            ]),
            normalize: Some(normalize_social),
        },
        PlatformRule {
            platform: Platform::Website,
            patterns: patterns(&[r"(?i)^https?://[\w.-]+\.[a-z]{2,}"]),
            normalize: Some(upgrade_scheme),
        },
    ]
});

/// Returns the first rule matching `url`.
#[must_use]
pub fn detect(url: &str) -> Option<&'static PlatformRule> {
    PLATFORM_RULES.iter().find(|rule| rule.matches(url))
}

// ==================== Normalizers ====================
//
// All normalizers are idempotent: f(f(u)) == f(u).

/// Forces `https://`.
pub(crate) fn upgrade_scheme(url: &str) -> String {
    strip_prefix_ci(url, "https://")
        .or_else(|| strip_prefix_ci(url, "http://"))
        .map_or_else(|| url.to_string(), |rest| format!("https://{rest}"))
}

fn strip_www(url: &str) -> String {
    match strip_prefix_ci(url, "https://") {
        Some(rest) => match strip_prefix_ci(rest, "www.") {
            Some(host_and_path) => format!("https://{host_and_path}"),
            None => url.to_string(),
        },
        None => url.to_string(),
    }
}

fn normalize_social(url: &str) -> String {
    strip_www(&upgrade_scheme(url))
}

fn normalize_youtube(url: &str) -> String {
    if let Some(id) = short_link_id(url) {
        return format!("https://youtube.com/watch?v={id}");
    }
    normalize_social(url)
}

/// Extracts the video id from a `youtu.be/<id>` short link.
///
/// Only the host decides; `youtu.be/` appearing in a query or path of
/// another URL is ignored. An empty id is returned as `""`.
fn short_link_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(host);
    if host != "youtu.be" {
        return None;
    }
    let id = parsed
        .path_segments()
        .and_then(|mut segments| segments.next())
        .unwrap_or_default();
    Some(id.to_string())
}

fn normalize_x(url: &str) -> String {
    let normalized = normalize_social(url);
    match strip_prefix_ci(&normalized, "https://twitter.com") {
        Some(rest) => format!("https://x.com{rest}"),
        None => normalized,
    }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &s[prefix.len()..])
}

// ==================== Placeholders ====================

/// Example input shown for a platform key; generic example for unknown keys.
#[must_use]
pub fn platform_placeholder(platform_key: &str) -> &'static str {
    match platform_key {
        "youtube" => "https://youtube.com/@channelname or https://youtube.com/c/channelname",
        "linkedin" => "https://linkedin.com/in/username or https://linkedin.com/company/companyname",
        "twitter" => "https://x.com/username or https://twitter.com/username",
        "instagram" => "https://instagram.com/username",
        "tiktok" => "https://tiktok.com/@username",
        "website" => "https://example.com or https://blog.example.com",
        "blog" => "https://blog.example.com/feed or https://example.com/rss",
        _ => "https://example.com",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_ends_with_website() {
        let order: Vec<Platform> = PLATFORM_RULES.iter().map(|r| r.platform).collect();
        assert_eq!(order, Platform::ALL.to_vec());
        assert_eq!(PLATFORM_RULES.last().unwrap().platform, Platform::Website);
    }

    #[test]
    fn test_detect_specific_before_website() {
        assert_eq!(
            detect("https://youtube.com/@chan").unwrap().platform,
            Platform::YouTube
        );
        assert_eq!(
            detect("https://blog.rust-lang.org/").unwrap().platform,
            Platform::Website
        );
    }

    #[test]
    fn test_detect_youtube_requires_host_boundary() {
        let rule = detect("https://youtube.community.org/x").unwrap();
        assert_eq!(rule.platform, Platform::Website);
    }

    #[test]
    fn test_detect_linkedin_root_falls_back_to_website() {
        assert_eq!(
            detect("https://linkedin.com").unwrap().platform,
            Platform::Website
        );
    }

    #[test]
    fn test_resolve_accepts_names_keys_and_alias() {
        assert_eq!(Platform::resolve("YouTube"), Some(Platform::YouTube));
        assert_eq!(Platform::resolve("youtube"), Some(Platform::YouTube));
        assert_eq!(Platform::resolve("x (twitter)"), Some(Platform::X));
        assert_eq!(Platform::resolve("twitter"), Some(Platform::X));
        assert_eq!(Platform::resolve("X"), Some(Platform::X));
        assert_eq!(Platform::resolve(" website "), Some(Platform::Website));
        assert_eq!(Platform::resolve("blog"), None);
    }

    #[test]
    fn test_serialize_uses_canonical_name() {
        assert_eq!(
            serde_json::to_string(&Platform::X).unwrap(),
            "\"X (Twitter)\""
        );
    }

    #[test]
    fn test_upgrade_scheme() {
        assert_eq!(upgrade_scheme("http://a.com/x"), "https://a.com/x");
        assert_eq!(upgrade_scheme("HTTP://a.com"), "https://a.com");
        assert_eq!(upgrade_scheme("https://a.com"), "https://a.com");
    }

    #[test]
    fn test_normalize_social_strips_www_only_at_host_start() {
        assert_eq!(
            normalize_social("http://www.instagram.com/www.user"),
            "https://instagram.com/www.user"
        );
    }

    #[test]
    fn test_normalize_youtube_short_link() {
        assert_eq!(
            normalize_youtube("http://youtu.be/dQw4w9WgXcQ?t=10"),
            "https://youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            normalize_youtube("https://www.youtube.com/@chan"),
            "https://youtube.com/@chan"
        );
    }

    #[test]
    fn test_short_link_id_checks_host() {
        assert_eq!(
            short_link_id("https://www.youtu.be/dQw4w9WgXcQ/").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(short_link_id("https://youtu.be/").as_deref(), Some(""));
        assert_eq!(
            short_link_id("https://youtube.com/watch?v=dQw4w9WgXcQ&src=youtu.be/abcdefghijk"),
            None
        );
        assert_eq!(short_link_id("https://youtube.com/@chan?ref=youtu.be/zzz"), None);
    }

    #[test]
    fn test_normalize_youtube_ignores_short_link_in_query() {
        assert_eq!(
            normalize_youtube("https://youtube.com/watch?v=dQw4w9WgXcQ&src=youtu.be/abcdefghijk"),
            "https://youtube.com/watch?v=dQw4w9WgXcQ&src=youtu.be/abcdefghijk"
        );
    }

    #[test]
    fn test_normalize_x_rewrites_host() {
        assert_eq!(
            normalize_x("http://www.twitter.com/someuser"),
            "https://x.com/someuser"
        );
        assert_eq!(normalize_x("https://x.com/someuser"), "https://x.com/someuser");
    }

    #[test]
    fn test_platform_placeholder() {
        assert_eq!(platform_placeholder("tiktok"), "https://tiktok.com/@username");
        assert_eq!(platform_placeholder("nope"), "https://example.com");
    }
}
