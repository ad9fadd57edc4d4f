//! Content fetching through an external scrape service, with a fallback
//! extraction call when the first pass returns too little text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};

use crate::failure::{
    AppError, Cause, ErrorContext, ErrorDetails, ErrorKind, create_error, log_error,
};
use crate::validator::validate;

/// Below this many characters (after trimming) the fallback extractor runs.
pub const MIN_CONTENT_CHARS: usize = 50;

/// Text extracted by the scrape service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// What a scrape call returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<Extract>,
}

impl ScrapeOutput {
    /// Markdown if present and non-empty, else the extracted text.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.markdown
            .as_deref()
            .filter(|m| !m.is_empty())
            .or_else(|| self.extract.as_ref().and_then(|e| e.text.as_deref()))
    }
}

/// External scrape service.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Primary scrape of `url`.
    async fn scrape(&self, url: &str) -> Result<ScrapeOutput, Cause>;

    /// Secondary, plain-text extraction of `url`.
    async fn extract_from_url(&self, url: &str) -> Result<Option<String>, Cause>;
}

/// Validates `url`, then scrapes it. Falls back to
/// [`Scraper::extract_from_url`] when the scraped content is shorter than
/// [`MIN_CONTENT_CHARS`].
///
/// # Errors
///
/// - the URL rejection's error when `url` is invalid
/// - `API_CONTENT_SCRAPING_FAILED` when the scrape call fails or no content
///   is found
#[instrument(skip(scraper))]
pub async fn fetch_content(scraper: &dyn Scraper, url: &str) -> Result<String, AppError> {
    let context = || ErrorContext::new("Scraper", "fetchContent").with_data(json!({ "url": url }));
    let fail = |error: AppError| {
        log_error(&error);
        error
    };

    let validated = validate(url, None)
        .into_result()
        .map_err(|rejection| fail(rejection.to_app_error(url).with_context(context())))?;
    let target = validated.normalized_url.as_str();

    let scraping_failed = || {
        create_error(
            ErrorKind::ApiContentScrapingFailed,
            Some(ErrorDetails::new().url(target)),
            Some(context()),
        )
    };

    let output = scraper
        .scrape(target)
        .await
        .map_err(|cause| fail(scraping_failed().with_shared_cause(cause)))?;
    let mut content = output.content().unwrap_or_default().to_string();

    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        debug!(url = target, chars = content.trim().len(), "scraped content too short, extracting");
        match scraper.extract_from_url(target).await {
            Ok(Some(extracted)) if !extracted.trim().is_empty() => content = extracted,
            Ok(_) => {}
            Err(cause) if content.trim().is_empty() => {
                return Err(fail(scraping_failed().with_shared_cause(cause)));
            }
            Err(cause) => debug!(error = %cause, "fallback extraction failed, keeping scraped content"),
        }
    }

    if content.trim().is_empty() {
        return Err(fail(scraping_failed()));
    }
    Ok(content)
}
