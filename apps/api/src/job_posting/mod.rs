//! Job description resolver. Decides which text describes the job:
//! pasted text when present, otherwise the scraped contents of the job URL.

pub mod scrape;

use reqwest::Client;
use tracing::error;
use url::Url;

use crate::generation::error::GenerationError;

#[derive(Clone)]
pub struct JobResolver {
    client: Client,
}

impl JobResolver {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: scrape::build_http_client()?,
        })
    }

    /// Returns the job description to feed the model.
    ///
    /// Non-blank `text` wins (trimmed) and `url` is ignored. Otherwise `url`
    /// must be an http(s) URL with a host; its page is fetched and cleaned.
    pub async fn resolve(
        &self,
        url: Option<&str>,
        text: Option<&str>,
    ) -> Result<String, GenerationError> {
        if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(text.to_string());
        }

        let raw_url = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(GenerationError::MissingJobInput)?;
        let url = validate_url(raw_url)?;

        scrape::scrape_job(&self.client, url.as_str())
            .await
            .map_err(|e| {
                error!("Failed to scrape job URL {raw_url}: {e}");
                GenerationError::FetchFailed(e.to_string())
            })
    }
}

/// Accepts only `http`/`https` URLs with a non-empty host.
pub fn validate_url(raw: &str) -> Result<Url, GenerationError> {
    let invalid = || GenerationError::InvalidUrl(raw.to_string());
    let url = Url::parse(raw).map_err(|_| invalid())?;

    let has_host = url.host_str().is_some_and(|h| !h.is_empty());
    if matches!(url.scheme(), "http" | "https") && has_host {
        Ok(url)
    } else {
        Err(invalid())
    }
}
