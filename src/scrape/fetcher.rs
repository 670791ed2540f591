//! Fetcher Module
//!
//! HTML fetch collaborator. Talks to the configured upstream only: every URL
//! it hands out stays on the base URL's origin and under its path.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Url;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Largest page body read by default (5 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

// == Html Fetcher ==
/// Fetches raw HTML from the upstream site.
///
/// Every request carries the client-wide timeout, so a page fetch can never
/// stall an aggregation batch indefinitely.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: reqwest::Client,
    base_url: Url,
    max_body_bytes: usize,
}

impl HtmlFetcher {
    // == Constructor ==
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| ScrapeError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| ScrapeError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        })
    }

    /// Caps the page body size; larger bodies fail the fetch.
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    // == Resolve ==
    /// Resolves a site-relative path against the base URL.
    ///
    /// Fails with `InvalidUrl` when the result would leave the base URL's
    /// scheme, host, port or path prefix.
    pub fn resolve(&self, path: &str) -> Result<Url> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ScrapeError::InvalidUrl(format!("{path}: {e}")))?;

        if !self.is_within_base(&url) {
            warn!(path, %url, "refusing to resolve outside the upstream base");
            return Err(ScrapeError::InvalidUrl(format!(
                "{path}: resolves outside {}",
                self.base_url
            )));
        }
        Ok(url)
    }

    fn is_within_base(&self, url: &Url) -> bool {
        url.scheme() == self.base_url.scheme()
            && url.host_str() == self.base_url.host_str()
            && url.port_or_known_default() == self.base_url.port_or_known_default()
            && url.path().starts_with(self.base_url.path())
    }

    // == Fetch ==
    /// GETs `url` and returns the body. Non-2xx statuses and bodies over
    /// the size cap are errors.
    pub async fn fetch(&self, url: &Url) -> Result<String> {
        debug!(%url, "fetching page");

        let mut response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::UpstreamStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let too_large = || ScrapeError::ResponseTooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        };

        if let Some(length) = response.content_length() {
            if length > self.max_body_bytes as u64 {
                return Err(too_large());
            }
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}
