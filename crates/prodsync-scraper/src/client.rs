//! HTTP client for the retailer's search pages.
//!
//! The client only knows how to build a search URL and fetch one page of
//! HTML; pagination policy lives in [`crate::search`]. When proxy settings
//! are present, every fetch is wrapped through the rendering/bypass service
//! so the retailer sees the service's browser fingerprint, not ours.

use std::time::Duration;

use prodsync_core::{ProxySettings, SortOrder};
use reqwest::Client;

use crate::error::ScraperError;

pub struct SearchClient {
    client: Client,
    /// Retailer origin, e.g. `https://www.walmart.com`. Trailing slashes
    /// are stripped at construction so URL building can concatenate paths.
    origin: String,
    proxy: Option<ProxySettings>,
}

impl SearchClient {
    /// Creates a `SearchClient` with configured timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        proxy: Option<ProxySettings>,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            origin: base_url.trim_end_matches('/').to_owned(),
            proxy,
        })
    }

    /// The retailer origin this client searches, without a trailing slash.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Builds the retailer search URL for one results page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if the configured origin cannot
    /// be parsed as a URL base.
    pub fn search_url(
        &self,
        brand: &str,
        sort: SortOrder,
        page: u32,
    ) -> Result<String, ScraperError> {
        let base = format!("{}/search", self.origin);
        let mut url = reqwest::Url::parse(&base).map_err(|e| ScraperError::InvalidUrl {
            url: base.clone(),
            reason: e.to_string(),
        })?;

        url.query_pairs_mut()
            .append_pair("q", brand)
            .append_pair("sort", sort.as_query_param())
            .append_pair("page", &page.to_string())
            .append_pair("affinityOverride", "default");

        Ok(url.to_string())
    }

    /// Fetches one page of HTML, routing through the bypass service when
    /// configured.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] — any non-2xx status.
    /// - [`ScraperError::Http`] — network, TLS, or timeout failure.
    pub async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        let request_url = match &self.proxy {
            Some(proxy) => Self::proxied_url(proxy, url)?,
            None => url.to_owned(),
        };

        let response = self
            .client
            .get(&request_url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }

    /// Wraps `target` in the bypass service's fetch endpoint:
    /// `endpoint?api_key=KEY&url=TARGET`.
    fn proxied_url(proxy: &ProxySettings, target: &str) -> Result<String, ScraperError> {
        let mut url =
            reqwest::Url::parse(&proxy.endpoint).map_err(|e| ScraperError::InvalidUrl {
                url: proxy.endpoint.clone(),
                reason: e.to_string(),
            })?;

        url.query_pairs_mut()
            .append_pair("api_key", &proxy.api_key)
            .append_pair("url", target);

        Ok(url.to_string())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
