//! Public client surface + builder.
//! Defaults (UA, base URL, feed paths) live in `constants`.

mod constants;

use crate::core::{DashError, net};
use chrono::Utc;
use constants::{
    CACHE_BUST_PARAM, DEFAULT_BASE_URL, DEFAULT_NEWS_PATH, DEFAULT_ZONES_PATH, USER_AGENT,
};
use reqwest::Client;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use std::time::Duration;
use url::Url;

/// HTTP client bound to one dashboard site.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DashClient {
    http: Client,
    base: Url,
    news_path: String,
    zones_path: String,
}

impl DashClient {
    /// Create a new builder.
    pub fn builder() -> DashClientBuilder {
        DashClientBuilder::default()
    }

    /// The site base every feed path is resolved against.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /* -------- internal getters used by other modules -------- */

    pub(crate) fn news_path(&self) -> &str {
        &self.news_path
    }
    pub(crate) fn zones_path(&self) -> &str {
        &self.zones_path
    }

    /// Resolve `path` against the base URL and stamp it with a cache-busting `v` parameter.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::Url`] if `path` cannot be joined onto the base.
    pub fn cache_busted(&self, path: &str) -> Result<Url, DashError> {
        let mut url = self.base.join(path)?;
        url.query_pairs_mut().append_pair(
            CACHE_BUST_PARAM,
            &Utc::now().timestamp_millis().to_string(),
        );
        Ok(url)
    }

    /// GET a cache-busted resource and return its body, failing on any non-2xx status.
    pub(crate) async fn get_fresh_text(
        &self,
        path: &str,
        endpoint: &str,
    ) -> Result<String, DashError> {
        let url = self.cache_busted(path)?;
        let resp = self
            .http
            .get(url)
            .header(CACHE_CONTROL, "no-store")
            .header(PRAGMA, "no-cache")
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(DashError::Status {
                status: resp.status().as_u16(),
                url: resp.url().to_string(),
            });
        }

        Ok(net::get_text(resp, endpoint, "json").await?)
    }
}

/* ----------------------- Builder ----------------------- */

#[derive(Default)]
pub struct DashClientBuilder {
    user_agent: Option<String>,
    base_url: Option<Url>,
    news_path: Option<String>,
    zones_path: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl DashClientBuilder {
    /// Override the User-Agent.
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Override the site base (e.g., `https://example.org/dashboard/`).
    ///
    /// A missing trailing slash is added so relative feed paths resolve below it.
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Override the news feed path (default `data/news.json`).
    #[must_use]
    pub fn news_path(mut self, path: impl Into<String>) -> Self {
        self.news_path = Some(path.into());
        self
    }

    /// Override the price table path (default `data/ufm2.json`).
    #[must_use]
    pub fn zones_path(mut self, path: impl Into<String>) -> Self {
        self.zones_path = Some(path.into());
        self
    }

    /// Set a global request timeout (overall). Default: none.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = Some(dur);
        self
    }

    /// Set a connect timeout. Default: none.
    #[must_use]
    pub fn connect_timeout(mut self, dur: Duration) -> Self {
        self.connect_timeout = Some(dur);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Fails if the default base URL cannot be parsed or the HTTP client cannot be constructed.
    pub fn build(self) -> Result<DashClient, DashError> {
        let mut base = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut httpb =
            reqwest::Client::builder().user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT));

        if let Some(t) = self.timeout {
            httpb = httpb.timeout(t);
        }
        if let Some(ct) = self.connect_timeout {
            httpb = httpb.connect_timeout(ct);
        }

        let http = httpb.build()?;

        Ok(DashClient {
            http,
            base,
            news_path: self
                .news_path
                .unwrap_or_else(|| DEFAULT_NEWS_PATH.to_string()),
            zones_path: self
                .zones_path
                .unwrap_or_else(|| DEFAULT_ZONES_PATH.to_string()),
        })
    }
}
