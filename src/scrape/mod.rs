//! Produce `news.json` from the PortalPortuario headlines page.
//!
//! The scraper never leaves the dashboard without a feed: when the page cannot
//! be fetched or yields too few headlines, the previous file is kept and only
//! annotated with `checkedAt`/`note`, or an empty feed is written if there was
//! no previous file.

mod extract;

use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use url::Url;

use crate::{core::DashError, core::net, feed::NewsItem};

/// The headlines listing scraped by default.
pub const DEFAULT_PAGE_URL: &str = "https://portalportuario.cl/titulares/";

const USER_AGENT: &str = "Mozilla/5.0 (compatible; LiveDataDashboard/1.0)";
const DEFAULT_SITE: &str = "portalportuario.cl";

/// What a scrape run did to the output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// Fresh headlines were written.
    Updated { items: usize },
    /// Scraping failed; the previous file was kept and annotated.
    KeptPrevious { error: String },
    /// Scraping failed and there was no previous file; an empty feed was written.
    CreatedEmpty { error: String },
}

#[derive(Serialize)]
struct ScrapedFeed<'a> {
    source: &'a str,
    #[serde(rename = "lastUpdated")]
    last_updated: &'a str,
    items: &'a [NewsItem],
}

/// Scrapes one page into one feed file.
#[derive(Debug, Clone)]
pub struct Scraper {
    http: Client,
    page: Url,
    site: String,
    out: PathBuf,
    max_items: usize,
    min_items: usize,
}

impl Scraper {
    /// Create a builder writing to `out`.
    pub fn builder(out: impl Into<PathBuf>) -> ScraperBuilder {
        ScraperBuilder {
            out: out.into(),
            page: None,
            site: None,
            user_agent: None,
            timeout: Duration::from_secs(25),
            max_items: 12,
            min_items: 3,
        }
    }

    pub fn out(&self) -> &Path {
        &self.out
    }

    /// Run once.
    ///
    /// # Errors
    ///
    /// Only local I/O failures are errors; network and parse failures are
    /// reported through [`ScrapeOutcome`].
    #[tracing::instrument(skip(self), err, fields(page = %self.page, out = %self.out.display()))]
    pub async fn run(&self) -> Result<ScrapeOutcome, DashError> {
        let now_iso = Utc::now().to_rfc3339();

        match self.fetch_headlines(&now_iso).await {
            Ok(items) => {
                write_json(
                    &self.out,
                    &ScrapedFeed {
                        source: self.page.as_str(),
                        last_updated: &now_iso,
                        items: &items,
                    },
                )?;
                tracing::info!(items = items.len(), "headlines saved");
                Ok(ScrapeOutcome::Updated { items: items.len() })
            }
            Err(e) => {
                let error = e.to_string();
                match load_existing(&self.out) {
                    Some(mut existing) => {
                        existing.insert("checkedAt".into(), Value::from(now_iso.as_str()));
                        existing.insert(
                            "note".into(),
                            Value::from(format!("Fetch failed; kept last good data. Error: {error}")),
                        );
                        write_json(&self.out, &existing)?;
                        tracing::warn!(%error, "scrape failed; kept previous feed");
                        Ok(ScrapeOutcome::KeptPrevious { error })
                    }
                    None => {
                        let empty = json!({
                            "source": self.page.as_str(),
                            "lastUpdated": Value::Null,
                            "checkedAt": now_iso,
                            "items": [],
                            "note": format!("Fetch failed and no previous file. Error: {error}"),
                        });
                        write_json(&self.out, &empty)?;
                        tracing::warn!(%error, "scrape failed; wrote empty feed");
                        Ok(ScrapeOutcome::CreatedEmpty { error })
                    }
                }
            }
        }
    }

    async fn fetch_headlines(&self, now_iso: &str) -> Result<Vec<NewsItem>, DashError> {
        let resp = self.http.get(self.page.clone()).send().await?;
        if !resp.status().is_success() {
            return Err(DashError::Status {
                status: resp.status().as_u16(),
                url: self.page.to_string(),
            });
        }
        let body = net::get_text(resp, "titulares", "html").await?;

        let anchors = extract::iter_anchors(&body);
        let items = extract::select_headlines(&anchors, &self.site, now_iso, self.max_items);
        if items.len() < self.min_items {
            return Err(DashError::Empty(format!(
                "only {} headlines found (page layout changed or request blocked?)",
                items.len()
            )));
        }
        Ok(items)
    }
}

/* ----------------------- Builder ----------------------- */

pub struct ScraperBuilder {
    out: PathBuf,
    page: Option<Url>,
    site: Option<String>,
    user_agent: Option<String>,
    timeout: Duration,
    max_items: usize,
    min_items: usize,
}

impl ScraperBuilder {
    /// Override the page to scrape (default: the PortalPortuario headlines).
    #[must_use]
    pub fn page_url(mut self, url: Url) -> Self {
        self.page = Some(url);
        self
    }

    /// Only keep links containing this host fragment (default `portalportuario.cl`).
    #[must_use]
    pub fn site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Overall request timeout. Default: 25s.
    #[must_use]
    pub fn timeout(mut self, dur: Duration) -> Self {
        self.timeout = dur;
        self
    }

    /// Cap on kept headlines. Default: 12.
    #[must_use]
    pub fn max_items(mut self, n: usize) -> Self {
        self.max_items = n;
        self
    }

    /// Fewer headlines than this counts as a failed scrape. Default: 3.
    #[must_use]
    pub fn min_items(mut self, n: usize) -> Self {
        self.min_items = n;
        self
    }

    /// Build the scraper.
    ///
    /// # Errors
    ///
    /// Fails if the default page URL cannot be parsed or the HTTP client cannot be built.
    pub fn build(self) -> Result<Scraper, DashError> {
        let page = match self.page {
            Some(url) => url,
            None => Url::parse(DEFAULT_PAGE_URL)?,
        };
        let http = Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(USER_AGENT))
            .timeout(self.timeout)
            .build()?;

        Ok(Scraper {
            http,
            page,
            site: self.site.unwrap_or_else(|| DEFAULT_SITE.to_string()),
            out: self.out,
            max_items: self.max_items,
            min_items: self.min_items,
        })
    }
}

fn load_existing(path: &Path) -> Option<Map<String, Value>> {
    let raw = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) | Err(_) => {
            tracing::warn!(path = %path.display(), "existing feed unreadable; treating as absent");
            None
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), DashError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
