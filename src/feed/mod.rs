mod api;
mod model;
mod wire;

pub use model::{NewsFeed, NewsItem, PinnedNews, Zone};

use crate::core::{DashClient, DashError};

/// Loads the two dashboard feeds.
///
/// Every request carries a fresh cache-busting stamp, so a proxy or CDN never
/// hands back an older copy. Malformed or empty entries are dropped; a failed
/// request, non-success status or unparsable body is returned as a [`DashError`].
#[derive(Debug, Clone)]
pub struct FeedLoader {
    client: DashClient,
}

impl FeedLoader {
    /// Creates a loader on top of an existing client (cloned internally).
    pub fn new(client: &DashClient) -> Self {
        Self {
            client: client.clone(),
        }
    }

    /// The client this loader issues requests with.
    pub fn client(&self) -> &DashClient {
        &self.client
    }

    /// Fetches `news.json`.
    ///
    /// An `{ "items": [] }` response is a success with no items; the caller decides
    /// how to present an empty feed.
    ///
    /// # Errors
    ///
    /// Returns a `DashError` on network failure, a non-success status, or malformed JSON.
    #[tracing::instrument(skip(self), err, fields(base = %self.client.base()))]
    pub async fn news(&self) -> Result<NewsFeed, DashError> {
        api::fetch_news(&self.client).await
    }

    /// Fetches the UF/m² price table (`ufm2.json`), wrapped or bare.
    ///
    /// # Errors
    ///
    /// Returns a `DashError` on network failure, a non-success status, or malformed JSON.
    #[tracing::instrument(skip(self), err, fields(base = %self.client.base()))]
    pub async fn zones(&self) -> Result<Vec<Zone>, DashError> {
        api::fetch_zones(&self.client).await
    }
}
