//! livedash: a live news and UF/m² dashboard rendered to a static HTML page.
//!
//! The dashboard periodically loads two small JSON feeds (headlines and a
//! per-zone price table), features one headline at a time in a rotating hero,
//! lists the rest, and lets the user pin headlines to table rows, save
//! headlines, and edit table cells. User curation is persisted through an
//! injected [`store::KeyValueStore`].
//!
//! # Example
//!
//! ```no_run
//! # use livedash::{DashClient, DashboardBuilder, FeedLoader, store::FileStore};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DashClient::builder()
//!     .base_url(url::Url::parse("https://example.org/dashboard/")?)
//!     .build()?;
//! let loader = FeedLoader::new(&client);
//!
//! let (handle, mut pages) = DashboardBuilder::new(&loader, FileStore::new(".livedash"))
//!     .output("index.html")
//!     .start()?;
//!
//! pages.changed().await?;
//! println!("{} bytes rendered", pages.borrow().len());
//! handle.stop().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod feed;
pub mod render;
pub mod rotation;
pub mod runtime;
pub mod scrape;
pub mod selection;
pub mod store;

pub use crate::config::DashConfig;
pub use crate::controller::{Command, Dashboard, Effect, Ticket};
pub use crate::core::{DashClient, DashClientBuilder, DashError};
pub use crate::feed::{FeedLoader, NewsFeed, NewsItem, PinnedNews, Zone};
pub use crate::render::{NewsStatus, PageModel, TableStatus};
pub use crate::rotation::{RotationEngine, RotationState};
pub use crate::runtime::{DashboardBuilder, DashboardHandle, RuntimeConfig};
pub use crate::scrape::{ScrapeOutcome, Scraper};
pub use crate::selection::{Selection, SelectionManager, ZoneField};
