//! The dashboard controller: one owner for all view state.
//!
//! User interactions arrive as [`Command`]s carrying an index or link, never as
//! callbacks holding on to list positions. Feed responses arrive tagged with a
//! [`Ticket`]; a response older than one already applied for the same feed is
//! discarded, so a slow request can never overwrite a newer one.

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::core::DashError;
use crate::feed::{FeedLoader, NewsFeed, NewsItem, Zone};
use crate::render::{self, NewsStatus, PageModel, RenderInput, TableStatus};
use crate::rotation::RotationEngine;
use crate::selection::{SelectionManager, ZoneField};
use crate::store::KeyValueStore;

/// A user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Reload both feeds now.
    Refresh,
    /// Select the news item at this feed position.
    Select { index: usize },
    /// Drop the current selection.
    Deselect,
    /// Pin the selected item to this table row.
    Pin { zone: usize },
    /// Clear this table row's pin.
    Unpin { zone: usize },
    /// Save the selected item.
    Save,
    /// Remove the saved item with this link.
    Unsave { link: String },
    /// Overwrite one text cell of a table row.
    Edit {
        zone: usize,
        field: ZoneField,
        text: String,
    },
}

impl FromStr for Command {
    type Err = DashError;

    /// Parses the line protocol: `refresh`, `select 3`, `deselect`, `pin 0`,
    /// `unpin 0`, `save`, `unsave <link>`, `edit <row> <zone|value|note> <text…>`.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let index = |what: &str, raw: &str| -> Result<usize, DashError> {
            raw.parse::<usize>()
                .map_err(|_| DashError::Data(format!("`{what}` expects a row number, got `{raw}`")))
        };

        match verb.to_ascii_lowercase().as_str() {
            "refresh" => Ok(Command::Refresh),
            "select" => Ok(Command::Select {
                index: index("select", rest)?,
            }),
            "deselect" => Ok(Command::Deselect),
            "pin" => Ok(Command::Pin {
                zone: index("pin", rest)?,
            }),
            "unpin" => Ok(Command::Unpin {
                zone: index("unpin", rest)?,
            }),
            "save" => Ok(Command::Save),
            "unsave" if !rest.is_empty() => Ok(Command::Unsave {
                link: rest.to_string(),
            }),
            "edit" => {
                let mut parts = rest.split_whitespace();
                let zone = index("edit", parts.next().unwrap_or_default())?;
                let field = parts.next().unwrap_or_default().parse::<ZoneField>()?;
                // Cell text is whitespace-normalized on edit anyway.
                let text = parts.collect::<Vec<_>>().join(" ");
                Ok(Command::Edit { zone, field, text })
            }
            _ => Err(DashError::Data(format!("unrecognized command `{line}`"))),
        }
    }
}

/// What the driver has to do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Re-render the page.
    Render,
    /// Start a refresh of both feeds.
    Refresh,
    /// Nothing changed.
    Nothing,
}

/// Sequence number attached to one feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
struct SeqGuard {
    issued: u64,
    applied: u64,
}

impl SeqGuard {
    fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    fn accept(&mut self, ticket: Ticket) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        true
    }
}

/// All dashboard state, owned by a single instance per page lifecycle.
#[derive(Debug)]
pub struct Dashboard<S> {
    items: Vec<NewsItem>,
    last_updated: Option<String>,
    news_status: NewsStatus,
    table_status: TableStatus,
    rotation: RotationEngine,
    selection: SelectionManager<S>,
    news_seq: SeqGuard,
    zones_seq: SeqGuard,
}

impl<S: KeyValueStore> Dashboard<S> {
    /// A dashboard with no data yet; saved news is restored from `store`.
    pub fn new(store: S) -> Self {
        Self {
            items: Vec::new(),
            last_updated: None,
            news_status: NewsStatus::Loading,
            table_status: TableStatus::Loading,
            rotation: RotationEngine::new(),
            selection: SelectionManager::new(store),
            news_seq: SeqGuard::default(),
            zones_seq: SeqGuard::default(),
        }
    }

    pub fn items(&self) -> &[NewsItem] {
        &self.items
    }

    pub fn rotation(&self) -> &RotationEngine {
        &self.rotation
    }

    pub fn selection(&self) -> &SelectionManager<S> {
        &self.selection
    }

    pub fn zones(&self) -> &[Zone] {
        self.selection.zones()
    }

    pub fn news_status(&self) -> NewsStatus {
        self.news_status
    }

    pub fn table_status(&self) -> TableStatus {
        self.table_status
    }

    /// Issue the ticket for a news request about to start.
    pub fn begin_news(&mut self) -> Ticket {
        self.news_seq.issue()
    }

    /// Issue the ticket for a price table request about to start.
    pub fn begin_zones(&mut self) -> Ticket {
        self.zones_seq.issue()
    }

    /// Apply a news response. Returns `false` if it was stale and ignored.
    ///
    /// Success resets rotation to the first item (idle for an empty feed) and
    /// re-anchors the selection. Failure empties the news regions and stops rotation.
    pub fn apply_news(&mut self, ticket: Ticket, result: Result<NewsFeed, DashError>) -> bool {
        if !self.news_seq.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale news response");
            return false;
        }

        match result {
            Ok(feed) => {
                tracing::info!(items = feed.items.len(), "news loaded");
                if let Some(note) = &feed.note {
                    tracing::warn!(%note, "news feed carries a producer note");
                }
                self.items = feed.items;
                self.last_updated = feed.last_updated;
                self.news_status = NewsStatus::Loaded;
                self.rotation.start(self.items.len());
            }
            Err(e) => {
                tracing::error!(error = %e, "news unavailable");
                self.items.clear();
                self.last_updated = None;
                self.news_status = NewsStatus::Failed;
                self.rotation.stop();
            }
        }
        self.selection.reconcile(&self.items);
        true
    }

    /// Apply a price table response. Returns `false` if it was stale and ignored.
    ///
    /// On failure the rows shown so far are discarded and an error row is rendered.
    pub fn apply_zones(&mut self, ticket: Ticket, result: Result<Vec<Zone>, DashError>) -> bool {
        if !self.zones_seq.accept(ticket) {
            tracing::debug!(?ticket, "discarding stale price table response");
            return false;
        }

        match result {
            Ok(zones) => {
                tracing::info!(rows = zones.len(), "price table loaded");
                self.selection.replace_zones(zones);
                self.table_status = TableStatus::Loaded;
            }
            Err(e) => {
                tracing::error!(error = %e, "price table unavailable");
                self.selection.clear_zones();
                self.table_status = TableStatus::Failed;
            }
        }
        true
    }

    /// Fetch both feeds concurrently and apply the results.
    pub async fn refresh(&mut self, loader: &FeedLoader) {
        let news_ticket = self.begin_news();
        let zones_ticket = self.begin_zones();
        let (news, zones) = tokio::join!(loader.news(), loader.zones());
        self.apply_news(news_ticket, news);
        self.apply_zones(zones_ticket, zones);
    }

    /// Advance the hero. Returns whether anything changed.
    pub fn tick_rotation(&mut self) -> bool {
        self.rotation.tick().is_some()
    }

    /// Apply a user command.
    ///
    /// Rejected commands (bad index, nothing selected) are logged and change nothing.
    /// A store failure is logged too, but the in-memory change stands.
    pub fn handle(&mut self, cmd: Command) -> Effect {
        tracing::debug!(?cmd, "command");
        let result = match cmd {
            Command::Refresh => return Effect::Refresh,
            Command::Select { index } => self.selection.select(index, &self.items),
            Command::Deselect => {
                self.selection.clear_selection();
                Ok(())
            }
            Command::Pin { zone } => self.selection.pin(zone),
            Command::Unpin { zone } => self.selection.unpin(zone),
            Command::Save => self.selection.save().map(|added| {
                if !added {
                    tracing::debug!("item already saved");
                }
            }),
            Command::Unsave { link } => self.selection.unsave(&link).map(|_| ()),
            Command::Edit { zone, field, text } => self.selection.edit(zone, field, &text),
        };

        match result {
            Ok(()) => Effect::Render,
            Err(e @ (DashError::NoSelection | DashError::OutOfRange { .. })) => {
                tracing::warn!(error = %e, "command rejected");
                Effect::Nothing
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to persist change");
                Effect::Render
            }
        }
    }

    /// Display-ready page content at `now`.
    pub fn page(&self, now: DateTime<Utc>) -> PageModel {
        render::build_page(&self.render_input(now))
    }

    /// The complete HTML page at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::Template`] if the template fails to render.
    pub fn render(&self, now: DateTime<Utc>) -> Result<String, DashError> {
        render::render(&self.render_input(now))
    }

    fn render_input(&self, now: DateTime<Utc>) -> RenderInput<'_> {
        RenderInput {
            items: &self.items,
            hero: self.rotation.hero_index(),
            selected: self.selection.selected().map(|s| s.index),
            news_status: self.news_status,
            last_updated: self.last_updated.as_deref(),
            zones: self.selection.zones(),
            table_status: self.table_status,
            saved: self.selection.saved(),
            now,
        }
    }
}
