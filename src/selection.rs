//! The user's selection plus everything the user curates: pins, saved items, cell edits.
//!
//! Every mutation persists the whole affected collection straight away
//! (zones or saved list), as a full snapshot. The in-memory state is updated
//! first, so a failing store still leaves the page showing the user's change.

use std::str::FromStr;

use crate::core::DashError;
use crate::feed::{NewsItem, PinnedNews, Zone};
use crate::render::format::safe_text;
use crate::store::{self, KeyValueStore};

/// An editable text column of the price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneField {
    Zone,
    Value,
    Note,
}

impl FromStr for ZoneField {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zone" | "zona" => Ok(ZoneField::Zone),
            "value" | "valor" => Ok(ZoneField::Value),
            "note" | "nota" => Ok(ZoneField::Note),
            other => Err(DashError::Data(format!("unknown zone field `{other}`"))),
        }
    }
}

/// The selected news item: its position at selection time and a snapshot of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub item: NewsItem,
}

/// Tracks the selection and owns the persisted collections.
#[derive(Debug)]
pub struct SelectionManager<S> {
    store: S,
    selected: Option<Selection>,
    zones: Vec<Zone>,
    saved: Vec<NewsItem>,
}

impl<S: KeyValueStore> SelectionManager<S> {
    /// Creates a manager and restores the saved-news list from `store`.
    pub fn new(store: S) -> Self {
        let saved = store::load_saved(&store).unwrap_or_default();
        Self {
            store,
            selected: None,
            zones: Vec::new(),
            saved,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn selected(&self) -> Option<&Selection> {
        self.selected.as_ref()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn saved(&self) -> &[NewsItem] {
        &self.saved
    }

    /// Selects `items[index]`. Replaces any previous selection.
    ///
    /// # Errors
    ///
    /// Returns [`DashError::OutOfRange`] if `index` is not a valid position.
    pub fn select(&mut self, index: usize, items: &[NewsItem]) -> Result<(), DashError> {
        let item = items.get(index).ok_or(DashError::OutOfRange {
            what: "news",
            index,
            len: items.len(),
        })?;
        self.selected = Some(Selection {
            index,
            item: item.clone(),
        });
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Re-anchors the selection after the news list changed.
    ///
    /// An index that fell out of range drops the selection; otherwise the
    /// snapshot is re-taken from the new list at the same position.
    pub fn reconcile(&mut self, items: &[NewsItem]) {
        let Some(index) = self.selected.as_ref().map(|s| s.index) else {
            return;
        };
        self.selected = items.get(index).map(|item| Selection {
            index,
            item: item.clone(),
        });
    }

    /// Installs a freshly fetched table; a persisted table, when readable, wins.
    pub fn replace_zones(&mut self, fetched: Vec<Zone>) {
        self.zones = match store::load_zones(&self.store) {
            Some(local) => {
                tracing::debug!(rows = local.len(), "using locally stored zones");
                local
            }
            None => fetched,
        };
    }

    /// Drops the table from view. The persisted copy is left alone.
    pub fn clear_zones(&mut self) {
        self.zones.clear();
    }

    /// Attaches a snapshot of the selected item to `zones[zone]`, replacing any pin.
    ///
    /// # Errors
    ///
    /// [`DashError::NoSelection`] without a selection, [`DashError::OutOfRange`] for
    /// a bad row, or a store error (the pin is kept in memory regardless).
    pub fn pin(&mut self, zone: usize) -> Result<(), DashError> {
        let pinned = PinnedNews::from(&self.selected.as_ref().ok_or(DashError::NoSelection)?.item);
        self.zone_mut(zone)?.pinned = Some(pinned);
        self.persist_zones()
    }

    /// Clears the pin on `zones[zone]`.
    ///
    /// # Errors
    ///
    /// [`DashError::OutOfRange`] for a bad row, or a store error.
    pub fn unpin(&mut self, zone: usize) -> Result<(), DashError> {
        self.zone_mut(zone)?.pinned = None;
        self.persist_zones()
    }

    /// Overwrites one text column of `zones[zone]` with the normalized `text`
    /// (whitespace collapsed, `-` when empty).
    ///
    /// # Errors
    ///
    /// [`DashError::OutOfRange`] for a bad row, or a store error.
    pub fn edit(&mut self, zone: usize, field: ZoneField, text: &str) -> Result<(), DashError> {
        let mut normalized = safe_text(text);
        if normalized.is_empty() {
            normalized = "-".to_string();
        }

        let row = self.zone_mut(zone)?;
        match field {
            ZoneField::Zone => row.zone = normalized,
            ZoneField::Value => row.value = normalized,
            ZoneField::Note => row.note = Some(normalized),
        }
        self.persist_zones()
    }

    /// Appends a snapshot of the selected item to the saved list.
    ///
    /// Returns `false` when an entry with the same link is already saved.
    ///
    /// # Errors
    ///
    /// [`DashError::NoSelection`] without a selection, or a store error.
    pub fn save(&mut self) -> Result<bool, DashError> {
        let item = &self.selected.as_ref().ok_or(DashError::NoSelection)?.item;
        if self.saved.iter().any(|s| s.link == item.link) {
            return Ok(false);
        }
        self.saved.push(item.clone());
        self.persist_saved()?;
        Ok(true)
    }

    /// Removes the saved entry with this link. Returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Returns a store error if the updated list cannot be persisted.
    pub fn unsave(&mut self, link: &str) -> Result<bool, DashError> {
        let before = self.saved.len();
        self.saved.retain(|s| s.link != link);
        if self.saved.len() == before {
            return Ok(false);
        }
        self.persist_saved()?;
        Ok(true)
    }

    fn zone_mut(&mut self, index: usize) -> Result<&mut Zone, DashError> {
        let len = self.zones.len();
        self.zones.get_mut(index).ok_or(DashError::OutOfRange {
            what: "zone",
            index,
            len,
        })
    }

    fn persist_zones(&mut self) -> Result<(), DashError> {
        store::save_zones(&mut self.store, &self.zones)
    }

    fn persist_saved(&mut self) -> Result<(), DashError> {
        store::save_saved(&mut self.store, &self.saved)
    }
}
