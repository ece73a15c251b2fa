use serde::{Deserialize, Serialize};

use super::{KeyValueStore, StoreKey};
use crate::core::DashError;
use crate::feed::{NewsItem, Zone};

#[derive(Serialize)]
struct ZonesOut<'a> {
    zones: &'a [Zone],
}

#[derive(Deserialize)]
struct ZonesIn {
    zones: Option<Vec<Zone>>,
}

/// Reads the persisted price table.
///
/// Anything unreadable or corrupt is logged and treated as absent.
pub fn load_zones<S: KeyValueStore + ?Sized>(store: &S) -> Option<Vec<Zone>> {
    let raw = read(store, StoreKey::Zones)?;
    match serde_json::from_str::<ZonesIn>(&raw) {
        Ok(parsed) => parsed.zones,
        Err(e) => {
            tracing::warn!(key = StoreKey::Zones.as_str(), error = %e, "ignoring corrupt stored zones");
            None
        }
    }
}

/// Persists the whole price table as `{ "zones": [...] }`.
///
/// # Errors
///
/// Returns a `DashError` if serialization or the store write fails.
pub fn save_zones<S: KeyValueStore + ?Sized>(store: &mut S, zones: &[Zone]) -> Result<(), DashError> {
    let raw = serde_json::to_string(&ZonesOut { zones })?;
    store.set(StoreKey::Zones, &raw)?;
    tracing::debug!(rows = zones.len(), "persisted zones");
    Ok(())
}

/// Reads the persisted saved-news list.
///
/// Anything unreadable or corrupt is logged and treated as absent.
pub fn load_saved<S: KeyValueStore + ?Sized>(store: &S) -> Option<Vec<NewsItem>> {
    let raw = read(store, StoreKey::SavedNews)?;
    match serde_json::from_str::<Vec<NewsItem>>(&raw) {
        Ok(items) => Some(items),
        Err(e) => {
            tracing::warn!(key = StoreKey::SavedNews.as_str(), error = %e, "ignoring corrupt saved news");
            None
        }
    }
}

/// Persists the whole saved-news list as a bare array.
///
/// # Errors
///
/// Returns a `DashError` if serialization or the store write fails.
pub fn save_saved<S: KeyValueStore + ?Sized>(store: &mut S, items: &[NewsItem]) -> Result<(), DashError> {
    let raw = serde_json::to_string(items)?;
    store.set(StoreKey::SavedNews, &raw)?;
    tracing::debug!(items = items.len(), "persisted saved news");
    Ok(())
}

fn read<S: KeyValueStore + ?Sized>(store: &S, key: StoreKey) -> Option<String> {
    match store.get(key) {
        Ok(raw) => raw.filter(|s| !s.trim().is_empty()),
        Err(e) => {
            tracing::warn!(key = key.as_str(), error = %e, "store read failed");
            None
        }
    }
}
