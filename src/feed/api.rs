use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    core::{DashClient, DashError},
    feed::{
        model::{NewsFeed, NewsItem, PinnedNews, Zone},
        wire,
    },
};

pub(super) async fn fetch_news(client: &DashClient) -> Result<NewsFeed, DashError> {
    let body = client.get_fresh_text(client.news_path(), "news").await?;
    parse_news(&body)
}

pub(super) async fn fetch_zones(client: &DashClient) -> Result<Vec<Zone>, DashError> {
    let body = client.get_fresh_text(client.zones_path(), "ufm2").await?;
    parse_zones(&body)
}

fn parse_news(body: &str) -> Result<NewsFeed, DashError> {
    let envelope: wire::NewsEnvelope = serde_json::from_str(body)?;

    let items = match envelope.items {
        Some(Value::Array(raw)) => raw.into_iter().filter_map(news_item).collect(),
        _ => Vec::new(),
    };

    Ok(NewsFeed {
        items,
        last_updated: non_empty(envelope.last_updated),
        note: non_empty(envelope.note),
        source: non_empty(envelope.source),
    })
}

fn parse_zones(body: &str) -> Result<Vec<Zone>, DashError> {
    let raw = match serde_json::from_str::<wire::ZonesEnvelope>(body)? {
        wire::ZonesEnvelope::Bare(rows) => rows,
        wire::ZonesEnvelope::Wrapped {
            zones: Some(Value::Array(rows)),
        } => rows,
        wire::ZonesEnvelope::Wrapped { .. } => Vec::new(),
    };

    Ok(raw.into_iter().filter_map(zone_row).collect())
}

fn news_item(raw: Value) -> Option<NewsItem> {
    if !raw.is_object() {
        return None;
    }
    let item: wire::NewsItemWire = serde_json::from_value(raw).ok()?;

    let title = item.title.and_then(value_text).unwrap_or_default();
    let link = item.link.and_then(value_text).unwrap_or_default();
    // Nothing to show and nothing to link to.
    if title.is_empty() && link.is_empty() {
        return None;
    }

    Some(NewsItem {
        title,
        link,
        pub_date: item.pub_date.and_then(timestamp_text),
        summary: item.summary.and_then(value_text),
        image: item.image.and_then(value_text),
    })
}

/// Strings pass through; numbers are epoch milliseconds.
fn timestamp_text(v: Value) -> Option<String> {
    match v {
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.to_rfc3339()),
        _ => None,
    }
}

fn zone_row(raw: Value) -> Option<Zone> {
    if !raw.is_object() {
        return None;
    }
    let row: wire::ZoneWire = serde_json::from_value(raw).ok()?;

    let zone = row.zone.and_then(value_text);
    let value = row.value.and_then(value_text);
    let note = row.note.and_then(value_text);
    if zone.is_none() && value.is_none() && note.is_none() {
        return None;
    }

    let pinned = row
        .pinned
        .and_then(|p| serde_json::from_value::<PinnedNews>(p).ok())
        .filter(|p| !p.title.trim().is_empty());

    Some(Zone {
        zone: zone.unwrap_or_default(),
        value: value.unwrap_or_default(),
        note,
        pinned,
    })
}

/// Accept strings and numbers; prices sometimes arrive as bare numbers.
fn value_text(v: Value) -> Option<String> {
    match v {
        Value::String(s) => non_empty(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}
