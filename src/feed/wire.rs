use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub(crate) struct NewsEnvelope {
    // Kept loose: a non-array `items` reads as empty, bad entries are dropped one by one.
    pub(crate) items: Option<Value>,
    #[serde(rename = "lastUpdated")]
    pub(crate) last_updated: Option<String>,
    pub(crate) note: Option<String>,
    pub(crate) source: Option<String>,
}

/// Every field is loose: a mistyped optional field reads as absent instead of
/// dropping the whole entry.
#[derive(Deserialize)]
pub(crate) struct NewsItemWire {
    pub(crate) title: Option<Value>,
    pub(crate) link: Option<Value>,
    #[serde(rename = "pubDate")]
    pub(crate) pub_date: Option<Value>,
    pub(crate) summary: Option<Value>,
    pub(crate) image: Option<Value>,
}

/// `ufm2.json` ships either wrapped (`{"zones": [...]}`) or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ZonesEnvelope {
    Bare(Vec<Value>),
    Wrapped { zones: Option<Value> },
}

#[derive(Deserialize)]
pub(crate) struct ZoneWire {
    pub(crate) zone: Option<Value>,
    pub(crate) value: Option<Value>,
    pub(crate) note: Option<Value>,
    pub(crate) pinned: Option<Value>,
}
