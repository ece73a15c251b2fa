use serde::{Deserialize, Serialize};

/// A single headline from the news feed.
///
/// Identity for de-duplication (saving) is the `link`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// The headline text. May be empty, in which case a placeholder is rendered.
    #[serde(default)]
    pub title: String,
    /// The article URL.
    #[serde(default)]
    pub link: String,
    /// Publication timestamp as delivered by the feed (RFC 3339 or RFC 2822).
    #[serde(default)]
    pub pub_date: Option<String>,
    /// A short summary shown under the hero headline.
    #[serde(default)]
    pub summary: Option<String>,
    /// A lead image URL.
    #[serde(default)]
    pub image: Option<String>,
}

/// The subset of a [`NewsItem`] kept when it is pinned to a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedNews {
    /// The headline at pin time.
    #[serde(default)]
    pub title: String,
    /// The article URL at pin time.
    #[serde(default)]
    pub link: String,
    /// The publication timestamp at pin time.
    #[serde(default)]
    pub pub_date: Option<String>,
}

impl From<&NewsItem> for PinnedNews {
    fn from(item: &NewsItem) -> Self {
        Self {
            title: item.title.clone(),
            link: item.link.clone(),
            pub_date: item.pub_date.clone(),
        }
    }
}

/// One row of the UF/m² price table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Location label.
    #[serde(default)]
    pub zone: String,
    /// Price per square metre, as free text (e.g. `"62,5 UF"`).
    #[serde(default)]
    pub value: String,
    /// Optional remark.
    #[serde(default)]
    pub note: Option<String>,
    /// A news snapshot attached to this row by the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<PinnedNews>,
}

/// A successfully loaded news feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFeed {
    /// Usable items, in feed order.
    pub items: Vec<NewsItem>,
    /// When the producer last refreshed the feed.
    pub last_updated: Option<String>,
    /// A producer remark (typically set when the producer kept stale data).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Where the producer took the headlines from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}
