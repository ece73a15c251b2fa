//! Page rendering.
//!
//! Rendering is split in two pure steps: [`build_page`] turns dashboard state
//! into a [`PageModel`] of display strings (fallbacks, truncation, dates
//! already applied), and [`render_page`] feeds that model through the askama
//! template. Every string reaches the HTML through askama's escaper, so feed
//! content is always shown as text, never interpreted as markup.

pub mod format;

use askama::Template;
use chrono::{DateTime, Utc};

use crate::core::DashError;
use crate::feed::{NewsItem, Zone};
use crate::rotation;
use format::{format_clock, format_date, safe_text, safe_url, truncate};

const HERO_TITLE_MAX: usize = 140;
const HERO_SUMMARY_MAX: usize = 220;
const LIST_TITLE_MAX: usize = 110;
const CELL_MAX: usize = 80;

const PUBLISHER: &str = "PortalPortuario";
const NO_TITLE: &str = "Sin título";
const HERO_EMPTY: &str = "Sin noticias disponibles";
const LIST_EMPTY: &str = "Sin noticias";
const LOADING: &str = "Cargando…";
const TABLE_EMPTY: &str = "Sin datos";
const TABLE_ERROR: &str = "Error al cargar datos";
const CELL_EMPTY: &str = "-";
const HERO_PLACEHOLDER: &str =
    "linear-gradient(135deg, rgba(31,182,255,.35), rgba(58,123,213,.25))";

/// Outcome of the latest news load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewsStatus {
    /// Nothing has completed yet.
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// Outcome of the latest price table load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStatus {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// Everything the page depends on. Two equal inputs always render the same page.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub items: &'a [NewsItem],
    pub hero: Option<usize>,
    pub selected: Option<usize>,
    pub news_status: NewsStatus,
    pub last_updated: Option<&'a str>,
    pub zones: &'a [Zone],
    pub table_status: TableStatus,
    pub saved: &'a [NewsItem],
    pub now: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroView {
    pub href: String,
    pub title: String,
    pub summary: String,
    pub meta: String,
    /// CSS `background-image` value; empty for none.
    pub background: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsEntryView {
    /// Position in the feed; the payload of the `select` command.
    pub index: usize,
    pub title: String,
    pub meta: String,
    pub thumb: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneRowView {
    pub index: usize,
    pub zone: String,
    pub value: String,
    pub note: String,
    pub pinned: bool,
    pub pinned_title: String,
    pub pinned_href: String,
    pub pinned_meta: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedView {
    pub title: String,
    pub href: String,
    pub meta: String,
    /// Raw link; the payload of the `unsave` command.
    pub link: String,
}

/// Display-ready page content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageModel {
    pub clock: String,
    pub last_updated: String,
    pub news_note: String,
    pub hero: HeroView,
    pub news: Vec<NewsEntryView>,
    /// Shown in place of the list when non-empty.
    pub news_message: String,
    pub zones: Vec<ZoneRowView>,
    /// Shown as a single full-width table row when non-empty.
    pub table_message: String,
    pub saved: Vec<SavedView>,
    pub has_selection: bool,
    pub selection_label: String,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate<'a> {
    page: &'a PageModel,
}

/// Render a page model to a complete HTML document.
///
/// # Errors
///
/// Returns [`DashError::Template`] if the template fails to render.
pub fn render_page(page: &PageModel) -> Result<String, DashError> {
    Ok(DashboardTemplate { page }.render()?)
}

/// [`build_page`] followed by [`render_page`].
///
/// # Errors
///
/// Returns [`DashError::Template`] if the template fails to render.
pub fn render(input: &RenderInput<'_>) -> Result<String, DashError> {
    render_page(&build_page(input))
}

/// Apply fallbacks, truncation and date formatting to the dashboard state.
pub fn build_page(input: &RenderInput<'_>) -> PageModel {
    let items = input.items;
    let hero_idx = if items.is_empty() {
        None
    } else {
        Some(input.hero.filter(|&i| i < items.len()).unwrap_or(0))
    };
    let selected = input.selected.filter(|&i| i < items.len());

    let hero = hero_idx.map_or_else(empty_hero, |i| hero_view(&items[i]));

    let listed = hero_idx
        .map(|h| rotation::secondary_indices(h, items.len()))
        .unwrap_or_default();
    let news = listed
        .into_iter()
        .map(|index| (index, &items[index]))
        .map(|(index, item)| NewsEntryView {
            index,
            title: title_or_placeholder(&item.title, LIST_TITLE_MAX),
            meta: item
                .pub_date
                .as_deref()
                .map_or_else(|| PUBLISHER.to_string(), |d| format_date(Some(d))),
            thumb: background_url(item.image.as_deref()).unwrap_or_default(),
            selected: selected == Some(index),
        })
        .collect::<Vec<_>>();

    let news_message = match input.news_status {
        NewsStatus::Loading if items.is_empty() => LOADING.to_string(),
        _ if items.is_empty() => LIST_EMPTY.to_string(),
        _ => String::new(),
    };

    let news_note = match input.news_status {
        NewsStatus::Loading => "Cargando noticias…".to_string(),
        NewsStatus::Failed => "No fue posible cargar las noticias.".to_string(),
        NewsStatus::Loaded => match input.last_updated {
            Some(d) => format!("Actualizado desde RSS: {}", format_date(Some(d))),
            None => "Actualización RSS no disponible".to_string(),
        },
    };

    let last_updated = match (input.news_status, input.last_updated) {
        (NewsStatus::Loaded, Some(d)) => format!("Última actualización: {}", format_date(Some(d))),
        _ => "Última actualización: --".to_string(),
    };

    let zones = match input.table_status {
        TableStatus::Loaded => input.zones.iter().enumerate().map(zone_row).collect(),
        TableStatus::Loading | TableStatus::Failed => Vec::new(),
    };
    let table_message = match input.table_status {
        TableStatus::Loading => LOADING.to_string(),
        TableStatus::Failed => TABLE_ERROR.to_string(),
        TableStatus::Loaded if input.zones.is_empty() => TABLE_EMPTY.to_string(),
        TableStatus::Loaded => String::new(),
    };

    let saved = input
        .saved
        .iter()
        .map(|item| SavedView {
            title: title_or_placeholder(&item.title, LIST_TITLE_MAX),
            href: link_or_hash(&item.link),
            meta: format_date(item.pub_date.as_deref()),
            link: item.link.clone(),
        })
        .collect();

    let selection_label = selected
        .map(|i| title_or_placeholder(&items[i].title, LIST_TITLE_MAX))
        .unwrap_or_default();

    PageModel {
        clock: format_clock(input.now),
        last_updated,
        news_note,
        hero,
        news,
        news_message,
        zones,
        table_message,
        saved,
        has_selection: selected.is_some(),
        selection_label,
    }
}

fn empty_hero() -> HeroView {
    HeroView {
        href: "#".to_string(),
        title: HERO_EMPTY.to_string(),
        summary: String::new(),
        meta: String::new(),
        background: String::new(),
    }
}

fn hero_view(item: &NewsItem) -> HeroView {
    HeroView {
        href: link_or_hash(&item.link),
        title: title_or_placeholder(&item.title, HERO_TITLE_MAX),
        summary: truncate(
            &safe_text(item.summary.as_deref().unwrap_or_default()),
            HERO_SUMMARY_MAX,
        ),
        meta: match item.pub_date.as_deref() {
            Some(d) => format!("Publicado: {} · {PUBLISHER}", format_date(Some(d))),
            None => PUBLISHER.to_string(),
        },
        background: background_url(item.image.as_deref())
            .unwrap_or_else(|| HERO_PLACEHOLDER.to_string()),
    }
}

fn zone_row((index, zone): (usize, &Zone)) -> ZoneRowView {
    let pinned = zone.pinned.as_ref().filter(|p| !safe_text(&p.title).is_empty());
    ZoneRowView {
        index,
        zone: cell_text(&zone.zone),
        value: cell_text(&zone.value),
        note: cell_text(zone.note.as_deref().unwrap_or_default()),
        pinned: pinned.is_some(),
        pinned_title: pinned
            .map(|p| truncate(&safe_text(&p.title), LIST_TITLE_MAX))
            .unwrap_or_default(),
        pinned_href: pinned.map(|p| link_or_hash(&p.link)).unwrap_or_default(),
        pinned_meta: pinned
            .and_then(|p| p.pub_date.as_deref())
            .map(|d| format_date(Some(d)))
            .unwrap_or_default(),
    }
}

fn title_or_placeholder(raw: &str, max: usize) -> String {
    let title = safe_text(raw);
    if title.is_empty() {
        NO_TITLE.to_string()
    } else {
        truncate(&title, max)
    }
}

fn cell_text(raw: &str) -> String {
    let text = safe_text(raw);
    if text.is_empty() {
        CELL_EMPTY.to_string()
    } else {
        truncate(&text, CELL_MAX)
    }
}

fn link_or_hash(raw: &str) -> String {
    safe_url(raw).unwrap_or_else(|| "#".to_string())
}

fn background_url(raw: Option<&str>) -> Option<String> {
    raw.and_then(safe_url).map(|u| format!("url(\"{u}\")"))
}
