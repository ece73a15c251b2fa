use chrono::{TimeZone, Utc};
use livedash::{
    NewsItem, NewsStatus, PinnedNews, TableStatus, Zone,
    render::{self, RenderInput, format},
};

use crate::common;

fn input<'a>(items: &'a [NewsItem], zones: &'a [Zone], saved: &'a [NewsItem]) -> RenderInput<'a> {
    RenderInput {
        items,
        hero: Some(0),
        selected: None,
        news_status: NewsStatus::Loaded,
        last_updated: Some("2024-03-05T17:07:00Z"),
        zones,
        table_status: TableStatus::Loaded,
        saved,
        now: common::fixed_now(),
    }
}

#[test]
fn hero_is_excluded_from_the_list() {
    let items = common::items(4);
    let mut inp = input(&items, &[], &[]);
    inp.hero = Some(2);

    let page = render::build_page(&inp);
    assert_eq!(page.hero.title, items[2].title);
    let listed: Vec<usize> = page.news.iter().map(|e| e.index).collect();
    assert_eq!(listed, [0, 1, 3]);
    assert!(page.news_message.is_empty());
}

#[test]
fn hero_out_of_range_falls_back_to_first() {
    let items = common::items(2);
    let mut inp = input(&items, &[], &[]);
    inp.hero = Some(9);

    let page = render::build_page(&inp);
    assert_eq!(page.hero.title, items[0].title);
    assert_eq!(page.news.len(), 1);
}

#[test]
fn empty_feed_shows_placeholders() {
    let page = render::build_page(&input(&[], &[], &[]));

    assert_eq!(page.hero.title, "Sin noticias disponibles");
    assert_eq!(page.hero.href, "#");
    assert!(page.news.is_empty());
    assert_eq!(page.news_message, "Sin noticias");

    let html = render::render_page(&page).unwrap();
    assert!(html.contains("Sin noticias disponibles"));
    assert!(html.contains("Sin noticias guardadas"));
}

#[test]
fn loading_and_failure_states() {
    let mut inp = input(&[], &[], &[]);
    inp.news_status = NewsStatus::Loading;
    inp.table_status = TableStatus::Loading;
    let page = render::build_page(&inp);
    assert_eq!(page.news_message, "Cargando…");
    assert_eq!(page.table_message, "Cargando…");
    assert_eq!(page.last_updated, "Última actualización: --");

    inp.news_status = NewsStatus::Failed;
    inp.table_status = TableStatus::Failed;
    let page = render::build_page(&inp);
    assert_eq!(page.news_note, "No fue posible cargar las noticias.");
    assert_eq!(page.news_message, "Sin noticias");
    assert_eq!(page.table_message, "Error al cargar datos");
}

#[test]
fn failed_table_hides_previous_rows() {
    let zones = common::zones();
    let mut inp = input(&[], &zones, &[]);
    inp.table_status = TableStatus::Failed;

    let page = render::build_page(&inp);
    assert!(page.zones.is_empty());

    let html = render::render_page(&page).unwrap();
    assert!(html.contains("Error al cargar datos"));
    assert!(!html.contains("Providencia"));
}

#[test]
fn empty_table_shows_no_data_row() {
    let page = render::build_page(&input(&[], &[], &[]));
    assert_eq!(page.table_message, "Sin datos");
}

#[test]
fn missing_fields_get_fallbacks() {
    let items = vec![
        common::item(0),
        NewsItem {
            title: "   ".to_string(),
            link: "javascript:alert(1)".to_string(),
            pub_date: Some("ayer".to_string()),
            summary: None,
            image: None,
        },
        NewsItem {
            pub_date: None,
            ..common::item(2)
        },
    ];
    let zones = vec![Zone {
        zone: "Centro".to_string(),
        value: " ".to_string(),
        note: None,
        pinned: None,
    }];

    let page = render::build_page(&input(&items, &zones, &[]));

    assert_eq!(page.news[0].title, "Sin título");
    assert_eq!(page.news[0].meta, "Sin fecha");
    assert_eq!(page.news[1].meta, "PortalPortuario");
    assert_eq!(page.zones[0].value, "-");
    assert_eq!(page.zones[0].note, "-");
    assert!(!page.zones[0].pinned);
}

#[test]
fn unsafe_links_become_inert() {
    let items = vec![NewsItem {
        link: "javascript:alert(1)".to_string(),
        image: Some("data:image/png;base64,AAAA".to_string()),
        ..common::item(0)
    }];

    let page = render::build_page(&input(&items, &[], &[]));
    assert_eq!(page.hero.href, "#");
    assert!(page.hero.background.starts_with("linear-gradient"));
}

#[test]
fn markup_in_feed_text_is_escaped() {
    let items = vec![
        NewsItem {
            title: "<script>alert('x')</script> Naviera anuncia nueva ruta".to_string(),
            summary: Some("<b>negrita</b> & más".to_string()),
            ..common::item(0)
        },
        NewsItem {
            title: "<img src=x onerror=alert(1)>".to_string(),
            ..common::item(1)
        },
    ];
    let zones = vec![Zone {
        note: Some("<i>nota</i>".to_string()),
        ..common::zone("Centro", "50 UF")
    }];

    let html = render::render(&input(&items, &zones, &[])).unwrap();

    assert!(!html.contains("<script>alert"));
    assert!(!html.contains("<img src=x"));
    assert!(!html.contains("<b>negrita"));
    assert!(!html.contains("<i>nota"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("&lt;b&gt;negrita"));
    assert!(html.contains("&amp; más"));
}

#[test]
fn long_text_is_truncated() {
    let items = vec![
        NewsItem {
            title: "x".repeat(200),
            summary: Some("y".repeat(400)),
            ..common::item(0)
        },
        NewsItem {
            title: "z".repeat(200),
            ..common::item(1)
        },
    ];

    let page = render::build_page(&input(&items, &[], &[]));
    assert_eq!(page.hero.title.chars().count(), 140);
    assert!(page.hero.title.ends_with('…'));
    assert_eq!(page.hero.summary.chars().count(), 220);
    assert_eq!(page.news[0].title.chars().count(), 110);
}

#[test]
fn hero_meta_and_header_dates() {
    let items = common::items(1);
    let page = render::build_page(&input(&items, &[], &[]));

    assert_eq!(page.hero.meta, "Publicado: 05 mar, 14:07 · PortalPortuario");
    assert_eq!(page.last_updated, "Última actualización: 05 mar, 14:07");
    assert_eq!(page.news_note, "Actualizado desde RSS: 05 mar, 14:07");
    assert_eq!(page.clock, "14:07:00");
}

#[test]
fn missing_last_updated_is_reported() {
    let items = common::items(1);
    let mut inp = input(&items, &[], &[]);
    inp.last_updated = None;

    let page = render::build_page(&inp);
    assert_eq!(page.news_note, "Actualización RSS no disponible");
    assert_eq!(page.last_updated, "Última actualización: --");
}

#[test]
fn pinned_rows_and_selection() {
    let items = common::items(3);
    let zones = vec![
        Zone {
            pinned: Some(PinnedNews::from(&items[1])),
            ..common::zone("Providencia", "92 UF")
        },
        common::zone("Ñuñoa", "78 UF"),
    ];
    let saved = vec![items[2].clone()];
    let mut inp = input(&items, &zones, &saved);
    inp.selected = Some(1);

    let page = render::build_page(&inp);

    assert!(page.zones[0].pinned);
    assert_eq!(page.zones[0].pinned_title, items[1].title);
    assert_eq!(page.zones[0].pinned_meta, "05 mar, 14:07");
    assert!(!page.zones[1].pinned);

    assert!(page.has_selection);
    assert_eq!(page.selection_label, items[1].title);
    assert!(page.news.iter().any(|e| e.index == 1 && e.selected));

    assert_eq!(page.saved.len(), 1);
    assert_eq!(page.saved[0].link, items[2].link);
    assert_eq!(page.saved[0].meta, "05 mar, 14:07");

    let html = render::render_page(&page).unwrap();
    assert!(html.contains("is-selected"));
    assert!(html.contains("data-command=\"unpin\""));
    assert!(!html.contains(" disabled>"));
}

#[test]
fn pin_buttons_disabled_without_selection() {
    let zones = common::zones();
    let html = render::render(&input(&[], &zones, &[])).unwrap();
    assert_eq!(html.matches(" disabled>").count(), zones.len());
}

#[test]
fn rendering_is_deterministic() {
    let items = common::items(5);
    let zones = common::zones();
    let saved = common::items(2);
    let inp = input(&items, &zones, &saved);

    assert_eq!(render::render(&inp).unwrap(), render::render(&inp).unwrap());
}

#[test]
fn dates_are_shown_in_santiago_time() {
    assert_eq!(format::format_date(Some("2024-03-05T17:07:00Z")), "05 mar, 14:07");
    assert_eq!(
        format::format_date(Some("Tue, 05 Mar 2024 15:30:00 +0000")),
        "05 mar, 12:30"
    );
    assert_eq!(format::format_date(Some("2024-12-24T03:30:00Z")), "24 dic, 00:30");
    assert_eq!(format::format_date(Some("2024-03-05 17:07:00")), "05 mar, 14:07");
    assert_eq!(format::format_date(Some("2024-03-05")), "04 mar, 21:00");
    assert_eq!(format::format_date(Some("")), "Sin fecha");
    assert_eq!(format::format_date(None), "Sin fecha");

    let winter = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
    assert_eq!(format::format_clock(winter), "08:00:00");
}

#[test]
fn text_helpers() {
    assert_eq!(format::safe_text("  a \n b\t c  "), "a b c");
    assert_eq!(format::truncate("corto", 10), "corto");
    assert_eq!(format::truncate("una frase", 5), "una…");
    assert_eq!(format::safe_url("https://a.cl/x").as_deref(), Some("https://a.cl/x"));
    assert_eq!(format::safe_url("/relativa"), None);
    assert_eq!(format::safe_url("javascript:alert(1)"), None);
}
