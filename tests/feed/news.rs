use livedash::{DashClient, DashError, FeedLoader};
use url::Url;

use crate::common;

#[tokio::test]
async fn offline_news_drops_unusable_entries() {
    let server = common::setup_server();
    let mock = common::mock_news(&server, 200, &common::read_fixture("news.json"));

    let feed = common::loader_for(&server).news().await.unwrap();
    mock.assert();

    // null and the entry with neither title nor link are gone
    assert_eq!(feed.items.len(), 4);
    assert_eq!(
        feed.items[0].title,
        "Puerto de San Antonio inicia obras del nuevo terminal"
    );
    assert_eq!(feed.items[0].image, None);
    assert_eq!(
        feed.items[1].image.as_deref(),
        Some("https://cdn.portalportuario.cl/img/valpo.jpg")
    );
    assert_eq!(feed.items[1].summary, None);

    // a link without a title is kept; the placeholder is a rendering concern
    assert_eq!(feed.items[2].title, "");
    assert_eq!(feed.items[2].link, "https://portalportuario.cl/sin-titulo/");
    assert_eq!(feed.items[2].pub_date, None);

    assert_eq!(feed.last_updated.as_deref(), Some("2024-03-05T17:07:00+00:00"));
    assert_eq!(
        feed.source.as_deref(),
        Some("https://portalportuario.cl/titulares/")
    );
    assert_eq!(feed.note, None);
}

#[tokio::test]
async fn offline_news_empty_items_is_a_success() {
    let server = common::setup_server();
    let mock = common::mock_news(&server, 200, r#"{"items": [], "lastUpdated": null}"#);

    let feed = common::loader_for(&server).news().await.unwrap();
    mock.assert();

    assert!(feed.items.is_empty());
    assert_eq!(feed.last_updated, None);
}

#[tokio::test]
async fn offline_news_non_array_items_reads_as_empty() {
    let server = common::setup_server();
    let _mock = common::mock_news(&server, 200, r#"{"items": "nope", "note": "kept old"}"#);

    let feed = common::loader_for(&server).news().await.unwrap();

    assert!(feed.items.is_empty());
    assert_eq!(feed.note.as_deref(), Some("kept old"));
}

#[tokio::test]
async fn offline_news_mistyped_fields_read_as_absent() {
    let server = common::setup_server();
    let body = r#"{"items": [
        {"title": "Nota con fecha en milisegundos", "link": "https://portalportuario.cl/a/", "pubDate": 1709658420000},
        {"title": "Nota con resumen raro", "link": "https://portalportuario.cl/b/", "summary": {"x": 1}, "image": ["x"]},
        {"title": "Nota normal", "link": "https://portalportuario.cl/c/", "pubDate": true}
    ]}"#;
    let _mock = common::mock_news(&server, 200, body);

    let feed = common::loader_for(&server).news().await.unwrap();

    let links: Vec<&str> = feed.items.iter().map(|i| i.link.as_str()).collect();
    assert_eq!(
        links,
        [
            "https://portalportuario.cl/a/",
            "https://portalportuario.cl/b/",
            "https://portalportuario.cl/c/",
        ]
    );
    assert_eq!(
        feed.items[0].pub_date.as_deref(),
        Some("2024-03-05T17:07:00+00:00")
    );
    assert_eq!(feed.items[1].summary, None);
    assert_eq!(feed.items[1].image, None);
    assert_eq!(feed.items[2].pub_date, None);
}

#[tokio::test]
async fn offline_news_http_error_status() {
    let server = common::setup_server();
    let _mock = common::mock_news(&server, 500, "{}");

    let err = common::loader_for(&server).news().await.unwrap_err();

    match err {
        DashError::Status { status, url } => {
            assert_eq!(status, 500);
            assert!(url.contains("news.json"), "url was {url}");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn offline_news_malformed_body() {
    let server = common::setup_server();
    let _mock = common::mock_news(&server, 200, "{\"items\": [");

    let err = common::loader_for(&server).news().await.unwrap_err();
    assert!(matches!(err, DashError::Json(_)), "got {err:?}");
}

#[tokio::test]
async fn offline_news_connection_refused() {
    let client = DashClient::builder()
        .base_url(Url::parse("http://127.0.0.1:9/").unwrap())
        .build()
        .unwrap();

    let err = FeedLoader::new(&client).news().await.unwrap_err();
    assert!(matches!(err, DashError::Http(_)), "got {err:?}");
}

#[tokio::test]
async fn offline_news_resolves_below_base_path() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/site/data/news.json")
            .query_param_exists("v")
            .header("cache-control", "no-store");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"items": [{"title": "Uno", "link": "https://a.cl/1"}]}"#);
    });

    // no trailing slash: the builder adds it
    let client = DashClient::builder()
        .base_url(Url::parse(&format!("{}/site", server.base_url())).unwrap())
        .build()
        .unwrap();
    let feed = FeedLoader::new(&client).news().await.unwrap();

    mock.assert();
    assert_eq!(feed.items.len(), 1);
}

#[test]
fn cache_busted_urls_carry_the_stamp() {
    let client = DashClient::builder()
        .base_url(Url::parse("https://example.org/dash/").unwrap())
        .build()
        .unwrap();

    let url = client.cache_busted("data/news.json").unwrap();
    assert_eq!(url.path(), "/dash/data/news.json");

    let stamp = url
        .query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    assert!(stamp.parse::<i64>().unwrap() > 1_600_000_000_000);
}
