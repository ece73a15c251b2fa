#![allow(dead_code)]

use std::{fs, path::PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use httpmock::{Method::GET, Mock, MockServer};
use livedash::{DashClient, FeedLoader, NewsItem, Zone};
use url::Url;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixtures_dir().join(name)).unwrap()
}

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn client_for(server: &MockServer) -> DashClient {
    DashClient::builder()
        .base_url(Url::parse(&server.base_url()).unwrap())
        .build()
        .unwrap()
}

pub fn loader_for(server: &MockServer) -> FeedLoader {
    FeedLoader::new(&client_for(server))
}

/// Serves `body` for `GET /data/news.json?v=…`.
pub fn mock_news<'a>(server: &'a MockServer, status: u16, body: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/data/news.json")
            .query_param_exists("v");
        then.status(status)
            .header("content-type", "application/json")
            .body(body);
    })
}

/// Serves `body` for `GET /data/ufm2.json?v=…`.
pub fn mock_zones<'a>(server: &'a MockServer, status: u16, body: &str) -> Mock<'a> {
    server.mock(|when, then| {
        when.method(GET)
            .path("/data/ufm2.json")
            .query_param_exists("v");
        then.status(status)
            .header("content-type", "application/json")
            .body(body);
    })
}

pub fn item(n: usize) -> NewsItem {
    NewsItem {
        title: format!("Titular número {n} sobre comercio portuario"),
        link: format!("https://portalportuario.cl/nota-{n}/"),
        pub_date: Some("2024-03-05T17:07:00Z".to_string()),
        summary: Some(format!("Resumen de la nota {n}")),
        image: None,
    }
}

pub fn items(n: usize) -> Vec<NewsItem> {
    (0..n).map(item).collect()
}

pub fn zone(name: &str, value: &str) -> Zone {
    Zone {
        zone: name.to_string(),
        value: value.to_string(),
        note: None,
        pinned: None,
    }
}

pub fn zones() -> Vec<Zone> {
    vec![
        zone("Providencia", "92,4 UF"),
        zone("Ñuñoa", "78,5 UF"),
        zone("Viña del Mar", "61 UF"),
    ]
}

/// 2024-03-05 17:07:00 UTC, which is 14:07 in Santiago (summer time).
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 5, 17, 7, 0).unwrap()
}
