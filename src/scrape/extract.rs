//! Anchor extraction from the headlines page.

use std::collections::HashSet;

use crate::feed::NewsItem;
use crate::render::format::safe_text;

const MIN_TITLE_CHARS: usize = 25;
const SUMMARY_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub(crate) href: String,
    pub(crate) text: String,
}

/// Every `<a …>…</a>` in document order, with entity-decoded href and
/// whitespace-normalized text (inner tags become spaces).
pub(crate) fn iter_anchors(html: &str) -> Vec<Anchor> {
    // ASCII lowercasing keeps byte offsets valid for `html`.
    let lower = html.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    let mut res = Vec::new();
    let mut pos = 0usize;

    while let Some(ai) = lower[pos..].find("<a") {
        let ai = pos + ai;
        let after = ai + 2;
        if !matches!(bytes.get(after), Some(b) if b.is_ascii_whitespace() || *b == b'>') {
            // <abbr>, <article>, ...
            pos = after;
            continue;
        }

        let open_end = match lower[ai..].find('>') {
            Some(x) => ai + x,
            None => break,
        };
        let close = match lower[open_end + 1..].find("</a>") {
            Some(x) => open_end + 1 + x,
            None => break,
        };

        let tag_open = &html[ai..=open_end];
        let inner = &html[open_end + 1..close];
        res.push(Anchor {
            href: attr(tag_open, "href").unwrap_or_default(),
            text: safe_text(&decode_entities(&strip_tags(inner))),
        });
        pos = close + "</a>".len();
    }

    tracing::debug!(anchors = res.len(), "scanned headline page");
    res
}

/// Keeps article links on `site`: no tag/category listings, titles of at
/// least 25 characters, first occurrence per link, at most `max` items.
pub(crate) fn select_headlines(
    anchors: &[Anchor],
    site: &str,
    published: &str,
    max: usize,
) -> Vec<NewsItem> {
    let mut seen = HashSet::new();
    anchors
        .iter()
        .filter(|a| !a.href.is_empty() && !a.text.is_empty())
        .filter(|a| a.href.contains(site))
        .filter(|a| !a.href.contains("/tag/") && !a.href.contains("/category/"))
        .filter(|a| a.text.chars().count() >= MIN_TITLE_CHARS)
        .filter(|a| seen.insert(a.href.clone()))
        .take(max)
        .map(|a| NewsItem {
            title: a.text.clone(),
            link: a.href.clone(),
            pub_date: Some(published.to_string()),
            summary: Some(make_summary(&a.text)),
            image: None,
        })
        .collect()
}

/// The title itself, cut to 117 characters plus `...` when longer than 120.
pub(crate) fn make_summary(title: &str) -> String {
    let t = safe_text(title);
    if t.chars().count() <= SUMMARY_MAX_CHARS {
        return t;
    }
    let mut out: String = t.chars().take(SUMMARY_MAX_CHARS - 3).collect();
    out.push_str("...");
    out
}

fn attr(tag: &str, name: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let needle = format!("{name}=");
    let mut from = 0usize;

    while let Some(rel) = lower[from..].find(&needle) {
        let at = from + rel;
        let value_start = at + needle.len();
        if at == 0 || !lower.as_bytes()[at - 1].is_ascii_whitespace() {
            // data-href=, xhref=
            from = value_start;
            continue;
        }

        let rest = &tag[value_start..];
        let value = match rest.chars().next() {
            Some(q @ ('"' | '\'')) => rest[1..].split(q).next().unwrap_or_default(),
            _ => rest
                .split(|c: char| c.is_ascii_whitespace() || c == '>')
                .next()
                .unwrap_or_default(),
        };
        return Some(decode_entities(value.trim()));
    }
    None
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                out.push(' ');
            }
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

pub(crate) fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}
