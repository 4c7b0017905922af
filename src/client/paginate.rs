//! Cursor pagination over the RFC 5988 `Link` header convention.

use async_stream::try_stream;
use futures::{Stream, StreamExt};
use reqwest::header::{HeaderMap, LINK};
use serde_json::Value;

use super::OktaClient;
use crate::error::Result;

/// Walk a paginated listing lazily, yielding one page body at a time.
///
/// The first request is `GET {path}?{params}`. After each page the response's
/// `Link` header is searched for a `rel="next"` cursor URL; when present, the
/// next request uses that URL directly (the original `params` are dropped;
/// the cursor already encodes them), and the sequence ends when no cursor
/// remains. The walk is finite and not restartable.
pub fn paginate<'a>(
    client: &'a OktaClient,
    path: &'a str,
    params: &'a [(&'a str, &'a str)],
) -> impl Stream<Item = Result<Value>> + 'a {
    try_stream! {
        let mut page = Some(client.get(path, params).await?);
        while let Some(resp) = page.take() {
            let next = next_link(&resp.headers);
            yield resp.data;
            if let Some(url) = next {
                page = Some(client.get(&url, &[]).await?);
            }
        }
    }
}

/// Drain a paginated listing eagerly, flattening page arrays into records.
pub async fn collect_records(
    client: &OktaClient,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Vec<Value>> {
    let pages = paginate(client, path, params);
    futures::pin_mut!(pages);
    let mut records = Vec::new();
    while let Some(page) = pages.next().await {
        match page? {
            Value::Array(items) => records.extend(items),
            other => records.push(other),
        }
    }
    Ok(records)
}

/// Find the `rel="next"` cursor URL, searching every `Link` header value.
fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(parse_next_link)
}

fn parse_next_link(raw: &str) -> Option<String> {
    raw.split(',')
        .find_map(|segment| next_from_segment(segment.trim()))
        .map(str::to_string)
}

/// One `<url>; rel="..."` segment; returns the URL only for `rel="next"`.
fn next_from_segment(segment: &str) -> Option<&str> {
    let open = segment.find('<')?;
    let close = segment[open..].find('>')? + open;
    let url = &segment[open + 1..close];
    let has_next_rel = segment[close + 1..].split(';').any(|param| {
        param
            .trim()
            .strip_prefix("rel=")
            .map(|rel| rel.trim().trim_matches('"') == "next")
            .unwrap_or(false)
    });
    if has_next_rel {
        Some(url)
    } else {
        None
    }
}
