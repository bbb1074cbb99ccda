//! HTTP cache headers for API responses.
//!
//! ETags are a BLAKE3 hash of the serialized body, so a client revalidating
//! with `If-None-Match` gets a 304 exactly when the payload is unchanged.

use anyhow::{Context, Result};
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Channel, playlist and video listings: 10 minutes.
pub const LIST_MAX_AGE: u32 = 10 * 60;
/// Download links expire sooner upstream: 30 minutes.
pub const DOWNLOAD_MAX_AGE: u32 = 30 * 60;

pub fn content_etag(body: &[u8]) -> String {
    let hash = blake3::hash(body);
    format!("W/\"{}\"", &hash.to_hex()[..32])
}

/// Weak comparison against every tag listed in `If-None-Match`.
pub fn etag_matches(request_headers: &HeaderMap, etag: &str) -> bool {
    let strip = |tag: &str| tag.trim().trim_start_matches("W/").to_string();
    let current = strip(etag);
    request_headers
        .get_all(header::IF_NONE_MATCH)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|candidate| candidate.trim() == "*" || strip(candidate) == current)
}

/// Serializes `payload` as JSON with public cache headers, answering 304 when
/// the client already holds this exact body.
pub fn cached_json<T: Serialize>(
    payload: &T,
    max_age: u32,
    request_headers: &HeaderMap,
) -> Result<Response> {
    let body = serde_json::to_vec(payload).context("serializing response body")?;
    let etag = content_etag(&body);

    let mut response = if etag_matches(request_headers, &etag) {
        StatusCode::NOT_MODIFIED.into_response()
    } else {
        (
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response()
    };

    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_str(&format!("public, max-age={max_age}, s-maxage={max_age}"))
            .context("building Cache-Control header")?,
    );
    headers.insert(
        header::ETAG,
        HeaderValue::from_str(&etag).context("building ETag header")?,
    );
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));
    Ok(response)
}
