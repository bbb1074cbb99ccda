//! YouTube Data API v3 playlist listing.
//!
//! The API schema is treated as authoritative, so decoding failures are plain
//! errors rather than "unrecognized shape" fallbacks.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

use crate::models::Playlist;

pub const PLAYLISTS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/playlists";
pub const MAX_RESULTS: u32 = 50;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub fn playlists_url(channel_id: &str, api_key: &str) -> Result<String> {
    let max_results = MAX_RESULTS.to_string();
    let url = Url::parse_with_params(
        PLAYLISTS_ENDPOINT,
        &[
            ("part", "snippet,contentDetails"),
            ("channelId", channel_id),
            ("maxResults", max_results.as_str()),
            ("key", api_key),
        ],
    )
    .context("building Data API playlists URL")?;
    Ok(url.into())
}

pub fn parse_playlists(body: &str) -> Result<Vec<Playlist>> {
    let page: PlaylistPage =
        serde_json::from_str(body).context("parsing Data API playlists response")?;
    Ok(page.items.into_iter().map(Playlist::from).collect())
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    content_details: ContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Snippet {
    title: Option<String>,
    description: String,
    channel_title: String,
    thumbnails: SnippetThumbnails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnippetThumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ContentDetails {
    item_count: u64,
}

impl From<PlaylistItem> for Playlist {
    fn from(item: PlaylistItem) -> Self {
        let thumbnails = item.snippet.thumbnails;
        Playlist {
            id: item.id,
            title: item.snippet.title,
            description: item.snippet.description,
            thumbnail: thumbnails
                .high
                .or(thumbnails.medium)
                .or(thumbnails.default)
                .map(|thumb| thumb.url),
            item_count: item.content_details.item_count,
            channel_title: item.snippet.channel_title,
        }
    }
}
