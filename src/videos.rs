//! Video listing for a playlist, optionally with download links attached.

use std::time::Duration;

use futures::future::join_all;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    downloads::DownloadResolver,
    error::{ExtractError, ListingError},
    initial_data::{self, FormattedText, InitialData, TabRenderer, Thumbnails},
    models::Video,
    upstream::{BROWSER_USER_AGENT, Outbound, OutboundRequest},
};

const PLAYLIST_PAGE_TIMEOUT: Duration = Duration::from_secs(12);

pub fn playlist_url(playlist_id: &str) -> String {
    format!("https://www.youtube.com/playlist?list={playlist_id}")
}

pub async fn list_videos(
    outbound: &Outbound,
    playlist_id: &str,
) -> Result<Vec<Video>, ListingError> {
    let request = OutboundRequest::get(playlist_url(playlist_id), PLAYLIST_PAGE_TIMEOUT)
        .header("User-Agent", BROWSER_USER_AGENT);
    let html = outbound
        .fetch(request)
        .await
        .map_err(ListingError::Upstream)?;
    Ok(extract_videos(&html)?)
}

/// Resolves download links for every video and attaches them. All lookups
/// start together (the outbound pool bounds how many actually run); a failed
/// lookup only marks its own video.
pub async fn attach_downloads(
    outbound: &Outbound,
    resolver: &DownloadResolver,
    videos: Vec<Video>,
) -> Vec<Video> {
    let lookups = videos.into_iter().map(|mut video| async move {
        let outcome = resolver.resolve(outbound, &video.id).await;
        video.downloads = Some(outcome.summary());
        video
    });
    join_all(lookups).await
}

/// Extracts the videos of a playlist page. The list lives under the first
/// tab's first section; if either of those has another shape the page has
/// no list and anything else on it is ignored.
pub fn extract_videos(html: &str) -> Result<Vec<Video>, ExtractError> {
    let value = initial_data::locate(html)?;
    let data: InitialData = initial_data::decode(&value)?;

    let Some(first_content) = data
        .into_first_tab()
        .and_then(TabRenderer::into_first_section)
        .and_then(|section| section.contents.into_iter().next())
    else {
        return Ok(Vec::new());
    };

    let slot: VideoListSlot = initial_data::decode(&first_content)?;
    let Some(items) = slot
        .playlist_video_list_renderer
        .and_then(|list| list.contents)
    else {
        return Ok(Vec::new());
    };

    Ok(items.iter().filter_map(video_from_item).collect())
}

fn video_from_item(item: &Value) -> Option<Video> {
    let entry: PlaylistVideo = initial_data::shape(item, "playlistVideoRenderer")?;
    Some(Video {
        id: entry.video_id?,
        title: entry.title.runs_then_simple(),
        description: String::new(),
        thumbnail: entry.thumbnail.largest(),
        published_at: entry.video_info.run(2).unwrap_or_default().to_string(),
        downloads: None,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct VideoListSlot {
    playlist_video_list_renderer: Option<VideoList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct VideoList {
    contents: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PlaylistVideo {
    video_id: Option<String>,
    title: FormattedText,
    thumbnail: Thumbnails,
    video_info: FormattedText,
}
