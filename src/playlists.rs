//! Playlist listing for a channel.
//!
//! Two interchangeable strategies sit behind [`PlaylistStrategy`]: scraping
//! the channel's `/playlists` page (default) or asking the Data API.

use std::time::Duration;

use scraper::Html;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    data_api,
    error::{ExtractError, ListingError},
    initial_data::{self, FormattedText, InitialData, Thumbnails, UrlRef, parse_count},
    models::Playlist,
    upstream::{BROWSER_USER_AGENT, Outbound, OutboundRequest},
};

const CHANNEL_PAGE_TIMEOUT: Duration = Duration::from_secs(15);

pub fn channel_playlists_url(channel_id: &str) -> String {
    format!("https://www.youtube.com/channel/{channel_id}/playlists")
}

/// How playlist listings are produced.
#[derive(Debug, Clone)]
pub enum PlaylistStrategy {
    Scrape,
    DataApi { api_key: String },
}

impl PlaylistStrategy {
    pub async fn list(
        &self,
        outbound: &Outbound,
        channel_id: &str,
    ) -> Result<Vec<Playlist>, ListingError> {
        match self {
            Self::Scrape => {
                let request =
                    OutboundRequest::get(channel_playlists_url(channel_id), CHANNEL_PAGE_TIMEOUT)
                        .header("User-Agent", BROWSER_USER_AGENT);
                let html = outbound
                    .fetch(request)
                    .await
                    .map_err(ListingError::Upstream)?;
                Ok(extract_playlists(&html)?)
            }
            Self::DataApi { api_key } => {
                let url = data_api::playlists_url(channel_id, api_key)
                    .map_err(ListingError::Upstream)?;
                let body = outbound
                    .fetch(OutboundRequest::get(url, data_api::REQUEST_TIMEOUT))
                    .await
                    .map_err(ListingError::Upstream)?;
                data_api::parse_playlists(&body).map_err(ListingError::Upstream)
            }
        }
    }

    /// Client-facing message for an upstream failure.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Self::Scrape => "Something went wrong",
            Self::DataApi { .. } => "Failed to fetch playlists",
        }
    }
}

/// Extracts playlists from a channel `/playlists` page.
///
/// A page whose browse structure is simply absent yields an empty list; only
/// a missing blob or a mistyped node is an error.
pub fn extract_playlists(html: &str) -> Result<Vec<Playlist>, ExtractError> {
    let document = Html::parse_document(html);
    let channel_title = initial_data::og_title(&document);
    let data: InitialData = initial_data::decode(&initial_data::locate_in(&document)?)?;

    let Some(selected) = data.into_tabs().into_iter().find(|tab| tab.selected) else {
        return Ok(Vec::new());
    };

    let mut items = Vec::new();
    for section in selected.into_sections() {
        for content in &section.contents {
            let slot: ShelfSlot = initial_data::decode(content)?;
            if let Some(grid_items) = slot.grid_renderer.and_then(|grid| grid.items) {
                items.extend(grid_items);
            } else if let Some(shelf_items) = slot
                .shelf_renderer
                .and_then(|shelf| shelf.content)
                .and_then(|content| content.horizontal_list_renderer)
                .and_then(|list| list.items)
            {
                items.extend(shelf_items);
            }
        }
    }

    Ok(items
        .iter()
        .filter_map(|item| PlaylistTile::decode(item).into_playlist(&channel_title))
        .collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ShelfSlot {
    grid_renderer: Option<ItemList>,
    shelf_renderer: Option<Shelf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Shelf {
    content: Option<ShelfContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ShelfContent {
    horizontal_list_renderer: Option<ItemList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ItemList {
    items: Option<Vec<Value>>,
}

/// The renderer shapes a playlist tile can take.
#[derive(Debug)]
enum PlaylistTile {
    Grid(GridPlaylist),
    Lockup(Box<LockupView>),
    Unrecognized,
}

impl PlaylistTile {
    /// Tries each known shape in order; the first one that decodes wins.
    fn decode(item: &Value) -> Self {
        if let Some(grid) = initial_data::shape(item, "gridPlaylistRenderer") {
            return Self::Grid(grid);
        }
        if let Some(lockup) = initial_data::shape(item, "lockupViewModel") {
            return Self::Lockup(Box::new(lockup));
        }
        Self::Unrecognized
    }

    fn into_playlist(self, channel_title: &str) -> Option<Playlist> {
        let playlist = match self {
            Self::Grid(grid) => Playlist {
                id: grid.playlist_id?,
                title: grid.title.simple_then_runs(),
                description: String::new(),
                thumbnail: grid.thumbnail.largest(),
                item_count: grid
                    .video_count_text
                    .run(0)
                    .or(grid.video_count_text.simple_text.as_deref())
                    .map(parse_count)
                    .unwrap_or(0),
                channel_title: channel_title.to_string(),
            },
            Self::Lockup(lockup) => {
                let lockup = *lockup;
                let thumbnail = lockup
                    .content_image
                    .and_then(|image| image.collection_thumbnail_view_model)
                    .and_then(|collection| collection.primary_thumbnail)
                    .and_then(|primary| primary.thumbnail_view_model);
                Playlist {
                    id: lockup.content_id?,
                    title: lockup
                        .metadata
                        .and_then(|metadata| metadata.lockup_metadata_view_model)
                        .and_then(|view| view.title)
                        .and_then(|title| title.content),
                    description: String::new(),
                    thumbnail: thumbnail.as_ref().and_then(ThumbnailView::first_source),
                    item_count: thumbnail
                        .as_ref()
                        .and_then(ThumbnailView::badge_text)
                        .map(parse_count)
                        .unwrap_or(0),
                    channel_title: channel_title.to_string(),
                }
            }
            Self::Unrecognized => return None,
        };
        Some(playlist)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct GridPlaylist {
    playlist_id: Option<String>,
    title: FormattedText,
    thumbnail: Thumbnails,
    video_count_text: FormattedText,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LockupView {
    content_id: Option<String>,
    metadata: Option<LockupMetadata>,
    content_image: Option<LockupImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LockupMetadata {
    lockup_metadata_view_model: Option<LockupMetadataView>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LockupMetadataView {
    title: Option<TextContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextContent {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LockupImage {
    collection_thumbnail_view_model: Option<CollectionThumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CollectionThumbnail {
    primary_thumbnail: Option<PrimaryThumbnail>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PrimaryThumbnail {
    thumbnail_view_model: Option<ThumbnailView>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThumbnailView {
    image: Option<ImageSources>,
    overlays: Vec<Overlay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImageSources {
    sources: Vec<UrlRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Overlay {
    thumbnail_overlay_badge_view_model: Option<BadgeOverlay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct BadgeOverlay {
    thumbnail_badges: Vec<Badge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Badge {
    thumbnail_badge_view_model: Option<TextBadge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextBadge {
    text: Option<String>,
}

impl ThumbnailView {
    fn first_source(&self) -> Option<String> {
        self.image.as_ref()?.sources.first()?.url.clone()
    }

    fn badge_text(&self) -> Option<&str> {
        self.overlays
            .first()?
            .thumbnail_overlay_badge_view_model
            .as_ref()?
            .thumbnail_badges
            .first()?
            .thumbnail_badge_view_model
            .as_ref()?
            .text
            .as_deref()
    }
}
