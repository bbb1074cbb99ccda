//! Records returned by the API.
//!
//! Everything here is request-scoped: records are built from an upstream page,
//! serialized once and dropped. Field names follow the camelCase JSON the
//! clients already consume.

use serde::{Serialize, Serializer};

/// A configured YouTube channel, described by the `<meta>` tags of its page.
///
/// Tags missing from the page are omitted from the JSON rather than failing
/// the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_url: Option<String>,
}

/// A playlist ("podcast") published by a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub item_count: u64,
    pub channel_title: String,
}

/// A playlist entry ("episode").
///
/// `published_at` is whatever relative string the playlist page shows
/// ("7 months ago"); it is not normalized to a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub published_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloads: Option<DownloadSummary>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Audio,
    Video,
    Unknown,
}

/// Whether a download carries an audio track. Serialized as a JSON boolean,
/// or `"N/A"` when the mirror did not say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFlag {
    Yes,
    No,
    Unknown,
}

impl AudioFlag {
    /// Interprets a `data-has-audio` attribute value.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(value) if value.eq_ignore_ascii_case("true") => Self::Yes,
            Some(value) if value.eq_ignore_ascii_case("false") => Self::No,
            _ => Self::Unknown,
        }
    }
}

impl Serialize for AudioFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Yes => serializer.serialize_bool(true),
            Self::No => serializer.serialize_bool(false),
            Self::Unknown => serializer.serialize_str("N/A"),
        }
    }
}

/// One downloadable rendition scraped from the mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadLink {
    pub url: String,
    pub quality: String,
    pub has_audio: AudioFlag,
    pub size: String,
    #[serde(rename = "type")]
    pub kind: LinkKind,
}

/// Download links attached to a video in the playlist listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadSummary {
    pub success: bool,
    pub audio_links: Vec<DownloadLink>,
    pub video_links: Vec<DownloadLink>,
    pub error: Option<String>,
}

/// Body of `/api/podcasts/videos/{id}/downloads`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadReport {
    pub video_id: String,
    pub success: bool,
    pub audio_links: Vec<DownloadLink>,
    pub video_links: Vec<DownloadLink>,
    pub total_links: usize,
    pub error: Option<String>,
    pub timestamp: String,
}
