//! Download-link lookup through the ssyoutube mirror.
//!
//! The mirror answers a form POST with an HTML table of download buttons.
//! Everything that depends on that markup stays in this module; callers only
//! see [`DownloadResolver::resolve`] and the [`DownloadOutcome`] it returns.

use std::{sync::LazyLock, time::Duration};

use chrono::{SecondsFormat, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::{
    models::{AudioFlag, DownloadLink, DownloadReport, DownloadSummary, LinkKind},
    upstream::{Outbound, OutboundRequest},
};

pub const MIRROR_ENDPOINT: &str = "https://ssyoutube.online/yt-video-detail/";
const MIRROR_TIMEOUT: Duration = Duration::from_secs(15);
const DISABLED_MESSAGE: &str = "download link extraction is disabled";

const MIRROR_HEADERS: [(&str, &str); 16] = [
    (
        "accept",
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7",
    ),
    (
        "accept-language",
        "en-US,en-GB;q=0.9,en;q=0.8,ar-EG;q=0.7,ar;q=0.6",
    ),
    ("cache-control", "max-age=0"),
    ("content-type", "application/x-www-form-urlencoded"),
    ("dnt", "1"),
    ("origin", "https://ssyoutube.online"),
    ("priority", "u=0, i"),
    ("referer", "https://ssyoutube.online/en1/"),
    (
        "sec-ch-ua",
        r#""Not)A;Brand";v="8", "Chromium";v="138", "Google Chrome";v="138""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""Windows""#),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("upgrade-insecure-requests", "1"),
    (
        "user-agent",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36",
    ),
];

static TBODY_ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody tr").unwrap());
static ROWS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static BUTTON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button[data-url]").unwrap());
static FIRST_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:first-child").unwrap());
static SECOND_CELL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td:nth-child(2)").unwrap());
static RESOLUTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\d+p").unwrap());
static AUDIO_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)m4a|mp3|aac|audio").unwrap());

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

pub fn mirror_request(video_id: &str) -> OutboundRequest {
    let watch = watch_url(video_id);
    let request = OutboundRequest::post_form(
        MIRROR_ENDPOINT,
        &[("videoURL", watch.as_str())],
        MIRROR_TIMEOUT,
    );
    MIRROR_HEADERS
        .iter()
        .fold(request, |request, (name, value)| request.header(name, value))
}

/// Result of one lookup. Never an error: failures are carried in `error`.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadOutcome {
    pub success: bool,
    pub audio_links: Vec<DownloadLink>,
    pub video_links: Vec<DownloadLink>,
    pub all_links: Vec<DownloadLink>,
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub fn from_links(links: Vec<DownloadLink>) -> Self {
        let of_kind = |kind: LinkKind| {
            links
                .iter()
                .filter(|link| link.kind == kind)
                .cloned()
                .collect::<Vec<_>>()
        };
        Self {
            success: true,
            audio_links: of_kind(LinkKind::Audio),
            video_links: of_kind(LinkKind::Video),
            all_links: links,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            audio_links: Vec::new(),
            video_links: Vec::new(),
            all_links: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn summary(&self) -> DownloadSummary {
        DownloadSummary {
            success: self.success,
            audio_links: self.audio_links.clone(),
            video_links: self.video_links.clone(),
            error: self.error.clone(),
        }
    }

    pub fn into_report(self, video_id: &str) -> DownloadReport {
        DownloadReport {
            video_id: video_id.to_string(),
            success: self.success,
            total_links: self.all_links.len(),
            audio_links: self.audio_links,
            video_links: self.video_links,
            error: self.error,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Source of download links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadResolver {
    /// Scrape the ssyoutube mirror.
    Mirror,
    /// Lookups are switched off; every video reports a failure.
    Disabled,
}

impl DownloadResolver {
    pub async fn resolve(&self, outbound: &Outbound, video_id: &str) -> DownloadOutcome {
        match self {
            Self::Disabled => DownloadOutcome::failed(DISABLED_MESSAGE),
            Self::Mirror => match outbound.fetch(mirror_request(video_id)).await {
                Ok(html) => DownloadOutcome::from_links(parse_mirror_page(&html)),
                Err(err) => {
                    warn!("Error fetching download links for video {video_id}: {err:#}");
                    DownloadOutcome::failed(format!("{err:#}"))
                }
            },
        }
    }
}

/// Reads download buttons out of the mirror's result table, falling back to
/// any `button[data-url]` on the page when no row carries one.
pub fn parse_mirror_page(html: &str) -> Vec<DownloadLink> {
    let document = Html::parse_document(html);
    let rows = if document.select(&TBODY_ROWS).next().is_some() {
        &*TBODY_ROWS
    } else {
        &*ROWS
    };

    let links: Vec<_> = document.select(rows).filter_map(link_from_row).collect();
    if !links.is_empty() {
        return links;
    }

    document
        .select(&BUTTON)
        .filter_map(|button| {
            let attrs = button.value();
            Some(DownloadLink {
                url: attrs.attr("data-url")?.to_string(),
                quality: attrs.attr("data-quality").unwrap_or("N/A").to_string(),
                has_audio: AudioFlag::from_attr(attrs.attr("data-has-audio")),
                size: "N/A".to_string(),
                kind: LinkKind::Unknown,
            })
        })
        .collect()
}

fn link_from_row(row: ElementRef<'_>) -> Option<DownloadLink> {
    let button = row.select(&BUTTON).next()?;
    let attrs = button.value();
    let url = attrs.attr("data-url")?.to_string();

    let first_cell = cell_text(row, &FIRST_CELL);
    let quality = match attrs.attr("data-quality") {
        Some(quality) => quality.to_string(),
        None => first_cell.lines().next().unwrap_or_default().trim().to_string(),
    };
    let audio_attr = attrs.attr("data-has-audio");
    let kind = classify(&first_cell, audio_attr);
    let has_audio = match kind {
        LinkKind::Audio => AudioFlag::Yes,
        _ => AudioFlag::from_attr(audio_attr),
    };

    Some(DownloadLink {
        url,
        quality,
        has_audio,
        size: cell_text(row, &SECOND_CELL),
        kind,
    })
}

/// Audio if the first cell names an audio format, or if it shows no
/// resolution and the button does not say `data-has-audio="false"`.
pub fn classify(first_cell: &str, has_audio_attr: Option<&str>) -> LinkKind {
    if AUDIO_FORMAT.is_match(first_cell) {
        return LinkKind::Audio;
    }
    let explicitly_silent = has_audio_attr == Some("false");
    if !RESOLUTION.is_match(first_cell) && !explicitly_silent {
        LinkKind::Audio
    } else {
        LinkKind::Video
    }
}

fn cell_text(row: ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
