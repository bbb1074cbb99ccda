#![forbid(unsafe_code)]

//! Axum backend exposing YouTube channels, playlists and videos as a podcast
//! catalogue.
//!
//! Nothing is stored: each request fetches the relevant YouTube page (or the
//! Data API / download mirror), extracts what it needs and answers with JSON
//! plus cache headers. Outbound traffic shares one bounded pool.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::{Path as AxumPath, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use podcast_api::{
    caching::{DOWNLOAD_MAX_AGE, LIST_MAX_AGE, cached_json},
    channels,
    config::{
        ChannelEntry, PlaylistSource, Settings, SettingsOverrides, load_channel_list,
        resolve_settings,
    },
    downloads::DownloadResolver,
    error::ListingError,
    playlists::PlaylistStrategy,
    upstream::{Outbound, UreqFetcher},
    videos,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Parser)]
#[command(name = "backend", about = "Podcast catalogue API backed by YouTube")]
struct BackendArgs {
    /// Address to listen on (overrides HOST).
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (overrides PORT).
    #[arg(long)]
    port: Option<u16>,
    /// Channel list file, JSON or TOML (overrides CHANNELS_FILE).
    #[arg(long)]
    channels_file: Option<PathBuf>,
    /// `scrape` or `data-api` (overrides PLAYLIST_SOURCE).
    #[arg(long)]
    playlist_source: Option<String>,
    /// Maximum concurrent upstream requests (overrides MAX_IN_FLIGHT).
    #[arg(long)]
    max_in_flight: Option<usize>,
    /// Env file read before the process environment.
    #[arg(long)]
    env_file: Option<PathBuf>,
}

impl BackendArgs {
    fn into_overrides(self) -> SettingsOverrides {
        SettingsOverrides {
            host: self.host,
            port: self.port,
            channels_file: self.channels_file,
            playlist_source: self.playlist_source,
            max_in_flight: self.max_in_flight,
            env_path: self.env_file,
        }
    }
}

#[derive(Clone)]
struct AppState {
    outbound: Outbound,
    channels: Arc<Vec<ChannelEntry>>,
    playlists: Arc<PlaylistStrategy>,
    downloads: DownloadResolver,
}

impl AppState {
    fn from_settings(
        settings: &Settings,
        channels: Vec<ChannelEntry>,
        outbound: Outbound,
    ) -> Self {
        let playlists = match (settings.playlist_source, &settings.youtube_api_key) {
            (PlaylistSource::DataApi, Some(api_key)) => PlaylistStrategy::DataApi {
                api_key: api_key.clone(),
            },
            _ => PlaylistStrategy::Scrape,
        };
        let downloads = if settings.mirror_enabled {
            DownloadResolver::Mirror
        } else {
            DownloadResolver::Disabled
        };
        Self {
            outbound,
            channels: Arc::new(channels),
            playlists: Arc::new(playlists),
            downloads,
        }
    }
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    /// Creates a 400 error with the provided message.
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    /// Creates a 500 error with the provided message.
    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = resolve_settings(BackendArgs::parse().into_overrides())?;
    let channels = load_channel_list(&settings.channels_file)
        .with_context(|| format!("loading channel list {}", settings.channels_file.display()))?;
    info!(
        channels = channels.len(),
        playlist_source = ?settings.playlist_source,
        max_in_flight = settings.max_in_flight,
        "configuration loaded"
    );

    let outbound = Outbound::new(Arc::new(UreqFetcher::new()), settings.max_in_flight);
    let state = AppState::from_settings(&settings, channels, outbound);
    let app = router(state);

    let addr = SocketAddr::new(settings.host, settings.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/api/podcasts/channels", get(list_channels))
        .route(
            "/api/podcasts/channels/{channel_id}/playlists",
            get(list_playlists),
        )
        .route(
            "/api/podcasts/playlists/{playlist_id}/videos",
            get(list_videos),
        )
        .route(
            "/api/podcasts/videos/{video_id}/downloads",
            get(video_downloads),
        )
        .fallback(not_found)
        .with_state(state)
}

async fn shutdown_signal() {
    // Only graceful shutdown depends on this; Ctrl+C still terminates.
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", err);
    }
}

#[derive(Serialize)]
struct RootStatus {
    message: &'static str,
    status: &'static str,
}

async fn root() -> Json<RootStatus> {
    Json(RootStatus {
        message: "Podcast API is running",
        status: "success",
    })
}

async fn not_found() -> ApiError {
    ApiError::not_found("endpoint not found")
}

async fn list_channels(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let channels = channels::list_channels(&state.outbound, &state.channels).await;
    respond_cached(&channels, LIST_MAX_AGE, &headers)
}

async fn list_playlists(
    State(state): State<AppState>,
    AxumPath(channel_id): AxumPath<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let channel_id = require_id(&channel_id, "Channel")?;
    let playlists = state
        .playlists
        .list(&state.outbound, channel_id)
        .await
        .map_err(|err| {
            listing_failure(
                err,
                state.playlists.failure_message(),
                "getPlaylistsByChannelId",
                channel_id,
            )
        })?;
    respond_cached(&playlists, LIST_MAX_AGE, &headers)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoListQuery {
    include_downloads: Option<String>,
}

async fn list_videos(
    State(state): State<AppState>,
    AxumPath(playlist_id): AxumPath<String>,
    Query(query): Query<VideoListQuery>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let playlist_id = require_id(&playlist_id, "Playlist")?;
    let mut videos = videos::list_videos(&state.outbound, playlist_id)
        .await
        .map_err(|err| {
            listing_failure(err, "Something went wrong", "getVideosByPlaylistId", playlist_id)
        })?;

    if query.include_downloads.as_deref() == Some("true") && !videos.is_empty() {
        videos = videos::attach_downloads(&state.outbound, &state.downloads, videos).await;
    }
    respond_cached(&videos, LIST_MAX_AGE, &headers)
}

async fn video_downloads(
    State(state): State<AppState>,
    AxumPath(video_id): AxumPath<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let video_id = require_id(&video_id, "Video")?;
    let report = state
        .downloads
        .resolve(&state.outbound, video_id)
        .await
        .into_report(video_id);
    match cached_json(&report, DOWNLOAD_MAX_AGE, &headers) {
        Ok(response) => Ok(response),
        Err(err) => {
            error!("Error in getVideoDownloadLinks for video {video_id}: {err:#}");
            let body = json!({
                "error": "Failed to fetch download links",
                "videoId": video_id,
                "success": false,
            });
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
        }
    }
}

/// Trims and validates an id taken from the path. Ids are interpolated into
/// upstream URLs, so only YouTube's id alphabet is accepted.
fn require_id<'a>(raw: &'a str, label: &str) -> ApiResult<&'a str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(ApiError::bad_request(format!("{label} ID is required")));
    }
    if !id
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(ApiError::bad_request(format!(
            "Invalid {} ID",
            label.to_ascii_lowercase()
        )));
    }
    Ok(id)
}

fn listing_failure(err: ListingError, upstream_message: &str, handler: &str, id: &str) -> ApiError {
    error!("Error in {handler} for {id}: {err:#}");
    match err {
        ListingError::Upstream(_) => ApiError::internal(upstream_message),
        ListingError::Extract(extract) => ApiError::internal(extract.to_string()),
    }
}

fn respond_cached<T: Serialize>(
    payload: &T,
    max_age: u32,
    headers: &HeaderMap,
) -> ApiResult<Response> {
    cached_json(payload, max_age, headers).map_err(|err| {
        error!("Failed to build response: {err:#}");
        ApiError::internal("Something went wrong")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use axum::{
        body::to_bytes,
        http::{HeaderValue, header},
    };
    use podcast_api::{
        config::DEFAULT_MAX_IN_FLIGHT,
        upstream::{Fetcher, OutboundRequest},
    };
    use serde_json::Value;
    use std::collections::HashMap;

    const MIRROR_ROW: &str = r#"<table><tbody>
        <tr><td>m4a</td><td>4 MB</td><td><button data-url="https://cdn.example/a.m4a"></button></td></tr>
        <tr><td>720p</td><td>40 MB</td><td><button data-url="https://cdn.example/v.mp4" data-has-audio="false"></button></td></tr>
    </tbody></table>"#;

    fn state_with(fetcher: impl Fetcher + 'static) -> AppState {
        state_with_channels(fetcher, Vec::new())
    }

    fn state_with_channels(
        fetcher: impl Fetcher + 'static,
        channels: Vec<ChannelEntry>,
    ) -> AppState {
        AppState {
            outbound: Outbound::new(Arc::new(fetcher), DEFAULT_MAX_IN_FLIGHT),
            channels: Arc::new(channels),
            playlists: Arc::new(PlaylistStrategy::Scrape),
            downloads: DownloadResolver::Mirror,
        }
    }

    /// Fetcher answering from a fixed URL → body table; unknown URLs fail.
    fn pages(map: &[(&str, String)]) -> impl Fetcher + 'static {
        let pages: HashMap<String, String> = map
            .iter()
            .map(|(url, body)| (url.to_string(), body.clone()))
            .collect();
        move |request: &OutboundRequest| -> anyhow::Result<String> {
            match pages.get(&request.url) {
                Some(body) => Ok(body.clone()),
                None => bail!("status code 404 for {}", request.url),
            }
        }
    }

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn playlist_page(video_ids: &[&str]) -> String {
        let items: Vec<Value> = video_ids
            .iter()
            .map(|id| {
                json!({"playlistVideoRenderer": {
                    "videoId": id,
                    "title": {"runs": [{"text": format!("Episode {id}")}]},
                    "thumbnail": {"thumbnails": [{"url": format!("https://i.ytimg.com/{id}.jpg")}]},
                    "videoInfo": {"runs": [{"text": "10 views"}, {"text": " • "}, {"text": "3 weeks ago"}]}
                }})
            })
            .collect();
        let data = json!({"contents": {"twoColumnBrowseResultsRenderer": {"tabs": [
            {"tabRenderer": {"selected": true, "content": {"sectionListRenderer": {"contents": [
                {"itemSectionRenderer": {"contents": [
                    {"playlistVideoListRenderer": {"contents": items}}
                ]}}
            ]}}}}
        ]}}});
        format!("<html><body><script>var ytInitialData = {data};</script></body></html>")
    }

    fn channel_page(id: &str) -> String {
        format!(
            r#"<html><head><meta property="og:title" content="Channel {id}">
            <meta itemprop="identifier" content="{id}"></head></html>"#
        )
    }

    #[test]
    fn backend_args_map_to_overrides() {
        let args = BackendArgs::try_parse_from([
            "backend",
            "--port",
            "9000",
            "--host",
            "0.0.0.0",
            "--playlist-source",
            "data-api",
            "--max-in-flight",
            "3",
        ])
        .unwrap();
        let overrides = args.into_overrides();
        assert_eq!(overrides.port, Some(9000));
        assert_eq!(overrides.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(overrides.playlist_source.as_deref(), Some("data-api"));
        assert_eq!(overrides.max_in_flight, Some(3));
        assert!(overrides.channels_file.is_none());
    }

    #[test]
    fn backend_args_reject_unknown_flags() {
        assert!(BackendArgs::try_parse_from(["backend", "--media-root", "/yt"]).is_err());
    }

    #[test]
    fn require_id_validates() {
        assert_eq!(require_id(" UC123 ", "Channel").unwrap(), "UC123");
        let missing = require_id("  ", "Channel").unwrap_err();
        assert_eq!(missing.status, StatusCode::BAD_REQUEST);
        assert_eq!(missing.message, "Channel ID is required");
        let invalid = require_id("UC1&key=x", "Playlist").unwrap_err();
        assert_eq!(invalid.message, "Invalid playlist ID");
    }

    #[tokio::test]
    async fn root_reports_running() {
        let Json(status) = root().await;
        assert_eq!(status.message, "Podcast API is running");
        assert_eq!(status.status, "success");
    }

    #[tokio::test]
    async fn unknown_paths_are_json_404() {
        let response = not_found().await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "endpoint not found"}));
    }

    #[tokio::test]
    async fn channels_listing_survives_total_failure() {
        let state = state_with_channels(
            pages(&[]),
            vec![
                ChannelEntry {
                    channel_url: "https://www.youtube.com/@gone".into(),
                },
                ChannelEntry {
                    channel_url: "https://www.youtube.com/@down".into(),
                },
            ],
        );
        let response = list_channels(State(state), HeaderMap::new()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn channels_listing_returns_reachable_channels() {
        let state = state_with_channels(
            pages(&[("https://www.youtube.com/@up/playlists", channel_page("UCup"))]),
            vec![
                ChannelEntry {
                    channel_url: "https://www.youtube.com/@up".into(),
                },
                ChannelEntry {
                    channel_url: "https://www.youtube.com/@down".into(),
                },
            ],
        );
        let response = list_channels(State(state), HeaderMap::new()).await.unwrap();
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=600, s-maxage=600"
        );
        assert_eq!(
            body_json(response).await,
            json!([{
                "id": "UCup",
                "name": "Channel UCup",
                "channelUrl": "https://www.youtube.com/channel/UCup"
            }])
        );
    }

    #[tokio::test]
    async fn playlists_without_initial_data_return_exact_error() {
        let state = state_with(pages(&[(
            "https://www.youtube.com/channel/UC123/playlists",
            "<html><head><meta property=\"og:title\" content=\"x\"></head><body><script>var a = 1;</script></body></html>".to_string(),
        )]));
        let err = list_playlists(
            State(state),
            AxumPath("UC123".to_string()),
            HeaderMap::new(),
        )
        .await
        .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Could not find or parse ytInitialData."})
        );
    }

    #[tokio::test]
    async fn playlists_upstream_failure_is_generic_500() {
        let state = state_with(pages(&[]));
        let err = list_playlists(State(state), AxumPath("UC1".to_string()), HeaderMap::new())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Something went wrong");
    }

    #[tokio::test]
    async fn playlists_require_channel_id() {
        let state = state_with(pages(&[]));
        let err = list_playlists(State(state), AxumPath(" ".to_string()), HeaderMap::new())
            .await
            .unwrap_err();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Channel ID is required"})
        );
    }

    #[tokio::test]
    async fn videos_listing_without_downloads() {
        let state = state_with(pages(&[(
            "https://www.youtube.com/playlist?list=PL1",
            playlist_page(&["a1", "b2"]),
        )]));
        let response = list_videos(
            State(state),
            AxumPath("PL1".to_string()),
            Query(VideoListQuery::default()),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert_eq!(
            body[0],
            json!({
                "id": "a1",
                "title": "Episode a1",
                "description": "",
                "thumbnail": "https://i.ytimg.com/a1.jpg",
                "publishedAt": "3 weeks ago"
            })
        );
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn videos_with_downloads_isolate_mirror_failure() {
        let page = playlist_page(&["ok1", "broken", "ok2"]);
        let fetcher = move |request: &OutboundRequest| -> anyhow::Result<String> {
            if request.url == "https://www.youtube.com/playlist?list=PL1" {
                return Ok(page.clone());
            }
            match request.form_value("videoURL") {
                Some("https://www.youtube.com/watch?v=broken") => bail!("status code 500"),
                Some(_) => Ok(MIRROR_ROW.to_string()),
                None => bail!("unexpected request to {}", request.url),
            }
        };
        let state = state_with(fetcher);
        let response = list_videos(
            State(state),
            AxumPath("PL1".to_string()),
            Query(VideoListQuery {
                include_downloads: Some("true".into()),
            }),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let videos = body.as_array().unwrap();
        assert_eq!(videos.len(), 3);

        assert_eq!(videos[1]["id"], "broken");
        assert_eq!(videos[1]["downloads"]["success"], false);
        assert!(
            videos[1]["downloads"]["error"]
                .as_str()
                .unwrap()
                .contains("500")
        );

        for index in [0, 2] {
            let downloads = &videos[index]["downloads"];
            assert_eq!(downloads["success"], true);
            assert_eq!(downloads["error"], Value::Null);
            assert_eq!(downloads["audioLinks"][0]["type"], "audio");
            assert_eq!(downloads["audioLinks"][0]["hasAudio"], true);
            assert_eq!(downloads["videoLinks"][0]["type"], "video");
            assert_eq!(downloads["videoLinks"][0]["hasAudio"], false);
        }
    }

    #[tokio::test]
    async fn include_downloads_must_be_literal_true() {
        let page = playlist_page(&["a1"]);
        let fetcher = move |request: &OutboundRequest| -> anyhow::Result<String> {
            assert!(request.form.is_none(), "mirror must not be called");
            Ok(page.clone())
        };
        let response = list_videos(
            State(state_with(fetcher)),
            AxumPath("PL1".to_string()),
            Query(VideoListQuery {
                include_downloads: Some("yes".into()),
            }),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        let body = body_json(response).await;
        assert!(body[0].get("downloads").is_none());
    }

    #[tokio::test]
    async fn videos_listing_honours_if_none_match() {
        let state = state_with(pages(&[(
            "https://www.youtube.com/playlist?list=PL1",
            playlist_page(&["a1"]),
        )]));
        let first = list_videos(
            State(state.clone()),
            AxumPath("PL1".to_string()),
            Query(VideoListQuery::default()),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        let etag = first.headers()[header::ETAG].clone();

        let mut conditional = HeaderMap::new();
        conditional.insert(header::IF_NONE_MATCH, etag);
        let second = list_videos(
            State(state),
            AxumPath("PL1".to_string()),
            Query(VideoListQuery::default()),
            conditional,
        )
        .await
        .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn download_report_shape() {
        let fetcher = |request: &OutboundRequest| -> anyhow::Result<String> {
            assert_eq!(
                request.form_value("videoURL"),
                Some("https://www.youtube.com/watch?v=vid1")
            );
            Ok(MIRROR_ROW.to_string())
        };
        let response = video_downloads(
            State(state_with(fetcher)),
            AxumPath("vid1".to_string()),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            HeaderValue::from_static("public, max-age=1800, s-maxage=1800")
        );
        let body = body_json(response).await;
        assert_eq!(body["videoId"], "vid1");
        assert_eq!(body["success"], true);
        assert_eq!(body["totalLinks"], 2);
        assert_eq!(body["error"], Value::Null);
        assert_eq!(body["audioLinks"].as_array().unwrap().len(), 1);
        assert_eq!(body["videoLinks"].as_array().unwrap().len(), 1);
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn download_report_carries_mirror_failure() {
        let response = video_downloads(
            State(state_with(pages(&[]))),
            AxumPath("vid1".to_string()),
            HeaderMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["totalLinks"], 0);
        assert!(body["error"].as_str().unwrap().contains("404"));
    }

    #[tokio::test]
    async fn disabled_mirror_reports_failure() {
        let mut state = state_with(pages(&[]));
        state.downloads = DownloadResolver::Disabled;
        let response = video_downloads(State(state), AxumPath("vid1".to_string()), HeaderMap::new())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "download link extraction is disabled");
    }

    #[test]
    fn state_picks_strategies_from_settings() {
        let settings = Settings {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            channels_file: PathBuf::from("data/channels.json"),
            playlist_source: PlaylistSource::DataApi,
            youtube_api_key: Some("key".into()),
            max_in_flight: 2,
            mirror_enabled: false,
        };
        let outbound = Outbound::new(Arc::new(pages(&[])), 2);
        let state = AppState::from_settings(&settings, Vec::new(), outbound);
        assert!(matches!(
            state.playlists.as_ref(),
            PlaylistStrategy::DataApi { api_key } if api_key == "key"
        ));
        assert_eq!(state.downloads, DownloadResolver::Disabled);
        assert_eq!(state.playlists.failure_message(), "Failed to fetch playlists");
    }

    #[tokio::test]
    async fn api_error_serializes_json() {
        let response = ApiError::bad_request("missing").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "missing");
    }

    #[test]
    fn router_builds() {
        let _app = router(state_with(pages(&[])));
    }
}
