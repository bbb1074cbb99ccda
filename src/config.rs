#![forbid(unsafe_code)]

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::{
    collections::HashMap,
    env, fs,
    net::IpAddr,
    path::{Path, PathBuf},
};

pub const DEFAULT_ENV_PATH: &str = ".env";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_CHANNELS_FILE: &str = "data/channels.json";
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Where playlist listings come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaylistSource {
    /// Parse the channel's `/playlists` page.
    Scrape,
    /// Query the YouTube Data API v3 (needs `YOUTUBE_API_KEY`).
    DataApi,
}

impl PlaylistSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "scrape" | "html" => Some(Self::Scrape),
            "data-api" | "data_api" | "api" => Some(Self::DataApi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: IpAddr,
    pub port: u16,
    pub channels_file: PathBuf,
    pub playlist_source: PlaylistSource,
    pub youtube_api_key: Option<String>,
    pub max_in_flight: usize,
    pub mirror_enabled: bool,
}

/// Values supplied on the command line; they win over env and `.env`.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub channels_file: Option<PathBuf>,
    pub playlist_source: Option<String>,
    pub max_in_flight: Option<usize>,
    pub env_path: Option<PathBuf>,
}

pub fn resolve_settings(overrides: SettingsOverrides) -> Result<Settings> {
    let env_path = overrides
        .env_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_ENV_PATH));
    let file_vars = read_env_file(env_path)?;
    build_settings(&file_vars, env_var_string, overrides)
}

fn build_settings(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
    overrides: SettingsOverrides,
) -> Result<Settings> {
    let host_raw = overrides
        .host
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| lookup_value("HOST", file_vars, &env_lookup))
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    let host = host_raw
        .parse::<IpAddr>()
        .with_context(|| format!("HOST must be an IPv4 or IPv6 address, got {host_raw:?}"))?;

    let port = overrides
        .port
        .or_else(|| {
            lookup_value("PORT", file_vars, &env_lookup).and_then(|value| value.parse::<u16>().ok())
        })
        .unwrap_or(DEFAULT_PORT);

    let channels_file = overrides
        .channels_file
        .or_else(|| lookup_value("CHANNELS_FILE", file_vars, &env_lookup).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CHANNELS_FILE));

    let playlist_source = match overrides
        .playlist_source
        .or_else(|| lookup_value("PLAYLIST_SOURCE", file_vars, &env_lookup))
    {
        Some(raw) => PlaylistSource::parse(&raw)
            .ok_or_else(|| anyhow!("unknown PLAYLIST_SOURCE {raw:?}; expected scrape or data-api"))?,
        None => PlaylistSource::Scrape,
    };

    let youtube_api_key = lookup_value("YOUTUBE_API_KEY", file_vars, &env_lookup);
    if playlist_source == PlaylistSource::DataApi && youtube_api_key.is_none() {
        bail!("PLAYLIST_SOURCE=data-api requires YOUTUBE_API_KEY");
    }

    let max_in_flight = overrides
        .max_in_flight
        .or_else(|| {
            lookup_value("MAX_IN_FLIGHT", file_vars, &env_lookup)
                .and_then(|value| value.parse::<usize>().ok())
        })
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_MAX_IN_FLIGHT);

    let mirror_enabled = lookup_value("MIRROR_ENABLED", file_vars, &env_lookup)
        .map(|value| !matches!(value.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
        .unwrap_or(true);

    Ok(Settings {
        host,
        port,
        channels_file,
        playlist_source,
        youtube_api_key,
        max_in_flight,
        mirror_enabled,
    })
}

fn env_var_string(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn lookup_value(
    key: &str,
    file_vars: &HashMap<String, String>,
    env_lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    env_lookup(key)
        .or_else(|| file_vars.get(key).cloned())
        .filter(|value| !value.trim().is_empty())
}

pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value_raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value_raw.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|value| value.strip_suffix('"'))
            .or_else(|| {
                value
                    .strip_prefix('\'')
                    .and_then(|value| value.strip_suffix('\''))
            })
            .unwrap_or(value);
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}

/// One entry of the channel list file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChannelEntry {
    #[serde(alias = "channelUrl")]
    pub channel_url: String,
}

#[derive(Deserialize)]
struct ChannelListToml {
    #[serde(default)]
    channel: Vec<ChannelEntry>,
}

/// Loads the static channel list. `.toml` files use `[[channel]]` tables;
/// anything else is read as a JSON array of `{"channelUrl": ...}` objects.
pub fn load_channel_list(path: &Path) -> Result<Vec<ChannelEntry>> {
    let raw = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let entries = if is_toml {
        toml::from_str::<ChannelListToml>(&raw)
            .with_context(|| format!("Parsing {}", path.display()))?
            .channel
    } else {
        serde_json::from_str::<Vec<ChannelEntry>>(&raw)
            .with_context(|| format!("Parsing {}", path.display()))?
    };
    Ok(entries
        .into_iter()
        .map(|entry| ChannelEntry {
            channel_url: entry.channel_url.trim().trim_end_matches('/').to_string(),
        })
        .filter(|entry| !entry.channel_url.is_empty())
        .collect())
}
