//! Channel listing from the configured channel pages.

use std::{sync::LazyLock, time::Duration};

use futures::future::join_all;
use scraper::{Html, Selector};
use tracing::warn;

use crate::{
    config::ChannelEntry,
    initial_data::META_OG_TITLE,
    models::Channel,
    upstream::{CHANNEL_USER_AGENT, Outbound, OutboundRequest},
};

const CHANNEL_PAGE_TIMEOUT: Duration = Duration::from_secs(10);

static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:description"]"#).unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static IDENTIFIER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[itemprop="identifier"]"#).unwrap());

/// Fetches every configured channel page concurrently and keeps the ones that
/// answered, in configuration order.
pub async fn list_channels(outbound: &Outbound, entries: &[ChannelEntry]) -> Vec<Channel> {
    let fetches = entries.iter().map(|entry| async move {
        let request =
            OutboundRequest::get(format!("{}/playlists", entry.channel_url), CHANNEL_PAGE_TIMEOUT)
                .header("User-Agent", CHANNEL_USER_AGENT);
        match outbound.fetch(request).await {
            Ok(html) => Some(extract_channel(&html)),
            Err(err) => {
                warn!("Failed to scrape channel {}: {err:#}", entry.channel_url);
                None
            }
        }
    });
    join_all(fetches).await.into_iter().flatten().collect()
}

/// Builds a channel record from the page's `<meta>` tags.
pub fn extract_channel(html: &str) -> Channel {
    let document = Html::parse_document(html);
    let meta = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .and_then(|element| element.value().attr("content"))
            .map(str::to_string)
    };

    let id = meta(&IDENTIFIER);
    Channel {
        channel_url: id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/channel/{id}")),
        id,
        name: meta(&META_OG_TITLE),
        description: meta(&OG_DESCRIPTION),
        thumbnail: meta(&OG_IMAGE),
    }
}
