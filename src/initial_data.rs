//! Locating and decoding the `ytInitialData` blob YouTube inlines into its
//! channel and playlist pages.
//!
//! The blob is located by script prefix and parsed as the first JSON value
//! after the assignment. Navigation then goes through typed serde structs
//! (all fields defaulted) instead of probing raw `Value`s, and individual
//! tiles are decoded per renderer shape by the playlist/video extractors.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ExtractError;

const INITIAL_DATA_PREFIXES: [&str; 2] = ["var ytInitialData =", "window[\"ytInitialData\"] ="];

static SCRIPT: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());
pub(crate) static META_OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());

/// Finds the first inline script assigning `ytInitialData` whose JSON parses.
///
/// Scripts that match the prefix but fail to parse are logged and skipped.
pub fn locate(html: &str) -> Result<Value, ExtractError> {
    let document = Html::parse_document(html);
    locate_in(&document)
}

pub(crate) fn locate_in(document: &Html) -> Result<Value, ExtractError> {
    for script in document.select(&SCRIPT) {
        let text = script.text().collect::<String>();
        let trimmed = text.trim_start();
        let Some(rest) = INITIAL_DATA_PREFIXES
            .iter()
            .find_map(|prefix| trimmed.strip_prefix(prefix))
        else {
            continue;
        };

        // The blob is followed by `;` and often more statements; only the
        // first JSON value matters.
        match serde_json::Deserializer::from_str(rest)
            .into_iter::<Value>()
            .next()
        {
            Some(Ok(value)) => return Ok(value),
            Some(Err(err)) => warn!("Failed to parse ytInitialData: {err}"),
            None => warn!("ytInitialData assignment had no value"),
        }
    }
    Err(ExtractError::MissingInitialData)
}

/// `og:title` of the page, or an empty string.
pub(crate) fn og_title(document: &Html) -> String {
    document
        .select(&META_OG_TITLE)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string()
}

/// Decodes a navigation node, mapping type mismatches to a layout error.
pub(crate) fn decode<T: DeserializeOwned>(value: &Value) -> Result<T, ExtractError> {
    T::deserialize(value).map_err(ExtractError::Layout)
}

/// Decodes the payload under `key` if the tile has that renderer shape.
/// A present-but-malformed payload counts as unrecognized.
pub(crate) fn shape<T: DeserializeOwned>(item: &Value, key: &str) -> Option<T> {
    let payload = item.get(key)?;
    match T::deserialize(payload) {
        Ok(decoded) => Some(decoded),
        Err(err) => {
            debug!("ignoring malformed {key}: {err}");
            None
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct InitialData {
    pub contents: Option<PageContents>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct PageContents {
    pub two_column_browse_results_renderer: Option<BrowseResults>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct BrowseResults {
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Tab {
    pub tab_renderer: Option<TabRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TabRenderer {
    pub selected: bool,
    pub content: Option<TabContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TabContent {
    pub section_list_renderer: Option<SectionList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SectionList {
    pub contents: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Section {
    pub item_section_renderer: Option<ItemSection>,
}

/// Section contents stay raw; each extractor decodes its own slot shapes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ItemSection {
    pub contents: Vec<Value>,
}

impl InitialData {
    /// Renderer of the tab at index 0; `None` when that tab is some other kind.
    pub(crate) fn into_first_tab(self) -> Option<TabRenderer> {
        self.contents?
            .two_column_browse_results_renderer?
            .tabs
            .into_iter()
            .next()?
            .tab_renderer
    }

    pub(crate) fn into_tabs(self) -> Vec<TabRenderer> {
        self.contents
            .and_then(|contents| contents.two_column_browse_results_renderer)
            .map(|browse| {
                browse
                    .tabs
                    .into_iter()
                    .filter_map(|tab| tab.tab_renderer)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl TabRenderer {
    /// Item section at index 0 of the section list, without skipping sections
    /// of other shapes.
    pub(crate) fn into_first_section(self) -> Option<ItemSection> {
        self.content?
            .section_list_renderer?
            .contents
            .into_iter()
            .next()?
            .item_section_renderer
    }

    pub(crate) fn into_sections(self) -> Vec<ItemSection> {
        self.content
            .and_then(|content| content.section_list_renderer)
            .map(|list| {
                list.contents
                    .into_iter()
                    .filter_map(|section| section.item_section_renderer)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// YouTube's formatted text: either `simpleText` or a list of runs.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct FormattedText {
    pub simple_text: Option<String>,
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct TextRun {
    pub text: Option<String>,
}

impl FormattedText {
    pub(crate) fn run(&self, index: usize) -> Option<&str> {
        self.runs.get(index)?.text.as_deref()
    }

    pub(crate) fn simple_then_runs(&self) -> Option<String> {
        self.simple_text
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.run(0))
            .map(str::to_string)
    }

    pub(crate) fn runs_then_simple(&self) -> Option<String> {
        self.run(0)
            .filter(|text| !text.is_empty())
            .or(self.simple_text.as_deref())
            .map(str::to_string)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Thumbnails {
    pub thumbnails: Vec<UrlRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UrlRef {
    pub url: Option<String>,
}

impl Thumbnails {
    /// Thumbnails are listed smallest first.
    pub(crate) fn largest(&self) -> Option<String> {
        self.thumbnails.last()?.url.clone()
    }
}

/// Leading integer of a count label: "1,204 videos" → 1204, "No videos" → 0.
pub fn parse_count(text: &str) -> u64 {
    let mut count: u64 = 0;
    let mut seen_digit = false;
    for ch in text.trim_start().chars() {
        match ch {
            '0'..='9' => {
                seen_digit = true;
                count = count
                    .saturating_mul(10)
                    .saturating_add(u64::from(ch as u8 - b'0'));
            }
            ',' if seen_digit => continue,
            _ => break,
        }
    }
    count
}
