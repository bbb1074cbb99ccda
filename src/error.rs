//! Error types shared by the page extractors and listing strategies.

use thiserror::Error;

/// Ways the embedded `ytInitialData` blob can fail to yield records.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// No inline script carried a parsable blob.
    #[error("Could not find or parse ytInitialData.")]
    MissingInitialData,
    /// The blob parsed, but a node on the navigation path had the wrong type.
    #[error("Unexpected ytInitialData layout.")]
    Layout(#[source] serde_json::Error),
}

/// Failure of a whole listing request (playlists or videos).
#[derive(Debug, Error)]
pub enum ListingError {
    #[error("upstream request failed: {0:#}")]
    Upstream(anyhow::Error),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}
