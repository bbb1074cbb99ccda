#![forbid(unsafe_code)]

//! Library half of the podcast API: configuration, outbound fetching and the
//! extractors that turn YouTube pages into podcast records. The HTTP surface
//! lives in `src/bin/backend.rs`.

pub mod caching;
pub mod channels;
pub mod config;
pub mod data_api;
pub mod downloads;
pub mod error;
pub mod initial_data;
pub mod models;
pub mod playlists;
pub mod upstream;
pub mod videos;
