//! Response shapes of the persisted queries.
//!
//! These structures mirror the JSON the API returns. Records that are later
//! merged with metadata stay as raw JSON objects; everything the client walks
//! through is typed.
use serde::Deserialize;
use serde_json::{Map, Value};

/// The outer GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,
    /// `null` and a missing key both mean no errors
    #[serde(default)]
    pub errors: Option<Vec<ErrorEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEntry {
    #[serde(default)]
    pub message: String,
}

/// A relay-style connection page.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Connection<N> {
    pub edges: Vec<Edge<N>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Edge<N> {
    pub node: N,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

/// `TitleSeasonsQuery` payload (below `data.title`)
#[derive(Debug, Deserialize)]
pub(crate) struct SeasonsTitle {
    pub episodes: SeasonsEpisodes,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeasonsEpisodes {
    pub displayable_seasons: Connection<SeasonNode>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SeasonNode {
    pub season: String,
}

/// `TitleEpisodesBySeasonQuery` payload (below `data.title`)
#[derive(Debug, Deserialize)]
pub(crate) struct EpisodesTitle {
    pub episodes: EpisodesContainer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EpisodesContainer {
    pub episodes: Connection<Map<String, Value>>,
}

/// `TitlesPersistedMetadataQuery` / `TitlesNonPersistedMetadataQuery` payload.
#[derive(Debug, Deserialize)]
pub(crate) struct TitlesBatch {
    pub titles: Vec<Option<Map<String, Value>>>,
}
