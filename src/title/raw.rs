//! Raw title record shapes.
//!
//! A record is the overview and genre payloads merged together, or an episode
//! node merged with its metadata batches. Every sub-object the API may send as
//! `null` is an `Option`; required fields are checked by the normalizer.
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RawTitle {
    pub id: String,
    pub title_type: Option<TitleType>,
    pub title_text: Option<Text>,
    pub original_title_text: Option<Text>,
    pub series: Option<SeriesLink>,
    pub title_genres: Option<TitleGenres>,
    pub release_year: Option<ReleaseYear>,
    pub release_date: Option<ReleaseDate>,
    pub runtime: Option<Runtime>,
    pub certificate: Option<Certificate>,
    pub plot: Option<Plot>,
    pub ratings_summary: Option<RatingsSummary>,
    pub metacritic: Option<Metacritic>,
    pub primary_image: Option<Image>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TitleType {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct Text {
    pub text: String,
}

/// Link from an episode to its parent series.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SeriesLink {
    pub series: Option<SeriesTitles>,
    pub displayable_episode_number: Option<DisplayableEpisodeNumber>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SeriesTitles {
    pub title_text: Option<Text>,
    pub original_title_text: Option<Text>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DisplayableEpisodeNumber {
    pub displayable_season: Option<Text>,
    pub episode_number: Option<Text>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TitleGenres {
    pub genres: Vec<GenreEntry>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenreEntry {
    pub genre: Text,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReleaseYear {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReleaseDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Runtime {
    pub seconds: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Certificate {
    pub rating: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Plot {
    pub plot_text: Option<PlotText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PlotText {
    pub plain_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RatingsSummary {
    pub aggregate_rating: Option<f64>,
    pub vote_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Metacritic {
    pub metascore: Option<Metascore>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Metascore {
    pub score: Option<u32>,
    pub review_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Image {
    pub url: Option<String>,
}
