//! The normalized title model.
//!
//! A [`Title`] is a movie, show, episode, or any other catalog kind the API
//! reports. Fields that only make sense for one kind live in the matching
//! [`TitleDetails`] variant, so an episode can never carry genres and a movie
//! can never carry a season number.
mod normalizer;
mod raw;

pub use normalizer::{NormalizeError, normalize};

use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A normalized catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    /// IMDb id such as `tt0306414`
    pub id: String,
    /// Display title. For episodes this is the parent series' title.
    pub title: String,
    /// Original title. For episodes this is the parent series' original title.
    pub original_title: String,
    /// Release date; missing parts default to year 0, January and the 1st
    pub release_date: Option<NaiveDate>,
    /// Runtime in whole minutes
    pub runtime_minutes: Option<u64>,
    /// Plain-text plot summary
    pub plot: Option<String>,
    /// URL of the primary image
    pub poster: Option<String>,
    /// Fields that depend on the kind of title
    pub details: TitleDetails,
}

/// Kind-specific part of a [`Title`].
#[derive(Debug, Clone, PartialEq)]
pub enum TitleDetails {
    /// Raw kind `movie`
    Movie(Feature),
    /// Raw kind `tvSeries`
    Show {
        feature: Feature,
        /// Every element is an episode; filled in after the show itself is built.
        episodes: Vec<Title>,
    },
    /// Raw kind `tvEpisode`
    Episode(EpisodeDetails),
    /// Any raw kind besides movie, series and episode, passed through as-is
    Other { kind: String, feature: Feature },
}

/// Fields shared by movies, shows and other non-episode kinds.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Genre names in the order the API lists them
    pub genres: Vec<String>,
    /// Year of first release
    pub release_year: Option<i32>,
    /// Certificate rating such as `PG-13`
    pub rated: Option<String>,
    /// IMDb and Metacritic ratings
    pub rating: FeatureRating,
}

/// Fields specific to episodes.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeDetails {
    /// The episode's own title
    pub name: String,
    /// The episode's own original title
    pub original_name: String,
    /// Season as displayed by the API
    pub season: EpisodeNumber,
    /// Episode number within the season
    pub episode: EpisodeNumber,
    /// IMDb rating of the episode
    pub rating: ImdbRating,
}

/// A season or episode number as displayed by the API.
///
/// Fully numeric text becomes [`EpisodeNumber::Number`]; anything else
/// (e.g. `Specials`) stays text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EpisodeNumber {
    /// Fully numeric value
    Number(u64),
    /// Anything that is not a plain number
    Text(String),
}

impl EpisodeNumber {
    /// Coerces displayed text, keeping it as text unless it is all ASCII digits.
    pub fn parse(text: &str) -> Self {
        if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(number) = text.parse() {
                return Self::Number(number);
            }
        }
        Self::Text(text.to_string())
    }
}

impl fmt::Display for EpisodeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{:02}", number),
            Self::Text(text) => write!(f, "{}", text),
        }
    }
}

/// IMDb user rating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ImdbRating {
    /// Aggregate rating out of 10
    pub score: Option<f64>,
    /// Number of votes behind the score
    pub votes: Option<u64>,
}

/// Metacritic critic rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MetacriticRating {
    /// Metascore out of 100
    pub score: Option<u32>,
    /// Number of critic reviews
    pub votes: Option<u32>,
}

/// Ratings attached to movies, shows and other non-episode kinds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct FeatureRating {
    /// IMDb user rating
    pub imdb: ImdbRating,
    /// Metacritic critic rating
    pub metacritic: MetacriticRating,
}

impl Title {
    /// The normalized kind: `movie`, `show`, `episode` or the raw kind.
    pub fn kind(&self) -> &str {
        match &self.details {
            TitleDetails::Movie(_) => "movie",
            TitleDetails::Show { .. } => "show",
            TitleDetails::Episode(_) => "episode",
            TitleDetails::Other { kind, .. } => kind,
        }
    }

    pub fn is_show(&self) -> bool {
        matches!(self.details, TitleDetails::Show { .. })
    }

    pub fn is_episode(&self) -> bool {
        matches!(self.details, TitleDetails::Episode(_))
    }

    /// Movie, show or other non-episode fields.
    pub fn feature(&self) -> Option<&Feature> {
        match &self.details {
            TitleDetails::Movie(feature)
            | TitleDetails::Show { feature, .. }
            | TitleDetails::Other { feature, .. } => Some(feature),
            TitleDetails::Episode(_) => None,
        }
    }

    pub fn episode_details(&self) -> Option<&EpisodeDetails> {
        match &self.details {
            TitleDetails::Episode(details) => Some(details),
            _ => None,
        }
    }

    /// A show's episodes; `None` for every other kind.
    pub fn episodes(&self) -> Option<&[Title]> {
        match &self.details {
            TitleDetails::Show { episodes, .. } => Some(episodes),
            _ => None,
        }
    }

    /// Attaches the enumerated episode list. Has no effect unless this is a show.
    pub(crate) fn set_episodes(&mut self, list: Vec<Title>) {
        if let TitleDetails::Show { episodes, .. } = &mut self.details {
            *episodes = list;
        }
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            TitleDetails::Episode(details) => write!(
                f,
                "{} S{}E{}: {}",
                self.title, details.season, details.episode, details.name
            ),
            _ => match self.feature().and_then(|feature| feature.release_year) {
                Some(year) => write!(f, "{} ({})", self.title, year),
                None => write!(f, "{}", self.title),
            },
        }
    }
}

/// Flat serialized form of a [`Title`].
///
/// Shared optional fields are always present (as `null` when absent);
/// kind-specific fields appear only for the kinds that have them.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FlatTitle<'a> {
    id: &'a str,
    kind: &'a str,
    title: &'a str,
    original_title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    original_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    season: Option<&'a EpisodeNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    episode_number: Option<&'a EpisodeNumber>,
    #[serde(skip_serializing_if = "Option::is_none")]
    genres: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    release_year: Option<Option<i32>>,
    release_date: Option<String>,
    runtime_minutes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rated: Option<Option<&'a str>>,
    plot: Option<&'a str>,
    rating: RatingRef<'a>,
    poster: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    episodes: Option<&'a [Title]>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RatingRef<'a> {
    Feature(&'a FeatureRating),
    Episode(&'a ImdbRating),
}

impl Serialize for Title {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let feature = self.feature();
        let episode = self.episode_details();

        let rating = match &self.details {
            TitleDetails::Episode(details) => RatingRef::Episode(&details.rating),
            TitleDetails::Movie(feature)
            | TitleDetails::Show { feature, .. }
            | TitleDetails::Other { feature, .. } => RatingRef::Feature(&feature.rating),
        };

        FlatTitle {
            id: &self.id,
            kind: self.kind(),
            title: &self.title,
            original_title: &self.original_title,
            name: episode.map(|d| d.name.as_str()),
            original_name: episode.map(|d| d.original_name.as_str()),
            season: episode.map(|d| &d.season),
            episode_number: episode.map(|d| &d.episode),
            genres: feature.map(|f| f.genres.as_slice()),
            release_year: feature.map(|f| f.release_year),
            release_date: self.release_date.map(|date| date.format("%Y-%m-%d").to_string()),
            runtime_minutes: self.runtime_minutes,
            rated: feature.map(|f| f.rated.as_deref()),
            plot: self.plot.as_deref(),
            rating,
            poster: self.poster.as_deref(),
            episodes: self.episodes(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn episode(id: &str, season: EpisodeNumber, number: u64) -> Title {
        Title {
            id: id.to_string(),
            title: "The Wire".to_string(),
            original_title: "The Wire".to_string(),
            release_date: NaiveDate::from_ymd_opt(2002, 6, 2),
            runtime_minutes: Some(60),
            plot: None,
            poster: None,
            details: TitleDetails::Episode(EpisodeDetails {
                name: "The Target".to_string(),
                original_name: "The Target".to_string(),
                season,
                episode: EpisodeNumber::Number(number),
                rating: ImdbRating {
                    score: Some(8.1),
                    votes: Some(12000),
                },
            }),
        }
    }

    fn show(episodes: Vec<Title>) -> Title {
        Title {
            id: "tt0306414".to_string(),
            title: "The Wire".to_string(),
            original_title: "The Wire".to_string(),
            release_date: None,
            runtime_minutes: None,
            plot: Some("Baltimore.".to_string()),
            poster: None,
            details: TitleDetails::Show {
                feature: Feature {
                    genres: vec!["Crime".to_string(), "Drama".to_string()],
                    release_year: Some(2002),
                    rated: Some("TV-MA".to_string()),
                    rating: FeatureRating::default(),
                },
                episodes,
            },
        }
    }

    #[test]
    fn test_episode_number_parse() {
        assert_eq!(EpisodeNumber::parse("3"), EpisodeNumber::Number(3));
        assert_eq!(EpisodeNumber::parse("07"), EpisodeNumber::Number(7));
        assert_eq!(
            EpisodeNumber::parse("Specials"),
            EpisodeNumber::Text("Specials".to_string())
        );
        assert_eq!(EpisodeNumber::parse(""), EpisodeNumber::Text(String::new()));
        assert_eq!(EpisodeNumber::parse("-1"), EpisodeNumber::Text("-1".to_string()));
        assert_eq!(
            EpisodeNumber::parse("99999999999"),
            EpisodeNumber::Number(99_999_999_999)
        );
    }

    #[test]
    fn test_display() {
        let ep = episode("tt1", EpisodeNumber::Number(1), 2);
        assert_eq!(ep.to_string(), "The Wire S01E02: The Target");

        let special = episode("tt2", EpisodeNumber::Text("Specials".to_string()), 1);
        assert_eq!(special.to_string(), "The Wire SSpecialsE01: The Target");

        assert_eq!(show(vec![]).to_string(), "The Wire (2002)");
    }

    #[test]
    fn test_set_episodes_only_affects_shows() {
        let mut ep = episode("tt1", EpisodeNumber::Number(1), 1);
        ep.set_episodes(vec![episode("tt2", EpisodeNumber::Number(1), 2)]);
        assert_eq!(ep.episodes(), None);

        let mut series = show(vec![]);
        series.set_episodes(vec![episode("tt2", EpisodeNumber::Number(1), 2)]);
        assert_eq!(series.episodes().map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_episode_serialization() {
        let value = serde_json::to_value(episode("tt1", EpisodeNumber::Number(1), 2)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "tt1",
                "kind": "episode",
                "title": "The Wire",
                "originalTitle": "The Wire",
                "name": "The Target",
                "originalName": "The Target",
                "season": 1,
                "episodeNumber": 2,
                "releaseDate": "2002-06-02",
                "runtimeMinutes": 60,
                "plot": null,
                "rating": {"score": 8.1, "votes": 12000},
                "poster": null,
            })
        );
    }

    #[test]
    fn test_show_serializes_episodes_recursively() {
        let series = show(vec![
            episode("tt1", EpisodeNumber::Number(1), 1),
            episode("tt2", EpisodeNumber::Text("Specials".to_string()), 1),
        ]);
        let value = serde_json::to_value(&series).unwrap();

        assert_eq!(value["kind"], "show");
        assert_eq!(value["genres"], json!(["Crime", "Drama"]));
        assert_eq!(value["releaseYear"], 2002);
        assert_eq!(value["rated"], "TV-MA");
        assert_eq!(
            value["rating"],
            json!({
                "imdb": {"score": null, "votes": null},
                "metacritic": {"score": null, "votes": null},
            })
        );
        assert!(value.get("season").is_none());

        let episodes = value["episodes"].as_array().unwrap();
        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0]["kind"], "episode");
        assert_eq!(episodes[0]["id"], "tt1");
        assert_eq!(episodes[1]["season"], "Specials");
        assert!(episodes[1].get("genres").is_none());
    }

    #[test]
    fn test_movie_has_no_episodes_key() {
        let mut movie = show(vec![]);
        if let TitleDetails::Show { feature, .. } = movie.details.clone() {
            movie.details = TitleDetails::Movie(feature);
        }
        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["kind"], "movie");
        assert!(value.get("episodes").is_none());
    }
}
