//! Maps raw title records onto the [`Title`] model.
use super::raw::{RawTitle, ReleaseDate, Text};
use super::{EpisodeDetails, EpisodeNumber, Feature, FeatureRating, ImdbRating, MetacriticRating};
use super::{Title, TitleDetails};
use chrono::NaiveDate;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur while normalizing a title record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    /// A required field is missing or a value cannot be interpreted
    #[error("Malformed title record '{id}': {reason}")]
    Malformed { id: String, reason: String },
}

/// Normalizes a raw, fully merged title record.
///
/// Pure function: no I/O. Absent optional sub-objects become `None`; missing
/// required fields become [`NormalizeError::Malformed`].
pub fn normalize(record: Value) -> Result<Title, NormalizeError> {
    let id = record
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or("<unknown>")
        .to_string();

    let raw: RawTitle = serde_json::from_value(record).map_err(|e| NormalizeError::Malformed {
        id: id.clone(),
        reason: e.to_string(),
    })?;

    Normalizer { id: &id }.title(raw)
}

/// Raw kinds the client distinguishes. Anything else passes through verbatim.
enum Kind {
    Movie,
    Show,
    Episode,
    Other(String),
}

impl Kind {
    fn resolve(raw: String) -> Self {
        match raw.as_str() {
            "movie" => Kind::Movie,
            "tvSeries" => Kind::Show,
            "tvEpisode" => Kind::Episode,
            _ => Kind::Other(raw),
        }
    }
}

struct Normalizer<'a> {
    id: &'a str,
}

impl Normalizer<'_> {
    fn malformed(&self, reason: impl Into<String>) -> NormalizeError {
        NormalizeError::Malformed {
            id: self.id.to_string(),
            reason: reason.into(),
        }
    }

    fn required<T>(&self, value: Option<T>, field: &str) -> Result<T, NormalizeError> {
        value.ok_or_else(|| self.malformed(format!("missing `{}`", field)))
    }

    fn text(&self, value: Option<Text>, field: &str) -> Result<String, NormalizeError> {
        self.required(value, field).map(|text| text.text)
    }

    fn title(&self, mut raw: RawTitle) -> Result<Title, NormalizeError> {
        let title_type = self.required(raw.title_type.take(), "titleType")?;
        let kind = Kind::resolve(title_type.id);

        let release_date = raw
            .release_date
            .take()
            .map(|date| self.release_date(date))
            .transpose()?;
        let runtime_minutes = raw
            .runtime
            .take()
            .and_then(|runtime| runtime.seconds)
            .map(|seconds| seconds / 60);
        let plot = raw
            .plot
            .take()
            .and_then(|plot| plot.plot_text)
            .and_then(|text| text.plain_text);
        let poster = raw.primary_image.take().and_then(|image| image.url);

        let (title, original_title, details) = match kind {
            Kind::Episode => self.episode(&mut raw)?,
            Kind::Movie => {
                let (title, original) = self.own_titles(&mut raw)?;
                (title, original, TitleDetails::Movie(self.feature(&mut raw)?))
            }
            Kind::Show => {
                let (title, original) = self.own_titles(&mut raw)?;
                let feature = self.feature(&mut raw)?;
                (
                    title,
                    original,
                    TitleDetails::Show {
                        feature,
                        episodes: Vec::new(),
                    },
                )
            }
            Kind::Other(kind) => {
                let (title, original) = self.own_titles(&mut raw)?;
                let feature = self.feature(&mut raw)?;
                (title, original, TitleDetails::Other { kind, feature })
            }
        };

        Ok(Title {
            id: raw.id,
            title,
            original_title,
            release_date,
            runtime_minutes,
            plot,
            poster,
            details,
        })
    }

    fn own_titles(&self, raw: &mut RawTitle) -> Result<(String, String), NormalizeError> {
        Ok((
            self.text(raw.title_text.take(), "titleText")?,
            self.text(raw.original_title_text.take(), "originalTitleText")?,
        ))
    }

    fn imdb_rating(&self, raw: &mut RawTitle) -> Result<ImdbRating, NormalizeError> {
        let summary = self.required(raw.ratings_summary.take(), "ratingsSummary")?;
        Ok(ImdbRating {
            score: summary.aggregate_rating,
            votes: summary.vote_count,
        })
    }

    fn feature(&self, raw: &mut RawTitle) -> Result<Feature, NormalizeError> {
        let genres = self
            .required(raw.title_genres.take(), "titleGenres")?
            .genres
            .into_iter()
            .map(|entry| entry.genre.text)
            .collect();

        let metascore = raw.metacritic.take().and_then(|m| m.metascore);

        Ok(Feature {
            genres,
            release_year: raw.release_year.take().and_then(|y| y.year),
            rated: raw.certificate.take().and_then(|c| c.rating),
            rating: FeatureRating {
                imdb: self.imdb_rating(raw)?,
                metacritic: MetacriticRating {
                    score: metascore.as_ref().and_then(|m| m.score),
                    votes: metascore.as_ref().and_then(|m| m.review_count),
                },
            },
        })
    }

    /// Episodes take their display titles from the parent series.
    fn episode(
        &self,
        raw: &mut RawTitle,
    ) -> Result<(String, String, TitleDetails), NormalizeError> {
        let link = self.required(raw.series.take(), "series")?;
        let series = self.required(link.series, "series.series")?;
        let number = self.required(
            link.displayable_episode_number,
            "series.displayableEpisodeNumber",
        )?;

        let season = self.text(
            number.displayable_season,
            "series.displayableEpisodeNumber.displayableSeason",
        )?;
        let episode = self.text(
            number.episode_number,
            "series.displayableEpisodeNumber.episodeNumber",
        )?;

        let (name, original_name) = self.own_titles(raw)?;
        let details = EpisodeDetails {
            name,
            original_name,
            season: EpisodeNumber::parse(&season),
            episode: EpisodeNumber::parse(&episode),
            rating: self.imdb_rating(raw)?,
        };

        Ok((
            self.text(series.title_text, "series.series.titleText")?,
            self.text(series.original_title_text, "series.series.originalTitleText")?,
            TitleDetails::Episode(details),
        ))
    }

    /// Missing components default to year 0, January, the 1st.
    fn release_date(&self, date: ReleaseDate) -> Result<NaiveDate, NormalizeError> {
        let year = date.year.unwrap_or(0);
        let month = date.month.filter(|m| *m != 0).unwrap_or(1);
        let day = date.day.filter(|d| *d != 0).unwrap_or(1);

        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| self.malformed(format!("invalid release date {}-{}-{}", year, month, day)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movie_record() -> Value {
        json!({
            "id": "tt0133093",
            "titleType": {"id": "movie"},
            "titleText": {"text": "The Matrix"},
            "originalTitleText": {"text": "The Matrix"},
            "titleGenres": {"genres": [
                {"genre": {"text": "Action"}},
                {"genre": {"text": "Sci-Fi"}},
            ]},
            "releaseYear": {"year": 1999},
            "releaseDate": {"year": 1999, "month": 3, "day": 31},
            "runtime": {"seconds": 8160},
            "certificate": {"rating": "R"},
            "plot": {"plotText": {"plainText": "A hacker learns the truth."}},
            "ratingsSummary": {"aggregateRating": 8.7, "voteCount": 2100000},
            "metacritic": {"metascore": {"score": 73, "reviewCount": 36}},
            "primaryImage": {"url": "https://m.media-amazon.com/matrix.jpg"},
        })
    }

    fn episode_record(season: &str, number: &str) -> Value {
        json!({
            "id": "tt0749451",
            "titleType": {"id": "tvEpisode"},
            "titleText": {"text": "The Target"},
            "originalTitleText": {"text": "The Target (orig)"},
            "series": {
                "series": {
                    "titleText": {"text": "The Wire"},
                    "originalTitleText": {"text": "The Wire (orig)"},
                },
                "displayableEpisodeNumber": {
                    "displayableSeason": {"text": season},
                    "episodeNumber": {"text": number},
                },
            },
            "releaseDate": {"year": 2002, "month": 6, "day": 2},
            "runtime": {"seconds": 3540},
            "plot": null,
            "ratingsSummary": {"aggregateRating": 8.1, "voteCount": 11000},
            "primaryImage": null,
        })
    }

    #[test]
    fn test_movie() {
        let title = normalize(movie_record()).unwrap();

        assert_eq!(title.kind(), "movie");
        assert_eq!(title.title, "The Matrix");
        assert_eq!(title.release_date, NaiveDate::from_ymd_opt(1999, 3, 31));
        assert_eq!(title.runtime_minutes, Some(136));
        assert_eq!(title.plot.as_deref(), Some("A hacker learns the truth."));
        assert_eq!(title.poster.as_deref(), Some("https://m.media-amazon.com/matrix.jpg"));

        let feature = title.feature().unwrap();
        assert_eq!(feature.genres, vec!["Action", "Sci-Fi"]);
        assert_eq!(feature.release_year, Some(1999));
        assert_eq!(feature.rated.as_deref(), Some("R"));
        assert_eq!(feature.rating.imdb.score, Some(8.7));
        assert_eq!(feature.rating.imdb.votes, Some(2100000));
        assert_eq!(feature.rating.metacritic.score, Some(73));
        assert_eq!(feature.rating.metacritic.votes, Some(36));
        assert!(title.episode_details().is_none());
        assert!(title.episodes().is_none());
    }

    #[test]
    fn test_absent_optional_fields() {
        let mut record = movie_record();
        for field in [
            "certificate",
            "plot",
            "metacritic",
            "primaryImage",
            "releaseDate",
            "releaseYear",
            "runtime",
        ] {
            record[field] = Value::Null;
        }

        let title = normalize(record).unwrap();
        assert_eq!(title.release_date, None);
        assert_eq!(title.runtime_minutes, None);
        assert_eq!(title.plot, None);
        assert_eq!(title.poster, None);

        let feature = title.feature().unwrap();
        assert_eq!(feature.release_year, None);
        assert_eq!(feature.rated, None);
        assert_eq!(feature.rating.metacritic, MetacriticRating::default());
    }

    #[test]
    fn test_missing_optional_keys() {
        let record = json!({
            "id": "tt1",
            "titleType": {"id": "movie"},
            "titleText": {"text": "Untitled"},
            "originalTitleText": {"text": "Untitled"},
            "titleGenres": {"genres": []},
            "ratingsSummary": {"aggregateRating": null, "voteCount": 0},
        });

        let title = normalize(record).unwrap();
        assert_eq!(title.runtime_minutes, None);
        assert_eq!(title.feature().unwrap().rating.imdb.score, None);
    }

    #[test]
    fn test_runtime_is_floored_to_minutes() {
        let mut record = movie_record();
        record["runtime"] = json!({"seconds": 5400});
        assert_eq!(normalize(record.clone()).unwrap().runtime_minutes, Some(90));

        record["runtime"] = json!({"seconds": 5459});
        assert_eq!(normalize(record).unwrap().runtime_minutes, Some(90));
    }

    #[test]
    fn test_series_becomes_show() {
        let mut record = movie_record();
        record["titleType"] = json!({"id": "tvSeries"});

        let title = normalize(record).unwrap();
        assert_eq!(title.kind(), "show");
        assert_eq!(title.episodes(), Some(&[][..]));
    }

    #[test]
    fn test_other_kind_passes_through() {
        let mut record = movie_record();
        record["titleType"] = json!({"id": "tvMiniSeries"});

        let title = normalize(record).unwrap();
        assert_eq!(title.kind(), "tvMiniSeries");
        assert!(title.feature().is_some());
        assert!(title.episodes().is_none());
    }

    #[test]
    fn test_episode() {
        let title = normalize(episode_record("3", "7")).unwrap();

        assert_eq!(title.kind(), "episode");
        assert_eq!(title.title, "The Wire");
        assert_eq!(title.original_title, "The Wire (orig)");
        assert_eq!(title.runtime_minutes, Some(59));
        assert!(title.feature().is_none());

        let details = title.episode_details().unwrap();
        assert_eq!(details.name, "The Target");
        assert_eq!(details.original_name, "The Target (orig)");
        assert_eq!(details.season, EpisodeNumber::Number(3));
        assert_eq!(details.episode, EpisodeNumber::Number(7));
        assert_eq!(details.rating.score, Some(8.1));
        assert_eq!(details.rating.votes, Some(11000));
    }

    #[test]
    fn test_episode_text_season() {
        let title = normalize(episode_record("Specials", "1")).unwrap();
        let details = title.episode_details().unwrap();
        assert_eq!(details.season, EpisodeNumber::Text("Specials".to_string()));
        assert_eq!(details.episode, EpisodeNumber::Number(1));
    }

    #[test]
    fn test_partial_release_date_defaults() {
        let mut record = movie_record();
        record["releaseDate"] = json!({"year": 2001, "month": null, "day": null});
        assert_eq!(
            normalize(record.clone()).unwrap().release_date,
            NaiveDate::from_ymd_opt(2001, 1, 1)
        );

        record["releaseDate"] = json!({"year": null, "month": 5, "day": 4});
        let title = normalize(record).unwrap();
        assert_eq!(
            title.release_date.map(|d| d.format("%Y-%m-%d").to_string()),
            Some("0000-05-04".to_string())
        );
    }

    #[test]
    fn test_invalid_release_date() {
        let mut record = movie_record();
        record["releaseDate"] = json!({"year": 2001, "month": 2, "day": 30});
        assert!(matches!(
            normalize(record),
            Err(NormalizeError::Malformed { .. })
        ));
    }

    #[test]
    fn test_missing_title_type() {
        let mut record = movie_record();
        record.as_object_mut().unwrap().remove("titleType");

        assert_eq!(
            normalize(record),
            Err(NormalizeError::Malformed {
                id: "tt0133093".to_string(),
                reason: "missing `titleType`".to_string(),
            })
        );
    }

    #[test]
    fn test_episode_without_series() {
        let mut record = episode_record("1", "1");
        record["series"] = Value::Null;

        let err = normalize(record).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed title record 'tt0749451': missing `series`"
        );
    }

    #[test]
    fn test_wrong_field_type() {
        let mut record = movie_record();
        record["runtime"] = json!({"seconds": "long"});
        assert!(normalize(record).is_err());
    }
}
