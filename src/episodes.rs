//! Episode enumeration for shows.
//!
//! Episodes are collected season by season, enriched with two batched
//! metadata queries and finally normalized. Any failing query aborts the
//! whole enumeration; there are no partial results.

use crate::ImdbError;
use crate::graphql::operations::{
    EPISODES_BY_SEASON, TITLE_SEASONS, TITLES_NON_PERSISTED_METADATA, TITLES_PERSISTED_METADATA,
};
use crate::graphql::responses::{
    Connection, EpisodesTitle, PageInfo, SeasonNode, SeasonsTitle, TitlesBatch,
};
use crate::graphql::{CallContext, QueryError, QueryExecutor, Transport};
use crate::session::Session;
use crate::title::{Title, normalize};
use rayon::ThreadPool;
use rayon::prelude::*;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use tracing::{debug, info, warn};

type Record = Map<String, Value>;

/// Builds the episode list of a show.
pub(crate) struct EpisodeAggregator<'a, T: Transport> {
    pub executor: &'a QueryExecutor<T>,
    pub session: &'a Session,
    pub page_size: u32,
    /// Worker pool for per-season and metadata queries; `None` runs them in sequence
    pub pool: Option<&'a ThreadPool>,
}

impl<T: Transport> EpisodeAggregator<'_, T> {
    /// Lists every episode of `title_id` in season order, then server order.
    pub fn list_episodes(&self, ctx: &CallContext, title_id: &str) -> Result<Vec<Title>, ImdbError> {
        let seasons = self.seasons(ctx, title_id)?;
        info!(title_id, seasons = seasons.len(), "Enumerating episodes");

        let per_season = match self.pool {
            Some(pool) => pool.install(|| {
                seasons
                    .par_iter()
                    .map(|season| self.season_episodes(ctx, title_id, season))
                    .collect::<Result<Vec<_>, _>>()
            })?,
            None => seasons
                .iter()
                .map(|season| self.season_episodes(ctx, title_id, season))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let mut records: Vec<Record> = per_season.into_iter().flatten().collect();
        if records.is_empty() {
            info!(title_id, "Show has no episodes");
            return Ok(Vec::new());
        }

        let ids = records
            .iter()
            .map(|record| {
                record
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        QueryError::malformed(EPISODES_BY_SEASON.name, "episode node without `id`")
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (persisted, non_persisted) = self.join(
            || self.persisted_metadata(ctx, &ids),
            || self.non_persisted_metadata(ctx, &ids),
        );

        merge_metadata(&mut records, persisted?, TITLES_PERSISTED_METADATA.name)?;
        merge_metadata(&mut records, non_persisted?, TITLES_NON_PERSISTED_METADATA.name)?;

        let episodes = records
            .into_iter()
            .map(|record| {
                let episode = normalize(Value::Object(record))?;
                if !episode.is_episode() {
                    return Err(QueryError::malformed(
                        EPISODES_BY_SEASON.name,
                        format!("title {} is a {}, not an episode", episode.id, episode.kind()),
                    )
                    .into());
                }
                Ok(episode)
            })
            .collect::<Result<Vec<_>, ImdbError>>()?;

        info!(title_id, episodes = episodes.len(), "Episode enumeration complete");
        Ok(episodes)
    }

    fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        match self.pool {
            Some(pool) => pool.join(a, b),
            None => (a(), b()),
        }
    }

    fn seasons(&self, ctx: &CallContext, title_id: &str) -> Result<Vec<String>, QueryError> {
        let nodes = collect_pages(TITLE_SEASONS.name, |cursor| {
            let payload: SeasonsTitle = self.executor.execute_as(
                ctx,
                &TITLE_SEASONS,
                json!({"tconst": title_id, "first": self.page_size, "after": cursor}),
            )?;
            Ok(payload.episodes.displayable_seasons)
        })?;

        Ok(nodes.into_iter().map(|node: SeasonNode| node.season).collect())
    }

    fn season_episodes(
        &self,
        ctx: &CallContext,
        title_id: &str,
        season: &str,
    ) -> Result<Vec<Record>, QueryError> {
        let nodes = collect_pages(EPISODES_BY_SEASON.name, |cursor| {
            let payload: EpisodesTitle = self.executor.execute_as(
                ctx,
                &EPISODES_BY_SEASON,
                json!({
                    "tconst": title_id,
                    "season": season,
                    "first": self.page_size,
                    "after": cursor,
                }),
            )?;
            Ok(payload.episodes.episodes)
        })?;

        debug!(title_id, season, episodes = nodes.len(), "Fetched season");
        Ok(nodes)
    }

    /// Release windows, filtered by the session's region.
    fn persisted_metadata(&self, ctx: &CallContext, ids: &[String]) -> Result<Vec<Record>, QueryError> {
        let batch: TitlesBatch = self.executor.execute_as(
            ctx,
            &TITLES_PERSISTED_METADATA,
            json!({
                "tconsts": ids,
                "link": "ANDROID",
                "filter": {
                    "countries": [self.session.region()],
                    "wideRelease": "WIDE_RELEASE_ONLY",
                },
                "includeWatchOptions": false,
                "platformId": "ANDROID",
                "numReleaseDates": 5,
            }),
        )?;
        Ok(batch.titles.into_iter().map(Option::unwrap_or_default).collect())
    }

    fn non_persisted_metadata(
        &self,
        ctx: &CallContext,
        ids: &[String],
    ) -> Result<Vec<Record>, QueryError> {
        let batch: TitlesBatch = self.executor.execute_as(
            ctx,
            &TITLES_NON_PERSISTED_METADATA,
            json!({"tconsts": ids, "includeUserRating": false}),
        )?;
        Ok(batch.titles.into_iter().map(Option::unwrap_or_default).collect())
    }
}

/// Follows `pageInfo.endCursor` until the server reports no further page.
///
/// A page without `pageInfo` is the last one. A repeated or missing cursor
/// ends the walk instead of looping forever.
fn collect_pages<N, F>(operation: &'static str, mut fetch: F) -> Result<Vec<N>, QueryError>
where
    F: FnMut(&str) -> Result<Connection<N>, QueryError>,
{
    let mut nodes = Vec::new();
    let mut cursor = String::new();

    loop {
        let page = fetch(&cursor)?;
        nodes.extend(page.edges.into_iter().map(|edge| edge.node));

        match page.page_info {
            Some(PageInfo {
                has_next_page: true,
                end_cursor: Some(next),
            }) if !next.is_empty() && next != cursor => cursor = next,
            Some(PageInfo {
                has_next_page: true,
                ..
            }) => {
                warn!(operation, "Next page reported without a usable cursor");
                break;
            }
            _ => break,
        }
    }

    Ok(nodes)
}

/// Merges one metadata batch into the episode records.
///
/// Metadata keys override episode keys. When every metadata record carries an
/// `id` the batch is matched by id and must cover every episode; otherwise it
/// is matched by position and must have exactly one record per episode.
fn merge_metadata(
    records: &mut [Record],
    metadata: Vec<Record>,
    operation: &'static str,
) -> Result<(), QueryError> {
    let keyed = !metadata.is_empty()
        && metadata
            .iter()
            .all(|entry| entry.get("id").and_then(Value::as_str).is_some());

    if !keyed {
        if metadata.len() != records.len() {
            return Err(QueryError::malformed(
                operation,
                format!(
                    "expected {} metadata records, got {}",
                    records.len(),
                    metadata.len()
                ),
            ));
        }
        for (record, entry) in records.iter_mut().zip(metadata) {
            record.extend(entry);
        }
        return Ok(());
    }

    let by_id: HashMap<String, Record> = metadata
        .into_iter()
        .filter_map(|entry| {
            let id = entry.get("id").and_then(Value::as_str)?.to_string();
            Some((id, entry))
        })
        .collect();

    for record in records.iter_mut() {
        let id = record
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        match by_id.get(&id) {
            Some(entry) => record.extend(entry.clone()),
            None => {
                return Err(QueryError::malformed(
                    operation,
                    format!("no metadata for episode '{}'", id),
                ));
            }
        }
    }

    Ok(())
}
