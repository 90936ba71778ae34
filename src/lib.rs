//! imdb_graph - Look up titles through IMDb's persisted-query GraphQL API
//!
//! This library issues the fixed persisted queries the IMDb mobile app uses,
//! enumerates the seasons and episodes of shows, and normalizes the various
//! response shapes into a single [`Title`] model.
//!
//! ```no_run
//! use imdb_graph::{ClientConfig, Imdb, Session};
//!
//! let session = Session::new("en-US", None, None)?;
//! let imdb = Imdb::new(session, ClientConfig::default())?;
//!
//! let title = imdb.lookup_title("tt0306414")?;
//! println!("{} has {} episodes", title, title.episodes().map_or(0, |e| e.len()));
//! # Ok::<(), imdb_graph::ImdbError>(())
//! ```

mod config;
mod episodes;
mod graphql;
mod session;
mod title;

pub use config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_PAGE_SIZE};
pub use graphql::{
    CallContext, CancelToken, HttpTransport, PersistedQuery, QueryError, SignedRequest,
    SubmissionShape, Transport, TransportError, sign,
};
pub use session::{DEFAULT_CLIENT_VERSION, Session, SessionError};
pub use title::{
    EpisodeDetails, EpisodeNumber, Feature, FeatureRating, ImdbRating, MetacriticRating,
    NormalizeError, Title, TitleDetails, normalize,
};

use episodes::EpisodeAggregator;
use graphql::QueryExecutor;
use graphql::operations::{TITLE_GENRES, TITLE_OVERVIEW};
use serde_json::{Map, Value, json};
use thiserror::Error;
use tracing::info;

/// Top-level error type for lookups.
#[derive(Debug, Error)]
pub enum ImdbError {
    /// The overview query resolved without a title type
    #[error("Title not found: '{0}'")]
    TitleNotFound(String),

    /// A persisted query failed
    #[error(transparent)]
    Query(#[from] QueryError),

    /// A title record could not be normalized
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The session could not be built
    #[error("Invalid session: {0}")]
    Session(#[from] SessionError),

    /// The HTTP transport could not be built
    #[error("Transport setup failed: {0}")]
    Transport(#[from] TransportError),

    /// The client configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be started
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Client for title lookups.
///
/// All configuration is fixed at construction, so a client can be shared
/// between threads and used for any number of lookups.
pub struct Imdb<T: Transport = HttpTransport> {
    session: Session,
    page_size: u32,
    executor: QueryExecutor<T>,
    pool: Option<rayon::ThreadPool>,
}

impl Imdb<HttpTransport> {
    /// Creates a client talking to `config.endpoint` over HTTP.
    pub fn new(session: Session, config: ClientConfig) -> Result<Self, ImdbError> {
        let transport = HttpTransport::new(&session, &config.endpoint)?;
        Self::with_transport(session, config, transport)
    }
}

impl<T: Transport> Imdb<T> {
    /// Creates a client that sends its requests through `transport`.
    pub fn with_transport(
        session: Session,
        config: ClientConfig,
        transport: T,
    ) -> Result<Self, ImdbError> {
        if config.page_size == 0 {
            return Err(ImdbError::InvalidConfig(
                "page size must be at least 1".to_string(),
            ));
        }

        let pool = if config.concurrency > 1 {
            Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(config.concurrency)
                    .thread_name(|index| format!("imdb-worker-{}", index))
                    .build()?,
            )
        } else {
            None
        };

        Ok(Self {
            session,
            page_size: config.page_size,
            executor: QueryExecutor::new(transport, config.shape, config.timeout),
            pool,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Looks up a title by id.
    ///
    /// Shows come back with their full episode list attached.
    ///
    /// # Errors
    ///
    /// Returns [`ImdbError::TitleNotFound`] when the id does not resolve to a
    /// title, and fails as a whole if any underlying query fails.
    pub fn lookup_title(&self, id: &str) -> Result<Title, ImdbError> {
        self.lookup_title_with(id, &CallContext::new())
    }

    /// Looks up a title by id, honouring the deadline and cancellation token of `ctx`.
    pub fn lookup_title_with(&self, id: &str, ctx: &CallContext) -> Result<Title, ImdbError> {
        info!(id, "Looking up title");

        let mut record = Map::new();
        for query in [&TITLE_OVERVIEW, &TITLE_GENRES] {
            match self.executor.execute(ctx, query, json!({"id": id}))? {
                Value::Object(fields) => record.extend(fields),
                Value::Null => return Err(ImdbError::TitleNotFound(id.to_string())),
                other => {
                    return Err(QueryError::malformed(
                        query.name,
                        format!("expected a title object, got {}", other),
                    )
                    .into());
                }
            }

            if record.get("titleType").is_some_and(Value::is_null) {
                return Err(ImdbError::TitleNotFound(id.to_string()));
            }
        }

        let mut title = normalize(Value::Object(record))?;

        if title.is_show() {
            let episodes = EpisodeAggregator {
                executor: &self.executor,
                session: &self.session,
                page_size: self.page_size,
                pool: self.pool.as_ref(),
            }
            .list_episodes(ctx, id)?;
            title.set_episodes(episodes);
        }

        info!(id, kind = title.kind(), "Lookup complete");
        Ok(title)
    }
}
