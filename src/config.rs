//! Client configuration.
use crate::graphql::SubmissionShape;
use std::time::Duration;

/// The GraphQL endpoint every query is sent to.
pub const DEFAULT_ENDPOINT: &str = "https://graphql.imdb.com";

/// Page size for season and episode listings.
///
/// Large enough that a single page usually holds a whole listing; further
/// pages are still followed when the server reports them.
pub const DEFAULT_PAGE_SIZE: u32 = 99999;

/// Tunables for an [`crate::Imdb`] client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Whether queries go out as GET query strings or POST bodies
    pub shape: SubmissionShape,
    /// Page size for season and episode listings; must be at least 1
    pub page_size: u32,
    /// Number of worker threads for episode enumeration; `1` runs sequentially
    pub concurrency: usize,
    /// Upper bound for a single request
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            shape: SubmissionShape::default(),
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: 1,
            timeout: None,
        }
    }
}
