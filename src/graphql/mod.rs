//! Persisted-query GraphQL plumbing.
//!
//! This module provides everything needed to issue a persisted query against
//! the API: signing requests for either submission shape, sending them through
//! a [`Transport`], and unwrapping the response envelope.
mod context;
mod executor;
pub(crate) mod operations;
mod request;
pub(crate) mod responses;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{CallContext, CancelToken};
pub(crate) use executor::QueryExecutor;
pub use operations::PersistedQuery;
pub use request::{SignedRequest, SubmissionShape, sign};
pub use transport::{HttpTransport, Transport, TransportError};

use thiserror::Error;

/// Errors that can occur while executing a persisted query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The response envelope carried an `errors` list
    #[error("GraphQL Error: {0}")]
    GraphQl(String),

    /// The request could not be delivered or its body was not JSON
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response did not have the expected shape
    #[error("Malformed response to {operation}: {reason}")]
    MalformedResponse {
        operation: &'static str,
        reason: String,
    },

    /// The call context's deadline passed before the request was sent
    #[error("Deadline exceeded before {operation}")]
    DeadlineExceeded { operation: &'static str },

    /// The call context was cancelled before the request was sent
    #[error("Cancelled before {operation}")]
    Cancelled { operation: &'static str },
}

impl QueryError {
    pub(crate) fn malformed(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation,
            reason: reason.into(),
        }
    }
}
