//! Executes persisted queries and unwraps the response envelope.
use super::context::CallContext;
use super::operations::PersistedQuery;
use super::request::{SubmissionShape, sign};
use super::responses::Envelope;
use super::transport::Transport;
use super::QueryError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// Issues persisted queries through a transport.
///
/// There are no retries: transport failures and malformed bodies propagate
/// straight to the caller.
pub(crate) struct QueryExecutor<T: Transport> {
    transport: T,
    shape: SubmissionShape,
    timeout: Option<Duration>,
}

impl<T: Transport> QueryExecutor<T> {
    pub fn new(transport: T, shape: SubmissionShape, timeout: Option<Duration>) -> Self {
        Self {
            transport,
            shape,
            timeout,
        }
    }

    /// Runs `query` and returns `data.title` when present, `data` otherwise.
    ///
    /// Only the first entry of a GraphQL `errors` list is reported.
    pub fn execute(
        &self,
        ctx: &CallContext,
        query: &PersistedQuery,
        variables: Value,
    ) -> Result<Value, QueryError> {
        if ctx.is_cancelled() {
            return Err(QueryError::Cancelled {
                operation: query.name,
            });
        }

        let timeout = match (ctx.remaining(), self.timeout) {
            (Some(remaining), _) if remaining.is_zero() => {
                return Err(QueryError::DeadlineExceeded {
                    operation: query.name,
                });
            }
            (Some(remaining), Some(timeout)) => Some(remaining.min(timeout)),
            (remaining, timeout) => remaining.or(timeout),
        };

        let request = sign(query, &variables, self.shape)
            .map_err(|e| QueryError::malformed(query.name, format!("unencodable variables: {}", e)))?;

        tracing::debug!(operation = query.name, shape = ?self.shape, "GraphQL request");
        let response = self.transport.send(&request, timeout)?;

        unwrap_envelope(query.name, response)
    }

    /// Runs `query` and deserializes the unwrapped payload into `R`.
    pub fn execute_as<R: DeserializeOwned>(
        &self,
        ctx: &CallContext,
        query: &PersistedQuery,
        variables: Value,
    ) -> Result<R, QueryError> {
        let value = self.execute(ctx, query, variables)?;
        serde_json::from_value(value).map_err(|e| QueryError::malformed(query.name, e.to_string()))
    }
}

fn unwrap_envelope(operation: &'static str, response: Value) -> Result<Value, QueryError> {
    let envelope: Envelope = serde_json::from_value(response)
        .map_err(|e| QueryError::malformed(operation, e.to_string()))?;

    if let Some(first) = envelope.errors.into_iter().flatten().next() {
        return Err(QueryError::GraphQl(first.message));
    }

    match envelope.data {
        Some(Value::Object(mut data)) => match data.remove("title") {
            Some(title) => Ok(title),
            None => Ok(Value::Object(data)),
        },
        Some(other) => Err(QueryError::malformed(
            operation,
            format!("expected `data` to be an object, got {}", other),
        )),
        None => Err(QueryError::malformed(operation, "response has no `data`")),
    }
}
