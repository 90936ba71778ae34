//! Request signing for persisted queries.
//!
//! The API accepts persisted queries in two shapes. The GET shape passes
//! `variables` and `extensions` as compact JSON strings in the query string and
//! needs an `Accept` header advertising deferred multipart support. The POST
//! shape sends the envelope as a native JSON body. Both carry the Apollo
//! operation id and name headers.

use super::operations::PersistedQuery;
use serde::Serialize;
use serde_json::Value;

/// How a persisted query is submitted to the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionShape {
    /// Query-string parameters on a GET request
    #[default]
    Get,
    /// JSON body on a POST request
    Post,
}

/// A request ready to be handed to a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedRequest {
    pub shape: SubmissionShape,
    /// Operation name, for logging and diagnostics
    pub operation: &'static str,
    pub headers: Vec<(&'static str, String)>,
    /// Query-string parameters (GET shape only)
    pub query: Vec<(&'static str, String)>,
    /// JSON body (POST shape only)
    pub body: Option<Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    operation_name: &'a str,
    variables: &'a Value,
    extensions: Extensions<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Extensions<'a> {
    persisted_query: PersistedQueryExtension<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedQueryExtension<'a> {
    version: u8,
    sha256_hash: &'a str,
}

/// Builds the request envelope and headers for a persisted query.
///
/// No I/O happens here; the result is handed to a [`super::Transport`].
pub fn sign(
    query: &PersistedQuery,
    variables: &Value,
    shape: SubmissionShape,
) -> Result<SignedRequest, serde_json::Error> {
    let extensions = Extensions {
        persisted_query: PersistedQueryExtension {
            version: 1,
            sha256_hash: query.hash,
        },
    };

    let mut headers = Vec::with_capacity(4);

    let signed = match shape {
        SubmissionShape::Get => {
            headers.push((
                "Accept",
                "multipart/mixed; deferSpec=20220824, application/json".to_string(),
            ));
            headers.push(("content-type", "application/json".to_string()));
            headers.push(("X-APOLLO-OPERATION-ID", query.hash.to_string()));
            headers.push(("X-APOLLO-OPERATION-NAME", query.name.to_string()));

            // serde_json's compact writer emits no whitespace
            let query_params = vec![
                ("operationName", query.name.to_string()),
                ("variables", serde_json::to_string(variables)?),
                ("extensions", serde_json::to_string(&extensions)?),
            ];

            SignedRequest {
                shape,
                operation: query.name,
                headers,
                query: query_params,
                body: None,
            }
        }
        SubmissionShape::Post => {
            headers.push(("X-APOLLO-OPERATION-ID", query.hash.to_string()));
            headers.push(("X-APOLLO-OPERATION-NAME", query.name.to_string()));

            let body = serde_json::to_value(Envelope {
                operation_name: query.name,
                variables,
                extensions,
            })?;

            SignedRequest {
                shape,
                operation: query.name,
                headers,
                query: Vec::new(),
                body: Some(body),
            }
        }
    };

    Ok(signed)
}
