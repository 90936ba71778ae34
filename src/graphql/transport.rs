//! HTTP transport for signed GraphQL requests.
use super::request::{SignedRequest, SubmissionShape};
use crate::session::Session;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by a transport. These are never retried.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status and a non-JSON body
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON
    #[error("Failed to parse API response: {0}")]
    Decode(String),

    /// A header name or value could not be encoded
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },
}

/// Something that can deliver a signed request and return the parsed JSON body.
///
/// Implementations must be shareable across threads because per-season
/// episode pages may be fetched concurrently.
pub trait Transport: Send + Sync {
    /// Sends the request, giving up after `timeout` when one is set.
    fn send(
        &self,
        request: &SignedRequest,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(
        &self,
        request: &SignedRequest,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError> {
        (**self).send(request, timeout)
    }
}

/// Transport backed by a blocking reqwest client.
///
/// The session's static headers are installed as default headers; per-request
/// headers from the signer are added on top.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    /// Creates a transport for `endpoint` carrying the session's headers.
    pub fn new(session: &Session, endpoint: &str) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in session.headers() {
            headers.insert(header_name(name)?, header_value(name, &value)?);
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        request: &SignedRequest,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError> {
        let mut builder = match request.shape {
            SubmissionShape::Get => self.client.get(&self.endpoint).query(&request.query),
            SubmissionShape::Post => {
                let builder = self.client.post(&self.endpoint);
                match &request.body {
                    Some(body) => builder.json(body),
                    None => builder,
                }
            }
        };

        for (name, value) in &request.headers {
            builder = builder.header(header_name(name)?, header_value(name, value)?);
        }

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send()?;
        let status = response.status();
        tracing::debug!(
            operation = request.operation,
            status = status.as_u16(),
            "GraphQL response received"
        );

        let body = response.text()?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(_) if !status.is_success() => Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }),
            Err(e) => Err(TransportError::Decode(e.to_string())),
        }
    }
}

fn header_name(name: &str) -> Result<HeaderName, TransportError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|e| TransportError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(value).map_err(|e| TransportError::InvalidHeader {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
