//! In-memory transport for tests.
use super::request::SignedRequest;
use super::transport::{Transport, TransportError};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Replays canned responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Value>>,
    requests: Mutex<Vec<(SignedRequest, Option<Duration>)>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<(SignedRequest, Option<Duration>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.requests().iter().map(|(r, _)| r.operation).collect()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        request: &SignedRequest,
        timeout: Option<Duration>,
    ) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push((request.clone(), timeout));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::Decode("no scripted response left".to_string()))
    }
}

/// Answers each request through a routing closure, so the answer does not
/// depend on the order requests arrive in.
pub(crate) struct RoutedTransport<F> {
    route: F,
}

impl<F> RoutedTransport<F>
where
    F: Fn(&'static str, &Value) -> Value + Send + Sync,
{
    pub fn new(route: F) -> Self {
        Self { route }
    }
}

impl<F> Transport for RoutedTransport<F>
where
    F: Fn(&'static str, &Value) -> Value + Send + Sync,
{
    fn send(
        &self,
        request: &SignedRequest,
        _timeout: Option<Duration>,
    ) -> Result<Value, TransportError> {
        Ok((self.route)(request.operation, &variables(request)))
    }
}

/// Recovers the variables a request was signed with.
pub(crate) fn variables(request: &SignedRequest) -> Value {
    match &request.body {
        Some(body) => body["variables"].clone(),
        None => request
            .query
            .iter()
            .find(|(key, _)| *key == "variables")
            .and_then(|(_, value)| serde_json::from_str(value).ok())
            .unwrap_or(Value::Null),
    }
}
