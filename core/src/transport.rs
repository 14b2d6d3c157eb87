//! Executing `HttpRequest` values.
//!
//! The client core never performs I/O itself; it hands a fully built
//! `HttpRequest` to a `Transport` and parses whatever comes back. The
//! default transport is a blocking ureq agent. Tests swap in scripted
//! transports.

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
///
/// Implementations must return non-2xx statuses as data, not as `Err`:
/// status interpretation belongs to `AnytypeClient::parse`. `Err` is for
/// failures that produced no response at all.
pub trait Transport: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(config.timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

fn decorate<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    builder
}

fn map_ureq_error(e: ureq::Error) -> ApiError {
    match e {
        ureq::Error::Timeout(_) => ApiError::Timeout,
        other => ApiError::Transport(other.to_string()),
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let url = request.url.as_str();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => decorate(self.agent.get(url), &request).call(),
            (HttpMethod::Delete, _) => decorate(self.agent.delete(url), &request).call(),
            (HttpMethod::Post, Some(body)) => decorate(self.agent.post(url), &request).send(body.as_bytes()),
            (HttpMethod::Post, None) => decorate(self.agent.post(url), &request).send_empty(),
            (HttpMethod::Patch, Some(body)) => decorate(self.agent.patch(url), &request).send(body.as_bytes()),
            (HttpMethod::Patch, None) => decorate(self.agent.patch(url), &request).send_empty(),
        };
        let mut response = result.map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(map_ureq_error)?;
        debug!(status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, headers, body })
    }
}
