//! Request building, response parsing, and dispatch through a `Transport`.
//!
//! # Design
//! `AnytypeClient` holds only its configuration and a transport. Each call
//! is described by an `ApiRequest`, turned into an `HttpRequest` by
//! `build`, executed by the transport, and decoded by `parse`. `build` and
//! `parse` touch no network, so every endpoint can be verified from canned
//! responses. There is no retry: a failure surfaces on the first attempt.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::api::{
    clamp_limit, AuthApi, ListsApi, MembersApi, ObjectsApi, PropertiesApi, SearchApi, SpacesApi, TagsApi,
    TemplatesApi, TypesApi,
};
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryBuilder;
use crate::transport::{Transport, UreqTransport};

/// Version segment every API path is prefixed with.
pub const API_PREFIX: &str = "/v1";
pub const VERSION_HEADER: &str = "Anytype-Version";

/// One API call, before base URL, version prefix and headers are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the version prefix, e.g. `/spaces/{id}/objects`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn queries(mut self, pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    /// Add `offset`/`limit`, clamping the limit to the server maximum.
    pub fn page(self, offset: usize, limit: usize) -> Self {
        self.query("offset", offset).query("limit", clamp_limit(limit))
    }

    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(body);
        Ok(self)
    }
}

/// Blocking client for the local Anytype API.
///
/// Cheap to clone; clones share the transport.
#[derive(Clone)]
pub struct AnytypeClient {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for AnytypeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnytypeClient")
            .field("base_url", &self.config.base_url)
            .field("api_version", &self.config.api_version)
            .field("has_api_key", &self.config.api_key.is_some())
            .finish()
    }
}

impl AnytypeClient {
    /// Client using the default ureq transport.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, transport)
    }

    pub fn with_transport(config: ClientConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Replace the API key used for subsequent requests.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.config.api_key = Some(api_key.into());
    }

    pub fn build(&self, request: &ApiRequest) -> HttpRequest {
        let mut headers = vec![
            (VERSION_HEADER.to_string(), self.config.api_version.clone()),
            ("Content-Type".to_string(), "application/json".to_string()),
        ];
        if let Some(key) = &self.config.api_key {
            headers.push(("Authorization".to_string(), format!("Bearer {key}")));
        }

        HttpRequest {
            method: request.method,
            url: format!("{}{API_PREFIX}{}", self.config.base_url, request.path),
            query: request.query.clone(),
            headers,
            body: request.body.clone(),
        }
    }

    /// Decode a response: `None` for 204, the body for other successes,
    /// a classified `ApiError` for any status >= 400.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Option<T>> {
        if response.status >= 400 {
            let err = ApiError::from_response(response.status, &response.body);
            warn!(status = response.status, code = err.code().unwrap_or_default(), "request failed");
            return Err(err);
        }
        if response.status == 204 {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// One round-trip: build, execute, parse.
    pub fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Option<T>> {
        let http = self.build(&request);
        debug!(method = %http.method, url = %http.url, params = http.query.len(), "sending request");
        let response = self.transport.execute(http)?;
        self.parse(response)
    }

    /// Like `send`, for endpoints that always answer with a body.
    pub fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        self.send(request)?
            .ok_or_else(|| ApiError::Deserialization("expected a response body, got 204 No Content".to_string()))
    }

    /// Run the challenge/code exchange and keep the resulting key.
    ///
    /// `read_code` receives the challenge id and must return the 4-digit
    /// code the desktop app displays.
    pub fn authenticate<F>(&mut self, app_name: &str, read_code: F) -> Result<String>
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let challenge = self.auth().create_challenge(app_name)?;
        let code = read_code(&challenge.challenge_id)?;
        let api_key = self.auth().create_api_key(&challenge.challenge_id, code.trim())?;
        self.set_api_key(api_key.clone());
        Ok(api_key)
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn spaces(&self) -> SpacesApi<'_> {
        SpacesApi::new(self)
    }

    pub fn objects(&self) -> ObjectsApi<'_> {
        ObjectsApi::new(self)
    }

    pub fn types(&self) -> TypesApi<'_> {
        TypesApi::new(self)
    }

    pub fn properties(&self) -> PropertiesApi<'_> {
        PropertiesApi::new(self)
    }

    pub fn tags(&self) -> TagsApi<'_> {
        TagsApi::new(self)
    }

    pub fn templates(&self) -> TemplatesApi<'_> {
        TemplatesApi::new(self)
    }

    pub fn lists(&self) -> ListsApi<'_> {
        ListsApi::new(self)
    }

    pub fn members(&self) -> MembersApi<'_> {
        MembersApi::new(self)
    }

    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Start a filter query over the objects of a space.
    pub fn query(&self, space_id: &str) -> QueryBuilder<'_> {
        QueryBuilder::new(self, space_id)
    }
}
