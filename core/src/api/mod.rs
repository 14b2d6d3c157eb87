//! Resource endpoints, one handle per resource kind.
//!
//! Handles borrow the client and add nothing but path construction and
//! envelope unwrapping: every method is exactly one round-trip.

mod auth;
mod lists;
mod members;
mod objects;
mod properties;
mod search;
mod spaces;
mod tags;
mod templates;
mod types;

pub use auth::AuthApi;
pub use lists::ListsApi;
pub use members::MembersApi;
pub use objects::ObjectsApi;
pub use properties::PropertiesApi;
pub use search::SearchApi;
pub use spaces::SpacesApi;
pub use tags::TagsApi;
pub use templates::TemplatesApi;
pub use types::TypesApi;

use crate::client::ApiRequest;

/// Server-side hard cap on page size.
pub const MAX_LIMIT: usize = 1000;
pub const DEFAULT_LIMIT: usize = 100;

pub fn clamp_limit(limit: usize) -> usize {
    limit.min(MAX_LIMIT)
}

/// Offset, page size and raw filters of a list call.
///
/// Filters are sent verbatim as query parameters; repeated keys are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub offset: usize,
    pub limit: usize,
    pub filters: Vec<(String, String)>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            filters: Vec::new(),
        }
    }
}

impl ListParams {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }

    /// Same filters, another window.
    pub fn window(&self, offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit,
            filters: self.filters.clone(),
        }
    }

    pub(crate) fn apply(&self, request: ApiRequest) -> ApiRequest {
        request.page(self.offset, self.limit).queries(self.filters.iter().cloned())
    }
}

/// Text of a "message" response; the API answers list edits with a JSON
/// string or nothing.
pub(crate) fn message_of(value: Option<serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
