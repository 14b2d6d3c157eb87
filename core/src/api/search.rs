use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{Object, PaginatedResponse, SearchRequest};

/// Search takes its criteria in the body and its window in the query string.
#[derive(Debug, Clone, Copy)]
pub struct SearchApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    /// Search across every space the key can read.
    pub fn global(&self, request: &SearchRequest, offset: usize, limit: usize) -> Result<PaginatedResponse<Object>> {
        self.client
            .fetch(ApiRequest::post("/search").page(offset, limit).json(request)?)
    }

    pub fn in_space(
        &self,
        space_id: &str,
        request: &SearchRequest,
        offset: usize,
        limit: usize,
    ) -> Result<PaginatedResponse<Object>> {
        self.client.fetch(
            ApiRequest::post(format!("/spaces/{space_id}/search"))
                .page(offset, limit)
                .json(request)?,
        )
    }
}
