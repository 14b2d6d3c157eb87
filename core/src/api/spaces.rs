use crate::api::ListParams;
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{CreateSpaceRequest, PaginatedResponse, Space, SpaceResponse, UpdateSpaceRequest};
use crate::paginator::Paginator;

#[derive(Debug, Clone, Copy)]
pub struct SpacesApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> SpacesApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn list(&self, params: &ListParams) -> Result<PaginatedResponse<Space>> {
        self.client.fetch(params.apply(ApiRequest::get("/spaces")))
    }

    pub fn get(&self, space_id: &str) -> Result<Space> {
        let response: SpaceResponse = self.client.fetch(ApiRequest::get(format!("/spaces/{space_id}")))?;
        Ok(response.space)
    }

    pub fn create(&self, name: &str, description: Option<&str>) -> Result<Space> {
        let request = CreateSpaceRequest {
            name: name.to_string(),
            description: description.map(str::to_string),
        };
        let response: SpaceResponse = self.client.fetch(ApiRequest::post("/spaces").json(&request)?)?;
        Ok(response.space)
    }

    pub fn update(&self, space_id: &str, request: &UpdateSpaceRequest) -> Result<Space> {
        let response: SpaceResponse = self
            .client
            .fetch(ApiRequest::patch(format!("/spaces/{space_id}")).json(request)?)?;
        Ok(response.space)
    }

    /// Every space, page by page, starting at `params.offset`.
    pub fn paginate(&self, params: ListParams) -> Paginator<'a, Space> {
        let client = self.client;
        Paginator::new(params.offset, params.limit, move |offset, limit| {
            client.spaces().list(&params.window(offset, limit))
        })
    }
}
