use crate::api::ListParams;
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{Color, CreateTagRequest, PaginatedResponse, Tag, TagResponse, UpdateTagRequest};

/// Tags live under a select or multi-select property.
#[derive(Debug, Clone, Copy)]
pub struct TagsApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> TagsApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    fn base(space_id: &str, property_id: &str) -> String {
        format!("/spaces/{space_id}/properties/{property_id}/tags")
    }

    pub fn list(&self, space_id: &str, property_id: &str, params: &ListParams) -> Result<PaginatedResponse<Tag>> {
        self.client
            .fetch(params.apply(ApiRequest::get(Self::base(space_id, property_id))))
    }

    pub fn get(&self, space_id: &str, property_id: &str, tag_id: &str) -> Result<Tag> {
        let path = format!("{}/{tag_id}", Self::base(space_id, property_id));
        let response: TagResponse = self.client.fetch(ApiRequest::get(path))?;
        Ok(response.tag)
    }

    pub fn create(&self, space_id: &str, property_id: &str, name: &str, color: Color, key: Option<&str>) -> Result<Tag> {
        let request = CreateTagRequest {
            name: name.to_string(),
            color,
            key: key.map(str::to_string),
        };
        let response: TagResponse = self
            .client
            .fetch(ApiRequest::post(Self::base(space_id, property_id)).json(&request)?)?;
        Ok(response.tag)
    }

    pub fn update(&self, space_id: &str, property_id: &str, tag_id: &str, request: &UpdateTagRequest) -> Result<Tag> {
        let path = format!("{}/{tag_id}", Self::base(space_id, property_id));
        let response: TagResponse = self.client.fetch(ApiRequest::patch(path).json(request)?)?;
        Ok(response.tag)
    }

    pub fn delete(&self, space_id: &str, property_id: &str, tag_id: &str) -> Result<Tag> {
        let path = format!("{}/{tag_id}", Self::base(space_id, property_id));
        let response: TagResponse = self.client.fetch(ApiRequest::delete(path))?;
        Ok(response.tag)
    }
}
