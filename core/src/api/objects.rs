use crate::api::ListParams;
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{
    CreateObjectRequest, Object, ObjectResponse, ObjectWithBody, PaginatedResponse, UpdateObjectRequest,
};
use crate::paginator::Paginator;

/// Body format requested from `get` unless the caller overrides it.
pub const DEFAULT_BODY_FORMAT: &str = "md";

#[derive(Debug, Clone, Copy)]
pub struct ObjectsApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> ObjectsApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str, params: &ListParams) -> Result<PaginatedResponse<Object>> {
        self.client
            .fetch(params.apply(ApiRequest::get(format!("/spaces/{space_id}/objects"))))
    }

    /// Fetch one object with its markdown body.
    pub fn get(&self, space_id: &str, object_id: &str) -> Result<ObjectWithBody> {
        self.get_with_format(space_id, object_id, Some(DEFAULT_BODY_FORMAT))
    }

    /// Fetch one object; `format: None` sends no body format at all.
    pub fn get_with_format(&self, space_id: &str, object_id: &str, format: Option<&str>) -> Result<ObjectWithBody> {
        let mut request = ApiRequest::get(format!("/spaces/{space_id}/objects/{object_id}"));
        if let Some(format) = format {
            request = request.query("format", format);
        }
        let response: ObjectResponse = self.client.fetch(request)?;
        Ok(response.object)
    }

    pub fn create(&self, space_id: &str, request: &CreateObjectRequest) -> Result<ObjectWithBody> {
        let response: ObjectResponse = self
            .client
            .fetch(ApiRequest::post(format!("/spaces/{space_id}/objects")).json(request)?)?;
        Ok(response.object)
    }

    pub fn update(&self, space_id: &str, object_id: &str, request: &UpdateObjectRequest) -> Result<ObjectWithBody> {
        let response: ObjectResponse = self
            .client
            .fetch(ApiRequest::patch(format!("/spaces/{space_id}/objects/{object_id}")).json(request)?)?;
        Ok(response.object)
    }

    /// Archive an object. Returns it in its archived state.
    pub fn delete(&self, space_id: &str, object_id: &str) -> Result<ObjectWithBody> {
        let response: ObjectResponse = self
            .client
            .fetch(ApiRequest::delete(format!("/spaces/{space_id}/objects/{object_id}")))?;
        Ok(response.object)
    }

    pub fn paginate(&self, space_id: &str, params: ListParams) -> Paginator<'a, Object> {
        let client = self.client;
        let space_id = space_id.to_string();
        Paginator::new(params.offset, params.limit, move |offset, limit| {
            client.objects().list(&space_id, &params.window(offset, limit))
        })
    }
}
