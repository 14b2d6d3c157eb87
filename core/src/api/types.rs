use crate::api::ListParams;
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{CreateTypeRequest, PaginatedResponse, Type, TypeResponse, UpdateTypeRequest};
use crate::paginator::Paginator;

#[derive(Debug, Clone, Copy)]
pub struct TypesApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> TypesApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str, params: &ListParams) -> Result<PaginatedResponse<Type>> {
        self.client
            .fetch(params.apply(ApiRequest::get(format!("/spaces/{space_id}/types"))))
    }

    pub fn get(&self, space_id: &str, type_id: &str) -> Result<Type> {
        let response: TypeResponse = self
            .client
            .fetch(ApiRequest::get(format!("/spaces/{space_id}/types/{type_id}")))?;
        Ok(response.type_def)
    }

    pub fn create(&self, space_id: &str, request: &CreateTypeRequest) -> Result<Type> {
        let response: TypeResponse = self
            .client
            .fetch(ApiRequest::post(format!("/spaces/{space_id}/types")).json(request)?)?;
        Ok(response.type_def)
    }

    pub fn update(&self, space_id: &str, type_id: &str, request: &UpdateTypeRequest) -> Result<Type> {
        let response: TypeResponse = self
            .client
            .fetch(ApiRequest::patch(format!("/spaces/{space_id}/types/{type_id}")).json(request)?)?;
        Ok(response.type_def)
    }

    pub fn delete(&self, space_id: &str, type_id: &str) -> Result<Type> {
        let response: TypeResponse = self
            .client
            .fetch(ApiRequest::delete(format!("/spaces/{space_id}/types/{type_id}")))?;
        Ok(response.type_def)
    }

    pub fn paginate(&self, space_id: &str, params: ListParams) -> Paginator<'a, Type> {
        let client = self.client;
        let space_id = space_id.to_string();
        Paginator::new(params.offset, params.limit, move |offset, limit| {
            client.types().list(&space_id, &params.window(offset, limit))
        })
    }
}
