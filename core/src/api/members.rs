use crate::api::ListParams;
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{Member, MemberResponse, PaginatedResponse};

#[derive(Debug, Clone, Copy)]
pub struct MembersApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> MembersApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str, params: &ListParams) -> Result<PaginatedResponse<Member>> {
        self.client
            .fetch(params.apply(ApiRequest::get(format!("/spaces/{space_id}/members"))))
    }

    pub fn get(&self, space_id: &str, member_id: &str) -> Result<Member> {
        let response: MemberResponse = self
            .client
            .fetch(ApiRequest::get(format!("/spaces/{space_id}/members/{member_id}")))?;
        Ok(response.member)
    }
}
