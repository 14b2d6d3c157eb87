use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{CreateApiKeyRequest, CreateApiKeyResponse, CreateChallengeRequest, CreateChallengeResponse};

/// Two-step key issuance: a challenge, then the code shown by the desktop app.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn create_challenge(&self, app_name: &str) -> Result<CreateChallengeResponse> {
        let request = CreateChallengeRequest {
            app_name: app_name.to_string(),
        };
        self.client.fetch(ApiRequest::post("/auth/challenges").json(&request)?)
    }

    /// Exchange a challenge id and its 4-digit code for an API key.
    pub fn create_api_key(&self, challenge_id: &str, code: &str) -> Result<String> {
        let request = CreateApiKeyRequest {
            challenge_id: challenge_id.to_string(),
            code: code.to_string(),
        };
        let response: CreateApiKeyResponse = self.client.fetch(ApiRequest::post("/auth/api_keys").json(&request)?)?;
        Ok(response.api_key)
    }
}
