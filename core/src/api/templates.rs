use crate::api::ListParams;
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{Object, ObjectWithBody, PaginatedResponse, TemplateResponse};

/// Templates are objects attached to a type; read-only through the API.
#[derive(Debug, Clone, Copy)]
pub struct TemplatesApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> TemplatesApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str, type_id: &str, params: &ListParams) -> Result<PaginatedResponse<Object>> {
        self.client.fetch(params.apply(ApiRequest::get(format!(
            "/spaces/{space_id}/types/{type_id}/templates"
        ))))
    }

    pub fn get(&self, space_id: &str, type_id: &str, template_id: &str) -> Result<ObjectWithBody> {
        let response: TemplateResponse = self.client.fetch(ApiRequest::get(format!(
            "/spaces/{space_id}/types/{type_id}/templates/{template_id}"
        )))?;
        Ok(response.template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::testing::{object_page, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn templates_nest_under_type() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, object_page(0, 1, 1, 100));
        transport.push_json(200, json!({"template": {"id": "o0", "space_id": "s1", "markdown": "## Agenda"}}));
        let client = AnytypeClient::with_transport(ClientConfig::default(), transport.clone());

        let page = client.templates().list("s1", "ty1", &ListParams::default()).unwrap();
        assert_eq!(page.pagination.total, 1);
        let template = client.templates().get("s1", "ty1", "o0").unwrap();
        assert_eq!(template.markdown.as_deref(), Some("## Agenda"));

        let requests = transport.requests();
        assert!(requests[0].url.ends_with("/v1/spaces/s1/types/ty1/templates"));
        assert!(requests[1].url.ends_with("/v1/spaces/s1/types/ty1/templates/o0"));
    }
}
