use crate::api::ListParams;
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{
    CreatePropertyRequest, CreateTagRequest, PaginatedResponse, Property, PropertyFormat, PropertyResponse,
    UpdatePropertyRequest,
};
use crate::paginator::Paginator;

#[derive(Debug, Clone, Copy)]
pub struct PropertiesApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> PropertiesApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn list(&self, space_id: &str, params: &ListParams) -> Result<PaginatedResponse<Property>> {
        self.client
            .fetch(params.apply(ApiRequest::get(format!("/spaces/{space_id}/properties"))))
    }

    pub fn get(&self, space_id: &str, property_id: &str) -> Result<Property> {
        let response: PropertyResponse = self
            .client
            .fetch(ApiRequest::get(format!("/spaces/{space_id}/properties/{property_id}")))?;
        Ok(response.property)
    }

    /// Create a property; `tags` seeds the options of select formats.
    pub fn create(
        &self,
        space_id: &str,
        name: &str,
        format: PropertyFormat,
        key: Option<&str>,
        tags: Option<Vec<CreateTagRequest>>,
    ) -> Result<Property> {
        let request = CreatePropertyRequest {
            name: name.to_string(),
            format,
            key: key.map(str::to_string),
            tags,
        };
        let response: PropertyResponse = self
            .client
            .fetch(ApiRequest::post(format!("/spaces/{space_id}/properties")).json(&request)?)?;
        Ok(response.property)
    }

    pub fn update(&self, space_id: &str, property_id: &str, name: &str, key: Option<&str>) -> Result<Property> {
        let request = UpdatePropertyRequest {
            name: name.to_string(),
            key: key.map(str::to_string),
        };
        let response: PropertyResponse = self
            .client
            .fetch(ApiRequest::patch(format!("/spaces/{space_id}/properties/{property_id}")).json(&request)?)?;
        Ok(response.property)
    }

    pub fn delete(&self, space_id: &str, property_id: &str) -> Result<Property> {
        let response: PropertyResponse = self
            .client
            .fetch(ApiRequest::delete(format!("/spaces/{space_id}/properties/{property_id}")))?;
        Ok(response.property)
    }

    pub fn paginate(&self, space_id: &str, params: ListParams) -> Paginator<'a, Property> {
        let client = self.client;
        let space_id = space_id.to_string();
        Paginator::new(params.offset, params.limit, move |offset, limit| {
            client.properties().list(&space_id, &params.window(offset, limit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::models::Color;
    use crate::testing::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn create_select_property_with_seed_tags() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            201,
            json!({"property": {"id": "p1", "key": "status", "name": "Status", "format": "select"}}),
        );
        let client = AnytypeClient::with_transport(ClientConfig::default(), transport.clone());

        let tags = vec![CreateTagRequest {
            name: "Done".into(),
            color: Color::Lime,
            key: None,
        }];
        let property = client
            .properties()
            .create("s1", "Status", PropertyFormat::Select, None, Some(tags))
            .unwrap();
        assert_eq!(property.format, PropertyFormat::Select);

        let body: serde_json::Value =
            serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"name": "Status", "format": "select", "tags": [{"name": "Done", "color": "lime"}]})
        );
    }

    #[test]
    fn update_sends_required_name() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            json!({"property": {"id": "p1", "key": "stage", "name": "Stage", "format": "select"}}),
        );
        let client = AnytypeClient::with_transport(ClientConfig::default(), transport.clone());

        client.properties().update("s1", "p1", "Stage", Some("stage")).unwrap();
        let sent = &transport.requests()[0];
        assert!(sent.url.ends_with("/v1/spaces/s1/properties/p1"));
        assert_eq!(sent.body.as_deref(), Some(r#"{"name":"Stage","key":"stage"}"#));
    }
}
