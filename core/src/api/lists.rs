use crate::api::{message_of, ListParams};
use crate::client::{AnytypeClient, ApiRequest};
use crate::error::Result;
use crate::models::{AddObjectsToListRequest, Object, PaginatedResponse, View};

/// Collections and sets. Membership edits answer with a status message.
#[derive(Debug, Clone, Copy)]
pub struct ListsApi<'a> {
    client: &'a AnytypeClient,
}

impl<'a> ListsApi<'a> {
    pub(crate) fn new(client: &'a AnytypeClient) -> Self {
        Self { client }
    }

    pub fn add_objects(&self, space_id: &str, list_id: &str, object_ids: &[String]) -> Result<String> {
        let request = AddObjectsToListRequest {
            objects: object_ids.to_vec(),
        };
        let response = self
            .client
            .send(ApiRequest::post(format!("/spaces/{space_id}/lists/{list_id}/objects")).json(&request)?)?;
        Ok(message_of(response))
    }

    pub fn remove_object(&self, space_id: &str, list_id: &str, object_id: &str) -> Result<String> {
        let response = self.client.send(ApiRequest::delete(format!(
            "/spaces/{space_id}/lists/{list_id}/objects/{object_id}"
        )))?;
        Ok(message_of(response))
    }

    pub fn views(&self, space_id: &str, list_id: &str, params: &ListParams) -> Result<PaginatedResponse<View>> {
        self.client
            .fetch(params.apply(ApiRequest::get(format!("/spaces/{space_id}/lists/{list_id}/views"))))
    }

    /// Objects of a list as seen through one of its views.
    pub fn objects(
        &self,
        space_id: &str,
        list_id: &str,
        view_id: &str,
        params: &ListParams,
    ) -> Result<PaginatedResponse<Object>> {
        self.client.fetch(params.apply(ApiRequest::get(format!(
            "/spaces/{space_id}/lists/{list_id}/views/{view_id}/objects"
        ))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::http::HttpMethod;
    use crate::models::ViewLayout;
    use crate::testing::{object_page, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn add_objects_returns_message() {
        let transport = ScriptedTransport::new();
        transport.push_json(200, json!("2 objects added to list"));
        let client = AnytypeClient::with_transport(ClientConfig::default(), transport.clone());

        let message = client
            .lists()
            .add_objects("s1", "l1", &["o1".to_string(), "o2".to_string()])
            .unwrap();
        assert_eq!(message, "2 objects added to list");

        let sent = &transport.requests()[0];
        assert!(sent.url.ends_with("/v1/spaces/s1/lists/l1/objects"));
        assert_eq!(sent.body.as_deref(), Some(r#"{"objects":["o1","o2"]}"#));
    }

    #[test]
    fn remove_object_tolerates_no_content() {
        let transport = ScriptedTransport::new();
        transport.push(204, "");
        let client = AnytypeClient::with_transport(ClientConfig::default(), transport.clone());

        let message = client.lists().remove_object("s1", "l1", "o1").unwrap();
        assert!(message.is_empty());
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Delete);
        assert!(sent.url.ends_with("/v1/spaces/s1/lists/l1/objects/o1"));
    }

    #[test]
    fn views_and_view_objects() {
        let transport = ScriptedTransport::new();
        transport.push_json(
            200,
            json!({
                "data": [{"id": "v1", "name": "Board", "layout": "kanban"}],
                "pagination": {"offset": 0, "limit": 100, "total": 1, "has_more": false}
            }),
        );
        transport.push_json(200, object_page(0, 3, 3, 100));
        let client = AnytypeClient::with_transport(ClientConfig::default(), transport.clone());

        let views = client.lists().views("s1", "l1", &ListParams::default()).unwrap();
        assert_eq!(views.data[0].layout, ViewLayout::Kanban);
        assert!(views.data[0].filters.is_empty());

        let objects = client.lists().objects("s1", "l1", "v1", &ListParams::default()).unwrap();
        assert_eq!(objects.data.len(), 3);
        assert!(transport.requests()[1].url.ends_with("/v1/spaces/s1/lists/l1/views/v1/objects"));
    }
}
