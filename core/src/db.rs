//! Database-style facade: a space is a database, resource kinds are tables.
//!
//! `Database` is a factory holding a `ClientConfig`; `connect` opens a
//! `Connection` bound to one space. Tables are views over the resource
//! handles and `find` goes through the canonical `QueryBuilder`.

use serde_json::Value;

use crate::api::ListParams;
use crate::client::AnytypeClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::models::{
    Color, CreateObjectRequest, CreateTypeRequest, Object, ObjectWithBody, Property, PropertyFormat, Tag, Type,
    UpdateObjectRequest,
};
use crate::query::QueryBuilder;
use crate::simple::Table;

#[derive(Debug, Clone)]
pub struct Database {
    config: ClientConfig,
}

impl Database {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Open a connection to `space_id` with a fresh client.
    pub fn connect(&self, space_id: &str) -> Connection {
        Connection::new(AnytypeClient::new(self.config.clone()), space_id)
    }
}

/// A client bound to one space.
#[derive(Debug, Clone)]
pub struct Connection {
    client: AnytypeClient,
    space_id: String,
}

impl Connection {
    pub fn new(client: AnytypeClient, space_id: &str) -> Self {
        Self {
            client,
            space_id: space_id.to_string(),
        }
    }

    pub fn client(&self) -> &AnytypeClient {
        &self.client
    }

    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    pub fn objects(&self) -> ObjectsTable<'_> {
        ObjectsTable { conn: self }
    }

    pub fn types(&self) -> TypesTable<'_> {
        TypesTable { conn: self }
    }

    pub fn properties(&self) -> PropertiesTable<'_> {
        PropertiesTable { conn: self }
    }

    pub fn tags(&self) -> TagsTable<'_> {
        TagsTable { conn: self }
    }

    /// Query objects of one type.
    pub fn query(&self, type_key: &str) -> QueryBuilder<'_> {
        self.client.query(&self.space_id).of_type(type_key)
    }

    /// Table of the objects of one type.
    pub fn table(&self, type_key: &str) -> Table<'_> {
        Table::new(self, type_key)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ObjectsTable<'a> {
    conn: &'a Connection,
}

impl<'a> ObjectsTable<'a> {
    pub fn insert(&self, request: &CreateObjectRequest) -> Result<ObjectWithBody> {
        self.conn.client.objects().create(&self.conn.space_id, request)
    }

    pub fn get(&self, object_id: &str) -> Result<ObjectWithBody> {
        self.conn.client.objects().get(&self.conn.space_id, object_id)
    }

    pub fn update(&self, object_id: &str, request: &UpdateObjectRequest) -> Result<ObjectWithBody> {
        self.conn.client.objects().update(&self.conn.space_id, object_id, request)
    }

    /// Archive an object.
    pub fn delete(&self, object_id: &str) -> Result<ObjectWithBody> {
        self.conn.client.objects().delete(&self.conn.space_id, object_id)
    }

    /// Objects of any type matching every `field__op` lookup.
    pub fn find<K, V>(&self, lookups: impl IntoIterator<Item = (K, V)>) -> Result<Vec<Object>>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.conn.client.query(&self.conn.space_id).filter(lookups).all()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypesTable<'a> {
    conn: &'a Connection,
}

impl<'a> TypesTable<'a> {
    /// Every type of the space.
    pub fn list(&self) -> Result<Vec<Type>> {
        self.conn
            .client
            .types()
            .paginate(&self.conn.space_id, ListParams::default())
            .all()
    }

    pub fn get(&self, type_id: &str) -> Result<Type> {
        self.conn.client.types().get(&self.conn.space_id, type_id)
    }

    pub fn create(&self, request: &CreateTypeRequest) -> Result<Type> {
        self.conn.client.types().create(&self.conn.space_id, request)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PropertiesTable<'a> {
    conn: &'a Connection,
}

impl<'a> PropertiesTable<'a> {
    pub fn list(&self) -> Result<Vec<Property>> {
        self.conn
            .client
            .properties()
            .paginate(&self.conn.space_id, ListParams::default())
            .all()
    }

    pub fn get(&self, property_id: &str) -> Result<Property> {
        self.conn.client.properties().get(&self.conn.space_id, property_id)
    }

    pub fn create(&self, name: &str, format: PropertyFormat) -> Result<Property> {
        self.conn
            .client
            .properties()
            .create(&self.conn.space_id, name, format, None, None)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TagsTable<'a> {
    conn: &'a Connection,
}

impl<'a> TagsTable<'a> {
    /// First page of tags of a select property.
    pub fn list(&self, property_id: &str) -> Result<Vec<Tag>> {
        let page = self
            .conn
            .client
            .tags()
            .list(&self.conn.space_id, property_id, &ListParams::default())?;
        Ok(page.into_data())
    }

    pub fn get(&self, property_id: &str, tag_id: &str) -> Result<Tag> {
        self.conn.client.tags().get(&self.conn.space_id, property_id, tag_id)
    }

    pub fn create(&self, property_id: &str, name: &str, color: Color) -> Result<Tag> {
        self.conn
            .client
            .tags()
            .create(&self.conn.space_id, property_id, name, color, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{object_page, ScriptedTransport};
    use serde_json::json;

    fn connection() -> (Connection, ScriptedTransport) {
        let transport = ScriptedTransport::new();
        let client = AnytypeClient::with_transport(ClientConfig::new("k"), transport.clone());
        (Connection::new(client, "s1"), transport)
    }

    #[test]
    fn objects_table_is_scoped_to_the_space() {
        let (conn, transport) = connection();
        transport.push_json(201, json!({"object": {"id": "o1", "space_id": "s1"}}));
        transport.push_json(200, json!({"object": {"id": "o1", "space_id": "s1", "archived": true}}));

        conn.objects().insert(&CreateObjectRequest::new("page").name("Notes")).unwrap();
        let archived = conn.objects().delete("o1").unwrap();
        assert!(archived.archived);

        let requests = transport.requests();
        assert!(requests[0].url.ends_with("/v1/spaces/s1/objects"));
        assert!(requests[1].url.ends_with("/v1/spaces/s1/objects/o1"));
    }

    #[test]
    fn find_sends_lookups_as_filters() {
        let (conn, transport) = connection();
        transport.push_json(200, object_page(0, 1, 1, 100));

        let found = conn.objects().find([("name__icontains", "notes")]).unwrap();
        assert_eq!(found.len(), 1);

        let body: Value = serde_json::from_str(transport.requests()[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"filters": {"operator": "and", "conditions": [
                {"property_key": "name", "condition": "contains", "text": "notes"}
            ]}})
        );
    }

    #[test]
    fn query_is_restricted_to_type() {
        let (conn, _transport) = connection();
        let request = conn.query("task").query().to_search_request();
        assert_eq!(request.types, Some(vec!["task".to_string()]));
    }

    #[test]
    fn types_list_drains_every_page() {
        let (conn, transport) = connection();
        let ty = |id: &str| json!({"id": id, "key": id, "name": id, "plural_name": id, "layout": "basic"});
        transport.push_json(
            200,
            json!({"data": [ty("a"), ty("b")], "pagination": {"offset": 0, "limit": 2, "total": 3, "has_more": true}}),
        );
        transport.push_json(
            200,
            json!({"data": [ty("c")], "pagination": {"offset": 2, "limit": 2, "total": 3, "has_more": false}}),
        );

        let types = conn.types().list().unwrap();
        assert_eq!(types.len(), 3);
        assert_eq!(transport.requests()[1].query_param("offset"), Some("2"));
    }
}
