use std::collections::{HashMap, HashSet};

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::ApiError;

/// Key accepted by a fresh store; more are issued through the auth flow.
pub const SEED_API_KEY: &str = "mock-api-key";
/// Code the "desktop app" shows for every challenge.
pub const AUTH_CODE: &str = "1234";

/// Property formats, in the order their value fields are probed.
pub const FORMATS: [&str; 11] = [
    "text",
    "number",
    "select",
    "multi_select",
    "date",
    "files",
    "checkbox",
    "url",
    "email",
    "phone",
    "objects",
];

#[derive(Debug, Clone)]
pub struct ObjectRecord {
    pub space_id: String,
    pub created: u64,
    pub modified: u64,
    pub value: Value,
}

impl ObjectRecord {
    pub fn id(&self) -> &str {
        self.value["id"].as_str().unwrap_or_default()
    }

    pub fn archived(&self) -> bool {
        self.value["archived"].as_bool().unwrap_or(false)
    }

    /// List and search shape: everything but the body.
    pub fn summary(&self) -> Value {
        let mut value = self.value.clone();
        if let Some(map) = value.as_object_mut() {
            map.remove("markdown");
        }
        value
    }
}

#[derive(Debug, Clone)]
pub struct Scoped {
    pub space_id: String,
    /// Owning property for tags.
    pub parent_id: Option<String>,
    pub value: Value,
}

impl Scoped {
    fn is(&self, space_id: &str, id: &str) -> bool {
        self.space_id == space_id && self.value["id"] == id
    }
}

#[derive(Debug)]
pub struct Store {
    pub spaces: Vec<Value>,
    pub objects: Vec<ObjectRecord>,
    pub types: Vec<Scoped>,
    pub properties: Vec<Scoped>,
    pub tags: Vec<Scoped>,
    challenges: HashMap<String, String>,
    api_keys: HashSet<String>,
    clock: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            spaces: Vec::new(),
            objects: Vec::new(),
            types: Vec::new(),
            properties: Vec::new(),
            tags: Vec::new(),
            challenges: HashMap::new(),
            api_keys: HashSet::from([SEED_API_KEY.to_string()]),
            clock: 0,
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn slug(name: &str) -> String {
    name.trim().to_lowercase().replace(char::is_whitespace, "_")
}

impl Store {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn is_valid_key(&self, key: &str) -> bool {
        self.api_keys.contains(key)
    }

    pub fn create_challenge(&mut self, app_name: String) -> String {
        let id = new_id();
        self.challenges.insert(id.clone(), app_name);
        id
    }

    /// Trade a challenge and its code for a new API key.
    pub fn redeem(&mut self, challenge_id: &str, code: &str) -> Result<String, ApiError> {
        if !self.challenges.contains_key(challenge_id) {
            return Err(ApiError::not_found("challenge"));
        }
        if code != AUTH_CODE {
            return Err(ApiError::unauthorized("invalid code"));
        }
        self.challenges.remove(challenge_id);
        let key = new_id();
        self.api_keys.insert(key.clone());
        Ok(key)
    }

    // Spaces

    pub fn space(&self, space_id: &str) -> Result<&Value, ApiError> {
        self.spaces
            .iter()
            .find(|s| s["id"] == space_id)
            .ok_or_else(|| ApiError::not_found("space"))
    }

    pub fn space_mut(&mut self, space_id: &str) -> Result<&mut Value, ApiError> {
        self.spaces
            .iter_mut()
            .find(|s| s["id"] == space_id)
            .ok_or_else(|| ApiError::not_found("space"))
    }

    /// New space, seeded with the built-in `page` and `task` types.
    pub fn create_space(&mut self, name: String, description: Option<String>) -> Value {
        let id = new_id();
        let mut space = json!({
            "object": "space",
            "id": id.clone(),
            "name": name,
            "network_id": format!("N{}", new_id()),
            "gateway_url": "http://127.0.0.1:31010",
        });
        if let Some(description) = description {
            space["description"] = json!(description);
        }
        self.spaces.push(space.clone());
        self.insert_type(&id, "page", "Page", "Pages", "basic", Vec::new());
        self.insert_type(&id, "task", "Task", "Tasks", "action", Vec::new());
        space
    }

    // Types

    pub fn insert_type(
        &mut self,
        space_id: &str,
        key: &str,
        name: &str,
        plural_name: &str,
        layout: &str,
        properties: Vec<Value>,
    ) -> Value {
        let value = json!({
            "object": "type",
            "id": new_id(),
            "key": key,
            "name": name,
            "plural_name": plural_name,
            "layout": layout,
            "archived": false,
            "properties": properties,
        });
        self.types.push(Scoped {
            space_id: space_id.to_string(),
            parent_id: None,
            value: value.clone(),
        });
        value
    }

    pub fn type_by_id(&self, space_id: &str, type_id: &str) -> Result<&Value, ApiError> {
        self.types
            .iter()
            .find(|t| t.is(space_id, type_id))
            .map(|t| &t.value)
            .ok_or_else(|| ApiError::not_found("type"))
    }

    pub fn type_by_key(&self, space_id: &str, key: &str) -> Option<&Value> {
        self.types
            .iter()
            .find(|t| t.space_id == space_id && t.value["key"] == key)
            .map(|t| &t.value)
    }

    pub fn types_in(&self, space_id: &str) -> Vec<Value> {
        scoped_values(&self.types, space_id, None)
    }

    // Properties and tags

    pub fn insert_property(&mut self, space_id: &str, name: &str, format: &str, key: Option<String>) -> Value {
        let value = json!({
            "object": "property",
            "id": new_id(),
            "key": key.unwrap_or_else(|| slug(name)),
            "name": name,
            "format": format,
        });
        self.properties.push(Scoped {
            space_id: space_id.to_string(),
            parent_id: None,
            value: value.clone(),
        });
        value
    }

    pub fn property_by_id(&self, space_id: &str, property_id: &str) -> Result<&Value, ApiError> {
        self.properties
            .iter()
            .find(|p| p.is(space_id, property_id))
            .map(|p| &p.value)
            .ok_or_else(|| ApiError::not_found("property"))
    }

    pub fn properties_in(&self, space_id: &str) -> Vec<Value> {
        scoped_values(&self.properties, space_id, None)
    }

    pub fn insert_tag(&mut self, space_id: &str, property_id: &str, name: &str, color: &str, key: Option<String>) -> Value {
        let value = json!({
            "object": "tag",
            "id": new_id(),
            "key": key.unwrap_or_else(|| slug(name)),
            "name": name,
            "color": color,
        });
        self.tags.push(Scoped {
            space_id: space_id.to_string(),
            parent_id: Some(property_id.to_string()),
            value: value.clone(),
        });
        value
    }

    pub fn tags_of(&self, space_id: &str, property_id: &str) -> Vec<Value> {
        scoped_values(&self.tags, space_id, Some(property_id))
    }

    fn tag(&self, space_id: &str, tag_id: &str) -> Value {
        self.tags
            .iter()
            .find(|t| t.is(space_id, tag_id))
            .map(|t| t.value.clone())
            .unwrap_or_else(|| json!({"id": tag_id, "key": tag_id, "name": tag_id, "color": "grey"}))
    }

    // Objects

    pub fn live_objects<'a>(&'a self, space_id: Option<&'a str>) -> impl Iterator<Item = &'a ObjectRecord> + 'a {
        self.objects
            .iter()
            .filter(move |o| !o.archived() && space_id.map_or(true, |s| o.space_id == s))
    }

    pub fn object(&self, space_id: &str, object_id: &str) -> Result<&ObjectRecord, ApiError> {
        self.objects
            .iter()
            .find(|o| o.space_id == space_id && o.id() == object_id)
            .ok_or_else(|| ApiError::not_found("object"))
    }

    fn object_index(&self, space_id: &str, object_id: &str) -> Result<usize, ApiError> {
        self.objects
            .iter()
            .position(|o| o.space_id == space_id && o.id() == object_id)
            .ok_or_else(|| ApiError::not_found("object"))
    }

    pub fn create_object(
        &mut self,
        space_id: &str,
        type_key: &str,
        name: Option<String>,
        body: Option<String>,
        icon: Option<Value>,
        links: &[Value],
    ) -> Result<Value, ApiError> {
        let object_type = self
            .type_by_key(space_id, type_key)
            .cloned()
            .ok_or_else(|| ApiError::validation(format!("unknown type key {type_key:?}")))?;
        let properties: Vec<Value> = links.iter().filter_map(|l| self.resolve_link(space_id, l)).collect();

        let mut value = json!({
            "object": "object",
            "id": new_id(),
            "space_id": space_id,
            "layout": object_type["layout"],
            "archived": false,
            "type": object_type,
            "properties": properties,
        });
        if let Some(name) = name {
            value["name"] = json!(name);
        }
        if let Some(icon) = icon {
            value["icon"] = icon;
        }
        if let Some(body) = body {
            value["snippet"] = json!(body.chars().take(120).collect::<String>());
            value["markdown"] = json!(body);
        }

        let now = self.tick();
        self.objects.push(ObjectRecord {
            space_id: space_id.to_string(),
            created: now,
            modified: now,
            value: value.clone(),
        });
        Ok(value)
    }

    /// Apply a partial update; keys absent from `patch` are left alone.
    pub fn update_object(&mut self, space_id: &str, object_id: &str, patch: &Map<String, Value>) -> Result<Value, ApiError> {
        let index = self.object_index(space_id, object_id)?;
        let object_type = match patch.get("type_key").and_then(Value::as_str) {
            Some(key) => Some(
                self.type_by_key(space_id, key)
                    .cloned()
                    .ok_or_else(|| ApiError::validation(format!("unknown type key {key:?}")))?,
            ),
            None => None,
        };
        let resolved: Vec<Value> = patch
            .get("properties")
            .and_then(Value::as_array)
            .map(|links| links.iter().filter_map(|l| self.resolve_link(space_id, l)).collect())
            .unwrap_or_default();
        let now = self.tick();

        let record = &mut self.objects[index];
        record.modified = now;
        let value = &mut record.value;
        for field in ["name", "icon", "markdown"] {
            if let Some(v) = patch.get(field) {
                value[field] = v.clone();
            }
        }
        if let Some(object_type) = object_type {
            value["layout"] = object_type["layout"].clone();
            value["type"] = object_type;
        }
        if let Some(existing) = value["properties"].as_array_mut() {
            for property in resolved {
                match existing.iter_mut().find(|p| p["key"] == property["key"]) {
                    Some(slot) => *slot = property,
                    None => existing.push(property),
                }
            }
        }
        Ok(value.clone())
    }

    pub fn archive_object(&mut self, space_id: &str, object_id: &str) -> Result<Value, ApiError> {
        let index = self.object_index(space_id, object_id)?;
        let now = self.tick();
        let record = &mut self.objects[index];
        record.modified = now;
        record.value["archived"] = json!(true);
        Ok(record.value.clone())
    }

    /// Turn a write-side link (`{"key", "<format>": ids-or-value}`) into the
    /// read-side value stored on the object.
    fn resolve_link(&self, space_id: &str, link: &Value) -> Option<Value> {
        let key = link["key"].as_str()?;
        let format = FORMATS.iter().copied().find(|f| link.get(*f).is_some())?;
        let raw = &link[format];
        let resolved = match format {
            "select" => raw.as_str().map(|id| self.tag(space_id, id)).unwrap_or(Value::Null),
            "multi_select" => Value::Array(
                raw.as_array()
                    .map(|ids| ids.iter().filter_map(Value::as_str).map(|id| self.tag(space_id, id)).collect::<Vec<_>>())
                    .unwrap_or_default(),
            ),
            _ => raw.clone(),
        };
        let definition = self
            .properties
            .iter()
            .find(|p| p.space_id == space_id && p.value["key"] == key);
        let (id, name) = match definition {
            Some(p) => (p.value["id"].clone(), p.value["name"].clone()),
            None => (json!(format!("prop-{key}")), json!(key)),
        };

        let mut value = json!({"object": "property", "id": id, "key": key, "name": name, "format": format});
        value[format] = resolved;
        Some(value)
    }
}

fn scoped_values(entries: &[Scoped], space_id: &str, parent_id: Option<&str>) -> Vec<Value> {
    entries
        .iter()
        .filter(|e| e.space_id == space_id && e.parent_id.as_deref() == parent_id)
        .map(|e| e.value.clone())
        .collect()
}
