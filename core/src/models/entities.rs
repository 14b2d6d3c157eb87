use std::ops::Deref;

use serde::{Deserialize, Serialize};

use super::enums::{
    Color, FilterCondition, MemberRole, MemberStatus, ObjectLayout, PropertyFormat, TypeLayout, ViewLayout,
};
use super::icon::Icon;
use super::property::PropertyValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub network_id: String,
    pub gateway_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

/// Schema definition objects of this type conform to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Type {
    pub id: String,
    pub key: String,
    pub name: String,
    pub plural_name: String,
    pub layout: TypeLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyValue>,
}

/// An object as returned by list and search endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<Type>,
    pub space_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<ObjectLayout>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyValue>,
}

impl Object {
    pub fn property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.iter().find(|p| p.key == key)
    }

    /// Key of the object's type, when the server included it.
    pub fn type_key(&self) -> Option<&str> {
        self.object_type.as_ref().map(|t| t.key.as_str())
    }
}

/// An object as returned by single-object endpoints, including its body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectWithBody {
    #[serde(flatten)]
    pub record: Object,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
}

impl Deref for ObjectWithBody {
    type Target = Object;

    fn deref(&self) -> &Object {
        &self.record
    }
}

impl From<ObjectWithBody> for Object {
    fn from(value: ObjectWithBody) -> Self {
        value.record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub key: String,
    pub name: String,
    pub format: PropertyFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

/// Option value of a select or multi-select property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub key: String,
    pub name: String,
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub identity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub role: MemberRole,
    pub status: MemberStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
}

/// Filter stored on a list view. Values are free-form on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub property_key: String,
    pub condition: FilterCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PropertyFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewSortType {
    Asc,
    Desc,
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSort {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub property_key: String,
    pub sort_type: ViewSortType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PropertyFormat>,
}

/// Presentation of a list's objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    pub name: String,
    pub layout: ViewLayout,
    #[serde(default)]
    pub filters: Vec<ViewFilter>,
    #[serde(default)]
    pub sorts: Vec<ViewSort>,
}
