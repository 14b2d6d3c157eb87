//! Request payloads and single-entity response envelopes.
//!
//! Every optional field is skipped when `None`, so the server only sees
//! the fields the caller set. Explicit `false`, `0` and `""` are sent.

use serde::{Deserialize, Serialize};

use super::entities::{Member, ObjectWithBody, Property, Space, Tag, Type};
use super::enums::{Color, PropertyFormat, SortDirection, SortProperty, TypeLayout};
use super::filter::FilterExpression;
use super::icon::Icon;
use super::property::PropertyLink;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SortOptions {
    pub property_key: SortProperty,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortOptions>,
}

impl SearchRequest {
    pub fn query(text: impl Into<String>) -> Self {
        Self {
            query: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_types(mut self, types: Vec<String>) -> Self {
        self.types = Some(types);
        self
    }

    pub fn with_filters(mut self, filters: FilterExpression) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_sort(mut self, property_key: SortProperty, direction: SortDirection) -> Self {
        self.sort = Some(SortOptions { property_key, direction });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateObjectRequest {
    pub type_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyLink>>,
}

impl CreateObjectRequest {
    pub fn new(type_key: impl Into<String>) -> Self {
        Self {
            type_key: type_key.into(),
            name: None,
            body: None,
            icon: None,
            template_id: None,
            properties: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Markdown body of the new object.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn template_id(mut self, template_id: impl Into<String>) -> Self {
        self.template_id = Some(template_id.into());
        self
    }

    pub fn properties(mut self, properties: Vec<PropertyLink>) -> Self {
        self.properties = Some(properties);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateObjectRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyLink>>,
}

impl UpdateObjectRequest {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn markdown(mut self, markdown: impl Into<String>) -> Self {
        self.markdown = Some(markdown.into());
        self
    }

    pub fn icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn type_key(mut self, type_key: impl Into<String>) -> Self {
        self.type_key = Some(type_key.into());
        self
    }

    pub fn properties(mut self, properties: Vec<PropertyLink>) -> Self {
        self.properties = Some(properties);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSpaceRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateSpaceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub color: Color,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateTagRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatePropertyRequest {
    pub name: String,
    pub format: PropertyFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Initial options for select and multi-select properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<CreateTagRequest>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatePropertyRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTypeRequest {
    pub name: String,
    pub plural_name: String,
    pub layout: TypeLayout,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyLink>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdateTypeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plural_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<TypeLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<PropertyLink>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddObjectsToListRequest {
    pub objects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateChallengeRequest {
    pub app_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateChallengeResponse {
    pub challenge_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateApiKeyRequest {
    pub challenge_id: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateApiKeyResponse {
    pub api_key: String,
}

// Single-entity envelopes.

#[derive(Debug, Clone, Deserialize)]
pub struct SpaceResponse {
    pub space: Space,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectResponse {
    pub object: ObjectWithBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyResponse {
    pub property: Property,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeResponse {
    #[serde(rename = "type")]
    pub type_def: Type,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TagResponse {
    pub tag: Tag,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberResponse {
    pub member: Member,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TemplateResponse {
    pub template: ObjectWithBody,
}
