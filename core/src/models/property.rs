//! Property values (read side) and property links (write side).
//!
//! The API sends one JSON shape per property format. Both directions are
//! modelled as tagged unions so the format is decided once, at the serde
//! boundary, and callers match on it instead of probing optional fields.

use serde::{Deserialize, Serialize};

use super::entities::Tag;
use super::enums::PropertyFormat;

/// A property as it appears on an object or type, with its resolved value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(flatten)]
    pub data: PropertyData,
}

/// Value payload keyed by the wire `format` field.
///
/// Every payload is optional: type definitions list properties without
/// values, and objects may carry a property that was never set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum PropertyData {
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        number: Option<f64>,
    },
    Select {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        select: Option<Tag>,
    },
    MultiSelect {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multi_select: Option<Vec<Tag>>,
    },
    Date {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<String>,
    },
    Files {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        files: Option<Vec<String>>,
    },
    Checkbox {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checkbox: Option<bool>,
    },
    Url {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    Email {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    Phone {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
    },
    Objects {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        objects: Option<Vec<String>>,
    },
}

impl PropertyData {
    pub fn format(&self) -> PropertyFormat {
        match self {
            PropertyData::Text { .. } => PropertyFormat::Text,
            PropertyData::Number { .. } => PropertyFormat::Number,
            PropertyData::Select { .. } => PropertyFormat::Select,
            PropertyData::MultiSelect { .. } => PropertyFormat::MultiSelect,
            PropertyData::Date { .. } => PropertyFormat::Date,
            PropertyData::Files { .. } => PropertyFormat::Files,
            PropertyData::Checkbox { .. } => PropertyFormat::Checkbox,
            PropertyData::Url { .. } => PropertyFormat::Url,
            PropertyData::Email { .. } => PropertyFormat::Email,
            PropertyData::Phone { .. } => PropertyFormat::Phone,
            PropertyData::Objects { .. } => PropertyFormat::Objects,
        }
    }

    /// True when the payload for this format is absent.
    pub fn is_unset(&self) -> bool {
        match self {
            PropertyData::Text { text } => text.is_none(),
            PropertyData::Number { number } => number.is_none(),
            PropertyData::Select { select } => select.is_none(),
            PropertyData::MultiSelect { multi_select } => multi_select.is_none(),
            PropertyData::Date { date } => date.is_none(),
            PropertyData::Files { files } => files.is_none(),
            PropertyData::Checkbox { checkbox } => checkbox.is_none(),
            PropertyData::Url { url } => url.is_none(),
            PropertyData::Email { email } => email.is_none(),
            PropertyData::Phone { phone } => phone.is_none(),
            PropertyData::Objects { objects } => objects.is_none(),
        }
    }
}

impl PropertyValue {
    pub fn format(&self) -> PropertyFormat {
        self.data.format()
    }

    /// String payload of the text-like formats (text, url, email, phone).
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            PropertyData::Text { text: Some(s) }
            | PropertyData::Url { url: Some(s) }
            | PropertyData::Email { email: Some(s) }
            | PropertyData::Phone { phone: Some(s) } => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.data {
            PropertyData::Number { number } => number,
            _ => None,
        }
    }

    pub fn as_checkbox(&self) -> Option<bool> {
        match self.data {
            PropertyData::Checkbox { checkbox } => checkbox,
            _ => None,
        }
    }

    /// ISO-8601 date string as sent by the server.
    pub fn as_date(&self) -> Option<&str> {
        match &self.data {
            PropertyData::Date { date } => date.as_deref(),
            _ => None,
        }
    }

    pub fn as_select(&self) -> Option<&Tag> {
        match &self.data {
            PropertyData::Select { select } => select.as_ref(),
            _ => None,
        }
    }

    pub fn as_multi_select(&self) -> Option<&[Tag]> {
        match &self.data {
            PropertyData::MultiSelect { multi_select } => multi_select.as_deref(),
            _ => None,
        }
    }

    /// Identifier lists of the `files` and `objects` formats.
    pub fn as_ids(&self) -> Option<&[String]> {
        match &self.data {
            PropertyData::Files { files } => files.as_deref(),
            PropertyData::Objects { objects } => objects.as_deref(),
            _ => None,
        }
    }
}

/// A property assignment sent when creating or updating an object or type.
///
/// Serializes as `{"key": ..., "<format>": <value>}`; select formats carry
/// tag ids, not resolved tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyLink {
    pub key: String,
    #[serde(flatten)]
    pub value: PropertyLinkValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyLinkValue {
    Text(String),
    Number(f64),
    Select(String),
    MultiSelect(Vec<String>),
    Date(String),
    Files(Vec<String>),
    Checkbox(bool),
    Url(String),
    Email(String),
    Phone(String),
    Objects(Vec<String>),
}

impl PropertyLink {
    fn new(key: impl Into<String>, value: PropertyLinkValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    pub fn text(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(key, PropertyLinkValue::Text(text.into()))
    }

    pub fn number(key: impl Into<String>, number: f64) -> Self {
        Self::new(key, PropertyLinkValue::Number(number))
    }

    pub fn select(key: impl Into<String>, tag_id: impl Into<String>) -> Self {
        Self::new(key, PropertyLinkValue::Select(tag_id.into()))
    }

    pub fn multi_select(key: impl Into<String>, tag_ids: Vec<String>) -> Self {
        Self::new(key, PropertyLinkValue::MultiSelect(tag_ids))
    }

    pub fn date(key: impl Into<String>, date: impl Into<String>) -> Self {
        Self::new(key, PropertyLinkValue::Date(date.into()))
    }

    pub fn files(key: impl Into<String>, file_ids: Vec<String>) -> Self {
        Self::new(key, PropertyLinkValue::Files(file_ids))
    }

    pub fn checkbox(key: impl Into<String>, checked: bool) -> Self {
        Self::new(key, PropertyLinkValue::Checkbox(checked))
    }

    pub fn url(key: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(key, PropertyLinkValue::Url(url.into()))
    }

    pub fn email(key: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(key, PropertyLinkValue::Email(email.into()))
    }

    pub fn phone(key: impl Into<String>, phone: impl Into<String>) -> Self {
        Self::new(key, PropertyLinkValue::Phone(phone.into()))
    }

    pub fn objects(key: impl Into<String>, object_ids: Vec<String>) -> Self {
        Self::new(key, PropertyLinkValue::Objects(object_ids))
    }
}
