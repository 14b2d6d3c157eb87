use serde::{Deserialize, Serialize};

use super::enums::Color;

/// Icon attached to a space, object or type, discriminated by `format`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum Icon {
    Emoji {
        emoji: String,
    },
    File {
        file: String,
    },
    #[serde(rename = "icon")]
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<Color>,
    },
}

impl Icon {
    pub fn emoji(emoji: impl Into<String>) -> Self {
        Icon::Emoji { emoji: emoji.into() }
    }

    pub fn file(file_id: impl Into<String>) -> Self {
        Icon::File { file: file_id.into() }
    }

    pub fn named(name: impl Into<String>, color: Option<Color>) -> Self {
        Icon::Named {
            name: name.into(),
            color,
        }
    }
}
