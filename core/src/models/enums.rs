use std::fmt;

use serde::{Deserialize, Serialize};

/// Implements `as_str`, `from_wire` and `Display` from the snake_case wire name.
macro_rules! wire_names {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }

            pub fn from_wire(s: &str) -> Option<Self> {
                match s {
                    $($name => Some($ty::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Grey,
    Yellow,
    Orange,
    Red,
    Pink,
    Purple,
    Blue,
    Ice,
    Teal,
    Lime,
}

wire_names!(Color {
    Grey => "grey",
    Yellow => "yellow",
    Orange => "orange",
    Red => "red",
    Pink => "pink",
    Purple => "purple",
    Blue => "blue",
    Ice => "ice",
    Teal => "teal",
    Lime => "lime",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyFormat {
    Text,
    Number,
    Select,
    MultiSelect,
    Date,
    Files,
    Checkbox,
    Url,
    Email,
    Phone,
    Objects,
}

wire_names!(PropertyFormat {
    Text => "text",
    Number => "number",
    Select => "select",
    MultiSelect => "multi_select",
    Date => "date",
    Files => "files",
    Checkbox => "checkbox",
    Url => "url",
    Email => "email",
    Phone => "phone",
    Objects => "objects",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    Ncontains,
    In,
    Nin,
    All,
    Empty,
    Nempty,
}

wire_names!(FilterCondition {
    Eq => "eq",
    Ne => "ne",
    Gt => "gt",
    Gte => "gte",
    Lt => "lt",
    Lte => "lte",
    Contains => "contains",
    Ncontains => "ncontains",
    In => "in",
    Nin => "nin",
    All => "all",
    Empty => "empty",
    Nempty => "nempty",
});

impl FilterCondition {
    /// Conditions that test presence and never carry a value.
    pub fn is_presence_check(&self) -> bool {
        matches!(self, FilterCondition::Empty | FilterCondition::Nempty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

wire_names!(SortDirection {
    Asc => "asc",
    Desc => "desc",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortProperty {
    CreatedDate,
    #[default]
    LastModifiedDate,
    LastOpenedDate,
    Name,
}

wire_names!(SortProperty {
    CreatedDate => "created_date",
    LastModifiedDate => "last_modified_date",
    LastOpenedDate => "last_opened_date",
    Name => "name",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectLayout {
    Basic,
    Profile,
    Action,
    Note,
    Bookmark,
    Set,
    Collection,
    Participant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeLayout {
    Basic,
    Profile,
    Action,
    Note,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Viewer,
    Editor,
    Owner,
    NoPermission,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Joining,
    Active,
    Removed,
    Declined,
    Removing,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewLayout {
    Grid,
    List,
    Gallery,
    Kanban,
    Calendar,
    Graph,
}
