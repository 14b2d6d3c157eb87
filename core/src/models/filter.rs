//! Search filter expressions.
//!
//! A `FilterExpression` is a tree: an AND/OR operator over leaf
//! `FilterItem`s and nested expressions. Leaves serialize as
//! `{"property_key": ..., "condition": ..., "<format>": <value>}`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::enums::{FilterCondition, FilterOperator};

/// Typed comparison value of a leaf condition, keyed by property format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    Text(String),
    Number(f64),
    Select(String),
    /// Candidate tag ids of an `in`/`nin` test on a select property.
    #[serde(rename = "select")]
    SelectAny(Vec<String>),
    MultiSelect(Vec<String>),
    Date(String),
    Checkbox(bool),
    Files(Vec<String>),
    Url(String),
    Email(String),
    Phone(String),
    Objects(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterItem {
    pub property_key: String,
    pub condition: FilterCondition,
    /// Absent for presence checks (`empty` / `nempty`).
    #[serde(flatten)]
    pub value: Option<FilterValue>,
}

impl FilterItem {
    pub fn new(property_key: impl Into<String>, condition: FilterCondition, value: Option<FilterValue>) -> Self {
        Self {
            property_key: property_key.into(),
            condition,
            value,
        }
    }

    pub fn text_eq(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FilterCondition::Eq, Some(FilterValue::Text(value.into())))
    }

    pub fn text_contains(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FilterCondition::Contains, Some(FilterValue::Text(value.into())))
    }

    pub fn number_gt(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FilterCondition::Gt, Some(FilterValue::Number(value)))
    }

    pub fn number_lt(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FilterCondition::Lt, Some(FilterValue::Number(value)))
    }

    pub fn date_after(key: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::new(key, FilterCondition::Gt, Some(FilterValue::Date(date.to_rfc3339())))
    }

    pub fn date_before(key: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self::new(key, FilterCondition::Lt, Some(FilterValue::Date(date.to_rfc3339())))
    }

    pub fn checkbox_is(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FilterCondition::Eq, Some(FilterValue::Checkbox(value)))
    }

    pub fn select_in(key: impl Into<String>, tag_ids: Vec<String>) -> Self {
        Self::new(key, FilterCondition::In, Some(FilterValue::SelectAny(tag_ids)))
    }

    pub fn multi_select_contains(key: impl Into<String>, tag_ids: Vec<String>) -> Self {
        Self::new(key, FilterCondition::Contains, Some(FilterValue::MultiSelect(tag_ids)))
    }

    pub fn is_empty(key: impl Into<String>) -> Self {
        Self::new(key, FilterCondition::Empty, None)
    }

    pub fn not_empty(key: impl Into<String>) -> Self {
        Self::new(key, FilterCondition::Nempty, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterExpression {
    pub operator: FilterOperator,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<FilterItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<FilterExpression>,
}

impl FilterExpression {
    pub fn and(conditions: Vec<FilterItem>) -> Self {
        Self {
            operator: FilterOperator::And,
            conditions,
            filters: Vec::new(),
        }
    }

    pub fn or(conditions: Vec<FilterItem>) -> Self {
        Self {
            operator: FilterOperator::Or,
            conditions,
            filters: Vec::new(),
        }
    }

    /// Nest another expression under this one.
    pub fn with(mut self, nested: FilterExpression) -> Self {
        self.filters.push(nested);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.filters.iter().all(FilterExpression::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn leaf_serializes_value_under_format_key() {
        let json = serde_json::to_value(FilterItem::number_gt("pages", 10.0)).unwrap();
        assert_eq!(json, json!({"property_key": "pages", "condition": "gt", "number": 10.0}));
    }

    #[test]
    fn select_in_sends_ids_under_select() {
        let json = serde_json::to_value(FilterItem::select_in("status", vec!["t1".into(), "t2".into()])).unwrap();
        assert_eq!(json, json!({"property_key": "status", "condition": "in", "select": ["t1", "t2"]}));
    }

    #[test]
    fn multi_select_contains_sends_ids_under_multi_select() {
        let json = serde_json::to_value(FilterItem::multi_select_contains("tags", vec!["t1".into()])).unwrap();
        assert_eq!(json, json!({"property_key": "tags", "condition": "contains", "multi_select": ["t1"]}));
    }

    #[test]
    fn presence_check_has_no_value_key() {
        let json = serde_json::to_value(FilterItem::is_empty("due")).unwrap();
        assert_eq!(json, json!({"property_key": "due", "condition": "empty"}));
    }

    #[test]
    fn date_helpers_use_rfc3339() {
        let date = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let item = FilterItem::date_after("due", date);
        assert_eq!(item.value, Some(FilterValue::Date("2025-01-02T03:04:05+00:00".into())));
    }

    #[test]
    fn nested_expression_serializes_recursively() {
        let expr = FilterExpression::and(vec![FilterItem::checkbox_is("done", false)])
            .with(FilterExpression::or(vec![
                FilterItem::text_contains("name", "milk"),
                FilterItem::text_contains("name", "eggs"),
            ]));
        let json = serde_json::to_value(&expr).unwrap();
        assert_eq!(json["operator"], "and");
        assert_eq!(json["conditions"][0]["checkbox"], false);
        assert_eq!(json["filters"][0]["operator"], "or");
        assert_eq!(json["filters"][0]["conditions"][1]["text"], "eggs");
    }
}
