//! Fluent filter queries over the objects of a space.
//!
//! Keys follow the `field__operator` lookup convention: `name__contains`,
//! `pages__gte`, `due__isnull`. A bare key means equality. `Query` is a
//! plain value that only translates lookups into typed filter conditions;
//! `QueryBuilder` binds one to a client and a space and runs it through
//! the space search endpoint.

use serde_json::Value;
use tracing::warn;

use crate::api::{clamp_limit, DEFAULT_LIMIT};
use crate::client::AnytypeClient;
use crate::error::Result;
use crate::models::{
    FilterCondition, FilterExpression, FilterItem, FilterValue, Object, SearchRequest, SortDirection,
    SortOptions, SortProperty,
};
use crate::paginator::Paginator;

pub const LOOKUP_SEPARATOR: &str = "__";

/// Condition for a lookup operator, `None` if the operator is unknown.
pub fn map_operator(op: &str) -> Option<FilterCondition> {
    let condition = match op {
        "eq" | "exact" => FilterCondition::Eq,
        "ne" => FilterCondition::Ne,
        "gt" => FilterCondition::Gt,
        "gte" => FilterCondition::Gte,
        "lt" => FilterCondition::Lt,
        "lte" => FilterCondition::Lte,
        "contains" | "icontains" => FilterCondition::Contains,
        "in" => FilterCondition::In,
        "isnull" => FilterCondition::Empty,
        "notnull" => FilterCondition::Nempty,
        _ => return None,
    };
    Some(condition)
}

/// Split a lookup key into its field and condition.
///
/// The operator follows the last separator, so field keys may contain `__`.
/// Unknown operators degrade to `eq`, keeping the field part.
pub fn parse_lookup(key: &str) -> (&str, FilterCondition) {
    match key.rsplit_once(LOOKUP_SEPARATOR) {
        None => (key, FilterCondition::Eq),
        Some((field, op)) => match map_operator(op) {
            Some(condition) => (field, condition),
            None => {
                warn!(key, operator = op, "unknown lookup operator, falling back to eq");
                (field, FilterCondition::Eq)
            }
        },
    }
}

/// Typed filter value for a lookup value; presence checks carry none.
pub fn filter_value(value: &Value, condition: FilterCondition) -> Option<FilterValue> {
    if condition.is_presence_check() {
        return None;
    }
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(FilterValue::Checkbox(*b)),
        Value::Number(n) => n.as_f64().map(FilterValue::Number),
        Value::String(s) => Some(FilterValue::Text(s.clone())),
        Value::Array(items) => Some(FilterValue::MultiSelect(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        )),
        Value::Object(_) => Some(FilterValue::Text(value.to_string())),
    }
}

/// Translate one `field__op = value` pair into a filter condition.
pub fn lookup_condition(key: &str, value: &Value) -> FilterItem {
    let (field, condition) = parse_lookup(key);
    FilterItem::new(field, condition, filter_value(value, condition))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub type_key: Option<String>,
    pub text: Option<String>,
    pub conditions: Vec<FilterItem>,
    pub limit: usize,
    pub offset: usize,
    pub sort: Option<SortOptions>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            type_key: None,
            text: None,
            conditions: Vec::new(),
            limit: DEFAULT_LIMIT,
            offset: 0,
            sort: None,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, type_key: impl Into<String>) -> Self {
        self.type_key = Some(type_key.into());
        self
    }

    /// Append one condition per `field__op` pair, in iteration order.
    pub fn filter<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (key, value) in pairs {
            let condition = lookup_condition(key.as_ref(), &value.into());
            self.conditions.push(condition);
        }
        self
    }

    pub fn condition(mut self, item: FilterItem) -> Self {
        self.conditions.push(item);
        self
    }

    /// Full-text search term sent alongside the filters.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = clamp_limit(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn order_by(mut self, property_key: SortProperty, direction: SortDirection) -> Self {
        self.sort = Some(SortOptions { property_key, direction });
        self
    }

    /// AND of every condition, or `None` when there is nothing to filter on.
    pub fn filter_expression(&self) -> Option<FilterExpression> {
        if self.conditions.is_empty() {
            None
        } else {
            Some(FilterExpression::and(self.conditions.clone()))
        }
    }

    pub fn to_search_request(&self) -> SearchRequest {
        SearchRequest {
            query: self.text.clone(),
            types: self.type_key.as_ref().map(|key| vec![key.clone()]),
            filters: self.filter_expression(),
            sort: self.sort,
        }
    }
}

/// A `Query` bound to a client and a space.
#[derive(Debug, Clone)]
pub struct QueryBuilder<'a> {
    client: &'a AnytypeClient,
    space_id: String,
    query: Query,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(client: &'a AnytypeClient, space_id: &str) -> Self {
        Self::from_query(client, space_id, Query::new())
    }

    pub fn from_query(client: &'a AnytypeClient, space_id: &str, query: Query) -> Self {
        Self {
            client,
            space_id: space_id.to_string(),
            query,
        }
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn of_type(mut self, type_key: impl Into<String>) -> Self {
        self.query = self.query.of_type(type_key);
        self
    }

    pub fn filter<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.query = self.query.filter(pairs);
        self
    }

    pub fn condition(mut self, item: FilterItem) -> Self {
        self.query = self.query.condition(item);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.query = self.query.search(text);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.query = self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.query = self.query.offset(offset);
        self
    }

    pub fn order_by(mut self, property_key: SortProperty, direction: SortDirection) -> Self {
        self.query = self.query.order_by(property_key, direction);
        self
    }

    /// Items of the first page at the query's offset and limit.
    pub fn all(&self) -> Result<Vec<Object>> {
        let request = self.query.to_search_request();
        let page = self
            .client
            .search()
            .in_space(&self.space_id, &request, self.query.offset, self.query.limit)?;
        Ok(page.into_data())
    }

    pub fn first(&self) -> Result<Option<Object>> {
        let request = self.query.to_search_request();
        let page = self
            .client
            .search()
            .in_space(&self.space_id, &request, self.query.offset, 1)?;
        Ok(page.into_data().into_iter().next())
    }

    /// Server-reported number of matches.
    pub fn count(&self) -> Result<usize> {
        let request = self.query.to_search_request();
        let page = self.client.search().in_space(&self.space_id, &request, 0, 1)?;
        Ok(page.pagination.total)
    }

    /// Every match, page by page, using the query limit as page size.
    pub fn iter(&self) -> Paginator<'a, Object> {
        let client = self.client;
        let space_id = self.space_id.clone();
        let request = self.query.to_search_request();
        Paginator::new(self.query.offset, self.query.limit, move |offset, limit| {
            client.search().in_space(&space_id, &request, offset, limit)
        })
    }
}
