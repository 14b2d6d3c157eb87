//! Table-per-type facade with a query-string entry point.
//!
//! ```text
//! name__contains=report&done=false&order_by=-created_date&limit=10
//! ```
//!
//! `limit`, `offset`, `order_by` (a `-` prefix sorts descending) and `q`
//! (full-text) are reserved keys; every other pair is a lookup. Values are
//! untyped on the wire, so `true`/`false` become checkbox values, numbers
//! become numeric values, `__in` values split on commas, and anything else
//! is text.

use serde_json::Value;

use crate::db::Connection;
use crate::error::{ApiError, Result};
use crate::models::{
    CreateObjectRequest, FilterCondition, Object, ObjectWithBody, PropertyLink, SortDirection, SortProperty,
    UpdateObjectRequest,
};
use crate::query::{parse_lookup, Query, QueryBuilder};

/// Parse a query string into a `Query`.
pub fn parse_query_string(input: &str) -> Result<Query> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(input.trim_start_matches('?')).map_err(|e| ApiError::InvalidQuery(e.to_string()))?;

    let mut query = Query::new();
    for (key, raw) in pairs {
        query = match key.as_str() {
            "limit" => query.limit(parse_count(&key, &raw)?),
            "offset" => query.offset(parse_count(&key, &raw)?),
            "q" => query.search(raw),
            "order_by" => {
                let (name, direction) = match raw.strip_prefix('-') {
                    Some(name) => (name, SortDirection::Desc),
                    None => (raw.as_str(), SortDirection::Asc),
                };
                let property = SortProperty::from_wire(name)
                    .ok_or_else(|| ApiError::InvalidQuery(format!("cannot order by {name:?}")))?;
                query.order_by(property, direction)
            }
            _ => {
                let (_, condition) = parse_lookup(&key);
                query.filter([(key.as_str(), raw_value(&raw, condition))])
            }
        };
    }
    Ok(query)
}

fn parse_count(key: &str, raw: &str) -> Result<usize> {
    raw.parse()
        .map_err(|_| ApiError::InvalidQuery(format!("{key} must be a non-negative integer, got {raw:?}")))
}

fn raw_value(raw: &str, condition: FilterCondition) -> Value {
    if condition == FilterCondition::In {
        return Value::Array(raw.split(',').map(|s| Value::String(s.to_string())).collect());
    }
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match raw.parse::<f64>() {
            Ok(n) if n.is_finite() => Value::from(n),
            _ => Value::String(raw.to_string()),
        },
    }
}

/// The objects of one type in a connected space.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    conn: &'a Connection,
    type_key: String,
}

impl<'a> Table<'a> {
    pub fn new(conn: &'a Connection, type_key: &str) -> Self {
        Self {
            conn,
            type_key: type_key.to_string(),
        }
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Create an object of this table's type.
    pub fn insert(&self, name: &str, properties: Vec<PropertyLink>) -> Result<ObjectWithBody> {
        let mut request = CreateObjectRequest::new(self.type_key.as_str()).name(name);
        if !properties.is_empty() {
            request = request.properties(properties);
        }
        self.conn.objects().insert(&request)
    }

    pub fn get(&self, id: &str) -> Result<ObjectWithBody> {
        self.conn.objects().get(id)
    }

    pub fn update(&self, id: &str, request: &UpdateObjectRequest) -> Result<ObjectWithBody> {
        self.conn.objects().update(id, request)
    }

    pub fn delete(&self, id: &str) -> Result<ObjectWithBody> {
        self.conn.objects().delete(id)
    }

    pub fn find<K, V>(&self, lookups: impl IntoIterator<Item = (K, V)>) -> Result<Vec<Object>>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.query().filter(lookups).all()
    }

    /// Run a query string against this table.
    pub fn execute(&self, query_string: &str) -> Result<Vec<Object>> {
        let query = parse_query_string(query_string)?.of_type(self.type_key.as_str());
        QueryBuilder::from_query(self.conn.client(), self.conn.space_id(), query).all()
    }

    pub fn query(&self) -> QueryBuilder<'a> {
        self.conn.query(&self.type_key)
    }
}
