use std::cmp::Ordering;

use serde::Deserialize;
use serde_json::Value;

use crate::store::{ObjectRecord, FORMATS};

#[derive(Debug, Default, Deserialize)]
pub struct SearchBody {
    pub query: Option<String>,
    pub types: Option<Vec<String>>,
    pub filters: Option<Value>,
    pub sort: Option<SortBody>,
}

#[derive(Debug, Deserialize)]
pub struct SortBody {
    pub property_key: String,
    #[serde(default = "ascending")]
    pub direction: String,
}

fn ascending() -> String {
    "asc".to_string()
}

/// Matching objects in result order. Without a sort, insertion order.
pub fn search<'a>(records: impl Iterator<Item = &'a ObjectRecord>, body: &SearchBody) -> Vec<Value> {
    let text = body.query.as_deref().map(str::to_lowercase).filter(|q| !q.is_empty());
    let mut hits: Vec<&ObjectRecord> = records
        .filter(|r| match &body.types {
            Some(types) if !types.is_empty() => types.iter().any(|t| r.value["type"]["key"] == t.as_str()),
            _ => true,
        })
        .filter(|r| text.as_deref().map_or(true, |q| mentions(&r.value, q)))
        .filter(|r| body.filters.as_ref().map_or(true, |f| expression_matches(&r.value, f)))
        .collect();

    if let Some(sort) = &body.sort {
        match sort.property_key.as_str() {
            "name" => hits.sort_by(|a, b| compare_names(&a.value, &b.value)),
            "created_date" => hits.sort_by_key(|r| r.created),
            _ => hits.sort_by_key(|r| r.modified),
        }
        if sort.direction == "desc" {
            hits.reverse();
        }
    }
    hits.into_iter().map(ObjectRecord::summary).collect()
}

fn mentions(object: &Value, needle: &str) -> bool {
    ["name", "markdown"]
        .iter()
        .filter_map(|field| object[*field].as_str())
        .any(|s| s.to_lowercase().contains(needle))
}

fn compare_names(a: &Value, b: &Value) -> Ordering {
    match (a["name"].as_str(), b["name"].as_str()) {
        (Some(a), Some(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Evaluate `{operator, conditions, filters}` against an object.
pub fn expression_matches(object: &Value, expression: &Value) -> bool {
    let empty = Vec::new();
    let conditions = expression["conditions"].as_array().unwrap_or(&empty);
    let nested = expression["filters"].as_array().unwrap_or(&empty);
    let mut results = conditions
        .iter()
        .map(|c| condition_matches(object, c))
        .chain(nested.iter().map(|f| expression_matches(object, f)));
    match expression["operator"].as_str() {
        Some("or") if !(conditions.is_empty() && nested.is_empty()) => results.any(|m| m),
        _ => results.all(|m| m),
    }
}

fn condition_matches(object: &Value, condition: &Value) -> bool {
    let key = condition["property_key"].as_str().unwrap_or_default();
    let actual = actual_value(object, key);
    let expected = FORMATS.iter().find_map(|f| condition.get(*f));

    match (condition["condition"].as_str().unwrap_or("eq"), expected) {
        ("empty", _) => is_blank(&actual),
        ("nempty", _) => !is_blank(&actual),
        (_, None) => false,
        ("eq", Some(expected)) => equals(&actual, expected),
        ("ne", Some(expected)) => !equals(&actual, expected),
        ("gt", Some(expected)) => ordering(&actual, expected) == Some(Ordering::Greater),
        ("gte", Some(expected)) => matches!(ordering(&actual, expected), Some(Ordering::Greater | Ordering::Equal)),
        ("lt", Some(expected)) => ordering(&actual, expected) == Some(Ordering::Less),
        ("lte", Some(expected)) => matches!(ordering(&actual, expected), Some(Ordering::Less | Ordering::Equal)),
        ("contains", Some(expected)) => contains(&actual, expected),
        ("ncontains", Some(expected)) => !contains(&actual, expected),
        ("in", Some(expected)) => intersects(&actual, expected),
        ("nin", Some(expected)) => !intersects(&actual, expected),
        ("all", Some(expected)) => as_list(expected).iter().all(|e| as_list(&actual).contains(e)),
        _ => false,
    }
}

/// Comparable value of a property: tag ids for select formats.
fn actual_value(object: &Value, key: &str) -> Value {
    if key == "name" {
        return object["name"].clone();
    }
    let Some(property) = object["properties"]
        .as_array()
        .and_then(|ps| ps.iter().find(|p| p["key"] == key))
    else {
        return Value::Null;
    };
    let format = property["format"].as_str().unwrap_or_default();
    let value = &property[format];
    match format {
        "select" => value["id"].clone(),
        "multi_select" => Value::Array(
            value
                .as_array()
                .map(|tags| tags.iter().map(|t| t["id"].clone()).collect())
                .unwrap_or_default(),
        ),
        _ => value.clone(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn equals(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        // An unset checkbox reads as unchecked.
        (Value::Null, Value::Bool(b)) => !b,
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => actual == expected,
    }
}

fn ordering(actual: &Value, expected: &Value) -> Option<Ordering> {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn contains(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::String(a), Value::String(b)) => a.to_lowercase().contains(&b.to_lowercase()),
        (Value::Array(items), _) => as_list(expected).iter().all(|e| items.contains(e)),
        _ => false,
    }
}

fn intersects(actual: &Value, expected: &Value) -> bool {
    let expected = as_list(expected);
    as_list(actual).iter().any(|a| expected.contains(a))
}

fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}
