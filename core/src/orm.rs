//! Typed models over objects of a given type.
//!
//! A `Model` maps an `Object` to a Rust struct and back to property links.
//! A `Session` queues new models and creates them on `commit`; reads and
//! queries go straight to the API through the canonical `QueryBuilder`.

use std::collections::VecDeque;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::db::{Connection, Database};
use crate::error::Result;
use crate::models::{CreateObjectRequest, Object, ObjectWithBody, PropertyLink, SortDirection, SortProperty};
use crate::query::QueryBuilder;

pub trait Model: Sized {
    /// Key of the Anytype type this model maps to.
    const TYPE_KEY: &'static str;

    fn from_object(object: &Object) -> Self;

    /// Object name, sent separately from the properties.
    fn name(&self) -> Option<&str>;

    fn to_properties(&self) -> Vec<PropertyLink>;

    fn to_create_request(&self) -> CreateObjectRequest {
        let mut request = CreateObjectRequest::new(Self::TYPE_KEY);
        if let Some(name) = self.name() {
            request = request.name(name);
        }
        let properties = self.to_properties();
        if !properties.is_empty() {
            request = request.properties(properties);
        }
        request
    }
}

fn text(object: &Object, key: &str) -> Option<String> {
    object.property(key).and_then(|p| p.as_text()).map(str::to_string)
}

fn push_text(links: &mut Vec<PropertyLink>, key: &str, value: &Option<String>) {
    if let Some(value) = value {
        links.push(PropertyLink::text(key, value.as_str()));
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub id: Option<String>,
    pub space_id: Option<String>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    /// Tag ids of the `tags` multi-select property.
    pub tags: Vec<String>,
}

impl Model for Page {
    const TYPE_KEY: &'static str = "page";

    fn from_object(object: &Object) -> Self {
        let tags = object
            .property("tags")
            .and_then(|p| p.as_multi_select())
            .map(|tags| tags.iter().map(|t| t.id.clone()).collect())
            .unwrap_or_default();
        Self {
            id: Some(object.id.clone()),
            space_id: Some(object.space_id.clone()),
            name: object.name.clone(),
            content: text(object, "content"),
            author: text(object, "author"),
            tags,
        }
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_properties(&self) -> Vec<PropertyLink> {
        let mut links = Vec::new();
        push_text(&mut links, "content", &self.content);
        push_text(&mut links, "author", &self.author);
        if !self.tags.is_empty() {
            links.push(PropertyLink::multi_select("tags", self.tags.clone()));
        }
        links
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Task {
    pub id: Option<String>,
    pub space_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: bool,
}

impl Model for Task {
    const TYPE_KEY: &'static str = "task";

    fn from_object(object: &Object) -> Self {
        let due_date = object
            .property("due_date")
            .and_then(|p| p.as_date())
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
            .map(|d| d.with_timezone(&Utc));
        Self {
            id: Some(object.id.clone()),
            space_id: Some(object.space_id.clone()),
            name: object.name.clone(),
            description: text(object, "description"),
            status: text(object, "status"),
            priority: text(object, "priority"),
            due_date,
            completed: object
                .property("completed")
                .and_then(|p| p.as_checkbox())
                .unwrap_or(false),
        }
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn to_properties(&self) -> Vec<PropertyLink> {
        let mut links = Vec::new();
        push_text(&mut links, "description", &self.description);
        push_text(&mut links, "status", &self.status);
        push_text(&mut links, "priority", &self.priority);
        if let Some(due) = self.due_date {
            links.push(PropertyLink::date("due_date", due.to_rfc3339()));
        }
        links.push(PropertyLink::checkbox("completed", self.completed));
        links
    }
}

/// Unit of work over one space.
#[derive(Debug)]
pub struct Session {
    conn: Connection,
    pending: VecDeque<CreateObjectRequest>,
    committed: Vec<ObjectWithBody>,
}

impl Session {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            pending: VecDeque::new(),
            committed: Vec::new(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Queue a model for creation on the next `commit`.
    pub fn add<M: Model>(&mut self, model: &M) {
        self.pending.push_back(model.to_create_request());
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Fetch an object as `M`; `None` if it belongs to another type.
    pub fn get<M: Model>(&self, id: &str) -> Result<Option<M>> {
        let object = self.conn.objects().get(id)?;
        if object.type_key() == Some(M::TYPE_KEY) {
            Ok(Some(M::from_object(&object)))
        } else {
            Ok(None)
        }
    }

    pub fn query<M: Model>(&self) -> ModelQuery<'_, M> {
        ModelQuery {
            builder: self.conn.query(M::TYPE_KEY),
            model: PhantomData,
        }
    }

    /// Create every queued model in insertion order.
    ///
    /// Stops at the first failure; the failed model and those after it
    /// stay queued. Objects created before the failure are still
    /// available from [`Session::committed`].
    pub fn commit(&mut self) -> Result<Vec<ObjectWithBody>> {
        self.committed.clear();
        while let Some(request) = self.pending.front() {
            let object = self.conn.objects().insert(request)?;
            self.committed.push(object);
            self.pending.pop_front();
        }
        Ok(self.committed.clone())
    }

    /// Objects created by the most recent `commit`, including one that failed
    /// part way.
    pub fn committed(&self) -> &[ObjectWithBody] {
        &self.committed
    }

    /// Drop every queued model.
    pub fn rollback(&mut self) {
        self.pending.clear();
    }
}

impl Database {
    pub fn session(&self, space_id: &str) -> Session {
        Session::new(self.connect(space_id))
    }
}

/// `QueryBuilder` that yields models instead of objects.
#[derive(Debug, Clone)]
pub struct ModelQuery<'a, M> {
    builder: QueryBuilder<'a>,
    model: PhantomData<M>,
}

impl<'a, M: Model> ModelQuery<'a, M> {
    pub fn filter<K, V>(mut self, lookups: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.builder = self.builder.filter(lookups);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.builder = self.builder.limit(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.builder = self.builder.offset(offset);
        self
    }

    pub fn order_by(mut self, property_key: SortProperty, direction: SortDirection) -> Self {
        self.builder = self.builder.order_by(property_key, direction);
        self
    }

    pub fn all(&self) -> Result<Vec<M>> {
        Ok(self.builder.all()?.iter().map(M::from_object).collect())
    }

    pub fn first(&self) -> Result<Option<M>> {
        Ok(self.builder.first()?.as_ref().map(M::from_object))
    }

    pub fn count(&self) -> Result<usize> {
        self.builder.count()
    }
}
