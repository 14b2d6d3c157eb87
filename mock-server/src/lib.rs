//! In-memory stand-in for the local Anytype API, served under `/v1`.
//!
//! Everything outside `/v1/auth` requires `Authorization: Bearer <key>`
//! with either `SEED_API_KEY` or a key issued through the challenge flow.
//! Errors use the API's `{object: "error", status, code, message}` body.

mod search;
mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub use search::SearchBody;
pub use store::{Store, AUTH_CODE, SEED_API_KEY};

pub type Db = Arc<RwLock<Store>>;

pub const MAX_LIMIT: usize = 1000;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: format!("{what}_not_found"),
            message: format!("{what} not found"),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request".to_string(),
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            code: "unauthorized".to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "object": "error",
            "status": self.status.as_u16(),
            "code": self.code,
            "message": self.message,
        });
        (self.status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn app() -> Router {
    app_with_store(Store::default())
}

pub fn app_with_store(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));

    let protected = Router::new()
        .route("/spaces", get(list_spaces).post(create_space))
        .route("/spaces/{space_id}", get(get_space).patch(update_space))
        .route("/spaces/{space_id}/objects", get(list_objects).post(create_object))
        .route(
            "/spaces/{space_id}/objects/{object_id}",
            get(get_object).patch(update_object).delete(delete_object),
        )
        .route("/spaces/{space_id}/types", get(list_types).post(create_type))
        .route("/spaces/{space_id}/types/{type_id}", get(get_type))
        .route("/spaces/{space_id}/properties", get(list_properties).post(create_property))
        .route(
            "/spaces/{space_id}/properties/{property_id}/tags",
            get(list_tags).post(create_tag),
        )
        .route("/spaces/{space_id}/search", post(search_space))
        .route("/search", post(search_global))
        .route_layer(middleware::from_fn_with_state(db.clone(), require_api_key));

    let public = Router::new()
        .route("/auth/challenges", post(create_challenge))
        .route("/auth/api_keys", post(create_api_key));

    Router::new()
        .nest("/v1", protected.merge(public))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn require_api_key(State(db): State<Db>, request: Request, next: Next) -> Response {
    let key = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string);
    let authorized = match key {
        Some(key) => db.read().await.is_valid_key(&key),
        None => false,
    };
    if !authorized {
        return ApiError::unauthorized("missing or invalid api key").into_response();
    }
    next.run(request).await
}

#[derive(Debug, Deserialize)]
struct Window {
    #[serde(default)]
    offset: usize,
    #[serde(default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    100
}

impl Window {
    /// Slice `items` into a pagination envelope.
    fn page(&self, items: Vec<Value>) -> ApiResult<Json<Value>> {
        if self.limit > MAX_LIMIT {
            return Err(ApiError::validation(format!("limit must be at most {MAX_LIMIT}")));
        }
        let total = items.len();
        let data: Vec<Value> = items.into_iter().skip(self.offset).take(self.limit).collect();
        let has_more = self.offset + data.len() < total;
        Ok(Json(json!({
            "data": data,
            "pagination": {"offset": self.offset, "limit": self.limit, "total": total, "has_more": has_more},
        })))
    }
}

// Auth

#[derive(Deserialize)]
struct CreateChallenge {
    app_name: String,
}

async fn create_challenge(State(db): State<Db>, Json(input): Json<CreateChallenge>) -> (StatusCode, Json<Value>) {
    let challenge_id = db.write().await.create_challenge(input.app_name);
    (StatusCode::CREATED, Json(json!({"challenge_id": challenge_id})))
}

#[derive(Deserialize)]
struct CreateApiKey {
    challenge_id: String,
    code: String,
}

async fn create_api_key(
    State(db): State<Db>,
    Json(input): Json<CreateApiKey>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let api_key = db.write().await.redeem(&input.challenge_id, &input.code)?;
    Ok((StatusCode::CREATED, Json(json!({"api_key": api_key}))))
}

// Spaces

#[derive(Deserialize)]
struct CreateSpace {
    name: String,
    description: Option<String>,
}

#[derive(Deserialize)]
struct UpdateSpace {
    name: Option<String>,
    description: Option<String>,
}

async fn list_spaces(State(db): State<Db>, Query(window): Query<Window>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    window.page(store.spaces.clone())
}

async fn get_space(State(db): State<Db>, Path(space_id): Path<String>) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    Ok(Json(json!({"space": store.space(&space_id)?})))
}

async fn create_space(State(db): State<Db>, Json(input): Json<CreateSpace>) -> (StatusCode, Json<Value>) {
    let space = db.write().await.create_space(input.name, input.description);
    (StatusCode::CREATED, Json(json!({"space": space})))
}

async fn update_space(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<UpdateSpace>,
) -> ApiResult<Json<Value>> {
    let mut store = db.write().await;
    let space = store.space_mut(&space_id)?;
    if let Some(name) = input.name {
        space["name"] = json!(name);
    }
    if let Some(description) = input.description {
        space["description"] = json!(description);
    }
    Ok(Json(json!({"space": space})))
}

// Objects

#[derive(Deserialize)]
struct CreateObject {
    type_key: String,
    name: Option<String>,
    body: Option<String>,
    icon: Option<Value>,
    #[serde(default)]
    properties: Vec<Value>,
}

async fn list_objects(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Query(window): Query<Window>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.space(&space_id)?;
    let objects = store.live_objects(Some(space_id.as_str())).map(|o| o.summary()).collect();
    window.page(objects)
}

async fn get_object(
    State(db): State<Db>,
    Path((space_id, object_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    let record = store.object(&space_id, &object_id)?;
    Ok(Json(json!({"object": record.value})))
}

async fn create_object(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<CreateObject>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    store.space(&space_id)?;
    let object = store.create_object(
        &space_id,
        &input.type_key,
        input.name,
        input.body,
        input.icon,
        &input.properties,
    )?;
    Ok((StatusCode::CREATED, Json(json!({"object": object}))))
}

async fn update_object(
    State(db): State<Db>,
    Path((space_id, object_id)): Path<(String, String)>,
    Json(patch): Json<Map<String, Value>>,
) -> ApiResult<Json<Value>> {
    let object = db.write().await.update_object(&space_id, &object_id, &patch)?;
    Ok(Json(json!({"object": object})))
}

async fn delete_object(
    State(db): State<Db>,
    Path((space_id, object_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let object = db.write().await.archive_object(&space_id, &object_id)?;
    Ok(Json(json!({"object": object})))
}

// Types

#[derive(Deserialize)]
struct CreateType {
    name: String,
    plural_name: String,
    layout: String,
    key: Option<String>,
    #[serde(default)]
    properties: Vec<Value>,
}

async fn list_types(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Query(window): Query<Window>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.space(&space_id)?;
    window.page(store.types_in(&space_id))
}

async fn get_type(
    State(db): State<Db>,
    Path((space_id, type_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    Ok(Json(json!({"type": store.type_by_id(&space_id, &type_id)?})))
}

async fn create_type(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<CreateType>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    store.space(&space_id)?;
    let key = input
        .key
        .unwrap_or_else(|| input.name.to_lowercase().replace(' ', "_"));
    if store.type_by_key(&space_id, &key).is_some() {
        return Err(ApiError::validation(format!("type key {key:?} already exists")));
    }
    let ty = store.insert_type(&space_id, &key, &input.name, &input.plural_name, &input.layout, input.properties);
    Ok((StatusCode::CREATED, Json(json!({"type": ty}))))
}

// Properties and tags

#[derive(Deserialize)]
struct CreateTag {
    name: String,
    color: String,
    key: Option<String>,
}

#[derive(Deserialize)]
struct CreateProperty {
    name: String,
    format: String,
    key: Option<String>,
    #[serde(default)]
    tags: Vec<CreateTag>,
}

async fn list_properties(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Query(window): Query<Window>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.space(&space_id)?;
    window.page(store.properties_in(&space_id))
}

async fn create_property(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Json(input): Json<CreateProperty>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    store.space(&space_id)?;
    let property = store.insert_property(&space_id, &input.name, &input.format, input.key);
    let property_id = property["id"].as_str().unwrap_or_default().to_string();
    for tag in input.tags {
        store.insert_tag(&space_id, &property_id, &tag.name, &tag.color, tag.key);
    }
    Ok((StatusCode::CREATED, Json(json!({"property": property}))))
}

async fn list_tags(
    State(db): State<Db>,
    Path((space_id, property_id)): Path<(String, String)>,
    Query(window): Query<Window>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.property_by_id(&space_id, &property_id)?;
    window.page(store.tags_of(&space_id, &property_id))
}

async fn create_tag(
    State(db): State<Db>,
    Path((space_id, property_id)): Path<(String, String)>,
    Json(input): Json<CreateTag>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    store.property_by_id(&space_id, &property_id)?;
    let tag = store.insert_tag(&space_id, &property_id, &input.name, &input.color, input.key);
    Ok((StatusCode::CREATED, Json(json!({"tag": tag}))))
}

// Search

async fn search_space(
    State(db): State<Db>,
    Path(space_id): Path<String>,
    Query(window): Query<Window>,
    Json(body): Json<SearchBody>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    store.space(&space_id)?;
    window.page(search::search(store.live_objects(Some(space_id.as_str())), &body))
}

async fn search_global(
    State(db): State<Db>,
    Query(window): Query<Window>,
    Json(body): Json<SearchBody>,
) -> ApiResult<Json<Value>> {
    let store = db.read().await;
    window.page(search::search(store.live_objects(None), &body))
}
