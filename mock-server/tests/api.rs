use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, AUTH_CODE, SEED_API_KEY};
use serde_json::{json, Value};
use tower::{Service, ServiceExt};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: Option<Value>) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Bearer {SEED_API_KEY}"))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.map(|b| b.to_string()).unwrap_or_default())
        .unwrap()
}

/// Send one request through a long-lived service so state carries over.
async fn call(app: &mut Router, req: Request<String>) -> (StatusCode, Value) {
    let resp = ServiceExt::<Request<String>>::ready(app).await.unwrap().call(req).await.unwrap();
    let status = resp.status();
    (status, body_json(resp).await)
}

async fn new_space(app: &mut Router) -> String {
    let (status, body) = call(app, request("POST", "/v1/spaces", Some(json!({"name": "Work"})))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["space"]["id"].as_str().unwrap().to_string()
}

// --- auth ---

#[tokio::test]
async fn missing_key_is_rejected_with_error_body() {
    let resp = app()
        .oneshot(Request::builder().uri("/v1/spaces").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(&body_bytes(resp).await).unwrap();
    assert_eq!(body["object"], "error");
    assert_eq!(body["status"], 401);
    assert_eq!(body["code"], "unauthorized");
}

#[tokio::test]
async fn challenge_flow_issues_a_working_key() {
    let mut app = app();

    let (status, body) = call(
        &mut app,
        request("POST", "/v1/auth/challenges", Some(json!({"app_name": "tests"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let challenge_id = body["challenge_id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &mut app,
        request("POST", "/v1/auth/api_keys", Some(json!({"challenge_id": challenge_id, "code": "0000"}))),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        &mut app,
        request("POST", "/v1/auth/api_keys", Some(json!({"challenge_id": challenge_id, "code": AUTH_CODE}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let key = body["api_key"].as_str().unwrap();

    let req = Request::builder()
        .uri("/v1/spaces")
        .header(http::header::AUTHORIZATION, format!("Bearer {key}"))
        .body(String::new())
        .unwrap();
    let (status, body) = call(&mut app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 0);
}

// --- spaces ---

#[tokio::test]
async fn unknown_space_is_not_found() {
    let resp = app().oneshot(request("GET", "/v1/spaces/nope", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "space_not_found");
    assert_eq!(body["message"], "space not found");
}

#[tokio::test]
async fn space_patch_keeps_other_fields() {
    let mut app = app();
    let space_id = new_space(&mut app).await;

    let (status, body) = call(
        &mut app,
        request("PATCH", &format!("/v1/spaces/{space_id}"), Some(json!({"description": "team"}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["space"]["name"], "Work");
    assert_eq!(body["space"]["description"], "team");
}

// --- objects ---

#[tokio::test]
async fn object_lifecycle() {
    let mut app = app();
    let space_id = new_space(&mut app).await;
    let objects = format!("/v1/spaces/{space_id}/objects");

    let (status, body) = call(
        &mut app,
        request(
            "POST",
            &objects,
            Some(json!({
                "type_key": "task",
                "name": "Walk dog",
                "body": "# Walk",
                "properties": [{"key": "done", "checkbox": false}]
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let object = &body["object"];
    assert_eq!(object["type"]["key"], "task");
    assert_eq!(object["layout"], "action");
    assert_eq!(object["markdown"], "# Walk");
    assert_eq!(object["properties"][0], json!({
        "object": "property", "id": "prop-done", "key": "done", "name": "done", "format": "checkbox", "checkbox": false
    }));
    let id = object["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &mut app,
        request("PATCH", &format!("{objects}/{id}"), Some(json!({"properties": [{"key": "done", "checkbox": true}]}))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"]["name"], "Walk dog");
    assert_eq!(body["object"]["properties"][0]["checkbox"], true);

    let (_, body) = call(&mut app, request("GET", &objects, None)).await;
    assert_eq!(body["pagination"]["total"], 1);
    assert!(body["data"][0].get("markdown").is_none());

    let (status, body) = call(&mut app, request("DELETE", &format!("{objects}/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"]["archived"], true);

    let (_, body) = call(&mut app, request("GET", &objects, None)).await;
    assert_eq!(body["pagination"]["total"], 0);

    let (status, body) = call(&mut app, request("GET", &format!("{objects}/{id}"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["object"]["archived"], true);
}

#[tokio::test]
async fn oversized_limit_is_a_validation_error() {
    let mut app = app();
    let space_id = new_space(&mut app).await;
    let (status, body) = call(
        &mut app,
        request("GET", &format!("/v1/spaces/{space_id}/objects?limit=5000"), None),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "bad_request");
}

#[tokio::test]
async fn unknown_type_key_is_rejected() {
    let mut app = app();
    let space_id = new_space(&mut app).await;
    let (status, _) = call(
        &mut app,
        request("POST", &format!("/v1/spaces/{space_id}/objects"), Some(json!({"type_key": "nope"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// --- properties and tags ---

#[tokio::test]
async fn property_seed_tags_are_listed() {
    let mut app = app();
    let space_id = new_space(&mut app).await;

    let (status, body) = call(
        &mut app,
        request(
            "POST",
            &format!("/v1/spaces/{space_id}/properties"),
            Some(json!({"name": "Status", "format": "select", "tags": [{"name": "Done", "color": "lime"}]})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["property"]["key"], "status");
    let property_id = body["property"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &mut app,
        request("GET", &format!("/v1/spaces/{space_id}/properties/{property_id}/tags"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Done");
    assert_eq!(body["data"][0]["color"], "lime");
}

// --- search ---

#[tokio::test]
async fn search_filters_by_type_and_condition() {
    let mut app = app();
    let space_id = new_space(&mut app).await;
    let objects = format!("/v1/spaces/{space_id}/objects");
    for (type_key, name, pages) in [("page", "Alpha", 3.0), ("page", "Beta", 30.0), ("task", "Gamma", 300.0)] {
        let body = json!({"type_key": type_key, "name": name, "properties": [{"key": "pages", "number": pages}]});
        let (status, _) = call(&mut app, request("POST", &objects, Some(body))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let search = json!({
        "types": ["page"],
        "filters": {"operator": "and", "conditions": [{"property_key": "pages", "condition": "gt", "number": 10.0}]},
    });
    let (status, body) = call(
        &mut app,
        request("POST", &format!("/v1/spaces/{space_id}/search?offset=0&limit=10"), Some(search)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["name"], "Beta");

    let sorted = json!({"sort": {"property_key": "name", "direction": "desc"}});
    let (_, body) = call(&mut app, request("POST", "/v1/search?limit=2", Some(sorted))).await;
    let names: Vec<&str> = body["data"].as_array().unwrap().iter().map(|o| o["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Gamma", "Beta"]);
    assert_eq!(body["pagination"]["total"], 3);
    assert_eq!(body["pagination"]["has_more"], true);
}
