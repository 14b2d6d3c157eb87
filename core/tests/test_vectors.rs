//! Verify request building and response parsing against JSON test vectors
//! stored in `test-vectors/`.
//!
//! Each request vector names an operation, its input, the request that
//! operation must produce, a canned response, and JSON pointers into the
//! parsed result. Bodies are compared as parsed JSON, not raw strings.

use std::sync::{Arc, Mutex};

use anytype_core::models::{Color, CreateObjectRequest, PropertyLink};
use anytype_core::{
    AnytypeClient, ApiError, ClientConfig, HttpMethod, HttpRequest, HttpResponse, ListParams, Result, Transport,
};
use serde_json::Value;

/// Answers every request with one canned response and keeps what it saw.
#[derive(Clone)]
struct Replay {
    response: HttpResponse,
    seen: Arc<Mutex<Vec<HttpRequest>>>,
}

impl Transport for Replay {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.seen.lock().unwrap().push(request);
        Ok(self.response.clone())
    }
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn str_of<'a>(input: &'a Value, key: &str) -> &'a str {
    input[key].as_str().unwrap_or_else(|| panic!("missing string input {key}"))
}

/// Run a named operation and return its result as JSON.
fn run(client: &AnytypeClient, operation: &str, input: &Value) -> Value {
    let space_id = input["space_id"].as_str().unwrap_or_default();
    match operation {
        "spaces.create" => {
            let space = client
                .spaces()
                .create(str_of(input, "name"), input["description"].as_str())
                .unwrap();
            serde_json::to_value(space).unwrap()
        }
        "objects.list" => {
            let params = ListParams::new(
                input["offset"].as_u64().unwrap() as usize,
                input["limit"].as_u64().unwrap() as usize,
            );
            serde_json::to_value(client.objects().list(space_id, &params).unwrap()).unwrap()
        }
        "objects.get" => {
            serde_json::to_value(client.objects().get(space_id, str_of(input, "object_id")).unwrap()).unwrap()
        }
        "objects.create" => {
            let properties: Vec<PropertyLink> = serde_json::from_value(input["properties"].clone()).unwrap();
            let request = CreateObjectRequest::new(str_of(input, "type_key"))
                .name(str_of(input, "name"))
                .body(str_of(input, "body"))
                .properties(properties);
            serde_json::to_value(client.objects().create(space_id, &request).unwrap()).unwrap()
        }
        "objects.delete" => {
            serde_json::to_value(client.objects().delete(space_id, str_of(input, "object_id")).unwrap()).unwrap()
        }
        "query.all" => {
            let lookups: Vec<(String, Value)> = serde_json::from_value(input["lookups"].clone()).unwrap();
            let objects = client
                .query(space_id)
                .of_type(str_of(input, "type_key"))
                .filter(lookups)
                .limit(input["limit"].as_u64().unwrap() as usize)
                .all()
                .unwrap();
            serde_json::to_value(objects).unwrap()
        }
        "tags.create" => {
            let color: Color = serde_json::from_value(input["color"].clone()).unwrap();
            let tag = client
                .tags()
                .create(space_id, str_of(input, "property_id"), str_of(input, "name"), color, None)
                .unwrap();
            serde_json::to_value(tag).unwrap()
        }
        "auth.create_challenge" => {
            let challenge = client.auth().create_challenge(str_of(input, "app_name")).unwrap();
            serde_json::json!({ "challenge_id": challenge.challenge_id })
        }
        "lists.add_objects" => {
            let ids: Vec<String> = serde_json::from_value(input["object_ids"].clone()).unwrap();
            let message = client.lists().add_objects(space_id, str_of(input, "list_id"), &ids).unwrap();
            Value::String(message)
        }
        other => panic!("unknown operation: {other}"),
    }
}

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let api_key = vectors["api_key"].as_str().unwrap();
    let api_version = vectors["api_version"].as_str().unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = &case["response"];
        let replay = Replay {
            response: HttpResponse::new(
                response["status"].as_u64().unwrap() as u16,
                response["body"].to_string(),
            ),
            seen: Arc::default(),
        };
        let config = ClientConfig::new(api_key).with_base_url(base_url);
        let client = AnytypeClient::with_transport(config, replay.clone());

        let result = run(&client, case["operation"].as_str().unwrap(), &case["input"]);

        let seen = replay.seen.lock().unwrap();
        assert_eq!(seen.len(), 1, "{name}: exactly one round-trip");
        let req = &seen[0];
        let expected = &case["expected_request"];

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.url, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: url");
        let expected_query: Vec<(String, String)> = serde_json::from_value(expected["query"].clone()).unwrap();
        assert_eq!(req.query, expected_query, "{name}: query");
        assert_eq!(req.header("Authorization"), Some(format!("Bearer {api_key}").as_str()), "{name}: auth");
        assert_eq!(req.header("Anytype-Version"), Some(api_version), "{name}: version");

        match req.body.as_deref() {
            Some(body) => {
                let body: Value = serde_json::from_str(body).unwrap();
                assert_eq!(body, expected["body"], "{name}: body");
            }
            None => assert!(expected["body"].is_null(), "{name}: expected a body"),
        }

        for (pointer, value) in case["expected_result"].as_object().unwrap() {
            assert_eq!(result.pointer(pointer), Some(value), "{name}: result at {pointer:?}");
        }
    }
}

fn variant(err: &ApiError) -> &'static str {
    match err {
        ApiError::Validation(_) => "Validation",
        ApiError::Unauthorized(_) => "Unauthorized",
        ApiError::Forbidden(_) => "Forbidden",
        ApiError::NotFound(_) => "NotFound",
        ApiError::Gone(_) => "Gone",
        ApiError::RateLimited(_) => "RateLimited",
        ApiError::Api(_) => "Api",
        _ => "other",
    }
}

#[test]
fn error_vectors() {
    let raw = include_str!("../../test-vectors/errors.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let client = AnytypeClient::with_transport(
        ClientConfig::default(),
        Replay {
            response: HttpResponse::new(200, "{}"),
            seen: Arc::default(),
        },
    );

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let status = case["status"].as_u64().unwrap() as u16;
        let response = HttpResponse::new(status, case["body"].as_str().unwrap());
        let expected = &case["expected"];

        let err = client.parse::<Value>(response).unwrap_err();
        assert_eq!(variant(&err), expected["variant"].as_str().unwrap(), "{name}: variant");
        assert_eq!(err.status(), Some(status), "{name}: status");
        assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");
        assert_eq!(err.code(), expected["code"].as_str(), "{name}: code");
    }
}
