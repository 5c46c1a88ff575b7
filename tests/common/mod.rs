#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use recipebox::{app::build_app, state::AppState};

pub fn test_app() -> Router {
    build_app(AppState::in_memory())
}

/// App plus a handle on its state, for tests that seed the store directly.
pub fn test_app_with_state() -> (Router, AppState) {
    let state = AppState::in_memory();
    (build_app(state.clone()), state)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a user and returns `(token, user)`.
pub async fn register(app: &Router, name: &str, email: &str, password: &str) -> (String, Value) {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    (
        body["token"].as_str().expect("token in response").to_string(),
        body["user"].clone(),
    )
}

pub async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send_json(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Creates a recipe and returns its JSON representation.
pub async fn create_recipe(app: &Router, token: &str, body: Value) -> Value {
    let (status, recipe) = send_json(app, "POST", "/api/recipes", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create recipe failed: {recipe}");
    recipe
}
