#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tasktrack_api::{router, AppState};
use tasktrack_core::{open_db_in_memory, SessionService};
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";
pub const PASSWORD: &str = "password123";

pub fn sessions() -> SessionService {
    SessionService::new(SECRET, 24)
}

pub fn app() -> Router {
    let conn = open_db_in_memory().unwrap();
    router(AppState::new(conn, sessions()))
}

pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let response = send_raw(app, method, uri, token, body).await;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Posts `text` verbatim as a JSON body.
pub async fn send_text(app: &Router, uri: &str, text: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(text.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn register(app: &Router, name: &str, email: &str, role: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": PASSWORD, "role": role})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["employee_id"].as_i64().unwrap()
}

pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({"email": email, "password": PASSWORD})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

/// Employee A (id 1), manager M (id 2) and employee B (id 3), logged in.
pub struct Staff {
    pub alice: String,
    pub manager: String,
    pub bob: String,
}

pub async fn staff(app: &Router) -> Staff {
    assert_eq!(register(app, "Alice", "alice@example.com", "Employee").await, 1);
    assert_eq!(register(app, "Mona", "mona@example.com", "Manager").await, 2);
    assert_eq!(register(app, "Bob", "bob@example.com", "Employee").await, 3);
    Staff {
        alice: login(app, "alice@example.com").await,
        manager: login(app, "mona@example.com").await,
        bob: login(app, "bob@example.com").await,
    }
}

pub async fn create_task(app: &Router, manager: &str, body: Value) -> i64 {
    let (status, body) = send(app, Method::POST, "/tasks", Some(manager), Some(body)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Task created successfully");
    body["task_id"].as_i64().unwrap()
}
