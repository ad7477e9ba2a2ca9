mod common;

use axum::http::{Method, StatusCode};
use common::{app, create_task, get, send, send_text, staff};
use serde_json::json;

#[tokio::test]
async fn malformed_body_fields_render_as_detail() {
    let app = app();
    let staff = staff(&app).await;
    create_task(
        &app,
        &staff.manager,
        json!({"title": "A1", "description": "", "assigned_to": 1}),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/tasks/1/time-log",
        Some(staff.alice.as_str()),
        Some(json!({"hours": "lots"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("hours"), "{body}");
}

#[tokio::test]
async fn task_and_project_descriptions_are_required() {
    let app = app();
    let staff = staff(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/tasks",
        Some(staff.manager.as_str()),
        Some(json!({"title": "A1", "assigned_to": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("description"), "{body}");

    let (status, body) = send(
        &app,
        Method::POST,
        "/projects",
        Some(staff.manager.as_str()),
        Some(json!({"name": "Apollo"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("description"), "{body}");
}

#[tokio::test]
async fn non_numeric_path_ids_render_as_detail() {
    let app = app();
    let staff = staff(&app).await;

    for uri in ["/tasks/abc", "/projects/abc", "/employees/abc"] {
        let (status, body) = get(&app, uri, &staff.manager).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert!(body["detail"].is_string(), "{uri}: {body}");
    }
}

#[tokio::test]
async fn unparseable_json_renders_as_detail() {
    let app = app();
    let (status, body) = send_text(&app, "/auth/login", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string(), "{body}");
}
