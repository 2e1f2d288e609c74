//! Ownership scoping for generated content, plus generation failure modes
//! that never reach the inference provider.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use lectern::SharedState;
use lectern::config::Config;
use lectern::db::Store;
use lectern::models::{ContentType, Role};
use std::sync::Arc;
use tower::ServiceExt;

const DEFAULT_API_KEY: &str = "lectern_default_api_key_please_regenerate";

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    // Unroutable endpoint and no key: generation must fail without output
    config.inference.api_url = "http://192.0.2.1/v1/chat/completions".to_string();
    config.inference.api_key = String::new();
    config.inference.request_timeout_seconds = 1;
    config
}

/// App plus a handle on its store for seeding rows directly.
async fn spawn_app_with_store() -> (Router, Store) {
    let shared = Arc::new(
        SharedState::new(test_config())
            .await
            .expect("Failed to create shared state"),
    );
    let store = shared.store.clone();
    let state = lectern::api::create_app_state(shared, None);
    (lectern::api::router(state).await, store)
}

fn get(uri: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-Api-Key", api_key)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, api_key: &str, body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("X-Api-Key", api_key)
        .header("Content-Type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_lecturer_sees_only_own_content() {
    let (app, store) = spawn_app_with_store().await;

    let alice = store
        .create_profile("alice@example.edu", "Alice", Role::Lecturer, "password-a1", None)
        .await
        .unwrap();
    let bob = store
        .create_profile("bob@example.edu", "Bob", Role::Lecturer, "password-b1", None)
        .await
        .unwrap();

    let course = store
        .create_course("Databases", None, "CS305", 1)
        .await
        .unwrap();

    let record = store
        .insert_content(
            course.id,
            alice.id,
            ContentType::Lesson,
            "CS305: Lesson Plan - joins",
            "Lesson body",
            "prompt",
        )
        .await
        .unwrap();

    // Owner reads their artifact in full
    let response = app
        .clone()
        .oneshot(get(&format!("/api/content/{}", record.id), &alice.api_key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["body"], "Lesson body");

    // Another lecturer gets 404, not 403: the row's existence is hidden
    let response = app
        .clone()
        .oneshot(get(&format!("/api/content/{}", record.id), &bob.api_key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Admins read everything
    let response = app
        .clone()
        .oneshot(get(&format!("/api/content/{}", record.id), DEFAULT_API_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Listings are scoped the same way
    let response = app
        .clone()
        .oneshot(get("/api/content", &alice.api_key))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(get("/api/content", &bob.api_key))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_content_list_filters() {
    let (app, store) = spawn_app_with_store().await;

    let course_a = store
        .create_course("Networks", None, "CS441", 1)
        .await
        .unwrap();
    let course_b = store
        .create_course("Compilers", None, "CS520", 1)
        .await
        .unwrap();

    store
        .insert_content(course_a.id, 1, ContentType::Quiz, "Quiz 1", "q", "p")
        .await
        .unwrap();
    store
        .insert_content(course_b.id, 1, ContentType::Notes, "Notes 1", "n", "p")
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get(
            &format!("/api/content?course_id={}", course_a.id),
            DEFAULT_API_KEY,
        ))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["content_type"], "quiz");

    let response = app
        .clone()
        .oneshot(get("/api/content?content_type=notes", DEFAULT_API_KEY))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["data"][0]["title"], "Notes 1");

    // Listing omits bodies
    assert!(json["data"][0].get("body").is_none());
}

#[tokio::test]
async fn test_unassigned_lecturer_cannot_generate() {
    let (app, store) = spawn_app_with_store().await;

    let lecturer = store
        .create_profile("outsider@example.edu", "Outsider", Role::Lecturer, "password-o1", None)
        .await
        .unwrap();
    let course = store
        .create_course("Databases", None, "CS305", 1)
        .await
        .unwrap();

    let payload = serde_json::json!({
        "course_id": course.id,
        "content_type": "lesson",
        "topic": "joins",
    });

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/content/generate",
            &lecturer.api_key,
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Nothing was stored
    let response = app
        .clone()
        .oneshot(get("/api/content", DEFAULT_API_KEY))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_generation_without_api_key_fails_cleanly() {
    let (app, store) = spawn_app_with_store().await;

    let course = store
        .create_course("Databases", None, "CS305", 1)
        .await
        .unwrap();

    // Admin bypasses the assignment check, so the call reaches the client,
    // which rejects the missing key before any request goes out
    let payload = serde_json::json!({
        "course_id": course.id,
        "content_type": "lesson",
        "topic": "joins",
    });

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/content/generate",
            DEFAULT_API_KEY,
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    // No partial artifact was persisted
    let response = app
        .clone()
        .oneshot(get("/api/content", DEFAULT_API_KEY))
        .await
        .unwrap();
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 0);

    // An unknown course is reported before touching the provider
    let payload = serde_json::json!({
        "course_id": 9999,
        "content_type": "quiz",
        "topic": "joins",
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/content/generate",
            DEFAULT_API_KEY,
            &payload,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
