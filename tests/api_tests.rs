use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use lectern::config::Config;
use tower::ServiceExt;

/// Default API key seeded by migration (must match m20260301_initial.rs)
const DEFAULT_API_KEY: &str = "lectern_default_api_key_please_regenerate";

fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    // A single connection keeps every query on the same in-memory database
    config.general.max_db_connections = 1;
    config.general.min_db_connections = 1;
    config
}

async fn spawn_app() -> Router {
    let state = lectern::api::create_app_state_from_config(test_config(), None)
        .await
        .expect("Failed to create app state");
    lectern::api::router(state).await
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

/// Registers a lecturer and returns (id, api_key).
async fn register_lecturer(app: &Router, email: &str) -> (i64, String) {
    let payload = serde_json::json!({
        "email": email,
        "full_name": "Test Lecturer",
        "password": "lecturer-pass-1",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["data"]["id"].as_i64().unwrap(),
        json["data"]["api_key"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_auth_endpoints() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/system/status")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/system/status", "wrong-key"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(get("/api/system/status", DEFAULT_API_KEY))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_registration_creates_single_lecturer_profile() {
    let app = spawn_app().await;

    let (id, api_key) = register_lecturer(&app, "ada@example.edu").await;
    assert!(id > 1);
    assert_eq!(api_key.len(), 64);

    // The new key authenticates, and the profile reports the lecturer role
    let response = app.clone().oneshot(get("/api/auth/me", &api_key)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "lecturer");
    assert_eq!(json["data"]["email"], "ada@example.edu");

    // Exactly one profile with that email exists
    let response = app
        .clone()
        .oneshot(get("/api/users", DEFAULT_API_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let matching: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["email"] == "ada@example.edu")
        .collect();
    assert_eq!(matching.len(), 1);
}

#[tokio::test]
async fn test_duplicate_registration_conflict() {
    let app = spawn_app().await;

    register_lecturer(&app, "dup@example.edu").await;

    let payload = serde_json::json!({
        "email": "dup@example.edu",
        "full_name": "Someone Else",
        "password": "another-pass-1",
    });

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&payload).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_flow() {
    let app = spawn_app().await;

    register_lecturer(&app, "login@example.edu").await;

    let good = serde_json::json!({
        "email": "login@example.edu",
        "password": "lecturer-pass-1",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&good).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bad = serde_json::json!({
        "email": "login@example.edu",
        "password": "wrong-password",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&bad).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password() {
    let app = spawn_app().await;

    let (_, api_key) = register_lecturer(&app, "rotate@example.edu").await;

    // Wrong current password
    let payload = serde_json::json!({
        "current_password": "not-the-password",
        "new_password": "brand-new-pass-2",
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/auth/password", &api_key, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // New password too short
    let payload = serde_json::json!({
        "current_password": "lecturer-pass-1",
        "new_password": "short",
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/auth/password", &api_key, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // New password identical to the current one
    let payload = serde_json::json!({
        "current_password": "lecturer-pass-1",
        "new_password": "lecturer-pass-1",
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/auth/password", &api_key, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let payload = serde_json::json!({
        "current_password": "lecturer-pass-1",
        "new_password": "brand-new-pass-2",
    });
    let response = app
        .clone()
        .oneshot(json_request("PUT", "/api/auth/password", &api_key, &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Only the new password logs in now
    let old_login = serde_json::json!({
        "email": "rotate@example.edu",
        "password": "lecturer-pass-1",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&old_login).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let new_login = serde_json::json!({
        "email": "rotate@example.edu",
        "password": "brand-new-pass-2",
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&new_login).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_api_key_regeneration_invalidates_old_key() {
    let app = spawn_app().await;

    let (_, old_key) = register_lecturer(&app, "rekey@example.edu").await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/api-key/regenerate")
                .header("X-Api-Key", old_key.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_key = json["data"]["api_key"].as_str().unwrap().to_string();
    assert_ne!(new_key, old_key);
    assert_eq!(new_key.len(), 64);

    // The old key no longer authenticates
    let response = app.clone().oneshot(get("/api/auth/me", &old_key)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(get("/api/auth/me", &new_key)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // GET returns the key currently on record
    let response = app
        .clone()
        .oneshot(get("/api/auth/api-key", &new_key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["api_key"], new_key);
}

#[tokio::test]
async fn test_course_crud() {
    let app = spawn_app().await;

    let new_course = serde_json::json!({
        "title": "Databases",
        "description": "Relational systems and SQL",
        "code": "CS305",
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", DEFAULT_API_KEY, &new_course))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let course_id = json["data"]["id"].as_i64().unwrap();
    assert_eq!(json["data"]["code"], "CS305");

    let response = app
        .clone()
        .oneshot(get(&format!("/api/courses/{course_id}"), DEFAULT_API_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let update = serde_json::json!({
        "title": "Advanced Databases",
        "description": "Relational systems, SQL, and query planning",
        "code": "CS305",
    });
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/courses/{course_id}"),
            DEFAULT_API_KEY,
            &update,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], "Advanced Databases");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/courses/{course_id}"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get(&format!("/api/courses/{course_id}"), DEFAULT_API_KEY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_course_code_conflict() {
    let app = spawn_app().await;

    let course = serde_json::json!({
        "title": "Networks",
        "code": "CS441",
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", DEFAULT_API_KEY, &course))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let clash = serde_json::json!({
        "title": "Computer Networks",
        "code": "CS441",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", DEFAULT_API_KEY, &clash))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_lecturer_cannot_manage_courses() {
    let app = spawn_app().await;

    let (_, lecturer_key) = register_lecturer(&app, "nocreate@example.edu").await;

    let course = serde_json::json!({
        "title": "Forbidden",
        "code": "NOPE101",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", &lecturer_key, &course))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Reading the catalog is still allowed
    let response = app
        .clone()
        .oneshot(get("/api/courses", &lecturer_key))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_assignment_lifecycle_and_duplicate_conflict() {
    let app = spawn_app().await;

    let (lecturer_id, lecturer_key) = register_lecturer(&app, "assigned@example.edu").await;

    let course = serde_json::json!({
        "title": "Compilers",
        "code": "CS520",
    });
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/courses", DEFAULT_API_KEY, &course))
        .await
        .unwrap();
    let course_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let assignment = serde_json::json!({
        "course_id": course_id,
        "lecturer_id": lecturer_id,
    });

    // Lecturers cannot assign
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/assignments", &lecturer_key, &assignment))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/assignments", DEFAULT_API_KEY, &assignment))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let assignment_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Same (course, lecturer) pair again is a conflict
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/assignments", DEFAULT_API_KEY, &assignment))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The lecturer sees their own assignment
    let response = app
        .clone()
        .oneshot(get("/api/assignments", &lecturer_key))
        .await
        .unwrap();
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/assignments/{assignment_id}"))
                .header("X-Api-Key", DEFAULT_API_KEY)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_role_change_and_self_demotion_guard() {
    let app = spawn_app().await;

    let (lecturer_id, _) = register_lecturer(&app, "promote@example.edu").await;

    let promote = serde_json::json!({ "role": "admin" });
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/users/{lecturer_id}/role"),
            DEFAULT_API_KEY,
            &promote,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "admin");

    // The seeded admin (id 1) cannot demote themselves
    let demote = serde_json::json!({ "role": "lecturer" });
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/users/1/role",
            DEFAULT_API_KEY,
            &demote,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
