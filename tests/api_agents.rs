mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn test_create_and_get_agent() {
    let app = spawn_app().await;

    let created = app.create_agent("Tutor", "You are a patient tutor").await;
    assert_eq!(created["name"], "Tutor");
    assert_eq!(created["prompt"], "You are a patient tutor");
    assert!(created["created_at"].is_string());
    assert!(created["updated_at"].is_string());

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = app.get(&format!("/agent/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_list_agents_paginates_in_id_order() {
    let app = spawn_app().await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let agent = app.create_agent(&format!("Agent {i}"), "prompt").await;
        ids.push(agent["id"].as_str().unwrap().to_string());
    }

    let (status, body) = app.get("/agent/?skip=0&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0]["id"], ids[0]);
    assert_eq!(page[1]["id"], ids[1]);

    let (_, body) = app.get("/agent/?skip=4&limit=10").await;
    let rest = body.as_array().unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0]["id"], ids[4]);

    // collection route without trailing slash
    let (status, body) = app.get("/agent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_create_agent_validation() {
    let app = spawn_app().await;

    let (status, body) = app.post("/agent/", json!({ "name": "Blank", "prompt": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "ValidationError");

    let (status, body) = app.post("/agent/", json!({ "name": "", "prompt": "p" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "ValidationError");

    let long_name = "n".repeat(101);
    let (status, _) = app.post("/agent/", json!({ "name": long_name, "prompt": "p" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.post("/agent/", json!({ "name": "No prompt" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["type"], "RequestValidationError");
}

#[tokio::test]
async fn test_blank_prompt_allowed_when_not_required() {
    let app = common::spawn_app_with(|config| config.require_agent_prompt = false).await;

    let (status, body) = app.post("/agent/", json!({ "name": "Free", "prompt": "" })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["prompt"], "");
}

#[tokio::test]
async fn test_update_agent() {
    let app = spawn_app().await;
    let agent = app.create_agent("Before", "old prompt").await;
    let id = agent["id"].as_str().unwrap();

    let (status, updated) = app.put(&format!("/agent/{id}"), json!({ "name": "After" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "After");
    assert_eq!(updated["prompt"], "old prompt");
    assert_eq!(updated["created_at"], agent["created_at"]);
    let parse = |v: &serde_json::Value| chrono::DateTime::parse_from_rfc3339(v.as_str().unwrap()).unwrap();
    assert!(parse(&updated["updated_at"]) >= parse(&agent["updated_at"]));

    let (status, body) = app.put(&format!("/agent/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "ValidationError");
}

#[tokio::test]
async fn test_missing_agent_is_not_found() {
    let app = spawn_app().await;
    let missing = uuid::Uuid::now_v7();

    let (status, body) = app.get(&format!("/agent/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "NotFoundError");
    assert!(body["detail"].as_str().unwrap().contains(&missing.to_string()));

    let (status, _) = app.put(&format!("/agent/{missing}"), json!({ "name": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/agent/{missing}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.get("/agent/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "BadRequestError");
}

#[tokio::test]
async fn test_delete_agent_cascades_to_sessions_and_messages() {
    let app = spawn_app().await;
    let agent = app.create_agent("Doomed", "You are helpful").await;
    let agent_id = agent["id"].as_str().unwrap();

    let mut session_ids = Vec::new();
    for _ in 0..2 {
        let session = app.create_session(agent_id).await;
        let session_id = session["id"].as_str().unwrap().to_string();
        let (status, _) = app
            .post("/message/text", json!({ "session_id": session_id, "content": "Hi" }))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        session_ids.push(session_id);
    }

    let (status, body) = app.delete(&format!("/agent/{agent_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (status, _) = app.get(&format!("/agent/{agent_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for session_id in &session_ids {
        let (status, _) = app.get(&format!("/session/{session_id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = app.get(&format!("/message/conversation/{session_id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(&app.state.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_health_reports_version_and_environment() {
    let app = spawn_app().await;

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "9.9.9-test");
    assert_eq!(body["environment"], "Test");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = spawn_app().await;

    let (status, body) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/message/text"].is_object());
}
