mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn test_create_session_with_default_title() {
    let app = spawn_app().await;
    let agent = app.create_agent("Guide", "You are a guide").await;
    let agent_id = agent["id"].as_str().unwrap();

    let session = app.create_session(agent_id).await;
    assert_eq!(session["agent_id"], agent_id);
    assert_eq!(session["title"], "New Chat Session");

    let (status, titled) = app
        .post("/session", json!({ "agent_id": agent_id, "title": "Trip planning" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(titled["title"], "Trip planning");
}

#[tokio::test]
async fn test_create_session_for_missing_agent_persists_nothing() {
    let app = spawn_app().await;
    let missing = uuid::Uuid::now_v7();

    let (status, body) = app.post("/session/", json!({ "agent_id": missing })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "NotFoundError");

    let (status, body) = app.get("/session/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_update_returns_unchanged_session() {
    let app = spawn_app().await;
    let agent = app.create_agent("Guide", "You are a guide").await;
    let session = app.create_session(agent["id"].as_str().unwrap()).await;
    let id = session["id"].as_str().unwrap();

    let (status, body) = app.put(&format!("/session/{id}"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, session);
}

#[tokio::test]
async fn test_update_session_fields() {
    let app = spawn_app().await;
    let first = app.create_agent("First", "one").await;
    let second = app.create_agent("Second", "two").await;
    let session = app.create_session(first["id"].as_str().unwrap()).await;
    let id = session["id"].as_str().unwrap();

    let (status, body) = app
        .put(
            &format!("/session/{id}"),
            json!({ "title": "Renamed", "agent_id": second["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Renamed");
    assert_eq!(body["agent_id"], second["id"]);
    assert_eq!(body["created_at"], session["created_at"]);
}

#[tokio::test]
async fn test_update_session_to_missing_agent_is_bad_request() {
    let app = spawn_app().await;
    let agent = app.create_agent("Guide", "You are a guide").await;
    let session = app.create_session(agent["id"].as_str().unwrap()).await;
    let id = session["id"].as_str().unwrap();

    let (status, body) = app
        .put(&format!("/session/{id}"), json!({ "agent_id": uuid::Uuid::now_v7() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "BadRequestError");

    let (_, unchanged) = app.get(&format!("/session/{id}")).await;
    assert_eq!(unchanged["agent_id"], agent["id"]);
}

#[tokio::test]
async fn test_update_missing_session_is_not_found() {
    let app = spawn_app().await;
    let (status, _) = app
        .put(&format!("/session/{}", uuid::Uuid::now_v7()), json!({ "title": "x" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_sessions_paginates() {
    let app = spawn_app().await;
    let agent = app.create_agent("Guide", "You are a guide").await;
    let agent_id = agent["id"].as_str().unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(app.create_session(agent_id).await["id"].clone());
    }

    let (status, body) = app.get("/session/?skip=1&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    let page = body.as_array().unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0]["id"], ids[1]);
}

#[tokio::test]
async fn test_delete_session_removes_messages_but_keeps_agent() {
    let app = spawn_app().await;
    let session_id = app.seed_session("You are helpful").await;

    let (status, _) = app
        .post("/message/text", json!({ "session_id": session_id, "content": "Hi" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app.delete(&format!("/session/{session_id}")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&format!("/session/{session_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&format!("/session/{session_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, agents) = app.get("/agent/").await;
    assert_eq!(agents.as_array().unwrap().len(), 1);

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
        .fetch_one(&app.state.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_malformed_session_body_is_unprocessable() {
    let app = spawn_app().await;

    let (status, body) = app.post("/session/", json!({ "agent_id": "nope" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["type"], "RequestValidationError");
}
