use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{parse_id, PageQuery};
use crate::server::rest::error::{ApiJson, ApiResult};
use crate::services::SessionService;
use crate::shared::models::{AppState, CreateSessionRequest, Session, UpdateSessionRequest};

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<Session>>> {
    let sessions = SessionService::new(&state).list(page.skip, page.limit).await?;
    Ok(Json(sessions))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Session>> {
    let id = parse_id(&id, "session")?;
    let session = SessionService::new(&state).get(id).await?;
    Ok(Json(session))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateSessionRequest>,
) -> ApiResult<(StatusCode, Json<Session>)> {
    let session = SessionService::new(&state).create(req).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateSessionRequest>,
) -> ApiResult<Json<Session>> {
    let id = parse_id(&id, "session")?;
    let session = SessionService::new(&state).update(id, req).await?;
    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "session")?;
    SessionService::new(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
