use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::{parse_id, PageQuery};
use crate::server::rest::error::{ApiJson, ApiResult};
use crate::services::AgentService;
use crate::shared::models::{Agent, AppState, CreateAgentRequest, UpdateAgentRequest};

pub async fn list_agents(
    State(state): State<Arc<AppState>>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<Agent>>> {
    let agents = AgentService::new(&state).list(page.skip, page.limit).await?;
    Ok(Json(agents))
}

pub async fn get_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Agent>> {
    let id = parse_id(&id, "agent")?;
    let agent = AgentService::new(&state).get(id).await?;
    Ok(Json(agent))
}

pub async fn create_agent(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateAgentRequest>,
) -> ApiResult<(StatusCode, Json<Agent>)> {
    let agent = AgentService::new(&state).create(req).await?;
    Ok((StatusCode::CREATED, Json(agent)))
}

pub async fn update_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateAgentRequest>,
) -> ApiResult<Json<Agent>> {
    let id = parse_id(&id, "agent")?;
    let agent = AgentService::new(&state).update(id, req).await?;
    Ok(Json(agent))
}

pub async fn delete_agent(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&id, "agent")?;
    AgentService::new(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
