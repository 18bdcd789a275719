use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use super::parse_id;
use crate::server::rest::error::ApiResult;
use crate::services::MessageService;
use crate::shared::models::{AppState, VoiceJob};

pub async fn get_voice_job(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<VoiceJob>> {
    let id = parse_id(&id, "voice job")?;
    let job = MessageService::new(&state).voice_job(id).await?;
    Ok(Json(job))
}
