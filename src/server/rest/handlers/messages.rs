use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::{header, HeaderName, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use super::{parse_id, PageQuery};
use crate::error::AppError;
use crate::server::rest::error::{ApiJson, ApiResult};
use crate::services::MessageService;
use crate::shared::models::{AppState, Message, TextMessageRequest};

pub const VOICE_JOB_HEADER: &str = "x-voice-job-id";
pub const MESSAGE_ID_HEADER: &str = "x-message-id";

pub async fn send_text_message(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<TextMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    let reply = MessageService::new(&state).receive_text(req).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

/// Accepts `session_id` and an `audio` (or `file`) part; replies with synthesized audio.
pub async fn send_voice_message(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let mut multipart = multipart.map_err(|e| AppError::InvalidBody(e.body_text()))?;

    let mut session_id = None;
    let mut audio = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidBody(e.body_text()))?
    {
        match field.name() {
            Some("session_id") => {
                let raw = field.text().await.map_err(|e| AppError::InvalidBody(e.body_text()))?;
                session_id = Some(parse_id(raw.trim(), "session")?);
            }
            Some("audio") | Some("file") => {
                let bytes = field.bytes().await.map_err(|e| AppError::InvalidBody(e.body_text()))?;
                audio = Some(bytes.to_vec());
            }
            other => debug!("Ignoring multipart field {:?}", other),
        }
    }

    let session_id = session_id.ok_or_else(|| AppError::InvalidBody("Missing field `session_id`".to_string()))?;
    let audio = audio.ok_or_else(|| AppError::InvalidBody("Missing audio file".to_string()))?;

    let reply = MessageService::new(&state).receive_voice(session_id, audio).await?;

    let headers = [
        (header::CONTENT_TYPE, reply.content_type.to_string()),
        (HeaderName::from_static(VOICE_JOB_HEADER), reply.job_id.to_string()),
        (HeaderName::from_static(MESSAGE_ID_HEADER), reply.message.id.to_string()),
    ];
    Ok((StatusCode::CREATED, headers, reply.audio))
}

pub async fn list_conversation(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Query(page): Query<PageQuery>,
) -> ApiResult<Json<Vec<Message>>> {
    let session_id = parse_id(&session_id, "session")?;
    let messages = MessageService::new(&state)
        .conversation(session_id, page.skip, page.limit)
        .await?;
    Ok(Json(messages))
}
