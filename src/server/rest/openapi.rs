use utoipa::OpenApi;

use crate::server::rest::{
    error::ErrorResponse,
    handlers::{health::HealthResponse, PageQuery},
};
use crate::shared::models::{
    Agent, CreateAgentRequest, CreateSessionRequest, Message, MessageRole, MessageType, Session,
    TextMessageRequest, UpdateAgentRequest, UpdateSessionRequest, VoiceJob, VoiceJobStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::server::rest::openapi::health,
        crate::server::rest::openapi::list_agents,
        crate::server::rest::openapi::get_agent,
        crate::server::rest::openapi::create_agent,
        crate::server::rest::openapi::update_agent,
        crate::server::rest::openapi::delete_agent,
        crate::server::rest::openapi::list_sessions,
        crate::server::rest::openapi::get_session,
        crate::server::rest::openapi::create_session,
        crate::server::rest::openapi::update_session,
        crate::server::rest::openapi::delete_session,
        crate::server::rest::openapi::send_text_message,
        crate::server::rest::openapi::send_voice_message,
        crate::server::rest::openapi::list_conversation,
        crate::server::rest::openapi::get_voice_job,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            Agent,
            CreateAgentRequest,
            UpdateAgentRequest,
            Session,
            CreateSessionRequest,
            UpdateSessionRequest,
            Message,
            MessageRole,
            MessageType,
            TextMessageRequest,
            VoiceJob,
            VoiceJobStatus,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Agents", description = "Agent persona management"),
        (name = "Sessions", description = "Conversation session management"),
        (name = "Messages", description = "Text and voice message exchange"),
    ),
    info(
        title = "Parley REST API",
        version = "0.1.0",
        description = "Agent, session and message service with LLM-backed text and voice replies",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
)]
pub struct ApiDoc;

/// Multipart body of a voice message.
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct VoiceMessageForm {
    #[schema(format = Uuid)]
    session_id: String,
    #[schema(format = Binary)]
    audio: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    ),
)]
#[allow(dead_code)]
pub async fn health() {}

// Agent endpoints
#[utoipa::path(
    get,
    path = "/agent/",
    tag = "Agents",
    params(PageQuery),
    responses(
        (status = 200, description = "Agents ordered by id", body = Vec<Agent>),
    ),
)]
#[allow(dead_code)]
pub async fn list_agents() {}

#[utoipa::path(
    get,
    path = "/agent/{id}",
    tag = "Agents",
    params(
        ("id" = String, Path, description = "Agent ID"),
    ),
    responses(
        (status = 200, description = "Agent details", body = Agent),
        (status = 400, description = "Invalid ID", body = ErrorResponse),
        (status = 404, description = "Agent not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn get_agent() {}

#[utoipa::path(
    post,
    path = "/agent/",
    tag = "Agents",
    request_body = CreateAgentRequest,
    responses(
        (status = 201, description = "Agent created", body = Agent),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 422, description = "Malformed body", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn create_agent() {}

#[utoipa::path(
    put,
    path = "/agent/{id}",
    tag = "Agents",
    params(
        ("id" = String, Path, description = "Agent ID"),
    ),
    request_body = UpdateAgentRequest,
    responses(
        (status = 200, description = "Agent updated", body = Agent),
        (status = 400, description = "No fields supplied", body = ErrorResponse),
        (status = 404, description = "Agent not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn update_agent() {}

#[utoipa::path(
    delete,
    path = "/agent/{id}",
    tag = "Agents",
    params(
        ("id" = String, Path, description = "Agent ID"),
    ),
    responses(
        (status = 204, description = "Agent and its sessions deleted"),
        (status = 404, description = "Agent not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn delete_agent() {}

// Session endpoints
#[utoipa::path(
    get,
    path = "/session/",
    tag = "Sessions",
    params(PageQuery),
    responses(
        (status = 200, description = "Sessions ordered by id", body = Vec<Session>),
    ),
)]
#[allow(dead_code)]
pub async fn list_sessions() {}

#[utoipa::path(
    get,
    path = "/session/{id}",
    tag = "Sessions",
    params(
        ("id" = String, Path, description = "Session ID"),
    ),
    responses(
        (status = 200, description = "Session details", body = Session),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn get_session() {}

#[utoipa::path(
    post,
    path = "/session/",
    tag = "Sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created", body = Session),
        (status = 404, description = "Agent not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn create_session() {}

#[utoipa::path(
    put,
    path = "/session/{id}",
    tag = "Sessions",
    params(
        ("id" = String, Path, description = "Session ID"),
    ),
    request_body = UpdateSessionRequest,
    responses(
        (status = 200, description = "Session updated, or unchanged for an empty body", body = Session),
        (status = 400, description = "Referenced agent does not exist", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn update_session() {}

#[utoipa::path(
    delete,
    path = "/session/{id}",
    tag = "Sessions",
    params(
        ("id" = String, Path, description = "Session ID"),
    ),
    responses(
        (status = 204, description = "Session and its messages deleted"),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn delete_session() {}

// Message endpoints
#[utoipa::path(
    post,
    path = "/message/text",
    tag = "Messages",
    request_body = TextMessageRequest,
    responses(
        (status = 201, description = "Assistant reply", body = Message),
        (status = 400, description = "Empty or oversized content", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 429, description = "LLM rate limit exceeded", body = ErrorResponse),
        (status = 502, description = "LLM provider failure", body = ErrorResponse),
        (status = 504, description = "LLM request timed out", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn send_text_message() {}

#[utoipa::path(
    post,
    path = "/message/voice",
    tag = "Messages",
    request_body(content = VoiceMessageForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Synthesized reply audio", body = Vec<u8>, content_type = "audio/mpeg",
            headers(("x-voice-job-id" = String, description = "Voice job tracking this exchange"))),
        (status = 400, description = "Invalid audio format", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 422, description = "Malformed multipart body", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn send_voice_message() {}

#[utoipa::path(
    get,
    path = "/message/conversation/{session_id}",
    tag = "Messages",
    params(
        ("session_id" = String, Path, description = "Session ID"),
        PageQuery,
    ),
    responses(
        (status = 200, description = "Messages in conversation order", body = Vec<Message>),
        (status = 404, description = "Session not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn list_conversation() {}

#[utoipa::path(
    get,
    path = "/voice-job/{id}",
    tag = "Messages",
    params(
        ("id" = String, Path, description = "Voice job ID"),
    ),
    responses(
        (status = 200, description = "Voice job status", body = VoiceJob),
        (status = 404, description = "Voice job not found", body = ErrorResponse),
    ),
)]
#[allow(dead_code)]
pub async fn get_voice_job() {}
