use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::server::rest::{handlers, logging_middleware::request_logging_middleware, openapi::ApiDoc};
use crate::shared::models::AppState;
use crate::storage::MEDIA_URL_PREFIX;

pub fn create_router(state: Arc<AppState>) -> Router {
    let agent_collection = get(handlers::agents::list_agents).post(handlers::agents::create_agent);
    let session_collection = get(handlers::sessions::list_sessions).post(handlers::sessions::create_session);

    let api_routes = Router::new()
        .route("/health", get(handlers::health::health))
        // Agent endpoints
        .route("/agent/", agent_collection.clone())
        .route("/agent", agent_collection)
        .route(
            "/agent/{id}",
            get(handlers::agents::get_agent)
                .put(handlers::agents::update_agent)
                .delete(handlers::agents::delete_agent),
        )
        // Session endpoints
        .route("/session/", session_collection.clone())
        .route("/session", session_collection)
        .route(
            "/session/{id}",
            get(handlers::sessions::get_session)
                .put(handlers::sessions::update_session)
                .delete(handlers::sessions::delete_session),
        )
        // Message endpoints
        .route("/message/text", post(handlers::messages::send_text_message))
        .route("/message/voice", post(handlers::messages::send_voice_message))
        .route("/message/conversation/{session_id}", get(handlers::messages::list_conversation))
        .route("/voice-job/{id}", get(handlers::voice_jobs::get_voice_job))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .with_state(state.clone());

    Router::new()
        .merge(api_routes)
        .nest_service(MEDIA_URL_PREFIX, ServeDir::new(state.storage.root()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(TraceLayer::new_for_http())
}
