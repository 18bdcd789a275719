use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};

use super::error::LoggedError;

pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    // Failed requests carry their cause from `AppError::into_response`
    if let Some(failure) = response.extensions().get::<LoggedError>() {
        if status.is_server_error() {
            error!(
                method = %method,
                path = %uri.path(),
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                kind = ?failure.kind,
                cause = %failure.cause,
                "HTTP request failed"
            );
        } else {
            warn!(
                method = %method,
                path = %uri.path(),
                status = %status.as_u16(),
                duration_ms = %duration.as_millis(),
                kind = ?failure.kind,
                cause = %failure.cause,
                "HTTP request rejected"
            );
        }
        return response;
    }

    info!(
        method = %method,
        path = %uri.path(),
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request"
    );

    response
}
