use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, ErrorKind};

pub type ApiResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub detail: String,
    #[serde(rename = "type")]
    pub error_type: String,
}

/// Attached to error responses so the logging middleware can report the cause.
#[derive(Debug, Clone)]
pub struct LoggedError {
    pub kind: ErrorKind,
    pub cause: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let descriptor = kind.descriptor();

        let body = ErrorResponse {
            error: descriptor.title.to_string(),
            detail: self.public_detail(),
            error_type: descriptor.error_type.to_string(),
        };

        let mut response = (descriptor.status, Json(body)).into_response();
        response.extensions_mut().insert(LoggedError {
            kind,
            cause: format!("{self:#}"),
        });
        response
    }
}

/// JSON body extractor whose rejections render as [`AppError::InvalidBody`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(AppError::InvalidBody(json_rejection_detail(rejection))),
        }
    }
}

fn json_rejection_detail(rejection: JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(err) => err.body_text(),
        JsonRejection::JsonSyntaxError(err) => err.body_text(),
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`".to_string()
        }
        other => other.body_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn error_body_has_error_detail_and_type() {
        let response = AppError::not_found("Session", 3).into_response();
        assert_eq!(response.status().as_u16(), 404);
        assert!(response.extensions().get::<LoggedError>().is_some());

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["type"], "NotFoundError");
        assert_eq!(json["detail"], "Session with id 3 not found");
        assert_eq!(json["error"], "Resource not found");
    }

    #[tokio::test]
    async fn internal_causes_are_not_exposed() {
        let response = AppError::Unexpected(anyhow::anyhow!("disk exploded")).into_response();
        assert_eq!(response.status().as_u16(), 500);
        let logged = response.extensions().get::<LoggedError>().cloned().unwrap();
        assert!(logged.cause.contains("disk exploded"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(!String::from_utf8_lossy(&bytes).contains("disk exploded"));
    }
}
