use axum::http::StatusCode;
use thiserror::Error;

use crate::llm::ProviderError;
use crate::shared::models::StoreError;

/// Every failure a request can end with.
///
/// Lower layers convert their own error types into this one; the HTTP layer
/// only ever sees `AppError` and renders it through [`ErrorKind::descriptor`].
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    /// Body could not be parsed into the expected shape.
    #[error("{0}")]
    InvalidBody(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    BadRequest,
    InvalidBody,
    Conflict,
    StoreUnavailable,
    StoreInternal,
    ProviderAuthentication,
    ProviderPermissionDenied,
    ProviderNotFound,
    ProviderRateLimit,
    ProviderConnection,
    ProviderTimeout,
    ProviderBadRequest,
    ProviderUnprocessable,
    ProviderServer,
    ProviderApi,
    Unexpected,
}

/// How an error kind is presented to the caller.
#[derive(Debug, Clone, Copy)]
pub struct ErrorDescriptor {
    pub status: StatusCode,
    pub title: &'static str,
    pub error_type: &'static str,
    /// Returned instead of the error's own message. `None` means the message is safe to expose.
    pub generic_detail: Option<&'static str>,
}

const fn describe(
    status: StatusCode,
    title: &'static str,
    error_type: &'static str,
    generic_detail: Option<&'static str>,
) -> ErrorDescriptor {
    ErrorDescriptor { status, title, error_type, generic_detail }
}

impl ErrorKind {
    pub fn descriptor(self) -> ErrorDescriptor {
        use ErrorKind::*;

        match self {
            NotFound => describe(StatusCode::NOT_FOUND, "Resource not found", "NotFoundError", None),
            Validation => describe(StatusCode::BAD_REQUEST, "Validation error", "ValidationError", None),
            BadRequest => describe(StatusCode::BAD_REQUEST, "Bad request", "BadRequestError", None),
            InvalidBody => describe(
                StatusCode::UNPROCESSABLE_ENTITY,
                "Request validation error",
                "RequestValidationError",
                None,
            ),
            Conflict => describe(StatusCode::CONFLICT, "Data integrity error", "IntegrityError", None),
            StoreUnavailable => describe(
                StatusCode::SERVICE_UNAVAILABLE,
                "Database unavailable",
                "OperationalError",
                Some("The database is temporarily unavailable. Please try again later."),
            ),
            StoreInternal => describe(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Database error",
                "DatabaseError",
                Some("A database error occurred. Please try again later."),
            ),
            ProviderAuthentication => describe(
                StatusCode::UNAUTHORIZED,
                "LLM authentication failed",
                "AuthenticationError",
                Some("Invalid API key or authentication credentials"),
            ),
            ProviderPermissionDenied => describe(
                StatusCode::FORBIDDEN,
                "LLM permission denied",
                "PermissionDeniedError",
                Some("Insufficient permissions for this LLM operation"),
            ),
            ProviderNotFound => describe(
                StatusCode::NOT_FOUND,
                "LLM resource not found",
                "NotFoundError",
                Some("The requested LLM resource was not found"),
            ),
            ProviderRateLimit => describe(
                StatusCode::TOO_MANY_REQUESTS,
                "LLM rate limit exceeded",
                "RateLimitError",
                Some("Too many requests. Please try again later"),
            ),
            ProviderConnection => describe(
                StatusCode::SERVICE_UNAVAILABLE,
                "LLM connection error",
                "APIConnectionError",
                Some("Could not connect to the LLM provider"),
            ),
            ProviderTimeout => describe(
                StatusCode::GATEWAY_TIMEOUT,
                "LLM request timeout",
                "APITimeoutError",
                Some("The request to the LLM provider timed out"),
            ),
            ProviderBadRequest => describe(
                StatusCode::BAD_REQUEST,
                "Invalid LLM request",
                "BadRequestError",
                Some("The request to the LLM provider was invalid"),
            ),
            ProviderUnprocessable => describe(
                StatusCode::UNPROCESSABLE_ENTITY,
                "LLM unprocessable entity",
                "UnprocessableEntityError",
                Some("The request was well-formed but contains semantic errors"),
            ),
            ProviderServer => describe(
                StatusCode::BAD_GATEWAY,
                "LLM internal server error",
                "InternalServerError",
                Some("The LLM provider is experiencing issues"),
            ),
            ProviderApi => describe(
                StatusCode::INTERNAL_SERVER_ERROR,
                "LLM API error",
                "APIError",
                Some("An error occurred with the LLM provider"),
            ),
            Unexpected => describe(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                "InternalServerError",
                Some("An unexpected error occurred. Please try again later."),
            ),
        }
    }
}

impl AppError {
    pub fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{what} with id {id} not found"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::InvalidBody(_) => ErrorKind::InvalidBody,
            AppError::Store(StoreError::Conflict { .. }) => ErrorKind::Conflict,
            AppError::Store(StoreError::Unavailable { .. }) => ErrorKind::StoreUnavailable,
            AppError::Store(StoreError::Internal(_)) => ErrorKind::StoreInternal,
            AppError::Provider(err) => match err {
                ProviderError::Authentication(_) => ErrorKind::ProviderAuthentication,
                ProviderError::PermissionDenied(_) => ErrorKind::ProviderPermissionDenied,
                ProviderError::NotFound(_) => ErrorKind::ProviderNotFound,
                ProviderError::RateLimit(_) => ErrorKind::ProviderRateLimit,
                ProviderError::Connection(_) => ErrorKind::ProviderConnection,
                ProviderError::Timeout => ErrorKind::ProviderTimeout,
                ProviderError::BadRequest(_) => ErrorKind::ProviderBadRequest,
                ProviderError::Unprocessable(_) => ErrorKind::ProviderUnprocessable,
                ProviderError::Server { .. } => ErrorKind::ProviderServer,
                ProviderError::Api { .. } | ProviderError::InvalidResponse(_) => ErrorKind::ProviderApi,
            },
            AppError::Io(_) | AppError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Message returned to the caller. Kinds with a generic detail never leak their cause.
    pub fn public_detail(&self) -> String {
        match self.kind().descriptor().generic_detail {
            Some(generic) => generic.to_string(),
            None => match self {
                AppError::Store(StoreError::Conflict { detail, .. }) => detail.clone(),
                other => other.to_string(),
            },
        }
    }
}
