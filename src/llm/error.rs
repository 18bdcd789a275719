use thiserror::Error;

/// Failures reported by the LLM provider adapter.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider rejected credentials: {0}")]
    Authentication(String),

    #[error("Provider denied access: {0}")]
    PermissionDenied(String),

    #[error("Provider resource not found: {0}")]
    NotFound(String),

    #[error("Provider rejected request: {0}")]
    BadRequest(String),

    #[error("Provider could not process request: {0}")]
    Unprocessable(String),

    #[error("Provider rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Provider server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Could not reach provider: {0}")]
    Connection(String),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider API error ({status}): {message}")]
    Api { status: u16, message: String },
}

impl ProviderError {
    /// Classify a non-success HTTP status returned by the provider.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 409 => ProviderError::BadRequest(message),
            401 => ProviderError::Authentication(message),
            403 => ProviderError::PermissionDenied(message),
            404 => ProviderError::NotFound(message),
            422 => ProviderError::Unprocessable(message),
            429 => ProviderError::RateLimit(message),
            s if s >= 500 => ProviderError::Server { status: s, message },
            s => ProviderError::Api { status: s, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else if err.is_connect() || err.is_request() || err.is_body() {
            ProviderError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            ProviderError::from_status(status.as_u16(), err.to_string())
        } else {
            ProviderError::Connection(err.to_string())
        }
    }
}
