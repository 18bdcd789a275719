pub mod agents;
pub mod health;
pub mod messages;
pub mod sessions;
pub mod voice_jobs;

use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Records to skip.
    pub skip: Option<i64>,
    /// Maximum records to return.
    pub limit: Option<i64>,
}

pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {what} ID format")))
}
