use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use uuid::Uuid;
use utoipa::ToSchema;

use super::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VoiceJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl VoiceJobStatus {
    pub fn can_transition_to(&self, target: &VoiceJobStatus) -> bool {
        matches!(
            (self, target),
            (VoiceJobStatus::Pending, VoiceJobStatus::Processing)
                | (VoiceJobStatus::Pending, VoiceJobStatus::Failed)
                | (VoiceJobStatus::Processing, VoiceJobStatus::Completed)
                | (VoiceJobStatus::Processing, VoiceJobStatus::Failed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, VoiceJobStatus::Completed | VoiceJobStatus::Failed)
    }
}

/// One voice exchange, from upload to synthesized reply.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct VoiceJob {
    pub id: Uuid,
    pub session_id: Uuid,
    pub status: VoiceJobStatus,
    pub user_audio_path: Option<String>,
    pub voice_to_text: Option<String>,
    pub ai_text_response: Option<String>,
    pub ai_speech_audio_path: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields written alongside a status change. `None` leaves the column as is.
#[derive(Debug, Clone, Default)]
pub struct VoiceJobUpdate {
    pub user_audio_path: Option<String>,
    pub voice_to_text: Option<String>,
    pub ai_text_response: Option<String>,
    pub ai_speech_audio_path: Option<String>,
    pub error: Option<String>,
}

impl VoiceJob {
    pub async fn create(pool: &SqlitePool, session_id: Uuid) -> Result<VoiceJob, StoreError> {
        let now = Utc::now();
        let job = sqlx::query_as::<_, VoiceJob>(
            r#"
            INSERT INTO voice_jobs (id, session_id, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            RETURNING id, session_id, status, user_audio_path, voice_to_text,
                      ai_text_response, ai_speech_audio_path, error, created_at, updated_at
            "#
        )
        .bind(Uuid::now_v7())
        .bind(session_id)
        .bind(VoiceJobStatus::Pending)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(job)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<VoiceJob>, StoreError> {
        let job = sqlx::query_as::<_, VoiceJob>(
            r#"
            SELECT id, session_id, status, user_audio_path, voice_to_text,
                   ai_text_response, ai_speech_audio_path, error, created_at, updated_at
            FROM voice_jobs
            WHERE id = ?1
            "#
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }

    /// Write a status change. The caller is responsible for checking
    /// `can_transition_to` first.
    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        status: VoiceJobStatus,
        fields: VoiceJobUpdate,
    ) -> Result<Option<VoiceJob>, StoreError> {
        let job = sqlx::query_as::<_, VoiceJob>(
            r#"
            UPDATE voice_jobs
            SET status = ?2,
                user_audio_path = COALESCE(?3, user_audio_path),
                voice_to_text = COALESCE(?4, voice_to_text),
                ai_text_response = COALESCE(?5, ai_text_response),
                ai_speech_audio_path = COALESCE(?6, ai_speech_audio_path),
                error = COALESCE(?7, error),
                updated_at = ?8
            WHERE id = ?1
            RETURNING id, session_id, status, user_audio_path, voice_to_text,
                      ai_text_response, ai_speech_audio_path, error, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(status)
        .bind(fields.user_audio_path)
        .bind(fields.voice_to_text)
        .bind(fields.ai_text_response)
        .bind(fields.ai_speech_audio_path)
        .bind(fields.error)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(job)
    }
}
