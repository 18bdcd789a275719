use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::audio::{detect_audio_mime, ensure_valid_audio, extension_for_mime};
use crate::error::{AppError, AppResult};
use crate::llm::{audio_format_mime, ProviderError};
use crate::services::SessionService;
use crate::shared::models::{
    message::MAX_MESSAGE_CHARS, page_bounds, AppState, ChatTurn, Message, MessageRole, NewMessage, SessionWithPrompt,
    TextMessageRequest, VoiceJob, VoiceJobStatus, VoiceJobUpdate,
};

/// Result of a completed voice exchange.
#[derive(Debug)]
pub struct VoiceReply {
    pub job_id: Uuid,
    pub message: Message,
    pub audio: Vec<u8>,
    pub content_type: &'static str,
}

pub struct MessageService<'a> {
    state: &'a AppState,
}

impl<'a> MessageService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Persist a user text turn, ask the LLM for a reply and persist it.
    ///
    /// The user turn is stored before the provider is called. On provider
    /// failure it stays stored and no assistant turn is written.
    pub async fn receive_text(&self, req: TextMessageRequest) -> AppResult<Message> {
        let session = SessionService::new(self.state).get_with_prompt(req.session_id).await?;
        validate_content(&req.content)?;

        let history = self.history(session.id).await?;

        let user_message = Message::create(
            &self.state.db,
            NewMessage::text(session.id, MessageRole::User, req.content),
        )
        .await?;
        debug!("Stored user message {} in session {}", user_message.id, session.id);

        let reply = self
            .state
            .llm
            .send_text(&session.prompt, &history, &user_message.content)
            .await?;
        ensure_reply(&reply)?;

        let assistant_message = Message::create(
            &self.state.db,
            NewMessage::text(session.id, MessageRole::Assistant, reply),
        )
        .await?;

        info!(
            "Session {} exchanged text message {} -> {}",
            session.id, user_message.id, assistant_message.id
        );
        Ok(assistant_message)
    }

    /// Run a full voice exchange: transcribe, reply, synthesize.
    ///
    /// Progress is recorded on a `VoiceJob`; any failure after the job is
    /// created marks it failed before the error is returned.
    pub async fn receive_voice(&self, session_id: Uuid, audio: Vec<u8>) -> AppResult<VoiceReply> {
        let session = SessionService::new(self.state).get_with_prompt(session_id).await?;

        if !ensure_valid_audio(&audio) {
            return Err(AppError::BadRequest("Invalid audio format".to_string()));
        }
        let mime = detect_audio_mime(&audio).unwrap_or("application/octet-stream");

        let history = self.history(session.id).await?;

        let mut job = VoiceJob::create(&self.state.db, session.id).await?;
        info!("Voice job {} started for session {}", job.id, session.id);

        match self.run_voice_job(&mut job, &session, &history, &audio, mime).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                self.fail_job(&job, &err).await;
                Err(err)
            }
        }
    }

    pub async fn conversation(
        &self,
        session_id: Uuid,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<Vec<Message>> {
        SessionService::new(self.state).get(session_id).await?;

        let (skip, limit) = page_bounds(skip, limit);
        Ok(Message::find_by_session(&self.state.db, session_id, skip, limit).await?)
    }

    pub async fn voice_job(&self, id: Uuid) -> AppResult<VoiceJob> {
        VoiceJob::find_by_id(&self.state.db, id)
            .await?
            .ok_or_else(|| AppError::not_found("Voice job", id))
    }

    async fn history(&self, session_id: Uuid) -> AppResult<Vec<ChatTurn>> {
        let history = Message::recent_history(&self.state.db, session_id, self.state.config.history_limit).await?;
        debug!("Loaded {} history turns for session {}", history.len(), session_id);
        Ok(history)
    }

    async fn run_voice_job(
        &self,
        job: &mut VoiceJob,
        session: &SessionWithPrompt,
        history: &[ChatTurn],
        audio: &[u8],
        mime: &str,
    ) -> AppResult<VoiceReply> {
        let llm_config = &self.state.config.llm;

        let upload_url = self
            .state
            .storage
            .save("uploads", audio, extension_for_mime(mime))
            .await?;
        self.advance(
            job,
            VoiceJobStatus::Processing,
            VoiceJobUpdate { user_audio_path: Some(upload_url.clone()), ..Default::default() },
        )
        .await?;

        let transcript = self.state.llm.speech_to_text(audio, mime).await?;
        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            return Err(AppError::Validation("No speech could be transcribed from the audio".to_string()));
        }

        let user_message = Message::create(
            &self.state.db,
            NewMessage::text(session.id, MessageRole::User, transcript.clone())
                .voice()
                .with_audio(upload_url),
        )
        .await?;
        debug!("Stored voice message {} in session {}", user_message.id, session.id);

        let (reply, mut speech) = self
            .state
            .llm
            .send_text_with_tts(
                &session.prompt,
                history,
                &transcript,
                &llm_config.voice,
                &llm_config.audio_format,
            )
            .await?;
        ensure_reply(&reply)?;
        if speech.is_empty() {
            warn!("Provider returned no audio for voice job {}, synthesizing separately", job.id);
            speech = self
                .state
                .llm
                .text_to_speech(&reply, &llm_config.voice, &llm_config.audio_format)
                .await?;
        }

        let reply_url = self
            .state
            .storage
            .save("replies", &speech, &llm_config.audio_format)
            .await?;

        let assistant_message = Message::create(
            &self.state.db,
            NewMessage::text(session.id, MessageRole::Assistant, reply.clone()).with_audio(reply_url.clone()),
        )
        .await?;

        self.advance(
            job,
            VoiceJobStatus::Completed,
            VoiceJobUpdate {
                voice_to_text: Some(transcript),
                ai_text_response: Some(reply),
                ai_speech_audio_path: Some(reply_url),
                ..Default::default()
            },
        )
        .await?;

        info!(
            "Voice job {} completed for session {} ({} -> {})",
            job.id, session.id, user_message.id, assistant_message.id
        );

        Ok(VoiceReply {
            job_id: job.id,
            message: assistant_message,
            audio: speech,
            content_type: audio_format_mime(&llm_config.audio_format),
        })
    }

    async fn advance(&self, job: &mut VoiceJob, target: VoiceJobStatus, fields: VoiceJobUpdate) -> AppResult<()> {
        if !job.status.can_transition_to(&target) {
            return Err(AppError::Unexpected(anyhow::anyhow!(
                "Invalid voice job transition {:?} -> {:?} for job {}",
                job.status,
                target,
                job.id
            )));
        }

        *job = VoiceJob::update(&self.state.db, job.id, target, fields)
            .await?
            .ok_or_else(|| AppError::not_found("Voice job", job.id))?;
        debug!("Voice job {} is now {:?}", job.id, job.status);
        Ok(())
    }

    async fn fail_job(&self, job: &VoiceJob, err: &AppError) {
        if job.status.is_terminal() {
            return;
        }

        let fields = VoiceJobUpdate { error: Some(err.to_string()), ..Default::default() };
        match VoiceJob::update(&self.state.db, job.id, VoiceJobStatus::Failed, fields).await {
            Ok(_) => warn!("Voice job {} failed: {}", job.id, err),
            Err(update_err) => warn!("Could not mark voice job {} as failed: {}", job.id, update_err),
        }
    }
}

fn ensure_reply(reply: &str) -> AppResult<()> {
    if reply.trim().is_empty() {
        return Err(ProviderError::InvalidResponse("Provider returned an empty reply".to_string()).into());
    }
    Ok(())
}

fn validate_content(content: &str) -> AppResult<()> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("Message content cannot be empty".to_string()));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::Validation(format!(
            "Message content cannot exceed {MAX_MESSAGE_CHARS} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::validate_content;

    #[test]
    fn content_rules() {
        assert!(validate_content("Hi").is_ok());
        assert!(validate_content(" \n\t").is_err());
        assert!(validate_content(&"é".repeat(4000)).is_ok());
        assert!(validate_content(&"a".repeat(4001)).is_err());
    }
}
