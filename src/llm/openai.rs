use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{multipart, Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{LlmClient, ProviderError};
use crate::config::LlmConfig;
use crate::shared::models::ChatTurn;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    modalities: Option<[&'a str; 2]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    audio: Option<AudioOptions<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct AudioOptions<'a> {
    voice: &'a str,
    format: &'a str,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    audio: Option<ChatAudio>,
}

#[derive(Debug, Deserialize)]
struct ChatAudio {
    #[serde(default)]
    data: Option<String>,
    #[serde(default)]
    transcript: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// `LlmClient` backed by an OpenAI-compatible HTTP API.
pub struct OpenAiClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiClient {
    pub fn new(config: LlmConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Connection(format!("Failed to create client: {e}")))?;

        info!(
            "OpenAI client ready (base_url={}, text_model={}, timeout={}s)",
            config.base_url,
            config.text_model,
            config.timeout.as_secs()
        );

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn build_messages<'a>(
        system_prompt: &'a str,
        history: &'a [ChatTurn],
        user_content: &'a str,
    ) -> Vec<ChatMessage<'a>> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !system_prompt.trim().is_empty() {
            messages.push(ChatMessage { role: "system", content: system_prompt });
        }
        messages.extend(history.iter().map(|turn| ChatMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(ChatMessage { role: "user", content: user_content });
        messages
    }

    async fn chat(&self, request: &ChatRequest<'_>) -> Result<ChatResponseMessage, ProviderError> {
        debug!(
            "Sending chat completion (model={}, messages={})",
            request.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {e}")))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| ProviderError::InvalidResponse("Response contained no choices".to_string()))
    }
}

/// Turn a non-success response into the matching `ProviderError`.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&text)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text
            }
        });

    warn!("Provider returned {}: {}", status, message);
    Err(ProviderError::from_status(status.as_u16(), message))
}

fn upload_filename(mime: &str) -> &'static str {
    match mime {
        "audio/mpeg" => "audio.mp3",
        "audio/wav" | "audio/x-wav" => "audio.wav",
        "audio/flac" => "audio.flac",
        "audio/ogg" => "audio.ogg",
        "audio/webm" => "audio.webm",
        "audio/aac" => "audio.aac",
        _ => "audio.bin",
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn send_text(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_content: &str,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            model: &self.config.text_model,
            messages: Self::build_messages(system_prompt, history, user_content),
            modalities: None,
            audio: None,
        };

        let message = self.chat(&request).await?;
        let content = message
            .content
            .ok_or_else(|| ProviderError::InvalidResponse("Response contained no text".to_string()))?;

        info!("Received reply from provider (length: {})", content.len());
        Ok(content)
    }

    async fn speech_to_text(&self, audio: &[u8], mime: &str) -> Result<String, ProviderError> {
        let part = multipart::Part::bytes(audio.to_vec())
            .file_name(upload_filename(mime))
            .mime_str(mime)
            .map_err(|e| ProviderError::BadRequest(format!("Invalid audio type {mime}: {e}")))?;

        let form = multipart::Form::new()
            .text("model", self.config.stt_model.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint("audio/transcriptions"))
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await?;

        let response = check_status(response).await?;
        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse transcription: {e}")))?;

        debug!("Transcribed {} bytes of audio into {} chars", audio.len(), body.text.len());
        Ok(body.text)
    }

    async fn text_to_speech(&self, text: &str, voice: &str, format: &str) -> Result<Vec<u8>, ProviderError> {
        let request = SpeechRequest {
            model: &self.config.tts_model,
            input: text,
            voice,
            response_format: format,
        };

        let response = self
            .client
            .post(self.endpoint("audio/speech"))
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let response = check_status(response).await?;
        let bytes = response.bytes().await?;

        debug!("Synthesized {} bytes of {} audio", bytes.len(), format);
        Ok(bytes.to_vec())
    }

    async fn send_text_with_tts(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_content: &str,
        voice: &str,
        format: &str,
    ) -> Result<(String, Vec<u8>), ProviderError> {
        let request = ChatRequest {
            model: &self.config.audio_model,
            messages: Self::build_messages(system_prompt, history, user_content),
            modalities: Some(["text", "audio"]),
            audio: Some(AudioOptions { voice, format }),
        };

        let message = self.chat(&request).await?;
        let (transcript, data) = match message.audio {
            Some(audio) => (audio.transcript, audio.data),
            None => (None, None),
        };

        let reply = message
            .content
            .filter(|c| !c.trim().is_empty())
            .or(transcript)
            .unwrap_or_default();
        if reply.is_empty() {
            warn!("No text found in audio chat response");
        }

        let audio = match data {
            Some(encoded) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| ProviderError::InvalidResponse(format!("Invalid audio payload: {e}")))?,
            None => {
                warn!("No audio found in audio chat response");
                Vec::new()
            }
        };

        debug!("Got reply text length={}, audio bytes={}", reply.len(), audio.len());
        Ok((reply, audio))
    }
}
