#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use parley::config::Config;
use parley::llm::{LlmClient, ProviderError};
use parley::server::create_router;
use parley::shared::{init_database, models::ChatTurn, AppState};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt; // for oneshot

pub const DEFAULT_REPLY: &str = "Hello from the assistant";
pub const DEFAULT_TRANSCRIPT: &str = "What is the weather like?";
pub const FAKE_SPEECH: &[u8] = b"ID3\x04\0\0\0\0\0\0fake-mp3-frames";

/// Arguments of one `send_text` / `send_text_with_tts` call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub history: Vec<ChatTurn>,
    pub user_content: String,
}

/// Scripted `LlmClient` that records what it was asked.
#[derive(Default)]
pub struct FakeLlm {
    replies: Mutex<VecDeque<Result<String, ProviderError>>>,
    transcripts: Mutex<VecDeque<Result<String, ProviderError>>>,
    tts_audio: Mutex<Option<Vec<u8>>>,
    pub calls: Mutex<Vec<RecordedCall>>,
    pub tts_fallbacks: Mutex<usize>,
}

impl FakeLlm {
    pub fn push_reply(&self, reply: Result<String, ProviderError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_transcript(&self, transcript: Result<String, ProviderError>) {
        self.transcripts.lock().unwrap().push_back(transcript);
    }

    /// Audio returned by the combined reply call. Empty forces the TTS fallback.
    pub fn set_combined_audio(&self, audio: Vec<u8>) {
        *self.tts_audio.lock().unwrap() = Some(audio);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self, system_prompt: &str, history: &[ChatTurn], user_content: &str) -> Result<String, ProviderError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system_prompt: system_prompt.to_string(),
            history: history.to_vec(),
            user_content: user_content.to_string(),
        });
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_REPLY.to_string()))
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn send_text(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_content: &str,
    ) -> Result<String, ProviderError> {
        self.next_reply(system_prompt, history, user_content)
    }

    async fn speech_to_text(&self, _audio: &[u8], _mime: &str) -> Result<String, ProviderError> {
        self.transcripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(DEFAULT_TRANSCRIPT.to_string()))
    }

    async fn text_to_speech(&self, _text: &str, _voice: &str, _format: &str) -> Result<Vec<u8>, ProviderError> {
        *self.tts_fallbacks.lock().unwrap() += 1;
        Ok(FAKE_SPEECH.to_vec())
    }

    async fn send_text_with_tts(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_content: &str,
        _voice: &str,
        _format: &str,
    ) -> Result<(String, Vec<u8>), ProviderError> {
        let reply = self.next_reply(system_prompt, history, user_content)?;
        let audio = self
            .tts_audio
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| FAKE_SPEECH.to_vec());
        Ok((reply, audio))
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub llm: Arc<FakeLlm>,
    pub media: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

pub async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let media = tempfile::tempdir().unwrap();
    let mut config = Config {
        media_dir: media.path().to_path_buf(),
        environment: "Test".to_string(),
        app_version: "9.9.9-test".to_string(),
        ..Config::default()
    };
    configure(&mut config);

    let pool = init_database("sqlite::memory:").await.unwrap();
    let llm = Arc::new(FakeLlm::default());
    let state = Arc::new(AppState::new(pool, llm.clone(), config));
    let router = create_router(state.clone());

    TestApp { router, state, llm, media }
}

impl TestApp {
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, None).await
    }

    pub async fn create_agent(&self, name: &str, prompt: &str) -> Value {
        let (status, body) = self
            .post("/agent/", serde_json::json!({ "name": name, "prompt": prompt }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create agent failed: {body}");
        body
    }

    pub async fn create_session(&self, agent_id: &str) -> Value {
        let (status, body) = self
            .post("/session/", serde_json::json!({ "agent_id": agent_id }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create session failed: {body}");
        body
    }

    /// Agent with a prompt plus one session bound to it; returns the session id.
    pub async fn seed_session(&self, prompt: &str) -> String {
        let agent = self.create_agent("Helper", prompt).await;
        let session = self.create_session(agent["id"].as_str().unwrap()).await;
        session["id"].as_str().unwrap().to_string()
    }

    pub async fn send_multipart(&self, uri: &str, parts: &[(&str, Option<&str>, &[u8])]) -> axum::response::Response {
        let boundary = "parley-test-boundary";
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
            match filename {
                Some(filename) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(Body::from(body))
            .unwrap();

        self.router.clone().oneshot(req).await.unwrap()
    }
}

/// Minimal RIFF/WAVE header followed by a little silence.
pub fn wav_bytes() -> Vec<u8> {
    let mut data = b"RIFF".to_vec();
    data.extend_from_slice(&44u32.to_le_bytes());
    data.extend_from_slice(b"WAVEfmt ");
    data.extend_from_slice(&16u32.to_le_bytes());
    data.extend_from_slice(&[1, 0, 1, 0, 0x40, 0x1F, 0, 0, 0x80, 0x3E, 0, 0, 2, 0, 16, 0]);
    data.extend_from_slice(b"data");
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&[0u8; 8]);
    data
}
