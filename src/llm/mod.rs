pub mod error;
pub mod openai;

use async_trait::async_trait;

use crate::shared::models::ChatTurn;

pub use error::ProviderError;
pub use openai::OpenAiClient;

/// Outbound LLM operations needed by the conversation flows.
///
/// Each call performs a single provider request. Implementations must not
/// retry; failures are reported as [`ProviderError`] kinds.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate an assistant reply for `user_content` given prior turns.
    async fn send_text(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_content: &str,
    ) -> Result<String, ProviderError>;

    /// Transcribe an audio clip.
    async fn speech_to_text(&self, audio: &[u8], mime: &str) -> Result<String, ProviderError>;

    /// Synthesize speech for `text`.
    async fn text_to_speech(&self, text: &str, voice: &str, format: &str) -> Result<Vec<u8>, ProviderError>;

    /// Generate a reply and its spoken rendition in one call.
    ///
    /// The returned audio may be empty when the provider produced text only.
    async fn send_text_with_tts(
        &self,
        system_prompt: &str,
        history: &[ChatTurn],
        user_content: &str,
        voice: &str,
        format: &str,
    ) -> Result<(String, Vec<u8>), ProviderError>;
}

/// MIME type for an audio output format name.
pub fn audio_format_mime(format: &str) -> &'static str {
    match format.to_ascii_lowercase().as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "opus" => "audio/ogg",
        "aac" => "audio/aac",
        "pcm" | "pcm16" => "audio/pcm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::audio_format_mime;

    #[test]
    fn known_formats() {
        assert_eq!(audio_format_mime("mp3"), "audio/mpeg");
        assert_eq!(audio_format_mime("WAV"), "audio/wav");
        assert_eq!(audio_format_mime("opus"), "audio/ogg");
        assert_eq!(audio_format_mime("mystery"), "application/octet-stream");
    }
}
