//! Speech-to-text collaborators.
//!
//! A recognizer turns uploaded audio into a lower-cased transcript. Any
//! failure is reported as an empty string: the assessor treats that as
//! "nothing was understood" and marks every word as not spoken.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use log::{info, warn};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

pub trait SpeechRecognizer: Send + Sync {
    fn recognize(&self, audio: Vec<u8>) -> Pin<Box<dyn Future<Output = String> + Send + '_>>;

    fn name(&self) -> &str;
}

/// Used when no speech-to-text endpoint is configured.
pub struct NoRecognizer;

impl SpeechRecognizer for NoRecognizer {
    fn recognize(&self, _audio: Vec<u8>) -> Pin<Box<dyn Future<Output = String> + Send + '_>> {
        Box::pin(async {
            warn!("no speech recognizer configured; treating audio as silence");
            String::new()
        })
    }

    fn name(&self) -> &str {
        "none"
    }
}

#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Base URL of an OpenAI-compatible API, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub language: Option<String>,
    pub timeout: Duration,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "whisper-1".to_string(),
            language: Some("en".to_string()),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RecognizeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Posts WAV audio to an OpenAI-compatible `/audio/transcriptions` endpoint.
pub struct WhisperRecognizer {
    client: reqwest::Client,
    config: WhisperConfig,
}

impl WhisperRecognizer {
    pub fn new(config: WhisperConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/audio/transcriptions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, RecognizeError> {
        let file = Part::bytes(audio)
            .file_name("audio.wav")
            .mime_str("audio/wav")?;
        let mut form = Form::new()
            .part("file", file)
            .text("model", self.config.model.clone())
            .text("response_format", "json");
        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }

        let mut request = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .timeout(self.config.timeout);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RecognizeError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let parsed: TranscriptionResponse = response.json().await?;
        Ok(parsed.text)
    }
}

impl SpeechRecognizer for WhisperRecognizer {
    fn recognize(&self, audio: Vec<u8>) -> Pin<Box<dyn Future<Output = String> + Send + '_>> {
        Box::pin(async move {
            if audio.is_empty() {
                warn!("empty audio upload");
                return String::new();
            }
            match self.transcribe(audio).await {
                Ok(text) => {
                    let text = text.trim().to_lowercase();
                    info!("[ASR]: {text}");
                    text
                }
                Err(e) => {
                    warn!("[ASR]: could not transcribe audio: {e}");
                    String::new()
                }
            }
        })
    }

    fn name(&self) -> &str {
        "whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn no_recognizer_hears_nothing() {
        assert_eq!(NoRecognizer.recognize(vec![1, 2, 3]).await, "");
    }

    #[tokio::test]
    async fn unreachable_endpoint_degrades_to_empty_transcript() {
        let recognizer = WhisperRecognizer::new(WhisperConfig {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            timeout: Duration::from_millis(500),
            ..WhisperConfig::default()
        });
        assert_eq!(recognizer.recognize(b"RIFF".to_vec()).await, "");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let recognizer = WhisperRecognizer::new(WhisperConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..WhisperConfig::default()
        });
        assert_eq!(
            recognizer.endpoint(),
            "http://localhost:8080/v1/audio/transcriptions"
        );
    }
}
