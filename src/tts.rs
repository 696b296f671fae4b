//! Client for the local TTS/RVC server.

use crate::config::Config;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("TTS generation failed: {0}")]
    Server(String),
    #[error("TTS request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    text: &'a str,
    voice: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    audio_path: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    detail: Option<String>,
}

pub struct TtsClient {
    http: reqwest::Client,
    base_url: String,
}

impl TtsClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.tts_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.tts_url.trim_end_matches('/').to_string(),
        })
    }

    /// Synthesize `text` with the given voice model and return the path of
    /// the generated audio file (the server runs on the same host).
    pub async fn generate(&self, text: &str, voice: &str) -> Result<PathBuf, TtsError> {
        let url = format!("{}/generate", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&GenerateRequest { text, voice })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| status.to_string());
            return Err(TtsError::Server(detail));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(PathBuf::from(body.audio_path))
    }
}

/// Reduce a Markdown reply to plain text suitable for speech synthesis.
///
/// Fenced code blocks are dropped, links collapse to their label, emphasis
/// markers disappear, and all whitespace collapses to single spaces.
pub fn speakable_text(input: &str) -> String {
    let parser = Parser::new_ext(input, Options::ENABLE_STRIKETHROUGH);
    let mut out = String::new();
    let mut in_code_block = false;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            Event::Text(text) | Event::Code(text) => {
                if !in_code_block {
                    out.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => out.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Heading { .. } | TagEnd::Item) => out.push(' '),
            _ => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_response_parses() {
        let body = r#"{"audio_path": "/tmp/tts_rvc_output.wav"}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.audio_path, "/tmp/tts_rvc_output.wav");
    }

    #[test]
    fn error_response_parses_detail() {
        let body = r#"{"detail": "voice model not found"}"#;
        let response: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.detail.as_deref(), Some("voice model not found"));
    }

    #[test]
    fn server_error_displays_detail() {
        let error = TtsError::Server("voice model not found".to_string());
        assert_eq!(
            error.to_string(),
            "TTS generation failed: voice model not found"
        );
    }

    #[test]
    fn strips_emphasis_and_newlines() {
        let input = "Here is **bold** and *italic* text.\nNext line.";
        assert_eq!(
            speakable_text(input),
            "Here is bold and italic text. Next line."
        );
    }

    #[test]
    fn drops_code_blocks_but_keeps_inline_code() {
        let input = "Run `cargo test` like so:\n```sh\ncargo test --all\n```\nDone.";
        let output = speakable_text(input);
        assert!(output.contains("Run cargo test like so:"));
        assert!(!output.contains("--all"));
        assert!(output.contains("Done."));
    }

    #[test]
    fn links_collapse_to_their_label() {
        let input = "See [the docs](https://example.com/docs) for more.";
        assert_eq!(speakable_text(input), "See the docs for more.");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let input = "a list:\n\n- one\n- two\n";
        assert_eq!(speakable_text(input), "a list: one two");
    }
}
