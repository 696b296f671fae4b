//! Ollama chat client speaking the native HTTP API, non-streaming.

use crate::config::Config;
use crate::context::ChatMessage;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[serde(default)]
    done: bool,
}

#[derive(Serialize)]
struct PreloadRequest<'a> {
    model: &'a str,
    keep_alive: String,
    stream: bool,
}

pub struct OllamaClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    keep_alive_secs: u64,
}

impl OllamaClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            // Local models can take a while to answer.
            .timeout(Duration::from_secs(config.llm_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.ollama_model.clone(),
            keep_alive_secs: config.model_keep_alive_secs,
        })
    }

    /// Send the whole conversation and return the assistant's reply message.
    pub async fn chat(&self, messages: Vec<ChatMessage>) -> anyhow::Result<ChatMessage> {
        let url = format!("{}/api/chat", self.endpoint);
        let request = ChatRequest {
            model: &self.model,
            messages: &messages,
            stream: false,
        };
        debug!("Sending {} context messages to {}", messages.len(), url);

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send chat request to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Ollama chat request failed with status {}", response.status());
        }

        let body: ChatResponse = response
            .json()
            .await
            .context("Failed to parse Ollama chat response")?;
        if !body.done {
            debug!("Ollama returned a partial response");
        }

        Ok(body.message)
    }

    /// Ask the server to load the model and keep it resident in memory.
    pub async fn preload(&self) -> anyhow::Result<()> {
        let url = format!("{}/api/generate", self.endpoint);
        let request = PreloadRequest {
            model: &self.model,
            keep_alive: format!("{}s", self.keep_alive_secs),
            stream: false,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send preload request to Ollama")?;

        if !response.status().is_success() {
            anyhow::bail!("Model preload failed with status {}", response.status());
        }

        Ok(())
    }

    /// Probe the server; true when `/api/tags` answers successfully.
    pub async fn check_connection(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Ollama connection check failed: {}", e);
                false
            }
        }
    }
}
