pub mod config;
pub mod context;
pub mod discord_text;
pub mod llm;
pub mod mention;
pub mod tts;
pub mod voice;

/// Shared state handed to every event handler
pub struct Data {
    pub config: config::Config,
    pub llm: llm::OllamaClient,
    pub tts: tts::TtsClient,
    pub history: context::ConversationHistory,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
