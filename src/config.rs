use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub discord_token: String,
    pub guild_id: Option<u64>,
    pub voice_channel_id: Option<u64>,
    pub owner_id: Option<u64>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub model_keep_alive_secs: u64,
    pub llm_timeout_secs: u64,
    pub tts_url: String,
    pub tts_voice: Option<String>,
    pub tts_timeout_secs: u64,
    pub system_prompt: Option<String>,
    pub status_message: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();
        Self::build()
    }

    fn build() -> anyhow::Result<Self> {
        let config = Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN must be set"))?,
            guild_id: env::var("DISCORD_GUILD_ID").ok().and_then(|id| id.parse().ok()),
            voice_channel_id: env::var("DISCORD_CHANNEL_ID")
                .ok()
                .and_then(|id| id.parse().ok()),
            owner_id: env::var("OWNER_ID").ok().and_then(|id| id.parse().ok()),
            ollama_url: env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            ollama_model: env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            model_keep_alive_secs: env::var("MODEL_KEEP_ALIVE_SECS")
                .unwrap_or_else(|_| "600".to_string())
                .parse()
                .unwrap_or(600),
            llm_timeout_secs: env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse()
                .unwrap_or(120),
            tts_url: env::var("TTS_SERVER_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5050".to_string()),
            tts_voice: env::var("VOICE_MODEL").ok(),
            tts_timeout_secs: env::var("TTS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            system_prompt: env::var("SYSTEM_PROMPT").ok(),
            status_message: env::var("STATUS_MESSAGE")
                .unwrap_or_else(|_| "Chatting with a local model".to_string()),
        };

        // Voice playback needs somewhere to play.
        if config.tts_voice.is_some()
            && (config.guild_id.is_none() || config.voice_channel_id.is_none())
        {
            anyhow::bail!("VOICE_MODEL requires DISCORD_GUILD_ID and DISCORD_CHANNEL_ID to be set");
        }

        Ok(config)
    }

    /// Whether replies should also be spoken in the voice channel.
    pub fn voice_enabled(&self) -> bool {
        self.tts_voice.is_some()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("discord_token", &"[REDACTED]")
            .field("guild_id", &self.guild_id)
            .field("voice_channel_id", &self.voice_channel_id)
            .field("owner_id", &self.owner_id)
            .field("ollama_url", &self.ollama_url)
            .field("ollama_model", &self.ollama_model)
            .field("model_keep_alive_secs", &self.model_keep_alive_secs)
            .field("llm_timeout_secs", &self.llm_timeout_secs)
            .field("tts_url", &self.tts_url)
            .field("tts_voice", &self.tts_voice)
            .field("tts_timeout_secs", &self.tts_timeout_secs)
            .field("system_prompt", &self.system_prompt)
            .field("status_message", &self.status_message)
            .finish()
    }
}

/// Discord caps messages at 2000 characters; stay under it so the
/// chunk counter suffix always fits.
pub const REPLY_CHUNK_LIMIT: usize = 1950;

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_config_logic() {
        // 1. Missing required vars
        env::remove_var("DISCORD_TOKEN");
        let result = Config::build();
        assert!(result.is_err(), "Should fail when DISCORD_TOKEN is missing");

        // 2. Defaults
        env::set_var("DISCORD_TOKEN", "test_token");
        env::remove_var("VOICE_MODEL");
        let config = Config::build().unwrap();
        assert_eq!(config.discord_token, "test_token");
        assert_eq!(config.ollama_url, "http://localhost:11434");
        assert_eq!(config.tts_url, "http://127.0.0.1:5050");
        assert_eq!(config.llm_timeout_secs, 120);
        assert!(!config.voice_enabled());

        // 3. Voice mode requires a guild and channel
        env::set_var("VOICE_MODEL", "march");
        env::remove_var("DISCORD_GUILD_ID");
        env::remove_var("DISCORD_CHANNEL_ID");
        assert!(Config::build().is_err());

        env::set_var("DISCORD_GUILD_ID", "100");
        env::set_var("DISCORD_CHANNEL_ID", "200");
        let config = Config::build().unwrap();
        assert!(config.voice_enabled());
        assert_eq!(config.guild_id, Some(100));
        assert_eq!(config.voice_channel_id, Some(200));

        // 4. Debug redaction
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("test_token"));
        assert!(debug_output.contains("[REDACTED]"));

        // Cleanup
        env::remove_var("DISCORD_TOKEN");
        env::remove_var("VOICE_MODEL");
        env::remove_var("DISCORD_GUILD_ID");
        env::remove_var("DISCORD_CHANNEL_ID");
    }
}
