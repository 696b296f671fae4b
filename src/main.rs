use serenity::all::{ActivityData, Client, Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use songbird::SerenityInit;
use std::sync::Arc;
use tracing::{error, info};
use vocord::context::{ChatMessage, ConversationHistory};
use vocord::{config::Config, llm::OllamaClient, mention, tts::TtsClient, Data};

struct Handler {
    data: Arc<Data>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Logged in as {}!", ready.user.name);
        ctx.set_activity(Some(ActivityData::custom(&self.data.config.status_message)));

        if self.data.llm.check_connection().await {
            info!("Connected to the Ollama server!");
        } else {
            error!("Failed to connect to the Ollama server!");
        }

        // Pre-load the model so the first mention doesn't stall.
        match self.data.llm.preload().await {
            Ok(()) => info!("Model loaded successfully!"),
            Err(e) => error!("Failed to load model: {}", e),
        }
    }

    async fn message(&self, ctx: Context, new_message: Message) {
        // Ignore bots and messages that don't mention the client.
        if new_message.author.bot {
            return;
        }
        let bot_id = ctx.cache.current_user().id;
        if !new_message.mentions_user_id(bot_id) {
            return;
        }

        if let Err(e) = mention::handle_mention(&ctx, &new_message, &self.data).await {
            error!("Error handling mention: {}", e);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    let discord_token = config.discord_token.clone();

    let history = ConversationHistory::new();
    if let Some(prompt) = &config.system_prompt {
        history.push(ChatMessage::system(prompt.clone()));
    }

    let data = Arc::new(Data {
        llm: OllamaClient::new(&config)?,
        tts: TtsClient::new(&config)?,
        history,
        config,
    });

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&discord_token, intents)
        .event_handler(Handler { data })
        .register_songbird()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create client: {}", e))?;

    info!("Starting bot...");
    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }

    Ok(())
}
