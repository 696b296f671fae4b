use crate::config::REPLY_CHUNK_LIMIT;
use crate::context::ChatMessage;
use crate::discord_text::{split_message, strip_mentions};
use crate::{tts, voice, Data, Error};
use serenity::all::{Context, Message};
use tracing::{error, info, warn};

const FALLBACK_REPLY: &str = "Sorry, something went wrong on my end!";
const JOIN_VOICE_PROMPT: &str =
    "Please join the voice channel that I am currently in to use this command!";

/// Handle a message where the bot is mentioned.
pub async fn handle_mention(
    ctx: &Context,
    new_message: &Message,
    data: &Data,
) -> Result<(), Error> {
    info!(
        "Handling mention from {} in channel {}: {}",
        new_message.author.name, new_message.channel_id, new_message.content
    );

    // In voice mode, users must sit in the bot's voice channel. The owner
    // is exempt.
    if data.config.voice_enabled() && !author_in_voice_channel(ctx, new_message, data) {
        new_message.reply(&ctx.http, JOIN_VOICE_PROMPT).await?;
        return Ok(());
    }

    let prompt = strip_mentions(&new_message.content);
    if prompt.is_empty() {
        // Avoid noisy replies when someone only pings the bot.
        return Ok(());
    }

    data.history.push(ChatMessage::user(format!(
        "{} said: \"{}\"",
        new_message.author.name, prompt
    )));

    let typing = new_message.channel_id.start_typing(&ctx.http);

    let reply = match data.llm.chat(data.history.snapshot()).await {
        Ok(message) => {
            let content = message.content.trim().to_string();
            data.history.push(message);
            content
        }
        Err(e) => {
            error!("Ollama chat failed: {}", e);
            String::new()
        }
    };
    let reply = if reply.is_empty() {
        FALLBACK_REPLY.to_string()
    } else {
        reply
    };

    drop(typing);

    // Voice playback is best-effort; the text reply goes out regardless.
    if let Some(voice_name) = &data.config.tts_voice {
        speak_reply(ctx, data, voice_name, &reply).await;
    }

    let chunks = split_message(&reply, REPLY_CHUNK_LIMIT);
    let total = chunks.len();
    for (i, chunk) in chunks.iter().enumerate() {
        new_message
            .reply(&ctx.http, format!("{} ({}/{})", chunk, i + 1, total))
            .await?;
    }

    Ok(())
}

/// Whether the author is connected to the configured voice channel, or is
/// the bot owner.
fn author_in_voice_channel(ctx: &Context, message: &Message, data: &Data) -> bool {
    if data.config.owner_id == Some(message.author.id.get()) {
        return true;
    }

    let Some(guild) = message.guild(&ctx.cache) else {
        return false;
    };

    guild
        .voice_states
        .get(&message.author.id)
        .and_then(|state| state.channel_id)
        .is_some_and(|channel| Some(channel.get()) == data.config.voice_channel_id)
}

/// Synthesize the reply and play it in the configured voice channel.
async fn speak_reply(ctx: &Context, data: &Data, voice_name: &str, reply: &str) {
    let (Some(guild_id), Some(channel_id)) = (data.config.guild_id, data.config.voice_channel_id)
    else {
        return;
    };

    let Some(manager) = songbird::get(ctx).await else {
        warn!("Songbird voice client not initialized");
        return;
    };

    match voice::join_channel(&manager, guild_id, channel_id).await {
        Ok(()) => info!("Connected to the voice channel!"),
        Err(e) => {
            error!("Failed to connect to the voice channel: {}", e);
            return;
        }
    }

    let speech = tts::speakable_text(reply);
    if speech.is_empty() {
        return;
    }

    match data.tts.generate(&speech, voice_name).await {
        Ok(audio_path) => {
            if let Err(e) = voice::play_file(&manager, guild_id, &audio_path).await {
                error!("Voice playback failed: {}", e);
            }
        }
        Err(e) => error!("{}", e),
    }
}
