//! Voice channel connection and TTS audio playback.

pub mod events;

use anyhow::Context as _;
use serenity::all::{ChannelId, GuildId};
use songbird::input::File;
use songbird::{Event, Songbird, TrackEvent};
use std::path::Path;
use std::sync::Arc;

/// Join the configured voice channel. A no-op when a connection for the
/// guild already exists, so track event handlers are only registered once.
pub async fn join_channel(
    manager: &Arc<Songbird>,
    guild_id: u64,
    channel_id: u64,
) -> anyhow::Result<()> {
    let guild = GuildId::new(guild_id);
    if manager.get(guild).is_some() {
        return Ok(());
    }

    let call = manager
        .join(guild, ChannelId::new(channel_id))
        .await
        .context("Failed to join the voice channel")?;

    let mut handler = call.lock().await;
    handler.add_global_event(Event::Track(TrackEvent::Play), events::TrackLogger);
    handler.add_global_event(Event::Track(TrackEvent::End), events::TrackLogger);
    handler.add_global_event(Event::Track(TrackEvent::Error), events::TrackLogger);

    Ok(())
}

/// Queue an audio file for playback on the guild's existing connection.
pub async fn play_file(manager: &Arc<Songbird>, guild_id: u64, path: &Path) -> anyhow::Result<()> {
    let call = manager
        .get(GuildId::new(guild_id))
        .ok_or_else(|| anyhow::anyhow!("Not connected to a voice channel"))?;

    let mut handler = call.lock().await;
    let _track = handler
        .enqueue_input(File::new(path.to_path_buf()).into())
        .await;

    Ok(())
}
