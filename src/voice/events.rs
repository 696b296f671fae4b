use serenity::async_trait;
use songbird::{Event, EventContext, EventHandler as VoiceEventHandler};
use tracing::debug;

/// Logs track lifecycle transitions on the voice connection.
pub struct TrackLogger;

#[async_trait]
impl VoiceEventHandler for TrackLogger {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(track_list) = ctx {
            for (state, handle) in *track_list {
                debug!("Track {} transitioned to {:?}", handle.uuid(), state.playing);
            }
        }
        None
    }
}
