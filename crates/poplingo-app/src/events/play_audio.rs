use std::sync::Arc;

use kanal::AsyncSender;
use poplingo_types::{AppEvent, AudioTarget, EntryUpdate};

use crate::events::notebook::publish_notebook;
use crate::state::AppState;

pub async fn handle_play_audio(
    state: Arc<AppState>,
    target: AudioTarget,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(entry) = state.orchestrator.find(target.entry_id()).await else {
        app_to_ui_tx
            .send(AppEvent::Status("That entry is no longer available.".to_string()))
            .await?;
        return Ok(());
    };

    let (text, cached) = match target {
        AudioTarget::Term(_) => (entry.term.clone(), entry.pronunciation_audio.clone()),
        AudioTarget::Example { index, .. } => match entry.examples.get(index) {
            Some(example) => (example.original.clone(), example.audio.clone()),
            None => {
                app_to_ui_tx
                    .send(AppEvent::Status(format!("There is no example #{}.", index + 1)))
                    .await?;
                return Ok(());
            }
        },
    };

    let Some(payload) = state
        .playback
        .play(&target.trigger_key(), &text, cached.as_deref())
        .await
    else {
        return Ok(());
    };

    // Cache the fresh clip on every copy of the entry
    let update = match target {
        AudioTarget::Term(_) => EntryUpdate::pronunciation(payload),
        AudioTarget::Example { index, .. } => EntryUpdate::example_audio(index, payload),
    };

    match state.orchestrator.update(entry.id, &update).await {
        Ok(true) => {
            if state.orchestrator.is_saved(entry.id).await {
                publish_notebook(&state, app_to_ui_tx).await?;
            }
        }
        Ok(false) => {}
        Err(e) => tracing::error!("[AUDIO] Failed to cache audio for '{}': {}", entry.term, e),
    }

    Ok(())
}
