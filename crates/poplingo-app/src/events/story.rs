use std::sync::Arc;

use kanal::AsyncSender;
use poplingo_types::AppEvent;

use crate::state::AppState;

pub async fn handle_story(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let terms: Vec<String> = state
        .orchestrator
        .collection()
        .await
        .into_iter()
        .map(|entry| entry.term)
        .collect();

    if terms.is_empty() {
        app_to_ui_tx
            .send(AppEvent::Status(
                "Save a few words first, then ask for a story.".to_string(),
            ))
            .await?;
        return Ok(());
    }

    let languages = state.config.read().await.languages.pair();
    tracing::info!("[STORY] Weaving {} terms", terms.len());

    let story = state
        .orchestrator
        .gateway()
        .generate_story(&terms, &languages)
        .await;

    app_to_ui_tx.send(AppEvent::ShowStory(story)).await?;
    Ok(())
}
