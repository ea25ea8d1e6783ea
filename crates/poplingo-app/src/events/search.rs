use std::sync::Arc;

use kanal::AsyncSender;
use poplingo_core::LookupError;
use poplingo_types::AppEvent;

use crate::state::AppState;

pub const SEARCH_FAILED_NOTICE: &str = "Something went wrong. Please try again.";

pub async fn handle_search(
    state: Arc<AppState>,
    query: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let languages = state.config.read().await.languages.pair();

    app_to_ui_tx
        .send(AppEvent::SearchStarted(query.clone()))
        .await?;

    match state.orchestrator.search(&query, &languages).await {
        Ok(entry) => {
            let saved = state.orchestrator.is_saved(entry.id).await;
            app_to_ui_tx
                .send(AppEvent::ShowEntry { entry, saved })
                .await?;
        }
        Err(LookupError::Superseded) => {
            tracing::debug!("[SEARCH] '{}' superseded by a newer search", query);
        }
        Err(LookupError::EmptyQuery) => {
            app_to_ui_tx
                .send(AppEvent::Status("Type a word or phrase to look up.".to_string()))
                .await?;
        }
        Err(e) => {
            tracing::error!("[SEARCH] '{}' failed: {}", query, e);
            app_to_ui_tx
                .send(AppEvent::SearchFailed(SEARCH_FAILED_NOTICE.to_string()))
                .await?;
        }
    }

    Ok(())
}
