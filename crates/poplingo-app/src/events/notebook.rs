use std::sync::Arc;

use kanal::AsyncSender;
use poplingo_types::{AppEvent, EntryId};

use crate::state::AppState;

/// Push the current collection to the UI and the study deck
pub async fn publish_notebook(
    state: &AppState,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let entries = state.orchestrator.collection().await;
    state.study.lock().await.refresh(entries.clone());

    app_to_ui_tx.send(AppEvent::NotebookChanged(entries)).await?;
    Ok(())
}

pub async fn handle_save(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let status = match state.orchestrator.save_active().await {
        Ok(Some((term, true))) => {
            publish_notebook(&state, app_to_ui_tx).await?;
            format!("Saved '{term}' to your notebook.")
        }
        Ok(Some((term, false))) => format!("'{term}' is already in your notebook."),
        Ok(None) => "Nothing to save yet.".to_string(),
        Err(e) => {
            tracing::error!("Failed to save the active entry: {}", e);
            "Could not save, please try again.".to_string()
        }
    };

    app_to_ui_tx.send(AppEvent::Status(status)).await?;
    Ok(())
}

pub async fn handle_delete(
    state: Arc<AppState>,
    id: EntryId,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    match state.orchestrator.delete(id).await {
        Ok(true) => publish_notebook(&state, app_to_ui_tx).await?,
        Ok(false) => tracing::debug!("Delete of unknown entry {} ignored", id),
        Err(e) => {
            tracing::error!("Failed to delete {}: {}", id, e);
            app_to_ui_tx
                .send(AppEvent::Status("Could not delete, please try again.".to_string()))
                .await?;
        }
    }

    Ok(())
}
