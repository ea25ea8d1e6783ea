use std::sync::Arc;

use kanal::AsyncSender;
use poplingo_core::StudyDeck;
use poplingo_types::{AppEvent, StudyCommand};

use crate::state::AppState;

pub async fn handle_start_study(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let entries = state.orchestrator.collection().await;

    let card = {
        let mut deck = state.study.lock().await;
        *deck = StudyDeck::new(entries);
        deck.current()
    };

    app_to_ui_tx.send(AppEvent::ShowCard(card)).await?;
    Ok(())
}

pub async fn handle_study_command(
    state: Arc<AppState>,
    command: StudyCommand,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let card = state.study.lock().await.apply(command);

    app_to_ui_tx.send(AppEvent::ShowCard(card)).await?;
    Ok(())
}
