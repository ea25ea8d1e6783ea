use std::sync::Arc;

use kanal::AsyncSender;
use poplingo_core::ChatSession;
use poplingo_types::AppEvent;

use crate::state::AppState;

/// The tutor always talks about the active result. The session lock is
/// never held while the provider answers.
pub async fn handle_chat(
    state: Arc<AppState>,
    text: String,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(active) = state.orchestrator.active().await else {
        app_to_ui_tx
            .send(AppEvent::Status("Look up a word before chatting.".to_string()))
            .await?;
        return Ok(());
    };

    let turn = {
        let mut chat = state.chat.lock().await;
        if chat.as_ref().is_none_or(|session| session.entry_id() != active.id) {
            tracing::debug!("[CHAT] New tutor session for '{}'", active.term);
            *chat = Some(ChatSession::new(&active));
        }
        chat.as_ref().and_then(|session| session.begin(&text))
    };
    let Some(turn) = turn else {
        return Ok(());
    };

    let reply = turn.ask(state.orchestrator.gateway().as_ref()).await;

    let reply = match state.chat.lock().await.as_mut() {
        Some(session) => session.finish(turn, reply),
        None => None,
    };
    match reply {
        Some(reply) => app_to_ui_tx.send(AppEvent::ChatReply(reply)).await?,
        None => tracing::debug!("[CHAT] Reply for a replaced entry dropped"),
    }

    Ok(())
}
