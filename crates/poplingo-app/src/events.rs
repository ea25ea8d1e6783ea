use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use poplingo_types::AppEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::state::AppState;

pub mod chat;
pub mod languages;
pub mod notebook;
pub mod play_audio;
pub mod search;
pub mod story;
pub mod study;

use chat::handle_chat;
use languages::{handle_set_languages, handle_swap_languages};
use notebook::{handle_delete, handle_save, publish_notebook};
use play_audio::handle_play_audio;
use search::handle_search;
use story::handle_story;
use study::{handle_start_study, handle_study_command};

/// App's main loop.
///
/// Provider-bound events run as their own tasks so a slow lookup never
/// blocks the next command.
pub async fn event_loop(
    state: Arc<AppState>,
    ui_to_app_rx: AsyncReceiver<AppEvent>,
    app_to_ui_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let languages = state.config.read().await.languages.pair();
    app_to_ui_tx.send(AppEvent::BackendReady).await?;
    app_to_ui_tx.send(AppEvent::LanguagesChanged(languages)).await?;
    publish_notebook(&state, &app_to_ui_tx).await?;

    let mut in_flight = JoinSet::new();

    tracing::info!("[EVENT_LOOP] Starting main loop, waiting for events");
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = ui_to_app_rx.recv() => event?,
        };

        while in_flight.try_join_next().is_some() {}

        tracing::debug!(
            "[EVENT_LOOP] Event received: {:?}",
            std::mem::discriminant(&event)
        );

        match event {
            AppEvent::Quit => {
                tracing::info!("[EVENT_LOOP] Quit requested");
                break;
            }
            event @ (AppEvent::Search(_)
            | AppEvent::PlayAudio(_)
            | AppEvent::SendChat(_)
            | AppEvent::GenerateStory) => {
                let state = state.clone();
                let tx = app_to_ui_tx.clone();
                in_flight.spawn(async move {
                    if let Err(e) = handle_events(state, &tx, event).await {
                        tracing::error!("[EVENT_LOOP] Handler failed: {e:#}");
                    }
                });
            }
            event => handle_events(state.clone(), &app_to_ui_tx, event).await?,
        }
    }

    in_flight.shutdown().await;
    Ok(())
}

async fn handle_events(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
    event: AppEvent,
) -> anyhow::Result<()> {
    match event {
        AppEvent::Search(query) => {
            handle_search(state, query, app_to_ui_tx).await?;
        }
        AppEvent::SaveActive => {
            handle_save(state, app_to_ui_tx).await?;
        }
        AppEvent::Delete(id) => {
            handle_delete(state, id, app_to_ui_tx).await?;
        }
        AppEvent::PlayAudio(target) => {
            handle_play_audio(state, target, app_to_ui_tx).await?;
        }
        AppEvent::SendChat(text) => {
            handle_chat(state, text, app_to_ui_tx).await?;
        }
        AppEvent::GenerateStory => {
            handle_story(state, app_to_ui_tx).await?;
        }
        AppEvent::SetLanguages { native, target } => {
            handle_set_languages(state, &native, &target, app_to_ui_tx).await?;
        }
        AppEvent::SwapLanguages => {
            handle_swap_languages(state, app_to_ui_tx).await?;
        }
        AppEvent::StartStudy => {
            handle_start_study(state, app_to_ui_tx).await?;
        }
        AppEvent::Study(command) => {
            handle_study_command(state, command, app_to_ui_tx).await?;
        }
        AppEvent::Quit => {}

        // UI-only events, ignore in backend
        AppEvent::BackendReady
        | AppEvent::SearchStarted(_)
        | AppEvent::ShowEntry { .. }
        | AppEvent::SearchFailed(_)
        | AppEvent::NotebookChanged(_)
        | AppEvent::ChatReply(_)
        | AppEvent::ShowStory(_)
        | AppEvent::ShowCard(_)
        | AppEvent::LanguagesChanged(_)
        | AppEvent::Status(_) => {}
    }

    Ok(())
}
