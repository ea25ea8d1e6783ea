use std::sync::Arc;

use kanal::AsyncSender;
use poplingo_config::language::{LanguageConfig, POPULAR_LANGUAGES, find_language};
use poplingo_types::AppEvent;

use crate::state::AppState;

pub async fn handle_set_languages(
    state: Arc<AppState>,
    native: &str,
    target: &str,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let (Some(native), Some(target)) = (find_language(native), find_language(target)) else {
        let codes: Vec<&str> = POPULAR_LANGUAGES.iter().map(|l| l.code).collect();
        app_to_ui_tx
            .send(AppEvent::Status(format!(
                "Unknown language code. Known codes: {}",
                codes.join(", ")
            )))
            .await?;
        return Ok(());
    };

    if native.code == target.code {
        app_to_ui_tx
            .send(AppEvent::Status("Pick two different languages.".to_string()))
            .await?;
        return Ok(());
    }

    let pair = {
        let mut config = state.config.write().await;
        config.languages = LanguageConfig::new(native.code, target.code);
        config.languages.pair()
    };

    tracing::info!("Languages set to {} -> {}", pair.target, pair.native);
    app_to_ui_tx.send(AppEvent::LanguagesChanged(pair)).await?;
    Ok(())
}

pub async fn handle_swap_languages(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<()> {
    let pair = {
        let mut config = state.config.write().await;
        config.languages.swap();
        config.languages.pair()
    };

    app_to_ui_tx.send(AppEvent::LanguagesChanged(pair)).await?;
    Ok(())
}
