use std::env;

use serde::{Deserialize, Serialize};

use self::gemini::GeminiConfig;
use self::language::LanguageConfig;
use self::storage::StorageConfig;

pub mod gemini;
pub mod language;
pub mod storage;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub gemini: GeminiConfig,
    pub storage: StorageConfig,
    pub languages: LanguageConfig,
}

impl Config {
    pub fn new() -> Self {
        let native = env::var("POPLINGO_NATIVE_LANG")
            .unwrap_or_else(|_| language::DEFAULT_NATIVE.to_string());
        let target = env::var("POPLINGO_TARGET_LANG")
            .unwrap_or_else(|_| language::DEFAULT_TARGET.to_string());

        Config {
            gemini: GeminiConfig::new(),
            storage: StorageConfig::new(),
            languages: LanguageConfig::new(native, target),
        }
    }
}
