use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const APP_NAME: &str = "poplingo";

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

fn default_collection_key() -> String {
    "poplingo_notebook".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory backing the key-value store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Key of the single notebook document
    #[serde(default = "default_collection_key")]
    pub collection_key: String,
}

impl StorageConfig {
    pub fn new() -> Self {
        let data_dir = env::var("POPLINGO_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        Self {
            data_dir,
            collection_key: default_collection_key(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            collection_key: default_collection_key(),
        }
    }
}

/// Platform config directory for the app (profiles live here)
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
