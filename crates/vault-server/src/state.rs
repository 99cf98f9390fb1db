//! Application state

use crate::config::Config;
use crate::error::StoreError;
use crate::services::store::Store;

/// Application state shared across handlers
pub struct AppState {
    pub config: Config,
    pub store: Store,
}

impl AppState {
    /// Open the store and prepare the upload directory
    pub async fn new(config: Config) -> Result<Self, StoreError> {
        let store = Store::open(&config.storage.data_directory).await?;
        tokio::fs::create_dir_all(&config.storage.upload_directory).await?;

        Ok(Self { config, store })
    }

    /// Public URL of an uploaded file
    pub fn upload_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.config.public_url(), filename)
    }
}
