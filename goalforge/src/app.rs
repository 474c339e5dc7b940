//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config;
use crate::database::{create_pool, LocalStore};
use crate::error::{AppError, Result};
use crate::services::{
    AuthService, DashboardService, FriendsService, GoalsService, HelpService, SettingsService,
};
use crate::session::Session;
use std::path::{Path, PathBuf};

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub store: LocalStore,
    pub auth_service: AuthService,
    pub goals_service: GoalsService,
    pub friends_service: FriendsService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
    pub help_service: HelpService,
}

impl AppState {
    pub fn new(data_dir: PathBuf, store: LocalStore) -> Self {
        Self {
            data_dir,
            auth_service: AuthService::new(store.clone()),
            goals_service: GoalsService::new(store.clone()),
            friends_service: FriendsService::new(store.clone()),
            dashboard_service: DashboardService::new(store.clone()),
            settings_service: SettingsService::new(store.clone()),
            help_service: HelpService::new(store.clone()),
            store,
        }
    }

    /// Read the current-user slot
    pub async fn session(&self) -> Result<Session> {
        Session::load(&self.store).await
    }
}

/// Platform data directory used when none is given
pub fn default_data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|dir| dir.join(config::DEFAULT_DATA_DIR_NAME))
        .ok_or_else(|| AppError::Generic("Failed to locate a data directory".to_string()))
}

/// Application setup - called once on startup
pub async fn setup(data_dir: &Path) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("App data directory: {:?}", data_dir);

    std::fs::create_dir_all(data_dir)?;

    let pool = create_pool(&data_dir.join(config::DATABASE_FILE_NAME)).await?;
    let state = AppState::new(data_dir.to_path_buf(), LocalStore::new(pool));

    tracing::info!("Application initialized successfully");

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_setup_creates_data_dir_and_database() {
        let temp_dir = TempDir::new().unwrap();
        let data_dir = temp_dir.path().join("nested").join("goalforge");

        let state = setup(&data_dir).await.unwrap();

        assert!(data_dir.join(config::DATABASE_FILE_NAME).exists());
        assert!(!state.session().await.unwrap().is_logged_in());
    }
}
