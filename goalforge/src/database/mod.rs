//! Database module
//!
//! This module provides all persistence for GoalForge:
//! - Schema and migrations
//! - Model definitions
//! - The JSON key/value local store

pub mod models;
pub mod schema;
pub mod store;

pub use models::*;
pub use schema::initialize_database;
pub use store::LocalStore;

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;

const POOL_SIZE: u32 = 5;

async fn open(options: &SqliteConnectOptions, max_connections: u32) -> Result<SqlitePool> {
    Ok(SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options.clone())
        .await?)
}

/// Open the store database, creating and migrating it as needed.
///
/// Migrations run on their own single connection, which is closed before
/// the shared pool opens.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening local store at: {:?}", db_path);

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let migrator = open(&options, 1).await?;
    initialize_database(&migrator).await?;
    migrator.close().await;

    let pool = open(&options, POOL_SIZE).await?;
    tracing::debug!("Store pool ready ({} connections)", POOL_SIZE);

    Ok(pool)
}
