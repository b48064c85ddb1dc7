//! Database primitives and the sea-orm-backed directory stores.

mod store;

use std::sync::Arc;

use anyhow::Context;
use sea_orm::{Database, DatabaseConnection};
use serde::Deserialize;
use thiserror::Error;

pub use store::{SqlCompensationStore, SqlEmployeeStore, UnknownReportRef};

/// Shared connection handle. sea-orm pools internally; the `Arc` makes the
/// handle cheap to hand to per-request store values.
pub type DbPool = Arc<DatabaseConnection>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("database url missing")]
    MissingUrl,
}

/// Environment-driven connection settings.
#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_url_key")]
    env_key: String,
}

fn default_url_key() -> String {
    "DATABASE_URL".to_string()
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            env_key: default_url_key(),
        }
    }
}

impl DatabaseSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::default()
    }

    pub fn database_url(&self) -> Result<String, DbError> {
        std::env::var(&self.env_key).map_err(|_| DbError::MissingUrl)
    }
}

/// Open the pool described by the settings.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<DbPool> {
    let url = settings.database_url()?;
    let conn = Database::connect(&url)
        .await
        .context("failed to connect to database")?;
    Ok(Arc::new(conn))
}
