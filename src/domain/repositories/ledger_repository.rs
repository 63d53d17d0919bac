use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::entities::PlayerId;
use crate::domain::value_objects::{StatsRow, StatsValues};

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(String),
}

/// Keyed row store holding per-section player stats
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Read a whole table, indexed by player identity
    async fn read_section(&self, table: &str) -> Result<HashMap<PlayerId, StatsRow>, RepositoryError>;

    /// Overwrite the row at `position`
    async fn update_row(
        &self,
        table: &str,
        position: u32,
        values: &StatsValues,
    ) -> Result<(), RepositoryError>;

    /// Append a row for a player not yet in the table
    async fn append_row(
        &self,
        table: &str,
        player_id: &PlayerId,
        values: &StatsValues,
    ) -> Result<(), RepositoryError>;
}
