use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::entities::PlayerId;
use crate::domain::repositories::{LedgerRepository, RepositoryError};
use crate::domain::value_objects::{StatsRow, StatsValues};

/// First data row of a table; position 1 holds the column headers
const FIRST_ROW: i64 = 2;

/// SQLite implementation of LedgerRepository
///
/// Every section table lives in one `ledger_rows` table keyed by
/// `(table_key, position)`, so positions behave like sheet row numbers.
pub struct SqliteLedgerRepository {
    pool: SqlitePool,
}

impl SqliteLedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the ledger table if it does not exist yet
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ledger_rows (
                table_key TEXT NOT NULL,
                position INTEGER NOT NULL,
                player_id TEXT NOT NULL,
                name TEXT NOT NULL,
                set_wins INTEGER NOT NULL DEFAULT 0,
                set_losses INTEGER NOT NULL DEFAULT 0,
                games_won INTEGER NOT NULL DEFAULT 0,
                games_lost INTEGER NOT NULL DEFAULT 0,
                set_winrate REAL NOT NULL DEFAULT 0,
                game_winrate REAL NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (table_key, position),
                UNIQUE (table_key, player_id)
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }

    fn row_to_stats(row: &sqlx::sqlite::SqliteRow) -> (PlayerId, StatsRow) {
        use sqlx::Row;

        let player_id: String = row.get("player_id");
        let values = StatsValues {
            name: row.get("name"),
            set_wins: row.get::<i64, _>("set_wins") as u32,
            set_losses: row.get::<i64, _>("set_losses") as u32,
            games_won: row.get::<i64, _>("games_won") as u32,
            games_lost: row.get::<i64, _>("games_lost") as u32,
        };

        (
            PlayerId::new(player_id),
            StatsRow {
                position: row.get::<i64, _>("position") as u32,
                values,
            },
        )
    }
}

#[async_trait]
impl LedgerRepository for SqliteLedgerRepository {
    async fn read_section(&self, table: &str) -> Result<HashMap<PlayerId, StatsRow>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT position, player_id, name, set_wins, set_losses, games_won, games_lost \
             FROM ledger_rows WHERE table_key = ? ORDER BY position",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(rows.iter().map(Self::row_to_stats).collect())
    }

    async fn update_row(
        &self,
        table: &str,
        position: u32,
        values: &StatsValues,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE ledger_rows
            SET name = ?, set_wins = ?, set_losses = ?, games_won = ?, games_lost = ?,
                set_winrate = ?, game_winrate = ?, updated_at = ?
            WHERE table_key = ? AND position = ?
            "#,
        )
        .bind(&values.name)
        .bind(values.set_wins as i64)
        .bind(values.set_losses as i64)
        .bind(values.games_won as i64)
        .bind(values.games_lost as i64)
        .bind(values.set_winrate())
        .bind(values.game_winrate())
        .bind(chrono::Utc::now().timestamp())
        .bind(table)
        .bind(position as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("{}!{}", table, position)));
        }

        Ok(())
    }

    async fn append_row(
        &self,
        table: &str,
        player_id: &PlayerId,
        values: &StatsValues,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO ledger_rows (
                table_key, position, player_id, name, set_wins, set_losses,
                games_won, games_lost, set_winrate, game_winrate, updated_at
            )
            SELECT ?, COALESCE(MAX(position) + 1, ?), ?, ?, ?, ?, ?, ?, ?, ?, ?
            FROM ledger_rows WHERE table_key = ?
            "#,
        )
        .bind(table)
        .bind(FIRST_ROW)
        .bind(player_id.as_str())
        .bind(&values.name)
        .bind(values.set_wins as i64)
        .bind(values.set_losses as i64)
        .bind(values.games_won as i64)
        .bind(values.games_lost as i64)
        .bind(values.set_winrate())
        .bind(values.game_winrate())
        .bind(chrono::Utc::now().timestamp())
        .bind(table)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn repo() -> SqliteLedgerRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = SqliteLedgerRepository::new(pool);
        repo.ensure_schema().await.unwrap();
        repo
    }

    fn values(name: &str, games_won: u32) -> StatsValues {
        StatsValues {
            name: name.to_string(),
            set_wins: 1,
            set_losses: 0,
            games_won,
            games_lost: 1,
        }
    }

    #[tokio::test]
    async fn test_append_assigns_positions_per_table() {
        let repo = repo().await;

        repo.append_row("lp_current_cycle", &PlayerId::from("a"), &values("A", 3))
            .await
            .unwrap();
        repo.append_row("lp_current_cycle", &PlayerId::from("b"), &values("B", 2))
            .await
            .unwrap();
        repo.append_row("io_current_cycle", &PlayerId::from("a"), &values("A", 1))
            .await
            .unwrap();

        let lp = repo.read_section("lp_current_cycle").await.unwrap();
        assert_eq!(lp.len(), 2);
        assert_eq!(lp[&PlayerId::from("a")].position, 2);
        assert_eq!(lp[&PlayerId::from("b")].position, 3);

        let io = repo.read_section("io_current_cycle").await.unwrap();
        assert_eq!(io[&PlayerId::from("a")].position, 2);
    }

    #[tokio::test]
    async fn test_update_row() {
        let repo = repo().await;
        let id = PlayerId::from("a");
        repo.append_row("lp_current_cycle", &id, &values("A", 3))
            .await
            .unwrap();

        repo.update_row("lp_current_cycle", 2, &values("A2", 9))
            .await
            .unwrap();

        let table = repo.read_section("lp_current_cycle").await.unwrap();
        assert_eq!(table[&id].values, values("A2", 9));

        let missing = repo.update_row("lp_current_cycle", 40, &values("X", 0)).await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));
    }
}
