use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::entities::PlayerId;
use crate::domain::repositories::LedgerRepository;
use crate::domain::services::{apply_report, ReportKind};
use crate::domain::value_objects::{Section, Summary};

/// Most players one report may cover (one team)
pub const MAX_REPORT_PLAYERS: usize = 4;

/// Most games one report may cover
pub const MAX_REPORT_GAMES: u32 = 99;

/// Report match input
pub struct ReportMatchInput {
    pub section: Section,
    pub kind: ReportKind,
    pub games_played: u32,
    pub games_won: u32,
    /// Identity and display name of every reported player
    pub players: Vec<(PlayerId, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerReportStatus {
    Updated,
    Added,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerReport {
    pub id: PlayerId,
    pub name: String,
    pub status: PlayerReportStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReportStatus {
    Complete,
    Incomplete,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Complete => "COMPLETE",
            ReportStatus::Incomplete => "INCOMPLETE",
        }
    }
}

/// Report match output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMatchOutput {
    pub status: ReportStatus,
    pub players: Vec<PlayerReport>,
    pub summary: Summary,
}

/// Report match use case: add one result to a section's stats ledger
pub struct ReportMatch<L: LedgerRepository> {
    ledger: Arc<L>,
}

impl<L: LedgerRepository> ReportMatch<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    pub async fn execute(&self, input: ReportMatchInput) -> Result<ReportMatchOutput, ReportError> {
        validate(&input)?;

        let table = input.section.ledger_table();
        let rows = self.ledger.read_section(&table).await.map_err(|e| {
            warn!("Failed to read ledger table {}: {}", table, e);
            ReportError::LedgerUnavailable(e.to_string())
        })?;

        let mut players = Vec::with_capacity(input.players.len());
        for (id, name) in &input.players {
            let existing = rows.get(id);
            let values = apply_report(
                existing.map(|row| &row.values),
                name,
                input.kind,
                input.games_played,
                input.games_won,
            );

            let (result, ok_status) = match existing {
                Some(row) => (
                    self.ledger.update_row(&table, row.position, &values).await,
                    PlayerReportStatus::Updated,
                ),
                None => (
                    self.ledger.append_row(&table, id, &values).await,
                    PlayerReportStatus::Added,
                ),
            };

            let status = match result {
                Ok(()) => ok_status,
                Err(e) => {
                    warn!("Failed to record {} in {}: {}", name, table, e);
                    PlayerReportStatus::Failed
                }
            };
            players.push(PlayerReport {
                id: id.clone(),
                name: name.clone(),
                status,
            });
        }

        let status = if players.iter().any(|p| p.status == PlayerReportStatus::Failed) {
            ReportStatus::Incomplete
        } else {
            ReportStatus::Complete
        };

        let updated = players
            .iter()
            .map(|p| {
                let note = match p.status {
                    PlayerReportStatus::Updated => "updated",
                    PlayerReportStatus::Added => "new",
                    PlayerReportStatus::Failed => "failed",
                };
                format!("{} ({})", p.name, note)
            })
            .collect::<Vec<_>>()
            .join("\n");

        let summary = Summary::new("Summary of Report")
            .field("Section", input.section.name.clone())
            .field("Type", input.kind.as_str())
            .field(
                "Score",
                format!(
                    "{} - {}",
                    input.games_won,
                    input.games_played - input.games_won
                ),
            )
            .field("Players Updated", updated)
            .field("Status", status.as_str());

        info!(
            "A {} {} report was recorded: {}",
            input.section.label(),
            input.kind.as_str(),
            status.as_str()
        );

        Ok(ReportMatchOutput {
            status,
            players,
            summary,
        })
    }
}

fn validate(input: &ReportMatchInput) -> Result<(), ReportError> {
    if input.players.is_empty() || input.players.len() > MAX_REPORT_PLAYERS {
        return Err(ReportError::Validation(format!(
            "Report between 1 and {} players",
            MAX_REPORT_PLAYERS
        )));
    }
    if input.games_played == 0 {
        return Err(ReportError::Validation("At least one game must be played".into()));
    }
    if input.games_played > MAX_REPORT_GAMES {
        return Err(ReportError::Validation(format!(
            "Report at most {} games",
            MAX_REPORT_GAMES
        )));
    }
    if input.games_won > input.games_played {
        return Err(ReportError::Validation(
            "Games won cannot exceed games played".into(),
        ));
    }

    let mut seen = HashSet::new();
    if !input.players.iter().all(|(id, _)| seen.insert(id)) {
        return Err(ReportError::Validation("A player is listed twice".into()));
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Ledger unavailable: {0}")]
    LedgerUnavailable(String),
}
