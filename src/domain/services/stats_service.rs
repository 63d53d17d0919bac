//! Stats service - ledger arithmetic for match reports

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::StatsValues;

/// Kind of match report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    /// A full set played from the start; counts toward set record
    Cycle,
    /// Games played as a substitute; games only
    Sub,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Cycle => "cycle",
            ReportKind::Sub => "sub",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cycle" => Some(ReportKind::Cycle),
            "sub" => Some(ReportKind::Sub),
            _ => None,
        }
    }
}

/// A set is won with at least half of its games
pub fn set_won(games_won: u32, games_played: u32) -> bool {
    u64::from(games_won) * 2 >= u64::from(games_played)
}

/// New stat values after adding one report to `existing` (or to an empty row)
pub fn apply_report(
    existing: Option<&StatsValues>,
    name: &str,
    kind: ReportKind,
    games_played: u32,
    games_won: u32,
) -> StatsValues {
    let mut values = existing.cloned().unwrap_or_default();
    values.name = name.to_string();

    if kind == ReportKind::Cycle {
        if set_won(games_won, games_played) {
            values.set_wins = values.set_wins.saturating_add(1);
        } else {
            values.set_losses = values.set_losses.saturating_add(1);
        }
    }

    values.games_won = values.games_won.saturating_add(games_won);
    values.games_lost = values
        .games_lost
        .saturating_add(games_played.saturating_sub(games_won));
    values
}
