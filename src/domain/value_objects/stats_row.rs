use serde::{Deserialize, Serialize};

/// Stat columns of one ledger row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsValues {
    pub name: String,
    pub set_wins: u32,
    pub set_losses: u32,
    pub games_won: u32,
    pub games_lost: u32,
}

impl StatsValues {
    pub fn sets_played(&self) -> u32 {
        self.set_wins + self.set_losses
    }

    pub fn games_played(&self) -> u32 {
        self.games_won + self.games_lost
    }

    pub fn set_winrate(&self) -> f64 {
        ratio(self.set_wins, self.sets_played())
    }

    pub fn game_winrate(&self) -> f64 {
        ratio(self.games_won, self.games_played())
    }
}

fn ratio(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// A ledger row and the position it occupies in its table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRow {
    pub position: u32,
    pub values: StatsValues,
}
