use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of times a player may be subbed back into one draft
pub const MAX_SUBS: u8 = 2;

/// External identity of a player (stable per person)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One of the two teams of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamSide {
    One,
    Two,
}

impl TeamSide {
    pub const ALL: [TeamSide; 2] = [TeamSide::One, TeamSide::Two];

    pub fn number(&self) -> u8 {
        match self {
            TeamSide::One => 1,
            TeamSide::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(TeamSide::One),
            2 => Some(TeamSide::Two),
            _ => None,
        }
    }

    pub fn other(&self) -> Self {
        match self {
            TeamSide::One => TeamSide::Two,
            TeamSide::Two => TeamSide::One,
        }
    }
}

/// Where an active player stands relative to the two teams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "team")]
pub enum Membership {
    Unassigned,
    Member(TeamSide),
    Captain(TeamSide),
}

/// Activity of a player; only active players carry a membership,
/// so an inactive captain cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status", content = "membership")]
pub enum PlayerState {
    Active(Membership),
    Inactive,
}

/// DraftPlayer entity - a person queued in (or subbed out of) a draft
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPlayer {
    name: String,
    state: PlayerState,
    is_sub: bool,
    sub_count: u8,
}

impl DraftPlayer {
    /// Create a new active, unassigned player
    pub fn new(name: impl Into<String>, is_sub: bool) -> Self {
        Self {
            name: name.into(),
            state: PlayerState::Active(Membership::Unassigned),
            is_sub,
            sub_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PlayerState::Active(_))
    }

    pub fn is_sub(&self) -> bool {
        self.is_sub
    }

    pub fn sub_count(&self) -> u8 {
        self.sub_count
    }

    pub fn membership(&self) -> Option<Membership> {
        match self.state {
            PlayerState::Active(membership) => Some(membership),
            PlayerState::Inactive => None,
        }
    }

    /// Side this player captains, if any
    pub fn captain_of(&self) -> Option<TeamSide> {
        match self.state {
            PlayerState::Active(Membership::Captain(side)) => Some(side),
            _ => None,
        }
    }

    pub fn is_captain(&self) -> bool {
        self.captain_of().is_some()
    }

    /// Whether this player is unassigned or already belongs to `side`
    pub fn can_lead(&self, side: TeamSide) -> bool {
        if self.is_sub {
            return false;
        }
        match self.state {
            PlayerState::Active(Membership::Unassigned) => true,
            PlayerState::Active(Membership::Member(team)) => team == side,
            _ => false,
        }
    }

    pub(crate) fn make_captain(&mut self, side: TeamSide) {
        if self.is_active() {
            self.state = PlayerState::Active(Membership::Captain(side));
        }
    }

    pub(crate) fn clear_captaincy(&mut self) {
        if self.is_captain() {
            self.state = PlayerState::Active(Membership::Unassigned);
        }
    }

    /// Mark this player as seated on a team roster (captains keep their tag)
    pub(crate) fn seat(&mut self, side: TeamSide) {
        if let PlayerState::Active(Membership::Unassigned) = self.state {
            self.state = PlayerState::Active(Membership::Member(side));
        }
    }

    /// Drop roster membership (captains keep their tag)
    pub(crate) fn unseat(&mut self) {
        if let PlayerState::Active(Membership::Member(_)) = self.state {
            self.state = PlayerState::Active(Membership::Unassigned);
        }
    }

    /// Sub the player out: inactive, marked as sub, one more substitution
    pub(crate) fn deactivate(&mut self) {
        self.state = PlayerState::Inactive;
        self.is_sub = true;
        self.sub_count = self.sub_count.saturating_add(1);
    }

    pub(crate) fn reactivate(&mut self, is_sub: bool) {
        self.state = PlayerState::Active(Membership::Unassigned);
        self.is_sub = is_sub;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_is_active_and_unassigned() {
        let player = DraftPlayer::new("Ink", false);

        assert!(player.is_active());
        assert!(!player.is_sub());
        assert_eq!(player.membership(), Some(Membership::Unassigned));
        assert_eq!(player.sub_count(), 0);
    }

    #[test]
    fn test_deactivate_drops_captaincy() {
        let mut player = DraftPlayer::new("Ink", false);
        player.make_captain(TeamSide::Two);
        assert_eq!(player.captain_of(), Some(TeamSide::Two));

        player.deactivate();

        assert!(!player.is_active());
        assert!(player.is_sub());
        assert_eq!(player.captain_of(), None);
        assert_eq!(player.sub_count(), 1);

        // Inactive players cannot be made captain
        player.make_captain(TeamSide::One);
        assert!(!player.is_captain());
    }

    #[test]
    fn test_can_lead_respects_other_roster() {
        let mut player = DraftPlayer::new("Ink", false);
        player.seat(TeamSide::One);

        assert!(player.can_lead(TeamSide::One));
        assert!(!player.can_lead(TeamSide::Two));

        let sub = DraftPlayer::new("Late", true);
        assert!(!sub.can_lead(TeamSide::One));
    }
}
