use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::player::{DraftPlayer, PlayerId, TeamSide};

/// Players per team
pub const TEAM_SIZE: usize = 4;

/// DraftTeam entity - one of the two rosters formed from a full queue.
///
/// Members are identities into the draft's player map; the team never owns
/// the players. `members.len() + players_needed == TEAM_SIZE` always holds.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTeam {
    side: TeamSide,
    members: BTreeSet<PlayerId>,
    /// Members who subbed out and may come back to their seat
    bench: BTreeSet<PlayerId>,
    score: i32,
    players_needed: usize,
}

impl DraftTeam {
    pub fn new(side: TeamSide) -> Self {
        Self {
            side,
            members: BTreeSet::new(),
            bench: BTreeSet::new(),
            score: 0,
            players_needed: TEAM_SIZE,
        }
    }

    pub fn side(&self) -> TeamSide {
        self.side
    }

    pub fn members(&self) -> &BTreeSet<PlayerId> {
        &self.members
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn players_needed(&self) -> usize {
        self.players_needed
    }

    pub fn needs_players(&self) -> bool {
        self.players_needed > 0
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.members.contains(id)
    }

    pub fn is_benched(&self, id: &PlayerId) -> bool {
        self.bench.contains(id)
    }

    /// Seat a player on the roster. No-op if already a member.
    pub fn add(&mut self, id: &PlayerId, player: &mut DraftPlayer) -> bool {
        if self.contains(id) {
            return false;
        }
        debug_assert!(self.players_needed > 0, "team {:?} is already full", self.side);

        self.bench.remove(id);
        self.members.insert(id.clone());
        player.seat(self.side);
        self.players_needed = self.players_needed.saturating_sub(1);
        true
    }

    /// Move a member to the bench, opening one slot
    pub fn request_sub(&mut self, id: &PlayerId, player: &mut DraftPlayer) -> bool {
        if !self.members.remove(id) {
            return false;
        }

        self.bench.insert(id.clone());
        player.unseat();
        self.players_needed += 1;
        true
    }

    /// Empty the roster and bench, returning every member to unassigned
    pub fn clear(&mut self, players: &mut BTreeMap<PlayerId, DraftPlayer>) {
        for id in &self.members {
            if let Some(player) = players.get_mut(id) {
                player.unseat();
            }
        }
        self.members.clear();
        self.bench.clear();
        self.players_needed = TEAM_SIZE;
    }

    pub fn increment_score(&mut self) {
        self.score += 1;
    }

    pub fn decrement_score(&mut self) {
        self.score -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Membership;

    fn roster(names: &[&str]) -> BTreeMap<PlayerId, DraftPlayer> {
        names
            .iter()
            .map(|n| (PlayerId::from(*n), DraftPlayer::new(*n, false)))
            .collect()
    }

    #[test]
    fn test_add_decrements_needed_once() {
        let mut players = roster(&["a"]);
        let mut team = DraftTeam::new(TeamSide::One);
        let id = PlayerId::from("a");

        assert!(team.add(&id, players.get_mut(&id).unwrap()));
        assert!(!team.add(&id, players.get_mut(&id).unwrap()));

        assert_eq!(team.players_needed(), TEAM_SIZE - 1);
        assert_eq!(team.members().len() + team.players_needed(), TEAM_SIZE);
        assert_eq!(
            players[&id].membership(),
            Some(Membership::Member(TeamSide::One))
        );
    }

    #[test]
    fn test_add_sub_add_restores_deficit() {
        let mut players = roster(&["a", "b"]);
        let mut team = DraftTeam::new(TeamSide::Two);
        let a = PlayerId::from("a");
        let b = PlayerId::from("b");
        team.add(&b, players.get_mut(&b).unwrap());

        team.add(&a, players.get_mut(&a).unwrap());
        let needed = team.players_needed();

        assert!(team.request_sub(&a, players.get_mut(&a).unwrap()));
        assert_eq!(team.players_needed(), needed + 1);
        assert!(team.is_benched(&a));
        assert_eq!(players[&a].membership(), Some(Membership::Unassigned));

        team.add(&a, players.get_mut(&a).unwrap());
        assert_eq!(team.players_needed(), needed);
        assert!(!team.is_benched(&a));
    }

    #[test]
    fn test_request_sub_ignores_non_members() {
        let mut players = roster(&["a"]);
        let mut team = DraftTeam::new(TeamSide::One);
        let a = PlayerId::from("a");

        assert!(!team.request_sub(&a, players.get_mut(&a).unwrap()));
        assert_eq!(team.players_needed(), TEAM_SIZE);
    }

    #[test]
    fn test_clear_resets_roster() {
        let mut players = roster(&["a", "b", "c"]);
        let mut team = DraftTeam::new(TeamSide::One);
        for name in ["a", "b", "c"] {
            let id = PlayerId::from(name);
            team.add(&id, players.get_mut(&id).unwrap());
        }
        let c = PlayerId::from("c");
        team.request_sub(&c, players.get_mut(&c).unwrap());

        team.clear(&mut players);

        assert!(team.members().is_empty());
        assert!(!team.is_benched(&c));
        assert_eq!(team.players_needed(), TEAM_SIZE);
        assert!(players
            .values()
            .all(|p| p.membership() == Some(Membership::Unassigned)));
    }

    #[test]
    fn test_score_is_unguarded() {
        let mut team = DraftTeam::new(TeamSide::One);
        team.decrement_score();
        team.increment_score();
        team.increment_score();
        assert_eq!(team.score(), 1);
    }
}
