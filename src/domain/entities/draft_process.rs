use serde::Serialize;

use super::player::{PlayerId, TeamSide};
use super::team::DraftTeam;
use crate::domain::value_objects::InterfaceHandle;

/// DraftProcess entity - the match phase of a draft, created once the queue fills
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftProcess {
    team1: DraftTeam,
    team2: DraftTeam,
    started: bool,
    interface: Option<InterfaceHandle>,
}

impl DraftProcess {
    pub fn new() -> Self {
        Self {
            team1: DraftTeam::new(TeamSide::One),
            team2: DraftTeam::new(TeamSide::Two),
            started: false,
            interface: None,
        }
    }

    pub fn team(&self, side: TeamSide) -> &DraftTeam {
        match side {
            TeamSide::One => &self.team1,
            TeamSide::Two => &self.team2,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut DraftTeam {
        match side {
            TeamSide::One => &mut self.team1,
            TeamSide::Two => &mut self.team2,
        }
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub(crate) fn start(&mut self) {
        self.started = true;
    }

    /// Both rosters have every seat filled
    pub fn teams_full(&self) -> bool {
        !self.team1.needs_players() && !self.team2.needs_players()
    }

    /// Side whose roster currently seats `id`
    pub fn roster_side(&self, id: &PlayerId) -> Option<TeamSide> {
        TeamSide::ALL.into_iter().find(|side| self.team(*side).contains(id))
    }

    /// Side whose bench holds `id`
    pub fn bench_side(&self, id: &PlayerId) -> Option<TeamSide> {
        TeamSide::ALL
            .into_iter()
            .find(|side| self.team(*side).is_benched(id))
    }

    pub fn interface(&self) -> Option<&InterfaceHandle> {
        self.interface.as_ref()
    }

    pub(crate) fn attach_interface(&mut self, handle: InterfaceHandle) {
        self.interface = Some(handle);
    }

    pub(crate) fn take_interface(&mut self) -> Option<InterfaceHandle> {
        self.interface.take()
    }
}

impl Default for DraftProcess {
    fn default() -> Self {
        Self::new()
    }
}
