use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use super::draft_process::DraftProcess;
use super::player::{DraftPlayer, Membership, PlayerId, TeamSide, MAX_SUBS};
use crate::domain::services::{captain_candidates, select_captains, CaptainSelectionError, Captains};
use crate::domain::value_objects::{
    Caller, DraftKey, DraftSettings, DraftTimer, InterfaceHandle, Section, Summary,
};

/// Players needed to fill a queue and form two teams
pub const QUEUE_SIZE: usize = 8;

/// Why a draft stopped accepting events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CloseReason {
    Ended,
    Expired,
    Finished,
}

impl CloseReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloseReason::Ended => "ended",
            CloseReason::Expired => "expired",
            CloseReason::Finished => "finished",
        }
    }
}

/// Externally visible lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStatus {
    Open,
    Initialized,
    Started,
    Ended,
    Expired,
    Finished,
}

impl DraftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DraftStatus::Open => "open",
            DraftStatus::Initialized => "initialized",
            DraftStatus::Started => "started",
            DraftStatus::Ended => "ended",
            DraftStatus::Expired => "expired",
            DraftStatus::Finished => "finished",
        }
    }
}

/// Result of the lazy expiry check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiry {
    Live,
    /// Expired by this check; the interface still has to be disabled
    JustExpired(InterfaceHandle),
    /// Expired by an earlier check
    Expired,
}

/// Rejections and contract failures of draft operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("You don't have access to this section's drafts!")]
    WrongSection,
    #[error("You are already in this draft!")]
    AlreadyQueued,
    #[error("You are not in this draft!")]
    NotQueued,
    #[error("You have already been subbed out of the draft!")]
    AlreadySubbedOut,
    #[error("You have already been subbed out twice! You cannot sub anymore for this draft.")]
    SubLimitReached,
    #[error("Someone has already replaced you.")]
    AlreadyReplaced,
    #[error("This draft hasn't requested any subs yet.")]
    NoSubsNeeded,
    #[error("Only captains can do that.")]
    NotCaptain,
    #[error("Wait until {} to reping!", .until.format("%H:%M UTC"))]
    CooldownActive { until: DateTime<Utc> },
    #[error("Reping only when you need +{max} or less!")]
    TooManyNeeded { max: usize },
    #[error("This draft is full. Join as a sub instead.")]
    QueueFull,
    #[error("This draft has already filled. Request a sub instead.")]
    AlreadyInitialized,
    #[error("This draft has not filled yet.")]
    NotInitialized,
    #[error("The match has already started.")]
    AlreadyStarted,
    #[error("The match has not started yet.")]
    NotStarted,
    #[error("Both teams need a full roster first.")]
    TeamsIncomplete,
    #[error("That player is already on a team.")]
    AlreadyOnTeam,
    #[error("Your team is already full.")]
    TeamFull,
    #[error("That player has been subbed out.")]
    PlayerInactive,
    #[error("Nobody left on your team can take over as captain.")]
    NoCaptainSuccessor,
    #[error("There's no point in subbing people out currently.")]
    NothingToSub,
    #[error("That player is not in this draft.")]
    UnknownPlayer,
    #[error("Refresh the request once then try again.")]
    InterfaceNotRendered,
    #[error("This draft has already {}.", .0.as_str())]
    Closed(CloseReason),
    #[error("Draft invariant violated: {0}")]
    InvariantViolation(String),
}

impl DraftError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            DraftError::WrongSection => "WRONG_SECTION",
            DraftError::AlreadyQueued => "ALREADY_QUEUED",
            DraftError::NotQueued => "NOT_QUEUED",
            DraftError::AlreadySubbedOut => "ALREADY_SUBBED_OUT",
            DraftError::SubLimitReached => "SUB_LIMIT_REACHED",
            DraftError::AlreadyReplaced => "ALREADY_REPLACED",
            DraftError::NoSubsNeeded => "NO_SUBS_NEEDED",
            DraftError::NotCaptain => "NOT_CAPTAIN",
            DraftError::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            DraftError::TooManyNeeded { .. } => "TOO_MANY_NEEDED",
            DraftError::QueueFull => "QUEUE_FULL",
            DraftError::AlreadyInitialized => "ALREADY_INITIALIZED",
            DraftError::NotInitialized => "NOT_INITIALIZED",
            DraftError::AlreadyStarted => "ALREADY_STARTED",
            DraftError::NotStarted => "NOT_STARTED",
            DraftError::TeamsIncomplete => "TEAMS_INCOMPLETE",
            DraftError::AlreadyOnTeam => "ALREADY_ON_TEAM",
            DraftError::TeamFull => "TEAM_FULL",
            DraftError::PlayerInactive => "PLAYER_INACTIVE",
            DraftError::NoCaptainSuccessor => "NO_CAPTAIN_SUCCESSOR",
            DraftError::NothingToSub => "NOTHING_TO_SUB",
            DraftError::UnknownPlayer => "UNKNOWN_PLAYER",
            DraftError::InterfaceNotRendered => "INTERFACE_NOT_RENDERED",
            DraftError::Closed(_) => "DRAFT_CLOSED",
            DraftError::InvariantViolation(_) => "INVARIANT_VIOLATION",
        }
    }

    /// Expected user-facing rejection (as opposed to a contract failure)
    pub fn is_precondition(&self) -> bool {
        !matches!(self, DraftError::InvariantViolation(_))
    }
}

impl From<CaptainSelectionError> for DraftError {
    fn from(e: CaptainSelectionError) -> Self {
        DraftError::InvariantViolation(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    Queued { remaining: usize },
    Initialized(Captains),
}

#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    pub name: String,
    pub remaining: usize,
}

#[derive(Debug, Clone)]
pub struct SubOutOutcome {
    pub name: String,
    pub team: Option<TeamSide>,
    pub sub_count: u8,
    pub captains: Option<Captains>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubInKind {
    /// A known player coming back, reseated on `team` when they had a seat
    Returning { team: Option<TeamSide> },
    /// Someone new joining the draft
    New,
}

#[derive(Debug, Clone)]
pub struct SubInOutcome {
    pub name: String,
    pub kind: SubInKind,
    /// Set when this admission filled the queue
    pub initialized: Option<Captains>,
}

#[derive(Debug, Clone)]
pub struct ReassignOutcome {
    pub side: TeamSide,
    pub captains: Captains,
}

#[derive(Debug, Clone)]
pub struct RepingOutcome {
    pub remaining: usize,
}

#[derive(Debug, Clone)]
pub struct ForceEndOutcome {
    pub request_interface: InterfaceHandle,
    pub process_interface: Option<InterfaceHandle>,
    pub was_initialized: bool,
}

#[derive(Debug, Clone)]
pub struct PickOutcome {
    pub side: TeamSide,
    pub seated: Vec<PlayerId>,
    pub players_needed: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreChange {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreOutcome {
    pub team1: i32,
    pub team2: i32,
}

/// One roster entry at the end of a match
#[derive(Debug, Clone)]
pub struct RosterEntry {
    pub id: PlayerId,
    pub name: String,
    pub is_sub: bool,
}

#[derive(Debug, Clone)]
pub struct TeamResult {
    pub side: TeamSide,
    pub score: i32,
    pub roster: Vec<RosterEntry>,
}

#[derive(Debug, Clone)]
pub struct FinishOutcome {
    pub results: Vec<TeamResult>,
    pub request_interface: Option<InterfaceHandle>,
    pub process_interface: Option<InterfaceHandle>,
}

/// Draft aggregate - one queue, its two teams and its lifecycle.
///
/// All state transitions happen here and are synchronous; callers hold the
/// draft's lock for the duration of one call and perform I/O afterwards.
#[derive(Debug, Clone)]
pub struct Draft {
    key: DraftKey,
    section: Section,
    settings: DraftSettings,
    players: BTreeMap<PlayerId, DraftPlayer>,
    /// Everyone who ever joined, so rejoining never extends the deadline twice
    history: BTreeSet<PlayerId>,
    num_inactive: usize,
    process: Option<DraftProcess>,
    timer: DraftTimer,
    chat_channel: String,
    interface: Option<InterfaceHandle>,
    closed: Option<CloseReason>,
    created_at: DateTime<Utc>,
}

impl Draft {
    pub fn new(section: Section, number: u32, settings: DraftSettings, now: DateTime<Utc>) -> Self {
        Self {
            key: DraftKey::new(section.prefix.clone(), number),
            chat_channel: section.draft_chat(number),
            timer: DraftTimer::start(now, &settings),
            section,
            settings,
            players: BTreeMap::new(),
            history: BTreeSet::new(),
            num_inactive: 0,
            process: None,
            interface: None,
            closed: None,
            created_at: now,
        }
    }

    // ========== Accessors ==========

    pub fn key(&self) -> &DraftKey {
        &self.key
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn players(&self) -> &BTreeMap<PlayerId, DraftPlayer> {
        &self.players
    }

    pub fn player(&self, id: &PlayerId) -> Option<&DraftPlayer> {
        self.players.get(id)
    }

    pub fn num_inactive(&self) -> usize {
        self.num_inactive
    }

    pub fn active_count(&self) -> usize {
        self.players.len() - self.num_inactive
    }

    /// Open slots before the queue is full again
    pub fn remaining(&self) -> usize {
        QUEUE_SIZE.saturating_sub(self.active_count())
    }

    pub fn is_initialized(&self) -> bool {
        self.process.is_some()
    }

    pub fn has_started(&self) -> bool {
        self.process.as_ref().is_some_and(|p| p.has_started())
    }

    pub fn process(&self) -> Option<&DraftProcess> {
        self.process.as_ref()
    }

    pub fn timer(&self) -> &DraftTimer {
        &self.timer
    }

    pub fn chat_channel(&self) -> &str {
        &self.chat_channel
    }

    pub fn interface(&self) -> Option<&InterfaceHandle> {
        self.interface.as_ref()
    }

    pub fn closed(&self) -> Option<CloseReason> {
        self.closed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> DraftStatus {
        match self.closed {
            Some(CloseReason::Ended) => DraftStatus::Ended,
            Some(CloseReason::Expired) => DraftStatus::Expired,
            Some(CloseReason::Finished) => DraftStatus::Finished,
            None if self.has_started() => DraftStatus::Started,
            None if self.is_initialized() => DraftStatus::Initialized,
            None => DraftStatus::Open,
        }
    }

    /// Current captain of `side`
    pub fn captain(&self, side: TeamSide) -> Option<&PlayerId> {
        self.players
            .iter()
            .find(|(_, p)| p.captain_of() == Some(side))
            .map(|(id, _)| id)
    }

    pub fn attach_interface(&mut self, handle: InterfaceHandle) {
        self.interface = Some(handle);
    }

    pub fn attach_process_interface(&mut self, handle: InterfaceHandle) {
        if let Some(process) = self.process.as_mut() {
            process.attach_interface(handle);
        }
    }

    // ========== Lifecycle ==========

    /// Lazy expiry: an unfilled queue with a rendered interface expires once
    /// its deadline passes. Only the first expiring check reports the handle.
    pub fn check_expiry(&mut self, now: DateTime<Utc>) -> Expiry {
        match self.closed {
            Some(CloseReason::Expired) => return Expiry::Expired,
            Some(_) => return Expiry::Live,
            None => {}
        }

        match &self.interface {
            Some(handle) if !self.is_initialized() && self.timer.expired(now) => {
                let handle = handle.clone();
                self.closed = Some(CloseReason::Expired);
                Expiry::JustExpired(handle)
            }
            _ => Expiry::Live,
        }
    }

    pub fn join<R: Rng + ?Sized>(&mut self, caller: &Caller, rng: &mut R) -> Result<JoinOutcome, DraftError> {
        self.ensure_open()?;
        if !caller.can_access(&self.section.prefix) {
            return Err(DraftError::WrongSection);
        }
        if self.players.contains_key(&caller.id) {
            return Err(DraftError::AlreadyQueued);
        }
        if self.is_initialized() {
            return Err(DraftError::QueueFull);
        }

        if !self.history.contains(&caller.id) {
            self.extend_expiry();
        }

        self.players
            .insert(caller.id.clone(), DraftPlayer::new(caller.name.clone(), false));
        self.history.insert(caller.id.clone());

        match self.admit(rng)? {
            Some(captains) => Ok(JoinOutcome::Initialized(captains)),
            None => Ok(JoinOutcome::Queued {
                remaining: self.remaining(),
            }),
        }
    }

    pub fn leave(&mut self, id: &PlayerId) -> Result<LeaveOutcome, DraftError> {
        self.ensure_open()?;
        if !self.players.contains_key(id) {
            return Err(DraftError::NotQueued);
        }
        if self.is_initialized() {
            return Err(DraftError::AlreadyInitialized);
        }

        let player = self.players.remove(id).ok_or(DraftError::NotQueued)?;
        if !player.is_active() {
            self.num_inactive -= 1;
        }

        Ok(LeaveOutcome {
            name: player.name().to_string(),
            remaining: self.remaining(),
        })
    }

    /// Sub a player out, opening a slot on their team
    pub fn request_sub<R: Rng + ?Sized>(
        &mut self,
        id: &PlayerId,
        rng: &mut R,
    ) -> Result<SubOutOutcome, DraftError> {
        self.ensure_open()?;
        let player = self.players.get(id).ok_or(DraftError::NotQueued)?;
        if !player.is_active() {
            return Err(DraftError::AlreadySubbedOut);
        }

        if let Some(side) = player.captain_of() {
            if captain_candidates(&self.players, side, Some(id)).is_empty() {
                return Err(DraftError::NoCaptainSuccessor);
            }
        }

        let player = self.players.get_mut(id).ok_or(DraftError::NotQueued)?;
        let mut team = None;
        if let Some(process) = self.process.as_mut() {
            if let Some(side) = process.roster_side(id) {
                process.team_mut(side).request_sub(id, player);
                team = Some(side);
            }
        }

        player.deactivate();
        let name = player.name().to_string();
        let sub_count = player.sub_count();
        self.num_inactive += 1;

        let captains = if self.is_initialized() {
            Some(select_captains(&mut self.players, Some(id), rng)?)
        } else {
            None
        };

        Ok(SubOutOutcome {
            name,
            team,
            sub_count,
            captains,
        })
    }

    /// Staff sub-out of another player, with the same accounting as a
    /// self-requested sub
    pub fn force_sub<R: Rng + ?Sized>(
        &mut self,
        caller: &Caller,
        target: &PlayerId,
        rng: &mut R,
    ) -> Result<SubOutOutcome, DraftError> {
        self.ensure_open()?;
        if !caller.can_access(&self.section.prefix) {
            return Err(DraftError::WrongSection);
        }
        if !self.is_initialized() {
            return Err(DraftError::NothingToSub);
        }
        let player = self.players.get(target).ok_or(DraftError::UnknownPlayer)?;
        if !player.is_active() {
            return Err(DraftError::PlayerInactive);
        }

        self.request_sub(target, rng)
    }

    /// Admit a substitute: a returning player or someone new
    pub fn add_sub<R: Rng + ?Sized>(
        &mut self,
        caller: &Caller,
        rng: &mut R,
    ) -> Result<SubInOutcome, DraftError> {
        self.ensure_open()?;
        if !caller.can_access(&self.section.prefix) {
            return Err(DraftError::WrongSection);
        }
        if self.active_count() >= QUEUE_SIZE {
            return Err(DraftError::NoSubsNeeded);
        }

        let started = self.has_started();
        let id = &caller.id;
        let (name, kind) = match self.players.get_mut(id) {
            Some(player) => {
                if player.is_active() {
                    return Err(DraftError::AlreadyQueued);
                }
                if player.sub_count() >= MAX_SUBS {
                    return Err(DraftError::SubLimitReached);
                }

                let seat = self.process.as_ref().and_then(|p| p.bench_side(id));
                if let (Some(side), Some(process)) = (seat, self.process.as_ref()) {
                    if !process.team(side).needs_players() {
                        return Err(DraftError::AlreadyReplaced);
                    }
                }

                player.reactivate(started);
                self.num_inactive -= 1;
                if let (Some(side), Some(process)) = (seat, self.process.as_mut()) {
                    process.team_mut(side).add(id, player);
                }

                (player.name().to_string(), SubInKind::Returning { team: seat })
            }
            None => {
                self.players
                    .insert(id.clone(), DraftPlayer::new(caller.name.clone(), started));
                self.history.insert(id.clone());
                (caller.name.clone(), SubInKind::New)
            }
        };

        let initialized = self.admit(rng)?;
        Ok(SubInOutcome {
            name,
            kind,
            initialized,
        })
    }

    /// A captain gives up captaincy; their team is cleared and redrawn
    pub fn reassign_captain<R: Rng + ?Sized>(
        &mut self,
        id: &PlayerId,
        rng: &mut R,
    ) -> Result<ReassignOutcome, DraftError> {
        self.ensure_open()?;
        let side = self.captain_side(id)?;
        // clearing the team makes its members eligible again, so the current
        // candidate pool is exactly the pool of the redraw
        if captain_candidates(&self.players, side, Some(id)).is_empty() {
            return Err(DraftError::NoCaptainSuccessor);
        }

        let player = self.players.get_mut(id).ok_or(DraftError::NotQueued)?;
        player.clear_captaincy();
        if let Some(process) = self.process.as_mut() {
            process.team_mut(side).clear(&mut self.players);
        }

        let captains = select_captains(&mut self.players, Some(id), rng)?;
        Ok(ReassignOutcome { side, captains })
    }

    pub fn reping(&mut self, id: &PlayerId, now: DateTime<Utc>) -> Result<RepingOutcome, DraftError> {
        self.ensure_open()?;
        if !self.players.contains_key(id) {
            return Err(DraftError::NotQueued);
        }
        if !self.timer.reping_ready(now) {
            return Err(DraftError::CooldownActive {
                until: self.timer.reping_at(),
            });
        }

        let max = QUEUE_SIZE / 2 + 1;
        let remaining = self.remaining();
        if remaining > max {
            return Err(DraftError::TooManyNeeded { max });
        }

        self.timer
            .restart_reping(now, self.settings.reping_cooldown_minutes);
        Ok(RepingOutcome { remaining })
    }

    /// Administrative close; needs a rendered request interface to tear down
    pub fn force_end(&mut self) -> Result<ForceEndOutcome, DraftError> {
        self.ensure_open()?;
        let request_interface = self
            .interface
            .clone()
            .ok_or(DraftError::InterfaceNotRendered)?;

        self.closed = Some(CloseReason::Ended);
        let was_initialized = self.is_initialized();
        let process_interface = self.process.as_mut().and_then(|p| p.take_interface());

        Ok(ForceEndOutcome {
            request_interface,
            process_interface,
            was_initialized,
        })
    }

    // ========== Match ==========

    /// A captain seats a player on their team, seating themselves first if needed
    pub fn pick(&mut self, captain_id: &PlayerId, target: &PlayerId) -> Result<PickOutcome, DraftError> {
        self.ensure_open()?;
        let side = self.captain_side(captain_id)?;
        let process = self.process.as_mut().ok_or(DraftError::NotInitialized)?;

        let target_player = self.players.get(target).ok_or(DraftError::NotQueued)?;
        let membership = target_player.membership().ok_or(DraftError::PlayerInactive)?;
        if target != captain_id && membership != Membership::Unassigned {
            return Err(DraftError::AlreadyOnTeam);
        }

        let team = process.team(side);
        let mut seats = Vec::new();
        if !team.contains(captain_id) {
            seats.push(captain_id.clone());
        }
        if target != captain_id {
            seats.push(target.clone());
        }
        if seats.is_empty() {
            return Err(DraftError::AlreadyOnTeam);
        }
        if seats.len() > team.players_needed() {
            return Err(DraftError::TeamFull);
        }

        let team = process.team_mut(side);
        for id in &seats {
            if let Some(player) = self.players.get_mut(id) {
                team.add(id, player);
            }
        }

        Ok(PickOutcome {
            side,
            seated: seats,
            players_needed: team.players_needed(),
        })
    }

    pub fn start_match(&mut self, captain_id: &PlayerId) -> Result<(), DraftError> {
        self.ensure_open()?;
        self.captain_side(captain_id)?;
        let process = self.process.as_mut().ok_or(DraftError::NotInitialized)?;
        if process.has_started() {
            return Err(DraftError::AlreadyStarted);
        }
        if !process.teams_full() {
            return Err(DraftError::TeamsIncomplete);
        }

        process.start();
        Ok(())
    }

    pub fn adjust_score(
        &mut self,
        captain_id: &PlayerId,
        side: TeamSide,
        change: ScoreChange,
    ) -> Result<ScoreOutcome, DraftError> {
        self.ensure_open()?;
        self.captain_side(captain_id)?;
        let process = self.process.as_mut().ok_or(DraftError::NotInitialized)?;
        if !process.has_started() {
            return Err(DraftError::NotStarted);
        }

        match change {
            ScoreChange::Increment => process.team_mut(side).increment_score(),
            ScoreChange::Decrement => process.team_mut(side).decrement_score(),
        }

        Ok(ScoreOutcome {
            team1: process.team(TeamSide::One).score(),
            team2: process.team(TeamSide::Two).score(),
        })
    }

    /// Close a started match and hand back both final rosters
    pub fn finish(&mut self, captain_id: &PlayerId) -> Result<FinishOutcome, DraftError> {
        self.ensure_open()?;
        self.captain_side(captain_id)?;
        let process = self.process.as_mut().ok_or(DraftError::NotInitialized)?;
        if !process.has_started() {
            return Err(DraftError::NotStarted);
        }

        let process_interface = process.take_interface();
        let results = TeamSide::ALL
            .into_iter()
            .map(|side| {
                let team = process.team(side);
                let roster = team
                    .members()
                    .iter()
                    .filter_map(|id| {
                        self.players.get(id).map(|p| RosterEntry {
                            id: id.clone(),
                            name: p.name().to_string(),
                            is_sub: p.is_sub(),
                        })
                    })
                    .collect();
                TeamResult {
                    side,
                    score: team.score(),
                    roster,
                }
            })
            .collect();

        self.closed = Some(CloseReason::Finished);
        Ok(FinishOutcome {
            results,
            request_interface: self.interface.clone(),
            process_interface,
        })
    }

    // ========== Rendering ==========

    /// Section ping with the number of players still needed
    pub fn ping(&self) -> String {
        let needed = if self.has_started() { 0 } else { self.remaining() };
        format!("{} +{}", self.section.role_mention(), needed)
    }

    /// Caption of the request interface
    pub fn caption(&self) -> String {
        if self.active_count() == QUEUE_SIZE || !self.has_started() {
            self.ping()
        } else {
            format!("{}   // {} sub(s) needed", self.ping(), self.remaining())
        }
    }

    /// Queue report: players, subs and either the notice or the deadline
    pub fn summary(&self) -> Summary {
        let mut players = String::new();
        let mut subs = String::new();
        for player in self.players.values() {
            if !player.is_active() {
                subs.push_str(&format!("{} (inactive)\n", player.name()));
            } else if player.is_sub() {
                subs.push_str(&format!("{}\n", player.name()));
            } else if player.is_captain() {
                players.push_str(&format!("{} (captain)\n", player.name()));
            } else {
                players.push_str(&format!("{}\n", player.name()));
            }
        }

        let mut summary =
            Summary::new(format!("Draft Queue {}", self.key.number)).field("Players:", players);
        if !subs.is_empty() {
            summary = summary.field("Subs:", subs);
        }

        if self.is_initialized() {
            summary.field(
                "Notice:",
                format!(
                    "Go to (the pinged) #{} to begin the draft. Use this interface \
                     to sub out as needed. Before you sub out, make sure you got \
                     your points in the draft chat!",
                    self.chat_channel
                ),
            )
        } else {
            summary.field(
                "Expiration:",
                self.timer.expires_at().format("%H:%M UTC").to_string(),
            )
        }
    }

    /// Comma-separated player names, for operator logs
    pub fn roster_names(&self) -> String {
        self.players
            .values()
            .map(|p| p.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ========== Internals ==========

    fn ensure_open(&self) -> Result<(), DraftError> {
        match self.closed {
            Some(reason) => Err(DraftError::Closed(reason)),
            None => Ok(()),
        }
    }

    fn captain_side(&self, id: &PlayerId) -> Result<TeamSide, DraftError> {
        let player = self.players.get(id).ok_or(DraftError::NotQueued)?;
        player.captain_of().ok_or(DraftError::NotCaptain)
    }

    /// Expiry bump for a first-time joiner, tiered on the queue size before insert
    fn extend_expiry(&mut self) {
        let queued = self.players.len();
        if queued == QUEUE_SIZE - 2 {
            self.timer.extend(self.settings.late_extension_minutes);
        } else if queued >= QUEUE_SIZE / 2 - 1 {
            self.timer.extend(self.settings.extension_minutes);
        }
    }

    /// Initialize once the active count reaches a full queue
    fn admit<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<Captains>, DraftError> {
        if self.is_initialized() || self.active_count() < QUEUE_SIZE {
            return Ok(None);
        }

        let captains = select_captains(&mut self.players, None, rng)?;
        self.process = Some(DraftProcess::new());
        Ok(Some(captains))
    }
}
