use serde::Serialize;

use super::context::{DraftActionError, DraftContext};
use crate::domain::entities::{Draft, DraftStatus, Membership, TeamSide};
use crate::domain::value_objects::DraftKey;

/// Read-only view of one draft
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSnapshot {
    pub key: String,
    pub section: String,
    pub number: u32,
    pub status: DraftStatus,
    pub caption: String,
    pub players: Vec<PlayerView>,
    pub active_count: usize,
    pub num_inactive: usize,
    pub remaining: usize,
    pub captains: CaptainsView,
    pub teams: Vec<TeamView>,
    pub expires_at: String,
    pub reping_at: String,
    pub chat_channel: String,
    pub interface: Option<String>,
    pub process_interface: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub is_sub: bool,
    pub sub_count: u8,
    pub membership: Option<Membership>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptainsView {
    pub team1: Option<String>,
    pub team2: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub team: u8,
    pub members: Vec<String>,
    pub players_needed: usize,
    pub score: i32,
}

impl DraftSnapshot {
    pub fn of(draft: &Draft) -> Self {
        let players = draft
            .players()
            .iter()
            .map(|(id, p)| PlayerView {
                id: id.to_string(),
                name: p.name().to_string(),
                active: p.is_active(),
                is_sub: p.is_sub(),
                sub_count: p.sub_count(),
                membership: p.membership(),
            })
            .collect();

        let teams = draft
            .process()
            .map(|process| {
                TeamSide::ALL
                    .into_iter()
                    .map(|side| {
                        let team = process.team(side);
                        TeamView {
                            team: side.number(),
                            members: team.members().iter().map(|id| id.to_string()).collect(),
                            players_needed: team.players_needed(),
                            score: team.score(),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            key: draft.key().to_string(),
            section: draft.section().prefix.clone(),
            number: draft.key().number,
            status: draft.status(),
            caption: draft.caption(),
            players,
            active_count: draft.active_count(),
            num_inactive: draft.num_inactive(),
            remaining: draft.remaining(),
            captains: CaptainsView {
                team1: draft.captain(TeamSide::One).map(|id| id.to_string()),
                team2: draft.captain(TeamSide::Two).map(|id| id.to_string()),
            },
            teams,
            expires_at: draft.timer().expires_at().to_rfc3339(),
            reping_at: draft.timer().reping_at().to_rfc3339(),
            chat_channel: draft.chat_channel().to_string(),
            interface: draft.interface().map(|h| h.to_string()),
            process_interface: draft
                .process()
                .and_then(|p| p.interface())
                .map(|h| h.to_string()),
            created_at: draft.created_at().to_rfc3339(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(
            self.status,
            DraftStatus::Open | DraftStatus::Initialized | DraftStatus::Started
        )
    }
}

/// Get draft use case (runs the lazy expiry check)
pub struct GetDraft {
    ctx: DraftContext,
}

impl GetDraft {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, key: &DraftKey) -> Result<DraftSnapshot, DraftActionError> {
        self.ctx
            .with_draft(key, |draft, _, _| Ok(DraftSnapshot::of(draft)))
            .await
    }
}

/// List the live drafts of a section
pub struct ListDrafts {
    ctx: DraftContext,
}

impl ListDrafts {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, section: &str) -> Result<Vec<DraftSnapshot>, DraftActionError> {
        let section = self.ctx.section(section)?;
        let mut drafts = Vec::new();

        for shared in self.ctx.registry.list(&section.prefix).await {
            let key = shared.lock().await.key().clone();
            match GetDraft::new(self.ctx.clone()).execute(&key).await {
                Ok(snapshot) if snapshot.is_live() => drafts.push(snapshot),
                Ok(_) | Err(DraftActionError::Expired) => {}
                Err(e) => return Err(e),
            }
        }

        // the walk above closes stale drafts, so they can go now
        self.ctx.registry.sweep(&section.prefix).await;
        Ok(drafts)
    }
}
