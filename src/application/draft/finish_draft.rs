use std::sync::Arc;

use tracing::{info, warn};

use super::context::{Delivery, DraftActionError, DraftCommand, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use crate::application::report::{ReportMatch, ReportMatchInput, ReportMatchOutput, ReportStatus};
use crate::domain::entities::{PlayerId, TeamResult};
use crate::domain::repositories::LedgerRepository;
use crate::domain::services::ReportKind;
use crate::domain::value_objects::{Audience, Section, Summary};

/// Final caption of a finished draft's request interface
pub const FINISHED_TEXT: &str = "This draft has finished.";

/// Finish draft output
#[derive(Debug)]
pub struct FinishDraftOutput {
    pub message: String,
    pub snapshot: DraftSnapshot,
    pub delivery: Delivery,
    pub reports: Vec<ReportMatchOutput>,
    /// False when a ledger report failed or came back incomplete
    pub ledger_complete: bool,
}

/// Finish draft use case: close a started match and record it in the ledger
pub struct FinishDraft<L: LedgerRepository> {
    ctx: DraftContext,
    ledger: Arc<L>,
}

impl<L: LedgerRepository> FinishDraft<L> {
    pub fn new(ctx: DraftContext, ledger: Arc<L>) -> Self {
        Self { ctx, ledger }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<FinishDraftOutput, DraftActionError> {
        let (section, results, notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, _, _| {
                let out = draft.finish(&input.caller.id)?;

                let mut notices = Vec::new();
                if let Some(handle) = out.process_interface {
                    notices.push(Notice::Delete(handle));
                }
                if let Some(handle) = out.request_interface {
                    notices.push(Notice::Disable {
                        handle,
                        text: FINISHED_TEXT.to_string(),
                    });
                }
                notices.push(Notice::Summary(
                    Audience::DraftChat(draft.chat_channel().to_string()),
                    results_summary(draft.key().number, &out.results),
                ));

                Ok((
                    draft.section().clone(),
                    out.results,
                    notices,
                    DraftSnapshot::of(draft),
                ))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;

        let games_played = results.iter().map(|r| r.score.max(0) as u32).sum::<u32>();
        let (reports, ledger_complete) = if games_played == 0 {
            info!("A {} draft finished without games; nothing to record.", section.label());
            (Vec::new(), true)
        } else {
            self.record(&section, &results, games_played).await
        };

        let line = score_line(&results);
        info!("A {} draft has finished. {}", section.label(), line);

        Ok(FinishDraftOutput {
            message: format!("The draft has finished. {}", line),
            snapshot,
            delivery,
            reports,
            ledger_complete,
        })
    }

    /// One report per team and kind: regulars as a full set, subs as games only
    async fn record(
        &self,
        section: &Section,
        results: &[TeamResult],
        games_played: u32,
    ) -> (Vec<ReportMatchOutput>, bool) {
        let mut reports = Vec::new();
        let mut complete = true;

        for result in results {
            for kind in [ReportKind::Cycle, ReportKind::Sub] {
                let players: Vec<(PlayerId, String)> = result
                    .roster
                    .iter()
                    .filter(|entry| entry.is_sub == (kind == ReportKind::Sub))
                    .map(|entry| (entry.id.clone(), entry.name.clone()))
                    .collect();
                if players.is_empty() {
                    continue;
                }

                let report = ReportMatch::new(self.ledger.clone())
                    .execute(ReportMatchInput {
                        section: section.clone(),
                        kind,
                        games_played,
                        games_won: result.score.max(0) as u32,
                        players,
                    })
                    .await;

                match report {
                    Ok(output) => {
                        complete &= output.status == ReportStatus::Complete;
                        reports.push(output);
                    }
                    Err(e) => {
                        warn!("Could not record Team {} results: {}", result.side.number(), e);
                        complete = false;
                    }
                }
            }
        }

        (reports, complete)
    }
}

fn score_line(results: &[TeamResult]) -> String {
    let scores: Vec<String> = results
        .iter()
        .map(|r| format!("Team {}: {}", r.side.number(), r.score))
        .collect();
    scores.join(" | ")
}

fn results_summary(number: u32, results: &[TeamResult]) -> Summary {
    results.iter().fold(
        Summary::new(format!("Draft Queue {} Results", number)),
        |summary, result| {
            let roster = result
                .roster
                .iter()
                .map(|entry| {
                    if entry.is_sub {
                        format!("{} (sub)", entry.name)
                    } else {
                        entry.name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            summary.field(
                format!("Team {} ({})", result.side.number(), result.score),
                roster,
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::draft::{
        AdjustScore, AdjustScoreInput, GetDraft, PickPlayer, PickPlayerInput, StartMatch,
    };
    use crate::application::testing::{caller, command, open_with, test_context, InMemoryLedger};
    use crate::domain::entities::{DraftStatus, Membership, ScoreChange, TeamSide};
    use crate::domain::value_objects::DraftKey;

    /// Fill both rosters and start the match; returns the two captains
    async fn started_match(tc: &crate::application::testing::TestContext, key: &DraftKey) -> (String, String) {
        let snapshot = GetDraft::new(tc.ctx.clone()).execute(key).await.unwrap();
        let c1 = snapshot.captains.team1.clone().unwrap();
        let c2 = snapshot.captains.team2.clone().unwrap();
        let free: Vec<String> = snapshot
            .players
            .iter()
            .filter(|p| p.membership == Some(Membership::Unassigned))
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(free.len(), 6);

        for (i, target) in free.iter().enumerate() {
            let captain = if i % 2 == 0 { &c1 } else { &c2 };
            PickPlayer::new(tc.ctx.clone())
                .execute(PickPlayerInput {
                    key: key.clone(),
                    caller: caller(captain),
                    target: PlayerId::new(target.as_str()),
                })
                .await
                .unwrap();
        }
        StartMatch::new(tc.ctx.clone())
            .execute(command(key, &c1))
            .await
            .unwrap();
        (c1, c2)
    }

    async fn score(tc: &crate::application::testing::TestContext, key: &DraftKey, captain: &str, side: TeamSide) {
        AdjustScore::new(tc.ctx.clone())
            .execute(AdjustScoreInput {
                key: key.clone(),
                caller: caller(captain),
                side,
                change: ScoreChange::Increment,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_finish_records_both_teams() {
        let tc = test_context();
        let key = open_with(&tc, 7).await;
        let (c1, c2) = started_match(&tc, &key).await;
        score(&tc, &key, &c1, TeamSide::One).await;
        score(&tc, &key, &c1, TeamSide::One).await;
        score(&tc, &key, &c2, TeamSide::Two).await;
        let ledger = Arc::new(InMemoryLedger::new());

        let out = FinishDraft::new(tc.ctx.clone(), ledger.clone())
            .execute(command(&key, &c2))
            .await
            .unwrap();

        assert_eq!(out.snapshot.status, DraftStatus::Finished);
        assert!(out.ledger_complete);
        assert_eq!(out.reports.len(), 2);
        assert!(tc.notifier.disabled().contains(&FINISHED_TEXT.to_string()));

        let winner = ledger.values("lp_current_cycle", &PlayerId::new(c1.as_str())).unwrap();
        assert_eq!((winner.set_wins, winner.games_won, winner.games_lost), (1, 2, 1));
        let loser = ledger.values("lp_current_cycle", &PlayerId::new(c2.as_str())).unwrap();
        assert_eq!((loser.set_losses, loser.games_won, loser.games_lost), (1, 1, 2));
    }

    #[tokio::test]
    async fn test_finish_without_games_records_nothing() {
        let tc = test_context();
        let key = open_with(&tc, 7).await;
        let (c1, _) = started_match(&tc, &key).await;
        let ledger = Arc::new(InMemoryLedger::new().failing_reads());

        let out = FinishDraft::new(tc.ctx.clone(), ledger)
            .execute(command(&key, &c1))
            .await
            .unwrap();

        assert!(out.reports.is_empty());
        assert!(out.ledger_complete);
    }

    #[tokio::test]
    async fn test_finish_reports_unavailable_ledger() {
        let tc = test_context();
        let key = open_with(&tc, 7).await;
        let (c1, _) = started_match(&tc, &key).await;
        score(&tc, &key, &c1, TeamSide::One).await;

        let out = FinishDraft::new(tc.ctx.clone(), Arc::new(InMemoryLedger::new().failing_reads()))
            .execute(command(&key, &c1))
            .await
            .unwrap();

        assert!(!out.ledger_complete);
        assert_eq!(out.snapshot.status, DraftStatus::Finished);
    }
}
