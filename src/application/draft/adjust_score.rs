use super::context::{DraftActionError, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::entities::{ScoreChange, TeamSide};
use crate::domain::value_objects::{Audience, Caller, DraftKey};

/// Adjust score input
pub struct AdjustScoreInput {
    pub key: DraftKey,
    pub caller: Caller,
    pub side: TeamSide,
    pub change: ScoreChange,
}

/// Adjust score use case: a captain moves one team's score by one game
pub struct AdjustScore {
    ctx: DraftContext,
}

impl AdjustScore {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: AdjustScoreInput) -> Result<DraftActionOutput, DraftActionError> {
        let (score_line, notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, _, _| {
                let score = draft.adjust_score(&input.caller.id, input.side, input.change)?;
                let line = format!("Score: Team 1 {} - {} Team 2", score.team1, score.team2);

                let mut notices = vec![Notice::Text(
                    Audience::DraftChat(draft.chat_channel().to_string()),
                    line.clone(),
                )];
                if let Some(handle) = draft.process().and_then(|p| p.interface()) {
                    notices.push(Notice::Edit {
                        handle: handle.clone(),
                        caption: line.clone(),
                        disabled: Vec::new(),
                    });
                }
                Ok((line, notices, DraftSnapshot::of(draft)))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;
        Ok(DraftActionOutput {
            message: score_line,
            snapshot,
            delivery,
        })
    }
}
