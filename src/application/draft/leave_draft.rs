use super::context::{caption_edit, report, DraftActionError, DraftCommand, DraftContext};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;

/// Leave draft use case (only before the queue fills)
pub struct LeaveDraft {
    ctx: DraftContext,
}

impl LeaveDraft {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, _, _| {
                draft.leave(&input.caller.id)?;

                let mut notices: Vec<_> = caption_edit(draft, &[]).into_iter().collect();
                notices.push(report(draft));
                Ok((notices, DraftSnapshot::of(draft)))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;
        Ok(DraftActionOutput {
            message: "You have left the draft.".to_string(),
            snapshot,
            delivery,
        })
    }
}
