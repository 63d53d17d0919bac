use super::context::{display_name, report, DraftActionError, DraftCommand, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::value_objects::Audience;

/// Reassign captain use case: a captain steps down and a new one is drawn
pub struct ReassignCaptain {
    ctx: DraftContext,
}

impl ReassignCaptain {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, rng, _| {
                let out = draft.reassign_captain(&input.caller.id, rng)?;
                let successor = display_name(draft, out.captains.of(out.side));

                let notices = vec![
                    Notice::Text(
                        Audience::DraftChat(draft.chat_channel().to_string()),
                        format!(
                            "`{}` is no longer a captain. `{}` is the new captain of Team {}.",
                            input.caller.name,
                            successor,
                            out.side.number()
                        ),
                    ),
                    report(draft),
                ];
                Ok((notices, DraftSnapshot::of(draft)))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;
        Ok(DraftActionOutput {
            message: "You are no longer a captain.".to_string(),
            snapshot,
            delivery,
        })
    }
}
