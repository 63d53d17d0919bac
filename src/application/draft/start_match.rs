use super::context::{caption_edit, DraftActionError, DraftCommand, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::value_objects::Audience;

/// Start match use case
pub struct StartMatch {
    ctx: DraftContext,
}

impl StartMatch {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, _, _| {
                draft.start_match(&input.caller.id)?;

                let mut notices = vec![Notice::Text(
                    Audience::DraftChat(draft.chat_channel().to_string()),
                    "The match has started! Good luck!".to_string(),
                )];
                notices.extend(caption_edit(draft, &[]));
                Ok((notices, DraftSnapshot::of(draft)))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;
        Ok(DraftActionOutput {
            message: "The match has started!".to_string(),
            snapshot,
            delivery,
        })
    }
}
