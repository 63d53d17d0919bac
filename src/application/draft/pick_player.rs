use super::context::{display_name, DraftActionError, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::entities::PlayerId;
use crate::domain::value_objects::{Audience, Caller, DraftKey};

/// Pick player input
pub struct PickPlayerInput {
    pub key: DraftKey,
    pub caller: Caller,
    pub target: PlayerId,
}

/// Pick player use case: a captain seats a player on their team
pub struct PickPlayer {
    ctx: DraftContext,
}

impl PickPlayer {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: PickPlayerInput) -> Result<DraftActionOutput, DraftActionError> {
        let (message, notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, _, _| {
                let out = draft.pick(&input.caller.id, &input.target)?;
                let target = display_name(draft, &input.target);

                let notices = vec![Notice::Text(
                    Audience::DraftChat(draft.chat_channel().to_string()),
                    format!(
                        "`{}` picked `{}` for Team {}.",
                        input.caller.name,
                        target,
                        out.side.number()
                    ),
                )];
                let message = format!(
                    "Picked {}. Team {} needs {} more.",
                    target,
                    out.side.number(),
                    out.players_needed
                );
                Ok((message, notices, DraftSnapshot::of(draft)))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;
        Ok(DraftActionOutput {
            message,
            snapshot,
            delivery,
        })
    }
}
