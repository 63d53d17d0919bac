use super::context::{
    caption_edit, display_name, report, DraftActionError, DraftCommand, DraftContext, Notice,
};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::entities::MAX_SUBS;
use crate::domain::value_objects::Audience;

/// Request sub use case: the caller steps out and a replacement is pinged
pub struct RequestSub {
    ctx: DraftContext,
}

impl RequestSub {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (message, notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, rng, _| {
                let captained = draft
                    .player(&input.caller.id)
                    .and_then(|p| p.captain_of());
                let out = draft.request_sub(&input.caller.id, rng)?;

                let mut notices: Vec<_> = caption_edit(draft, &[]).into_iter().collect();
                if draft.is_initialized() {
                    let chat = Audience::DraftChat(draft.chat_channel().to_string());
                    notices.push(Notice::Text(
                        Audience::Section(draft.section().prefix.clone()),
                        format!("{} +1 (sub)", draft.section().role_mention()),
                    ));
                    notices.push(Notice::Text(
                        chat.clone(),
                        format!("`{}` has been subbed out.", out.name),
                    ));

                    if let (Some(side), Some(captains)) = (captained, &out.captains) {
                        notices.push(Notice::Text(
                            chat,
                            format!(
                                "`{}` is the new captain of Team {}.",
                                display_name(draft, captains.of(side)),
                                side.number()
                            ),
                        ));
                    }
                }
                notices.push(report(draft));

                let left = MAX_SUBS.saturating_sub(out.sub_count);
                let message = format!(
                    "You have been subbed out. You can sub back in {} more time(s).",
                    left
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
