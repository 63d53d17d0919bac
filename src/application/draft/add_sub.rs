use super::context::{caption_edit, report, DraftActionError, DraftCommand, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::{DraftActionOutput, FullQueue};
use crate::domain::entities::SubInKind;
use crate::domain::value_objects::Audience;

/// Add sub use case: a returning player or a newcomer fills an open slot
pub struct AddSub {
    ctx: DraftContext,
}

impl AddSub {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (notices, full, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, rng, _| {
                let was_initialized = draft.is_initialized();
                let out = draft.add_sub(&input.caller, rng)?;

                if let Some(captains) = &out.initialized {
                    let full = FullQueue::capture(draft, captains);
                    return Ok((Vec::new(), Some(full), DraftSnapshot::of(draft)));
                }

                let mut notices: Vec<_> = caption_edit(draft, &[]).into_iter().collect();
                if was_initialized {
                    let text = match out.kind {
                        SubInKind::Returning { .. } => {
                            format!("`{}` will be coming back to sub!", out.name)
                        }
                        SubInKind::New => format!("`{}` will be subbing!", out.name),
                    };
                    notices.push(Notice::Text(
                        Audience::DraftChat(draft.chat_channel().to_string()),
                        text,
                    ));
                }
                notices.push(report(draft));
                Ok((notices, None, DraftSnapshot::of(draft)))
            })
            .await?;

        let mut delivery = self.ctx.dispatch(notices).await;
        if let Some(full) = full {
            delivery.merge(full.announce(&self.ctx).await);
        }

        Ok(DraftActionOutput {
            message: "You have joined the draft as a sub!".to_string(),
            snapshot,
            delivery,
        })
    }
}
