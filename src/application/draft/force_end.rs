use tracing::info;

use super::context::{DraftActionError, DraftCommand, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::entities::DraftError;
use crate::domain::value_objects::Audience;

/// Final caption of a force-ended draft's request interface
pub const FORCE_ENDED_TEXT: &str = "This draft has forcibly ended.";

/// Force end use case: administrative close of a draft
pub struct ForceEnd {
    ctx: DraftContext,
}

impl ForceEnd {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, _, _| {
                if !input.caller.can_access(&draft.section().prefix) {
                    return Err(DraftError::WrongSection);
                }
                let out = draft.force_end()?;

                let mut notices = vec![Notice::Disable {
                    handle: out.request_interface,
                    text: FORCE_ENDED_TEXT.to_string(),
                }];
                if let Some(handle) = out.process_interface {
                    notices.push(Notice::Delete(handle));
                }
                if out.was_initialized {
                    notices.push(Notice::Text(
                        Audience::DraftChat(draft.chat_channel().to_string()),
                        "The draft has been ended by staff. Sorry about the early stop! \
                         Feel free to request a new one!"
                            .to_string(),
                    ));
                }
                Ok((notices, DraftSnapshot::of(draft)))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;
        info!("A draft was forcibly ended by {}.", input.caller.name);

        Ok(DraftActionOutput {
            message: "The draft has been ended.".to_string(),
            snapshot,
            delivery,
        })
    }
}
