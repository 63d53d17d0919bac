use super::context::{report, Delivery, DraftActionError, DraftCommand, DraftContext, InterfaceSlot, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::entities::DraftError;
use crate::domain::value_objects::{Audience, InterfaceButton, InterfaceHandle};

struct RefreshPlan {
    section: String,
    chat: String,
    caption: String,
    interface: Option<InterfaceHandle>,
    initialized: bool,
    process_missing: bool,
    process_caption: String,
    report: Notice,
    snapshot: DraftSnapshot,
}

/// Refresh use case: re-render whatever interface is missing and repost the report
pub struct RefreshDraft {
    ctx: DraftContext,
}

impl RefreshDraft {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let plan = self
            .ctx
            .with_draft(&input.key, |draft, _, _| {
                if let Some(reason) = draft.closed() {
                    return Err(DraftError::Closed(reason));
                }

                let process = draft.process();
                Ok(RefreshPlan {
                    section: draft.section().prefix.clone(),
                    chat: draft.chat_channel().to_string(),
                    caption: draft.caption(),
                    interface: draft.interface().cloned(),
                    initialized: draft.is_initialized(),
                    process_missing: process.is_some_and(|p| p.interface().is_none()),
                    process_caption: format!("Draft Queue {}", draft.key().number),
                    report: report(draft),
                    snapshot: DraftSnapshot::of(draft),
                })
            })
            .await?;

        let mut delivery = Delivery::default();
        match &plan.interface {
            Some(handle) => {
                delivery.merge(
                    self.ctx
                        .dispatch(vec![Notice::Edit {
                            handle: handle.clone(),
                            caption: plan.caption.clone(),
                            disabled: Vec::new(),
                        }])
                        .await,
                );
            }
            None => {
                let buttons: &[InterfaceButton] = if plan.initialized {
                    &InterfaceButton::QUEUE_FULL
                } else {
                    &InterfaceButton::REQUEST
                };
                delivery.merge(
                    self.ctx
                        .render(
                            &input.key,
                            InterfaceSlot::Request,
                            Audience::Section(plan.section.clone()),
                            &plan.caption,
                            buttons,
                        )
                        .await,
                );
            }
        }

        if plan.process_missing {
            delivery.merge(
                self.ctx
                    .render(
                        &input.key,
                        InterfaceSlot::Process,
                        Audience::DraftChat(plan.chat.clone()),
                        &plan.process_caption,
                        &InterfaceButton::PROCESS,
                    )
                    .await,
            );
        }
        delivery.merge(self.ctx.dispatch(vec![plan.report]).await);

        Ok(DraftActionOutput {
            message: "The draft has been refreshed.".to_string(),
            snapshot: plan.snapshot,
            delivery,
        })
    }
}
