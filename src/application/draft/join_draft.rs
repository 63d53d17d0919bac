use tracing::info;

use super::context::{
    caption_edit, display_name, report, Delivery, DraftActionError, DraftCommand, DraftContext,
    InterfaceSlot, Notice,
};
use super::get_draft::DraftSnapshot;
use crate::domain::entities::{Draft, JoinOutcome, TeamSide};
use crate::domain::services::Captains;
use crate::domain::value_objects::{Audience, DraftKey, InterfaceButton, InterfaceHandle};

/// Result shared by the draft commands
#[derive(Debug)]
pub struct DraftActionOutput {
    /// Reply for the caller
    pub message: String,
    pub snapshot: DraftSnapshot,
    pub delivery: Delivery,
}

/// Everything needed to announce a queue that just filled
pub(super) struct FullQueue {
    key: DraftKey,
    label: String,
    section: String,
    chat: String,
    caption: String,
    old_interface: Option<InterfaceHandle>,
    captains: (String, String),
    roster: String,
    report: Notice,
}

impl FullQueue {
    pub(super) fn capture(draft: &Draft, captains: &Captains) -> Self {
        Self {
            key: draft.key().clone(),
            label: draft.section().label(),
            section: draft.section().prefix.clone(),
            chat: draft.chat_channel().to_string(),
            caption: draft.caption(),
            old_interface: draft.interface().cloned(),
            captains: (
                display_name(draft, captains.of(TeamSide::One)),
                display_name(draft, captains.of(TeamSide::Two)),
            ),
            roster: draft.roster_names(),
            report: report(draft),
        }
    }

    /// Retire the request interface, post the full-queue and match
    /// interfaces, and point everyone at the draft chat
    pub(super) async fn announce(self, ctx: &DraftContext) -> Delivery {
        let mut delivery = Delivery::default();
        if let Some(handle) = &self.old_interface {
            delivery.merge(
                ctx.dispatch(vec![Notice::Disable {
                    handle: handle.clone(),
                    text: self.caption.clone(),
                }])
                .await,
            );
        }

        delivery.merge(
            ctx.render(
                &self.key,
                InterfaceSlot::Request,
                Audience::Section(self.section.clone()),
                &self.caption,
                &InterfaceButton::QUEUE_FULL,
            )
            .await,
        );

        let (team1, team2) = &self.captains;
        delivery.merge(
            ctx.render(
                &self.key,
                InterfaceSlot::Process,
                Audience::DraftChat(self.chat.clone()),
                &format!("Team 1 captain: {} | Team 2 captain: {}", team1, team2),
                &InterfaceButton::PROCESS,
            )
            .await,
        );

        delivery.merge(
            ctx.dispatch(vec![
                Notice::Text(
                    Audience::Section(self.section.clone()),
                    format!("The queue is full! Go to #{} to begin the draft.", self.chat),
                ),
                Notice::Text(
                    Audience::DraftChat(self.chat.clone()),
                    format!("{} and {} are the captains. Pick your teams!", team1, team2),
                ),
                self.report,
            ])
            .await,
        );

        info!("A {} draft was started with {}.", self.label, self.roster);
        delivery
    }
}

/// Join draft use case
pub struct JoinDraft {
    ctx: DraftContext,
}

impl JoinDraft {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (message, notices, full, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, rng, _| {
                let outcome = draft.join(&input.caller, rng)?;
                let snapshot = DraftSnapshot::of(draft);

                Ok(match outcome {
                    JoinOutcome::Queued { remaining } => (
                        format!("You have joined the draft! {} more needed.", remaining),
                        caption_edit(draft, &[])
                            .into_iter()
                            .chain([report(draft)])
                            .collect::<Vec<_>>(),
                        None,
                        snapshot,
                    ),
                    JoinOutcome::Initialized(captains) => (
                        format!(
                            "You have joined the draft! The queue is full, head to #{}.",
                            draft.chat_channel()
                        ),
                        Vec::new(),
                        Some(FullQueue::capture(draft, &captains)),
                        snapshot,
                    ),
                })
            })
            .await?;

        let mut delivery = self.ctx.dispatch(notices).await;
        if let Some(full) = full {
            delivery.merge(full.announce(&self.ctx).await);
        }

        Ok(DraftActionOutput {
            message,
            snapshot,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::draft::GetDraft;
    use crate::application::testing::{command, open_with, test_context, test_context_with};
    use crate::domain::entities::DraftStatus;
    use crate::infrastructure::services::{MockNotifier, NotifierCall};

    #[tokio::test]
    async fn test_join_edits_caption() {
        let tc = test_context();
        let key = open_with(&tc, 0).await;
        tc.notifier.clear();

        let out = JoinDraft::new(tc.ctx.clone())
            .execute(command(&key, "p1"))
            .await
            .unwrap();

        assert_eq!(out.message, "You have joined the draft! 6 more needed.");
        assert!(tc.notifier.calls().iter().any(|call| matches!(
            call,
            NotifierCall::Edit { caption, .. } if caption == "@LaunchPoint +6"
        )));
    }

    #[tokio::test]
    async fn test_eighth_join_announces_full_queue() {
        let tc = test_context();
        let key = open_with(&tc, 6).await;
        tc.notifier.clear();

        JoinDraft::new(tc.ctx.clone())
            .execute(command(&key, "p7"))
            .await
            .unwrap();

        let calls = tc.notifier.calls();
        assert!(matches!(&calls[0], NotifierCall::Disable { .. }));
        assert!(calls.iter().any(|call| matches!(
            call,
            NotifierCall::Render { buttons, .. } if buttons == &InterfaceButton::QUEUE_FULL.to_vec()
        )));
        assert!(calls.iter().any(|call| matches!(
            call,
            NotifierCall::Render { audience: Audience::DraftChat(chat), .. } if chat == "lp-draft-chat-1"
        )));
        assert!(tc
            .notifier
            .texts()
            .contains(&"The queue is full! Go to #lp-draft-chat-1 to begin the draft.".to_string()));

        let snapshot = GetDraft::new(tc.ctx.clone()).execute(&key).await.unwrap();
        assert_eq!(snapshot.status, DraftStatus::Initialized);
        assert!(snapshot.interface.is_some());
        assert!(snapshot.process_interface.is_some());
        assert!(snapshot.captains.team1.is_some() && snapshot.captains.team2.is_some());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_joins_initialize_once() {
        let tc = test_context();
        let key = open_with(&tc, 5).await;
        tc.notifier.clear();

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let ctx = tc.ctx.clone();
                let cmd = command(&key, &format!("late{}", i));
                tokio::spawn(async move { JoinDraft::new(ctx).execute(cmd).await })
            })
            .collect();

        let mut joined = 0;
        let mut initialized = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(out) => {
                    joined += 1;
                    if out.message.contains("The queue is full") {
                        initialized += 1;
                    }
                }
                Err(e) => assert!(matches!(
                    e,
                    DraftActionError::Rejected(crate::domain::entities::DraftError::QueueFull)
                )),
            }
        }

        assert_eq!(joined, 2);
        assert_eq!(initialized, 1);
        let process_renders = tc
            .notifier
            .calls()
            .iter()
            .filter(|call| matches!(
                call,
                NotifierCall::Render { buttons, .. } if buttons == &InterfaceButton::PROCESS.to_vec()
            ))
            .count();
        assert_eq!(process_renders, 1);

        let snapshot = GetDraft::new(tc.ctx.clone()).execute(&key).await.unwrap();
        assert_eq!(snapshot.active_count, 8);
        assert_eq!(snapshot.num_inactive, 0);
        assert_eq!(snapshot.status, DraftStatus::Initialized);
    }

    #[tokio::test]
    async fn test_failed_delivery_keeps_transition() {
        let tc = test_context_with(MockNotifier::failing());
        let key = open_with(&tc, 0).await;

        let out = JoinDraft::new(tc.ctx.clone())
            .execute(command(&key, "p1"))
            .await
            .unwrap();

        assert!(!out.delivery.is_complete());
        assert_eq!(out.snapshot.active_count, 2);
        assert!(out.snapshot.interface.is_none());
    }
}
