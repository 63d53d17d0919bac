use tracing::info;

use super::context::{report, Delivery, DraftActionError, DraftContext, InterfaceSlot};
use super::get_draft::DraftSnapshot;
use crate::domain::entities::DraftError;
use crate::domain::value_objects::{Audience, Caller, DraftKey, InterfaceButton};

/// Open draft input
pub struct OpenDraftInput {
    pub section: String,
    pub caller: Caller,
}

/// Open draft output
pub struct OpenDraftOutput {
    pub key: DraftKey,
    pub snapshot: DraftSnapshot,
    pub delivery: Delivery,
}

/// Open draft use case: a new queue with the caller as first player
pub struct OpenDraft {
    ctx: DraftContext,
}

impl OpenDraft {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: OpenDraftInput) -> Result<OpenDraftOutput, DraftActionError> {
        let section = self.ctx.section(&input.section)?;
        if !input.caller.can_access(&section.prefix) {
            return Err(DraftError::WrongSection.into());
        }

        let now = self.ctx.clock.now();
        let (number, _) = self
            .ctx
            .registry
            .open(&section.prefix, now)
            .await
            .ok_or_else(|| DraftActionError::SectionNotFound(section.prefix.clone()))?;
        let key = DraftKey::new(section.prefix.clone(), number);

        let (caption, summary) = self
            .ctx
            .with_draft(&key, |draft, rng, _| {
                draft.join(&input.caller, rng)?;
                Ok((draft.caption(), report(draft)))
            })
            .await?;

        let mut delivery = self
            .ctx
            .render(
                &key,
                InterfaceSlot::Request,
                Audience::Section(section.prefix.clone()),
                &caption,
                &InterfaceButton::REQUEST,
            )
            .await;
        delivery.merge(self.ctx.dispatch(vec![summary]).await);

        info!("A {} draft has been requested.", section.label());

        let snapshot = self
            .ctx
            .with_draft(&key, |draft, _, _| Ok(DraftSnapshot::of(draft)))
            .await?;

        Ok(OpenDraftOutput {
            key,
            snapshot,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{caller, test_context};
    use crate::infrastructure::services::NotifierCall;

    #[tokio::test]
    async fn test_open_renders_request_interface() {
        let tc = test_context();

        let out = OpenDraft::new(tc.ctx.clone())
            .execute(OpenDraftInput {
                section: "LP".to_string(),
                caller: caller("host"),
            })
            .await
            .unwrap();

        assert_eq!(out.key.to_string(), "LP1");
        assert!(out.delivery.is_complete());
        assert_eq!(out.snapshot.active_count, 1);
        assert!(out.snapshot.interface.is_some());
        assert!(matches!(
            &tc.notifier.calls()[0],
            NotifierCall::Render { caption, buttons, .. }
                if caption == "@LaunchPoint +7" && buttons == &InterfaceButton::REQUEST.to_vec()
        ));
    }

    #[tokio::test]
    async fn test_open_rejects_outsiders() {
        let tc = test_context();
        let outsider = Caller::new("x", "x", vec!["io".to_string()]);

        let wrong = OpenDraft::new(tc.ctx.clone())
            .execute(OpenDraftInput {
                section: "lp".to_string(),
                caller: outsider,
            })
            .await;
        let missing = OpenDraft::new(tc.ctx.clone())
            .execute(OpenDraftInput {
                section: "zz".to_string(),
                caller: caller("a"),
            })
            .await;

        assert!(matches!(
            wrong,
            Err(DraftActionError::Rejected(DraftError::WrongSection))
        ));
        assert!(matches!(missing, Err(DraftActionError::SectionNotFound(_))));
        assert!(tc.notifier.calls().is_empty());
    }
}
