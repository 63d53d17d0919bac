use super::context::{caption_edit, DraftActionError, DraftCommand, DraftContext, Notice};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::value_objects::{Audience, InterfaceButton};

/// Reping use case: re-advertise an almost full queue
pub struct Reping {
    ctx: DraftContext,
}

impl Reping {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: DraftCommand) -> Result<DraftActionOutput, DraftActionError> {
        let (notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, _, now| {
                draft.reping(&input.caller.id, now)?;

                let mut notices = vec![Notice::Text(
                    Audience::Section(draft.section().prefix.clone()),
                    format!("{} (reping)", draft.ping()),
                )];
                notices.extend(caption_edit(draft, &[InterfaceButton::Reping]));
                Ok((notices, DraftSnapshot::of(draft)))
            })
            .await?;

        let delivery = self.ctx.dispatch(notices).await;
        Ok(DraftActionOutput {
            message: "Reping sent!".to_string(),
            snapshot,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{command, open_with, test_context};
    use crate::domain::entities::DraftError;

    #[tokio::test]
    async fn test_reping_cooldown_window() {
        let tc = test_context();
        let key = open_with(&tc, 2).await;

        let early = Reping::new(tc.ctx.clone()).execute(command(&key, "p1")).await;
        assert!(matches!(
            early,
            Err(DraftActionError::Rejected(DraftError::CooldownActive { .. }))
        ));

        tc.clock.advance(chrono::Duration::minutes(15));
        Reping::new(tc.ctx.clone())
            .execute(command(&key, "p1"))
            .await
            .unwrap();
        assert!(tc
            .notifier
            .texts()
            .contains(&"@LaunchPoint +5 (reping)".to_string()));

        let again = Reping::new(tc.ctx.clone()).execute(command(&key, "p2")).await;
        assert!(matches!(
            again,
            Err(DraftActionError::Rejected(DraftError::CooldownActive { .. }))
        ));
    }
}
