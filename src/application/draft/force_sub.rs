use super::context::{
    caption_edit, display_name, report, DraftActionError, DraftContext, Notice,
};
use super::get_draft::DraftSnapshot;
use super::join_draft::DraftActionOutput;
use crate::domain::entities::PlayerId;
use crate::domain::value_objects::{Audience, Caller, DraftKey};

/// Force sub input
pub struct ForceSubInput {
    pub key: DraftKey,
    pub caller: Caller,
    pub target: PlayerId,
}

/// Force sub use case: staff sub out a player who has gone missing
pub struct ForceSub {
    ctx: DraftContext,
}

impl ForceSub {
    pub fn new(ctx: DraftContext) -> Self {
        Self { ctx }
    }

    pub async fn execute(&self, input: ForceSubInput) -> Result<DraftActionOutput, DraftActionError> {
        let (message, notices, snapshot) = self
            .ctx
            .with_draft(&input.key, |draft, rng, _| {
                let captained = draft.player(&input.target).and_then(|p| p.captain_of());
                let out = draft.force_sub(&input.caller, &input.target, rng)?;

                tracing::info!(
                    "{} subbed out {} from {}",
                    input.caller.name,
                    out.name,
                    draft.key()
                );

                let chat = Audience::DraftChat(draft.chat_channel().to_string());
                let mut notices: Vec<_> = caption_edit(draft, &[]).into_iter().collect();
                notices.push(Notice::Text(
                    Audience::Section(draft.section().prefix.clone()),
                    format!("{} +1 (sub)", draft.section().role_mention()),
                ));
                notices.push(Notice::Text(
                    chat.clone(),
                    format!("`{}` has been subbed out by staff.", out.name),
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
                notices.push(report(draft));

                let message = format!("{} has been subbed out.", out.name);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::draft::{AddSub, GetDraft};
    use crate::application::testing::{caller, command, open_with, test_context};
    use crate::domain::entities::DraftError;

    fn input(key: &DraftKey, staff: &str, target: &str) -> ForceSubInput {
        ForceSubInput {
            key: key.clone(),
            caller: caller(staff),
            target: PlayerId::from(target),
        }
    }

    #[tokio::test]
    async fn test_staff_subs_out_missing_player() {
        let tc = test_context();
        let key = open_with(&tc, 7).await;
        let before = GetDraft::new(tc.ctx.clone()).execute(&key).await.unwrap();
        let captain = before.captains.team2.clone().unwrap();
        tc.notifier.clear();

        let out = ForceSub::new(tc.ctx.clone())
            .execute(input(&key, "staff", &captain))
            .await
            .unwrap();

        assert_eq!(out.message, format!("{} has been subbed out.", captain));
        assert_eq!(out.snapshot.num_inactive, 1);
        assert_eq!(out.snapshot.remaining, 1);
        assert_ne!(out.snapshot.captains.team2.as_deref(), Some(captain.as_str()));
        let texts = tc.notifier.texts();
        assert!(texts.contains(&"@LaunchPoint +1 (sub)".to_string()));
        assert!(texts.contains(&format!("`{}` has been subbed out by staff.", captain)));
        assert!(texts.iter().any(|t| t.ends_with("is the new captain of Team 2.")));

        // counts against the target's own sub allowance
        let back = AddSub::new(tc.ctx.clone())
            .execute(command(&key, &captain))
            .await
            .unwrap();
        assert_eq!(back.snapshot.active_count, 8);
    }

    #[tokio::test]
    async fn test_force_sub_rejections() {
        let tc = test_context();
        let key = open_with(&tc, 3).await;
        let force = ForceSub::new(tc.ctx.clone());

        let early = force.execute(input(&key, "staff", "p1")).await;
        assert!(matches!(
            early,
            Err(DraftActionError::Rejected(DraftError::NothingToSub))
        ));

        let key = open_with(&tc, 7).await;
        tc.notifier.clear();

        let unknown = force.execute(input(&key, "staff", "ghost")).await;
        assert!(matches!(
            unknown,
            Err(DraftActionError::Rejected(DraftError::UnknownPlayer))
        ));

        let outsider = ForceSubInput {
            key: key.clone(),
            caller: Caller::new("x", "x", vec!["io".to_string()]),
            target: PlayerId::from("p1"),
        };
        assert!(matches!(
            force.execute(outsider).await,
            Err(DraftActionError::Rejected(DraftError::WrongSection))
        ));
        assert!(tc.notifier.calls().is_empty());

        force.execute(input(&key, "staff", "p1")).await.unwrap();
        let again = force.execute(input(&key, "staff", "p1")).await;
        assert!(matches!(
            again,
            Err(DraftActionError::Rejected(DraftError::PlayerInactive))
        ));
    }
}
