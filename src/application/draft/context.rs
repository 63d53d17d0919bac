use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{Draft, DraftError, Expiry};
use crate::domain::services::Clock;
use crate::domain::value_objects::{
    Audience, Caller, DraftKey, InterfaceButton, InterfaceHandle, Section, Summary,
};
use crate::infrastructure::services::{DraftRegistry, Notifier, NotifyError, SharedDraft};

/// Final caption of an interface whose draft ran out of time
pub const EXPIRED_TEXT: &str = "This draft has expired.";

/// Error type shared by every draft use case
#[derive(Debug, thiserror::Error)]
pub enum DraftActionError {
    #[error(transparent)]
    Rejected(DraftError),
    #[error("Section not found: {0}")]
    SectionNotFound(String),
    #[error("Draft not found: {0}")]
    DraftNotFound(String),
    #[error("This draft has expired.")]
    Expired,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DraftError> for DraftActionError {
    fn from(e: DraftError) -> Self {
        if e.is_precondition() {
            debug!("Draft action rejected: {}", e);
            DraftActionError::Rejected(e)
        } else {
            error!("Draft invariant violated: {}", e);
            DraftActionError::Internal(e.to_string())
        }
    }
}

/// An event against one draft, on behalf of one caller
#[derive(Debug, Clone)]
pub struct DraftCommand {
    pub key: DraftKey,
    pub caller: Caller,
}

/// Count of notifications sent after a committed transition
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub sent: usize,
    pub failed: usize,
}

impl Delivery {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }

    pub fn merge(&mut self, other: Delivery) {
        self.sent += other.sent;
        self.failed += other.failed;
    }

    /// Count one notifier result; failures are logged and swallowed
    pub fn record<T>(&mut self, what: &str, result: Result<T, NotifyError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.sent += 1;
                Some(value)
            }
            Err(e) => {
                self.failed += 1;
                warn!("Failed to deliver {}: {}", what, e);
                None
            }
        }
    }
}

/// Fire-and-forget notification, dispatched once the draft lock is released
#[derive(Debug, Clone)]
pub enum Notice {
    Text(Audience, String),
    Edit {
        handle: InterfaceHandle,
        caption: String,
        disabled: Vec<InterfaceButton>,
    },
    Disable {
        handle: InterfaceHandle,
        text: String,
    },
    Delete(InterfaceHandle),
    Summary(Audience, Summary),
}

impl Notice {
    fn label(&self) -> &'static str {
        match self {
            Notice::Text(..) => "message",
            Notice::Edit { .. } => "interface edit",
            Notice::Disable { .. } => "interface disable",
            Notice::Delete(_) => "interface delete",
            Notice::Summary(..) => "summary",
        }
    }
}

/// Which interface of a draft a rendered handle belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceSlot {
    Request,
    Process,
}

/// Shared collaborators of the draft use cases
#[derive(Clone)]
pub struct DraftContext {
    pub registry: Arc<DraftRegistry>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    rng: Arc<Mutex<ChaCha8Rng>>,
}

impl DraftContext {
    pub fn new(
        registry: Arc<DraftRegistry>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        seed: Option<u64>,
    ) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Self {
            registry,
            notifier,
            clock,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn section(&self, prefix: &str) -> Result<Section, DraftActionError> {
        self.registry
            .section(prefix)
            .cloned()
            .ok_or_else(|| DraftActionError::SectionNotFound(prefix.to_string()))
    }

    async fn shared(&self, key: &DraftKey) -> Result<SharedDraft, DraftActionError> {
        self.registry
            .get(&key.section, key.number)
            .await
            .ok_or_else(|| DraftActionError::DraftNotFound(key.to_string()))
    }

    /// Lock the draft, run the lazy expiry check, then apply `f`.
    ///
    /// The lock is released before anything is sent; a draft that expires on
    /// this check has its interface disabled once and the call fails with
    /// `Expired`.
    pub async fn with_draft<T, F>(&self, key: &DraftKey, f: F) -> Result<T, DraftActionError>
    where
        F: FnOnce(&mut Draft, &mut ChaCha8Rng, DateTime<Utc>) -> Result<T, DraftError>,
    {
        let shared = self.shared(key).await?;
        let mut draft = shared.lock().await;
        let now = self.clock.now();

        match draft.check_expiry(now) {
            Expiry::Live => {}
            Expiry::Expired => return Err(DraftActionError::Expired),
            Expiry::JustExpired(handle) => {
                let label = draft.section().label();
                drop(draft);

                let mut delivery = Delivery::default();
                delivery.record(
                    "expiry notice",
                    self.notifier.disable_interface(&handle, EXPIRED_TEXT).await,
                );
                info!("A {} draft request has timed out.", label);
                return Err(DraftActionError::Expired);
            }
        }

        let result = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut *draft, &mut *rng, now)
        };
        Ok(result?)
    }

    /// Render an interface and attach the handle to the draft
    pub async fn render(
        &self,
        key: &DraftKey,
        slot: InterfaceSlot,
        audience: Audience,
        caption: &str,
        buttons: &[InterfaceButton],
    ) -> Delivery {
        let mut delivery = Delivery::default();
        let rendered = self
            .notifier
            .render_interface(&audience, caption, buttons)
            .await;
        let Some(handle) = delivery.record("interface", rendered) else {
            return delivery;
        };

        match self.shared(key).await {
            Ok(shared) => {
                let mut draft = shared.lock().await;
                match slot {
                    InterfaceSlot::Request => draft.attach_interface(handle),
                    InterfaceSlot::Process => draft.attach_process_interface(handle),
                }
            }
            Err(e) => warn!("Rendered interface for a missing draft: {}", e),
        }
        delivery
    }

    pub async fn dispatch(&self, notices: Vec<Notice>) -> Delivery {
        let mut delivery = Delivery::default();
        for notice in notices {
            let result = match &notice {
                Notice::Text(audience, text) => self.notifier.notify(audience, text).await,
                Notice::Edit {
                    handle,
                    caption,
                    disabled,
                } => self.notifier.edit_interface(handle, caption, disabled).await,
                Notice::Disable { handle, text } => {
                    self.notifier.disable_interface(handle, text).await
                }
                Notice::Delete(handle) => self.notifier.delete_interface(handle).await,
                Notice::Summary(audience, summary) => {
                    self.notifier.send_summary(audience, summary).await
                }
            };
            delivery.record(notice.label(), result);
        }
        delivery
    }
}

/// Caption edit of the request interface, when one is rendered
pub(super) fn caption_edit(draft: &Draft, disabled: &[InterfaceButton]) -> Option<Notice> {
    draft.interface().map(|handle| Notice::Edit {
        handle: handle.clone(),
        caption: draft.caption(),
        disabled: disabled.to_vec(),
    })
}

/// Queue report posted to the section channel
pub(super) fn report(draft: &Draft) -> Notice {
    Notice::Summary(
        Audience::Section(draft.section().prefix.clone()),
        draft.summary(),
    )
}

/// Name of a player for messages, falling back to the identity
pub(super) fn display_name(draft: &Draft, id: &crate::domain::entities::PlayerId) -> String {
    draft
        .player(id)
        .map(|p| p.name().to_string())
        .unwrap_or_else(|| id.to_string())
}
