//! Notification transport
//!
//! Drafts talk to players through this trait only. The server implementation
//! publishes every call as a `DraftEvent` on the broadcast channel that feeds
//! the SSE stream; front-ends render interfaces from those events.

use std::collections::HashMap;
use std::sync::Mutex;

use async_broadcast::{Sender, TrySendError};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::value_objects::{Audience, InterfaceButton, InterfaceHandle, Summary};
use crate::infrastructure::app_state::DraftEvent;

/// Notification error
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Notification channel is closed")]
    Closed,
    #[error("Unknown interface: {0}")]
    UnknownHandle(String),
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outbound side of every draft interaction
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Plain text message
    async fn notify(&self, audience: &Audience, text: &str) -> Result<(), NotifyError>;

    /// Post an interactive interface and return its handle
    async fn render_interface(
        &self,
        audience: &Audience,
        caption: &str,
        buttons: &[InterfaceButton],
    ) -> Result<InterfaceHandle, NotifyError>;

    /// Replace the caption, optionally greying out some buttons
    async fn edit_interface(
        &self,
        handle: &InterfaceHandle,
        caption: &str,
        disabled: &[InterfaceButton],
    ) -> Result<(), NotifyError>;

    /// Replace the caption with `final_text` and disable every button
    async fn disable_interface(
        &self,
        handle: &InterfaceHandle,
        final_text: &str,
    ) -> Result<(), NotifyError>;

    async fn delete_interface(&self, handle: &InterfaceHandle) -> Result<(), NotifyError>;

    /// Rich summary (title + fields)
    async fn send_summary(&self, audience: &Audience, summary: &Summary) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InterfaceState {
    Live,
    Disabled,
}

/// Notifier publishing onto the SSE broadcast channel
pub struct BroadcastNotifier {
    sender: Sender<DraftEvent>,
    interfaces: RwLock<HashMap<InterfaceHandle, InterfaceState>>,
}

impl BroadcastNotifier {
    pub fn new(sender: Sender<DraftEvent>) -> Self {
        Self {
            sender,
            interfaces: RwLock::new(HashMap::new()),
        }
    }

    fn publish(&self, event: DraftEvent) -> Result<(), NotifyError> {
        debug!(
            "Publishing '{}' to {} receivers",
            event.event_type,
            self.sender.receiver_count()
        );
        match self.sender.try_broadcast(event) {
            Ok(_) => Ok(()),
            Err(TrySendError::Inactive(_)) => {
                debug!("Event published but no active receivers");
                Ok(())
            }
            Err(TrySendError::Closed(_)) => Err(NotifyError::Closed),
            Err(TrySendError::Full(_)) => Err(NotifyError::Delivery("event channel is full".into())),
        }
    }

    async fn require_live(&self, handle: &InterfaceHandle) -> Result<(), NotifyError> {
        match self.interfaces.read().await.get(handle) {
            Some(InterfaceState::Live) => Ok(()),
            _ => Err(NotifyError::UnknownHandle(handle.to_string())),
        }
    }
}

#[async_trait]
impl Notifier for BroadcastNotifier {
    async fn notify(&self, audience: &Audience, text: &str) -> Result<(), NotifyError> {
        self.publish(DraftEvent::new("notification").with_data(serde_json::json!({
            "audience": audience,
            "text": text,
        })))
    }

    async fn render_interface(
        &self,
        audience: &Audience,
        caption: &str,
        buttons: &[InterfaceButton],
    ) -> Result<InterfaceHandle, NotifyError> {
        let handle = InterfaceHandle::new(uuid::Uuid::new_v4().to_string());
        let labels: Vec<&str> = buttons.iter().map(|b| b.label()).collect();

        self.publish(
            DraftEvent::new("interface")
                .with_action("rendered")
                .with_data(serde_json::json!({
                    "handle": handle,
                    "audience": audience,
                    "caption": caption,
                    "buttons": buttons,
                    "labels": labels,
                })),
        )?;

        self.interfaces
            .write()
            .await
            .insert(handle.clone(), InterfaceState::Live);
        Ok(handle)
    }

    async fn edit_interface(
        &self,
        handle: &InterfaceHandle,
        caption: &str,
        disabled: &[InterfaceButton],
    ) -> Result<(), NotifyError> {
        self.require_live(handle).await?;
        self.publish(
            DraftEvent::new("interface")
                .with_action("edited")
                .with_data(serde_json::json!({
                    "handle": handle,
                    "caption": caption,
                    "disabled": disabled,
                })),
        )
    }

    async fn disable_interface(
        &self,
        handle: &InterfaceHandle,
        final_text: &str,
    ) -> Result<(), NotifyError> {
        self.require_live(handle).await?;
        self.publish(
            DraftEvent::new("interface")
                .with_action("disabled")
                .with_data(serde_json::json!({
                    "handle": handle,
                    "caption": final_text,
                })),
        )?;

        self.interfaces
            .write()
            .await
            .insert(handle.clone(), InterfaceState::Disabled);
        Ok(())
    }

    async fn delete_interface(&self, handle: &InterfaceHandle) -> Result<(), NotifyError> {
        if self.interfaces.write().await.remove(handle).is_none() {
            return Err(NotifyError::UnknownHandle(handle.to_string()));
        }
        self.publish(
            DraftEvent::new("interface")
                .with_action("deleted")
                .with_data(serde_json::json!({ "handle": handle })),
        )
    }

    async fn send_summary(&self, audience: &Audience, summary: &Summary) -> Result<(), NotifyError> {
        self.publish(DraftEvent::new("summary").with_data(serde_json::json!({
            "audience": audience,
            "summary": summary,
        })))
    }
}

/// One recorded notifier call
#[derive(Debug, Clone, PartialEq)]
pub enum NotifierCall {
    Notify {
        audience: Audience,
        text: String,
    },
    Render {
        audience: Audience,
        caption: String,
        buttons: Vec<InterfaceButton>,
        handle: InterfaceHandle,
    },
    Edit {
        handle: InterfaceHandle,
        caption: String,
        disabled: Vec<InterfaceButton>,
    },
    Disable {
        handle: InterfaceHandle,
        text: String,
    },
    Delete {
        handle: InterfaceHandle,
    },
    Summary {
        audience: Audience,
        summary: Summary,
    },
}

/// Mock notifier for testing: records every call, optionally failing all of them
#[derive(Default)]
pub struct MockNotifier {
    calls: Mutex<Vec<NotifierCall>>,
    fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier whose every call fails with a delivery error
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<NotifierCall> {
        self.lock().clone()
    }

    /// Texts of every plain notification, in order
    pub fn texts(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                NotifierCall::Notify { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Final texts of every disabled interface, in order
    pub fn disabled(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|call| match call {
                NotifierCall::Disable { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<NotifierCall>> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: NotifierCall) -> Result<(), NotifyError> {
        self.lock().push(call);
        if self.fail {
            Err(NotifyError::Delivery("mock failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Notifier for MockNotifier {
    async fn notify(&self, audience: &Audience, text: &str) -> Result<(), NotifyError> {
        self.record(NotifierCall::Notify {
            audience: audience.clone(),
            text: text.to_string(),
        })
    }

    async fn render_interface(
        &self,
        audience: &Audience,
        caption: &str,
        buttons: &[InterfaceButton],
    ) -> Result<InterfaceHandle, NotifyError> {
        let handle = InterfaceHandle::new(format!("mock-{}", self.lock().len()));
        self.record(NotifierCall::Render {
            audience: audience.clone(),
            caption: caption.to_string(),
            buttons: buttons.to_vec(),
            handle: handle.clone(),
        })?;
        Ok(handle)
    }

    async fn edit_interface(
        &self,
        handle: &InterfaceHandle,
        caption: &str,
        disabled: &[InterfaceButton],
    ) -> Result<(), NotifyError> {
        self.record(NotifierCall::Edit {
            handle: handle.clone(),
            caption: caption.to_string(),
            disabled: disabled.to_vec(),
        })
    }

    async fn disable_interface(
        &self,
        handle: &InterfaceHandle,
        final_text: &str,
    ) -> Result<(), NotifyError> {
        self.record(NotifierCall::Disable {
            handle: handle.clone(),
            text: final_text.to_string(),
        })
    }

    async fn delete_interface(&self, handle: &InterfaceHandle) -> Result<(), NotifyError> {
        self.record(NotifierCall::Delete {
            handle: handle.clone(),
        })
    }

    async fn send_summary(&self, audience: &Audience, summary: &Summary) -> Result<(), NotifyError> {
        self.record(NotifierCall::Summary {
            audience: audience.clone(),
            summary: summary.clone(),
        })
    }
}
