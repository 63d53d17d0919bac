use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::entities::PlayerId;

/// Opaque reference to a rendered interface owned by the transport
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterfaceHandle(String);

impl InterfaceHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InterfaceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who a notification is addressed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "target")]
pub enum Audience {
    /// Everyone holding the section role, in its queue channel
    Section(String),
    /// The chat channel of one draft
    DraftChat(String),
    /// A direct reply to one player
    Player(PlayerId),
}

/// Buttons a draft interface can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InterfaceButton {
    JoinDraft,
    Reping,
    Leave,
    Refresh,
    ReassignCaptain,
    RequestSub,
    JoinAsSub,
    PickPlayer,
    StartMatch,
    ReportScore,
    EndDraft,
}

impl InterfaceButton {
    /// Buttons of a queue still gathering players
    pub const REQUEST: [InterfaceButton; 4] = [
        InterfaceButton::JoinDraft,
        InterfaceButton::Reping,
        InterfaceButton::Leave,
        InterfaceButton::Refresh,
    ];

    /// Buttons of a full queue
    pub const QUEUE_FULL: [InterfaceButton; 4] = [
        InterfaceButton::ReassignCaptain,
        InterfaceButton::RequestSub,
        InterfaceButton::JoinAsSub,
        InterfaceButton::Refresh,
    ];

    /// Buttons of the in-progress match interface
    pub const PROCESS: [InterfaceButton; 4] = [
        InterfaceButton::PickPlayer,
        InterfaceButton::StartMatch,
        InterfaceButton::ReportScore,
        InterfaceButton::EndDraft,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            InterfaceButton::JoinDraft => "Join Draft",
            InterfaceButton::Reping => "Reping",
            InterfaceButton::Leave => "Leave",
            InterfaceButton::Refresh => "Refresh",
            InterfaceButton::ReassignCaptain => "Reassign Captain",
            InterfaceButton::RequestSub => "Request Sub",
            InterfaceButton::JoinAsSub => "Join as Sub",
            InterfaceButton::PickPlayer => "Pick Player",
            InterfaceButton::StartMatch => "Start Match",
            InterfaceButton::ReportScore => "Report Score",
            InterfaceButton::EndDraft => "End Draft",
        }
    }
}
