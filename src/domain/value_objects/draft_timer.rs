use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::DraftSettings;

/// The two lazily-checked deadlines of a draft.
///
/// Nothing is scheduled: callers compare `now` against the stored
/// deadlines whenever an interaction touches the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftTimer {
    expires_at: DateTime<Utc>,
    reping_at: DateTime<Utc>,
}

impl DraftTimer {
    pub fn start(now: DateTime<Utc>, settings: &DraftSettings) -> Self {
        Self {
            expires_at: now + Duration::minutes(settings.expiry_minutes),
            reping_at: now + Duration::minutes(settings.reping_cooldown_minutes),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn reping_at(&self) -> DateTime<Utc> {
        self.reping_at
    }

    pub fn extend(&mut self, minutes: i64) {
        self.expires_at = self.expires_at + Duration::minutes(minutes);
    }

    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn reping_ready(&self, now: DateTime<Utc>) -> bool {
        now >= self.reping_at
    }

    pub fn restart_reping(&mut self, now: DateTime<Utc>, cooldown_minutes: i64) {
        self.reping_at = now + Duration::minutes(cooldown_minutes);
    }
}
