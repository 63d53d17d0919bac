use serde::{Deserialize, Serialize};

/// Timing configuration shared by every draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSettings {
    /// Minutes an unfilled queue stays open (default 50)
    pub expiry_minutes: i64,
    /// Minutes between two repings (default 15)
    pub reping_cooldown_minutes: i64,
    /// Expiry bump once the queue is half full (default 5)
    pub extension_minutes: i64,
    /// Expiry bump when the queue is two short (default 10)
    pub late_extension_minutes: i64,
}

impl Default for DraftSettings {
    fn default() -> Self {
        Self {
            expiry_minutes: 50,
            reping_cooldown_minutes: 15,
            extension_minutes: 5,
            late_extension_minutes: 10,
        }
    }
}

impl DraftSettings {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.expiry_minutes <= 0 {
            return Err("Expiry must be a positive number of minutes");
        }
        if self.reping_cooldown_minutes < 0
            || self.extension_minutes < 0
            || self.late_extension_minutes < 0
        {
            return Err("Cooldown and extensions cannot be negative");
        }
        Ok(())
    }
}
