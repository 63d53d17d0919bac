use std::fmt;

use serde::{Deserialize, Serialize};

/// A community partition that scopes draft access, channels and stats tables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Short prefix used in channel names and draft keys (e.g. "lp")
    pub prefix: String,
    /// Display name, also the role required to take part
    pub name: String,
}

impl Section {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_lowercase(),
            name: name.into(),
        }
    }

    /// Upper-case prefix used in log lines ("LP")
    pub fn label(&self) -> String {
        self.prefix.to_uppercase()
    }

    /// Mention used to ping everyone in the section
    pub fn role_mention(&self) -> String {
        format!("@{}", self.name)
    }

    /// Channel where queue interfaces are posted
    pub fn queue_channel(&self) -> String {
        format!("{}-looking-for-draft", self.prefix)
    }

    /// Chat channel a numbered draft plays in
    pub fn draft_chat(&self, number: u32) -> String {
        format!("{}-draft-chat-{}", self.prefix, number)
    }

    /// Ledger table holding this section's cycle stats
    pub fn ledger_table(&self) -> String {
        format!("{}_current_cycle", self.prefix)
    }

    /// Parse a `prefix:Name,prefix:Name` list, skipping malformed entries
    pub fn parse_list(raw: &str) -> Vec<Section> {
        raw.split(',')
            .filter_map(|entry| {
                let (prefix, name) = entry.split_once(':')?;
                let (prefix, name) = (prefix.trim(), name.trim());
                if prefix.is_empty() || name.is_empty() {
                    return None;
                }
                Some(Section::new(prefix, name))
            })
            .collect()
    }
}

/// Identifies one draft: its section prefix and per-section sequence number
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftKey {
    pub section: String,
    pub number: u32,
}

impl DraftKey {
    pub fn new(section: impl Into<String>, number: u32) -> Self {
        Self {
            section: section.into(),
            number,
        }
    }
}

impl fmt::Display for DraftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.section.to_uppercase(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let sections = Section::parse_list("lp:LaunchPoint, IO:Ink Odyssey,broken,:x");

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].prefix, "lp");
        assert_eq!(sections[1].prefix, "io");
        assert_eq!(sections[1].name, "Ink Odyssey");
    }

    #[test]
    fn test_channel_names() {
        let section = Section::new("lp", "LaunchPoint");

        assert_eq!(section.draft_chat(3), "lp-draft-chat-3");
        assert_eq!(section.role_mention(), "@LaunchPoint");
        assert_eq!(DraftKey::new("lp", 3).to_string(), "LP3");
    }
}
