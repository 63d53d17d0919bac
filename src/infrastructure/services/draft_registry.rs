use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::domain::entities::Draft;
use crate::domain::value_objects::{DraftSettings, Section};

/// A draft behind its own lock; every event on it runs under this mutex
pub type SharedDraft = Arc<Mutex<Draft>>;

struct SectionSlot {
    section: Section,
    counter: AtomicU32,
    drafts: RwLock<BTreeMap<u32, SharedDraft>>,
}

/// Registry of every draft, partitioned by section.
///
/// Sequence numbers come from a per-section atomic counter; drafts of
/// different sections (or different numbers) never share a lock.
pub struct DraftRegistry {
    settings: DraftSettings,
    sections: HashMap<String, SectionSlot>,
}

impl DraftRegistry {
    pub fn new(sections: Vec<Section>, settings: DraftSettings) -> Self {
        let sections = sections
            .into_iter()
            .map(|section| {
                let slot = SectionSlot {
                    section: section.clone(),
                    counter: AtomicU32::new(0),
                    drafts: RwLock::new(BTreeMap::new()),
                };
                (section.prefix, slot)
            })
            .collect();

        Self { settings, sections }
    }

    pub fn settings(&self) -> &DraftSettings {
        &self.settings
    }

    /// Section by prefix, case-insensitive
    pub fn section(&self, prefix: &str) -> Option<&Section> {
        self.slot(prefix).map(|slot| &slot.section)
    }

    pub fn sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.values().map(|s| &s.section).collect();
        sections.sort_by(|a, b| a.prefix.cmp(&b.prefix));
        sections
    }

    /// Allocate the next sequence number and store a fresh draft under it
    pub async fn open(&self, prefix: &str, now: DateTime<Utc>) -> Option<(u32, SharedDraft)> {
        let slot = self.slot(prefix)?;
        let number = slot.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let draft = Draft::new(slot.section.clone(), number, self.settings.clone(), now);
        let draft = Arc::new(Mutex::new(draft));

        let mut drafts = slot.drafts.write().await;
        let evicted = retain_live(&mut drafts);
        drafts.insert(number, draft.clone());
        tracing::debug!(
            "Registered draft {}{} ({} closed draft(s) evicted)",
            slot.section.label(),
            number,
            evicted
        );
        Some((number, draft))
    }

    /// Evict the closed drafts of a section, returning how many were dropped
    pub async fn sweep(&self, prefix: &str) -> usize {
        match self.slot(prefix) {
            Some(slot) => retain_live(&mut *slot.drafts.write().await),
            None => 0,
        }
    }

    pub async fn get(&self, prefix: &str, number: u32) -> Option<SharedDraft> {
        let slot = self.slot(prefix)?;
        slot.drafts.read().await.get(&number).cloned()
    }

    /// Every draft of a section, by ascending number
    pub async fn list(&self, prefix: &str) -> Vec<SharedDraft> {
        match self.slot(prefix) {
            Some(slot) => slot.drafts.read().await.values().cloned().collect(),
            None => Vec::new(),
        }
    }

    fn slot(&self, prefix: &str) -> Option<&SectionSlot> {
        self.sections.get(&prefix.to_lowercase())
    }
}

/// Drop closed drafts; one held under its lock is kept until the next sweep
fn retain_live(drafts: &mut BTreeMap<u32, SharedDraft>) -> usize {
    let before = drafts.len();
    drafts.retain(|_, draft| {
        draft
            .try_lock()
            .map(|draft| draft.closed().is_none())
            .unwrap_or(true)
    });
    before - drafts.len()
}
