//! Shared fixtures for use case tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::application::draft::{DraftCommand, DraftContext, JoinDraft, OpenDraft, OpenDraftInput};
use crate::domain::entities::PlayerId;
use crate::domain::repositories::{LedgerRepository, RepositoryError};
use crate::domain::services::ManualClock;
use crate::domain::value_objects::{Caller, DraftKey, DraftSettings, Section, StatsRow, StatsValues};
use crate::infrastructure::services::{DraftRegistry, MockNotifier};

/// Ledger kept in memory; rows start at position 2 like the real tables
#[derive(Default)]
pub struct InMemoryLedger {
    tables: Mutex<HashMap<String, Vec<(PlayerId, StatsValues)>>>,
    fail_reads: bool,
    fail_writes_for: Option<PlayerId>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes_for(mut self, id: &str) -> Self {
        self.fail_writes_for = Some(PlayerId::from(id));
        self
    }

    pub fn seed(&self, table: &str, id: &PlayerId, values: StatsValues) {
        self.lock()
            .entry(table.to_string())
            .or_default()
            .push((id.clone(), values));
    }

    pub fn values(&self, table: &str, id: &PlayerId) -> Option<StatsValues> {
        self.lock()
            .get(table)?
            .iter()
            .find(|(row_id, _)| row_id == id)
            .map(|(_, values)| values.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<(PlayerId, StatsValues)>>> {
        self.tables.lock().unwrap()
    }

    fn check_write(&self, id: &PlayerId) -> Result<(), RepositoryError> {
        if self.fail_writes_for.as_ref() == Some(id) {
            return Err(RepositoryError::Database("write refused".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for InMemoryLedger {
    async fn read_section(&self, table: &str) -> Result<HashMap<PlayerId, StatsRow>, RepositoryError> {
        if self.fail_reads {
            return Err(RepositoryError::Database("read refused".into()));
        }

        Ok(self
            .lock()
            .get(table)
            .map(|rows| {
                rows.iter()
                    .enumerate()
                    .map(|(i, (id, values))| {
                        let row = StatsRow {
                            position: i as u32 + 2,
                            values: values.clone(),
                        };
                        (id.clone(), row)
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_row(
        &self,
        table: &str,
        position: u32,
        values: &StatsValues,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.lock();
        let row = tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(position as usize - 2))
            .ok_or_else(|| RepositoryError::NotFound(format!("{}!{}", table, position)))?;
        self.check_write(&row.0)?;
        row.1 = values.clone();
        Ok(())
    }

    async fn append_row(
        &self,
        table: &str,
        player_id: &PlayerId,
        values: &StatsValues,
    ) -> Result<(), RepositoryError> {
        self.check_write(player_id)?;
        self.seed(table, player_id, values.clone());
        Ok(())
    }
}

pub struct TestContext {
    pub ctx: DraftContext,
    pub notifier: Arc<MockNotifier>,
    pub clock: Arc<ManualClock>,
}

pub fn test_context() -> TestContext {
    test_context_with(MockNotifier::new())
}

pub fn test_context_with(notifier: MockNotifier) -> TestContext {
    let notifier = Arc::new(notifier);
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap()));
    let registry = Arc::new(DraftRegistry::new(
        vec![Section::new("lp", "LaunchPoint")],
        DraftSettings::default(),
    ));

    TestContext {
        ctx: DraftContext::new(registry, notifier.clone(), clock.clone(), Some(7)),
        notifier,
        clock,
    }
}

pub fn caller(name: &str) -> Caller {
    Caller::new(name, name, vec!["lp".to_string()])
}

pub fn command(key: &DraftKey, name: &str) -> DraftCommand {
    DraftCommand {
        key: key.clone(),
        caller: caller(name),
    }
}

/// Open a draft as `p0` and have `joiners` more players join it
pub async fn open_with(tc: &TestContext, joiners: usize) -> DraftKey {
    let key = OpenDraft::new(tc.ctx.clone())
        .execute(OpenDraftInput {
            section: "lp".to_string(),
            caller: caller("p0"),
        })
        .await
        .unwrap()
        .key;

    for i in 1..=joiners {
        JoinDraft::new(tc.ctx.clone())
            .execute(command(&key, &format!("p{}", i)))
            .await
            .unwrap();
    }
    key
}
