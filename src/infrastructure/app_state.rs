use std::sync::Arc;

use async_broadcast::{broadcast, Receiver, Sender};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::application::draft::DraftContext;
use crate::infrastructure::auth::JwtService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::database::repositories::SqliteLedgerRepository;
use crate::infrastructure::services::{BroadcastNotifier, DraftRegistry};
use crate::domain::services::SystemClock;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,

    /// Database connection pool
    pub db: SqlitePool,

    /// JWT service for token management
    pub jwt_service: Arc<JwtService>,

    /// Draft registry, notifier, clock and captain rng
    pub drafts: DraftContext,

    /// Stats ledger
    pub ledger_repo: Arc<SqliteLedgerRepository>,

    /// Event broadcaster for SSE
    pub event_sender: Sender<DraftEvent>,
    pub event_receiver: Receiver<DraftEvent>,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env()?).await
    }

    pub async fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        tracing::info!("Connecting to database: {}", config.database_url);

        // An in-memory database lives and dies with its connection
        let max_connections = if config.database_url.contains(":memory:") { 1 } else { 5 };
        let db = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&config.database_url)
            .await?;

        let ledger_repo = Arc::new(SqliteLedgerRepository::new(db.clone()));
        ledger_repo.ensure_schema().await?;

        let jwt_service = Arc::new(JwtService::new(config.jwt_secret.clone()));

        // Create event broadcaster (capacity of 1000 events)
        let (mut event_sender, event_receiver) = broadcast(1000);
        event_sender.set_overflow(true);

        let registry = Arc::new(DraftRegistry::new(
            config.sections.clone(),
            config.settings.clone(),
        ));
        let drafts = DraftContext::new(
            registry,
            Arc::new(BroadcastNotifier::new(event_sender.clone())),
            Arc::new(SystemClock),
            config.rng_seed,
        );

        tracing::info!(
            "Serving drafts for {} section(s)",
            config.sections.len()
        );

        Ok(Self {
            config,
            db,
            jwt_service,
            drafts,
            ledger_repo,
            event_sender,
            event_receiver,
        })
    }

    /// Broadcast an event to all connected SSE clients
    pub fn broadcast_event(&self, event: DraftEvent) {
        let receiver_count = self.event_sender.receiver_count();
        tracing::debug!(
            "Broadcasting event '{}' to {} receivers",
            event.event_type,
            receiver_count
        );
        match self.event_sender.try_broadcast(event) {
            Ok(None) => {
                tracing::debug!("Event broadcast successfully");
            }
            Ok(Some(_)) => {
                tracing::debug!("Event broadcast successfully with overflow");
            }
            Err(e) => {
                tracing::warn!("Failed to broadcast event: {:?}", e);
            }
        }
    }
}

/// Draft event for SSE broadcasting
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Additional data fields (flattened into root)
    #[serde(flatten)]
    pub data: serde_json::Value,
    pub timestamp: i64,
}

impl DraftEvent {
    pub fn new(event_type: &str) -> Self {
        Self {
            event_type: event_type.to_string(),
            draft: None,
            user_id: None,
            action: None,
            data: serde_json::Value::Object(serde_json::Map::new()),
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn with_draft(mut self, draft: impl ToString, user_id: &str) -> Self {
        self.draft = Some(draft.to_string());
        self.user_id = Some(user_id.to_string());
        self
    }

    pub fn with_action(mut self, action: &str) -> Self {
        self.action = Some(action.to_string());
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }
}
