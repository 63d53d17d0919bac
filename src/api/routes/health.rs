use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::api::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    version: String,
    uptime_seconds: u64,
    sections: Vec<SectionHealth>,
}

/// A configured section and how many drafts it currently tracks
#[derive(Serialize)]
pub struct SectionHealth {
    prefix: String,
    name: String,
    tracked_drafts: usize,
}

static START_TIME: std::sync::OnceLock<std::time::Instant> = std::sync::OnceLock::new();

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let start = START_TIME.get_or_init(std::time::Instant::now);
    let uptime = start.elapsed().as_secs();

    let registry = &state.drafts.registry;
    let mut sections = Vec::new();
    for section in registry.sections() {
        sections.push(SectionHealth {
            prefix: section.prefix.clone(),
            name: section.name.clone(),
            tracked_drafts: registry.list(&section.prefix).await.len(),
        });
    }

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        sections,
    })
}
