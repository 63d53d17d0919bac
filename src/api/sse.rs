use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use serde::Deserialize;

use crate::infrastructure::app_state::{AppState, DraftEvent};

#[derive(Deserialize)]
pub struct SseParams {
    token: Option<String>,
    /// Only forward events addressed to this section
    section: Option<String>,
}

/// Whether an event concerns `section` (events without a section go to everyone)
fn matches_section(event: &DraftEvent, section: &str) -> bool {
    let by_draft = event
        .draft
        .as_deref()
        .map(|key| key.to_lowercase().starts_with(section));
    let by_audience = event
        .data
        .get("audience")
        .and_then(|audience| audience.get("target"))
        .and_then(|target| target.as_str())
        .map(|target| target.starts_with(section));

    by_draft.or(by_audience).unwrap_or(true)
}

pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SseParams>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user = params
        .token
        .and_then(|token| state.jwt_service.verify(&token).ok())
        .map(|claims| claims.username);
    let section = params.section.map(|s| s.to_lowercase());

    // Subscribe to events - use new_receiver() to get an active receiver
    let mut receiver = state.event_sender.new_receiver();

    let stream = async_stream::stream! {
        tracing::debug!("SSE stream started for {}", user.as_deref().unwrap_or("anonymous"));

        yield Ok(Event::default()
            .event("connected")
            .data(serde_json::json!({
                "message": "Connected to SSE stream",
                "timestamp": chrono::Utc::now().timestamp_millis()
            }).to_string()));

        let mut heartbeat_interval = tokio::time::interval(Duration::from_secs(20));

        loop {
            tokio::select! {
                _ = heartbeat_interval.tick() => {
                    tracing::trace!("SSE heartbeat");
                    yield Ok(Event::default().comment("heartbeat"));
                }
                result = receiver.recv() => {
                    match result {
                        Ok(event) => {
                            if let Some(section) = &section {
                                if !matches_section(&event, section) {
                                    continue;
                                }
                            }
                            tracing::debug!("SSE forwarding event: {:?}", event.event_type);
                            let json = serde_json::to_string(&event).unwrap_or_default();
                            yield Ok(Event::default()
                                .event("event")
                                .data(json));
                        }
                        Err(e) => {
                            tracing::warn!("SSE receiver error: {:?}, closing stream", e);
                            break;
                        }
                    }
                }
            }
        }

        tracing::debug!("SSE stream closed");
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}
