use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;

use super::draft::{action_error, bad_request, ApiError, ErrorResponse};
use crate::api::middleware::Claims;
use crate::api::AppState;
use crate::application::draft::DraftActionError;
use crate::application::report::{ReportError, ReportMatch, ReportMatchInput, ReportMatchOutput};
use crate::domain::entities::{DraftError, PlayerId};
use crate::domain::services::ReportKind;
use crate::infrastructure::app_state::DraftEvent;

#[derive(Debug, Deserialize)]
pub struct ReportPlayer {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    /// "cycle" or "sub"
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "gamesPlayed")]
    pub games_played: u32,
    #[serde(rename = "gamesWon")]
    pub games_won: u32,
    pub players: Vec<ReportPlayer>,
}

/// POST /api/reports/:section - Record a match result by hand
pub async fn report_match(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(section): Path<String>,
    Json(body): Json<ReportRequest>,
) -> Result<Json<ReportMatchOutput>, ApiError> {
    let section = state.drafts.section(&section).map_err(action_error)?;
    if !claims.caller().can_access(&section.prefix) {
        return Err(action_error(DraftActionError::Rejected(DraftError::WrongSection)));
    }
    let kind = ReportKind::from_str(&body.kind)
        .ok_or_else(|| bad_request("Type must be cycle or sub", "INVALID_REPORT_TYPE"))?;

    let output = ReportMatch::new(state.ledger_repo.clone())
        .execute(ReportMatchInput {
            section,
            kind,
            games_played: body.games_played,
            games_won: body.games_won,
            players: body
                .players
                .into_iter()
                .map(|p| (PlayerId::new(p.id), p.name))
                .collect(),
        })
        .await
        .map_err(|e| {
            let (status, code) = match e {
                ReportError::Validation(_) => (StatusCode::BAD_REQUEST, "INVALID_REPORT"),
                ReportError::LedgerUnavailable(_) => {
                    (StatusCode::SERVICE_UNAVAILABLE, "LEDGER_UNAVAILABLE")
                }
            };
            (
                status,
                Json(ErrorResponse {
                    error: e.to_string(),
                    code: code.to_string(),
                    details: None,
                }),
            )
        })?;

    state.broadcast_event(
        DraftEvent::new("report")
            .with_action(output.status.as_str())
            .with_data(serde_json::json!({ "summary": output.summary })),
    );

    Ok(Json(output))
}
