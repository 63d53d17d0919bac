use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::Claims;
use crate::api::AppState;
use crate::application::draft::{
    AddSub, AdjustScore, AdjustScoreInput, Delivery, DraftActionError, DraftActionOutput,
    DraftCommand, DraftSnapshot, FinishDraft, ForceEnd, ForceSub, ForceSubInput, GetDraft,
    JoinDraft, LeaveDraft, ListDrafts, OpenDraft, OpenDraftInput, PickPlayer, PickPlayerInput,
    ReassignCaptain, RefreshDraft, Reping, RequestSub, StartMatch,
};
use crate::application::report::ReportMatchOutput;
use crate::domain::entities::{DraftError, PlayerId, ScoreChange, TeamSide};
use crate::domain::value_objects::DraftKey;
use crate::infrastructure::app_state::DraftEvent;

const DELIVERY_WARNING: &str = "could not complete all notifications";

// ============================================================================
// Request/Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PickRequest {
    #[serde(rename = "playerId")]
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub team: u8,
    /// "increment" or "decrement"
    pub change: String,
}

#[derive(Debug, Serialize)]
pub struct DraftResponse {
    pub success: bool,
    pub draft: DraftSnapshot,
}

#[derive(Debug, Serialize)]
pub struct DraftListResponse {
    pub success: bool,
    pub drafts: Vec<DraftSnapshot>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct DraftActionResponse {
    pub success: bool,
    pub message: String,
    pub draft: DraftSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FinishResponse {
    pub success: bool,
    pub message: String,
    pub draft: DraftSnapshot,
    pub reports: Vec<ReportMatchOutput>,
    #[serde(rename = "ledgerComplete")]
    pub ledger_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Helpers
// ============================================================================

pub(super) fn bad_request(error: &str, code: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            code: code.to_string(),
            details: None,
        }),
    )
}

/// Map a use case failure onto an HTTP status
pub(super) fn action_error(e: DraftActionError) -> ApiError {
    let (status, code, details) = match &e {
        DraftActionError::Rejected(rejection) => {
            let status = match rejection {
                DraftError::WrongSection => StatusCode::FORBIDDEN,
                DraftError::NotQueued | DraftError::UnknownPlayer => StatusCode::NOT_FOUND,
                DraftError::CooldownActive { .. } => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::CONFLICT,
            };
            (status, rejection.code(), None)
        }
        DraftActionError::SectionNotFound(_) => (StatusCode::NOT_FOUND, "SECTION_NOT_FOUND", None),
        DraftActionError::DraftNotFound(_) => (StatusCode::NOT_FOUND, "DRAFT_NOT_FOUND", None),
        DraftActionError::Expired => (StatusCode::GONE, "DRAFT_EXPIRED", None),
        DraftActionError::Internal(details) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "INTERNAL_ERROR",
            Some(details.clone()),
        ),
    };

    let error = match &e {
        DraftActionError::Internal(_) => "Something went wrong with this draft".to_string(),
        other => other.to_string(),
    };

    (
        status,
        Json(ErrorResponse {
            error,
            code: code.to_string(),
            details,
        }),
    )
}

fn warning(delivery: &Delivery) -> Option<String> {
    (!delivery.is_complete()).then(|| DELIVERY_WARNING.to_string())
}

fn command(claims: &Claims, section: &str, number: u32) -> DraftCommand {
    DraftCommand {
        key: DraftKey::new(section.to_lowercase(), number),
        caller: claims.caller(),
    }
}

/// Announce the change on the SSE stream and build the HTTP reply
fn respond(
    state: &AppState,
    claims: &Claims,
    action: &str,
    out: DraftActionOutput,
) -> Json<DraftActionResponse> {
    state.broadcast_event(
        DraftEvent::new("draft")
            .with_draft(&out.snapshot.key, &claims.user_id)
            .with_action(action)
            .with_data(serde_json::json!({
                "status": out.snapshot.status,
                "remaining": out.snapshot.remaining,
            })),
    );

    Json(DraftActionResponse {
        success: true,
        message: out.message,
        warning: warning(&out.delivery),
        draft: out.snapshot,
    })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST /api/drafts/:section - Request a new draft
pub async fn open_draft(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(section): Path<String>,
) -> Result<(StatusCode, Json<DraftActionResponse>), ApiError> {
    let out = OpenDraft::new(state.drafts.clone())
        .execute(OpenDraftInput {
            section,
            caller: claims.caller(),
        })
        .await
        .map_err(action_error)?;

    let reply = respond(
        &state,
        &claims,
        "opened",
        DraftActionOutput {
            message: format!("Draft {} has been requested.", out.key),
            snapshot: out.snapshot,
            delivery: out.delivery,
        },
    );
    Ok((StatusCode::CREATED, reply))
}

/// GET /api/drafts/:section - Live drafts of a section
pub async fn list_drafts(
    State(state): State<Arc<AppState>>,
    Path(section): Path<String>,
) -> Result<Json<DraftListResponse>, ApiError> {
    let drafts = ListDrafts::new(state.drafts.clone())
        .execute(&section)
        .await
        .map_err(action_error)?;

    Ok(Json(DraftListResponse {
        success: true,
        total: drafts.len(),
        drafts,
    }))
}

/// GET /api/drafts/:section/:number - Snapshot of one draft
pub async fn get_draft(
    State(state): State<Arc<AppState>>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftResponse>, ApiError> {
    let draft = GetDraft::new(state.drafts.clone())
        .execute(&DraftKey::new(section.to_lowercase(), number))
        .await
        .map_err(action_error)?;

    Ok(Json(DraftResponse {
        success: true,
        draft,
    }))
}

/// POST /api/drafts/:section/:number/join
pub async fn join_draft(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = JoinDraft::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "joined", out))
}

/// POST /api/drafts/:section/:number/leave
pub async fn leave_draft(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = LeaveDraft::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "left", out))
}

/// POST /api/drafts/:section/:number/sub/request
pub async fn request_sub(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = RequestSub::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "subbedOut", out))
}

/// POST /api/drafts/:section/:number/sub/join
pub async fn add_sub(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = AddSub::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "subbedIn", out))
}

/// POST /api/drafts/:section/:number/captain/reassign
pub async fn reassign_captain(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = ReassignCaptain::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "captainReassigned", out))
}

/// POST /api/drafts/:section/:number/reping
pub async fn reping(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = Reping::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "repinged", out))
}

/// POST /api/drafts/:section/:number/refresh
pub async fn refresh_draft(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = RefreshDraft::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "refreshed", out))
}

/// POST /api/drafts/:section/:number/end - Staff force end
pub async fn force_end(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = ForceEnd::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "ended", out))
}

/// POST /api/drafts/:section/:number/sub/force - Staff sub-out of another player
pub async fn force_sub(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
    Json(body): Json<PickRequest>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    if body.player_id.is_empty() {
        return Err(bad_request("Player id is required", "MISSING_PLAYER_ID"));
    }

    let cmd = command(&claims, &section, number);
    let out = ForceSub::new(state.drafts.clone())
        .execute(ForceSubInput {
            key: cmd.key,
            caller: cmd.caller,
            target: PlayerId::new(body.player_id),
        })
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "forceSubbed", out))
}

/// POST /api/drafts/:section/:number/pick
pub async fn pick_player(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
    Json(body): Json<PickRequest>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    if body.player_id.is_empty() {
        return Err(bad_request("Player id is required", "MISSING_PLAYER_ID"));
    }

    let cmd = command(&claims, &section, number);
    let out = PickPlayer::new(state.drafts.clone())
        .execute(PickPlayerInput {
            key: cmd.key,
            caller: cmd.caller,
            target: PlayerId::new(body.player_id),
        })
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "picked", out))
}

/// POST /api/drafts/:section/:number/start
pub async fn start_match(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let out = StartMatch::new(state.drafts.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "started", out))
}

/// POST /api/drafts/:section/:number/score
pub async fn adjust_score(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
    Json(body): Json<ScoreRequest>,
) -> Result<Json<DraftActionResponse>, ApiError> {
    let side = TeamSide::from_number(body.team)
        .ok_or_else(|| bad_request("Team must be 1 or 2", "INVALID_TEAM"))?;
    let change = match body.change.as_str() {
        "increment" => ScoreChange::Increment,
        "decrement" => ScoreChange::Decrement,
        _ => {
            return Err(bad_request(
                "Change must be increment or decrement",
                "INVALID_SCORE_CHANGE",
            ))
        }
    };

    let cmd = command(&claims, &section, number);
    let out = AdjustScore::new(state.drafts.clone())
        .execute(AdjustScoreInput {
            key: cmd.key,
            caller: cmd.caller,
            side,
            change,
        })
        .await
        .map_err(action_error)?;
    Ok(respond(&state, &claims, "scored", out))
}

/// POST /api/drafts/:section/:number/finish
pub async fn finish_draft(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path((section, number)): Path<(String, u32)>,
) -> Result<Json<FinishResponse>, ApiError> {
    let out = FinishDraft::new(state.drafts.clone(), state.ledger_repo.clone())
        .execute(command(&claims, &section, number))
        .await
        .map_err(action_error)?;

    state.broadcast_event(
        DraftEvent::new("draft")
            .with_draft(&out.snapshot.key, &claims.user_id)
            .with_action("finished")
            .with_data(serde_json::json!({ "ledgerComplete": out.ledger_complete })),
    );

    Ok(Json(FinishResponse {
        success: true,
        message: out.message,
        warning: warning(&out.delivery),
        draft: out.snapshot,
        reports: out.reports,
        ledger_complete: out.ledger_complete,
    }))
}
