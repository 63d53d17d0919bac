pub mod draft;
pub mod health;
pub mod report;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::middleware::auth_middleware;
use crate::api::sse::sse_handler;
use crate::api::AppState;

/// Create the main API router
pub fn create_api_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .nest("/drafts", create_draft_router(state.clone()))
        .nest("/reports", create_report_router(state.clone()))
        .route("/events", get(sse_handler))
        .route("/health", get(health::health_handler))
        .with_state(state)
}

/// Create draft router
fn create_draft_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        // Public reads
        .route("/:section", get(draft::list_drafts))
        .route("/:section/:number", get(draft::get_draft))
        // Commands (require auth)
        .route(
            "/:section",
            post(draft::open_draft).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/join",
            post(draft::join_draft).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/leave",
            post(draft::leave_draft).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/sub/request",
            post(draft::request_sub).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/sub/join",
            post(draft::add_sub).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/sub/force",
            post(draft::force_sub).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/captain/reassign",
            post(draft::reassign_captain).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/reping",
            post(draft::reping).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/refresh",
            post(draft::refresh_draft).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/end",
            post(draft::force_end).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/pick",
            post(draft::pick_player).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/start",
            post(draft::start_match).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/score",
            post(draft::adjust_score).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .route(
            "/:section/:number/finish",
            post(draft::finish_draft).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state)
}

/// Create report router
fn create_report_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/:section",
            post(report::report_match).layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .with_state(state)
}
