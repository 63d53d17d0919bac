//! API Integration Tests for the draft coordinator
//!
//! Drives the HTTP router end to end against an in-memory database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::{Service, ServiceExt};

use draft_coordinator::api;
use draft_coordinator::infrastructure::app_state::AppState;
use draft_coordinator::infrastructure::config::AppConfig;

/// Helper to create a test application
async fn create_test_app() -> (Router, Arc<AppState>) {
    let config = AppConfig::from_lookup(|key| match key {
        "DATABASE_URL" => Some("sqlite::memory:".to_string()),
        "JWT_SECRET" => Some("test-secret-key".to_string()),
        "DRAFT_RNG_SEED" => Some("7".to_string()),
        _ => None,
    })
    .expect("Failed to read config");

    let state = AppState::from_config(config)
        .await
        .expect("Failed to create app state");
    let state = Arc::new(state);

    let app = Router::new()
        .nest("/api", api::routes::create_api_router(state.clone()))
        .with_state(state.clone());
    (app, state)
}

fn token(state: &AppState, name: &str, sections: &[&str]) -> String {
    let sections: Vec<String> = sections.iter().map(|s| s.to_string()).collect();
    state
        .jwt_service
        .sign(name, name, &sections)
        .expect("Failed to sign token")
}

async fn send(app: &mut Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = ServiceExt::<Request<Body>>::ready(app)
        .await
        .unwrap()
        .call(request)
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}

/// Helper to make a POST request with auth header
async fn post_json_auth(
    app: &mut Router,
    path: &str,
    body: Value,
    token: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header("Content-Type", "application/json")
        .header("Authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &mut Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Open LP1 as p0 and join p1..=joiners
async fn open_draft(app: &mut Router, state: &AppState, joiners: usize) -> Value {
    let (status, mut body) =
        post_json_auth(app, "/api/drafts/lp", json!({}), &token(state, "p0", &["lp"])).await;
    assert_eq!(status, StatusCode::CREATED);

    for i in 1..=joiners {
        let name = format!("p{}", i);
        let (status, joined) = post_json_auth(
            app,
            "/api/drafts/lp/1/join",
            json!({}),
            &token(state, &name, &["lp"]),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body = joined;
    }
    body
}

// ============================================================================
// Health / Auth
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (mut app, _) = create_test_app().await;

    let (status, body) = get(&mut app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sections"][0]["prefix"], "io");
    assert_eq!(body["sections"][1]["prefix"], "lp");
    assert_eq!(body["sections"][1]["name"], "LaunchPoint");
    assert_eq!(body["sections"][1]["tracked_drafts"], 0);
}

#[tokio::test]
async fn test_health_counts_tracked_drafts() {
    let (mut app, state) = create_test_app().await;
    open_draft(&mut app, &state, 1).await;

    let (_, body) = get(&mut app, "/api/health").await;

    assert_eq!(body["sections"][0]["tracked_drafts"], 0);
    assert_eq!(body["sections"][1]["tracked_drafts"], 1);
}

#[tokio::test]
async fn test_commands_require_token() {
    let (mut app, _) = create_test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/drafts/lp")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&mut app, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) =
        post_json_auth(&mut app, "/api/drafts/lp", json!({}), "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Draft lifecycle
// ============================================================================

#[tokio::test]
async fn test_open_draft() {
    let (mut app, state) = create_test_app().await;

    let body = open_draft(&mut app, &state, 0).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["draft"]["key"], "LP1");
    assert_eq!(body["draft"]["status"], "open");
    assert_eq!(body["draft"]["activeCount"], 1);
    assert_eq!(body["draft"]["caption"], "@LaunchPoint +7");
    assert!(body.get("warning").is_none());
}

#[tokio::test]
async fn test_full_queue_draws_captains() {
    let (mut app, state) = create_test_app().await;

    let body = open_draft(&mut app, &state, 7).await;

    assert_eq!(body["draft"]["status"], "initialized");
    assert_eq!(body["draft"]["remaining"], 0);
    let team1 = body["draft"]["captains"]["team1"].as_str().unwrap();
    let team2 = body["draft"]["captains"]["team2"].as_str().unwrap();
    assert_ne!(team1, team2);

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/join",
        json!({}),
        &token(&state, "late", &["lp"]),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "QUEUE_FULL");
}

#[tokio::test]
async fn test_join_twice_is_rejected() {
    let (mut app, state) = create_test_app().await;
    open_draft(&mut app, &state, 1).await;

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/join",
        json!({}),
        &token(&state, "p1", &["lp"]),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_QUEUED");
}

#[tokio::test]
async fn test_wrong_section() {
    let (mut app, state) = create_test_app().await;
    open_draft(&mut app, &state, 0).await;

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/join",
        json!({}),
        &token(&state, "outsider", &["io"]),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "WRONG_SECTION");
}

#[tokio::test]
async fn test_unknown_draft_and_section() {
    let (mut app, _) = create_test_app().await;

    let (status, body) = get(&mut app, "/api/drafts/lp/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "DRAFT_NOT_FOUND");

    let (status, body) = get(&mut app, "/api/drafts/zz").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "SECTION_NOT_FOUND");
}

#[tokio::test]
async fn test_leave_and_list() {
    let (mut app, state) = create_test_app().await;
    open_draft(&mut app, &state, 2).await;

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/leave",
        json!({}),
        &token(&state, "p2", &["lp"]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "You have left the draft.");
    assert_eq!(body["draft"]["remaining"], 6);

    let (status, body) = get(&mut app, "/api/drafts/LP").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["drafts"][0]["key"], "LP1");
}

#[tokio::test]
async fn test_reping_cooldown() {
    let (mut app, state) = create_test_app().await;
    open_draft(&mut app, &state, 1).await;

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/reping",
        json!({}),
        &token(&state, "p1", &["lp"]),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["code"], "COOLDOWN_ACTIVE");
}

#[tokio::test]
async fn test_force_end_closes_draft() {
    let (mut app, state) = create_test_app().await;
    open_draft(&mut app, &state, 3).await;

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/end",
        json!({}),
        &token(&state, "staff", &["lp"]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["draft"]["status"], "ended");

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/join",
        json!({}),
        &token(&state, "late", &["lp"]),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DRAFT_CLOSED");
}

#[tokio::test]
async fn test_force_sub() {
    let (mut app, state) = create_test_app().await;
    let staff = token(&state, "staff", &["lp"]);
    open_draft(&mut app, &state, 3).await;

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/sub/force",
        json!({ "playerId": "p2" }),
        &staff,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NOTHING_TO_SUB");

    for i in 4..8 {
        let name = format!("p{}", i);
        post_json_auth(
            &mut app,
            "/api/drafts/lp/1/join",
            json!({}),
            &token(&state, &name, &["lp"]),
        )
        .await;
    }

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/sub/force",
        json!({ "playerId": "p2" }),
        &staff,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "p2 has been subbed out.");
    assert_eq!(body["draft"]["numInactive"], 1);

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/sub/force",
        json!({ "playerId": "p2" }),
        &staff,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "PLAYER_INACTIVE");

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/sub/force",
        json!({ "playerId": "ghost" }),
        &staff,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "UNKNOWN_PLAYER");
}

#[tokio::test]
async fn test_score_validation() {
    let (mut app, state) = create_test_app().await;
    open_draft(&mut app, &state, 7).await;

    let (status, body) = post_json_auth(
        &mut app,
        "/api/drafts/lp/1/score",
        json!({ "team": 3, "change": "increment" }),
        &token(&state, "p1", &["lp"]),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_TEAM");
}

// ============================================================================
// Reports
// ============================================================================

#[tokio::test]
async fn test_manual_report() {
    let (mut app, state) = create_test_app().await;
    let staff = token(&state, "staff", &["lp"]);
    let report = json!({
        "type": "cycle",
        "gamesPlayed": 7,
        "gamesWon": 4,
        "players": [
            { "id": "a", "name": "Ink" },
            { "id": "b", "name": "Splat" }
        ]
    });

    let (status, body) = post_json_auth(&mut app, "/api/reports/lp", report.clone(), &staff).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "COMPLETE");
    assert_eq!(body["players"][0]["status"], "added");

    let (status, body) = post_json_auth(&mut app, "/api/reports/lp", report, &staff).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["players"][0]["status"], "updated");
}

#[tokio::test]
async fn test_report_validation() {
    let (mut app, state) = create_test_app().await;
    let staff = token(&state, "staff", &["lp"]);

    let (status, body) = post_json_auth(
        &mut app,
        "/api/reports/lp",
        json!({ "type": "weekly", "gamesPlayed": 1, "gamesWon": 1, "players": [] }),
        &staff,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REPORT_TYPE");

    let (status, body) = post_json_auth(
        &mut app,
        "/api/reports/lp",
        json!({ "type": "sub", "gamesPlayed": 2, "gamesWon": 3,
                "players": [{ "id": "a", "name": "Ink" }] }),
        &staff,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REPORT");
}
