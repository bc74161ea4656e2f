//! REST endpoints for the onboarding wizard — the step views and shell.
//!
//! Validation lives at this layer (via [`super::steps`]); the controller
//! merges and persists whatever it is given.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use super::controller::OnboardingController;
use super::model::{FinancialFocus, OnboardingPatch};
use super::state::TOTAL_STEPS;
use super::steps::{
    AccountDraft, FieldError, GoalDraft, PaymentDraft, advance_blockers, skip_allowed, toggle_focus,
};
use crate::error::DatabaseError;

/// Shared state for onboarding routes.
#[derive(Clone)]
pub struct OnboardingRouteState {
    pub controller: Arc<OnboardingController>,
}

/// Build the onboarding REST routes.
pub fn onboarding_routes(state: OnboardingRouteState) -> Router {
    Router::new()
        .route("/api/onboarding/status", get(get_status))
        .route("/api/onboarding/data", get(get_data).patch(patch_data))
        .route("/api/onboarding/advance", post(advance))
        .route("/api/onboarding/skip", post(skip))
        .route("/api/onboarding/back", post(back))
        .route("/api/onboarding/step/{n}", post(jump))
        .route("/api/onboarding/focus", post(focus))
        .route("/api/onboarding/goals", post(add_goal))
        .route("/api/onboarding/goals/{id}", delete(remove_goal))
        .route("/api/onboarding/accounts", post(add_account))
        .route("/api/onboarding/accounts/{id}", delete(remove_account))
        .route("/api/onboarding/payments", post(add_payment))
        .route("/api/onboarding/payments/{id}", delete(remove_payment))
        .route("/api/onboarding/complete", post(complete))
        .route("/api/onboarding/reset", post(reset))
        .with_state(state)
}

fn store_error(e: DatabaseError) -> Response {
    tracing::error!("Onboarding store write failed: {e}");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({"error": "Failed to persist onboarding data"})),
    )
        .into_response()
}

fn blocked(errors: Vec<FieldError>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(serde_json::json!({"errors": errors})),
    )
        .into_response()
}

/// GET /api/onboarding/status
///
/// Flow status plus the shell chrome inputs (total steps, back visibility).
async fn get_status(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    let status = state.controller.status().await;
    Json(serde_json::json!({
        "completed": status.completed,
        "current_step": status.current_step,
        "is_loading": status.is_loading,
        "total_steps": TOTAL_STEPS,
        "show_back": !status.current_step.is_first(),
    }))
}

/// GET /api/onboarding/data
async fn get_data(State(state): State<OnboardingRouteState>) -> impl IntoResponse {
    Json(state.controller.data().await)
}

/// PATCH /api/onboarding/data
///
/// Unvalidated shallow merge, mirroring the views' free-form field edits.
async fn patch_data(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<OnboardingPatch>,
) -> Response {
    match state.controller.update(body).await {
        Ok(()) => Json(state.controller.data().await).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/advance
///
/// Runs the current step's blockers; 422 with field errors when blocked.
/// The last step has no forward transition — it finishes via `complete`.
async fn advance(State(state): State<OnboardingRouteState>) -> Response {
    let data = state.controller.data().await;
    if data.current_step.is_last() {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": "The final step finishes via complete"})),
        )
            .into_response();
    }
    let errors = advance_blockers(data.current_step, &data);
    if !errors.is_empty() {
        return blocked(errors);
    }
    match state.controller.next_step().await {
        Ok(step) => Json(serde_json::json!({"current_step": step})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/skip
///
/// Bypasses the Continue gate where the step allows it.
async fn skip(State(state): State<OnboardingRouteState>) -> Response {
    let step = state.controller.status().await.current_step;
    if !skip_allowed(step) {
        return (
            StatusCode::CONFLICT,
            Json(serde_json::json!({"error": format!("The {step} step cannot be skipped")})),
        )
            .into_response();
    }
    match state.controller.next_step().await {
        Ok(step) => Json(serde_json::json!({"current_step": step})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/back
///
/// Unconditional retreat, never gated by validation.
async fn back(State(state): State<OnboardingRouteState>) -> Response {
    match state.controller.prev_step().await {
        Ok(step) => Json(serde_json::json!({"current_step": step})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/step/{n}
///
/// Direct jump (progress-indicator taps); clamped into range.
async fn jump(State(state): State<OnboardingRouteState>, Path(n): Path<u8>) -> Response {
    match state.controller.go_to_step(n).await {
        Ok(step) => Json(serde_json::json!({"current_step": step})).into_response(),
        Err(e) => store_error(e),
    }
}

#[derive(Deserialize)]
struct FocusRequest {
    focus: FinancialFocus,
}

/// POST /api/onboarding/focus
async fn focus(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<FocusRequest>,
) -> Response {
    let current = state.controller.data().await.financial_focus;
    let updated = toggle_focus(&current, body.focus);
    let patch = OnboardingPatch {
        financial_focus: Some(updated.clone()),
        ..Default::default()
    };
    match state.controller.update(patch).await {
        Ok(()) => Json(serde_json::json!({"financial_focus": updated})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/goals
async fn add_goal(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<GoalDraft>,
) -> Response {
    let goal = match body.build() {
        Ok(goal) => goal,
        Err(errors) => return blocked(errors),
    };
    let mut goals = state.controller.data().await.goals;
    goals.push(goal.clone());
    let patch = OnboardingPatch {
        goals: Some(goals),
        ..Default::default()
    };
    match state.controller.update(patch).await {
        Ok(()) => (StatusCode::CREATED, Json(goal)).into_response(),
        Err(e) => store_error(e),
    }
}

/// DELETE /api/onboarding/goals/{id}
///
/// Payments linked to the removed goal keep their reference (soft links).
async fn remove_goal(State(state): State<OnboardingRouteState>, Path(id): Path<Uuid>) -> Response {
    let mut goals = state.controller.data().await.goals;
    let before = goals.len();
    goals.retain(|g| g.id != id);
    if goals.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Goal not found"})),
        )
            .into_response();
    }
    let patch = OnboardingPatch {
        goals: Some(goals),
        ..Default::default()
    };
    match state.controller.update(patch).await {
        Ok(()) => Json(serde_json::json!({"status": "removed"})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/accounts
async fn add_account(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<AccountDraft>,
) -> Response {
    let account = match body.build() {
        Ok(account) => account,
        Err(errors) => return blocked(errors),
    };
    let mut accounts = state.controller.data().await.accounts;
    accounts.push(account.clone());
    let patch = OnboardingPatch {
        accounts: Some(accounts),
        ..Default::default()
    };
    match state.controller.update(patch).await {
        Ok(()) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => store_error(e),
    }
}

/// DELETE /api/onboarding/accounts/{id}
async fn remove_account(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut accounts = state.controller.data().await.accounts;
    let before = accounts.len();
    accounts.retain(|a| a.id != id);
    if accounts.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Account not found"})),
        )
            .into_response();
    }
    let patch = OnboardingPatch {
        accounts: Some(accounts),
        ..Default::default()
    };
    match state.controller.update(patch).await {
        Ok(()) => Json(serde_json::json!({"status": "removed"})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/payments
async fn add_payment(
    State(state): State<OnboardingRouteState>,
    Json(body): Json<PaymentDraft>,
) -> Response {
    let payment = match body.build() {
        Ok(payment) => payment,
        Err(errors) => return blocked(errors),
    };
    let mut payments = state.controller.data().await.payments;
    payments.push(payment.clone());
    let patch = OnboardingPatch {
        payments: Some(payments),
        ..Default::default()
    };
    match state.controller.update(patch).await {
        Ok(()) => (StatusCode::CREATED, Json(payment)).into_response(),
        Err(e) => store_error(e),
    }
}

/// DELETE /api/onboarding/payments/{id}
async fn remove_payment(
    State(state): State<OnboardingRouteState>,
    Path(id): Path<Uuid>,
) -> Response {
    let mut payments = state.controller.data().await.payments;
    let before = payments.len();
    payments.retain(|p| p.id != id);
    if payments.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "Payment not found"})),
        )
            .into_response();
    }
    let patch = OnboardingPatch {
        payments: Some(payments),
        ..Default::default()
    };
    match state.controller.update(patch).await {
        Ok(()) => Json(serde_json::json!({"status": "removed"})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/complete
///
/// The terminal action of the last step. Sets `completed` without
/// validating any step data; the frontend navigates away afterward.
async fn complete(State(state): State<OnboardingRouteState>) -> Response {
    match state.controller.complete().await {
        Ok(()) => Json(serde_json::json!({"completed": true})).into_response(),
        Err(e) => store_error(e),
    }
}

/// POST /api/onboarding/reset
async fn reset(State(state): State<OnboardingRouteState>) -> Response {
    match state.controller.reset().await {
        Ok(()) => Json(serde_json::json!({"status": "reset"})).into_response(),
        Err(e) => store_error(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::store::LibSqlBackend;

    async fn test_router() -> Router {
        let store = Arc::new(LibSqlBackend::new_memory().await.unwrap());
        let controller = Arc::new(OnboardingController::load(store).await);
        onboarding_routes(OnboardingRouteState { controller })
    }

    async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let request = match body {
            Some(json) => Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn advance_blocked_on_empty_profile() {
        let router = test_router().await;

        let (status, body) = send(&router, "POST", "/api/onboarding/advance", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 2);

        // Fill the profile, advance passes
        let patch = serde_json::json!({"preferred_name": "Ada", "country": "Canada"});
        let (status, _) = send(&router, "PATCH", "/api/onboarding/data", Some(patch)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&router, "POST", "/api/onboarding/advance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_step"], 2);
    }

    #[tokio::test]
    async fn skip_rules_follow_contract() {
        let router = test_router().await;

        // Profile cannot be skipped
        let (status, _) = send(&router, "POST", "/api/onboarding/skip", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        // Jump to accounts; skip is allowed there even with zero accounts
        let (status, _) = send(&router, "POST", "/api/onboarding/step/3", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send(&router, "POST", "/api/onboarding/skip", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_step"], 4);
    }

    #[tokio::test]
    async fn accounts_continue_blocked_until_account_added() {
        let router = test_router().await;
        send(&router, "POST", "/api/onboarding/step/3", None).await;

        let (status, _) = send(&router, "POST", "/api/onboarding/advance", None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let draft = serde_json::json!({
            "name": "Main Checking",
            "account_type": "checking",
            "balance": "1200.00",
        });
        let (status, created) =
            send(&router, "POST", "/api/onboarding/accounts", Some(draft)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["account_type"], "checking");

        let (status, body) = send(&router, "POST", "/api/onboarding/advance", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_step"], 4);
    }

    #[tokio::test]
    async fn goal_draft_errors_are_inline() {
        let router = test_router().await;
        let draft = serde_json::json!({"name": "", "target_amount": "abc"});
        let (status, body) = send(&router, "POST", "/api/onboarding/goals", Some(draft)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields: Vec<_> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["name", "target_amount"]);
    }

    #[tokio::test]
    async fn focus_toggle_is_exclusive() {
        let router = test_router().await;

        let body = serde_json::json!({"focus": "saving"});
        send(&router, "POST", "/api/onboarding/focus", Some(body)).await;
        let body = serde_json::json!({"focus": "all"});
        let (_, response) = send(&router, "POST", "/api/onboarding/focus", Some(body)).await;
        assert_eq!(response["financial_focus"], serde_json::json!(["all"]));
    }

    #[tokio::test]
    async fn removing_goal_leaves_payment_link_dangling() {
        let router = test_router().await;

        let goal = serde_json::json!({"name": "House", "target_amount": "50000"});
        let (_, goal) = send(&router, "POST", "/api/onboarding/goals", Some(goal)).await;
        let goal_id = goal["id"].as_str().unwrap().to_string();

        let payment = serde_json::json!({
            "name": "Down payment savings",
            "amount": "500",
            "recurring": true,
            "goal_id": goal_id,
        });
        let (status, _) = send(&router, "POST", "/api/onboarding/payments", Some(payment)).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &router,
            "DELETE",
            &format!("/api/onboarding/goals/{goal_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        // The payment still references the removed goal
        let (_, data) = send(&router, "GET", "/api/onboarding/data", None).await;
        assert!(data["goals"].as_array().unwrap().is_empty());
        assert_eq!(data["payments"][0]["goal_id"], goal["id"]);
    }

    #[tokio::test]
    async fn remove_unknown_id_is_not_found() {
        let router = test_router().await;
        let (status, _) = send(
            &router,
            "DELETE",
            &format!("/api/onboarding/accounts/{}", Uuid::new_v4()),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn status_includes_shell_chrome() {
        let router = test_router().await;

        let (_, body) = send(&router, "GET", "/api/onboarding/status", None).await;
        assert_eq!(body["total_steps"], 5);
        assert_eq!(body["show_back"], false);
        assert_eq!(body["is_loading"], false);

        send(&router, "POST", "/api/onboarding/step/2", None).await;
        let (_, body) = send(&router, "GET", "/api/onboarding/status", None).await;
        assert_eq!(body["show_back"], true);
    }

    #[tokio::test]
    async fn complete_and_reset() {
        let router = test_router().await;

        // The last step does not advance; it completes
        send(&router, "POST", "/api/onboarding/step/5", None).await;
        let (status, _) = send(&router, "POST", "/api/onboarding/advance", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&router, "POST", "/api/onboarding/complete", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["completed"], true);

        let (status, _) = send(&router, "POST", "/api/onboarding/reset", None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send(&router, "GET", "/api/onboarding/status", None).await;
        assert_eq!(body["completed"], false);
        assert_eq!(body["current_step"], 1);
    }
}
