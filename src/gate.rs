//! Landing gate — routes the user to the wizard or the dashboard summary.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};

use crate::onboarding::OnboardingController;

/// Shared state for the gate routes.
#[derive(Clone)]
pub struct GateState {
    pub controller: Arc<OnboardingController>,
}

/// Build the landing-gate routes.
pub fn gate_routes(state: GateState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/onboarding", get(wizard_entry))
        .with_state(state)
}

/// GET /
///
/// While loading: a placeholder, no navigation. Incomplete: redirect into
/// the wizard. Complete: a read-only summary computed from aggregate counts.
async fn home(State(state): State<GateState>) -> Response {
    if state.controller.is_loading() {
        return Json(serde_json::json!({"loading": true})).into_response();
    }

    let data = state.controller.data().await;
    if !data.completed {
        return Redirect::temporary("/onboarding").into_response();
    }

    Json(serde_json::json!({
        "preferred_name": data.preferred_name,
        "currency": data.currency,
        "goal_count": data.goals.len(),
        "account_count": data.accounts.len(),
        "payment_count": data.payments.len(),
    }))
    .into_response()
}

/// GET /onboarding
///
/// Wizard entry point — reports where the flow stands so a client can
/// render the right step.
async fn wizard_entry(State(state): State<GateState>) -> impl IntoResponse {
    let status = state.controller.status().await;
    Json(serde_json::json!({
        "completed": status.completed,
        "current_step": status.current_step,
        "is_loading": status.is_loading,
    }))
}
