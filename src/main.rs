use std::sync::Arc;

use capital_copilot::config::ServiceConfig;
use capital_copilot::gate::{GateState, gate_routes};
use capital_copilot::onboarding::OnboardingController;
use capital_copilot::onboarding::routes::{OnboardingRouteState, onboarding_routes};
use capital_copilot::store::{LibSqlBackend, SettingsStore};
use tower_http::cors::CorsLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServiceConfig::from_env()?;

    eprintln!("💰 Capital Copilot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://0.0.0.0:{}/api/onboarding/status", config.port);
    eprintln!("   Database: {}", config.db_path);

    // ── Settings store ───────────────────────────────────────────────────
    let db_path = std::path::Path::new(&config.db_path);
    let store: Arc<dyn SettingsStore> = Arc::new(
        LibSqlBackend::new_local(db_path).await.unwrap_or_else(|e| {
            eprintln!("Error: Failed to open database at {}: {}", config.db_path, e);
            std::process::exit(1);
        }),
    );

    // ── Onboarding controller ────────────────────────────────────────────
    let controller = Arc::new(OnboardingController::load(store).await);

    // ── REST surface ─────────────────────────────────────────────────────
    let app = onboarding_routes(OnboardingRouteState {
        controller: Arc::clone(&controller),
    })
    .merge(gate_routes(GateState { controller }))
    .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
