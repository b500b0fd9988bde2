pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::{delete, get, post},
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .settings
        .app
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    // Attendance routes (under session)
    let attendance_routes = Router::new()
        .route("/", get(routes::attendance::list))
        .route("/import", post(routes::attendance::import))
        .route("/recalculate", post(routes::attendance::recalculate));

    // Alias routes (under user)
    let alias_routes = Router::new()
        .route("/", get(routes::alias::list).post(routes::alias::add))
        .route("/{alias_id}", delete(routes::alias::remove));

    let api = Router::new()
        .nest("/session/{session_id}/attendance", attendance_routes)
        .nest("/user/{user_id}/alias", alias_routes);

    // Health check
    let health = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .merge(health)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
