pub mod vehicle_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

/// Construir el router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/vehicle", vehicle_routes::create_vehicle_router())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}

/// Endpoint de liveness
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "service": "vehicle-catalog",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
