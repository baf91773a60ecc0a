use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    let frontend_dir = state.config.frontend_dir.clone();
    Router::new()
        .route("/api/health", get(handlers::healthcheck))
        // Tenant routes
        .route("/api/tenants", get(handlers::tenants::list_tenants))
        .route("/api/tenants", post(handlers::tenants::create_tenant))
        .route("/api/tenants/summary", get(handlers::tenants::tenant_summary))
        .route("/api/tenants/:id", get(handlers::tenants::get_tenant))
        .route("/api/tenants/:id/status", put(handlers::tenants::update_tenant_status))
        // Reminder routes
        .route("/api/tenants/:id/reminder", post(handlers::reminders::send_reminder))
        .route("/api/reminders", get(handlers::reminders::list_in_flight))
        // WebSocket route
        .route("/api/ws", get(crate::ws_upgrade_handler))
        // Static files (frontend)
        .nest_service("/assets", ServeDir::new(format!("{}/assets", frontend_dir)))
        .fallback_service(ServeDir::new(&frontend_dir).fallback(
            tower_http::services::ServeFile::new(format!("{}/index.html", frontend_dir)),
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
