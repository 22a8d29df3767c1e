//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::headers;
use crate::state::AppState;

/// Create the application router.
///
/// Management routes live under `/api/sites`; every other `GET` is a
/// public site request.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/api/sites",
            get(handlers::sites::list_sites).post(handlers::sites::create_site),
        )
        .route("/api/sites/{id}", delete(handlers::sites::delete_site));

    Router::new()
        .merge(api_routes)
        .fallback(get(handlers::public_site::render_page))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(headers::content_type_options_layer())
                .layer(headers::referrer_policy_layer()),
        )
        .with_state(state)
}
