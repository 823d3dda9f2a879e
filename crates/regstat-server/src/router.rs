use axum::routing::{any, get};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handler::{self, AppState};

/// Build the axum router.
///
/// The notification route accepts any method: the handler answers non-POST
/// requests itself (with `200 OK`, see [`handler::events_handler`]) instead
/// of letting the framework reply `405`.
pub fn build_router(route: &str, state: AppState) -> Router {
    Router::new()
        .route(route, any(handler::events_handler))
        .route("/healthz", get(handler::health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
