// src/routes.rs

use axum::{Router, http::Method, middleware, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{handlers::leaderboard, state::AppState, utils::access::access_middleware};

/// Assembles the main application router.
///
/// * Mounts the leaderboard route behind the access gate.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Moodle client + config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let leaderboard_routes = Router::new()
        .route("/leaderboard", get(leaderboard::get_leaderboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            access_middleware,
        ));

    Router::new()
        .nest("/api", leaderboard_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
