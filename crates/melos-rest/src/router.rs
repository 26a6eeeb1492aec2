//! Main application router.

use crate::{
    controllers::{
        health_controller, lyrics_controller, search_controller, track_controller,
        user_controller,
    },
    middleware::{authorization_gate, logging_middleware},
    state::AppState,
};
use axum::{
    http::HeaderValue, middleware, response::IntoResponse, routing::get, Json, Router,
};
use melos_config::ServerConfig;
use serde_json::json;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Creates the main application router.
///
/// The authorization gate is layered over every route; public routes are
/// admitted inside the gate itself so the bypass order stays in one place.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let router = Router::new()
        .route("/", get(root))
        .route("/docs", get(docs))
        .merge(health_controller::router())
        .nest(
            "/tracks",
            track_controller::router().merge(lyrics_controller::router()),
        )
        .nest("/search", search_controller::router())
        .nest("/users", user_controller::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            authorization_gate,
        ))
        .with_state(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.contains(&"*".to_string()) {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Melos API v1"
}

/// Minimal API description served at the public docs route.
async fn docs() -> impl IntoResponse {
    Json(json!({
        "name": "melos-api",
        "version": env!("CARGO_PKG_VERSION"),
        "resources": ["/tracks", "/tracks/random", "/tracks/:id/lyrics", "/search", "/users/me"],
    }))
}
