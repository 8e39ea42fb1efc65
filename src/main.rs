//! FPV Builder Backend
//!
//! REST backend for the FPV kit storefront: a SQLite component catalog, saved
//! builds, and the current build with its compatibility checks.

mod api;
mod build;
mod catalog;
mod config;
mod db;
mod errors;
mod models;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use build::BuildStore;
use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub build: Arc<BuildStore>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting FPV Builder Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    if config.seed_catalog {
        let seeded = repo.seed_catalog().await?;
        if seeded > 0 {
            tracing::info!("Seeded catalog with {} components", seeded);
        }
    }

    let state = AppState {
        repo,
        build: Arc::new(BuildStore::new()),
    };
    tokio::spawn(build::log_build_changes(state.build.subscribe()));

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Catalog
        .route("/catalog/revision", get(api::get_revision))
        .route("/components", get(api::list_components))
        .route("/components", post(api::create_component))
        .route("/components/{id}", get(api::get_component))
        .route("/components/{id}", put(api::update_component))
        .route("/components/{id}", delete(api::delete_component))
        // Saved builds
        .route("/builds", get(api::list_builds))
        .route("/builds", post(api::create_build))
        .route("/builds/{id}", get(api::get_build))
        .route("/builds/{id}", put(api::update_build))
        .route("/builds/{id}", delete(api::delete_build))
        .route(
            "/builds/{id}/with-components",
            get(api::get_build_with_components),
        )
        // Current build
        .route("/build", get(api::get_current_build))
        .route("/build/components", post(api::add_to_build))
        .route("/build/components/{category}", delete(api::remove_from_build))
        .route("/build/reset", post(api::reset_build))
        .route("/build/load/{id}", post(api::load_build))
        .route("/build/save", post(api::save_current_build));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod test_support;
