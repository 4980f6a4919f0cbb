use std::sync::Arc;

use axum::{Router, routing::get};
use db::DBService;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod routes;

use config::ServerConfig;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    db: DBService,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(db: DBService, config: ServerConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::health::router(&state))
        .merge(routes::seo::router(&state))
        .merge(routes::robots::router(&state))
        .merge(routes::redirects::router(&state));

    Router::new()
        .route("/robots.txt", get(routes::robots::serve_robots_txt))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
