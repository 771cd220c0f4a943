//! Activity Signup Service
//!
//! Serves the extracurricular activity catalog over HTTP and lets students
//! sign up for, or unregister from, activities by email.

pub mod config;
pub mod directory;
pub mod error;
pub mod routes;
pub mod seed;

use std::path::PathBuf;

use axum::{
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

pub use config::Config;
pub use directory::{Activity, Directory};
pub use error::{AppError, AppResult, DirectoryError};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub directory: Directory,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(directory: Directory, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            directory,
            static_dir: static_dir.into(),
        }
    }

    /// Seeded directory plus the configured static directory
    pub fn from_config(config: &Config) -> Self {
        let directory = Directory::seeded();
        info!(
            "Loaded {} activities, serving static files from {}",
            directory.len(),
            config.static_dir.display()
        );
        Self::new(directory, config.static_dir.clone())
    }
}

/// Health check endpoint
async fn healthz() -> impl IntoResponse {
    "OK"
}

/// Create the Axum application router
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(routes::root))
        .route("/healthz", get(healthz))
        .route("/activities", get(routes::list_activities))
        .route("/activities/:activity_name/signup", post(routes::signup))
        .route(
            "/activities/:activity_name/participants",
            delete(routes::unregister),
        )
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
