pub mod config;
pub mod db;
pub mod error;
pub mod spatial;
pub mod search;
pub mod store;
pub mod users;

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::{web, HttpResponse};

use crate::config::CorsConfig;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use crate::config::Settings;

pub use db::{DbOperations, PointOfInterest};
pub use search::{CategoryRegistry, QueryEngine, SearchService};
pub use store::{MemoryStore, PoiStore, UserStore};

/// Health check endpoint handler
/// Liveness only: answers without touching the database.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Register every route and the JSON body configuration.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(search::handlers::json_config())
        .route("/health", web::get().to(health_check))
        .route("/users/count", web::get().to(users::handlers::users_count))
        .route("/categories", web::get().to(search::handlers::list_categories))
        .route("/search", web::post().to(search::handlers::search));
}

/// CORS middleware for the configured origins. An empty origin list allows
/// any origin; a disabled config falls back to the restrictive default.
pub fn build_cors(config: &CorsConfig) -> Cors {
    if !config.enabled {
        return Cors::default();
    }

    let origins = config.allowed_origins();
    let cors = if origins.is_empty() {
        Cors::default().allow_any_origin()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors.allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(config.max_age as usize)
}

/// Application state shared across all workers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub search: Arc<SearchService>,
    pub users: Arc<dyn UserStore>,
    db: Option<DbOperations>,
}

impl AppState {
    /// State backed by PostgreSQL. Connections are opened on first use.
    pub fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::connect_lazy(&config.database)?;
        let store = Arc::new(db.clone());

        let mut state = Self::with_stores(config, store.clone(), store);
        state.db = Some(db);
        Ok(state)
    }

    /// State over caller-provided stores.
    pub fn with_stores(
        config: Settings,
        pois: Arc<dyn PoiStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        let engine = QueryEngine::new(pois, CategoryRegistry::default(), config.search.clone());

        Self {
            config: Arc::new(config),
            search: Arc::new(SearchService::new(engine)),
            users,
            db: None,
        }
    }

    pub async fn shutdown(&self) -> Result<()> {
        if let Some(db) = &self.db {
            db.close().await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_app_state_creation() {
        let mut config = Settings::new_for_test().expect("Failed to load test config");
        assert!(AppState::new(config.clone()).is_ok());

        config.database.url = "definitely not a url".to_string();
        let state = AppState::new(config);
        assert!(matches!(state, Err(AppError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_app_state_clone() {
        let config = Settings::new_for_test().expect("Failed to load test config");
        let store = Arc::new(MemoryStore::default());
        let state = AppState::with_stores(config, store.clone(), store);

        let cloned = state.clone();

        assert!(Arc::ptr_eq(&state.config, &cloned.config));
        assert!(Arc::ptr_eq(&state.search, &cloned.search));
        assert!(state.shutdown().await.is_ok());
    }
}
