//! # Backend
//!
//! Layered as `domain` (business rules), `storage` (SQLite persistence
//! behind traits) and `io` (the REST surface). [`initialize_backend`] wires
//! them together and [`create_router`] exposes them under `/api`.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::backend::config::Config;
use crate::backend::domain::{
    AuthService, ChildService, RewardService, SyncHub, TaskService, TokenService, WishService,
};
use crate::backend::storage::{
    ChildRepository, DbConnection, ParentRepository, RewardRepository, TaskRepository,
    WishRepository,
};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub child_service: ChildService,
    pub task_service: TaskService,
    pub wish_service: WishService,
    pub reward_service: RewardService,
    pub sync_hub: SyncHub,
}

impl AppState {
    /// Build every service over one database connection
    pub fn new(db: DbConnection, config: &Config) -> Self {
        let parents = Arc::new(ParentRepository::new(db.clone()));
        let children = Arc::new(ChildRepository::new(db.clone()));
        let tasks = Arc::new(TaskRepository::new(db.clone()));
        let wishes = Arc::new(WishRepository::new(db.clone()));
        let rewards = Arc::new(RewardRepository::new(db));

        let sync_hub = SyncHub::default();
        let tokens = TokenService::new(&config.jwt_secret, config.jwt_expiration_hours);

        let child_service = ChildService::new(children.clone(), sync_hub.clone());
        let auth_service = AuthService::new(parents.clone(), children, tokens);
        let task_service = TaskService::new(tasks, wishes.clone(), child_service.clone(), sync_hub.clone());
        let wish_service = WishService::new(wishes, child_service.clone(), sync_hub.clone());
        let reward_service = RewardService::new(rewards, parents, child_service.clone(), sync_hub.clone());

        Self {
            auth_service,
            child_service,
            task_service,
            wish_service,
            reward_service,
            sync_hub,
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &Config) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    info!("Setting up domain services");
    Ok(AppState::new(db, config))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &Config) -> Result<Router> {
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS_ORIGIN '{}'", config.cors_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Ok(Router::new()
        .nest("/api", io::rest::api_router())
        .fallback(io::rest::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state))
}
