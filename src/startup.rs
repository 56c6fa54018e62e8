//! Application Startup
//!
//! Application building and server initialization.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;

use crate::application::services::{
    RentalService, RentalServiceImpl, UserService, UserServiceImpl,
};
use crate::config::{Settings, StorageBackend};
use crate::infrastructure::crypto::Argon2Encoder;
use crate::infrastructure::database;
use crate::infrastructure::repositories::{
    PgItemRepository, PgRentalRepository, PgUserRepository,
};
use crate::infrastructure::storage::MemoryStore;
use crate::presentation::http::handlers::health;
use crate::presentation::http::routes;
use crate::presentation::middleware::{cors, logging};
use crate::shared::snowflake::SnowflakeGenerator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserService>,
    pub rentals: Arc<dyn RentalService>,
    /// `None` for the in-memory backend
    pub db: Option<PgPool>,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Services backed by PostgreSQL
    pub fn postgres(pool: PgPool, settings: Arc<Settings>) -> Self {
        let ids = Arc::new(SnowflakeGenerator::new(settings.snowflake.machine_id));
        let user_repo = Arc::new(PgUserRepository::new(pool.clone()));

        let users = UserServiceImpl::new(user_repo.clone(), Arc::new(Argon2Encoder::default()), ids.clone());
        let rentals = RentalServiceImpl::new(
            Arc::new(PgRentalRepository::new(pool.clone())),
            Arc::new(PgItemRepository::new(pool.clone())),
            user_repo,
            ids,
        )
        .with_max_page_size(settings.pagination.max_page_size);

        Self {
            users: Arc::new(users),
            rentals: Arc::new(rentals),
            db: Some(pool),
            settings,
        }
    }

    /// Services backed by a shared [`MemoryStore`]
    pub fn in_memory(store: Arc<MemoryStore>, settings: Arc<Settings>) -> Self {
        let ids = Arc::new(SnowflakeGenerator::new(settings.snowflake.machine_id));

        let users = UserServiceImpl::new(store.clone(), Arc::new(Argon2Encoder::default()), ids.clone());
        let rentals = RentalServiceImpl::new(store.clone(), store.clone(), store, ids)
            .with_max_page_size(settings.pagination.max_page_size);

        Self {
            users: Arc::new(users),
            rentals: Arc::new(rentals),
            db: None,
            settings,
        }
    }
}

/// Router with tracing and CORS layers applied
pub fn build_router(state: AppState) -> Router {
    let cors = cors::create_cors_layer(&state.settings.cors);

    routes::create_router(state)
        .layer(logging::create_trace_layer())
        .layer(cors)
}

/// Application instance
pub struct Application {
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application from settings
    pub async fn build(settings: Settings) -> Result<Self> {
        health::init_server_start();
        let settings = Arc::new(settings);

        let state = match settings.database.backend {
            StorageBackend::Postgres => {
                let pool = database::create_pool(&settings.database).await?;
                tracing::info!("Database connection pool created");

                if settings.database.run_migrations {
                    database::run_migrations(&pool).await?;
                    tracing::info!("Database migrations applied");
                }

                AppState::postgres(pool, settings.clone())
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage; data will not survive a restart");
                AppState::in_memory(Arc::new(MemoryStore::new()), settings.clone())
            }
        };

        let router = build_router(state);

        // Bind to address
        let listener = TcpListener::bind(settings.server_addr()).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);

        Ok(Self { listener, router })
    }

    /// Run the server until Ctrl-C
    pub async fn run_until_stopped(self) -> Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections");
}
