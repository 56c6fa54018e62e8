//! Application settings and configuration structures.

use axum::http::HeaderValue;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure containing all application settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server configuration (host, port)
    pub server: ServerSettings,

    /// Persistence configuration
    pub database: DatabaseSettings,

    /// Snowflake ID generator settings
    pub snowflake: SnowflakeSettings,

    /// Listing page sizes
    pub pagination: PaginationSettings,

    /// CORS configuration
    pub cors: CorsSettings,

    /// Current environment (development, staging, production)
    pub environment: String,
}

/// Server binding configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to (e.g., "0.0.0.0")
    pub host: String,

    /// Port number to listen on
    pub port: u16,
}

/// Which store backs the repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    /// Process-local store; data is lost on restart
    Memory,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub backend: StorageBackend,

    /// Database connection URL (required for the postgres backend)
    pub url: Option<String>,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections to maintain
    pub min_connections: u32,

    /// Connection acquire timeout in seconds
    pub acquire_timeout: u64,

    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// Snowflake ID generator configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeSettings {
    /// Machine/worker ID (0-1023)
    pub machine_id: u16,
}

/// Pagination limits for listing endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationSettings {
    /// Page size used when the client omits `size`
    pub default_page_size: u32,

    /// Upper bound for client-supplied `size`
    pub max_page_size: u32,
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed origins; empty allows any origin.
    /// `APP__CORS__ALLOWED_ORIGINS` takes a comma-separated list.
    pub allowed_origins: Vec<String>,
}

impl Settings {
    /// Load settings from environment variables and configuration files.
    ///
    /// The loading order is:
    /// 1. config/default.toml (base configuration)
    /// 2. config/{RUN_ENV}.toml (environment-specific overrides)
    /// 3. Environment variables (highest priority)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if configuration cannot be loaded or parsed,
    /// or if the loaded values are inconsistent.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        // Determine the running environment
        let environment = std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into());

        Self::builder(&environment)?
            .build()?
            .try_deserialize()
            .and_then(Self::validate)
    }

    /// Defaults plus every configuration source, before deserialization.
    fn builder(
        environment: &str,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            // Start with default values
            .set_default("environment", environment)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.backend", "postgres")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout", 30)?
            .set_default("database.run_migrations", true)?
            .set_default("snowflake.machine_id", 1)?
            .set_default("pagination.default_page_size", 20)?
            .set_default("pagination.max_page_size", 100)?
            .set_default("cors.allowed_origins", vec!["http://localhost:3000"])?
            // Load from config files
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Load from environment variables
            // APP__SERVER__PORT=8080 -> server.port = 8080
            .add_source(environment_source())
            // Map simple environment variables
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("database.backend", std::env::var("STORAGE_BACKEND").ok())
    }

    /// Reject configurations the application cannot start with.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_none() {
            return Err(ConfigError::Message(
                "database.url (or DATABASE_URL) is required for the postgres backend".into(),
            ));
        }

        if self.snowflake.machine_id > 1023 {
            return Err(ConfigError::Message(format!(
                "snowflake.machine_id must be within 0..=1023, got {}",
                self.snowflake.machine_id
            )));
        }

        for origin in &self.cors.allowed_origins {
            let is_url = origin.starts_with("http://") || origin.starts_with("https://");
            if !is_url || origin.parse::<HeaderValue>().is_err() {
                return Err(ConfigError::Message(format!(
                    "cors.allowed_origins contains an invalid origin: {origin:?}"
                )));
            }
        }

        let pagination = &self.pagination;
        if pagination.default_page_size == 0 || pagination.default_page_size > pagination.max_page_size {
            return Err(ConfigError::Message(format!(
                "pagination.default_page_size must be within 1..={}, got {}",
                pagination.max_page_size, pagination.default_page_size
            )));
        }

        Ok(self)
    }

    /// Get the full server address as a string.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Settings for an in-memory instance; used by tests and local demos.
    pub fn in_memory() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 0,
            },
            database: DatabaseSettings {
                backend: StorageBackend::Memory,
                url: None,
                max_connections: 1,
                min_connections: 0,
                acquire_timeout: 5,
                run_migrations: false,
            },
            snowflake: SnowflakeSettings { machine_id: 1 },
            pagination: PaginationSettings {
                default_page_size: 20,
                max_page_size: 100,
            },
            cors: CorsSettings {
                allowed_origins: vec![],
            },
            environment: "test".into(),
        }
    }
}

/// `APP__`-prefixed environment variables.
fn environment_source() -> Environment {
    Environment::default()
        .prefix("APP")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}
