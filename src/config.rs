//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use thiserror::Error;
use tracing::warn;

const DEV_JWT_SECRET: &str = "vitrine-dev-secret-change-me";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 3000,
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_pool_size: usize,
    pub require_tls: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: String::new(),
            database: "postgres".to_string(),
            max_pool_size: 10,
            require_tls: false,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Administrator created at startup when missing
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub email: String,
    pub password: String,
}

/// Token signing and admin bootstrap
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
    pub admin: Option<AdminBootstrap>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_minutes: 60,
            admin: None,
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub auth: AuthConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let server = ServerConfig {
            host: var("HOST")
                .and_then(|h| h.parse().ok())
                .unwrap_or(defaults.server.host),
            port: var("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.server.port),
        };

        let max_pool_size = var("DB_MAX_CONNECTIONS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.database.max_pool_size);

        // Try DATABASE_URL first, fall back to individual vars
        let database = match var("DATABASE_URL") {
            Some(database_url) => Self::parse_database_url(&database_url, max_pool_size)?,
            None => DatabaseConfig {
                host: var("DB_HOST").unwrap_or(defaults.database.host),
                port: var("DB_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.database.port),
                user: var("DB_USER").unwrap_or(defaults.database.user),
                password: var("DB_PASSWORD").unwrap_or_default(),
                database: var("DB_NAME").unwrap_or(defaults.database.database),
                max_pool_size,
                require_tls: var("DB_SSLMODE").is_some_and(|m| m == "require"),
            },
        };

        let cors = CorsConfig {
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.cors.allowed_origins),
        };

        let auth = Self::auth_config(&var, defaults.auth)?;

        Ok(Self {
            server,
            database,
            cors,
            auth,
        })
    }

    fn auth_config<F>(var: &F, defaults: AuthConfig) -> Result<AuthConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let jwt_secret = match var("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                warn!("JWT_SECRET is not set, using the development secret");
                defaults.jwt_secret
            }
            None => return Err(ConfigError::MissingVar("JWT_SECRET".to_string())),
        };

        let token_ttl_minutes = match var("JWT_TTL_MINUTES") {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|m| *m > 0)
                .ok_or_else(|| ConfigError::InvalidValue(format!("JWT_TTL_MINUTES '{}'", raw)))?,
            None => defaults.token_ttl_minutes,
        };

        let admin = match (var("ADMIN_EMAIL"), var("ADMIN_PASSWORD")) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminBootstrap { email, password })
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!("ADMIN_EMAIL and ADMIN_PASSWORD must both be set; skipping admin bootstrap");
                None
            }
            _ => None,
        };

        Ok(AuthConfig {
            jwt_secret,
            token_ttl_minutes,
            admin,
        })
    }

    /// Parse a DATABASE_URL connection string (postgresql://...)
    fn parse_database_url(url: &str, max_pool_size: usize) -> Result<DatabaseConfig, ConfigError> {
        let parsed = url::Url::parse(url).map_err(|_| {
            ConfigError::InvalidValue("Invalid DATABASE_URL format (expected postgresql://...)".to_string())
        })?;

        let host = parsed
            .host_str()
            .ok_or_else(|| ConfigError::InvalidValue("Missing host in DATABASE_URL".to_string()))?
            .to_string();

        let require_tls = parsed
            .query_pairs()
            .any(|(key, value)| key == "sslmode" && value == "require");

        Ok(DatabaseConfig {
            host,
            port: parsed.port().unwrap_or(5432),
            user: parsed.username().to_string(),
            password: parsed.password().map(|p| p.to_string()).unwrap_or_default(),
            database: parsed.path().trim_start_matches('/').to_string(),
            max_pool_size,
            require_tls,
        })
    }
}
