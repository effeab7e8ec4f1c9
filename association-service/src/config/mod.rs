use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct AssociationConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the service that issues session tokens.
    pub jwt_secret: Secret<String>,
    /// Cookie carrying the session token for browser callers.
    pub session_cookie: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub origin: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub avatar_path: String,
}

impl AssociationConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common = core_config::Config::load()?;
        let is_prod = common.environment.is_production();

        Ok(AssociationConfig {
            mongodb: MongoConfig {
                uri: get_env("MONGODB_URI", Some("mongodb://localhost:27017"), is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("association_db"), is_prod)?,
            },
            auth: AuthConfig {
                jwt_secret: Secret::new(get_env(
                    "JWT_SECRET",
                    Some("development-only-session-secret"),
                    is_prod,
                )?),
                session_cookie: get_env("SESSION_COOKIE", Some("token"), is_prod)?,
            },
            cors: CorsConfig {
                origin: get_env("CORS_ORIGIN", Some("http://localhost:8080"), is_prod)?,
            },
            storage: StorageConfig {
                avatar_path: get_env("AVATAR_PATH", Some("storage/avatars"), is_prod)?,
            },
            log_level: env::var("LOG_LEVEL")
                .unwrap_or_else(|_| common.environment.default_log_level().to_string()),
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|v| !v.is_empty()),
            common,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    resolve_setting(key, env::var(key).ok(), default, is_prod)
}

fn resolve_setting(
    key: &str,
    value: Option<String>,
    default: Option<&str>,
    is_prod: bool,
) -> Result<String, AppError> {
    match (value, default) {
        (Some(val), _) => Ok(val),
        (None, _) if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        (None, Some(def)) => Ok(def.to_string()),
        (None, None) => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required but not set",
            key
        ))),
    }
}
