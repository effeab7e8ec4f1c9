use crate::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub environment: Environment,
}

/// Deployment environment. Production makes every service-specific setting mandatory.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    #[serde(alias = "dev")]
    Development,
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Development logs request handling in detail, like a dev server would.
    pub fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Environment::Development),
            "prod" | "production" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

fn default_port() -> u16 {
    8080
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let config = Cfg::builder()
            .add_source(File::with_name("configuration").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;

        // ENVIRONMENT is shared with the deploy tooling and wins over APP__ENVIRONMENT.
        if let Ok(raw) = std::env::var("ENVIRONMENT") {
            loaded.environment = raw
                .parse()
                .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;
        }

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_short_and_long_forms() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!(
            "Development".parse::<Environment>(),
            Ok(Environment::Development)
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn development_logs_verbosely() {
        assert_eq!(Environment::Development.default_log_level(), "debug");
        assert_eq!(Environment::Production.default_log_level(), "info");
        assert!(!Environment::default().is_production());
    }
}
