//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `CODE_DUEL` prefix and
//! `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use code_duel::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod competition;
mod database;
mod error;
mod server;

pub use ai::{AiConfig, AiProviderKind};
pub use competition::CompetitionConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration. Every section has defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub competition: CompetitionConfig,
}

impl AppConfig {
    /// Load configuration from `.env` and the environment.
    ///
    /// - `CODE_DUEL__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CODE_DUEL__COMPETITION__QUESTION_DURATION_SECS=300`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CODE_DUEL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.ai.validate()?;
        self.competition.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CODE_DUEL__DATABASE__URL",
        "CODE_DUEL__AI__ANTHROPIC_API_KEY",
        "CODE_DUEL__AI__PROVIDER",
        "CODE_DUEL__SERVER__PORT",
        "CODE_DUEL__SERVER__ENVIRONMENT",
        "CODE_DUEL__COMPETITION__QUESTION_DURATION_SECS",
        "CODE_DUEL__COMPETITION__SERIALIZE_PER_COMPETITION",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_nothing_set_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.server.port, 8080);
        assert!(config.database.postgres_url().is_none());
        assert_eq!(config.competition.question_duration_secs, 600);
        assert!(config.competition.serialize_per_competition);
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CODE_DUEL__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("CODE_DUEL__AI__ANTHROPIC_API_KEY", "sk-ant-xxx");
        env::set_var("CODE_DUEL__SERVER__PORT", "3000");
        env::set_var("CODE_DUEL__COMPETITION__QUESTION_DURATION_SECS", "120");
        env::set_var("CODE_DUEL__COMPETITION__SERIALIZE_PER_COMPETITION", "false");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.database.postgres_url(),
            Some("postgresql://test@localhost/test")
        );
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.competition.question_duration_secs, 120);
        assert!(!config.competition.serialize_per_competition);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_production_flag() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CODE_DUEL__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        assert!(result.unwrap().is_production());
    }

    #[test]
    fn test_validate_rejects_missing_key_for_anthropic() {
        let config = AppConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("AI__ANTHROPIC_API_KEY"))
        );
    }
}
