use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Runtime configuration for the automation engine. Passed by value to the
/// engine; there is no process-wide mutable configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound for one orchestrator invocation, covering all store
    /// round trips of a single tracking pass.
    pub orchestrator_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            orchestrator_timeout: Duration::from_secs(30),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secs) = env::var("AUTOMATION_TIMEOUT_SECS") {
            if let Ok(n) = secs.parse() {
                config.orchestrator_timeout = Duration::from_secs(n);
            }
        }

        config
    }
}

/// Full configuration, for callers that also own the database connection.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            engine: EngineConfig::from_env(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeout_is_bounded() {
        let config = EngineConfig::default();
        assert!(config.orchestrator_timeout >= Duration::from_secs(1));
    }
}
