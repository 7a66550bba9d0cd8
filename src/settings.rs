//! Reconciler settings loaded through the `config` crate

use serde::Deserialize;

use crate::types::{ReconcileError, ReconcileResult};

/// Settings the orchestrator applies to every gateway exchange
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Channel id sent with status queries and disputes
    #[serde(default = "default_channel_id")]
    pub channel_id: String,
    /// Gateway response code marking a successful status query
    #[serde(default = "default_success_response_code")]
    pub success_response_code: String,
    /// Dispute status meaning the gateway accepted the correction
    #[serde(default = "default_dispute_accepted_status")]
    pub dispute_accepted_status: i32,
}

fn default_channel_id() -> String {
    "UTILITY".to_string()
}

fn default_success_response_code() -> String {
    "000".to_string()
}

fn default_dispute_accepted_status() -> i32 {
    200
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            channel_id: default_channel_id(),
            success_response_code: default_success_response_code(),
            dispute_accepted_status: default_dispute_accepted_status(),
        }
    }
}

impl ReconcilerConfig {
    /// Load from `config/reconciler.*` (optional) and `RECONCILER__*` env vars
    pub fn load() -> ReconcileResult<Self> {
        Self::load_from("config/reconciler")
    }

    /// Load from the given file stem (optional) and `RECONCILER__*` env vars
    pub fn load_from(path: &str) -> ReconcileResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            // Eg.. `RECONCILER__CHANNEL_ID=UTILITY`
            .add_source(config::Environment::with_prefix("RECONCILER").separator("__"))
            .build()?;

        let loaded = settings.try_deserialize::<ReconcilerConfig>()?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Reject settings that would make every reconciliation fail
    pub fn validate(&self) -> ReconcileResult<()> {
        if self.channel_id.trim().is_empty() {
            return Err(ReconcileError::Config(
                "channel_id cannot be empty".to_string(),
            ));
        }

        if self.success_response_code.trim().is_empty() {
            return Err(ReconcileError::Config(
                "success_response_code cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.channel_id, "UTILITY");
        assert_eq!(config.success_response_code, "000");
        assert_eq!(config.dispute_accepted_status, 200);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ReconcilerConfig::load_from("config/does-not-exist").unwrap();
        assert_eq!(config, ReconcilerConfig::default());
    }

    #[test]
    fn test_blank_channel_rejected() {
        let config = ReconcilerConfig {
            channel_id: "  ".to_string(),
            ..ReconcilerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
