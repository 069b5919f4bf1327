//! Configuration for the metadata subsystem.

use crate::domain::errors::MetadataError;
use serde::{Deserialize, Serialize};
use std::env;

/// Metadata configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Bech32 prefix of account addresses
    pub account_hrp: String,
    /// Maximum declared signers on one request
    pub max_signers_per_request: usize,
    /// Maximum owners/parties on one scope or session
    pub max_parties_per_entity: usize,
    /// Maximum data access entries on one scope
    pub max_data_access_entries: usize,
    /// Maximum length of a session audit message
    pub max_audit_message_length: usize,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            account_hrp: "pb".to_string(),
            max_signers_per_request: 16,
            max_parties_per_entity: 64,
            max_data_access_entries: 100,
            max_audit_message_length: 200,
        }
    }
}

impl MetadataConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PM_ACCOUNT_HRP`: Account prefix (default: pb)
    /// - `PM_MAX_SIGNERS`: Signers per request (default: 16)
    /// - `PM_MAX_PARTIES`: Parties per entity (default: 64)
    /// - `PM_MAX_DATA_ACCESS`: Data access entries per scope (default: 100)
    ///
    /// Unparseable numbers fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            account_hrp: env::var("PM_ACCOUNT_HRP").unwrap_or(defaults.account_hrp),
            max_signers_per_request: env_usize("PM_MAX_SIGNERS")
                .unwrap_or(defaults.max_signers_per_request),
            max_parties_per_entity: env_usize("PM_MAX_PARTIES")
                .unwrap_or(defaults.max_parties_per_entity),
            max_data_access_entries: env_usize("PM_MAX_DATA_ACCESS")
                .unwrap_or(defaults.max_data_access_entries),
            max_audit_message_length: defaults.max_audit_message_length,
        }
    }

    pub fn with_account_hrp(mut self, hrp: impl Into<String>) -> Self {
        self.account_hrp = hrp.into();
        self
    }

    pub fn with_max_signers(mut self, max: usize) -> Self {
        self.max_signers_per_request = max;
        self
    }

    pub fn with_max_parties(mut self, max: usize) -> Self {
        self.max_parties_per_entity = max;
        self
    }

    pub fn with_max_data_access(mut self, max: usize) -> Self {
        self.max_data_access_entries = max;
        self
    }

    pub fn with_max_audit_message_length(mut self, max: usize) -> Self {
        self.max_audit_message_length = max;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.account_hrp.is_empty() {
            return Err(MetadataError::InvalidConfig(
                "account_hrp cannot be empty".to_string(),
            ));
        }
        if self.account_hrp.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(MetadataError::InvalidConfig(
                "account_hrp must be lower case".to_string(),
            ));
        }
        let limits = [
            ("max_signers_per_request", self.max_signers_per_request),
            ("max_parties_per_entity", self.max_parties_per_entity),
            ("max_data_access_entries", self.max_data_access_entries),
            ("max_audit_message_length", self.max_audit_message_length),
        ];
        if let Some((name, _)) = limits.iter().find(|(_, v)| *v == 0) {
            return Err(MetadataError::InvalidConfig(format!(
                "{name} must be greater than zero"
            )));
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
