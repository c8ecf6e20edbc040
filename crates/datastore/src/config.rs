//! Adapter configuration.
//!
//! [`AdapterConfig`] controls how the [`DataService`](crate::service::DataService)
//! shapes responses and whether empty collections get seeded. Every field has
//! a serde default, so partial JSON documents deserialize.
//!
//! # Example
//!
//! ```
//! use staffhub_datastore::config::{AdapterConfig, Environment};
//!
//! let config: AdapterConfig = serde_json::from_str(r#"{"environment": "production"}"#).unwrap();
//! assert_eq!(config.environment, Environment::Production);
//! assert_eq!(config.default_collection, "users");
//! assert!(!config.seeding_enabled());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::endpoint::DEFAULT_COLLECTION;

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development (default).
    #[default]
    Development,
    /// Automated tests.
    Test,
    /// Production; never seeds sample data.
    Production,
}

impl Environment {
    /// Returns true for production deployments.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "test" => Ok(Environment::Test),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("unknown environment: {}", s)),
        }
    }
}

/// Configuration for the data service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Collection used when an endpoint cannot be resolved.
    ///
    /// Applied by [`DataService::with_endpoint_map`](crate::DataService::with_endpoint_map).
    /// A resolver handed to [`DataService::new`](crate::DataService::new)
    /// keeps its own default.
    #[serde(default = "default_collection")]
    pub default_collection: String,

    /// Value of the envelope `source` field.
    #[serde(default = "default_source")]
    pub source: String,

    /// Downgrade permission/unavailable read errors to empty results.
    #[serde(default = "default_true")]
    pub degrade_read_errors: bool,

    /// Stamp `createdAt`/`updatedAt` on writes unless the payload sets them.
    #[serde(default = "default_true")]
    pub stamp_timestamps: bool,

    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Seed empty collections with sample data (ignored in production).
    #[serde(default = "default_true")]
    pub seed_empty_collections: bool,
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

fn default_source() -> String {
    "firestore".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            default_collection: default_collection(),
            source: default_source(),
            degrade_read_errors: true,
            stamp_timestamps: true,
            environment: Environment::default(),
            seed_empty_collections: true,
        }
    }
}

impl AdapterConfig {
    /// Returns true if empty collections should be seeded.
    pub fn seeding_enabled(&self) -> bool {
        self.seed_empty_collections && !self.environment.is_production()
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.default_collection.trim().is_empty() {
            errors.push("Default collection cannot be empty".to_string());
        }

        if self.default_collection.contains('/') {
            errors.push("Default collection cannot contain '/'".to_string());
        }

        if self.source.trim().is_empty() {
            errors.push("Source cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Timestamps are not stamped so stored documents equal their payloads.
    pub fn for_testing() -> Self {
        Self {
            stamp_timestamps: false,
            environment: Environment::Test,
            ..Default::default()
        }
    }
}
