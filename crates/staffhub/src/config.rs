//! Command-line configuration for the StaffHub data console.
//!
//! Every option can also be set through the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `STAFFHUB_LOG_LEVEL` | warn | Log level |
//! | `STAFFHUB_BACKEND` | memory | Document store (`memory`, `firestore`) |
//! | `STAFFHUB_ENVIRONMENT` | development | Deployment environment |
//! | `STAFFHUB_SOURCE` | firestore | Envelope `source` value |
//! | `STAFFHUB_SEED_FILE` | | JSON sample data for empty collections |
//! | `STAFFHUB_ENDPOINT_MAP` | | JSON endpoint table replacing the built-in one |
//! | `STAFFHUB_FIRESTORE_PROJECT` | | Firestore project id |
//! | `STAFFHUB_FIRESTORE_DATABASE` | (default) | Firestore database id |
//! | `STAFFHUB_FIRESTORE_URL` | | REST root override (emulator) |
//! | `STAFFHUB_FIRESTORE_TOKEN` | | Bearer token |
//! | `STAFFHUB_FIRESTORE_API_KEY` | | Web API key |

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use staffhub_datastore::config::{AdapterConfig, Environment};
use staffhub_datastore::endpoint::{EndpointMap, EndpointResolver};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Which document store to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BackendKind {
    /// In-process store, optionally seeded from `--seed-file`.
    #[default]
    Memory,
    /// Cloud Firestore (requires the `firestore` feature).
    Firestore,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Memory => write!(f, "memory"),
            BackendKind::Firestore => write!(f, "firestore"),
        }
    }
}

/// Adapter operation to run.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show the collection an endpoint resolves to.
    Resolve {
        /// Endpoint, e.g. `/leaves?status=pending`.
        endpoint: String,
    },

    /// Show the predicates a filter object normalizes to.
    Filters {
        /// Filter object as JSON.
        json: String,
    },

    /// Read a collection.
    Fetch {
        /// Endpoint, e.g. `/leaves`.
        endpoint: String,

        /// Filter as FIELD=VALUE; VALUE is parsed as JSON when possible.
        #[arg(long = "filter", value_name = "FIELD=VALUE")]
        filters: Vec<String>,

        /// Ordering as FIELD, FIELD:asc, FIELD:desc or -FIELD.
        #[arg(long)]
        order_by: Option<String>,

        /// Maximum number of documents.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Read one document.
    Get {
        /// Endpoint ending in the document id, e.g. `/leaves/abc123`.
        endpoint: String,
    },

    /// Create a document.
    Create {
        /// Collection endpoint, e.g. `/leaves`.
        endpoint: String,
        /// Document fields as a JSON object.
        json: String,
    },

    /// Merge fields into a document.
    Update {
        /// Endpoint ending in the document id.
        endpoint: String,
        /// Fields to merge as a JSON object.
        json: String,
    },

    /// Delete a document.
    Delete {
        /// Endpoint ending in the document id.
        endpoint: String,
    },
}

/// StaffHub data console configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "staffhub")]
#[command(about = "StaffHub data access console")]
#[command(version)]
pub struct CliConfig {
    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "STAFFHUB_LOG_LEVEL", default_value = "warn", global = true)]
    pub log_level: String,

    /// Document store backend.
    #[arg(long, env = "STAFFHUB_BACKEND", value_enum, default_value_t = BackendKind::Memory)]
    pub backend: BackendKind,

    /// Deployment environment (development, test, production).
    #[arg(long, env = "STAFFHUB_ENVIRONMENT", default_value = "development")]
    pub environment: Environment,

    /// Value reported in the envelope `source` field.
    #[arg(long, env = "STAFFHUB_SOURCE", default_value = "firestore")]
    pub source: String,

    /// JSON file with sample documents per collection.
    #[arg(long, env = "STAFFHUB_SEED_FILE")]
    pub seed_file: Option<PathBuf>,

    /// JSON file with `[{"prefix", "collection"}]` entries.
    #[arg(long, env = "STAFFHUB_ENDPOINT_MAP")]
    pub endpoint_map: Option<PathBuf>,

    /// Firestore project id.
    #[arg(long, env = "STAFFHUB_FIRESTORE_PROJECT")]
    pub firestore_project: Option<String>,

    /// Firestore database id.
    #[arg(long, env = "STAFFHUB_FIRESTORE_DATABASE", default_value = "(default)")]
    pub firestore_database: String,

    /// Firestore REST root, e.g. an emulator at `http://localhost:8080/v1`.
    #[arg(long, env = "STAFFHUB_FIRESTORE_URL")]
    pub firestore_url: Option<String>,

    /// Bearer token for Firestore requests.
    #[arg(long, env = "STAFFHUB_FIRESTORE_TOKEN", hide_env_values = true)]
    pub firestore_token: Option<String>,

    /// Web API key for Firestore requests.
    #[arg(long, env = "STAFFHUB_FIRESTORE_API_KEY", hide_env_values = true)]
    pub firestore_api_key: Option<String>,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            backend: BackendKind::Memory,
            environment: Environment::Development,
            source: "firestore".to_string(),
            seed_file: None,
            endpoint_map: None,
            firestore_project: None,
            firestore_database: "(default)".to_string(),
            firestore_url: None,
            firestore_token: None,
            firestore_api_key: None,
            command: None,
        }
    }
}

impl CliConfig {
    /// Builds the adapter configuration.
    pub fn adapter_config(&self) -> AdapterConfig {
        AdapterConfig {
            source: self.source.clone(),
            environment: self.environment,
            ..Default::default()
        }
    }

    /// Builds the endpoint resolver, loading `--endpoint-map` if given.
    pub fn resolver(&self) -> anyhow::Result<EndpointResolver> {
        let map = match &self.endpoint_map {
            Some(path) => EndpointMap::from_json_file(path)?,
            None => EndpointMap::hr_defaults(),
        };
        let default_collection = self.adapter_config().default_collection;
        Ok(EndpointResolver::new(map).with_default_collection(default_collection))
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log level '{}' (expected one of {})",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if self.source.trim().is_empty() {
            errors.push("Source cannot be empty".to_string());
        }

        if self.backend == BackendKind::Firestore {
            if self
                .firestore_project
                .as_deref()
                .is_none_or(|p| p.trim().is_empty())
            {
                errors.push("Firestore backend requires --firestore-project".to_string());
            }

            if self.firestore_token.is_some() && self.firestore_api_key.is_some() {
                errors.push(
                    "Use either --firestore-token or --firestore-api-key, not both".to_string(),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    pub fn for_testing() -> Self {
        Self {
            log_level: "debug".to_string(),
            environment: Environment::Test,
            ..Default::default()
        }
    }
}
