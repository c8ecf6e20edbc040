//! Firestore backend configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Credentials attached to every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FirestoreAuth {
    /// Unauthenticated requests (emulator, open security rules).
    #[default]
    None,
    /// OAuth2 access token or Firebase ID token sent as `Authorization: Bearer`.
    BearerToken {
        /// The token.
        token: String,
    },
    /// Web API key sent as the `key` query parameter.
    ApiKey {
        /// The key.
        key: String,
    },
}

/// Configuration for [`FirestoreStore`](super::FirestoreStore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirestoreConfig {
    /// Google Cloud project id.
    pub project_id: String,

    /// Database id within the project.
    #[serde(default = "default_database_id")]
    pub database_id: String,

    /// REST API root, overridable for the emulator.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request credentials.
    #[serde(default)]
    pub auth: FirestoreAuth,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// How often subscriptions re-run their query.
    #[serde(with = "humantime_serde", default = "default_poll_interval")]
    pub poll_interval: Duration,
}

fn default_database_id() -> String {
    "(default)".to_string()
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30000
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(5)
}

impl FirestoreConfig {
    /// Creates a configuration for `project_id` with defaults elsewhere.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: default_database_id(),
            base_url: default_base_url(),
            auth: FirestoreAuth::None,
            request_timeout_ms: default_request_timeout_ms(),
            poll_interval: default_poll_interval(),
        }
    }

    /// Selects a non-default database.
    pub fn with_database(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Overrides the REST API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Authenticates with a bearer token.
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = FirestoreAuth::BearerToken {
            token: token.into(),
        };
        self
    }

    /// Authenticates with a web API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.auth = FirestoreAuth::ApiKey { key: key.into() };
        self
    }

    /// Sets the subscription polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Resource name of the database: `projects/{p}/databases/{d}`.
    pub fn database_name(&self) -> String {
        format!(
            "projects/{}/databases/{}",
            self.project_id, self.database_id
        )
    }

    /// Resource name of the documents root.
    pub fn documents_root(&self) -> String {
        format!("{}/documents", self.database_name())
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.project_id.trim().is_empty() {
            errors.push("Firestore project id cannot be empty".to_string());
        }

        if self.database_id.trim().is_empty() {
            errors.push("Firestore database id cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            errors.push(format!("Invalid Firestore base URL: {}", self.base_url));
        }

        if self.request_timeout_ms == 0 {
            errors.push("Request timeout must be greater than 0".to_string());
        }

        if self.poll_interval.is_zero() {
            errors.push("Poll interval must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Serde module for Duration with humantime format.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
