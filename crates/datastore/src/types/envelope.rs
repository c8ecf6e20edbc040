//! Response envelope returned by the data service.

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// The uniform `{success, data | error, message, source}` response shape.
///
/// Every [`DataService`](crate::service::DataService) envelope method returns
/// one of these instead of an error; callers check [`Envelope::success`].
///
/// # Examples
///
/// ```
/// use staffhub_datastore::types::Envelope;
///
/// let ok = Envelope::ok(vec![1, 2, 3], "firestore").with_message("Fetched 3 documents");
/// assert!(ok.success);
/// assert_eq!(ok.data.as_deref(), Some(&[1, 2, 3][..]));
///
/// let failed: Envelope<Vec<i32>> = Envelope::failure("boom", "firestore");
/// assert!(!failed.success);
/// assert_eq!(failed.error.as_deref(), Some("boom"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the operation succeeded.
    pub success: bool,

    /// The payload, present on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Human-readable error, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Informational message (also set on degraded reads).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Name of the data source that served the request.
    pub source: String,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying `data`.
    pub fn ok(data: T, source: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
            source: source.into(),
        }
    }

    /// A failed envelope carrying `error`.
    pub fn failure(error: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            source: source.into(),
        }
    }

    /// Attaches an informational message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Outcome of a successful adapter call.
///
/// Reads that hit a permission or availability error may be downgraded to an
/// empty result; `Degraded` keeps that case distinguishable from real data.
#[derive(Debug)]
pub enum Fetched<T> {
    /// The store answered normally.
    Data(T),
    /// The store failed and the empty placeholder `data` was substituted.
    Degraded {
        /// Placeholder payload (empty list, `None`).
        data: T,
        /// The store error that was downgraded.
        reason: StoreError,
    },
}

impl<T> Fetched<T> {
    /// Returns the payload, degraded or not.
    pub fn data(&self) -> &T {
        match self {
            Fetched::Data(data) | Fetched::Degraded { data, .. } => data,
        }
    }

    /// Consumes the outcome and returns the payload.
    pub fn into_data(self) -> T {
        match self {
            Fetched::Data(data) | Fetched::Degraded { data, .. } => data,
        }
    }

    /// Returns true if the payload is a degraded placeholder.
    pub fn is_degraded(&self) -> bool {
        matches!(self, Fetched::Degraded { .. })
    }

    /// Returns the downgraded error, if any.
    pub fn degraded_reason(&self) -> Option<&StoreError> {
        match self {
            Fetched::Data(_) => None,
            Fetched::Degraded { reason, .. } => Some(reason),
        }
    }
}
