//! Listing response envelope and fetch outcomes

use serde::Deserialize;
use serde_json::Value;

/// Wire envelope of `GET /api/airdrops`
///
/// Everything is optional and loosely typed so that shape problems surface as
/// a classification rather than a deserialization error. Fields the feed only
/// reads for diagnostics never reject an otherwise valid page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEnvelope {
    #[serde(default)]
    pub success: Option<Value>,

    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub stats: Option<Value>,

    #[serde(default)]
    pub total: Option<Value>,

    #[serde(default)]
    pub data_source: Option<Value>,

    #[serde(default)]
    pub error: Option<Value>,
}

impl ListingEnvelope {
    /// `success` is literally `true`
    pub fn succeeded(&self) -> bool {
        matches!(self.success, Some(Value::Bool(true)))
    }

    /// `success` is literally `false`
    pub fn failed(&self) -> bool {
        matches!(self.success, Some(Value::Bool(false)))
    }

    /// Data source label, when it is a string
    pub fn data_source_label(&self) -> Option<String> {
        self.data_source
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// The server's explanation, when it is a non-empty string
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_ref()
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
    }
}

/// A successfully fetched page
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    /// Opaque airdrop records
    pub items: Vec<Value>,

    /// Opaque aggregate block, when the server sent one
    pub stats: Option<Value>,

    /// Where the server says the data came from
    pub data_source: Option<String>,

    /// Total number of airdrops, when reported
    pub total: Option<u64>,
}

/// Result of one listing request. Fetching never fails any other way.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Success(ListingPage),
    EmptyOrMalformed { reason: String },
    NetworkFailure { reason: String },
    Timeout,
}

impl FetchOutcome {
    /// Human-readable reason for a non-success outcome
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::EmptyOrMalformed { reason } => {
                Some(format!("Invalid response: {}", reason))
            }
            FetchOutcome::NetworkFailure { reason } => Some(format!("Network error: {}", reason)),
            FetchOutcome::Timeout => Some("Request timed out".to_string()),
        }
    }
}
