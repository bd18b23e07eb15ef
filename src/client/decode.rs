//! Response validation for the listing endpoint
//!
//! Each check short-circuits to a typed [`FetchOutcome`], in the order the
//! response becomes available: status, then content type, then body.

use serde_json::Value;

use super::models::{FetchOutcome, ListingEnvelope, ListingPage};

/// Characters of a bad body kept for diagnostics
pub const BODY_PREVIEW_LIMIT: usize = 500;

/// Reject non-2xx statuses
pub fn check_status(status: u16) -> Option<FetchOutcome> {
    if (200..300).contains(&status) {
        None
    } else {
        Some(FetchOutcome::NetworkFailure {
            reason: format!("HTTP {}", status),
        })
    }
}

/// Reject responses that do not declare JSON
pub fn check_content_type(content_type: Option<&str>) -> Option<FetchOutcome> {
    let is_json = content_type
        .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
        .unwrap_or(false);

    if is_json {
        None
    } else {
        log::debug!("Rejecting content type {:?}", content_type);
        Some(FetchOutcome::EmptyOrMalformed {
            reason: "bad content-type".to_string(),
        })
    }
}

/// Parse a body and validate the `{success: true, data: [...]}` shape
pub fn decode_body(body: &str) -> FetchOutcome {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("JSON parse failed: {}", e);
            log::debug!("Response text: {}", preview(body));
            return FetchOutcome::EmptyOrMalformed {
                reason: e.to_string(),
            };
        }
    };

    let envelope: ListingEnvelope = match serde_json::from_value(value) {
        Ok(envelope) => envelope,
        Err(_) => return unexpected_shape(),
    };

    if envelope.succeeded() {
        if let Some(Value::Array(items)) = &envelope.data {
            return FetchOutcome::Success(ListingPage {
                items: items.clone(),
                stats: envelope.stats.clone(),
                data_source: envelope.data_source_label(),
                total: envelope.total.as_ref().and_then(Value::as_u64),
            });
        }
    }

    // Surface the server's own explanation when it gives one
    match envelope.error_message() {
        Some(message) if envelope.failed() => FetchOutcome::EmptyOrMalformed {
            reason: message.to_string(),
        },
        _ => unexpected_shape(),
    }
}

/// Run every check against a complete response
#[cfg(test)]
pub fn classify(status: u16, content_type: Option<&str>, body: &str) -> FetchOutcome {
    if let Some(outcome) = check_status(status) {
        return outcome;
    }
    if let Some(outcome) = check_content_type(content_type) {
        return outcome;
    }
    decode_body(body)
}

/// Truncate a body for logging
pub fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_LIMIT).collect()
}

fn unexpected_shape() -> FetchOutcome {
    FetchOutcome::EmptyOrMalformed {
        reason: "unexpected shape".to_string(),
    }
}
