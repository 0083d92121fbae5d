// ── Standard JSON envelope ──
//
// Every command result renders as
// `{success, data|error, responseCode, responseText, timestamp}` so
// scripts can treat successes and failures uniformly.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::error::CoreError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,
    pub timestamp: String,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            response_code: None,
            response_text: None,
            timestamp: now(),
        }
    }

    /// Success carrying the registrar's own code/text.
    pub fn ok_with_response(data: T, code: u32, text: &str) -> Self {
        Self {
            response_code: Some(code.to_string()),
            response_text: Some(text.to_owned()),
            ..Self::ok(data)
        }
    }
}

impl Envelope<()> {
    pub fn failure(error: String, response_code: String, response_text: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            response_code: Some(response_code),
            response_text: Some(response_text),
            timestamp: now(),
        }
    }

    pub fn from_error(err: &CoreError) -> Self {
        Self::failure(err.to_string(), err.response_code(), err.response_text())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let v = serde_json::to_value(Envelope::ok_with_response(
            serde_json::json!({"available": true}),
            210,
            "Domain available",
        ))
        .unwrap();
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["available"], true);
        assert_eq!(v["responseCode"], "210");
        assert!(v.get("error").is_none());
        assert!(v["timestamp"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn error_shape() {
        let err = CoreError::Timeout {
            timeout: std::time::Duration::from_secs(10),
        };
        let v = serde_json::to_value(Envelope::from_error(&err)).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["responseCode"], "ECONNABORTED");
        assert!(v.get("data").is_none());
    }
}
