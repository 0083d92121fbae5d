// OPS response envelope
//
// Extracts the fixed header fields (`is_success`, `response_code`,
// `response_text`) and keeps `attributes` as a tree for the typed mappers
// in `models`.

use serde::Serialize;

use crate::error::Error;
use crate::xml::{self, OpsValue};

/// Parsed OPS reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpsResponse {
    pub action: Option<String>,
    pub object: Option<String>,
    pub is_success: bool,
    pub response_code: u32,
    pub response_text: String,
    pub attributes: OpsValue,
}

impl OpsResponse {
    /// Parse a raw XML body.
    pub fn from_xml(body: &str) -> Result<Self, Error> {
        let block = xml::parse_data_block(body)?;
        Self::from_data_block(block).map_err(|message| Error::Parse {
            message,
            body: body.to_owned(),
        })
    }

    fn from_data_block(block: OpsValue) -> Result<Self, String> {
        let code = block
            .get_str("response_code")
            .ok_or("response has no response_code")?;
        let response_code = code
            .trim()
            .parse()
            .map_err(|_| format!("non-numeric response_code '{code}'"))?;

        Ok(Self {
            action: block.get_str("action").map(str::to_owned),
            object: block.get_str("object").map(str::to_owned),
            is_success: block.get_flag("is_success").unwrap_or(false),
            response_code,
            response_text: block
                .get_str("response_text")
                .unwrap_or_default()
                .trim()
                .to_owned(),
            attributes: block
                .get("attributes")
                .cloned()
                .unwrap_or_else(OpsValue::assoc),
        })
    }

    /// Turn `is_success = 0` into an `Error::Registrar`.
    pub fn into_success(self) -> Result<Self, Error> {
        if self.is_success {
            Ok(self)
        } else {
            Err(Error::Registrar {
                code: self.response_code,
                text: self.response_text,
            })
        }
    }
}

/// Acknowledgement for commands whose reply carries no payload of interest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ack {
    pub response_code: u32,
    pub response_text: String,
}

impl From<OpsResponse> for Ack {
    fn from(resp: OpsResponse) -> Self {
        Self {
            response_code: resp.response_code,
            response_text: resp.response_text,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn envelope(inner: &str) -> String {
        format!(
            "<?xml version='1.0' encoding='UTF-8' standalone='no' ?>\
             <OPS_envelope><header><version>0.9</version></header><body><data_block>\
             <dt_assoc>{inner}</dt_assoc></data_block></body></OPS_envelope>"
        )
    }

    #[test]
    fn parses_header_fields() {
        let body = envelope(
            "<item key=\"protocol\">XCP</item><item key=\"action\">REPLY</item>\
             <item key=\"object\">DOMAIN</item><item key=\"is_success\">1</item>\
             <item key=\"response_code\">210</item>\
             <item key=\"response_text\">Domain available</item>\
             <item key=\"attributes\"><dt_assoc><item key=\"status\">available</item></dt_assoc></item>",
        );
        let resp = OpsResponse::from_xml(&body).unwrap();
        assert!(resp.is_success);
        assert_eq!(resp.response_code, 210);
        assert_eq!(resp.response_text, "Domain available");
        assert_eq!(resp.action.as_deref(), Some("REPLY"));
        assert_eq!(resp.attributes.get_str("status"), Some("available"));
    }

    #[test]
    fn failure_becomes_registrar_error() {
        let body = envelope(
            "<item key=\"is_success\">0</item><item key=\"response_code\">415</item>\
             <item key=\"response_text\">Feature not authorized</item>",
        );
        let err = OpsResponse::from_xml(&body).unwrap().into_success().unwrap_err();
        match err {
            Error::Registrar { code, text } => {
                assert_eq!(code, 415);
                assert_eq!(text, "Feature not authorized");
            }
            other => panic!("expected Registrar error, got: {other:?}"),
        }
    }

    #[test]
    fn missing_response_code_is_a_parse_error() {
        let body = envelope("<item key=\"is_success\">1</item>");
        assert!(matches!(
            OpsResponse::from_xml(&body),
            Err(Error::Parse { .. })
        ));
    }
}
