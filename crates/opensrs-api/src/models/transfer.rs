// Inbound transfer models

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::contact::ContactSet;
use crate::models::domain::validate_domain;
use crate::xml::OpsValue;

/// Input for `SW_REGISTER` with `reg_type=transfer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub domain: String,
    /// EPP authorization code from the losing registrar.
    #[serde(alias = "authInfo", alias = "auth_code")]
    pub auth_info: String,
    pub contacts: ContactSet,
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(alias = "regUsername")]
    pub reg_username: String,
    #[serde(alias = "regPassword")]
    pub reg_password: String,
}

impl TransferRequest {
    pub fn validate(&self) -> Result<(), Error> {
        validate_domain(&self.domain)?;
        if self.auth_info.trim().is_empty() {
            return Err(Error::validation("auth_info", "is required for transfers"));
        }
        if self.reg_username.trim().is_empty() {
            return Err(Error::validation("reg_username", "is required"));
        }
        if self.reg_password.len() < 6 {
            return Err(Error::validation(
                "reg_password",
                "must be at least 6 characters",
            ));
        }
        self.contacts.validate()
    }
}

/// Reply of `CHECK_TRANSFER`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferCheck {
    pub domain: String,
    pub transferrable: bool,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub request_address: Option<String>,
}

impl TransferCheck {
    pub fn from_attributes(domain: &str, attributes: &OpsValue) -> Self {
        Self {
            domain: domain.to_owned(),
            transferrable: attributes.get_flag("transferrable").unwrap_or(false),
            reason: attributes.get_str("reason").map(str::to_owned),
            status: attributes.get_str("status").map(str::to_owned),
            request_address: attributes.get_str("request_address").map(str::to_owned),
        }
    }
}
