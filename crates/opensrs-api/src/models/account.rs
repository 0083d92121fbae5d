use serde::Serialize;

use crate::xml::OpsValue;

/// Reseller account balance (`GET_BALANCE`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Balance {
    pub balance: Option<f64>,
    /// Funds reserved for pending orders.
    pub hold_balance: Option<f64>,
}

impl Balance {
    pub fn from_attributes(attributes: &OpsValue) -> Self {
        Self {
            balance: attributes.get_parsed("balance"),
            hold_balance: attributes.get_parsed("hold_balance"),
        }
    }
}
