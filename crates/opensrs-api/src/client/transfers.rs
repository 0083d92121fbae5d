// Inbound transfer commands.

use tracing::info;

use super::{CallKind, OpenSrsClient};
use crate::error::Error;
use crate::models::domain::{RegistrationResult, validate_domain};
use crate::models::transfer::{TransferCheck, TransferRequest};
use crate::templates;

impl OpenSrsClient {
    /// `CHECK_TRANSFER`: can the domain be transferred in right now?
    pub async fn check_transfer(&self, domain: &str) -> Result<TransferCheck, Error> {
        let domain = validate_domain(domain)?;
        let resp = self.execute(&templates::check_transfer(&domain)).await?;
        Ok(TransferCheck::from_attributes(&domain, &resp.attributes))
    }

    /// `SW_REGISTER` with `reg_type=transfer`. Runs under the registration
    /// timeout.
    pub async fn transfer(&self, req: &TransferRequest) -> Result<RegistrationResult, Error> {
        req.validate()?;
        let domain = validate_domain(&req.domain)?;
        let req = TransferRequest {
            domain: domain.clone(),
            ..req.clone()
        };
        info!(%domain, "starting transfer");
        let resp = self
            .send(&templates::transfer(&req), CallKind::Registration)
            .await?;
        Ok(RegistrationResult::from_response(&domain, &resp))
    }
}
