use super::OpenSrsClient;
use crate::error::Error;
use crate::models::account::Balance;
use crate::templates;

impl OpenSrsClient {
    /// `GET_BALANCE` for the reseller account.
    pub async fn balance(&self) -> Result<Balance, Error> {
        let resp = self.execute(&templates::get_balance()).await?;
        Ok(Balance::from_attributes(&resp.attributes))
    }
}
