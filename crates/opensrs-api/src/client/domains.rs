// Domain commands: availability, pricing, suggestions, registration,
// renewal and the MODIFY variants.

use tracing::{debug, info};

use super::{CallKind, OpenSrsClient};
use crate::error::Error;
use crate::models::contact::ContactSet;
use crate::models::domain::{
    DomainInfo, LookupResult, PriceResult, RegistrationRequest, RegistrationResult,
    RenewalRequest, RenewalResult, SuggestResult, SuggestService, validate_domain,
    validate_period,
};
use crate::response::Ack;
use crate::templates;

impl OpenSrsClient {
    /// `LOOKUP`: is the domain available for registration?
    pub async fn lookup(&self, domain: &str) -> Result<LookupResult, Error> {
        let domain = validate_domain(domain)?;
        debug!(%domain, "lookup");
        let resp = self.execute(&templates::lookup(&domain, false)).await?;
        Ok(LookupResult::from_response(&domain, &resp))
    }

    /// `GET_PRICE` for a registration of `period` years.
    pub async fn price(&self, domain: &str, period: u32) -> Result<PriceResult, Error> {
        let domain = validate_domain(domain)?;
        let period = validate_period(period)?;
        let resp = self
            .execute(&templates::get_price(&domain, period, None))
            .await?;
        Ok(PriceResult::from_attributes(&domain, period, &resp.attributes))
    }

    /// `NAME_SUGGEST`; an empty `services` list asks for every section.
    pub async fn suggest(
        &self,
        searchstring: &str,
        tlds: &[String],
        services: &[SuggestService],
        maximum: Option<u32>,
    ) -> Result<SuggestResult, Error> {
        let search = searchstring.trim();
        if search.is_empty() {
            return Err(Error::validation("searchstring", "is required"));
        }
        let services = if services.is_empty() {
            &SuggestService::ALL[..]
        } else {
            services
        };
        let resp = self
            .execute(&templates::name_suggest(search, tlds, services, maximum, None))
            .await?;
        Ok(SuggestResult::from_attributes(search, &resp.attributes))
    }

    /// `SW_REGISTER` with `reg_type=new`. Runs under the registration timeout.
    pub async fn register(&self, req: &RegistrationRequest) -> Result<RegistrationResult, Error> {
        req.validate()?;
        let domain = validate_domain(&req.domain)?;
        let req = RegistrationRequest {
            domain: domain.clone(),
            ..req.clone()
        };
        info!(%domain, period = req.period, "registering domain");
        let resp = self
            .send(&templates::register(&req), CallKind::Registration)
            .await?;
        Ok(RegistrationResult::from_response(&domain, &resp))
    }

    /// `RENEW` for `period` more years.
    pub async fn renew(&self, req: &RenewalRequest) -> Result<RenewalResult, Error> {
        req.validate()?;
        let domain = validate_domain(&req.domain)?;
        let req = RenewalRequest {
            domain: domain.clone(),
            ..req.clone()
        };
        info!(%domain, period = req.period, "renewing domain");
        let resp = self
            .send(&templates::renew(&req), CallKind::Registration)
            .await?;
        Ok(RenewalResult::from_response(&domain, &resp))
    }

    /// `GET DOMAIN` with `type=all_info`.
    pub async fn domain_info(&self, domain: &str) -> Result<DomainInfo, Error> {
        let domain = validate_domain(domain)?;
        let resp = self.execute(&templates::get_domain_info(&domain)).await?;
        Ok(DomainInfo::from_attributes(&domain, &resp.attributes))
    }

    /// `MODIFY` with `data=contact_info`, replacing every role.
    pub async fn update_contacts(&self, domain: &str, contacts: &ContactSet) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        contacts.validate()?;
        info!(%domain, "updating contacts");
        let resp = self
            .execute(&templates::modify_contacts(&domain, contacts))
            .await?;
        Ok(resp.into())
    }

    /// `MODIFY` with `data=status`: registrar lock on or off.
    pub async fn set_lock(&self, domain: &str, locked: bool) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        info!(%domain, locked, "setting registrar lock");
        let resp = self.execute(&templates::modify_lock(&domain, locked)).await?;
        Ok(resp.into())
    }

    /// `MODIFY` with `data=expire_action`.
    pub async fn set_auto_renew(&self, domain: &str, auto_renew: bool) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        info!(%domain, auto_renew, "setting auto-renew");
        let resp = self
            .execute(&templates::modify_auto_renew(&domain, auto_renew))
            .await?;
        Ok(resp.into())
    }
}
