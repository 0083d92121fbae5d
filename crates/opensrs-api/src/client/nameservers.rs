// Nameserver (host object) commands and delegation changes.

use tracing::info;

use super::OpenSrsClient;
use crate::error::Error;
use crate::models::domain::validate_domain;
use crate::models::nameserver::{Nameserver, validate_host};
use crate::response::Ack;
use crate::templates;

impl OpenSrsClient {
    /// `GET NAMESERVER name=all`.
    pub async fn list_nameservers(&self, domain: &str) -> Result<Vec<Nameserver>, Error> {
        let domain = validate_domain(domain)?;
        let resp = self.execute(&templates::get_nameservers(&domain)).await?;
        Ok(Nameserver::list_from_attributes(&resp.attributes))
    }

    pub async fn create_nameserver(
        &self,
        domain: &str,
        name: &str,
        ipaddress: &str,
    ) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        let (name, ip) = validate_host(name, ipaddress)?;
        info!(%domain, %name, %ip, "creating nameserver");
        let resp = self
            .execute(&templates::create_nameserver(&domain, &name, &ip))
            .await?;
        Ok(resp.into())
    }

    pub async fn delete_nameserver(
        &self,
        domain: &str,
        name: &str,
        ipaddress: Option<&str>,
    ) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        let name = validate_domain(name)?;
        info!(%domain, %name, "deleting nameserver");
        let resp = self
            .execute(&templates::delete_nameserver(&domain, &name, ipaddress))
            .await?;
        Ok(resp.into())
    }

    /// Change a host's glue address and optionally rename it.
    pub async fn modify_nameserver(
        &self,
        domain: &str,
        name: &str,
        ipaddress: &str,
        new_name: Option<&str>,
    ) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        let (name, ip) = validate_host(name, ipaddress)?;
        let new_name = new_name.map(validate_domain).transpose()?;
        info!(%domain, %name, %ip, "modifying nameserver");
        let resp = self
            .execute(&templates::modify_nameserver(
                &domain,
                &name,
                &ip,
                new_name.as_deref(),
            ))
            .await?;
        Ok(resp.into())
    }

    /// `ADVANCED_UPDATE_NAMESERVERS op_type=assign`: delegate to exactly
    /// these nameservers.
    pub async fn assign_nameservers(
        &self,
        domain: &str,
        nameservers: &[String],
    ) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        if nameservers.len() < 2 {
            return Err(Error::validation(
                "nameservers",
                "at least two nameservers are required",
            ));
        }
        let nameservers = nameservers
            .iter()
            .map(|ns| validate_domain(ns))
            .collect::<Result<Vec<_>, _>>()?;
        info!(%domain, count = nameservers.len(), "assigning nameservers");
        let resp = self
            .execute(&templates::assign_nameservers(&domain, &nameservers))
            .await?;
        Ok(resp.into())
    }
}
