// DNS zone commands
//
// `SET_DNS_ZONE` replaces the whole record set; single-record edits are
// built on top of it in `opensrs-core`.

use tracing::{debug, info};

use super::OpenSrsClient;
use crate::error::Error;
use crate::models::dns::{DnsRecord, DnsZone, UnmappedRecords};
use crate::models::domain::validate_domain;
use crate::response::Ack;
use crate::templates;

impl OpenSrsClient {
    /// `GET_DNS_ZONE`: current records, flattened.
    pub async fn get_dns_zone(&self, domain: &str) -> Result<DnsZone, Error> {
        let domain = validate_domain(domain)?;
        let resp = self.execute(&templates::get_dns_zone(&domain)).await?;
        let zone = DnsZone::from_attributes(&domain, &resp.attributes);
        debug!(
            %domain,
            records = zone.records.len(),
            unmapped = zone.unmapped.len(),
            "fetched zone"
        );
        Ok(zone)
    }

    /// `CREATE_DNS_ZONE`, optionally seeded from a reseller DNS template.
    pub async fn create_dns_zone(
        &self,
        domain: &str,
        dns_template: Option<&str>,
    ) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        info!(%domain, template = dns_template.unwrap_or("-"), "creating zone");
        let resp = self
            .execute(&templates::create_dns_zone(&domain, dns_template))
            .await?;
        Ok(resp.into())
    }

    pub async fn delete_dns_zone(&self, domain: &str) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        info!(%domain, "deleting zone");
        let resp = self.execute(&templates::delete_dns_zone(&domain)).await?;
        Ok(resp.into())
    }

    /// `SET_DNS_ZONE`: replace the zone with exactly `records`.
    ///
    /// Every record is validated first; nothing is sent if any is malformed.
    pub async fn set_dns_zone(&self, domain: &str, records: &[DnsRecord]) -> Result<Ack, Error> {
        self.set_dns_zone_keeping(domain, records, &UnmappedRecords::new())
            .await
    }

    /// `SET_DNS_ZONE` that also writes back entries read from the zone but
    /// not modelled as [`DnsRecord`]s, so a read-modify-write keeps them.
    pub async fn set_dns_zone_keeping(
        &self,
        domain: &str,
        records: &[DnsRecord],
        preserved: &UnmappedRecords,
    ) -> Result<Ack, Error> {
        let domain = validate_domain(domain)?;
        for record in records {
            record.validate()?;
        }
        let kept: usize = preserved.values().map(Vec::len).sum();
        info!(%domain, records = records.len(), kept, "replacing zone");
        let resp = self
            .execute(&templates::set_dns_zone(&domain, records, preserved))
            .await?;
        Ok(resp.into())
    }
}
