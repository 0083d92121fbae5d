// ── Registrar facade ──
//
// The entry point consumers use. Wraps one `OpenSrsClient` with contact
// normalization, the lookup/price caches, bulk fan-out and the DNS
// safe-update workflow. Only lookup and price consult the cache; every
// other call goes to the live API.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use opensrs_api::models::{
    Balance, ContactSet, DnsRecord, DnsZone, DomainInfo, LookupResult, Nameserver, PriceResult,
    RegistrationRequest, RegistrationResult, RenewalRequest, RenewalResult, SuggestResult,
    SuggestService, TransferCheck, TransferRequest, UnmappedRecords, validate_domain,
};
use opensrs_api::transport::{TlsMode, TransportConfig};
use opensrs_api::{Ack, OpenSrsClient};
use serde::Serialize;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{CacheStats, ResponseCache};
use crate::config::{CacheConfig, RegistrarConfig, TlsVerification};
use crate::contact::normalize_contact_set;
use crate::dns::{self, RecordSelector};
use crate::error::CoreError;

/// Requests issued concurrently per bulk batch.
pub const BULK_BATCH_SIZE: usize = 5;
/// Pause between bulk batches.
pub const BULK_BATCH_DELAY: Duration = Duration::from_millis(200);
/// Upper bound on domains per bulk call.
pub const BULK_MAX_DOMAINS: usize = 100;

// ── Result types ─────────────────────────────────────────────────────

/// Which single-record edit a `ZoneChange` describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneAction {
    Add,
    Update,
    Remove,
}

/// One domain's outcome within a bulk call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkItem<T> {
    pub domain: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_code: Option<String>,
}

impl<T> BulkItem<T> {
    fn from_result(domain: &str, result: Result<T, CoreError>) -> Self {
        match result {
            Ok(data) => Self {
                domain: domain.to_owned(),
                success: true,
                data: Some(data),
                error: None,
                response_code: None,
            },
            Err(e) => Self {
                domain: domain.to_owned(),
                success: false,
                data: None,
                error: Some(e.to_string()),
                response_code: Some(e.response_code()),
            },
        }
    }
}

/// Outcome of a single-record DNS edit.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneChange {
    pub domain: String,
    pub action: ZoneAction,
    /// The record added, the replacement, or the record removed.
    pub record: DnsRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<DnsRecord>,
    pub records_before: usize,
    pub records_after: usize,
    /// `None` unless verification was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// Counters for both caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrarCacheStats {
    pub lookup: CacheStats,
    pub price: CacheStats,
}

// ── Registrar ────────────────────────────────────────────────────────

/// Cheaply cloneable handle to one reseller account.
#[derive(Clone)]
pub struct Registrar {
    inner: Arc<RegistrarInner>,
}

struct RegistrarInner {
    client: OpenSrsClient,
    lookups: Arc<ResponseCache<LookupResult>>,
    prices: Arc<ResponseCache<PriceResult>>,
    cache_config: CacheConfig,
    cancel: CancellationToken,
    sweepers: Mutex<Vec<JoinHandle<()>>>,
}

impl Registrar {
    /// Build the HTTP client from `config`. Does not contact OpenSRS.
    pub fn new(config: &RegistrarConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: match &config.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: config.timeout,
            registration_timeout: config.registration_timeout,
        };
        let client = OpenSrsClient::new(
            &config.endpoint_url(),
            &config.username,
            config.api_key.clone(),
            &transport,
        )?;
        Ok(Self::with_client(client, config.cache))
    }

    /// Wrap an existing client (tests, custom transports).
    pub fn with_client(client: OpenSrsClient, cache: CacheConfig) -> Self {
        Self {
            inner: Arc::new(RegistrarInner {
                client,
                lookups: Arc::new(ResponseCache::new("lookup", cache.ttl)),
                prices: Arc::new(ResponseCache::new("price", cache.ttl)),
                cache_config: cache,
                cancel: CancellationToken::new(),
                sweepers: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn client(&self) -> &OpenSrsClient {
        &self.inner.client
    }

    // ── Cache lifecycle ──────────────────────────────────────────────

    /// Start periodic sweeping of both caches. Idempotent.
    pub async fn start_cache_sweeper(&self) {
        let mut handles = self.inner.sweepers.lock().await;
        if !handles.is_empty() {
            return;
        }
        let every = self.inner.cache_config.sweep_interval;
        handles.push(
            self.inner
                .lookups
                .spawn_sweeper(every, self.inner.cancel.clone()),
        );
        handles.push(
            self.inner
                .prices
                .spawn_sweeper(every, self.inner.cancel.clone()),
        );
        debug!(interval_secs = every.as_secs(), "cache sweepers started");
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(&self) {
        debug!(stats = ?self.cache_stats(), "shutting down");
        self.inner.cancel.cancel();
        let handles: Vec<_> = self.inner.sweepers.lock().await.drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
    }

    pub fn cache_stats(&self) -> RegistrarCacheStats {
        RegistrarCacheStats {
            lookup: self.inner.lookups.stats(),
            price: self.inner.prices.stats(),
        }
    }

    /// Drop cached answers that a state change on `domain` made stale.
    fn invalidate(&self, domain: &str) {
        self.inner
            .lookups
            .remove(&ResponseCache::<LookupResult>::key(domain));
    }

    // ── Availability / pricing ───────────────────────────────────────

    /// Availability, served from cache unless `fresh` is set.
    pub async fn lookup(&self, domain: &str, fresh: bool) -> Result<LookupResult, CoreError> {
        let domain = validate_domain(domain)?;
        let key = ResponseCache::<LookupResult>::key(&domain);
        if !fresh {
            if let Some(hit) = self.inner.lookups.get(&key) {
                debug!(%domain, "lookup cache hit");
                return Ok(hit);
            }
        }
        let result = self.inner.client.lookup(&domain).await?;
        self.inner.lookups.insert(key, result.clone());
        Ok(result)
    }

    pub async fn price(&self, domain: &str, period: u32) -> Result<PriceResult, CoreError> {
        let domain = validate_domain(domain)?;
        let key = format!("{}:{period}", ResponseCache::<PriceResult>::key(&domain));
        if let Some(hit) = self.inner.prices.get(&key) {
            debug!(%domain, period, "price cache hit");
            return Ok(hit);
        }
        let result = self.inner.client.price(&domain, period).await?;
        self.inner.prices.insert(key, result.clone());
        Ok(result)
    }

    pub async fn bulk_lookup(
        &self,
        domains: &[String],
    ) -> Result<Vec<BulkItem<LookupResult>>, CoreError> {
        check_bulk(domains)?;
        Ok(fan_out(domains, |d| async move { self.lookup(&d, false).await }).await)
    }

    pub async fn bulk_price(
        &self,
        domains: &[String],
        period: u32,
    ) -> Result<Vec<BulkItem<PriceResult>>, CoreError> {
        check_bulk(domains)?;
        Ok(fan_out(domains, |d| async move { self.price(&d, period).await }).await)
    }

    pub async fn suggest(
        &self,
        searchstring: &str,
        tlds: &[String],
        services: &[SuggestService],
        maximum: Option<u32>,
    ) -> Result<SuggestResult, CoreError> {
        Ok(self
            .inner
            .client
            .suggest(searchstring, tlds, services, maximum)
            .await?)
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Register a domain. Contacts are normalized before validation.
    pub async fn register(
        &self,
        mut req: RegistrationRequest,
    ) -> Result<RegistrationResult, CoreError> {
        req.contacts = normalize_contact_set(req.contacts)?;
        let result = self.inner.client.register(&req).await?;
        self.invalidate(&req.domain);
        info!(domain = %result.domain, id = ?result.id, "domain registered");
        Ok(result)
    }

    pub async fn renew(&self, req: RenewalRequest) -> Result<RenewalResult, CoreError> {
        Ok(self.inner.client.renew(&req).await?)
    }

    pub async fn domain_info(&self, domain: &str) -> Result<DomainInfo, CoreError> {
        Ok(self.inner.client.domain_info(domain).await?)
    }

    pub async fn update_contacts(
        &self,
        domain: &str,
        contacts: ContactSet,
    ) -> Result<Ack, CoreError> {
        let contacts = normalize_contact_set(contacts)?;
        Ok(self.inner.client.update_contacts(domain, &contacts).await?)
    }

    pub async fn set_lock(&self, domain: &str, locked: bool) -> Result<Ack, CoreError> {
        Ok(self.inner.client.set_lock(domain, locked).await?)
    }

    pub async fn set_auto_renew(&self, domain: &str, auto_renew: bool) -> Result<Ack, CoreError> {
        Ok(self.inner.client.set_auto_renew(domain, auto_renew).await?)
    }

    // ── Transfers / account ──────────────────────────────────────────

    pub async fn check_transfer(&self, domain: &str) -> Result<TransferCheck, CoreError> {
        Ok(self.inner.client.check_transfer(domain).await?)
    }

    pub async fn transfer(
        &self,
        mut req: TransferRequest,
    ) -> Result<RegistrationResult, CoreError> {
        req.contacts = normalize_contact_set(req.contacts)?;
        let result = self.inner.client.transfer(&req).await?;
        self.invalidate(&req.domain);
        Ok(result)
    }

    pub async fn balance(&self) -> Result<Balance, CoreError> {
        Ok(self.inner.client.balance().await?)
    }

    // ── Nameservers ──────────────────────────────────────────────────

    pub async fn list_nameservers(&self, domain: &str) -> Result<Vec<Nameserver>, CoreError> {
        Ok(self.inner.client.list_nameservers(domain).await?)
    }

    pub async fn create_nameserver(
        &self,
        domain: &str,
        name: &str,
        ipaddress: &str,
    ) -> Result<Ack, CoreError> {
        Ok(self
            .inner
            .client
            .create_nameserver(domain, name, ipaddress)
            .await?)
    }

    pub async fn delete_nameserver(
        &self,
        domain: &str,
        name: &str,
        ipaddress: Option<&str>,
    ) -> Result<Ack, CoreError> {
        Ok(self
            .inner
            .client
            .delete_nameserver(domain, name, ipaddress)
            .await?)
    }

    pub async fn modify_nameserver(
        &self,
        domain: &str,
        name: &str,
        ipaddress: &str,
        new_name: Option<&str>,
    ) -> Result<Ack, CoreError> {
        Ok(self
            .inner
            .client
            .modify_nameserver(domain, name, ipaddress, new_name)
            .await?)
    }

    pub async fn assign_nameservers(
        &self,
        domain: &str,
        nameservers: &[String],
    ) -> Result<Ack, CoreError> {
        Ok(self
            .inner
            .client
            .assign_nameservers(domain, nameservers)
            .await?)
    }

    // ── DNS zone ─────────────────────────────────────────────────────

    pub async fn get_zone(&self, domain: &str) -> Result<DnsZone, CoreError> {
        Ok(self.inner.client.get_dns_zone(domain).await?)
    }

    pub async fn create_zone(
        &self,
        domain: &str,
        dns_template: Option<&str>,
    ) -> Result<Ack, CoreError> {
        Ok(self
            .inner
            .client
            .create_dns_zone(domain, dns_template)
            .await?)
    }

    pub async fn delete_zone(&self, domain: &str) -> Result<Ack, CoreError> {
        Ok(self.inner.client.delete_dns_zone(domain).await?)
    }

    /// Replace the whole zone. Records are normalized and validated first.
    pub async fn set_zone(&self, domain: &str, records: Vec<DnsRecord>) -> Result<Ack, CoreError> {
        let records: Vec<DnsRecord> = records.into_iter().map(DnsRecord::normalized).collect();
        Ok(self.inner.client.set_dns_zone(domain, &records).await?)
    }

    /// Add one record, keeping every existing one.
    pub async fn add_record(
        &self,
        domain: &str,
        record: DnsRecord,
        verify: bool,
    ) -> Result<ZoneChange, CoreError> {
        let current = self.zone_for_update(domain).await?;
        let next = dns::plan_add(&current.records, record)?;
        let added = next
            .last()
            .cloned()
            .ok_or_else(|| CoreError::Internal("planned zone is empty".into()))?;
        let change = ZoneChange {
            domain: current.domain.clone(),
            action: ZoneAction::Add,
            record: added,
            previous: None,
            records_before: current.records.len(),
            records_after: next.len(),
            verified: None,
        };
        self.apply(change, &next, &current.unmapped, verify).await
    }

    /// Replace the record `selector` picks with `replacement`.
    pub async fn update_record(
        &self,
        domain: &str,
        selector: &RecordSelector,
        replacement: DnsRecord,
        verify: bool,
    ) -> Result<ZoneChange, CoreError> {
        let current = self.zone_for_update(domain).await?;
        let (next, previous) = dns::plan_update(&current.records, selector, replacement)?;
        let record = next
            .iter()
            .find(|r| !current.records.contains(r))
            .cloned()
            .unwrap_or_else(|| previous.clone());
        let change = ZoneChange {
            domain: current.domain.clone(),
            action: ZoneAction::Update,
            record,
            previous: Some(previous),
            records_before: current.records.len(),
            records_after: next.len(),
            verified: None,
        };
        self.apply(change, &next, &current.unmapped, verify).await
    }

    /// Remove the record `selector` picks.
    pub async fn remove_record(
        &self,
        domain: &str,
        selector: &RecordSelector,
        verify: bool,
    ) -> Result<ZoneChange, CoreError> {
        let current = self.zone_for_update(domain).await?;
        let (next, removed) = dns::plan_remove(&current.records, selector)?;
        let change = ZoneChange {
            domain: current.domain.clone(),
            action: ZoneAction::Remove,
            record: removed,
            previous: None,
            records_before: current.records.len(),
            records_after: next.len(),
            verified: None,
        };
        self.apply(change, &next, &current.unmapped, verify).await
    }

    /// Step 1 of a safe update. A failed read aborts the whole edit.
    async fn zone_for_update(&self, domain: &str) -> Result<DnsZone, CoreError> {
        self.inner
            .client
            .get_dns_zone(domain)
            .await
            .map_err(|e| {
                warn!(%domain, error = %e, "zone read failed; aborting update");
                CoreError::from(e)
            })
    }

    /// Steps 3 and 4: one full replace, then an optional re-read. Entries
    /// the read could not model go back out unchanged.
    async fn apply(
        &self,
        mut change: ZoneChange,
        next: &[DnsRecord],
        unmapped: &UnmappedRecords,
        verify: bool,
    ) -> Result<ZoneChange, CoreError> {
        if !unmapped.is_empty() {
            warn!(
                domain = %change.domain,
                types = ?unmapped.keys().collect::<Vec<_>>(),
                "zone has records this tool cannot edit; writing them back unchanged"
            );
        }
        self.inner
            .client
            .set_dns_zone_keeping(&change.domain, next, unmapped)
            .await?;
        info!(
            domain = %change.domain,
            action = ?change.action,
            before = change.records_before,
            after = change.records_after,
            "zone updated"
        );

        if verify {
            let zone = self.inner.client.get_dns_zone(&change.domain).await?;
            let present = dns::zone_contains_all(&zone.records, std::slice::from_ref(&change.record));
            let ok = match change.action {
                ZoneAction::Remove => {
                    // Gone unless an identical twin was left behind on purpose.
                    !present || dns::zone_contains_all(next, std::slice::from_ref(&change.record))
                }
                ZoneAction::Add | ZoneAction::Update => present,
            };
            if !ok {
                warn!(domain = %change.domain, "zone does not reflect the update yet");
            }
            change.verified = Some(ok);
        }
        Ok(change)
    }
}

// ── Bulk helpers ─────────────────────────────────────────────────────

fn check_bulk(domains: &[String]) -> Result<(), CoreError> {
    if domains.is_empty() {
        return Err(CoreError::validation("domains", "at least one domain is required"));
    }
    if domains.len() > BULK_MAX_DOMAINS {
        return Err(CoreError::validation(
            "domains",
            format!("at most {BULK_MAX_DOMAINS} domains per request"),
        ));
    }
    Ok(())
}

/// Run `call` for every domain, `BULK_BATCH_SIZE` at a time, pausing
/// between batches. Results keep the input order.
async fn fan_out<T, F, Fut>(domains: &[String], call: F) -> Vec<BulkItem<T>>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<T, CoreError>>,
{
    let mut out = Vec::with_capacity(domains.len());
    for (index, batch) in domains.chunks(BULK_BATCH_SIZE).enumerate() {
        if index > 0 {
            tokio::time::sleep(BULK_BATCH_DELAY).await;
        }
        let results = join_all(batch.iter().map(|d| call(d.clone()))).await;
        out.extend(
            batch
                .iter()
                .zip(results)
                .map(|(domain, result)| BulkItem::from_result(domain, result)),
        );
    }
    out
}
