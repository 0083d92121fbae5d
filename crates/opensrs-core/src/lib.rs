// opensrs-core: Registrar facade between opensrs-api and consumers (CLI).

pub mod cache;
pub mod config;
pub mod contact;
pub mod dns;
pub mod envelope;
pub mod error;
pub mod registrar;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{CacheStats, ResponseCache};
pub use config::{CacheConfig, RegistrarConfig, TlsVerification};
pub use dns::RecordSelector;
pub use envelope::Envelope;
pub use error::CoreError;
pub use registrar::{
    BULK_BATCH_DELAY, BULK_BATCH_SIZE, BulkItem, Registrar, RegistrarCacheStats, ZoneAction,
    ZoneChange,
};

// Re-export API model types consumers need at the crate root.
pub use opensrs_api::Environment;
pub use opensrs_api::models::{
    Balance, Contact, ContactSet, DnsRecord, DnsRecordType, DnsZone, DomainInfo, LookupResult,
    Nameserver, PriceResult, RegistrationRequest, RegistrationResult, RenewalRequest,
    RenewalResult, ServiceSection, SuggestItem, SuggestResult, SuggestService, TransferCheck,
    TransferRequest,
};
pub use opensrs_api::Ack;
