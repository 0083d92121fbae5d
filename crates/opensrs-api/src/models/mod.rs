// Typed request/reply models for OpenSRS commands.

pub mod account;
pub mod contact;
pub mod dns;
pub mod domain;
pub mod nameserver;
pub mod transfer;

pub use account::Balance;
pub use contact::{Contact, ContactSet};
pub use dns::{
    DnsRecord, DnsRecordType, DnsZone, UnmappedRecords, records_from_ops, records_to_ops,
    records_to_ops_keeping, split_records,
};
pub use domain::{
    DomainInfo, LookupResult, PriceResult, RegistrationRequest, RegistrationResult,
    RenewalRequest, RenewalResult, ServiceSection, SuggestItem, SuggestResult, SuggestService,
    validate_domain, validate_period,
};
pub use nameserver::{Nameserver, validate_host};
pub use transfer::{TransferCheck, TransferRequest};
