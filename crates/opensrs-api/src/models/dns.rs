// DNS zone records
//
// OpenSRS groups zone records by type (`records → A → [ … ]`) and names
// the value field differently per type. `DnsRecord` is the flat,
// type-tagged form used everywhere else.

use std::net::{Ipv4Addr, Ipv6Addr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use crate::error::Error;
use crate::xml::{Assoc, OpsValue};

/// Record types supported by the OpenSRS DNS service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum DnsRecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Srv,
    Ns,
    Ptr,
}

impl DnsRecordType {
    /// Wire name of the field holding the record's value.
    pub const fn address_key(self) -> &'static str {
        match self {
            Self::A => "ip_address",
            Self::Aaaa => "ipv6_address",
            Self::Txt => "text",
            Self::Cname | Self::Mx | Self::Srv | Self::Ns | Self::Ptr => "hostname",
        }
    }

    pub const fn requires_priority(self) -> bool {
        matches!(self, Self::Mx | Self::Srv)
    }

    pub const fn is_srv(self) -> bool {
        matches!(self, Self::Srv)
    }
}

/// A single zone record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Host label relative to the zone; empty for the apex.
    #[serde(default)]
    pub subdomain: String,
    /// IP address, hostname or text depending on `record_type`.
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl DnsRecord {
    pub fn new(record_type: DnsRecordType, subdomain: &str, address: &str) -> Self {
        Self {
            record_type,
            subdomain: subdomain.to_owned(),
            address: address.to_owned(),
            ttl: None,
            priority: None,
            weight: None,
            port: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: u16) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn with_srv(mut self, priority: u16, weight: u16, port: u16) -> Self {
        self.priority = Some(priority);
        self.weight = Some(weight);
        self.port = Some(port);
        self
    }

    /// Canonical form: `@` becomes the empty apex label, host labels are
    /// lowercased, and fields the type does not carry are dropped. TXT
    /// content is kept byte for byte.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        let sub = self.subdomain.trim();
        self.subdomain = if sub == "@" {
            String::new()
        } else {
            sub.trim_end_matches('.').to_ascii_lowercase()
        };
        if self.record_type != DnsRecordType::Txt {
            self.address = self.address.trim().to_owned();
        }
        if !self.record_type.requires_priority() {
            self.priority = None;
        }
        if !self.record_type.is_srv() {
            self.weight = None;
            self.port = None;
        }
        self
    }

    /// Reject records the registrar would refuse or silently mangle.
    pub fn validate(&self) -> Result<(), Error> {
        let address = self.address.trim();
        if address.is_empty() {
            return Err(Error::validation(
                "address",
                format!("{} record requires an address", self.record_type),
            ));
        }
        match self.record_type {
            DnsRecordType::A if address.parse::<Ipv4Addr>().is_err() => {
                return Err(Error::validation(
                    "address",
                    format!("'{address}' is not an IPv4 address"),
                ));
            }
            DnsRecordType::Aaaa if address.parse::<Ipv6Addr>().is_err() => {
                return Err(Error::validation(
                    "address",
                    format!("'{address}' is not an IPv6 address"),
                ));
            }
            _ => {}
        }
        if self.record_type.requires_priority() && self.priority.is_none() {
            return Err(Error::validation(
                "priority",
                format!("{} record requires a priority", self.record_type),
            ));
        }
        if self.record_type.is_srv() && (self.weight.is_none() || self.port.is_none()) {
            return Err(Error::validation(
                "weight/port",
                "SRV record requires weight and port",
            ));
        }
        Ok(())
    }

    /// The per-record `dt_assoc` inside its type group.
    pub fn to_ops(&self) -> OpsValue {
        let mut assoc = Assoc::new()
            .item("subdomain", self.subdomain.as_str())
            .item(self.record_type.address_key(), self.address.as_str());
        if self.record_type.requires_priority() {
            assoc = assoc.opt_item("priority", self.priority);
        }
        if self.record_type.is_srv() {
            assoc = assoc
                .opt_item("weight", self.weight)
                .opt_item("port", self.port);
        }
        assoc.opt_item("ttl", self.ttl).build()
    }

    fn from_ops(record_type: DnsRecordType, node: &OpsValue) -> Option<Self> {
        let address = if record_type == DnsRecordType::Txt {
            node.get_raw("text").or_else(|| node.get_raw("address"))?
        } else {
            node.get_str(record_type.address_key())
                .or_else(|| node.get_str("address"))?
        };
        Some(Self {
            record_type,
            subdomain: node.get_str("subdomain").unwrap_or_default().to_owned(),
            address: address.to_owned(),
            ttl: node.get_parsed("ttl"),
            priority: node.get_parsed("priority"),
            weight: node.get_parsed("weight"),
            port: node.get_parsed("port"),
        })
    }
}

/// Zone entries this crate cannot model, keyed by their wire type group.
/// They are carried through a read-modify-write cycle untouched.
pub type UnmappedRecords = IndexMap<String, Vec<OpsValue>>;

/// Group records by type for `SET_DNS_ZONE`, keeping first-seen type order.
pub fn records_to_ops(records: &[DnsRecord]) -> OpsValue {
    records_to_ops_keeping(records, &UnmappedRecords::new())
}

/// Like [`records_to_ops`], with `preserved` entries appended to their
/// type groups as read.
pub fn records_to_ops_keeping(records: &[DnsRecord], preserved: &UnmappedRecords) -> OpsValue {
    let mut groups: IndexMap<String, Vec<OpsValue>> = IndexMap::new();
    for record in records {
        groups
            .entry(record.record_type.to_string())
            .or_default()
            .push(record.to_ops());
    }
    for (type_key, entries) in preserved {
        groups
            .entry(type_key.clone())
            .or_default()
            .extend(entries.iter().cloned());
    }
    OpsValue::Assoc(
        groups
            .into_iter()
            .map(|(k, v)| (k, OpsValue::Array(v)))
            .collect(),
    )
}

/// Flatten a type-grouped `records` node into a uniform list.
pub fn records_from_ops(records: &OpsValue) -> Vec<DnsRecord> {
    split_records(records).0
}

/// Flatten a type-grouped `records` node, setting aside every entry that
/// does not map onto a [`DnsRecord`]: groups of unsupported types and
/// entries of a known type that lack their value field.
pub fn split_records(records: &OpsValue) -> (Vec<DnsRecord>, UnmappedRecords) {
    let mut mapped = Vec::new();
    let mut unmapped = UnmappedRecords::new();
    let Some(groups) = records.as_assoc() else {
        return (mapped, unmapped);
    };
    for (type_key, entries) in groups {
        let entries = entries.as_array().unwrap_or_default();
        let Ok(record_type) = type_key.parse::<DnsRecordType>() else {
            debug!(
                record_type = %type_key,
                count = entries.len(),
                "keeping unsupported record type as-is"
            );
            if !entries.is_empty() {
                unmapped.insert(type_key.clone(), entries.to_vec());
            }
            continue;
        };
        for node in entries {
            match DnsRecord::from_ops(record_type, node) {
                Some(record) => mapped.push(record),
                None => {
                    debug!(record_type = %type_key, "keeping unreadable record as-is");
                    unmapped.entry(type_key.clone()).or_default().push(node.clone());
                }
            }
        }
    }
    (mapped, unmapped)
}

/// Reply of `GET_DNS_ZONE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsZone {
    pub domain: String,
    pub nameservers_ok: Option<bool>,
    pub records: Vec<DnsRecord>,
    /// Entries of record types not modelled here, as read from the zone.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub unmapped: UnmappedRecords,
}

impl DnsZone {
    pub(crate) fn from_attributes(domain: &str, attributes: &OpsValue) -> Self {
        let (records, unmapped) = attributes
            .get("records")
            .map(split_records)
            .unwrap_or_default();
        Self {
            domain: domain.to_owned(),
            nameservers_ok: attributes.get_flag("nameservers_ok"),
            records,
            unmapped,
        }
    }
}
