// ── DNS safe-update planning ──
//
// `SET_DNS_ZONE` replaces the whole zone, so single-record edits are
// computed here as a complete new record list from the current one. The
// functions are pure; `Registrar` drives fetch → plan → replace → verify.

use opensrs_api::models::{DnsRecord, DnsRecordType};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifies the record(s) an update or removal applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSelector {
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    #[serde(default)]
    pub subdomain: String,
    /// Disambiguates when several records share type and subdomain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl RecordSelector {
    pub fn new(record_type: DnsRecordType, subdomain: &str, address: Option<&str>) -> Self {
        Self {
            record_type,
            subdomain: normalize_subdomain(subdomain),
            address: address
                .filter(|a| !a.trim().is_empty())
                .map(|a| match record_type {
                    DnsRecordType::Txt => a.to_owned(),
                    _ => a.trim().to_owned(),
                }),
        }
    }

    fn matches(&self, record: &DnsRecord) -> bool {
        record.record_type == self.record_type
            && normalize_subdomain(&record.subdomain) == normalize_subdomain(&self.subdomain)
            && self
                .address
                .as_deref()
                .is_none_or(|a| same_address(self.record_type, a, &record.address))
    }

    fn describe(&self) -> String {
        let host = if self.subdomain.is_empty() {
            "@"
        } else {
            self.subdomain.as_str()
        };
        match &self.address {
            Some(a) => format!("{} {host} {a}", self.record_type),
            None => format!("{} {host}", self.record_type),
        }
    }
}

impl From<&DnsRecord> for RecordSelector {
    fn from(record: &DnsRecord) -> Self {
        Self::new(record.record_type, &record.subdomain, Some(&record.address))
    }
}

/// `@` and a trailing dot both mean "relative to the zone apex".
pub fn normalize_subdomain(subdomain: &str) -> String {
    let s = subdomain.trim().trim_end_matches('.');
    if s == "@" {
        String::new()
    } else {
        s.to_ascii_lowercase()
    }
}

/// Hostnames compare case-insensitively without the trailing dot; TXT
/// content is compared exactly.
fn same_address(record_type: DnsRecordType, a: &str, b: &str) -> bool {
    if record_type == DnsRecordType::Txt {
        return a == b;
    }
    let (a, b) = (a.trim(), b.trim());
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}

fn is_duplicate(a: &DnsRecord, b: &DnsRecord) -> bool {
    RecordSelector::from(a).matches(b)
}

/// Index of the single record `selector` picks.
fn find_one(existing: &[DnsRecord], selector: &RecordSelector) -> Result<usize, CoreError> {
    let hits: Vec<usize> = existing
        .iter()
        .enumerate()
        .filter(|(_, r)| selector.matches(r))
        .map(|(i, _)| i)
        .collect();
    match hits.as_slice() {
        [] => Err(CoreError::NotFound {
            entity_type: "DNS record".into(),
            identifier: selector.describe(),
        }),
        [index] => Ok(*index),
        many if selector.address.is_none() => Err(CoreError::AmbiguousMatch {
            record_type: selector.record_type.to_string(),
            subdomain: selector.describe(),
            count: many.len(),
        }),
        // Exact duplicates already in the zone: any of them is the target.
        [first, ..] => Ok(*first),
    }
}

fn prepare(record: DnsRecord) -> Result<DnsRecord, CoreError> {
    let record = record.normalized();
    record.validate()?;
    Ok(record)
}

/// New zone contents after appending `record`. Rejects an exact duplicate.
pub fn plan_add(existing: &[DnsRecord], record: DnsRecord) -> Result<Vec<DnsRecord>, CoreError> {
    let record = prepare(record)?;
    if existing.iter().any(|r| is_duplicate(&record, r)) {
        return Err(CoreError::Conflict {
            message: format!(
                "{} already exists",
                RecordSelector::from(&record).describe()
            ),
        });
    }
    let mut next = existing.to_vec();
    next.push(record);
    Ok(next)
}

/// New zone contents with the record matched by `selector` replaced.
///
/// Returns the merged list and the record that was replaced.
pub fn plan_update(
    existing: &[DnsRecord],
    selector: &RecordSelector,
    replacement: DnsRecord,
) -> Result<(Vec<DnsRecord>, DnsRecord), CoreError> {
    let replacement = prepare(replacement)?;
    let index = find_one(existing, selector)?;
    let clash = existing
        .iter()
        .enumerate()
        .any(|(i, r)| i != index && is_duplicate(&replacement, r));
    if clash {
        return Err(CoreError::Conflict {
            message: format!(
                "{} already exists",
                RecordSelector::from(&replacement).describe()
            ),
        });
    }
    let mut next = existing.to_vec();
    let previous = std::mem::replace(&mut next[index], replacement);
    Ok((next, previous))
}

/// New zone contents without the record matched by `selector`.
pub fn plan_remove(
    existing: &[DnsRecord],
    selector: &RecordSelector,
) -> Result<(Vec<DnsRecord>, DnsRecord), CoreError> {
    let index = find_one(existing, selector)?;
    let mut next = existing.to_vec();
    let removed = next.remove(index);
    Ok((next, removed))
}

/// Does `zone` contain a record equivalent to every one of `expected`?
pub fn zone_contains_all(zone: &[DnsRecord], expected: &[DnsRecord]) -> bool {
    expected
        .iter()
        .all(|want| zone.iter().any(|have| is_duplicate(want, have)))
}
