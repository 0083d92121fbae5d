//! Shared helpers for command handlers.

use std::io::IsTerminal;
use std::path::Path;

use serde::de::DeserializeOwned;

use opensrs_core::{DnsRecord, DnsRecordType as CoreRecordType};

use crate::cli::{DnsRecordType, DomainListArgs, RecordArgs};
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so the action is refused.
pub fn confirm(action: &str, message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Read and deserialize a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Inline domains followed by the file's, blank lines and `#` comments skipped.
pub fn collect_domains(args: DomainListArgs) -> Result<Vec<String>, CliError> {
    let mut domains = args.domains;
    if let Some(ref path) = args.from_file {
        let contents = std::fs::read_to_string(path)?;
        domains.extend(parse_domain_lines(&contents));
    }
    if domains.is_empty() {
        return Err(CliError::Validation {
            field: "domains".into(),
            reason: "no domains given".into(),
        });
    }
    Ok(domains)
}

fn parse_domain_lines(contents: &str) -> impl Iterator<Item = String> + '_ {
    contents
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
}

pub fn map_record_type(rt: DnsRecordType) -> CoreRecordType {
    match rt {
        DnsRecordType::A => CoreRecordType::A,
        DnsRecordType::Aaaa => CoreRecordType::Aaaa,
        DnsRecordType::Cname => CoreRecordType::Cname,
        DnsRecordType::Mx => CoreRecordType::Mx,
        DnsRecordType::Txt => CoreRecordType::Txt,
        DnsRecordType::Srv => CoreRecordType::Srv,
        DnsRecordType::Ns => CoreRecordType::Ns,
        DnsRecordType::Ptr => CoreRecordType::Ptr,
    }
}

impl From<RecordArgs> for DnsRecord {
    fn from(args: RecordArgs) -> Self {
        let mut record = DnsRecord::new(
            map_record_type(args.record_type),
            &args.subdomain,
            &args.address,
        );
        record.priority = args.priority;
        record.weight = args.weight;
        record.port = args.port;
        record.ttl = args.ttl;
        record
    }
}
