//! DNS zone command handlers.

use tabled::Tabled;

use opensrs_core::{DnsRecord, DnsZone, RecordSelector, Registrar, ZoneChange};

use crate::cli::{DnsArgs, DnsCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "TTL")]
    ttl: String,
}

fn host(subdomain: &str) -> &str {
    if subdomain.is_empty() { "@" } else { subdomain }
}

impl From<&DnsRecord> for RecordRow {
    fn from(r: &DnsRecord) -> Self {
        let value = match (r.weight, r.port) {
            (Some(w), Some(p)) => format!("{} (weight {w}, port {p})", r.address),
            _ => r.address.clone(),
        };
        Self {
            record_type: r.record_type.to_string(),
            host: host(&r.subdomain).to_owned(),
            value,
            priority: r.priority.map(|p| p.to_string()).unwrap_or_default(),
            ttl: r.ttl.map(|t| t.to_string()).unwrap_or_default(),
        }
    }
}

fn zone_line(r: &DnsRecord) -> String {
    let mut line = format!("{}\t{}\t{}", host(&r.subdomain), r.record_type, r.address);
    if let Some(p) = r.priority {
        line.push_str(&format!("\t{p}"));
    }
    line
}

fn zone_detail(zone: &DnsZone) -> String {
    let mut out = if zone.records.is_empty() {
        format!("{}: no records", zone.domain)
    } else {
        let rows: Vec<RecordRow> = zone.records.iter().map(RecordRow::from).collect();
        tabled::Table::new(rows)
            .with(tabled::settings::Style::rounded())
            .to_string()
    };
    if !zone.unmapped.is_empty() {
        let kinds: Vec<String> = zone
            .unmapped
            .iter()
            .map(|(kind, entries)| format!("{kind} ({})", entries.len()))
            .collect();
        out.push_str(&format!("\nNot shown: {}", kinds.join(", ")));
    }
    out
}

fn change_detail(c: &ZoneChange) -> String {
    let mut lines = vec![
        format!("Domain:  {}", c.domain),
        format!("Action:  {:?}", c.action),
        format!(
            "Record:  {} {} {}",
            c.record.record_type,
            host(&c.record.subdomain),
            c.record.address
        ),
    ];
    if let Some(ref prev) = c.previous {
        lines.push(format!(
            "Was:     {} {} {}",
            prev.record_type,
            host(&prev.subdomain),
            prev.address
        ));
    }
    lines.push(format!(
        "Records: {} -> {}",
        c.records_before, c.records_after
    ));
    if let Some(verified) = c.verified {
        lines.push(format!(
            "Verified: {}",
            if verified { "yes" } else { "no (zone did not reflect the change)" }
        ));
    }
    lines.join("\n")
}

fn print_change(change: &ZoneChange, global: &GlobalOpts) {
    let out = output::render_single(&global.output, change, change_detail, |c| {
        zone_line(&c.record)
    });
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    registrar: &Registrar,
    args: DnsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DnsCommand::Get { domain } => {
            let zone = registrar.get_zone(&domain).await?;
            let out = output::render_single(&global.output, &zone, zone_detail, |z| {
                z.records.iter().map(zone_line).collect::<Vec<_>>().join("\n")
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DnsCommand::Create { domain, template } => {
            let ack = registrar.create_zone(&domain, template.as_deref()).await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("DNS zone created for {domain}"),
                global.quiet,
            );
            Ok(())
        }

        DnsCommand::Delete { domain } => {
            if !util::confirm(
                "dns delete",
                &format!("Delete the DNS zone of {domain}? Every record is lost."),
                global.yes,
            )? {
                return Ok(());
            }
            let ack = registrar.delete_zone(&domain).await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("DNS zone deleted for {domain}"),
                global.quiet,
            );
            Ok(())
        }

        DnsCommand::Set { domain, from_file } => {
            let records: Vec<DnsRecord> = util::read_json_file(&from_file)?;
            if !util::confirm(
                "dns set",
                &format!(
                    "Replace the whole zone of {domain} with {} record(s)?",
                    records.len()
                ),
                global.yes,
            )? {
                return Ok(());
            }
            let ack = registrar.set_zone(&domain, records).await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("DNS zone replaced for {domain}"),
                global.quiet,
            );
            Ok(())
        }

        DnsCommand::Add {
            domain,
            record,
            verify,
        } => {
            let change = registrar.add_record(&domain, record.into(), verify).await?;
            print_change(&change, global);
            Ok(())
        }

        DnsCommand::Update {
            domain,
            match_subdomain,
            match_address,
            record,
            verify,
        } => {
            let selector = RecordSelector::new(
                util::map_record_type(record.record_type),
                &match_subdomain,
                match_address.as_deref(),
            );
            let change = registrar
                .update_record(&domain, &selector, record.into(), verify)
                .await?;
            print_change(&change, global);
            Ok(())
        }

        DnsCommand::Remove {
            domain,
            record_type,
            subdomain,
            address,
            verify,
        } => {
            let selector =
                RecordSelector::new(util::map_record_type(record_type), &subdomain, address.as_deref());
            if !util::confirm(
                "dns remove",
                &format!("Remove {} {} from {domain}?", selector.record_type, host(&selector.subdomain)),
                global.yes,
            )? {
                return Ok(());
            }
            let change = registrar.remove_record(&domain, &selector, verify).await?;
            print_change(&change, global);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use opensrs_core::DnsRecordType;

    use super::*;

    #[test]
    fn apex_renders_as_at() {
        let row = RecordRow::from(
            &DnsRecord::new(DnsRecordType::Mx, "", "mx.example.com").with_priority(10),
        );
        assert_eq!(row.host, "@");
        assert_eq!(row.priority, "10");
    }

    #[test]
    fn plain_line_is_tab_separated() {
        let line = zone_line(&DnsRecord::new(DnsRecordType::A, "www", "192.0.2.10"));
        assert_eq!(line, "www\tA\t192.0.2.10");
    }
}
