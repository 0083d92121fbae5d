//! Domain command handlers: availability, pricing, lifecycle.

use serde::Deserialize;
use tabled::Tabled;

use opensrs_core::{
    BulkItem, Contact, ContactSet, DomainInfo, LookupResult, PriceResult, Registrar,
    RegistrationRequest, RegistrationResult, RenewalRequest, RenewalResult, ServiceSection,
    SuggestResult, SuggestService,
};

use crate::cli::{DomainsArgs, DomainsCommand, GlobalOpts, SuggestServiceArg, Toggle};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct LookupRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Code")]
    code: String,
}

fn lookup_row(item: &BulkItem<LookupResult>, color: bool) -> LookupRow {
    match (&item.data, &item.error) {
        (Some(r), _) => LookupRow {
            domain: r.domain.clone(),
            available: output::yes_no(r.available, color),
            status: r.status.clone().unwrap_or_default(),
            code: r.response_code.to_string(),
        },
        (None, err) => LookupRow {
            domain: item.domain.clone(),
            available: "-".into(),
            status: err.clone().unwrap_or_default(),
            code: item.response_code.clone().unwrap_or_default(),
        },
    }
}

#[derive(Tabled)]
struct PriceRow {
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Premium")]
    premium: String,
}

fn format_price(p: &PriceResult) -> String {
    p.price
        .map_or_else(|| "-".into(), |v| format!("{v:.2} {}", p.currency))
}

fn price_row(item: &BulkItem<PriceResult>) -> PriceRow {
    match &item.data {
        Some(p) => PriceRow {
            domain: p.domain.clone(),
            period: format!("{}y", p.period),
            price: format_price(p),
            premium: if p.is_premium { "yes" } else { "" }.into(),
        },
        None => PriceRow {
            domain: item.domain.clone(),
            period: "-".into(),
            price: item.error.clone().unwrap_or_default(),
            premium: String::new(),
        },
    }
}

#[derive(Tabled)]
struct SuggestRow {
    #[tabled(rename = "Service")]
    service: String,
    #[tabled(rename = "Domain")]
    domain: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Price")]
    price: String,
}

/// Flatten every returned section into `(service, domain, status, price)` rows.
fn suggest_rows(result: &SuggestResult) -> Vec<SuggestRow> {
    let sections: [(SuggestService, &Option<ServiceSection>); 4] = [
        (SuggestService::Lookup, &result.lookup),
        (SuggestService::Suggestion, &result.suggestion),
        (SuggestService::Premium, &result.premium),
        (SuggestService::PersonalNames, &result.personal_names),
    ];
    sections
        .iter()
        .filter_map(|(service, section)| section.as_ref().map(|s| (service, s)))
        .flat_map(|(service, section)| {
            section.items.iter().map(move |item| SuggestRow {
                service: service.to_string(),
                domain: item.domain.clone(),
                status: item.status.clone().unwrap_or_default(),
                price: item.price.map(|p| format!("{p:.2}")).unwrap_or_default(),
            })
        })
        .collect()
}

// ── Detail views ────────────────────────────────────────────────────

fn lookup_detail(r: &LookupResult) -> String {
    [
        format!("Domain:    {}", r.domain),
        format!("Available: {}", if r.available { "yes" } else { "no" }),
        format!("Status:    {}", r.status.as_deref().unwrap_or("-")),
        format!("Response:  {} {}", r.response_code, r.response_text),
    ]
    .join("\n")
}

fn price_detail(p: &PriceResult) -> String {
    [
        format!("Domain:  {}", p.domain),
        format!("Period:  {} year(s)", p.period),
        format!("Price:   {}", format_price(p)),
        format!("Premium: {}", if p.is_premium { "yes" } else { "no" }),
    ]
    .join("\n")
}

fn registration_detail(r: &RegistrationResult) -> String {
    [
        format!("Domain:   {}", r.domain),
        format!("Order ID: {}", r.id.as_deref().unwrap_or("-")),
        format!(
            "Status:   {}",
            r.registration_text.as_deref().unwrap_or(&r.response_text)
        ),
    ]
    .join("\n")
}

fn renewal_detail(r: &RenewalResult) -> String {
    [
        format!("Domain:         {}", r.domain),
        format!("Order ID:       {}", r.order_id.as_deref().unwrap_or("-")),
        format!(
            "New expiration: {}",
            r.new_expiration.as_deref().unwrap_or("-")
        ),
    ]
    .join("\n")
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn info_detail(d: &DomainInfo) -> String {
    let mut lines = vec![
        format!("Domain:      {}", d.domain),
        format!("Created:     {}", d.created.as_deref().unwrap_or("-")),
        format!("Expires:     {}", d.expiry_date.as_deref().unwrap_or("-")),
        format!("Auto-renew:  {}", flag(d.auto_renew)),
        format!("Let expire:  {}", flag(d.let_expire)),
        format!("Nameservers: {}", d.nameservers.join(", ")),
    ];
    if let Some(ref contacts) = d.contacts {
        let owner = &contacts.owner;
        lines.push(format!(
            "Owner:       {} {} <{}>",
            owner.first_name, owner.last_name, owner.email
        ));
    }
    lines.join("\n")
}

// ── Input files ─────────────────────────────────────────────────────

/// A contacts file holds either all four roles or one contact for all.
#[derive(Deserialize)]
#[serde(untagged)]
enum ContactsFile {
    Set(ContactSet),
    Single(Contact),
}

impl From<ContactsFile> for ContactSet {
    fn from(file: ContactsFile) -> Self {
        match file {
            ContactsFile::Set(set) => set,
            ContactsFile::Single(contact) => ContactSet::uniform(&contact),
        }
    }
}

fn map_service(s: SuggestServiceArg) -> SuggestService {
    match s {
        SuggestServiceArg::Lookup => SuggestService::Lookup,
        SuggestServiceArg::Suggestion => SuggestService::Suggestion,
        SuggestServiceArg::Premium => SuggestService::Premium,
        SuggestServiceArg::PersonalNames => SuggestService::PersonalNames,
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    registrar: &Registrar,
    args: DomainsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        DomainsCommand::Lookup { domain, fresh } => {
            let result = registrar.lookup(&domain, fresh).await?;
            let out = output::render_single(&global.output, &result, lookup_detail, |r| {
                format!("{}\t{}", r.domain, r.available)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::BulkLookup(list) => {
            let domains = util::collect_domains(list)?;
            let pb = output::spinner(&format!("Checking {} domains", domains.len()), global.quiet);
            let items = registrar.bulk_lookup(&domains).await;
            pb.finish_and_clear();
            let items = items?;
            let out = output::render_list(
                &global.output,
                &items,
                |i| lookup_row(i, color),
                |i| {
                    let available = i.data.as_ref().is_some_and(|r| r.available);
                    format!("{}\t{available}", i.domain)
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Price { domain, period } => {
            let result = registrar.price(&domain, period).await?;
            let out = output::render_single(&global.output, &result, price_detail, |p| {
                p.price.map(|v| v.to_string()).unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::BulkPrice { list, period } => {
            let domains = util::collect_domains(list)?;
            let pb = output::spinner(&format!("Pricing {} domains", domains.len()), global.quiet);
            let items = registrar.bulk_price(&domains, period).await;
            pb.finish_and_clear();
            let items = items?;
            let out = output::render_list(&global.output, &items, price_row, |i| {
                let price = i
                    .data
                    .as_ref()
                    .and_then(|p| p.price)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                format!("{}\t{price}", i.domain)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Suggest {
            searchstring,
            tld,
            service,
            max,
        } => {
            let services: Vec<SuggestService> = service.into_iter().map(map_service).collect();
            let result = registrar.suggest(&searchstring, &tld, &services, max).await?;
            let out = output::render_single(
                &global.output,
                &result,
                |r| {
                    let rows = suggest_rows(r);
                    if rows.is_empty() {
                        "No suggestions".into()
                    } else {
                        tabled::Table::new(rows)
                            .with(tabled::settings::Style::rounded())
                            .to_string()
                    }
                },
                |r| {
                    suggest_rows(r)
                        .into_iter()
                        .map(|row| row.domain)
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Register { from_file } => {
            let req: RegistrationRequest = util::read_json_file(&from_file)?;
            if !util::confirm(
                "domains register",
                &format!(
                    "Register {} for {} year(s)? This charges the reseller account.",
                    req.domain, req.period
                ),
                global.yes,
            )? {
                return Ok(());
            }
            let pb = output::spinner(&format!("Registering {}", req.domain), global.quiet);
            let result = registrar.register(req).await;
            pb.finish_and_clear();
            let result = result?;
            let out = output::render_single(&global.output, &result, registration_detail, |r| {
                r.id.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Renew {
            domain,
            period,
            expiration_year,
            auto_renew,
        } => {
            if !util::confirm(
                "domains renew",
                &format!("Renew {domain} for {period} year(s)? This charges the reseller account."),
                global.yes,
            )? {
                return Ok(());
            }
            let req = RenewalRequest {
                domain,
                period,
                current_expiration_year: expiration_year,
                auto_renew,
            };
            let result = registrar.renew(req).await?;
            let out = output::render_single(&global.output, &result, renewal_detail, |r| {
                r.new_expiration.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::Info { domain } => {
            let info = registrar.domain_info(&domain).await?;
            let out = output::render_single(&global.output, &info, info_detail, |d| {
                d.expiry_date.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DomainsCommand::UpdateContacts { domain, from_file } => {
            let file: ContactsFile = util::read_json_file(&from_file)?;
            let ack = registrar.update_contacts(&domain, file.into()).await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("Contacts updated for {domain}"),
                global.quiet,
            );
            Ok(())
        }

        DomainsCommand::Lock { domain } => {
            let ack = registrar.set_lock(&domain, true).await?;
            output::render_ack(&global.output, &ack, &format!("{domain} locked"), global.quiet);
            Ok(())
        }

        DomainsCommand::Unlock { domain } => {
            let ack = registrar.set_lock(&domain, false).await?;
            output::render_ack(&global.output, &ack, &format!("{domain} unlocked"), global.quiet);
            Ok(())
        }

        DomainsCommand::AutoRenew { domain, state } => {
            let on = state == Toggle::On;
            let ack = registrar.set_auto_renew(&domain, on).await?;
            let message = format!(
                "Auto-renew {} for {domain}",
                if on { "enabled" } else { "disabled" }
            );
            output::render_ack(&global.output, &ack, &message, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn contacts_file_accepts_single_contact() {
        let json = r#"{
            "first_name": "Jane", "last_name": "Doe", "address1": "1 Main St",
            "city": "Toronto", "state": "ON", "country": "CA", "postal_code": "M5V 1A1",
            "phone": "+1.4165550123", "email": "jane@example.com"
        }"#;
        let set: ContactSet = serde_json::from_str::<ContactsFile>(json).unwrap().into();
        assert_eq!(set.billing.email, "jane@example.com");
        assert_eq!(set.owner, set.tech);
    }

    #[test]
    fn suggest_rows_skip_missing_sections() {
        let result = SuggestResult {
            searchstring: "example".into(),
            suggestion: Some(ServiceSection {
                count: 1,
                response_code: Some(200),
                items: vec![opensrs_core::SuggestItem {
                    domain: "myexample.net".into(),
                    status: Some("available".into()),
                    price: None,
                }],
            }),
            ..SuggestResult::default()
        };
        let rows = suggest_rows(&result);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].service, "suggestion");
    }
}
