//! Nameserver command handlers.

use tabled::Tabled;

use opensrs_core::{Nameserver, Registrar};

use crate::cli::{GlobalOpts, NameserversArgs, NameserversCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct NameserverRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IPv4")]
    ipaddress: String,
    #[tabled(rename = "IPv6")]
    ipv6: String,
    #[tabled(rename = "Order")]
    sortorder: String,
}

impl From<&Nameserver> for NameserverRow {
    fn from(ns: &Nameserver) -> Self {
        Self {
            name: ns.name.clone(),
            ipaddress: ns.ipaddress.clone().unwrap_or_default(),
            ipv6: ns.ipv6.clone().unwrap_or_default(),
            sortorder: ns.sortorder.map(|o| o.to_string()).unwrap_or_default(),
        }
    }
}

pub async fn handle(
    registrar: &Registrar,
    args: NameserversArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        NameserversCommand::List { domain } => {
            let list = registrar.list_nameservers(&domain).await?;
            let out = output::render_list(
                &global.output,
                &list,
                |ns| NameserverRow::from(ns),
                |ns| ns.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        NameserversCommand::Create { domain, name, ip } => {
            let ack = registrar.create_nameserver(&domain, &name, &ip).await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("Nameserver {name} created"),
                global.quiet,
            );
            Ok(())
        }

        NameserversCommand::Delete { domain, name, ip } => {
            if !util::confirm(
                "nameservers delete",
                &format!("Delete nameserver host {name}?"),
                global.yes,
            )? {
                return Ok(());
            }
            let ack = registrar
                .delete_nameserver(&domain, &name, ip.as_deref())
                .await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("Nameserver {name} deleted"),
                global.quiet,
            );
            Ok(())
        }

        NameserversCommand::Modify {
            domain,
            name,
            ip,
            new_name,
        } => {
            let ack = registrar
                .modify_nameserver(&domain, &name, &ip, new_name.as_deref())
                .await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("Nameserver {name} updated"),
                global.quiet,
            );
            Ok(())
        }

        NameserversCommand::Assign {
            domain,
            nameservers,
        } => {
            let ack = registrar.assign_nameservers(&domain, &nameservers).await?;
            output::render_ack(
                &global.output,
                &ack,
                &format!("{domain} now delegated to {}", nameservers.join(", ")),
                global.quiet,
            );
            Ok(())
        }
    }
}
