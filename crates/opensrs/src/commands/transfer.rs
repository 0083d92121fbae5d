//! Inbound transfer command handlers.

use opensrs_core::{Registrar, RegistrationResult, TransferCheck, TransferRequest};

use crate::cli::{GlobalOpts, TransferArgs, TransferCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn check_detail(c: &TransferCheck) -> String {
    let mut lines = vec![
        format!("Domain:        {}", c.domain),
        format!(
            "Transferrable: {}",
            if c.transferrable { "yes" } else { "no" }
        ),
    ];
    if let Some(ref reason) = c.reason {
        lines.push(format!("Reason:        {reason}"));
    }
    if let Some(ref status) = c.status {
        lines.push(format!("Status:        {status}"));
    }
    if let Some(ref address) = c.request_address {
        lines.push(format!("Approval mail: {address}"));
    }
    lines.join("\n")
}

fn started_detail(r: &RegistrationResult) -> String {
    format!(
        "Transfer of {} submitted (order {})\n{}",
        r.domain,
        r.id.as_deref().unwrap_or("-"),
        r.registration_text.as_deref().unwrap_or(&r.response_text)
    )
}

pub async fn handle(
    registrar: &Registrar,
    args: TransferArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TransferCommand::Check { domain } => {
            let check = registrar.check_transfer(&domain).await?;
            let out = output::render_single(&global.output, &check, check_detail, |c| {
                c.transferrable.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TransferCommand::Start { from_file } => {
            let req: TransferRequest = util::read_json_file(&from_file)?;
            if !util::confirm(
                "transfer start",
                &format!(
                    "Transfer {} in? This charges the reseller account.",
                    req.domain
                ),
                global.yes,
            )? {
                return Ok(());
            }
            let pb = output::spinner(&format!("Transferring {}", req.domain), global.quiet);
            let result = registrar.transfer(req).await;
            pb.finish_and_clear();
            let result = result?;
            let out = output::render_single(&global.output, &result, started_detail, |r| {
                r.id.clone().unwrap_or_default()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
