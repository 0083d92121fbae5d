//! Command dispatch: bridges CLI args -> `Registrar` calls -> output formatting.

pub mod account;
pub mod config_cmd;
pub mod dns;
pub mod domains;
pub mod nameservers;
pub mod transfer;
pub mod util;

use opensrs_core::Registrar;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a registrar-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    registrar: &Registrar,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Domains(args) => domains::handle(registrar, args, global).await,
        Command::Dns(args) => dns::handle(registrar, args, global).await,
        Command::Nameservers(args) => nameservers::handle(registrar, args, global).await,
        Command::Transfer(args) => transfer::handle(registrar, args, global).await,
        Command::Account(args) => account::handle(registrar, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled without a registrar connection".into(),
        }),
    }
}
