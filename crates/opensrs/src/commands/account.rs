//! Account command handlers.

use opensrs_core::{Balance, Registrar};

use crate::cli::{AccountArgs, AccountCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

fn amount(value: Option<f64>) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.2}"))
}

fn balance_detail(b: &Balance) -> String {
    [
        format!("Balance:      {}", amount(b.balance)),
        format!("On hold:      {}", amount(b.hold_balance)),
    ]
    .join("\n")
}

pub async fn handle(
    registrar: &Registrar,
    args: AccountArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        AccountCommand::Balance => {
            let balance = registrar.balance().await?;
            let out = output::render_single(&global.output, &balance, balance_detail, |b| {
                amount(b.balance)
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
