mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use opensrs_core::Registrar;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    let format = cli.global.output.clone();
    let quiet = cli.global.quiet;

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        // Structured formats also get the failure envelope on stdout.
        if format.is_structured() {
            output::print_output(&output::render_envelope(&format, &err.envelope()), quiet);
        }
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need registrar credentials
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "opensrs", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the registrar
        cmd => {
            let registrar_config = config::build_registrar_config(&cli.global)?;
            let registrar = Registrar::new(&registrar_config)?;
            registrar.start_cache_sweeper().await;

            tracing::debug!(command = ?cmd, endpoint = %registrar_config.endpoint_url(), "dispatching command");
            let result = commands::dispatch(cmd, &registrar, &cli.global).await;
            registrar.shutdown().await;
            result
        }
    }
}
