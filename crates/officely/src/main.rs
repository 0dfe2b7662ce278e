mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use officely_core::Office;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
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

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "officely", &mut std::io::stdout());
            Ok(())
        }

        cmd => {
            let cfg = officely_config::load_config()?;
            config::apply_defaults(&mut cli.global, &cfg.defaults);
            let profile = config::active_profile_name(&cli.global, &cfg);
            let client_config = config::build_client_config(&cli.global, &cfg)?;

            let office = Office::connect(client_config)
                .await
                .map_err(|e| CliError::from(e).with_profile(&profile))?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &office, &cli.global, &profile)
                .await
                .map_err(|e| e.with_profile(&profile))
        }
    }
}
