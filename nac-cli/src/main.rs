//! nacremote
//!
//! Command-line control for a Naim NAC preamplifier driven by a Broadlink IR
//! blaster. Service calls go to stdout by default, to a TCP peer with
//! `--connect`, or to a simulated blaster with `--sim`.

mod cli;
mod error;
mod output;
mod session;
mod settings;
mod setup;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, Intent};
use error::CliError;
use output::Output;
use session::Session;
use settings::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    // stdout may carry service calls, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "nacremote=info,nac_codes=info,nac_receiver=info,nac_sim=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("nacremote: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut settings = Settings::load();

    match cli.command {
        Command::Setup(args) => {
            let config = setup::apply(&mut settings, &args)?;
            let path = settings.save()?;
            println!("Saved '{}' to {}", config.name, path.display());
            println!(
                "{}",
                serde_json::to_string_pretty(&config.identity().device_info())?
            );
            println!("{}", session::labels_text(&config));
            Ok(())
        }

        // No transmission, so no output needs opening
        Command::Intent(Intent::Labels) => {
            println!("{}", session::labels_text(&session::load_config(&settings)?));
            Ok(())
        }

        Command::Intent(intent) => {
            let session = open_session(cli.sim, cli.connect.as_deref(), &settings).await?;
            let result = session.execute(intent).await;
            session.finish().await;
            result
        }

        Command::Shell => {
            let session = open_session(cli.sim, cli.connect.as_deref(), &settings).await?;
            let result = session.shell().await;
            session.finish().await;
            result
        }
    }
}

async fn open_session(
    sim: bool,
    connect: Option<&str>,
    settings: &Settings,
) -> Result<Session, CliError> {
    let config = session::load_config(settings)?;
    let output = Output::open(sim, connect, &settings.output).await?;
    Ok(Session::start(config, output))
}
