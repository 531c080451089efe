//! hostcare - supervised host maintenance
//!
//! Updates packages, cleans up, optionally refreshes the container stack,
//! offers a pending reboot, and prints a summary.

use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use tracing::{Level, debug, info};
use tracing_subscriber::FmtSubscriber;

use hostcare::config::MaintenanceConfig;
use hostcare::gate::TerminalOperator;
use hostcare::runner::{StepRunner, SystemRunner};
use hostcare::stages::Context;
use hostcare::state::RunSession;
use hostcare::{MaintenanceError, RunOutcome, run_pipeline, ui};

#[derive(Parser)]
#[command(name = "hostcare")]
#[command(author, version, about = "Supervised host maintenance", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Refresh the host's compose stack
    #[arg(
        long,
        env = "HOSTCARE_CONTAINERS",
        action = clap::ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_value = "false",
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    containers: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

async fn run(cli: Cli, session: RunSession) -> anyhow::Result<RunOutcome> {
    let config = MaintenanceConfig::from_env(cli.containers)
        .await
        .context("failed to inspect host")?;
    info!("Maintaining {} (sudo: {})", config.hostname, config.use_sudo);

    let runner = SystemRunner::new(config.use_sudo);
    let operator = TerminalOperator::new();
    let ctx = Context::new(&config, StepRunner::new(&runner, &operator), session);

    Ok(run_pipeline(&ctx).await?)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let session = RunSession::start();
    let cli = Cli::parse();
    init_logging(cli.verbose);
    ui::init_color(cli.no_color);

    match run(cli, session).await {
        Ok(outcome) => {
            info!("Run finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            let code = e
                .downcast_ref::<MaintenanceError>()
                .map(MaintenanceError::exit_code)
                .unwrap_or(1);
            debug!("Run failed: {:?}", e);
            ui::warning(&format!("Maintenance stopped: {:#}", e));
            ExitCode::from(code)
        }
    }
}
