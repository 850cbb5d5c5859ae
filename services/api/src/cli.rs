use crate::demo::{run_dashboard, run_demo, run_payments, DashboardArgs, DemoArgs, PaymentsCommand};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_lease::config::SimulationConfig;
use fleet_lease::error::AppError;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Lease Operations",
    about = "Serve and operate the fleet leasing back office from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the dashboard summary for the demo fleet
    Dashboard(DashboardArgs),
    /// Inspect and charge payments in the demo ledger
    Payments {
        #[command(subcommand)]
        command: PaymentsCommand,
    },
    /// Walk through registration, lease creation and payment collection end to end
    Demo(DemoArgs),
}

/// Overrides for the simulated back office.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct SimulationArgs {
    /// Simulated round-trip time in milliseconds
    #[arg(long)]
    pub(crate) latency_ms: Option<u64>,
    /// Seed for reproducible success/failure outcomes
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

impl SimulationArgs {
    pub(crate) fn apply(&self, config: &mut SimulationConfig) {
        if let Some(latency_ms) = self.latency_ms {
            config.latency = Duration::from_millis(latency_ms);
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[command(flatten)]
    pub(crate) simulation: SimulationArgs,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Dashboard(args) => run_dashboard(args),
        Command::Payments { command } => run_payments(command).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
