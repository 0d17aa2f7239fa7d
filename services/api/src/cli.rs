use crate::demo::{run_demo, run_installment_quote, DemoArgs, InstallmentArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use creditline::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Credit Approval Service",
    about = "Run the credit approval HTTP service and its CLI tooling",
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
    /// Run a scripted walkthrough of registration, scoring, and loan creation
    Demo(DemoArgs),
    /// Quote the monthly installment for a candidate loan
    Installment(InstallmentArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the store from a customer CSV export at startup
    #[arg(long)]
    pub(crate) customers_csv: Option<PathBuf>,
    /// Seed the store from a loan CSV export at startup
    #[arg(long)]
    pub(crate) loans_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Installment(args) => run_installment_quote(args),
    }
}
