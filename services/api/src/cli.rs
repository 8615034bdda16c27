use crate::demo::{run_demo, run_inspection_report, DemoArgs, InspectionReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use inventory_inspection::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Inventory Inspection Engine",
    about = "Record apartment inspections and render condition reports",
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
    /// Run an inspection from an inventory export and print its report
    Inspect {
        #[command(subcommand)]
        command: InspectCommand,
    },
    /// Walk through a scripted inspection of the bundled sample apartment
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum InspectCommand {
    /// Apply findings to a fresh inspection and print the resulting report
    Report(InspectionReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Inspect {
            command: InspectCommand::Report(args),
        } => run_inspection_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
