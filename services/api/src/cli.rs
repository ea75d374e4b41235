use crate::demo::{run_demo, run_score_report, DemoArgs, ScoreReportArgs};
use crate::server;
use candidate_ai::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Candidate Assessment Scorer",
    about = "Score assessment attempts and serve hiring reports over HTTP",
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
    /// Score answer exports without starting the service
    Score {
        #[command(subcommand)]
        command: ScoreCommand,
    },
    /// Run an end-to-end CLI demo over a seeded assessment attempt
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScoreCommand {
    /// Generate a hire-recommendation report from a CSV answers export
    Report(ScoreReportArgs),
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
        Command::Score {
            command: ScoreCommand::Report(args),
        } => run_score_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
