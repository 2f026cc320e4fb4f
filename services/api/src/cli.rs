use crate::review::{run_merge, run_review, MergeArgs, ReviewArgs};
use crate::server;
use admission_review::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Admission Review",
    about = "Check transcripts against admission requirements and compute merit averages",
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
    /// Review one student's transcripts and print the requirement table
    Review(ReviewArgs),
    /// Merge transcripts, keeping the best grade per subject, and print JSON
    Merge(MergeArgs),
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
        Command::Review(args) => run_review(args),
        Command::Merge(args) => run_merge(args),
    }
}
