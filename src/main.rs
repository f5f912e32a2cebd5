use clap::Parser;
use assistant_cache::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Stats(args) => cli::report::stats(args).await,
        Command::Patterns(args) => cli::report::patterns(args).await,
        Command::Activity(args) => cli::report::activity(args).await,
        Command::Candidates => cli::report::candidates().await,
    }
}
