use clap::Parser;
use eyecare_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli::init()?;

    match cli.command.unwrap_or_default() {
        Command::Serve => cli::serve::run(config).await,
        Command::Seed => cli::seed::run(config).await,
        Command::Migrate => cli::migrate::run(config).await,
    }
}
