//! Command line entry points
//!
//! - `serve`: run the HTTP API (default)
//! - `seed`: seed roles and the bootstrap admin, then exit
//! - `migrate`: apply PostgreSQL migrations, then exit

pub mod migrate;
pub mod seed;
pub mod serve;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// EyeCare clinic management API
#[derive(Parser)]
#[command(name = "eyecare-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Run the HTTP API server
    #[default]
    Serve,

    /// Seed roles and the bootstrap admin account
    Seed,

    /// Apply database migrations (postgres backend only)
    Migrate,
}

/// Load `.env`, layered configuration and the tracing subscriber
pub fn init() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::try_parse_from(["eyecare-api"]).unwrap();
        assert_eq!(cli.command.unwrap_or_default(), Command::Serve);
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["eyecare-api", "seed"]).unwrap();
        assert_eq!(cli.command, Some(Command::Seed));

        let cli = Cli::try_parse_from(["eyecare-api", "migrate"]).unwrap();
        assert_eq!(cli.command, Some(Command::Migrate));

        assert!(Cli::try_parse_from(["eyecare-api", "bogus"]).is_err());
    }
}
