use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use crate::{replay, Fixture, LogArgs, Result};

/// Replays ante-pipeline fixtures and prints one JSON outcome per fixture.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cmd {
    /// Fixture files to replay
    #[arg(value_name = "FIXTURE", required = true)]
    pub fixtures: Vec<PathBuf>,

    /// Pretty-print the outcomes
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Logging configuration
    #[command(flatten)]
    pub log: LogArgs,
}

impl Cmd {
    /// Execute the command
    pub fn run(&self) -> Result<()> {
        self.log.init()?;
        for path in &self.fixtures {
            let outcome = replay(&Fixture::load(path)?)?;
            info!(fixture = %path.display(), accepted = outcome.accepted, "Replayed fixture");
            let json = if self.pretty {
                serde_json::to_string_pretty(&outcome)?
            } else {
                serde_json::to_string(&outcome)?
            };
            println!("{json}");
        }
        Ok(())
    }
}
