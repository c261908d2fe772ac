//! `ante-check` replays JSON fixtures through the hybrid ante pipeline.

use ante_check::{AnteCheckError, Cmd};
use clap::Parser;

fn main() -> Result<(), AnteCheckError> {
    Cmd::parse().run().inspect_err(|e| eprintln!("{e}"))
}
