//! Replays JSON fixtures through the hybrid ante pipeline.
//!
//! A fixture describes the chain state, the node configuration, the execution mode and one
//! transaction. Keys are named by seed, so a fixture stays readable while the tool produces the
//! signatures the pipeline checks.

mod cmd;
pub use cmd::*;

mod error;
pub use error::*;

mod fixture;
pub use fixture::*;

mod logging;
pub use logging::*;

mod outcome;
pub use outcome::*;
