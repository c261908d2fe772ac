//! Test utilities for the ante pipeline.

use std::sync::Arc;

use crate::{chain_ante_decorators, AnteDecorator, ChainedAnteHandler};

mod keeper;
mod signer;

pub use keeper::*;
pub use signer::*;

/// Wraps one decorator into a chain of its own.
pub fn single_decorator_chain(decorator: impl AnteDecorator + 'static) -> ChainedAnteHandler {
    let decorator: Arc<dyn AnteDecorator> = Arc::new(decorator);
    chain_ante_decorators([decorator])
}
