//! The decorator chain.
//!
//! An [`AnteDecorator`] receives the context, the transaction and a [`Next`] bound to the rest of
//! its chain. It either rejects, returning an error without calling `next`, or forwards a
//! (possibly modified) context by calling [`Next::run`]. The continuation past the last decorator
//! returns the context it is given.

use core::fmt::Debug;
use std::sync::Arc;

use alloy_primitives::Address;
use auto_impl::auto_impl;

use crate::{AnteError, AnteResult, Context, MsgEthereumTx, Tx};

mod account_setup;
mod account_verification;
mod blocked;
mod builder;
mod confident;
mod deduct_fee;
mod eth_gas;
mod eth_setup;
mod eth_sig;
mod fast_execute;
mod gas_limit;
mod handler;
mod increment_seq;
mod mempool_fee;
mod nonce;
mod setup;
mod sig_verification;
mod validate;

pub use account_setup::*;
pub use account_verification::*;
pub use blocked::*;
pub use builder::*;
pub use confident::*;
pub use deduct_fee::*;
pub use eth_gas::*;
pub use eth_setup::*;
pub use eth_sig::*;
pub use fast_execute::*;
pub use gas_limit::*;
pub use handler::*;
pub use increment_seq::*;
pub use mempool_fee::*;
pub use nonce::*;
pub use setup::*;
pub use sig_verification::*;
pub use validate::*;

/// One stage of an ante chain.
#[auto_impl(&, Box, Arc)]
pub trait AnteDecorator: Debug + Send + Sync {
    /// Validates or mutates, then either returns an error or calls `next`.
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context>;
}

/// The remainder of a chain, as seen by the decorator running before it.
#[derive(Debug, Clone, Copy)]
pub struct Next<'a> {
    rest: &'a [Arc<dyn AnteDecorator>],
}

impl<'a> Next<'a> {
    /// Returns the continuation that runs `rest` in order.
    pub const fn new(rest: &'a [Arc<dyn AnteDecorator>]) -> Self {
        Self { rest }
    }

    /// Runs the rest of the chain. With nothing left, returns `ctx` unchanged.
    pub fn run(self, ctx: Context, tx: &mut Tx, simulate: bool) -> AnteResult<Context> {
        match self.rest.split_first() {
            Some((decorator, rest)) => decorator.ante_handle(ctx, tx, simulate, Next::new(rest)),
            None => Ok(ctx),
        }
    }

}

/// Returns the sender of an Ethereum transaction, adopting the out-of-band sender of `ctx` when
/// the signature has not been recovered. Fails when neither is known.
fn require_sender(ctx: &Context, msg: &mut MsgEthereumTx) -> AnteResult<Address> {
    msg.resolve_sender(ctx.from())
        .ok_or_else(|| AnteError::UnknownRequest("sender address cannot be empty".to_owned()))
}

/// A composed validation function, `(ctx, tx, simulate) -> ctx`.
#[auto_impl(&, Box, Arc)]
pub trait AnteHandler: Debug + Send + Sync {
    /// Runs the handler.
    fn handle(&self, ctx: Context, tx: &mut Tx, simulate: bool) -> AnteResult<Context>;
}

/// Decorators run strictly in the order they were given.
#[derive(Debug, Clone, Default)]
pub struct ChainedAnteHandler {
    decorators: Vec<Arc<dyn AnteDecorator>>,
}

impl ChainedAnteHandler {
    /// Returns the decorators in execution order.
    pub fn decorators(&self) -> &[Arc<dyn AnteDecorator>] {
        &self.decorators
    }

    /// Returns the number of decorators.
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    /// Returns `true` if the chain has no decorator.
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}

impl AnteHandler for ChainedAnteHandler {
    fn handle(&self, ctx: Context, tx: &mut Tx, simulate: bool) -> AnteResult<Context> {
        Next::new(&self.decorators).run(ctx, tx, simulate)
    }
}

/// Composes `decorators` into one handler preserving their order exactly.
pub fn chain_ante_decorators(
    decorators: impl IntoIterator<Item = Arc<dyn AnteDecorator>>,
) -> ChainedAnteHandler {
    ChainedAnteHandler { decorators: decorators.into_iter().collect() }
}
