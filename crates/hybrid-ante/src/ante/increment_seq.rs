use alloy_primitives::Address;
use tracing::trace;

use super::require_sender;
use crate::{
    Account, AnteDecorator, AnteError, AnteResult, Context, Keepers, MempoolPolicy, Next, Tx,
};

/// Advances the stored sequence of an Ethereum sender.
///
/// Plain `CheckTx` leaves the sequence alone when the mempool does not recheck, since the
/// checking state must then only move on commit. With a pending pool only the transaction whose
/// nonce equals the stored sequence advances it.
#[derive(Debug, Clone)]
pub struct IncrementSenderSequenceDecorator {
    keepers: Keepers,
    policy: MempoolPolicy,
}

impl IncrementSenderSequenceDecorator {
    /// Creates the decorator.
    pub const fn new(keepers: Keepers, policy: MempoolPolicy) -> Self {
        Self { keepers, policy }
    }

    const fn skips(&self, ctx: &Context) -> bool {
        ctx.is_check_tx() &&
            !ctx.is_recheck_tx() &&
            !self.policy.enable_recheck &&
            !ctx.is_trace_tx()
    }
}

impl AnteDecorator for IncrementSenderSequenceDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        if self.skips(&ctx) {
            trace!("Leaving sender sequence to the commit");
            return next.run(ctx, tx, simulate);
        }

        let msg = tx.as_ethereum_mut()?;
        let address = require_sender(&ctx, msg)?;
        let nonce = msg.nonce();

        ctx.run_unmetered(|scoped| {
            let mut account = get_signer(&self.keepers, scoped, address)?;
            if !self.policy.enable_pending_pool || nonce == account.sequence {
                account.sequence += 1;
                self.keepers.account.set_account(scoped, account);
            }
            Ok::<_, AnteError>(())
        })?;

        next.run(ctx, tx, simulate)
    }
}

/// Advances the stored sequence of every signer of a native transaction by one.
#[derive(Debug, Clone)]
pub struct IncrementSequenceDecorator {
    keepers: Keepers,
}

impl IncrementSequenceDecorator {
    /// Creates the decorator.
    pub const fn new(keepers: Keepers) -> Self {
        Self { keepers }
    }
}

impl AnteDecorator for IncrementSequenceDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let signers = tx.as_std()?.signers();

        ctx.run_unmetered(|scoped| {
            for address in signers {
                let mut account = get_signer(&self.keepers, scoped, address)?;
                account.sequence += 1;
                self.keepers.account.set_account(scoped, account);
            }
            Ok::<_, AnteError>(())
        })?;

        next.run(ctx, tx, simulate)
    }
}

fn get_signer(keepers: &Keepers, ctx: &Context, address: Address) -> AnteResult<Account> {
    keepers
        .account
        .get_account(ctx, address)
        .ok_or_else(|| AnteError::UnknownAddress(format!("account {address} does not exist")))
}
