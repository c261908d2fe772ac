//! Nonce admission.
//!
//! Block execution always demands the stored sequence exactly. Mempool admission depends on how
//! the mempool is configured: with a pending pool any nonce at or above the sequence may queue,
//! otherwise the next acceptable nonce also counts the sender's transactions that are admitted
//! but not yet committed whenever the checking state does not advance between commits.

use core::fmt;

use tracing::debug;

use super::require_sender;
use crate::{
    AnteDecorator, AnteError, AnteResult, Context, ExecMode, Keepers, MempoolPolicy, Next, Tx,
};

/// The set of nonces a transaction may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceRule {
    /// Exactly this nonce.
    Exact(u64),
    /// This nonce or any later one.
    AtLeast(u64),
    /// Any nonce in the closed range.
    Range(u64, u64),
}

impl NonceRule {
    /// Resolves the rule for a sender whose stored sequence is `sequence`.
    ///
    /// `pending` is only called when the mempool does not recheck and admission has to account
    /// for the sender's queued transactions.
    pub fn resolve(
        mode: ExecMode,
        policy: &MempoolPolicy,
        sequence: u64,
        pending: impl FnOnce() -> u64,
    ) -> Self {
        match mode {
            ExecMode::Deliver | ExecMode::Recheck => Self::Exact(sequence),
            ExecMode::Check if policy.enable_pending_pool => Self::AtLeast(sequence),
            ExecMode::Check => {
                let check_tx_nonce = if policy.enable_recheck {
                    sequence
                } else {
                    sequence.saturating_add(pending())
                };
                if policy.enable_sort {
                    Self::Range(sequence, check_tx_nonce)
                } else {
                    Self::Exact(check_tx_nonce)
                }
            }
        }
    }

    /// Returns `true` if `nonce` is acceptable.
    pub const fn accepts(&self, nonce: u64) -> bool {
        match *self {
            Self::Exact(expected) => nonce == expected,
            Self::AtLeast(lowest) => nonce >= lowest,
            Self::Range(lowest, highest) => lowest <= nonce && nonce <= highest,
        }
    }

    /// Checks `nonce`, describing the acceptable set on failure.
    pub fn check(&self, nonce: u64) -> AnteResult<()> {
        if self.accepts(nonce) {
            return Ok(());
        }
        Err(AnteError::InvalidSequence(format!("invalid nonce; got {nonce}, expected {self}")))
    }
}

impl fmt::Display for NonceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(expected) | Self::AtLeast(expected) => write!(f, "{expected}"),
            Self::Range(lowest, highest) => {
                write!(f, "in the range of [{lowest}, {highest}]")
            }
        }
    }
}

/// Checks an Ethereum transaction's nonce against the sender's stored sequence.
///
/// During `CheckTx` the stored sequence is recorded on the context as the account nonce.
/// Skipped when simulating.
#[derive(Debug, Clone)]
pub struct NonceVerificationDecorator {
    keepers: Keepers,
    policy: MempoolPolicy,
}

impl NonceVerificationDecorator {
    /// Creates the decorator.
    pub const fn new(keepers: Keepers, policy: MempoolPolicy) -> Self {
        Self { keepers, policy }
    }
}

impl AnteDecorator for NonceVerificationDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        if simulate {
            return next.run(ctx, tx, simulate);
        }

        let msg = tx.as_ethereum_mut()?;
        let address = require_sender(&ctx, msg)?;
        let account = self
            .keepers
            .account
            .get_account(&ctx, address)
            .ok_or_else(|| AnteError::UnknownAddress(format!("account {address} is nil")))?;

        let sequence = account.sequence;
        let rule = NonceRule::resolve(ctx.mode(), &self.policy, sequence, || {
            self.keepers.pending_pool.pending_tx_count(address)
        });
        if let Err(err) = rule.check(msg.nonce()) {
            debug!(%address, nonce = msg.nonce(), sequence, mode = ?ctx.mode(), "Rejecting nonce");
            return Err(err);
        }

        let ctx = if ctx.is_check_tx() { ctx.with_account_nonce(sequence) } else { ctx };
        next.run(ctx, tx, simulate)
    }
}
