//! # Ante Context
//!
//! The [`Context`] is the per-transaction environment threaded through every decorator. It is a
//! cheap-to-clone value: decorators return a (possibly modified) copy to the next stage, while the
//! gas meter is shared so that every copy charging gas charges the same meter until one of them
//! installs a new one.
//!
//! Internal bookkeeping that must not show up on the user's bill runs through
//! [`Context::run_unmetered`], which hands the callback a copy carrying its own infinite meter. The
//! caller's meter is never touched, so it is identical before and after the lookup whether the
//! lookup succeeds or fails.

use std::rc::Rc;

use alloy_primitives::{Address, Bytes};

use crate::{Coins, GasMeter, SharedGasMeter, SigCache};

/// How the runtime is processing the transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecMode {
    /// First admission into the mempool.
    Check,
    /// Re-validation of a mempool transaction after a block commit.
    Recheck,
    /// Execution inside a committed block.
    #[default]
    Deliver,
}

/// The per-transaction environment seen by the ante decorators.
#[derive(Debug, Clone)]
pub struct Context {
    block_height: u64,
    chain_id: String,
    check_tx: bool,
    recheck_tx: bool,
    trace_tx: bool,
    min_gas_prices: Coins,
    from: Option<Address>,
    account_nonce: u64,
    gas_meter: SharedGasMeter,
    tx_bytes: Bytes,
    sig_cache: Option<SigCache>,
}

/* Constructors */
impl Context {
    /// Creates a `DeliverTx` context at `block_height` with an infinite gas meter.
    pub fn new(chain_id: impl Into<String>, block_height: u64) -> Self {
        Self {
            block_height,
            chain_id: chain_id.into(),
            check_tx: false,
            recheck_tx: false,
            trace_tx: false,
            min_gas_prices: Coins::empty(),
            from: None,
            account_nonce: 0,
            gas_meter: GasMeter::infinite().into_shared(),
            tx_bytes: Bytes::new(),
            sig_cache: None,
        }
    }

    /// Sets the check-tx flag. Clearing it also clears the recheck flag.
    pub const fn with_check_tx(mut self, check_tx: bool) -> Self {
        self.check_tx = check_tx;
        if !check_tx {
            self.recheck_tx = false;
        }
        self
    }

    /// Sets the recheck flag. A recheck is always a check, so setting it also sets check-tx.
    pub const fn with_recheck_tx(mut self, recheck_tx: bool) -> Self {
        self.recheck_tx = recheck_tx;
        if recheck_tx {
            self.check_tx = true;
        }
        self
    }

    /// Sets both flags from an [`ExecMode`].
    pub const fn with_mode(self, mode: ExecMode) -> Self {
        match mode {
            ExecMode::Check => self.with_check_tx(true).with_recheck_tx(false),
            ExecMode::Recheck => self.with_recheck_tx(true),
            ExecMode::Deliver => self.with_check_tx(false),
        }
    }

    /// Marks the context as replaying a transaction for tracing.
    pub const fn with_trace_tx(mut self, trace_tx: bool) -> Self {
        self.trace_tx = trace_tx;
        self
    }

    /// Sets the validator's minimum gas prices.
    pub fn with_min_gas_prices(mut self, min_gas_prices: Coins) -> Self {
        self.min_gas_prices = min_gas_prices;
        self
    }

    /// Sets the sender known out of band.
    pub const fn with_from(mut self, from: Option<Address>) -> Self {
        self.from = from;
        self
    }

    /// Records the sequence resolved by the nonce check.
    pub const fn with_account_nonce(mut self, account_nonce: u64) -> Self {
        self.account_nonce = account_nonce;
        self
    }

    /// Installs a fresh meter, detaching this context from the meter it shared before.
    pub fn with_gas_meter(mut self, gas_meter: GasMeter) -> Self {
        self.gas_meter = gas_meter.into_shared();
        self
    }

    /// Installs a fresh infinite meter.
    pub fn with_infinite_gas_meter(self) -> Self {
        self.with_gas_meter(GasMeter::infinite())
    }

    /// Sets the raw transaction bytes.
    pub fn with_tx_bytes(mut self, tx_bytes: impl Into<Bytes>) -> Self {
        self.tx_bytes = tx_bytes.into();
        self
    }

    /// Caches the recovered Ethereum signer.
    pub const fn with_sig_cache(mut self, sig_cache: Option<SigCache>) -> Self {
        self.sig_cache = sig_cache;
        self
    }
}

/* Accessors */
impl Context {
    /// Returns the block height.
    pub const fn block_height(&self) -> u64 {
        self.block_height
    }

    /// Returns the chain id.
    pub fn chain_id(&self) -> &str {
        &self.chain_id
    }

    /// Returns `true` during mempool admission, including rechecks.
    pub const fn is_check_tx(&self) -> bool {
        self.check_tx
    }

    /// Returns `true` while re-validating a mempool transaction.
    pub const fn is_recheck_tx(&self) -> bool {
        self.recheck_tx
    }

    /// Returns `true` while replaying a transaction for tracing.
    pub const fn is_trace_tx(&self) -> bool {
        self.trace_tx
    }

    /// Returns the mode implied by the check and recheck flags.
    pub const fn mode(&self) -> ExecMode {
        match (self.check_tx, self.recheck_tx) {
            (_, true) => ExecMode::Recheck,
            (true, false) => ExecMode::Check,
            (false, false) => ExecMode::Deliver,
        }
    }

    /// Returns the validator's minimum gas prices.
    pub const fn min_gas_prices(&self) -> &Coins {
        &self.min_gas_prices
    }

    /// Returns the sender known out of band, if any.
    pub const fn from(&self) -> Option<Address> {
        self.from
    }

    /// Returns the sequence resolved by the nonce check.
    pub const fn account_nonce(&self) -> u64 {
        self.account_nonce
    }

    /// Returns the shared gas meter.
    pub const fn gas_meter(&self) -> &SharedGasMeter {
        &self.gas_meter
    }

    /// Returns the gas consumed on the current meter.
    pub fn gas_consumed(&self) -> u64 {
        self.gas_meter.borrow().gas_consumed()
    }

    /// Returns `true` if `other` charges the same meter as this context.
    pub fn shares_gas_meter(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.gas_meter, &other.gas_meter)
    }

    /// Returns the raw transaction bytes.
    pub const fn tx_bytes(&self) -> &Bytes {
        &self.tx_bytes
    }

    /// Returns the cached Ethereum signer, if any.
    pub const fn sig_cache(&self) -> Option<&SigCache> {
        self.sig_cache.as_ref()
    }

    /// Runs `f` against a copy of this context that charges a private infinite meter.
    pub fn run_unmetered<T>(&self, f: impl FnOnce(&Self) -> T) -> T {
        let scoped = self.clone().with_infinite_gas_meter();
        f(&scoped)
    }
}
