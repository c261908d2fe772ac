//! Collaborator interfaces the decorators read and write state through.
//!
//! Storage lives behind these traits; the ante pipeline only performs read-modify-write sequences
//! on single accounts and relies on the implementation to serialise writes to the same key.

use core::fmt::Debug;
use std::sync::Arc;

use alloy_primitives::Address;
use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use crate::{constants::evm::DEFAULT_MAX_GAS_LIMIT_PER_TX, Account, Context};

/// Account storage.
#[auto_impl(&, Box, Arc)]
pub trait AccountKeeper: Debug + Send + Sync {
    /// Returns the account stored at `address`.
    fn get_account(&self, ctx: &Context, address: Address) -> Option<Account>;

    /// Stores `account`, replacing any previous record at its address.
    fn set_account(&self, ctx: &Context, account: Account);

    /// Builds a zero-balance account for `address` with the next account number. The account is
    /// not stored until passed to [`AccountKeeper::set_account`].
    fn new_account_with_address(&self, ctx: &Context, address: Address) -> Account;
}

/// Module account lookup.
#[auto_impl(&, Box, Arc)]
pub trait SupplyKeeper: Debug + Send + Sync {
    /// Returns the module account called `name`.
    fn get_module_account(&self, ctx: &Context, name: &str) -> Option<Account>;
}

/// Governance parameters of the EVM module consumed by the ante pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvmParams {
    /// Largest gas limit a single Ethereum transaction may declare.
    pub max_gas_limit_per_tx: u64,
    /// Whether calls into blocked contracts are refused at admission.
    pub enable_contract_blocked_list: bool,
}

impl Default for EvmParams {
    fn default() -> Self {
        Self {
            max_gas_limit_per_tx: DEFAULT_MAX_GAS_LIMIT_PER_TX,
            enable_contract_blocked_list: false,
        }
    }
}

/// EVM module state.
#[auto_impl(&, Box, Arc)]
pub trait EvmKeeper: Debug + Send + Sync {
    /// Returns the current parameters.
    fn params(&self, ctx: &Context) -> EvmParams;

    /// Returns `true` if `address` may not send transactions.
    fn is_address_blocked(&self, ctx: &Context, address: Address) -> bool;

    /// Returns `true` if calls into the contract at `address` are refused.
    fn is_contract_in_blocked_list(&self, ctx: &Context, address: Address) -> bool;
}

/// Mempool view used by the nonce check.
#[auto_impl(&, Box, Arc)]
pub trait PendingPool: Debug + Send + Sync {
    /// Returns how many transactions from `address` wait in the mempool.
    fn pending_tx_count(&self, address: Address) -> u64;
}

/// A [`PendingPool`] that never holds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyPendingPool;

impl PendingPool for EmptyPendingPool {
    fn pending_tx_count(&self, _address: Address) -> u64 {
        0
    }
}

/// The keepers shared by every decorator of a dispatcher.
#[derive(Debug, Clone)]
pub struct Keepers {
    /// Account storage.
    pub account: Arc<dyn AccountKeeper>,
    /// Module accounts.
    pub supply: Arc<dyn SupplyKeeper>,
    /// EVM module state.
    pub evm: Arc<dyn EvmKeeper>,
    /// Mempool view.
    pub pending_pool: Arc<dyn PendingPool>,
}

impl Keepers {
    /// Bundles the keepers, with an empty pending pool.
    pub fn new(
        account: Arc<dyn AccountKeeper>,
        supply: Arc<dyn SupplyKeeper>,
        evm: Arc<dyn EvmKeeper>,
    ) -> Self {
        Self { account, supply, evm, pending_pool: Arc::new(EmptyPendingPool) }
    }

    /// Replaces the pending pool.
    pub fn with_pending_pool(mut self, pending_pool: Arc<dyn PendingPool>) -> Self {
        self.pending_pool = pending_pool;
        self
    }

    /// Returns the account at `address`, reading through a private infinite meter.
    pub fn get_account_unmetered(&self, ctx: &Context, address: Address) -> Option<Account> {
        ctx.run_unmetered(|ctx| self.account.get_account(ctx, address))
    }
}
