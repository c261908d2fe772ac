use std::sync::{Arc, RwLock};

use alloy_primitives::{
    map::{HashMap, HashSet},
    Address,
};

use crate::{
    constants::{
        store::{READ_COST_FLAT, WRITE_COST_FLAT},
        FEE_COLLECTOR_NAME,
    },
    module_address, Account, AccountKeeper, Coins, Context, Dec, EvmKeeper, EvmParams, Keepers,
    PendingPool, SupplyKeeper,
};

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<Address, Account>,
    next_account_number: u64,
    modules: HashMap<String, Address>,
    blocked: HashSet<Address>,
    blocked_contracts: HashSet<Address>,
    params: EvmParams,
    pending: HashMap<Address, u64>,
}

/// An in-memory implementation of every keeper trait, for tests and fixture replay.
///
/// Clones share the same state. Reads and writes charge the flat store costs to the context's
/// gas meter, like a real store would.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeeper {
    state: Arc<RwLock<State>>,
}

impl MemoryKeeper {
    /// Creates an empty keeper. Account numbers start at 1.
    pub fn new() -> Self {
        let keeper = Self::default();
        keeper.write().next_account_number = 1;
        keeper
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Bundles this keeper into [`Keepers`].
    pub fn keepers(&self) -> Keepers {
        Keepers::new(Arc::new(self.clone()), Arc::new(self.clone()), Arc::new(self.clone()))
            .with_pending_pool(Arc::new(self.clone()))
    }

    /// Stores an account as is.
    pub fn insert_account(&self, account: Account) {
        let mut state = self.write();
        state.next_account_number = state.next_account_number.max(account.account_number + 1);
        state.accounts.insert(account.address, account);
    }

    /// Stores an account as is.
    pub fn with_account(self, account: Account) -> Self {
        self.insert_account(account);
        self
    }

    /// Sets the balance of `address`, creating the account if needed.
    pub fn set_balance(&self, address: Address, coins: Coins) {
        let account = self.account(address).unwrap_or_else(|| self.next_account(address));
        self.insert_account(account.with_coins(coins));
    }

    /// Sets the balance of `address`, creating the account if needed.
    pub fn with_balance(self, address: Address, coins: Coins) -> Self {
        self.set_balance(address, coins);
        self
    }

    /// Sets the sequence of `address`, creating the account if needed.
    pub fn set_sequence(&self, address: Address, sequence: u64) {
        let account = self.account(address).unwrap_or_else(|| self.next_account(address));
        self.insert_account(account.with_sequence(sequence));
    }

    /// Sets the sequence of `address`, creating the account if needed.
    pub fn with_sequence(self, address: Address, sequence: u64) -> Self {
        self.set_sequence(address, sequence);
        self
    }

    /// Registers a module account called `name`.
    pub fn with_module_account(self, name: &str) -> Self {
        let address = module_address(name);
        self.write().modules.insert(name.to_owned(), address);
        if self.account(address).is_none() {
            let account = self.next_account(address);
            self.insert_account(account);
        }
        self
    }

    /// Registers the fee-collector module account.
    pub fn with_fee_collector(self) -> Self {
        self.with_module_account(FEE_COLLECTOR_NAME)
    }

    /// Adds `address` to the blocked list.
    pub fn with_blocked(self, address: Address) -> Self {
        self.write().blocked.insert(address);
        self
    }

    /// Adds the contract at `address` to the blocked contract list.
    pub fn with_blocked_contract(self, address: Address) -> Self {
        self.write().blocked_contracts.insert(address);
        self
    }

    /// Sets the EVM parameters.
    pub fn with_params(self, params: EvmParams) -> Self {
        self.write().params = params;
        self
    }

    /// Sets the number of mempool transactions waiting from `address`.
    pub fn with_pending(self, address: Address, count: u64) -> Self {
        self.write().pending.insert(address, count);
        self
    }

    /// Returns the stored account without charging gas.
    pub fn account(&self, address: Address) -> Option<Account> {
        self.read().accounts.get(&address).cloned()
    }

    /// Returns the stored balance of `address` in `denom`.
    pub fn balance(&self, address: Address, denom: &str) -> Dec {
        self.account(address).map_or(Dec::ZERO, |account| account.balance(denom))
    }

    /// Returns the stored sequence of `address`.
    pub fn sequence(&self, address: Address) -> Option<u64> {
        self.account(address).map(|account| account.sequence)
    }

    /// Returns the fee collector's balance in `denom`.
    pub fn fee_collector_balance(&self, denom: &str) -> Dec {
        self.balance(module_address(FEE_COLLECTOR_NAME), denom)
    }

    fn next_account(&self, address: Address) -> Account {
        let mut state = self.write();
        let number = state.next_account_number;
        state.next_account_number += 1;
        Account::new(address, number)
    }
}

impl AccountKeeper for MemoryKeeper {
    fn get_account(&self, ctx: &Context, address: Address) -> Option<Account> {
        ctx.gas_meter().borrow_mut().consume_gas(READ_COST_FLAT, "ReadFlat");
        self.account(address)
    }

    fn set_account(&self, ctx: &Context, account: Account) {
        ctx.gas_meter().borrow_mut().consume_gas(WRITE_COST_FLAT, "WriteFlat");
        self.insert_account(account);
    }

    fn new_account_with_address(&self, _ctx: &Context, address: Address) -> Account {
        self.next_account(address)
    }
}

impl SupplyKeeper for MemoryKeeper {
    fn get_module_account(&self, ctx: &Context, name: &str) -> Option<Account> {
        let address = self.read().modules.get(name).copied()?;
        self.get_account(ctx, address)
    }
}

impl EvmKeeper for MemoryKeeper {
    fn params(&self, ctx: &Context) -> EvmParams {
        ctx.gas_meter().borrow_mut().consume_gas(READ_COST_FLAT, "ReadFlat");
        self.read().params
    }

    fn is_address_blocked(&self, ctx: &Context, address: Address) -> bool {
        ctx.gas_meter().borrow_mut().consume_gas(READ_COST_FLAT, "ReadFlat");
        self.read().blocked.contains(&address)
    }

    fn is_contract_in_blocked_list(&self, ctx: &Context, address: Address) -> bool {
        ctx.gas_meter().borrow_mut().consume_gas(READ_COST_FLAT, "ReadFlat");
        self.read().blocked_contracts.contains(&address)
    }
}

impl PendingPool for MemoryKeeper {
    fn pending_tx_count(&self, address: Address) -> u64 {
        self.read().pending.get(&address).copied().unwrap_or_default()
    }
}
