use alloy_primitives::{keccak256, Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::{Coins, Dec};

/// An account as stored by the account keeper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// The account address.
    pub address: Address,
    /// Number assigned at creation. Only genesis accounts may hold zero.
    pub account_number: u64,
    /// Number of transactions the account has sent.
    pub sequence: u64,
    /// Balance per denomination.
    pub coins: Coins,
    /// Compressed public key, known once the account has signed a native transaction.
    pub pub_key: Option<Bytes>,
}

impl Account {
    /// Creates an empty account.
    pub fn new(address: Address, account_number: u64) -> Self {
        Self { address, account_number, ..Default::default() }
    }

    /// Sets the balance.
    pub fn with_coins(mut self, coins: Coins) -> Self {
        self.coins = coins;
        self
    }

    /// Sets the sequence.
    pub const fn with_sequence(mut self, sequence: u64) -> Self {
        self.sequence = sequence;
        self
    }

    /// Returns the balance held of `denom`.
    pub fn balance(&self, denom: &str) -> Dec {
        self.coins.amount_of(denom)
    }
}

/// Returns the address of the module account called `name`.
pub fn module_address(name: &str) -> Address {
    Address::from_slice(&keccak256(name.as_bytes())[12..])
}
