use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_BOND_DENOM;

/// Mempool flags consulted by the nonce and sequence decorators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MempoolPolicy {
    /// The mempool re-validates queued transactions after each commit, so the checking state
    /// advances with every admitted transaction.
    pub enable_recheck: bool,
    /// Transactions with future nonces queue in a pending pool.
    pub enable_pending_pool: bool,
    /// Admission accepts a nonce range rather than one exact nonce.
    pub enable_sort: bool,
}

impl Default for MempoolPolicy {
    fn default() -> Self {
        Self { enable_recheck: true, enable_pending_pool: false, enable_sort: true }
    }
}

/// Node-level configuration of the ante pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnteConfig {
    /// Denomination fees and EVM balances are paid in.
    pub bond_denom: String,
    /// Height above which unprotected (homestead) Ethereum signatures are refused. Zero means
    /// the cutoff is not active.
    pub mercury_height: u64,
    /// Mempool policy flags.
    pub mempool: MempoolPolicy,
    /// Compressed secp256k1 keys of the nodes whose attestation selects the light chains.
    pub trusted_node_keys: Vec<Bytes>,
}

impl Default for AnteConfig {
    fn default() -> Self {
        Self {
            bond_denom: DEFAULT_BOND_DENOM.to_owned(),
            mercury_height: 0,
            mempool: MempoolPolicy::default(),
            trusted_node_keys: Vec::new(),
        }
    }
}

impl AnteConfig {
    /// Returns `true` if `height` is past the mercury cutoff.
    pub const fn is_past_mercury(&self, height: u64) -> bool {
        self.mercury_height != 0 && height > self.mercury_height
    }

    /// Sets the mempool policy.
    pub const fn with_mempool(mut self, mempool: MempoolPolicy) -> Self {
        self.mempool = mempool;
        self
    }

    /// Adds a trusted node key.
    pub fn with_trusted_node_key(mut self, key: impl Into<Bytes>) -> Self {
        self.trusted_node_keys.push(key.into());
        self
    }
}
