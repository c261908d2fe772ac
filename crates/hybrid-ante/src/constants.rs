//! Constants for the ante pipeline.
//!
//! It groups the constants by the path that consumes them.

/// The denomination fees and EVM balances are paid in when no configuration overrides it.
pub const DEFAULT_BOND_DENOM: &str = "okb";

/// Number of fractional decimal digits carried by [`crate::Dec`].
pub const PRECISION: usize = 18;

/// Name of the module account that accumulates transaction fees.
pub const FEE_COLLECTOR_NAME: &str = "fee_collector";

/// Constants for the Ethereum transaction path.
pub mod evm {
    /// Intrinsic gas of a transaction that is not a contract creation.
    pub const TX_GAS: u64 = 21_000;
    /// Intrinsic gas of a contract-creation transaction.
    pub const TX_GAS_CONTRACT_CREATION: u64 = 53_000;
    /// Gas charged per zero byte of payload.
    pub const TX_DATA_ZERO_GAS: u64 = 4;
    /// Gas charged per non-zero byte of payload, before EIP-2028 lowered it.
    pub const TX_DATA_NON_ZERO_GAS_FRONTIER: u64 = 68;

    /// The default for the `max_gas_limit_per_tx` EVM parameter.
    pub const DEFAULT_MAX_GAS_LIMIT_PER_TX: u64 = 30_000_000;

    /// Offset added to the recovery id of an EIP-155 signature, on top of `2 * chain_id`.
    pub const EIP155_V_OFFSET: u64 = 35;
    /// Offset added to the recovery id of a homestead (unprotected) signature.
    pub const HOMESTEAD_V_OFFSET: u64 = 27;
}

/// Constants for the native (`StdTx`) path.
pub mod native {
    /// Largest gas limit a native transaction may declare.
    pub const MAX_GAS_WANTED: u64 = (1 << 63) - 1;
    /// Longest memo accepted, in characters.
    pub const MAX_MEMO_CHARACTERS: usize = 256;
    /// Largest number of signatures accepted on one transaction.
    pub const TX_SIG_LIMIT: usize = 7;
    /// Gas charged for verifying one secp256k1 signature.
    pub const SIG_VERIFY_COST_SECP256K1: u64 = 1_000;
}

/// Gas charged by keepers for store access. Keeper reads issued by the decorators go through an
/// unmetered context, so these never reach the user's bill from the ante pipeline.
pub mod store {
    /// Flat cost of one store read.
    pub const READ_COST_FLAT: u64 = 1_000;
    /// Flat cost of one store write.
    pub const WRITE_COST_FLAT: u64 = 2_000;
}
