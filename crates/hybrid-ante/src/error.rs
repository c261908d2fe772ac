//! Error type surfaced by every decorator.

/// Result type of an ante decorator or handler.
pub type AnteResult<T> = Result<T, AnteError>;

/// Reasons a transaction is rejected by the ante pipeline.
///
/// Every variant carries the formatted log line. The variant itself is the semantic category the
/// runtime reports; [`AnteError::code`] gives its stable numeric code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnteError {
    /// The transaction has an unexpected shape, or a node signature could not be checked.
    #[error("unknown request: {0}")]
    UnknownRequest(String),

    /// Declared gas exceeds the chain-wide per-transaction maximum.
    #[error("tx too large: {0}")]
    TxTooLarge(String),

    /// An account that must exist does not.
    #[error("unknown address: {0}")]
    UnknownAddress(String),

    /// Nonce or sequence mismatch, or a bad account number at genesis.
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    /// The fee is below the node's floor or is not a valid coin amount.
    #[error("insufficient fee: {0}")]
    InsufficientFee(String),

    /// The payer cannot cover the fee or the transaction's worst-case cost.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// A balance update produced an invalid coin set.
    #[error("invalid coins: {0}")]
    InvalidCoins(String),

    /// The gas limit is below the intrinsic cost, or a gas meter ran out.
    #[error("out of gas: {0}")]
    OutOfGas(String),

    /// A signature does not verify.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A public key does not belong to the signer it was presented for.
    #[error("invalid pubkey: {0}")]
    InvalidPubKey(String),

    /// A native transaction failed its stateless checks.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The memo exceeds the allowed length.
    #[error("memo too large: {0}")]
    MemoTooLarge(String),

    /// More signatures than the chain accepts.
    #[error("too many signatures: {0}")]
    TooManySignatures(String),

    /// A native transaction without any signature.
    #[error("no signatures supplied")]
    NoSignatures,

    /// An Ethereum transaction field holds a value the chain does not accept.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

impl AnteError {
    /// Codespace of the errors raised by the EVM module rather than the SDK root.
    pub const EVM_CODESPACE: &'static str = "evm";

    /// The ABCI code of this error's category.
    pub const fn code(&self) -> u32 {
        match self {
            Self::InvalidSequence(_) => 3,
            Self::Unauthorized(_) => 4,
            Self::InsufficientFunds(_) => 5,
            Self::UnknownRequest(_) => 6,
            Self::InvalidPubKey(_) => 8,
            Self::UnknownAddress(_) => 9,
            Self::InvalidCoins(_) => 10,
            Self::OutOfGas(_) => 11,
            Self::MemoTooLarge(_) => 12,
            Self::InsufficientFee(_) => 13,
            Self::TooManySignatures(_) => 14,
            Self::NoSignatures => 15,
            Self::InvalidRequest(_) => 18,
            Self::TxTooLarge(_) => 21,
            Self::InvalidValue(_) => 2,
        }
    }

    /// The codespace [`AnteError::code`] belongs to.
    pub const fn codespace(&self) -> &'static str {
        match self {
            Self::InvalidValue(_) => Self::EVM_CODESPACE,
            _ => "sdk",
        }
    }

    /// Shorthand for an [`AnteError::UnknownRequest`] naming an unexpected transaction variant.
    pub fn invalid_tx_type(type_name: &str) -> Self {
        Self::UnknownRequest(format!("invalid transaction type: {type_name}"))
    }
}
