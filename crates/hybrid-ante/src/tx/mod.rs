//! Transaction shapes handled by the ante pipeline.

use core::fmt;

use alloy_primitives::Address;
use auto_impl::auto_impl;
use serde::{Deserialize, Serialize};

use crate::{AnteError, AnteResult};

mod ethereum;
pub use ethereum::*;

mod keys;
pub use keys::*;

mod std_tx;
pub use std_tx::*;

mod wrapped;
pub use wrapped::*;

/// The two concrete transaction kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxType {
    /// A native multi-signer transaction.
    Std,
    /// A single-signer Ethereum transaction.
    Ethereum,
}

impl TxType {
    /// Returns the other kind.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Std => Self::Ethereum,
            Self::Ethereum => Self::Std,
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Std => f.write_str("StdTx"),
            Self::Ethereum => f.write_str("MsgEthereumTx"),
        }
    }
}

/// A transaction as received by the ante pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Tx {
    /// A native transaction.
    Std(StdTx),
    /// An Ethereum transaction.
    Ethereum(MsgEthereumTx),
    /// A node-attested envelope around an encoded transaction.
    Wrapped(WrappedTx),
}

impl Tx {
    /// Returns the concrete kind, `None` for an envelope.
    pub const fn tx_type(&self) -> Option<TxType> {
        match self {
            Self::Std(_) => Some(TxType::Std),
            Self::Ethereum(_) => Some(TxType::Ethereum),
            Self::Wrapped(_) => None,
        }
    }

    /// Returns a name for log lines and errors.
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Std(_) => "StdTx",
            Self::Ethereum(_) => "MsgEthereumTx",
            Self::Wrapped(_) => "WrappedTx",
        }
    }

    /// Returns the native transaction, or an error naming the actual kind.
    pub fn as_std(&self) -> AnteResult<&StdTx> {
        match self {
            Self::Std(tx) => Ok(tx),
            other => Err(AnteError::invalid_tx_type(other.type_name())),
        }
    }

    /// Returns the Ethereum transaction, or an error naming the actual kind.
    pub fn as_ethereum(&self) -> AnteResult<&MsgEthereumTx> {
        match self {
            Self::Ethereum(tx) => Ok(tx),
            other => Err(AnteError::invalid_tx_type(other.type_name())),
        }
    }

    /// Returns the Ethereum transaction mutably, or an error naming the actual kind.
    pub fn as_ethereum_mut(&mut self) -> AnteResult<&mut MsgEthereumTx> {
        match self {
            Self::Ethereum(tx) => Ok(tx),
            other => Err(AnteError::invalid_tx_type(other.type_name())),
        }
    }

    /// Returns the addresses that signed the transaction, in order and without duplicates.
    ///
    /// An Ethereum transaction contributes its sender once known, from the signature cache or
    /// from `fallback` (the sender supplied out of band).
    pub fn signers(&self, fallback: Option<Address>) -> Vec<Address> {
        match self {
            Self::Std(tx) => tx.signers(),
            Self::Ethereum(tx) => tx.from().or(fallback).into_iter().collect(),
            Self::Wrapped(_) => Vec::new(),
        }
    }
}

impl From<StdTx> for Tx {
    fn from(tx: StdTx) -> Self {
        Self::Std(tx)
    }
}

impl From<MsgEthereumTx> for Tx {
    fn from(tx: MsgEthereumTx) -> Self {
        Self::Ethereum(tx)
    }
}

impl From<WrappedTx> for Tx {
    fn from(tx: WrappedTx) -> Self {
        Self::Wrapped(tx)
    }
}

/// Decodes the payload of a [`WrappedTx`].
#[auto_impl(&, Box, Arc)]
pub trait TxDecoder: fmt::Debug + Send + Sync {
    /// Decodes `bytes` into a transaction.
    fn decode(&self, bytes: &[u8]) -> AnteResult<Tx>;

    /// Encodes `tx` so that [`TxDecoder::decode`] returns it.
    fn encode(&self, tx: &Tx) -> AnteResult<Vec<u8>>;
}

/// A [`TxDecoder`] for the JSON encoding of [`Tx`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTxDecoder;

impl TxDecoder for JsonTxDecoder {
    fn decode(&self, bytes: &[u8]) -> AnteResult<Tx> {
        serde_json::from_slice(bytes)
            .map_err(|err| AnteError::UnknownRequest(format!("failed to decode tx: {err}")))
    }

    fn encode(&self, tx: &Tx) -> AnteResult<Vec<u8>> {
        serde_json::to_vec(tx)
            .map_err(|err| AnteError::UnknownRequest(format!("failed to encode tx: {err}")))
    }
}
