//! Node attestation of relayed transactions.
//!
//! A relaying node may sign a [`WrappedTx`] with its node key. When that key is trusted and the
//! signature holds, the receiving node takes the node's word for the inner transaction's
//! signature and runs the light chain. A signature that simply does not hold, or comes from an
//! unknown node, is not an error: the transaction falls back to full verification. Only a key or
//! signature that cannot even be decoded rejects the transaction.

use alloy_primitives::Bytes;
use tracing::debug;

use crate::{AnteError, AnteResult, WrappedTx};

/// How a wrapped transaction's attestation was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    /// No node signature is attached.
    Unsigned,
    /// A trusted node signed the envelope.
    Confident,
    /// A signature is attached but does not hold, or its key is not trusted.
    NotConfident,
}

/// The set of node keys whose attestation is trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedNodes {
    keys: Vec<Bytes>,
}

impl TrustedNodes {
    /// Creates the set.
    pub fn new(keys: impl IntoIterator<Item = Bytes>) -> Self {
        Self { keys: keys.into_iter().collect() }
    }

    /// Returns `true` if `node_key` is trusted.
    pub fn contains(&self, node_key: &[u8]) -> bool {
        self.keys.iter().any(|key| key.as_ref() == node_key)
    }

    /// Classifies the attestation of `wrapped`.
    ///
    /// The signature is checked before the key is looked up, so a malformed key or signature is
    /// an [`AnteError::UnknownRequest`] even when the node is unknown.
    pub fn classify(&self, wrapped: &WrappedTx) -> AnteResult<Confidence> {
        if !wrapped.is_signed() {
            return Ok(Confidence::Unsigned);
        }

        let verified = wrapped.verify_node_signature().map_err(|err| {
            AnteError::UnknownRequest(format!("failed to verify node signature: {err}"))
        })?;
        let confidence = if verified && self.contains(&wrapped.node_key) {
            Confidence::Confident
        } else {
            Confidence::NotConfident
        };
        debug!(node_key = %wrapped.node_key, verified, ?confidence, "Classified wrapped tx");
        Ok(confidence)
    }
}
