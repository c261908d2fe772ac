use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

use crate::{verify_node_signature, TxType};

/// An encoded transaction relayed by a node, optionally attested with the node's key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedTx {
    /// The encoded inner transaction.
    pub payload: Bytes,
    /// The sender the relaying node attests for an inner Ethereum transaction.
    #[serde(default)]
    pub from: Option<Address>,
    /// The node's signature over [`WrappedTx::signed_bytes`].
    #[serde(default)]
    pub signature: Bytes,
    /// SEC1-encoded public key of the relaying node.
    #[serde(default)]
    pub node_key: Bytes,
    /// The declared kind of the inner transaction.
    pub tx_type: TxType,
}

impl WrappedTx {
    /// Creates an unsigned envelope.
    pub fn new(payload: impl Into<Bytes>, tx_type: TxType) -> Self {
        Self {
            payload: payload.into(),
            from: None,
            signature: Bytes::new(),
            node_key: Bytes::new(),
            tx_type,
        }
    }

    /// Returns `true` if both the signature and the node key are present.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty() && !self.node_key.is_empty()
    }

    /// Returns the bytes the node signs: the payload followed by the attested sender, if any.
    pub fn signed_bytes(&self) -> Vec<u8> {
        let mut bytes = self.payload.to_vec();
        if let Some(from) = self.from {
            bytes.extend_from_slice(from.as_slice());
        }
        bytes
    }

    /// Checks the node signature against the declared node key.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not verify, and an error only
    /// when the key or the signature cannot be decoded.
    pub fn verify_node_signature(&self) -> Result<bool, k256::ecdsa::Error> {
        verify_node_signature(&self.node_key, &self.signed_bytes(), &self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::bytes;

    #[test]
    fn test_is_signed_needs_both_parts() {
        let mut wrapped = WrappedTx::new(bytes!("01"), TxType::Std);
        assert!(!wrapped.is_signed());
        wrapped.signature = bytes!("02");
        assert!(!wrapped.is_signed());
        wrapped.node_key = bytes!("03");
        assert!(wrapped.is_signed());
    }

    #[test]
    fn test_signed_bytes_append_sender() {
        let mut wrapped = WrappedTx::new(bytes!("aabb"), TxType::Ethereum);
        assert_eq!(wrapped.signed_bytes(), vec![0xaa, 0xbb]);
        wrapped.from = Some(Address::repeat_byte(0x11));
        assert_eq!(wrapped.signed_bytes().len(), 22);
        assert_eq!(wrapped.signed_bytes()[2..], [0x11; 20]);
    }

    #[test]
    fn test_malformed_node_key_is_an_error() {
        let mut wrapped = WrappedTx::new(bytes!("aabb"), TxType::Std);
        wrapped.signature = Bytes::from(vec![1u8; 64]);
        wrapped.node_key = bytes!("0102");
        assert!(wrapped.verify_node_signature().is_err());
    }
}
