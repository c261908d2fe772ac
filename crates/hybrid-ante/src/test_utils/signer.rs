use alloy_primitives::{keccak256, Address, Bytes, U256};
use k256::ecdsa::{
    signature::{hazmat::PrehashSigner, Signer},
    Signature, SigningKey,
};

use crate::{
    address_of,
    constants::evm::{EIP155_V_OFFSET, HOMESTEAD_V_OFFSET},
    MsgEthereumTx, StdSignature, StdTx, WrappedTx,
};

/// A secp256k1 key pair for signing test transactions.
#[derive(Debug, Clone)]
pub struct TestSigner {
    key: SigningKey,
}

impl TestSigner {
    /// Creates a signer whose secret key is `seed` repeated 32 times. `seed` must be non-zero.
    pub fn from_seed(seed: u8) -> Self {
        Self { key: SigningKey::from_slice(&[seed; 32]).expect("non-zero seed is a valid key") }
    }

    /// Returns the account address.
    pub fn address(&self) -> Address {
        address_of(self.key.verifying_key())
    }

    /// Returns the compressed public key.
    pub fn pub_key(&self) -> Bytes {
        Bytes::copy_from_slice(self.key.verifying_key().to_encoded_point(true).as_bytes())
    }

    /// Signs an Ethereum transaction, EIP-155 when `chain_id` is set and homestead otherwise.
    pub fn sign_eth(&self, tx: &mut MsgEthereumTx, chain_id: Option<u64>) {
        let hash = tx.sighash(chain_id);
        let (signature, recovery_id) =
            self.key.sign_prehash_recoverable(hash.as_slice()).expect("prehash is 32 bytes");
        let (r, s) = signature.split_bytes();
        let offset = chain_id.map_or(HOMESTEAD_V_OFFSET, |id| id * 2 + EIP155_V_OFFSET);
        tx.data.v = offset + u64::from(recovery_id.to_byte());
        tx.data.r = U256::from_be_slice(&r);
        tx.data.s = U256::from_be_slice(&s);
    }

    /// Signs arbitrary bytes the way native transactions are signed.
    pub fn sign_native(&self, sign_bytes: &[u8]) -> StdSignature {
        let signature: Signature =
            self.key.sign_prehash(keccak256(sign_bytes).as_slice()).expect("prehash is 32 bytes");
        StdSignature {
            pub_key: self.pub_key(),
            signature: Bytes::copy_from_slice(&signature.to_bytes()),
        }
    }

    /// Appends this signer's signature to a native transaction.
    pub fn sign_std(&self, tx: &mut StdTx, chain_id: &str, account_number: u64, sequence: u64) {
        let signature = self.sign_native(&tx.sign_bytes(chain_id, account_number, sequence));
        tx.signatures.push(signature);
    }

    /// Attests a wrapped transaction as a relaying node.
    pub fn sign_wrapped(&self, wrapped: &mut WrappedTx) {
        let signature: Signature = self.key.sign(&wrapped.signed_bytes());
        wrapped.signature = Bytes::copy_from_slice(&signature.to_bytes());
        wrapped.node_key = self.pub_key();
    }
}
