//! Ethereum transactions carried as a chain message.
//!
//! Signing hashes are computed through [`alloy_consensus::TxLegacy`], so the bytes a wallet signs
//! for chain id `N` are exactly the EIP-155 legacy encoding. The raw `v, r, s` triple is kept on
//! the message and only turned into a public key when the signature decorator asks for it.

use alloy_consensus::{SignableTransaction, TxLegacy};
use alloy_primitives::{Address, Bytes, TxKind, B256, U256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

use crate::{
    constants::evm::{
        EIP155_V_OFFSET, HOMESTEAD_V_OFFSET, TX_DATA_NON_ZERO_GAS_FRONTIER, TX_DATA_ZERO_GAS,
        TX_GAS, TX_GAS_CONTRACT_CREATION,
    },
    address_of, AnteError, AnteResult,
};

/// The sender recovered from (or attested for) an Ethereum transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigCache {
    /// The sender.
    pub from: Address,
    /// Chain id the signature was checked against, `None` for a homestead signature or a sender
    /// supplied out of band.
    pub chain_id: Option<u64>,
}

/// The signed fields of an Ethereum transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxData {
    /// The sender's nonce.
    pub nonce: u64,
    /// Price per unit of gas, in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    /// Call target, `None` for a contract creation.
    pub recipient: Option<Address>,
    /// Value transferred, in wei.
    pub amount: U256,
    /// Call data or init code.
    pub payload: Bytes,
    /// Signature `v`, holding the recovery id and, when protected, the chain id.
    pub v: u64,
    /// Signature `r`.
    pub r: U256,
    /// Signature `s`.
    pub s: U256,
}

/// An Ethereum transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MsgEthereumTx {
    /// The signed fields.
    pub data: TxData,
    /// The sender once known.
    #[serde(skip)]
    from: Option<SigCache>,
}

impl PartialEq for MsgEthereumTx {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Eq for MsgEthereumTx {}

impl MsgEthereumTx {
    /// Creates an unsigned transaction.
    pub fn new(
        nonce: u64,
        recipient: Option<Address>,
        amount: U256,
        gas_limit: u64,
        gas_price: u128,
        payload: Bytes,
    ) -> Self {
        Self {
            data: TxData {
                nonce,
                gas_price,
                gas_limit,
                recipient,
                amount,
                payload,
                ..Default::default()
            },
            from: None,
        }
    }

    /// Returns the sender nonce.
    pub const fn nonce(&self) -> u64 {
        self.data.nonce
    }

    /// Returns the gas limit.
    pub const fn gas(&self) -> u64 {
        self.data.gas_limit
    }

    /// Returns `price * gas`, in wei.
    pub fn fee(&self) -> U256 {
        U256::from(self.data.gas_price) * U256::from(self.data.gas_limit)
    }

    /// Returns `fee + value`, in wei.
    pub fn cost(&self) -> U256 {
        self.fee().saturating_add(self.data.amount)
    }

    /// Returns `true` for a contract creation.
    pub const fn is_create(&self) -> bool {
        self.data.recipient.is_none()
    }

    /// Returns the cached sender.
    pub fn from(&self) -> Option<Address> {
        self.from.map(|cache| cache.from)
    }

    /// Returns the cached signature check.
    pub const fn sig_cache(&self) -> Option<SigCache> {
        self.from
    }

    /// Caches a sender.
    pub const fn set_from(&mut self, cache: SigCache) {
        self.from = Some(cache);
    }

    /// Returns the cached sender, adopting `fallback` as the sender when none is cached yet.
    pub fn resolve_sender(&mut self, fallback: Option<Address>) -> Option<Address> {
        if self.from.is_none() {
            if let Some(from) = fallback {
                self.set_from(SigCache { from, chain_id: None });
            }
        }
        self.from()
    }

    /// Stateless checks: the gas price must be non-zero.
    pub fn validate_basic(&self) -> AnteResult<()> {
        if self.data.gas_price == 0 {
            return Err(AnteError::InvalidValue("gas price cannot be 0".to_owned()));
        }
        Ok(())
    }

    /// Returns `true` if `v` carries a chain id.
    pub const fn is_protected(&self) -> bool {
        self.data.v != HOMESTEAD_V_OFFSET && self.data.v != HOMESTEAD_V_OFFSET + 1
    }

    /// Returns the legacy transaction whose signing hash the sender signed.
    pub fn to_legacy(&self, chain_id: Option<u64>) -> TxLegacy {
        TxLegacy {
            chain_id,
            nonce: self.data.nonce,
            gas_price: self.data.gas_price,
            gas_limit: self.data.gas_limit,
            to: self.data.recipient.map_or(TxKind::Create, TxKind::Call),
            value: self.data.amount,
            input: self.data.payload.clone(),
        }
    }

    /// Returns the signing hash, EIP-155 when `chain_id` is set and homestead otherwise.
    pub fn sighash(&self, chain_id: Option<u64>) -> B256 {
        self.to_legacy(chain_id).signature_hash()
    }

    /// Recovers the sender, returning the cached one if it was checked against the same chain.
    ///
    /// A protected signature is checked against `chain_id`, which must be non-zero. An
    /// unprotected one is refused once `homestead_disabled` is set.
    pub fn verify_sig(&mut self, chain_id: u64, homestead_disabled: bool) -> AnteResult<Address> {
        let signer_chain_id = if self.is_protected() {
            if chain_id == 0 {
                return Err(AnteError::Unauthorized("chain ID cannot be zero".to_owned()));
            }
            Some(chain_id)
        } else {
            if homestead_disabled {
                return Err(AnteError::Unauthorized(
                    "deprecated support for homestead Signer".to_owned(),
                ));
            }
            None
        };

        if let Some(cache) = self.from.filter(|cache| cache.chain_id == signer_chain_id) {
            return Ok(cache.from);
        }

        let from = self.recover(signer_chain_id)?;
        self.set_from(SigCache { from, chain_id: signer_chain_id });
        Ok(from)
    }

    fn recover(&self, chain_id: Option<u64>) -> AnteResult<Address> {
        let offset = match chain_id {
            Some(id) => id
                .checked_mul(2)
                .and_then(|v| v.checked_add(EIP155_V_OFFSET))
                .ok_or_else(|| invalid_sig("chain id overflow"))?,
            None => HOMESTEAD_V_OFFSET,
        };
        let recovery_id = self
            .data
            .v
            .checked_sub(offset)
            .and_then(|v| u8::try_from(v).ok())
            .and_then(RecoveryId::from_byte)
            .filter(|id| !id.is_x_reduced())
            .ok_or_else(|| invalid_sig("invalid chain id for signer"))?;

        let signature = Signature::from_scalars(
            self.data.r.to_be_bytes::<32>(),
            self.data.s.to_be_bytes::<32>(),
        )
        .map_err(|err| invalid_sig(&err.to_string()))?;
        if signature.normalize_s().is_some() {
            return Err(invalid_sig("signature s value is too high"));
        }

        let key = VerifyingKey::recover_from_prehash(
            self.sighash(chain_id).as_slice(),
            &signature,
            recovery_id,
        )
        .map_err(|err| invalid_sig(&err.to_string()))?;
        Ok(address_of(&key))
    }

    /// Gas charged before execution: a flat base plus a per-byte payload cost.
    pub fn intrinsic_gas(&self) -> AnteResult<u64> {
        let base = if self.is_create() { TX_GAS_CONTRACT_CREATION } else { TX_GAS };
        let payload = &self.data.payload;
        if payload.is_empty() {
            return Ok(base);
        }
        let zero = payload.iter().filter(|b| **b == 0).count() as u64;
        let non_zero = payload.len() as u64 - zero;
        let overflow = || AnteError::OutOfGas("intrinsic gas overflow".to_owned());

        let gas = non_zero
            .checked_mul(TX_DATA_NON_ZERO_GAS_FRONTIER)
            .and_then(|g| g.checked_add(base))
            .ok_or_else(overflow)?;
        zero.checked_mul(TX_DATA_ZERO_GAS).and_then(|g| g.checked_add(gas)).ok_or_else(overflow)
    }
}

fn invalid_sig(reason: &str) -> AnteError {
    AnteError::Unauthorized(format!("invalid signature: {reason}"))
}

/// Extracts the EVM chain id from a chain-id string of the form `<name>-<epoch>`.
pub fn parse_chain_id(chain_id: &str) -> AnteResult<u64> {
    chain_id
        .rsplit_once('-')
        .and_then(|(name, epoch)| (!name.is_empty()).then_some(epoch))
        .and_then(|epoch| epoch.parse().ok())
        .ok_or_else(|| AnteError::UnknownRequest(format!("invalid chain-id: {chain_id}")))
}
