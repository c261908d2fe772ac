use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{constants::native::MAX_GAS_WANTED, AnteError, AnteResult, Coins};

/// Fee of a native transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    /// Amount paid by the first signer.
    pub amount: Coins,
    /// Gas limit.
    pub gas: u64,
}

/// One signature of a native transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdSignature {
    /// SEC1-encoded public key of the signer.
    pub pub_key: Bytes,
    /// 64-byte `r‖s` signature over the keccak hash of the sign bytes.
    pub signature: Bytes,
}

/// A message of a native transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum StdMsg {
    /// A bank transfer.
    #[serde(rename = "cosmos-sdk/MsgSend")]
    Send {
        /// Sender.
        from: Address,
        /// Receiver.
        to: Address,
        /// Amount transferred.
        amount: Coins,
    },
    /// An EVM call wrapped in a native transaction and signed by `from`.
    #[serde(rename = "ethermint/MsgEthermint")]
    Ethermint {
        /// Sender nonce.
        nonce: u64,
        /// Price per unit of gas.
        gas_price: u128,
        /// Gas limit.
        gas_limit: u64,
        /// Call target, `None` for a contract creation.
        recipient: Option<Address>,
        /// Value transferred.
        amount: U256,
        /// Call data or init code.
        payload: Bytes,
        /// Sender.
        from: Address,
    },
}

impl StdMsg {
    /// Returns the address that must sign the message.
    pub const fn signer(&self) -> Address {
        match self {
            Self::Send { from, .. } | Self::Ethermint { from, .. } => *from,
        }
    }
}

/// A native transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StdTx {
    /// Messages, executed in order.
    pub msgs: Vec<StdMsg>,
    /// Fee and gas limit.
    pub fee: StdFee,
    /// One signature per signer, in signer order.
    pub signatures: Vec<StdSignature>,
    /// Free-form note.
    pub memo: String,
}

/// The document signers sign. Serialised through [`serde_json::Value`] so that every object has
/// its keys sorted.
#[derive(Serialize)]
struct StdSignDoc<'a> {
    account_number: String,
    chain_id: &'a str,
    fee: &'a StdFee,
    memo: &'a str,
    msgs: &'a [StdMsg],
    sequence: String,
}

impl StdTx {
    /// Returns the signers in message order, without duplicates.
    pub fn signers(&self) -> Vec<Address> {
        let mut signers: Vec<Address> = Vec::with_capacity(self.msgs.len());
        for signer in self.msgs.iter().map(StdMsg::signer) {
            if !signers.contains(&signer) {
                signers.push(signer);
            }
        }
        signers
    }

    /// Returns the address paying the fee: the first signer.
    pub fn fee_payer(&self) -> Option<Address> {
        self.msgs.first().map(StdMsg::signer)
    }

    /// Stateless checks on the gas, the fee and the signature count.
    pub fn validate_basic(&self) -> AnteResult<()> {
        if self.fee.gas > MAX_GAS_WANTED {
            return Err(AnteError::InvalidRequest(format!(
                "invalid gas supplied; {} > {MAX_GAS_WANTED}",
                self.fee.gas
            )));
        }
        if !self.fee.amount.is_empty() && !self.fee.amount.is_valid() {
            return Err(AnteError::InsufficientFee(format!(
                "invalid fee amount: {}",
                self.fee.amount
            )));
        }
        if self.signatures.is_empty() {
            return Err(AnteError::NoSignatures);
        }
        let signers = self.signers();
        if self.signatures.len() != signers.len() {
            return Err(AnteError::Unauthorized(format!(
                "wrong number of signers; expected {}, got {}",
                signers.len(),
                self.signatures.len()
            )));
        }
        Ok(())
    }

    /// Returns the canonical bytes signed by every signer.
    ///
    /// `account_number` must be zero at genesis.
    pub fn sign_bytes(&self, chain_id: &str, account_number: u64, sequence: u64) -> Vec<u8> {
        let doc = StdSignDoc {
            account_number: account_number.to_string(),
            chain_id,
            fee: &self.fee,
            memo: &self.memo,
            msgs: &self.msgs,
            sequence: sequence.to_string(),
        };
        // Going through `Value` sorts every nested object by key.
        serde_json::to_value(&doc)
            .and_then(|value| serde_json::to_vec(&value))
            .unwrap_or_default()
    }
}
