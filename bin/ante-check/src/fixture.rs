use std::path::Path;

use alloy_primitives::Address;
use hybrid_ante::{
    parse_chain_id,
    test_utils::{MemoryKeeper, TestSigner},
    AnteConfig, Coins, Context, EvmParams, ExecMode, JsonTxDecoder, Tx, TxDecoder, TxType,
    WrappedTx,
};
use serde::Deserialize;

use crate::{AnteCheckError, Result};

const DEFAULT_CHAIN_ID: &str = "exchain-65";

/// A secp256k1 key named by the byte its secret is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "u8")]
pub struct Seed(u8);

impl TryFrom<u8> for Seed {
    type Error = String;

    fn try_from(seed: u8) -> std::result::Result<Self, Self::Error> {
        if seed == 0 {
            return Err("key seed must be non-zero".to_owned());
        }
        Ok(Self(seed))
    }
}

impl Seed {
    /// Returns the key pair.
    pub fn signer(self) -> TestSigner {
        TestSigner::from_seed(self.0)
    }
}

/// An account present before the transaction runs.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixtureAccount {
    /// The key owning the account.
    #[serde(default)]
    pub seed: Option<Seed>,
    /// The account address, for accounts without a known key.
    #[serde(default)]
    pub address: Option<Address>,
    /// Balance.
    #[serde(default)]
    pub coins: Coins,
    /// Sequence.
    #[serde(default)]
    pub sequence: u64,
}

impl FixtureAccount {
    /// Returns the account address.
    pub fn address(&self) -> Result<Address> {
        match (self.address, self.seed) {
            (Some(address), None) => Ok(address),
            (None, Some(seed)) => Ok(seed.signer().address()),
            _ => Err(invalid("an account needs exactly one of `address` and `seed`")),
        }
    }
}

/// Mempool transactions waiting from one sender.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixturePending {
    /// The sender.
    pub address: Address,
    /// Number of queued transactions.
    pub count: u64,
}

/// Chain state before the transaction runs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureState {
    /// Accounts.
    pub accounts: Vec<FixtureAccount>,
    /// EVM module parameters.
    pub params: EvmParams,
    /// Addresses that may not sign.
    pub blocked: Vec<Address>,
    /// Contracts that may not be called when the parameters enable it.
    pub blocked_contracts: Vec<Address>,
    /// Mempool contents.
    pub pending: Vec<FixturePending>,
}

/// How to relay the transaction in a node envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureWrap {
    /// Declared kind, the kind of the transaction when absent.
    pub tx_type: Option<TxType>,
    /// Sender attested by the node.
    pub from: Option<Seed>,
    /// Node signing the envelope, unsigned when absent.
    pub node: Option<Seed>,
}

/// One replayable run of the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fixture {
    /// Chain id, `<name>-<epoch>`.
    #[serde(default = "default_chain_id")]
    pub chain_id: String,
    /// Block height.
    #[serde(default = "default_height")]
    pub height: u64,
    /// Execution mode.
    #[serde(default)]
    pub mode: ExecMode,
    /// Whether the run is a simulation.
    #[serde(default)]
    pub simulate: bool,
    /// Whether the run replays a transaction for tracing.
    #[serde(default)]
    pub trace: bool,
    /// The node's minimum gas prices.
    #[serde(default)]
    pub min_gas_prices: Coins,
    /// Sender supplied out of band.
    #[serde(default)]
    pub from: Option<Address>,
    /// Node configuration.
    #[serde(default)]
    pub config: AnteConfig,
    /// Nodes whose attestation is trusted, added to the configured keys.
    #[serde(default)]
    pub trusted_nodes: Vec<Seed>,
    /// Chain state.
    #[serde(default)]
    pub state: FixtureState,
    /// The transaction, unsigned.
    pub tx: Tx,
    /// Keys signing the transaction, in signer order.
    #[serde(default)]
    pub signers: Vec<Seed>,
    /// Relays the signed transaction in a node envelope.
    #[serde(default)]
    pub wrap: Option<FixtureWrap>,
}

fn default_chain_id() -> String {
    DEFAULT_CHAIN_ID.to_owned()
}

const fn default_height() -> u64 {
    1
}

fn invalid(reason: impl Into<String>) -> AnteCheckError {
    AnteCheckError::InvalidFixture(reason.into())
}

impl Fixture {
    /// Reads a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| AnteCheckError::FileRead { path: path.to_path_buf(), source })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Builds the keeper holding the fixture's state. The fee collector always exists.
    pub fn keeper(&self) -> Result<MemoryKeeper> {
        let mut keeper = MemoryKeeper::new().with_fee_collector().with_params(self.state.params);
        for account in &self.state.accounts {
            let address = account.address()?;
            keeper.set_balance(address, account.coins.clone());
            keeper.set_sequence(address, account.sequence);
        }
        for address in &self.state.blocked {
            keeper = keeper.with_blocked(*address);
        }
        for address in &self.state.blocked_contracts {
            keeper = keeper.with_blocked_contract(*address);
        }
        for pending in &self.state.pending {
            keeper = keeper.with_pending(pending.address, pending.count);
        }
        Ok(keeper)
    }

    /// Returns the node configuration with the trusted nodes added.
    pub fn config(&self) -> AnteConfig {
        self.trusted_nodes.iter().fold(self.config.clone(), |config, node| {
            config.with_trusted_node_key(node.signer().pub_key())
        })
    }

    /// Returns the context the pipeline starts from.
    pub fn context(&self) -> Context {
        Context::new(&self.chain_id, self.height)
            .with_mode(self.mode)
            .with_trace_tx(self.trace)
            .with_min_gas_prices(self.min_gas_prices.clone())
            .with_from(self.from)
    }

    /// Signs the transaction against the state of `keeper`, then wraps it if asked to.
    pub fn build_tx(&self, keeper: &MemoryKeeper) -> Result<Tx> {
        let mut tx = self.tx.clone();
        match &mut tx {
            Tx::Ethereum(msg) => match self.signers.as_slice() {
                [] => {}
                [seed] => seed.signer().sign_eth(msg, Some(parse_chain_id(&self.chain_id)?)),
                _ => return Err(invalid("an Ethereum transaction has a single signer")),
            },
            Tx::Std(std) => {
                for seed in &self.signers {
                    let signer = seed.signer();
                    let account = keeper.account(signer.address()).ok_or_else(|| {
                        invalid(format!("signer {} has no account", signer.address()))
                    })?;
                    let number = if self.height == 0 { 0 } else { account.account_number };
                    signer.sign_std(std, &self.chain_id, number, account.sequence);
                }
            }
            Tx::Wrapped(_) => return Err(invalid("use `wrap` to relay a transaction")),
        }

        let Some(wrap) = &self.wrap else { return Ok(tx) };
        let tx_type = wrap
            .tx_type
            .or_else(|| tx.tx_type())
            .ok_or_else(|| invalid("cannot infer the declared kind"))?;
        let mut wrapped = WrappedTx::new(JsonTxDecoder.encode(&tx)?, tx_type);
        wrapped.from = wrap.from.map(|seed| seed.signer().address());
        if let Some(node) = wrap.node {
            node.signer().sign_wrapped(&mut wrapped);
        }
        Ok(Tx::Wrapped(wrapped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_fixture_uses_defaults() {
        let fixture: Fixture = serde_json::from_str(
            r#"{"tx":{"type":"ethereum","value":{"data":{"gas_limit":21000,"gas_price":1}}}}"#,
        )
        .unwrap();
        assert_eq!(fixture.chain_id, "exchain-65");
        assert_eq!(fixture.height, 1);
        assert_eq!(fixture.mode, ExecMode::Deliver);
        assert!(fixture.wrap.is_none());
    }

    #[test]
    fn test_zero_seed_is_refused() {
        let err = serde_json::from_str::<Fixture>(
            r#"{"tx":{"type":"std","value":{}},"signers":[0]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("key seed must be non-zero"));
    }

    #[test]
    fn test_account_needs_one_identity() {
        let account = FixtureAccount {
            seed: None,
            address: None,
            coins: Coins::empty(),
            sequence: 0,
        };
        assert!(matches!(account.address(), Err(AnteCheckError::InvalidFixture(_))));
    }

    #[test]
    fn test_wrap_infers_declared_kind() {
        let fixture: Fixture = serde_json::from_str(
            r#"{
                "tx": {"type": "std", "value": {}},
                "wrap": {"node": 21}
            }"#,
        )
        .unwrap();
        let tx = fixture.build_tx(&fixture.keeper().unwrap()).unwrap();
        let Tx::Wrapped(wrapped) = tx else { panic!("expected an envelope") };
        assert_eq!(wrapped.tx_type, TxType::Std);
        assert!(wrapped.is_signed());
        assert_eq!(JsonTxDecoder.decode(&wrapped.payload).unwrap(), fixture.tx);
    }
}
