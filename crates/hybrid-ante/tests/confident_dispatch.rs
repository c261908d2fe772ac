//! Routing of node-attested envelopes.

use alloy_primitives::{bytes, Address, Bytes, U256};
use hybrid_ante::{
    test_utils::{MemoryKeeper, TestSigner},
    AnteConfig, AnteDispatcher, AnteError, AnteHandler, Coins, Context, Dec, JsonTxDecoder,
    MsgEthereumTx, StdFee, StdMsg, StdSignature, StdTx, Tx, TxDecoder, TxType, WrappedTx,
};

const CHAIN_ID: &str = "exchain-65";
const RECIPIENT: Address = Address::repeat_byte(0x7e);

struct Network {
    alice: TestSigner,
    trusted: TestSigner,
    stranger: TestSigner,
    keeper: MemoryKeeper,
    dispatcher: AnteDispatcher,
}

impl Network {
    fn new() -> Self {
        let alice = TestSigner::from_seed(1);
        let trusted = TestSigner::from_seed(21);
        let stranger = TestSigner::from_seed(22);
        let keeper = MemoryKeeper::new()
            .with_balance(alice.address(), Coins::single("okb", Dec::from_int(5)))
            .with_fee_collector();
        let config = AnteConfig::default().with_trusted_node_key(trusted.pub_key());
        let dispatcher = AnteDispatcher::new(&keeper.keepers(), &config);
        Self { alice, trusted, stranger, keeper, dispatcher }
    }

    fn deliver(&self, wrapped: WrappedTx) -> Result<Context, AnteError> {
        self.dispatcher.handle(Context::new(CHAIN_ID, 10), &mut Tx::Wrapped(wrapped), false)
    }
}

fn unsigned_transfer() -> MsgEthereumTx {
    MsgEthereumTx::new(0, Some(RECIPIENT), U256::ZERO, 21_000, 1, Bytes::new())
}

fn envelope(tx: &Tx, tx_type: TxType) -> WrappedTx {
    WrappedTx::new(JsonTxDecoder.encode(tx).unwrap(), tx_type)
}

#[test]
fn test_trusted_attestation_supplies_the_sender() {
    let net = Network::new();
    let mut wrapped = envelope(&Tx::Ethereum(unsigned_transfer()), TxType::Ethereum);
    wrapped.from = Some(net.alice.address());
    net.trusted.sign_wrapped(&mut wrapped);

    let ctx = net.deliver(wrapped.clone()).unwrap();

    assert_eq!(ctx.from(), Some(net.alice.address()));
    assert_eq!(ctx.tx_bytes(), &wrapped.payload);
    assert_eq!(net.keeper.sequence(net.alice.address()), Some(1));
    assert_eq!(net.keeper.fee_collector_balance("okb"), Dec::from_atto(U256::from(21_000)));
}

#[test]
fn test_trusted_native_envelope_skips_signature_verification() {
    let net = Network::new();
    let std = StdTx {
        msgs: vec![StdMsg::Send {
            from: net.alice.address(),
            to: RECIPIENT,
            amount: Coins::single("okb", Dec::ONE),
        }],
        fee: StdFee { amount: Coins::empty(), gas: 50_000 },
        signatures: vec![StdSignature::default()],
        ..Default::default()
    };
    let mut wrapped = envelope(&Tx::Std(std), TxType::Std);
    net.trusted.sign_wrapped(&mut wrapped);

    let ctx = net.deliver(wrapped).unwrap();

    assert_eq!(ctx.gas_consumed(), 0);
    assert_eq!(net.keeper.sequence(net.alice.address()), Some(1));
}

#[test]
fn test_unknown_node_falls_back_to_the_opposite_chain() {
    let net = Network::new();
    let mut wrapped = envelope(&Tx::Ethereum(unsigned_transfer()), TxType::Ethereum);
    wrapped.from = Some(net.alice.address());
    net.stranger.sign_wrapped(&mut wrapped);

    let err = net.deliver(wrapped).unwrap_err();

    assert_eq!(err, AnteError::UnknownRequest("invalid transaction type: MsgEthereumTx".into()));
    assert_eq!(net.keeper.sequence(net.alice.address()), Some(0));
}

#[test]
fn test_tampered_attestation_is_not_trusted() {
    let net = Network::new();
    let mut wrapped = envelope(&Tx::Ethereum(unsigned_transfer()), TxType::Ethereum);
    net.trusted.sign_wrapped(&mut wrapped);
    wrapped.from = Some(net.alice.address());

    let err = net.deliver(wrapped).unwrap_err();

    assert_eq!(err.code(), 6);
    assert_eq!(net.keeper.sequence(net.alice.address()), Some(0));
}

#[test]
fn test_unsigned_envelope_runs_full_verification() {
    let net = Network::new();
    let mut signed = unsigned_transfer();
    net.alice.sign_eth(&mut signed, Some(65));

    let ctx = net.deliver(envelope(&Tx::Ethereum(signed), TxType::Ethereum)).unwrap();

    assert_eq!(ctx.sig_cache().map(|cache| cache.from), Some(net.alice.address()));
    assert_eq!(net.keeper.sequence(net.alice.address()), Some(1));
}

#[test]
fn test_unattested_sender_is_ignored() {
    let net = Network::new();
    let mut wrapped = envelope(&Tx::Ethereum(unsigned_transfer()), TxType::Ethereum);
    wrapped.from = Some(net.alice.address());

    let err = net.deliver(wrapped).unwrap_err();

    assert_eq!(err.code(), 4);
    assert_eq!(net.keeper.sequence(net.alice.address()), Some(0));
}

#[test]
fn test_undecodable_node_signature_is_rejected() {
    let net = Network::new();
    let mut wrapped = envelope(&Tx::Ethereum(unsigned_transfer()), TxType::Ethereum);
    wrapped.from = Some(net.alice.address());
    net.trusted.sign_wrapped(&mut wrapped);
    wrapped.signature = bytes!("deadbeef");

    let err = net.deliver(wrapped).unwrap_err();

    assert!(matches!(
        err,
        AnteError::UnknownRequest(log) if log.starts_with("failed to verify node signature")
    ));
    assert_eq!(net.keeper.sequence(net.alice.address()), Some(0));
}

#[test]
fn test_trusted_ethereum_envelope_without_sender_is_rejected() {
    let net = Network::new();
    let mut wrapped = envelope(&Tx::Ethereum(unsigned_transfer()), TxType::Ethereum);
    net.trusted.sign_wrapped(&mut wrapped);

    let err = net.deliver(wrapped).unwrap_err();

    assert_eq!(
        err,
        AnteError::UnknownRequest("trusted Ethereum envelope carries no sender".to_owned())
    );
    assert!(net.keeper.fee_collector_balance("okb").is_zero());
}
