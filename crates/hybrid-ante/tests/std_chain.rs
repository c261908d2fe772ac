//! End-to-end runs of native transactions through the dispatcher.

use alloy_primitives::{Address, Bytes, U256};
use hybrid_ante::{
    constants::native::SIG_VERIFY_COST_SECP256K1,
    test_utils::{MemoryKeeper, TestSigner},
    AnteConfig, AnteDispatcher, AnteError, AnteHandler, Coins, Context, Dec, ExecMode, StdFee,
    StdMsg, StdSignature, StdTx, Tx,
};

const CHAIN_ID: &str = "exchain-65";
const SINK: Address = Address::repeat_byte(0xee);

fn okb(amount: u64) -> Coins {
    Coins::single("okb", Dec::from_int(amount))
}

fn send(from: &TestSigner) -> StdMsg {
    StdMsg::Send { from: from.address(), to: SINK, amount: okb(1) }
}

/// Alice pays a 3 okb fee for a transaction carrying one message from each of them.
fn joint_send(alice: &TestSigner, bob: &TestSigner) -> StdTx {
    StdTx {
        msgs: vec![send(alice), send(bob)],
        fee: StdFee { amount: okb(3), gas: 10_000 },
        memo: "joint".to_owned(),
        ..Default::default()
    }
}

struct Fixture {
    alice: TestSigner,
    bob: TestSigner,
    keeper: MemoryKeeper,
    dispatcher: AnteDispatcher,
}

impl Fixture {
    fn new() -> Self {
        let alice = TestSigner::from_seed(1);
        let bob = TestSigner::from_seed(2);
        let keeper = MemoryKeeper::new()
            .with_balance(alice.address(), okb(10))
            .with_balance(bob.address(), okb(10))
            .with_sequence(bob.address(), 4)
            .with_fee_collector();
        Self::with_keeper(alice, bob, keeper)
    }

    fn with_keeper(alice: TestSigner, bob: TestSigner, keeper: MemoryKeeper) -> Self {
        let dispatcher = AnteDispatcher::new(&keeper.keepers(), &AnteConfig::default());
        Self { alice, bob, keeper, dispatcher }
    }

    fn signed(&self, chain_id: &str) -> StdTx {
        let mut std = joint_send(&self.alice, &self.bob);
        for (signer, sequence) in [(&self.alice, 0), (&self.bob, 4)] {
            let number = self.keeper.account(signer.address()).unwrap().account_number;
            signer.sign_std(&mut std, chain_id, number, sequence);
        }
        std
    }
}

#[test]
fn test_multi_signer_deliver() {
    let fx = Fixture::new();
    let mut tx = Tx::Std(fx.signed(CHAIN_ID));

    let ctx = fx.dispatcher.handle(Context::new(CHAIN_ID, 10), &mut tx, false).unwrap();

    // Only signature checks reach the transaction's meter; store access is free.
    assert_eq!(ctx.gas_consumed(), 2 * SIG_VERIFY_COST_SECP256K1);
    assert_eq!(ctx.gas_meter().borrow().limit(), Some(10_000));
    assert_eq!(fx.keeper.balance(fx.alice.address(), "okb"), Dec::from_int(7));
    assert_eq!(fx.keeper.balance(fx.bob.address(), "okb"), Dec::from_int(10));
    assert_eq!(fx.keeper.fee_collector_balance("okb"), Dec::from_int(3));
    assert_eq!(fx.keeper.sequence(fx.alice.address()), Some(1));
    assert_eq!(fx.keeper.sequence(fx.bob.address()), Some(5));
    assert_eq!(fx.keeper.account(fx.bob.address()).unwrap().pub_key, Some(fx.bob.pub_key()));
}

#[test]
fn test_blocked_co_signer_rejects_without_mutation() {
    let alice = TestSigner::from_seed(1);
    let bob = TestSigner::from_seed(2);
    let keeper = MemoryKeeper::new()
        .with_balance(alice.address(), okb(10))
        .with_balance(bob.address(), okb(10))
        .with_sequence(bob.address(), 4)
        .with_fee_collector()
        .with_blocked(bob.address());
    let fx = Fixture::with_keeper(alice, bob, keeper);
    let mut tx = Tx::Std(fx.signed(CHAIN_ID));
    let ctx = Context::new(CHAIN_ID, 10);

    let err = fx.dispatcher.handle(ctx.clone(), &mut tx, false).unwrap_err();

    let blocked = fx.bob.address();
    assert_eq!(err, AnteError::UnknownRequest(format!("address: {blocked} has been blocked")));
    assert_eq!(ctx.gas_consumed(), 0);
    assert_eq!(fx.keeper.balance(fx.alice.address(), "okb"), Dec::from_int(10));
    assert!(fx.keeper.fee_collector_balance("okb").is_zero());
    assert_eq!(fx.keeper.sequence(fx.alice.address()), Some(0));
    assert_eq!(fx.keeper.sequence(fx.bob.address()), Some(4));
    assert!(fx.keeper.account(fx.alice.address()).unwrap().pub_key.is_none());
}

#[test]
fn test_signature_for_another_chain() {
    let fx = Fixture::new();
    let mut tx = Tx::Std(fx.signed("exchain-66"));

    let err = fx.dispatcher.handle(Context::new(CHAIN_ID, 10), &mut tx, false).unwrap_err();

    assert_eq!(err.code(), 4);
    assert_eq!(fx.keeper.sequence(fx.bob.address()), Some(4));
}

#[test]
fn test_check_tx_fee_floor() {
    let fx = Fixture::new();
    // 0.001okb per unit of gas over 10000 gas requires 10okb.
    let price = Coins::single("okb", Dec::from_atto(U256::from(1_000_000_000_000_000u64)));
    let ctx = Context::new(CHAIN_ID, 10).with_mode(ExecMode::Check).with_min_gas_prices(price);

    let err = fx.dispatcher.handle(ctx, &mut Tx::Std(fx.signed(CHAIN_ID)), false).unwrap_err();

    assert_eq!(err.code(), 13);
    assert_eq!(fx.keeper.balance(fx.alice.address(), "okb"), Dec::from_int(10));
}

#[test]
fn test_simulate_skips_signature_verification() {
    let fx = Fixture::new();
    let mut std = joint_send(&fx.alice, &fx.bob);
    std.signatures = vec![StdSignature::default(); 2];

    let ctx = fx.dispatcher.handle(Context::new(CHAIN_ID, 10), &mut Tx::Std(std), true).unwrap();

    assert!(ctx.gas_meter().borrow().is_infinite());
    assert_eq!(ctx.gas_consumed(), 0);
    assert_eq!(fx.keeper.sequence(fx.alice.address()), Some(1));
    assert!(fx.keeper.account(fx.alice.address()).unwrap().pub_key.is_none());
}

#[test]
fn test_ethermint_sender_account_is_created() {
    let carol = TestSigner::from_seed(3);
    let keeper = MemoryKeeper::new();
    let dispatcher = AnteDispatcher::new(&keeper.keepers(), &AnteConfig::default());
    let mut std = StdTx {
        msgs: vec![StdMsg::Ethermint {
            nonce: 0,
            gas_price: 1,
            gas_limit: 21_000,
            recipient: Some(SINK),
            amount: U256::ZERO,
            payload: Bytes::new(),
            from: carol.address(),
        }],
        fee: StdFee { amount: Coins::empty(), gas: 5_000 },
        ..Default::default()
    };
    // The first account the keeper creates gets number one.
    carol.sign_std(&mut std, CHAIN_ID, 1, 0);

    dispatcher.handle(Context::new(CHAIN_ID, 10), &mut Tx::Std(std), false).unwrap();

    let account = keeper.account(carol.address()).unwrap();
    assert_eq!(account.account_number, 1);
    assert_eq!(account.sequence, 1);
    assert_eq!(account.pub_key, Some(carol.pub_key()));
}
