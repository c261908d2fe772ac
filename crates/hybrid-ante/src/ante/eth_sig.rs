use tracing::debug;

use crate::{parse_chain_id, AnteConfig, AnteDecorator, AnteResult, Context, Next, Tx};

/// Recovers the sender of an Ethereum transaction from its signature and caches it on both the
/// message and the context.
///
/// Skipped when simulating: the caller then supplies the sender through [`Context::from`].
#[derive(Debug, Clone, Default)]
pub struct EthSigVerificationDecorator {
    config: AnteConfig,
}

impl EthSigVerificationDecorator {
    /// Creates the decorator. Unprotected signatures are refused past the mercury height of
    /// `config`.
    pub fn new(config: &AnteConfig) -> Self {
        Self { config: config.clone() }
    }
}

impl AnteDecorator for EthSigVerificationDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        if simulate {
            return next.run(ctx, tx, simulate);
        }

        let msg = tx.as_ethereum_mut()?;
        let chain_id = parse_chain_id(ctx.chain_id())?;
        let from = msg.verify_sig(chain_id, self.config.is_past_mercury(ctx.block_height()))?;
        debug!(sender = %from, chain_id, "Recovered sender");

        let ctx = ctx.with_sig_cache(msg.sig_cache());
        next.run(ctx, tx, simulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{single_decorator_chain, TestSigner},
        AnteHandler, MsgEthereumTx,
    };
    use alloy_primitives::{Address, Bytes, U256};

    fn signed(signer: &TestSigner, chain_id: Option<u64>) -> Tx {
        let recipient = Some(Address::repeat_byte(9));
        let mut msg = MsgEthereumTx::new(3, recipient, U256::from(5), 21_000, 1, Bytes::new());
        signer.sign_eth(&mut msg, chain_id);
        Tx::Ethereum(msg)
    }

    #[test]
    fn test_caches_recovered_sender() {
        let signer = TestSigner::from_seed(7);
        let chain = single_decorator_chain(EthSigVerificationDecorator::default());
        let mut tx = signed(&signer, Some(65));

        let ctx = chain.handle(Context::new("exchain-65", 10), &mut tx, false).unwrap();

        assert_eq!(ctx.sig_cache().map(|cache| cache.from), Some(signer.address()));
        assert_eq!(tx.as_ethereum().unwrap().from(), Some(signer.address()));
    }

    #[test]
    fn test_wrong_chain_id_is_unauthorized() {
        let signer = TestSigner::from_seed(7);
        let chain = single_decorator_chain(EthSigVerificationDecorator::default());
        let err = chain
            .handle(Context::new("exchain-66", 10), &mut signed(&signer, Some(65)), false)
            .unwrap_err();
        assert_eq!(err.code(), 4);
    }

    #[test]
    fn test_homestead_refused_past_mercury() {
        let signer = TestSigner::from_seed(7);
        let config = AnteConfig { mercury_height: 100, ..Default::default() };
        let chain = single_decorator_chain(EthSigVerificationDecorator::new(&config));

        chain.handle(Context::new("exchain-65", 100), &mut signed(&signer, None), false).unwrap();
        let err = chain
            .handle(Context::new("exchain-65", 101), &mut signed(&signer, None), false)
            .unwrap_err();
        assert!(err.to_string().contains("homestead"));
    }

    #[test]
    fn test_skipped_when_simulating() {
        let chain = single_decorator_chain(EthSigVerificationDecorator::default());
        let mut unsigned = Tx::Ethereum(MsgEthereumTx::default());
        let ctx = chain.handle(Context::new("not-a-chain-id", 1), &mut unsigned, true).unwrap();
        assert!(ctx.sig_cache().is_none());
    }
}
