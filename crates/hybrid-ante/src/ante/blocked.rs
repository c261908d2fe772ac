use std::sync::Arc;

use tracing::debug;

use crate::{AnteDecorator, AnteError, AnteResult, Context, EvmKeeper, Next, Tx};

/// Rejects a transaction if any of its signers is on the blocked-address list, or, when the EVM
/// parameters enable it, if an Ethereum call targets a blocked contract.
///
/// The lookups charge a private infinite meter; the context's meter is left as it was on every
/// path.
#[derive(Debug, Clone)]
pub struct AccountBlockedVerificationDecorator {
    evm: Arc<dyn EvmKeeper>,
}

impl AccountBlockedVerificationDecorator {
    /// Creates the decorator.
    pub const fn new(evm: Arc<dyn EvmKeeper>) -> Self {
        Self { evm }
    }
}

impl AnteDecorator for AccountBlockedVerificationDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let (signers, recipient) = match tx {
            Tx::Std(std) => (std.signers(), None),
            Tx::Ethereum(msg) => {
                (msg.resolve_sender(ctx.from()).into_iter().collect(), msg.data.recipient)
            }
            Tx::Wrapped(_) => return Err(AnteError::invalid_tx_type(tx.type_name())),
        };

        ctx.run_unmetered(|scoped| {
            if let Some(signer) =
                signers.iter().find(|signer| self.evm.is_address_blocked(scoped, **signer))
            {
                debug!(address = %signer, "Rejecting blocked signer");
                return Err(AnteError::UnknownRequest(format!(
                    "address: {signer} has been blocked"
                )));
            }
            if let Some(contract) = recipient {
                if self.evm.params(scoped).enable_contract_blocked_list &&
                    self.evm.is_contract_in_blocked_list(scoped, contract)
                {
                    return Err(AnteError::UnknownRequest(format!(
                        "contract: {contract} has been blocked"
                    )));
                }
            }
            Ok(())
        })?;

        next.run(ctx, tx, simulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{single_decorator_chain, MemoryKeeper},
        AnteHandler, EvmParams, GasMeter, MsgEthereumTx,
    };
    use alloy_primitives::{Address, Bytes, U256};

    const SENDER: Address = Address::repeat_byte(0x01);
    const CONTRACT: Address = Address::repeat_byte(0xcc);

    fn blocked_chain(keeper: &MemoryKeeper) -> crate::ChainedAnteHandler {
        single_decorator_chain(AccountBlockedVerificationDecorator::new(Arc::new(keeper.clone())))
    }

    fn call_contract() -> Tx {
        let mut msg =
            MsgEthereumTx::new(0, Some(CONTRACT), U256::ZERO, 21_000, 1, Bytes::new());
        msg.resolve_sender(Some(SENDER));
        Tx::Ethereum(msg)
    }

    #[test]
    fn test_blocked_contract_only_when_enabled() {
        let keeper = MemoryKeeper::new().with_blocked_contract(CONTRACT);
        let ctx = Context::new("exchain-65", 1);

        blocked_chain(&keeper).handle(ctx.clone(), &mut call_contract(), false).unwrap();

        let keeper = keeper.with_params(EvmParams {
            enable_contract_blocked_list: true,
            ..Default::default()
        });
        let err = blocked_chain(&keeper).handle(ctx, &mut call_contract(), false).unwrap_err();
        assert!(err.to_string().contains("has been blocked"));
    }

    #[test]
    fn test_lookup_is_not_charged() {
        let keeper = MemoryKeeper::new().with_blocked(SENDER);
        let ctx = Context::new("exchain-65", 1).with_gas_meter(GasMeter::with_limit(10));

        assert!(blocked_chain(&keeper).handle(ctx.clone(), &mut call_contract(), false).is_err());
        assert_eq!(ctx.gas_consumed(), 0);
    }
}
