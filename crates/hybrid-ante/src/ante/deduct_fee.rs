use crate::{deduct_fees, AnteDecorator, AnteError, AnteResult, Context, Keepers, Next, Tx};

/// Moves the fee of a native transaction from its first signer to the fee collector.
#[derive(Debug, Clone)]
pub struct DeductFeeDecorator {
    keepers: Keepers,
}

impl DeductFeeDecorator {
    /// Creates the decorator.
    pub const fn new(keepers: Keepers) -> Self {
        Self { keepers }
    }
}

impl AnteDecorator for DeductFeeDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let std = tx.as_std()?;
        let payer = std.fee_payer().ok_or_else(|| {
            AnteError::UnknownRequest("no messages included in transaction".to_owned())
        })?;

        ctx.run_unmetered(|scoped| {
            let mut account = self.keepers.account.get_account(scoped, payer).ok_or_else(|| {
                AnteError::UnknownAddress(format!("fee payer address: {payer} does not exist"))
            })?;
            if std.fee.amount.is_zero() {
                return Ok(());
            }
            deduct_fees(scoped, &self.keepers, &mut account, &std.fee.amount)
        })?;

        next.run(ctx, tx, simulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{single_decorator_chain, MemoryKeeper},
        AnteHandler, Coins, Dec, GasMeter, StdFee, StdMsg, StdTx,
    };
    use alloy_primitives::Address;

    const PAYER: Address = Address::repeat_byte(0xa1);

    fn send_tx(fee: u64) -> Tx {
        Tx::Std(StdTx {
            msgs: vec![StdMsg::Send {
                from: PAYER,
                to: Address::repeat_byte(0xb2),
                amount: Coins::single("okb", Dec::ONE),
            }],
            fee: StdFee { amount: Coins::single("okb", Dec::from_int(fee)), gas: 200_000 },
            ..Default::default()
        })
    }

    #[test]
    fn test_first_signer_pays_without_gas_charge() {
        let keeper = MemoryKeeper::new()
            .with_balance(PAYER, Coins::single("okb", Dec::from_int(10)))
            .with_fee_collector();
        let chain = single_decorator_chain(DeductFeeDecorator::new(keeper.keepers()));
        let ctx = Context::new("exchain-65", 2).with_gas_meter(GasMeter::with_limit(100));

        let out = chain.handle(ctx, &mut send_tx(3), false).unwrap();

        assert_eq!(out.gas_consumed(), 0);
        assert_eq!(keeper.balance(PAYER, "okb"), Dec::from_int(7));
        assert_eq!(keeper.fee_collector_balance("okb"), Dec::from_int(3));
    }

    #[test]
    fn test_missing_payer() {
        let keeper = MemoryKeeper::new().with_fee_collector();
        let chain = single_decorator_chain(DeductFeeDecorator::new(keeper.keepers()));
        let err = chain.handle(Context::new("exchain-65", 2), &mut send_tx(0), false).unwrap_err();
        assert_eq!(
            err,
            AnteError::UnknownAddress(format!("fee payer address: {PAYER} does not exist"))
        );
    }

    #[test]
    fn test_zero_fee_skips_collector() {
        let keeper = MemoryKeeper::new().with_balance(PAYER, Coins::single("okb", Dec::ONE));
        let chain = single_decorator_chain(DeductFeeDecorator::new(keeper.keepers()));
        chain.handle(Context::new("exchain-65", 2), &mut send_tx(0), false).unwrap();
        assert_eq!(keeper.balance(PAYER, "okb"), Dec::ONE);
    }
}
