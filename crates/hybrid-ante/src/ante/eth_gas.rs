use super::require_sender;
use crate::{
    deduct_fees, AnteDecorator, AnteError, AnteResult, Coins, Context, Dec, GasMeter, Keepers,
    Next, Tx,
};

/// Charges the sender `price * gas` up front and installs the gas meter message execution runs
/// against.
///
/// During `CheckTx` a gas limit below the intrinsic cost of the transaction is refused. The fee
/// moves to the fee collector. A simulation charges nothing. The installed meter is limited to
/// the declared gas, or infinite when simulating or at genesis.
#[derive(Debug, Clone)]
pub struct EthGasConsumeDecorator {
    keepers: Keepers,
    bond_denom: String,
}

impl EthGasConsumeDecorator {
    /// Creates the decorator for fees paid in `bond_denom`.
    pub fn new(keepers: Keepers, bond_denom: impl Into<String>) -> Self {
        Self { keepers, bond_denom: bond_denom.into() }
    }
}

impl AnteDecorator for EthGasConsumeDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let msg = tx.as_ethereum_mut()?;
        let gas_limit = msg.gas();
        let intrinsic_gas = msg.intrinsic_gas()?;
        if ctx.is_check_tx() && gas_limit < intrinsic_gas {
            return Err(AnteError::OutOfGas(format!(
                "intrinsic gas too low: {gas_limit} < {intrinsic_gas}"
            )));
        }

        if !simulate {
            let address = require_sender(&ctx, msg)?;
            let mut sender =
                self.keepers.account.get_account(&ctx, address).ok_or_else(|| {
                    AnteError::UnknownAddress(format!("sender account {address} is nil"))
                })?;
            if gas_limit != 0 {
                let fee = Coins::single(&self.bond_denom, Dec::from_atto(msg.fee()));
                deduct_fees(&ctx, &self.keepers, &mut sender, &fee)?;
            }
        }

        let meter = if simulate || ctx.block_height() == 0 {
            GasMeter::infinite()
        } else {
            GasMeter::with_limit(gas_limit)
        };
        next.run(ctx.with_gas_meter(meter), tx, simulate)
    }
}
