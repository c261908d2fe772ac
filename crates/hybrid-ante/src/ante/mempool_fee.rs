//! Admission floors on the fee, enforced only while the node decides whether to keep a
//! transaction in its mempool.
//!
//! Both decorators compare in [`Dec`], so a wei price maps exactly onto the bond denomination and
//! no rounding happens before the comparison. A node that configures no minimum, or a zero one,
//! accepts any fee.

use tracing::trace;

use crate::{AnteDecorator, AnteError, AnteResult, Coins, Context, Dec, DecCoin, Next, Tx};

/// Rejects an Ethereum transaction whose `price * gas` is below the node's minimum gas price for
/// the bond denomination, times the declared gas.
#[derive(Debug, Clone)]
pub struct EthMempoolFeeDecorator {
    bond_denom: String,
}

impl EthMempoolFeeDecorator {
    /// Creates the decorator for fees paid in `bond_denom`.
    pub fn new(bond_denom: impl Into<String>) -> Self {
        Self { bond_denom: bond_denom.into() }
    }
}

impl AnteDecorator for EthMempoolFeeDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let msg = tx.as_ethereum()?;
        let min_gas_price = ctx.min_gas_prices().amount_of(&self.bond_denom);
        if !ctx.is_check_tx() || simulate || min_gas_price.is_zero() {
            trace!(check_tx = ctx.is_check_tx(), simulate, "Skipping mempool fee check");
            return next.run(ctx, tx, simulate);
        }

        let denom = &self.bond_denom;
        let required = min_gas_price.checked_mul_int(msg.gas()).ok_or_else(|| {
            AnteError::InsufficientFee(format!("required fee overflows: {min_gas_price}{denom}"))
        })?;
        let fee = Dec::from_atto(msg.fee());
        if fee < required {
            return Err(AnteError::InsufficientFee(format!(
                "insufficient fee, got: {fee}{denom} required: {required}{denom}"
            )));
        }

        next.run(ctx, tx, simulate)
    }
}

/// Rejects a native transaction whose fee does not cover `ceil(min_gas_price * gas)` in at least
/// one of the denominations the node prices.
#[derive(Debug, Clone, Copy, Default)]
pub struct MempoolFeeDecorator;

impl AnteDecorator for MempoolFeeDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let std = tx.as_std()?;
        let min_gas_prices = ctx.min_gas_prices();
        if !ctx.is_check_tx() || simulate || min_gas_prices.is_zero() {
            return next.run(ctx, tx, simulate);
        }

        let gas = std.fee.gas;
        let required = min_gas_prices
            .iter()
            .map(|price| {
                price
                    .amount
                    .checked_mul_int(gas)
                    .and_then(Dec::checked_ceil)
                    .map(|amount| DecCoin::new(price.denom.clone(), amount))
                    .ok_or_else(|| {
                        AnteError::InsufficientFee(format!("required fee overflows: {price}"))
                    })
            })
            .collect::<AnteResult<Vec<_>>>()
            .and_then(Coins::new)?;

        if !std.fee.amount.is_any_gte(&required) {
            return Err(AnteError::InsufficientFee(format!(
                "insufficient fees; got: {} required: {required}",
                std.fee.amount
            )));
        }

        next.run(ctx, tx, simulate)
    }
}
