use tracing::trace;

use crate::{constants::FEE_COLLECTOR_NAME, Account, AnteError, AnteResult, Coins, Context, Keepers};

/// Moves `fees` from `payer` to the fee-collector module account.
///
/// Every check runs before any write, so on error neither account is touched. On success both
/// accounts are stored and `payer` holds its new balance.
pub fn deduct_fees(
    ctx: &Context,
    keepers: &Keepers,
    payer: &mut Account,
    fees: &Coins,
) -> AnteResult<()> {
    if !fees.is_valid() {
        return Err(AnteError::InsufficientFee(format!("invalid fee amount: {fees}")));
    }

    let remaining = payer.coins.checked_sub(fees).ok_or_else(|| {
        AnteError::InsufficientFunds(format!(
            "insufficient funds to pay for fees; {} < {fees}",
            payer.coins
        ))
    })?;

    let mut collector =
        keepers.supply.get_module_account(ctx, FEE_COLLECTOR_NAME).ok_or_else(|| {
            AnteError::UnknownAddress(format!(
                "module account {FEE_COLLECTOR_NAME} does not exist"
            ))
        })?;
    let collected = collector
        .coins
        .checked_add(fees)
        .filter(Coins::is_valid)
        .ok_or_else(|| AnteError::InvalidCoins(format!("{} + {fees}", collector.coins)))?;

    payer.coins = remaining;
    collector.coins = collected;
    keepers.account.set_account(ctx, payer.clone());
    keepers.account.set_account(ctx, collector);
    trace!(payer = %payer.address, fees = %fees, "Fees deducted");
    Ok(())
}
