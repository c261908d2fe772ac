use std::sync::Arc;

use crate::{AnteDecorator, AnteError, AnteResult, Context, EvmKeeper, Next, Tx};

/// Rejects an Ethereum transaction declaring more gas than `max_gas_limit_per_tx`.
///
/// The parameter read is not charged to the transaction.
#[derive(Debug, Clone)]
pub struct GasLimitDecorator {
    evm: Arc<dyn EvmKeeper>,
}

impl GasLimitDecorator {
    /// Creates the decorator.
    pub const fn new(evm: Arc<dyn EvmKeeper>) -> Self {
        Self { evm }
    }
}

impl AnteDecorator for GasLimitDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let gas = tx.as_ethereum()?.gas();
        let max = ctx.run_unmetered(|scoped| self.evm.params(scoped).max_gas_limit_per_tx);
        if gas > max {
            return Err(AnteError::TxTooLarge(format!("gas limit {gas} exceeds the maximum {max}")));
        }
        next.run(ctx, tx, simulate)
    }
}
