use crate::{AnteDecorator, AnteResult, Context, GasMeter, Next, Tx};

/// Runs the rest of an Ethereum chain on an infinite meter, so that account bookkeeping is free
/// until the fee decorator installs the transaction's real budget. During `CheckTx` it also runs
/// the stateless checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct EthSetupContextDecorator;

impl AnteDecorator for EthSetupContextDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let msg = tx.as_ethereum()?;
        if ctx.is_check_tx() {
            msg.validate_basic()?;
        }
        next.run(ctx.with_gas_meter(GasMeter::infinite()), tx, simulate)
    }
}
