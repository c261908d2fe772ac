use crate::{AnteDecorator, AnteResult, Context, GasMeter, Next, Tx};

/// Installs the gas meter of a native transaction: limited to the declared gas, or infinite when
/// simulating or at genesis.
///
/// Must be the first decorator of a native chain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SetUpContextDecorator;

impl AnteDecorator for SetUpContextDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let gas = tx.as_std()?.fee.gas;
        let meter = if simulate || ctx.block_height() == 0 {
            GasMeter::infinite()
        } else {
            GasMeter::with_limit(gas)
        };
        next.run(ctx.with_gas_meter(meter), tx, simulate)
    }
}
