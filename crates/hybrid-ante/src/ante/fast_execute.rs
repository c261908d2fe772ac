use std::panic::{self, AssertUnwindSafe};

use tracing::warn;

use crate::{AnteDecorator, AnteError, AnteResult, Context, Next, OutOfGasPanic, Tx};

/// Entry gate of the Ethereum chains during block execution.
///
/// Runs the stateless checks, then runs the rest of the chain inside the only recover boundary of
/// the pipeline: a panic carrying an [`OutOfGasPanic`] becomes [`AnteError::OutOfGas`], while any
/// other panic keeps unwinding. Outside `DeliverTx`, or when simulating, it only forwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct FastEthExecuteDecorator;

impl AnteDecorator for FastEthExecuteDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        if ctx.is_check_tx() || simulate {
            return next.run(ctx, tx, simulate);
        }

        tx.as_ethereum()?.validate_basic()?;

        match panic::catch_unwind(AssertUnwindSafe(|| next.run(ctx, tx, simulate))) {
            Ok(result) => result,
            Err(payload) => match payload.downcast::<OutOfGasPanic>() {
                Ok(out_of_gas) => {
                    warn!(location = %out_of_gas.descriptor, "Recovered out of gas panic");
                    Err(AnteError::OutOfGas(out_of_gas.to_string()))
                }
                Err(other) => panic::resume_unwind(other),
            },
        }
    }
}
