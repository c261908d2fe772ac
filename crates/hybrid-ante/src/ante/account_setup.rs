use tracing::debug;

use crate::{AnteDecorator, AnteError, AnteResult, Context, Keepers, Next, StdMsg, Tx};

/// Creates a zero-balance account for the sender of every legacy EVM message of a native
/// transaction that has none yet.
#[derive(Debug, Clone)]
pub struct AccountSetupDecorator {
    keepers: Keepers,
}

impl AccountSetupDecorator {
    /// Creates the decorator.
    pub const fn new(keepers: Keepers) -> Self {
        Self { keepers }
    }
}

impl AnteDecorator for AccountSetupDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let std = tx.as_std()?;
        if std.msgs.is_empty() {
            return Err(AnteError::UnknownRequest(
                "no messages included in transaction".to_owned(),
            ));
        }

        ctx.run_unmetered(|scoped| {
            for msg in &std.msgs {
                let StdMsg::Ethermint { from, .. } = msg else { continue };
                if self.keepers.account.get_account(scoped, *from).is_none() {
                    let account = self.keepers.account.new_account_with_address(scoped, *from);
                    debug!(address = %from, number = account.account_number, "Creating account");
                    self.keepers.account.set_account(scoped, account);
                }
            }
        });

        next.run(ctx, tx, simulate)
    }
}
