use tracing::debug;

use super::require_sender;
use crate::{AnteDecorator, AnteError, AnteResult, Context, Dec, Keepers, Next, Tx};

/// Admission-time account checks for an Ethereum transaction.
///
/// Creates the sender's account on first sight, refuses a non-zero account number at genesis,
/// and refuses a sender whose bond-denomination balance cannot cover `price * gas + value`.
/// Runs only during `CheckTx` and never when simulating.
#[derive(Debug, Clone)]
pub struct AccountVerificationDecorator {
    keepers: Keepers,
    bond_denom: String,
}

impl AccountVerificationDecorator {
    /// Creates the decorator for balances held in `bond_denom`.
    pub fn new(keepers: Keepers, bond_denom: impl Into<String>) -> Self {
        Self { keepers, bond_denom: bond_denom.into() }
    }
}

impl AnteDecorator for AccountVerificationDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        if !ctx.is_check_tx() || simulate {
            return next.run(ctx, tx, simulate);
        }

        let msg = tx.as_ethereum_mut()?;
        let address = require_sender(&ctx, msg)?;

        let account = match self.keepers.account.get_account(&ctx, address) {
            Some(account) => account,
            None => {
                let account = self.keepers.account.new_account_with_address(&ctx, address);
                debug!(%address, number = account.account_number, "Creating account");
                self.keepers.account.set_account(&ctx, account.clone());
                account
            }
        };

        if ctx.block_height() == 0 && account.account_number != 0 {
            return Err(AnteError::InvalidSequence(format!(
                "invalid account number for height zero (got {})",
                account.account_number
            )));
        }

        let denom = &self.bond_denom;
        let balance = account.balance(denom);
        let cost = Dec::from_atto(msg.cost());
        if balance < cost {
            return Err(AnteError::InsufficientFunds(format!(
                "sender balance < tx gas cost ({balance}{denom} < {cost}{denom})"
            )));
        }

        next.run(ctx, tx, simulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{single_decorator_chain, MemoryKeeper},
        Account, AnteHandler, Coins, MsgEthereumTx,
    };
    use alloy_primitives::{Address, Bytes, U256};

    const SENDER: Address = Address::repeat_byte(0x5e);

    fn transfer(value: u64) -> Tx {
        let mut msg = MsgEthereumTx::new(
            0,
            Some(Address::repeat_byte(2)),
            U256::from(value),
            21_000,
            1,
            Bytes::new(),
        );
        msg.resolve_sender(Some(SENDER));
        Tx::Ethereum(msg)
    }

    fn check_ctx(height: u64) -> Context {
        Context::new("exchain-65", height).with_check_tx(true)
    }

    #[test]
    fn test_creates_missing_account_then_checks_balance() {
        let keeper = MemoryKeeper::new();
        let chain =
            single_decorator_chain(AccountVerificationDecorator::new(keeper.keepers(), "okb"));

        let err = chain.handle(check_ctx(3), &mut transfer(0), false).unwrap_err();

        assert_eq!(err.code(), 5);
        assert!(err.to_string().contains(
            "(0.000000000000000000okb < 0.000000000000021000okb)"
        ));
        assert_eq!(keeper.sequence(SENDER), Some(0));
    }

    #[test]
    fn test_balance_must_cover_value_too() {
        let balance = Coins::single("okb", Dec::from_atto(U256::from(21_100)));
        let keeper = MemoryKeeper::new().with_balance(SENDER, balance);
        let chain =
            single_decorator_chain(AccountVerificationDecorator::new(keeper.keepers(), "okb"));

        chain.handle(check_ctx(3), &mut transfer(100), false).unwrap();
        assert!(chain.handle(check_ctx(3), &mut transfer(101), false).is_err());
    }

    #[test]
    fn test_genesis_requires_account_number_zero() {
        let keeper = MemoryKeeper::new().with_account(Account::new(SENDER, 4));
        let chain =
            single_decorator_chain(AccountVerificationDecorator::new(keeper.keepers(), "okb"));

        let err = chain.handle(check_ctx(0), &mut transfer(0), false).unwrap_err();
        assert_eq!(
            err,
            AnteError::InvalidSequence("invalid account number for height zero (got 4)".into())
        );
    }

    #[test]
    fn test_only_runs_during_check_tx() {
        let keeper = MemoryKeeper::new();
        let chain =
            single_decorator_chain(AccountVerificationDecorator::new(keeper.keepers(), "okb"));

        chain.handle(Context::new("exchain-65", 3), &mut transfer(0), false).unwrap();
        chain.handle(check_ctx(3), &mut transfer(0), true).unwrap();
        assert!(keeper.account(SENDER).is_none());
    }
}
