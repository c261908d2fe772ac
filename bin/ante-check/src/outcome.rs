use hybrid_ante::{Account, AnteDispatcher, AnteHandler, AnteResult, Context};
use serde::Serialize;
use tracing::debug;

use crate::{Fixture, Result};

/// What the pipeline made of a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Whether every decorator let the transaction through.
    pub accepted: bool,
    /// Code of the rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    /// Codespace of the rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codespace: Option<&'static str>,
    /// Log of the rejection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<String>,
    /// Gas charged to the transaction's meter, for an accepted transaction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_consumed: Option<u64>,
    /// Limit of the transaction's meter, absent when infinite.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,
    /// Sequence recorded by the nonce check.
    pub account_nonce: u64,
    /// The fixture's accounts after the run.
    pub accounts: Vec<Account>,
}

impl Outcome {
    /// Summarises the result of the pipeline.
    pub fn new(result: AnteResult<Context>, accounts: Vec<Account>) -> Self {
        match result {
            Ok(ctx) => Self {
                accepted: true,
                code: None,
                codespace: None,
                log: None,
                gas_consumed: Some(ctx.gas_consumed()),
                gas_limit: ctx.gas_meter().borrow().limit(),
                account_nonce: ctx.account_nonce(),
                accounts,
            },
            Err(err) => Self {
                accepted: false,
                code: Some(err.code()),
                codespace: Some(err.codespace()),
                log: Some(err.to_string()),
                gas_consumed: None,
                gas_limit: None,
                account_nonce: 0,
                accounts,
            },
        }
    }
}

/// Runs a fixture through a dispatcher built over its state.
pub fn replay(fixture: &Fixture) -> Result<Outcome> {
    let keeper = fixture.keeper()?;
    let mut tx = fixture.build_tx(&keeper)?;
    let dispatcher = AnteDispatcher::new(&keeper.keepers(), &fixture.config());

    let result = dispatcher.handle(fixture.context(), &mut tx, fixture.simulate);
    if let Err(err) = &result {
        debug!(%err, "Transaction rejected");
    }

    let mut accounts = Vec::with_capacity(fixture.state.accounts.len());
    for account in &fixture.state.accounts {
        accounts.extend(keeper.account(account.address()?));
    }
    Ok(Outcome::new(result, accounts))
}
