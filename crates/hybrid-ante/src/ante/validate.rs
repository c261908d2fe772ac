use crate::{
    constants::native::{MAX_MEMO_CHARACTERS, TX_SIG_LIMIT},
    AnteDecorator, AnteError, AnteResult, Context, Next, Tx,
};

/// Runs the stateless checks of a native transaction. Skipped on recheck.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateBasicDecorator;

impl AnteDecorator for ValidateBasicDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        if !ctx.is_recheck_tx() {
            tx.as_std()?.validate_basic()?;
        }
        next.run(ctx, tx, simulate)
    }
}

/// Bounds the memo of a native transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateMemoDecorator;

impl AnteDecorator for ValidateMemoDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let length = tx.as_std()?.memo.chars().count();
        if length > MAX_MEMO_CHARACTERS {
            return Err(AnteError::MemoTooLarge(format!(
                "maximum number of characters is {MAX_MEMO_CHARACTERS} but received {length} characters"
            )));
        }
        next.run(ctx, tx, simulate)
    }
}

/// Bounds the number of signatures of a native transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidateSigCountDecorator;

impl AnteDecorator for ValidateSigCountDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        let count = tx.as_std()?.signatures.len();
        if count > TX_SIG_LIMIT {
            return Err(AnteError::TooManySignatures(format!(
                "signatures: {count}, limit: {TX_SIG_LIMIT}"
            )));
        }
        next.run(ctx, tx, simulate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test_utils::single_decorator_chain, AnteHandler, StdSignature, StdTx};

    #[test]
    fn test_memo_counts_characters() {
        let chain = single_decorator_chain(ValidateMemoDecorator);
        let at_limit = "é".repeat(MAX_MEMO_CHARACTERS);
        let mut tx = Tx::Std(StdTx { memo: at_limit.clone(), ..Default::default() });
        chain.handle(Context::new("exchain-65", 1), &mut tx, false).unwrap();

        let mut tx = Tx::Std(StdTx { memo: at_limit + "x", ..Default::default() });
        let err = chain.handle(Context::new("exchain-65", 1), &mut tx, false).unwrap_err();
        assert_eq!(err.code(), 12);
    }

    #[test]
    fn test_signature_limit() {
        let chain = single_decorator_chain(ValidateSigCountDecorator);
        let tx = |count: usize| {
            let signatures = vec![StdSignature::default(); count];
            Tx::Std(StdTx { signatures, ..Default::default() })
        };

        chain.handle(Context::new("exchain-65", 1), &mut tx(TX_SIG_LIMIT), false).unwrap();
        let err = chain
            .handle(Context::new("exchain-65", 1), &mut tx(TX_SIG_LIMIT + 1), false)
            .unwrap_err();
        assert_eq!(err, AnteError::TooManySignatures("signatures: 8, limit: 7".to_owned()));
    }

    #[test]
    fn test_validate_basic_skipped_on_recheck() {
        let chain = single_decorator_chain(ValidateBasicDecorator);
        let recheck = Context::new("exchain-65", 1).with_recheck_tx(true);

        chain.handle(recheck, &mut Tx::Std(StdTx::default()), false).unwrap();
        let err = chain
            .handle(Context::new("exchain-65", 1), &mut Tx::Std(StdTx::default()), false)
            .unwrap_err();
        assert_eq!(err, AnteError::NoSignatures);
    }
}
