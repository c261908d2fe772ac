use tracing::debug;

use crate::{
    constants::native::SIG_VERIFY_COST_SECP256K1, pub_key_address, verify_native_signature,
    AnteDecorator, AnteError, AnteResult, Context, Keepers, Next, Tx,
};

/// Verifies every signature of a native transaction against its signer.
///
/// Signature `i` belongs to signer `i`. Its public key must hash to the signer's address and is
/// recorded on the account the first time it is seen. The signature covers the sign bytes built
/// from the chain id, the account number (zero at genesis) and the stored sequence. Each
/// verification is charged to the transaction's gas meter. Skipped when simulating.
#[derive(Debug, Clone)]
pub struct SigVerificationDecorator {
    keepers: Keepers,
}

impl SigVerificationDecorator {
    /// Creates the decorator.
    pub const fn new(keepers: Keepers) -> Self {
        Self { keepers }
    }
}

impl AnteDecorator for SigVerificationDecorator {
    fn ante_handle(
        &self,
        ctx: Context,
        tx: &mut Tx,
        simulate: bool,
        next: Next<'_>,
    ) -> AnteResult<Context> {
        if simulate {
            return next.run(ctx, tx, simulate);
        }

        let std = tx.as_std()?;
        let signers = std.signers();
        if signers.len() != std.signatures.len() {
            return Err(AnteError::Unauthorized(format!(
                "invalid number of signer; expected: {}, got {}",
                signers.len(),
                std.signatures.len()
            )));
        }

        for (index, (signer, signature)) in signers.iter().zip(&std.signatures).enumerate() {
            let mut account =
                self.keepers.get_account_unmetered(&ctx, *signer).ok_or_else(|| {
                    AnteError::UnknownAddress(format!("account {signer} does not exist"))
                })?;

            let key_address = pub_key_address(&signature.pub_key)
                .map_err(|err| AnteError::InvalidPubKey(format!("invalid public key: {err}")))?;
            if key_address != *signer {
                return Err(AnteError::InvalidPubKey(format!(
                    "pubKey does not match signer address {signer} with signer index: {index}"
                )));
            }
            if account.pub_key.is_none() {
                debug!(address = %signer, "Recording public key");
                account.pub_key = Some(signature.pub_key.clone());
                ctx.run_unmetered(|scoped| {
                    self.keepers.account.set_account(scoped, account.clone());
                });
            }

            ctx.gas_meter()
                .borrow_mut()
                .try_consume_gas(SIG_VERIFY_COST_SECP256K1, "ante verify: secp256k1")?;

            let account_number = if ctx.block_height() == 0 { 0 } else { account.account_number };
            let sign_bytes = std.sign_bytes(ctx.chain_id(), account_number, account.sequence);
            let pub_key = account.pub_key.as_ref().unwrap_or(&signature.pub_key);
            let verified = verify_native_signature(pub_key, &sign_bytes, &signature.signature);
            if !verified.unwrap_or(false) {
                return Err(AnteError::Unauthorized(
                    "signature verification failed; verify correct account sequence and chain-id"
                        .to_owned(),
                ));
            }
        }

        next.run(ctx, tx, simulate)
    }
}
