use std::sync::Arc;

use tracing::debug;

use crate::{
    AnteChains, AnteConfig, AnteError, AnteHandler, AnteResult, Confidence, Context,
    JsonTxDecoder, Keepers, TrustedNodes, Tx, TxDecoder, TxType,
};

/// The entry point of the pipeline.
///
/// Plain transactions run the origin chain of their kind. A [`crate::WrappedTx`] is classified
/// by its node attestation first:
///
/// | attestation     | chain                                   |
/// |-----------------|-----------------------------------------|
/// | unsigned        | origin chain of the declared kind       |
/// | trusted node    | light chain of the declared kind        |
/// | anything else   | origin chain of the opposite kind       |
///
/// A trusted Ethereum envelope must attest its sender. The payload is decoded with the
/// dispatcher's [`TxDecoder`] and the selected chain runs on the decoded transaction. The
/// caller's envelope is left untouched.
#[derive(Debug, Clone)]
pub struct AnteDispatcher {
    chains: AnteChains,
    trusted: TrustedNodes,
    decoder: Arc<dyn TxDecoder>,
}

/* Constructors */
impl AnteDispatcher {
    /// Builds the four chains over `keepers` and trusts the node keys of `config`.
    pub fn new(keepers: &Keepers, config: &AnteConfig) -> Self {
        Self {
            chains: AnteChains::new(keepers, config),
            trusted: TrustedNodes::new(config.trusted_node_keys.iter().cloned()),
            decoder: Arc::new(JsonTxDecoder),
        }
    }

    /// Replaces the decoder used for wrapped payloads.
    pub fn with_decoder(mut self, decoder: Arc<dyn TxDecoder>) -> Self {
        self.decoder = decoder;
        self
    }
}

impl AnteHandler for AnteDispatcher {
    fn handle(&self, ctx: Context, tx: &mut Tx, simulate: bool) -> AnteResult<Context> {
        let wrapped = match tx {
            Tx::Std(_) => return self.chains.origin_std.handle(ctx, tx, simulate),
            Tx::Ethereum(_) => return self.chains.origin_evm.handle(ctx, tx, simulate),
            Tx::Wrapped(wrapped) => wrapped,
        };

        let (tx_type, light) = match self.trusted.classify(wrapped)? {
            Confidence::Unsigned => (wrapped.tx_type, false),
            Confidence::Confident => (wrapped.tx_type, true),
            Confidence::NotConfident => (wrapped.tx_type.opposite(), false),
        };
        // The light Ethereum chain never recovers a sender; the node must attest one.
        if light && tx_type == TxType::Ethereum && wrapped.from.is_none() {
            return Err(AnteError::UnknownRequest(
                "trusted Ethereum envelope carries no sender".to_owned(),
            ));
        }
        debug!(%tx_type, light, "Selected ante chain");

        let mut inner = self.decoder.decode(&wrapped.payload)?;
        let mut ctx = ctx.with_tx_bytes(wrapped.payload.clone());
        if light {
            ctx = ctx.with_from(wrapped.from);
        }
        self.chains.select(tx_type, light).handle(ctx, &mut inner, simulate)
    }
}
