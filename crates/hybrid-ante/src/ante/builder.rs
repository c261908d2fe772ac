use std::sync::Arc;

use crate::{
    chain_ante_decorators, AccountBlockedVerificationDecorator, AccountSetupDecorator,
    AccountVerificationDecorator, AnteConfig, AnteDecorator, ChainedAnteHandler,
    DeductFeeDecorator, EthGasConsumeDecorator, EthMempoolFeeDecorator,
    EthSetupContextDecorator, EthSigVerificationDecorator, FastEthExecuteDecorator,
    GasLimitDecorator, IncrementSenderSequenceDecorator, IncrementSequenceDecorator, Keepers,
    MempoolFeeDecorator, NonceVerificationDecorator, SetUpContextDecorator,
    SigVerificationDecorator, TxType, ValidateBasicDecorator, ValidateMemoDecorator,
    ValidateSigCountDecorator,
};

/// Decorators in the order they were pushed.
#[derive(Default)]
struct ChainBuilder {
    decorators: Vec<Arc<dyn AnteDecorator>>,
}

impl ChainBuilder {
    fn push(mut self, decorator: impl AnteDecorator + 'static) -> Self {
        self.decorators.push(Arc::new(decorator));
        self
    }

    fn push_if(self, condition: bool, decorator: impl AnteDecorator + 'static) -> Self {
        if condition {
            self.push(decorator)
        } else {
            self
        }
    }

    fn build(self) -> ChainedAnteHandler {
        chain_ante_decorators(self.decorators)
    }
}

/// Builds the chain for Ethereum transactions.
///
/// The light chain drops signature recovery; the sender is then taken from
/// [`crate::Context::from`].
pub fn build_evm_ante_handler(
    keepers: &Keepers,
    config: &AnteConfig,
    light: bool,
) -> ChainedAnteHandler {
    ChainBuilder::default()
        .push(FastEthExecuteDecorator)
        .push(EthSetupContextDecorator)
        .push(GasLimitDecorator::new(Arc::clone(&keepers.evm)))
        .push(EthMempoolFeeDecorator::new(&config.bond_denom))
        .push_if(!light, EthSigVerificationDecorator::new(config))
        .push(AccountBlockedVerificationDecorator::new(Arc::clone(&keepers.evm)))
        .push(AccountVerificationDecorator::new(keepers.clone(), &config.bond_denom))
        .push(NonceVerificationDecorator::new(keepers.clone(), config.mempool))
        .push(EthGasConsumeDecorator::new(keepers.clone(), &config.bond_denom))
        .push(IncrementSenderSequenceDecorator::new(keepers.clone(), config.mempool))
        .build()
}

/// Builds the chain for native transactions.
///
/// The light chain drops signature verification.
pub fn build_std_ante_handler(keepers: &Keepers, light: bool) -> ChainedAnteHandler {
    ChainBuilder::default()
        .push(SetUpContextDecorator)
        .push(AccountSetupDecorator::new(keepers.clone()))
        .push(AccountBlockedVerificationDecorator::new(Arc::clone(&keepers.evm)))
        .push(MempoolFeeDecorator)
        .push(ValidateBasicDecorator)
        .push(ValidateMemoDecorator)
        .push(ValidateSigCountDecorator)
        .push(DeductFeeDecorator::new(keepers.clone()))
        .push_if(!light, SigVerificationDecorator::new(keepers.clone()))
        .push(IncrementSequenceDecorator::new(keepers.clone()))
        .build()
}

/// The four chains a dispatcher selects from.
#[derive(Debug, Clone)]
pub struct AnteChains {
    /// Full verification of Ethereum transactions.
    pub origin_evm: ChainedAnteHandler,
    /// Ethereum transactions attested by a trusted node.
    pub light_evm: ChainedAnteHandler,
    /// Full verification of native transactions.
    pub origin_std: ChainedAnteHandler,
    /// Native transactions attested by a trusted node.
    pub light_std: ChainedAnteHandler,
}

impl AnteChains {
    /// Builds every chain over the same keepers and configuration.
    pub fn new(keepers: &Keepers, config: &AnteConfig) -> Self {
        Self {
            origin_evm: build_evm_ante_handler(keepers, config, false),
            light_evm: build_evm_ante_handler(keepers, config, true),
            origin_std: build_std_ante_handler(keepers, false),
            light_std: build_std_ante_handler(keepers, true),
        }
    }

    /// Returns the chain for `tx_type`.
    pub const fn select(&self, tx_type: TxType, light: bool) -> &ChainedAnteHandler {
        match (tx_type, light) {
            (TxType::Ethereum, false) => &self.origin_evm,
            (TxType::Ethereum, true) => &self.light_evm,
            (TxType::Std, false) => &self.origin_std,
            (TxType::Std, true) => &self.light_std,
        }
    }
}
