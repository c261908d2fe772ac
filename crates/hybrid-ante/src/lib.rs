//! The ante-handler pipeline for a chain that admits native multi-signer transactions and
//! Ethereum transactions side by side.
//!
//! A transaction enters through the [`AnteDispatcher`], which picks one of four decorator chains
//! (origin or light, native or Ethereum) and threads a [`Context`] through every
//! [`AnteDecorator`] of that chain in order. Each decorator either rejects with an [`AnteError`]
//! or forwards to the rest of the chain.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod account;
pub use account::*;

mod ante;
pub use ante::*;

mod coins;
pub use coins::*;

mod config;
pub use config::*;

mod context;
pub use context::*;

mod error;
pub use error::*;

mod fee;
pub use fee::*;

mod gas;
pub use gas::*;

mod keeper;
pub use keeper::*;

mod tx;
pub use tx::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
