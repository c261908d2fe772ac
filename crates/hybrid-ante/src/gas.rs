use core::{cell::RefCell, fmt};
use std::rc::Rc;

use crate::{AnteError, AnteResult};

/// A gas meter shared between a [`crate::Context`] and every clone of it that keeps the same
/// meter.
pub type SharedGasMeter = Rc<RefCell<GasMeter>>;

/// Payload of the panic raised by [`GasMeter::consume_gas`] when the limit is crossed.
///
/// Only the fast-execute decorator catches it; every other panic is resumed untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutOfGasPanic {
    /// What the gas was being consumed for.
    pub descriptor: String,
}

impl fmt::Display for OutOfGasPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "out of gas in location: {}", self.descriptor)
    }
}

/// Counts the gas consumed while processing one transaction.
///
/// A meter is either infinite or bounded by a limit. An infinite meter still counts what it is
/// charged, so callers can report usage without enforcing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GasMeter {
    /// `None` for an infinite meter.
    limit: Option<u64>,
    consumed: u64,
}

impl GasMeter {
    /// Creates a meter that never runs out.
    pub const fn infinite() -> Self {
        Self { limit: None, consumed: 0 }
    }

    /// Creates a meter that runs out once `limit` gas has been consumed.
    pub const fn with_limit(limit: u64) -> Self {
        Self { limit: Some(limit), consumed: 0 }
    }

    /// Wraps the meter for sharing between contexts.
    pub fn into_shared(self) -> SharedGasMeter {
        Rc::new(RefCell::new(self))
    }

    /// Returns the limit, `None` for an infinite meter.
    pub const fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Returns `true` if the meter has no limit.
    pub const fn is_infinite(&self) -> bool {
        self.limit.is_none()
    }

    /// Returns the gas consumed so far.
    pub const fn gas_consumed(&self) -> u64 {
        self.consumed
    }

    /// Returns the gas consumed, capped at the limit.
    pub fn gas_consumed_to_limit(&self) -> u64 {
        self.limit.map_or(self.consumed, |limit| self.consumed.min(limit))
    }

    /// Returns `true` if the consumed gas exceeds the limit.
    pub fn is_past_limit(&self) -> bool {
        self.limit.is_some_and(|limit| self.consumed > limit)
    }

    /// Returns `true` if the consumed gas reached or exceeds the limit.
    pub fn is_out_of_gas(&self) -> bool {
        self.limit.is_some_and(|limit| self.consumed >= limit)
    }

    /// Consumes `amount` gas, reporting exhaustion as an [`AnteError::OutOfGas`].
    ///
    /// The gas is recorded even when the limit is crossed, matching what a panicking meter
    /// would leave behind.
    pub fn try_consume_gas(&mut self, amount: u64, descriptor: &str) -> AnteResult<()> {
        self.consumed = self.consumed.saturating_add(amount);
        if self.is_past_limit() {
            return Err(AnteError::OutOfGas(format!(
                "out of gas in location: {descriptor}; gasWanted: {}, gasUsed: {}",
                self.limit.unwrap_or_default(),
                self.consumed
            )));
        }
        Ok(())
    }

    /// Consumes `amount` gas, panicking with an [`OutOfGasPanic`] payload when the limit is
    /// crossed.
    ///
    /// This is the behaviour keepers rely on; the fast-execute decorator turns the panic back
    /// into an error.
    pub fn consume_gas(&mut self, amount: u64, descriptor: &str) {
        if self.try_consume_gas(amount, descriptor).is_err() {
            std::panic::panic_any(OutOfGasPanic { descriptor: descriptor.to_owned() });
        }
    }

    /// Refunds up to `amount` previously consumed gas.
    pub fn refund_gas(&mut self, amount: u64) {
        self.consumed = self.consumed.saturating_sub(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infinite_meter_counts_without_limit() {
        let mut meter = GasMeter::infinite();
        meter.consume_gas(u64::MAX, "huge");
        meter.consume_gas(10, "more");
        assert_eq!(meter.gas_consumed(), u64::MAX);
        assert!(!meter.is_out_of_gas());
        assert!(!meter.is_past_limit());
    }

    #[test]
    fn test_limited_meter_reports_exhaustion() {
        let mut meter = GasMeter::with_limit(100);
        meter.try_consume_gas(100, "exact").unwrap();
        assert!(meter.is_out_of_gas());
        assert!(!meter.is_past_limit());

        let err = meter.try_consume_gas(1, "over").unwrap_err();
        assert_eq!(err.code(), 11);
        assert_eq!(meter.gas_consumed(), 101);
        assert_eq!(meter.gas_consumed_to_limit(), 100);
    }

    #[test]
    fn test_consume_gas_panics_with_typed_payload() {
        let result = std::panic::catch_unwind(|| {
            let mut meter = GasMeter::with_limit(5);
            meter.consume_gas(6, "ReadFlat");
        });
        let payload = result.unwrap_err();
        let panic = payload.downcast_ref::<OutOfGasPanic>().unwrap();
        assert_eq!(panic.descriptor, "ReadFlat");
        assert_eq!(panic.to_string(), "out of gas in location: ReadFlat");
    }

    #[test]
    fn test_shared_meter_is_visible_through_clones() {
        let shared = GasMeter::with_limit(50).into_shared();
        let other = Rc::clone(&shared);
        other.borrow_mut().consume_gas(20, "write");
        assert_eq!(shared.borrow().gas_consumed(), 20);
        shared.borrow_mut().refund_gas(30);
        assert_eq!(other.borrow().gas_consumed(), 0);
    }
}
