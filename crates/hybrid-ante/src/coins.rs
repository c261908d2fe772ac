//! Fixed-precision decimal amounts and per-denomination balances.

use core::{fmt, str::FromStr};

use alloy_primitives::U256;
use derive_more::Deref;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{constants::PRECISION, AnteError, AnteResult};

/// `10^18`, the mantissa of `1`.
const ONE_MANTISSA: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// A non-negative decimal with [`PRECISION`] fractional digits.
///
/// The value is stored as its mantissa, `value * 10^18`. An EVM amount in wei therefore maps onto
/// the mantissa one to one through [`Dec::from_atto`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dec(U256);

impl Dec {
    /// Zero.
    pub const ZERO: Self = Self(U256::ZERO);

    /// One.
    pub const ONE: Self = Self(ONE_MANTISSA);

    /// Creates a decimal whose mantissa is `atto`, i.e. `atto * 10^-18`.
    pub const fn from_atto(atto: U256) -> Self {
        Self(atto)
    }

    /// Creates a decimal holding the integer `value`.
    pub fn from_int(value: u64) -> Self {
        Self(U256::from(value) * ONE_MANTISSA)
    }

    /// Returns the mantissa.
    pub const fn atto(&self) -> U256 {
        self.0
    }

    /// Returns `true` if the value is zero.
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Adds two decimals, returning `None` on overflow.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts `other`, returning `None` if the result would be negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Multiplies by an integer, returning `None` on overflow.
    pub fn checked_mul_int(self, factor: u64) -> Option<Self> {
        self.0.checked_mul(U256::from(factor)).map(Self)
    }

    /// Rounds up to the nearest integer, returning `None` on overflow.
    pub fn checked_ceil(self) -> Option<Self> {
        let rem = self.0 % ONE_MANTISSA;
        if rem.is_zero() {
            return Some(self);
        }
        self.0.checked_add(ONE_MANTISSA - rem).map(Self)
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let int = self.0 / ONE_MANTISSA;
        let frac = self.0 % ONE_MANTISSA;
        write!(f, "{int}.{frac:0>width$}", frac = frac.to_string(), width = PRECISION)
    }
}

impl FromStr for Dec {
    type Err = AnteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnteError::InvalidCoins(format!("invalid decimal amount: {s:?}"));
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        if int.is_empty() ||
            frac.len() > PRECISION ||
            !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) ||
            (s.contains('.') && frac.is_empty())
        {
            return Err(invalid());
        }
        let int = U256::from_str_radix(int, 10).map_err(|_| invalid())?;
        let frac = if frac.is_empty() {
            U256::ZERO
        } else {
            let padded = format!("{frac:0<PRECISION$}");
            U256::from_str_radix(&padded, 10).map_err(|_| invalid())?
        };
        int.checked_mul(ONE_MANTISSA)
            .and_then(|v| v.checked_add(frac))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Serialize for Dec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Dec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Returns `true` if `denom` matches `[a-z][a-z0-9/]{2,127}`.
pub fn is_valid_denom(denom: &str) -> bool {
    let bytes = denom.as_bytes();
    (3..=128).contains(&bytes.len()) &&
        bytes[0].is_ascii_lowercase() &&
        bytes[1..].iter().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'/')
}

/// An amount of one denomination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecCoin {
    /// The denomination.
    pub denom: String,
    /// The amount.
    pub amount: Dec,
}

impl DecCoin {
    /// Creates a coin.
    pub fn new(denom: impl Into<String>, amount: Dec) -> Self {
        Self { denom: denom.into(), amount }
    }

    /// Returns `true` if the denomination is well formed.
    pub fn is_valid(&self) -> bool {
        is_valid_denom(&self.denom)
    }
}

impl fmt::Display for DecCoin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A balance over several denominations, kept sorted by denomination with no zero amounts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deref)]
pub struct Coins(Vec<DecCoin>);

impl Coins {
    /// Creates an empty balance.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Creates a balance from arbitrary coins: zero amounts are dropped and the rest sorted.
    ///
    /// Fails on a malformed or repeated denomination.
    pub fn new(coins: impl IntoIterator<Item = DecCoin>) -> AnteResult<Self> {
        let mut coins: Vec<_> = coins.into_iter().filter(|c| !c.amount.is_zero()).collect();
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(bad) = coins.iter().find(|c| !c.is_valid()) {
            return Err(AnteError::InvalidCoins(format!("invalid denom: {}", bad.denom)));
        }
        if let Some(pair) = coins.windows(2).find(|w| w[0].denom == w[1].denom) {
            return Err(AnteError::InvalidCoins(format!("duplicate denom: {}", pair[0].denom)));
        }
        Ok(Self(coins))
    }

    /// Creates a single-denomination balance.
    pub fn single(denom: impl Into<String>, amount: Dec) -> Self {
        let coin = DecCoin::new(denom, amount);
        if coin.amount.is_zero() {
            Self::empty()
        } else {
            Self(vec![coin])
        }
    }

    /// Returns the amount held of `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> Dec {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .map_or(Dec::ZERO, |idx| self.0[idx].amount)
    }

    /// Returns `true` if every amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| c.amount.is_zero())
    }

    /// Returns `true` if the coins are sorted, unique, well formed and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.0.iter().all(|c| c.is_valid() && !c.amount.is_zero()) &&
            self.0.windows(2).all(|w| w[0].denom < w[1].denom)
    }

    /// Returns the sum of both balances, or `None` on overflow.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        let mut out = self.0.clone();
        for coin in other.0.iter().filter(|c| !c.amount.is_zero()) {
            match out.binary_search_by(|c| c.denom.cmp(&coin.denom)) {
                Ok(idx) => out[idx].amount = out[idx].amount.checked_add(coin.amount)?,
                Err(idx) => out.insert(idx, coin.clone()),
            }
        }
        Some(Self(out))
    }

    /// Subtracts `other`, returning `None` if any denomination would go negative.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        let mut out = self.0.clone();
        for coin in &other.0 {
            match out.binary_search_by(|c| c.denom.cmp(&coin.denom)) {
                Ok(idx) => out[idx].amount = out[idx].amount.checked_sub(coin.amount)?,
                Err(_) if coin.amount.is_zero() => {}
                Err(_) => return None,
            }
        }
        out.retain(|c| !c.amount.is_zero());
        Some(Self(out))
    }

    /// Returns `true` if, for at least one denomination in `other`, this balance holds at least
    /// as much. An empty `other` yields `false`.
    pub fn is_any_gte(&self, other: &Self) -> bool {
        other.0.iter().any(|c| self.amount_of(&c.denom) >= c.amount)
    }
}

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coins = Vec::<DecCoin>::deserialize(deserializer)?;
        Self::new(coins).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, coin) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn okb(amount: &str) -> DecCoin {
        DecCoin::new("okb", amount.parse().unwrap())
    }

    #[test]
    fn test_dec_parse_and_display() {
        let dec: Dec = "1.5".parse().unwrap();
        assert_eq!(dec.atto(), U256::from(1_500_000_000_000_000_000u128));
        assert_eq!(dec.to_string(), "1.500000000000000000");
        assert_eq!("21000".parse::<Dec>().unwrap(), Dec::from_int(21000));
        assert!("1.".parse::<Dec>().is_err());
        assert!("-1".parse::<Dec>().is_err());
        assert!("0.0000000000000000001".parse::<Dec>().is_err());
    }

    #[test]
    fn test_dec_from_atto_matches_wei() {
        let fee = Dec::from_atto(U256::from(21_000u64));
        assert_eq!(fee.to_string(), "0.000000000000021000");
    }

    #[test]
    fn test_dec_ceil() {
        let dec: Dec = "2.000000000000000001".parse().unwrap();
        assert_eq!(dec.checked_ceil().unwrap(), Dec::from_int(3));
        assert_eq!(Dec::from_int(3).checked_ceil().unwrap(), Dec::from_int(3));
    }

    #[test]
    fn test_coins_new_sorts_and_rejects_duplicates() {
        let coins = Coins::new([okb("1"), DecCoin::new("eth", Dec::ONE)]).unwrap();
        assert_eq!(coins[0].denom, "eth");
        assert!(coins.is_valid());
        assert!(Coins::new([okb("1"), okb("2")]).is_err());
        assert!(Coins::new([DecCoin::new("A", Dec::ONE)]).is_err());
        assert!(Coins::new([okb("0")]).unwrap().is_empty());
    }

    #[test]
    fn test_coins_sub_and_add() {
        let balance = Coins::new([okb("10"), DecCoin::new("eth", Dec::ONE)]).unwrap();
        let fee = Coins::single("okb", Dec::from_int(4));

        let left = balance.checked_sub(&fee).unwrap();
        assert_eq!(left.amount_of("okb"), Dec::from_int(6));
        assert_eq!(left.checked_add(&fee).unwrap(), balance);

        let too_much = Coins::single("okb", Dec::from_int(11));
        assert!(balance.checked_sub(&too_much).is_none());
        assert!(balance.checked_sub(&Coins::single("btc", Dec::ONE)).is_none());
        assert_eq!(balance.checked_sub(&balance).unwrap(), Coins::empty());
    }

    #[test]
    fn test_coins_is_any_gte() {
        let fee = Coins::new([okb("5"), DecCoin::new("eth", Dec::ONE)]).unwrap();
        assert!(fee.is_any_gte(&Coins::single("okb", Dec::from_int(5))));
        assert!(fee.is_any_gte(&Coins::new([okb("9"), DecCoin::new("eth", Dec::ONE)]).unwrap()));
        assert!(!fee.is_any_gte(&Coins::single("okb", Dec::from_int(6))));
        assert!(!fee.is_any_gte(&Coins::empty()));
    }

    #[test]
    fn test_coins_json() {
        let coins: Coins =
            serde_json::from_str(r#"[{"denom":"okb","amount":"1000"}]"#).unwrap();
        assert_eq!(coins.amount_of("okb"), Dec::from_int(1000));
        assert_eq!(
            serde_json::to_string(&coins).unwrap(),
            r#"[{"denom":"okb","amount":"1000.000000000000000000"}]"#
        );
    }
}
