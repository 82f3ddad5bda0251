//! Prices

use std::{fmt, ops::Deref};

use rusty_money::{Money, iso::Currency};

/// A count of units of one item code.
pub type Quantity = u64;

/// Represents a price in pence/cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    value: u64,
}

impl Price {
    /// Creates a new Price
    pub const fn new(value: u64) -> Self {
        Price { value }
    }

    /// Returns the price as money in the given currency.
    pub fn to_money(self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_minor(minor_units(self.value), currency)
    }
}

impl Deref for Price {
    type Target = u64;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Price::new(value)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}p", self.value)
    }
}

/// Converts an amount in minor units into the signed representation used by
/// `rusty_money`, saturating at `i64::MAX`.
pub(crate) fn minor_units(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
