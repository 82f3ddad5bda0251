//! Pricing

use std::{iter::Sum, ops::Add};

use rusty_money::{Money, iso::Currency};

use crate::{
    items::PricedItem,
    prices::{Quantity, minor_units},
};

/// Amount payable for some units, and the amount saved by promotions.
///
/// `total + savings` is always the full (undiscounted) price of the units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cost {
    /// Amount payable in minor units
    pub total: u64,

    /// Amount saved by promotions in minor units
    pub savings: u64,
}

impl Cost {
    /// Creates a cost from a total and the savings made.
    pub const fn new(total: u64, savings: u64) -> Self {
        Self { total, savings }
    }

    /// Price of the units before any promotion.
    pub fn subtotal(&self) -> u64 {
        self.total.saturating_add(self.savings)
    }

    /// Returns the payable total as money in the given currency.
    pub fn total_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_minor(minor_units(self.total), currency)
    }

    /// Returns the savings as money in the given currency.
    pub fn savings_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        Money::from_minor(minor_units(self.savings), currency)
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost {
            total: self.total.saturating_add(rhs.total),
            savings: self.savings.saturating_add(rhs.savings),
        }
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Self {
        iter.fold(Cost::default(), Add::add)
    }
}

/// Calculates the combined cost of several item lines, applying each item's
/// multi-buy promotion to its own quantity.
pub fn total_cost<'a>(lines: impl IntoIterator<Item = (&'a PricedItem, Quantity)>) -> Cost {
    lines
        .into_iter()
        .map(|(item, quantity)| item.cost(quantity))
        .sum()
}
