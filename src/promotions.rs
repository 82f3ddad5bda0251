//! Promotions
//!
//! A multi-buy promotion is evaluated over every complete group of units of a
//! single item code. Two forms exist: "pay for only K of every N" and "pay a
//! fixed price for every N". Units left over after the last complete group are
//! charged at full price.

use std::fmt;

use crate::prices::{Price, Quantity};

/// Multi-buy promotion attached to a catalogue entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Promotion {
    /// Every unit is charged at full price.
    #[default]
    None,

    /// Charge for only `charged` units out of every `group_size`.
    PayFor {
        /// Units per promotion group
        group_size: Quantity,

        /// Units charged per complete group
        charged: Quantity,
    },

    /// Charge a fixed `price` for every `group_size` units.
    GroupPrice {
        /// Units per promotion group
        group_size: Quantity,

        /// Price charged per complete group
        price: Price,
    },
}

impl Promotion {
    /// Size of the group the promotion is evaluated over; `1` when there is no promotion.
    pub fn group_size(&self) -> Quantity {
        match self {
            Promotion::None => 1,
            Promotion::PayFor { group_size, .. } | Promotion::GroupPrice { group_size, .. } => {
                *group_size
            }
        }
    }

    /// Units charged per group in the population-discount form, otherwise `0`.
    pub fn quantity_charged(&self) -> Quantity {
        match self {
            Promotion::PayFor { charged, .. } => *charged,
            Promotion::None | Promotion::GroupPrice { .. } => 0,
        }
    }

    /// Price per group in the fixed-price form, otherwise zero.
    pub fn group_price(&self) -> Price {
        match self {
            Promotion::GroupPrice { price, .. } => *price,
            Promotion::None | Promotion::PayFor { .. } => Price::default(),
        }
    }

    /// Returns the group size and the cost of one complete group at the given
    /// unit price, or `None` when there is no promotion.
    ///
    /// Exactly one of the two terms `group_price + unit_price * charged` is
    /// non-zero, so the one formula covers both promotion forms.
    pub fn group_cost(&self, unit_price: Price) -> Option<(Quantity, u64)> {
        match self {
            Promotion::None => None,
            Promotion::PayFor { .. } | Promotion::GroupPrice { .. } => {
                let cost = self
                    .group_price()
                    .saturating_add(unit_price.saturating_mul(self.quantity_charged()));

                Some((self.group_size(), cost))
            }
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Promotion::None => f.write_str("No offer"),
            Promotion::PayFor {
                group_size,
                charged,
            } => write!(f, "Get {group_size} for the price of {charged}"),
            Promotion::GroupPrice { group_size, price } => {
                write!(f, "Get {group_size} for {price}")
            }
        }
    }
}
