//! Checkout prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    basket::{Basket, BasketError},
    catalogue::{Catalogue, CatalogueError, PricingRule},
    codes::{ItemCode, ItemCodeError},
    engine::{BasketEngine, Transaction},
    error::ErrorKind,
    fixtures::{Fixture, FixtureError},
    items::PricedItem,
    listeners::{BasketListener, SignalStrength, SignalStrengthError},
    prices::{Price, Quantity},
    pricing::Cost,
    promotions::Promotion,
    receipt::{Receipt, ReceiptError},
};
