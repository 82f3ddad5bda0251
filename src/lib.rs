//! Checkout
//!
//! Checkout is a retail basket engine: it prices a basket against a catalogue
//! with multi-buy promotions and pushes every change to registered listeners.

pub mod basket;
pub mod catalogue;
pub mod codes;
pub mod engine;
pub mod error;
pub mod fixtures;
pub mod items;
pub mod listeners;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod promotions;
pub mod receipt;
pub mod utils;
