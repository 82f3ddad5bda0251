//! Utils

use clap::Parser;

use crate::{
    codes::{ItemCode, ItemCodeError},
    listeners::SignalStrength,
};

/// Arguments for the checkout demo
#[derive(Debug, Parser)]
pub struct ExampleCheckoutArgs {
    /// Fixture set to load the catalogue from
    #[clap(short, long, default_value = "default")]
    pub fixture: String,

    /// Item codes to scan, one character per unit (e.g. `BBBAP`)
    #[clap(short, long, default_value = "BBBAP")]
    pub scan: String,

    /// Log level used when `RUST_LOG` is not set
    #[clap(short, long, default_value = "info")]
    pub log_level: String,

    /// Strength of each speculative scan
    #[clap(long, default_value_t = SignalStrength::Weak)]
    pub strength: SignalStrength,
}

impl ExampleCheckoutArgs {
    /// Parse the scan string into item codes, ignoring whitespace.
    ///
    /// # Errors
    ///
    /// Returns an [`ItemCodeError`] if a character cannot be an item code.
    pub fn codes(&self) -> Result<Vec<ItemCode>, ItemCodeError> {
        scan_codes(&self.scan)
    }
}

/// Split a run of characters into item codes, skipping whitespace.
///
/// # Errors
///
/// Returns an [`ItemCodeError`] for any control character.
pub fn scan_codes(input: &str) -> Result<Vec<ItemCode>, ItemCodeError> {
    input
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(ItemCode::new)
        .collect()
}
