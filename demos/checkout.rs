//! Checkout Example
//!
//! Scans items into a speculative copy of a basket, commits them back to the
//! live engine, prints a receipt and completes the transaction.
//!
//! Use `-f` to load a fixture set by name
//! Use `-s` to choose the codes to scan (e.g. `-s BBBAP`)
//! Use `-l` to set the log level when `RUST_LOG` is unset

use std::{cell::RefCell, collections::BTreeSet, io, rc::Rc};

use anyhow::Result;
use checkout::{
    codes::ItemCode,
    engine::BasketEngine,
    fixtures::Fixture,
    listeners::{BasketListener, SignalStrength},
    prices::Price,
    receipt::Receipt,
    utils::ExampleCheckoutArgs,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Logs the running total and the basket lines on show after every change.
///
/// A line whose quantity drops to zero stays on show until a strong signal.
#[derive(Debug, Default)]
struct TotalDisplay {
    lines: RefCell<BTreeSet<ItemCode>>,
}

impl BasketListener for TotalDisplay {
    fn on_basket_changed(&self, engine: &BasketEngine, strength: SignalStrength) {
        let units = engine.item_count(None).unwrap_or_default();
        let total = engine.total(None).map(|cost| cost.total).unwrap_or_default();

        let mut lines = self.lines.borrow_mut();

        if strength.drops_emptied_categories() {
            lines.clear();
        }

        lines.extend(engine.populated_categories());

        let shown: String = lines.iter().map(|code| code.as_char()).collect();

        info!(units, total, %strength, lines = %shown, "basket changed");
    }
}

/// Checkout Example
#[expect(clippy::print_stdout, reason = "Example code")]
pub fn main() -> Result<()> {
    let args = ExampleCheckoutArgs::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_err| EnvFilter::try_new(&args.log_level))?;

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut engine = Fixture::from_set(&args.fixture)?;
    let display = Rc::new(TotalDisplay::default());

    engine.register(display.clone());

    let mut draft = engine.clone();

    for code in args.codes()? {
        draft.scan(code, args.strength)?;
    }

    draft.copy_to(&mut engine);

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    Receipt::from_engine(&engine)?.write_to(&mut handle)?;

    let paid = engine.complete_transaction(SignalStrength::Strong)?;
    let currency = engine.catalogue().currency();

    println!("Paid: {}", Price::new(paid).to_money(currency));

    engine.unregister(&display);

    Ok(())
}
