//! Receipt

use std::io;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use smallvec::SmallVec;
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    basket::BasketError,
    codes::ItemCode,
    engine::BasketEngine,
    prices::{Price, Quantity},
    pricing::Cost,
};

/// Errors that can occur when building or printing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// Error pricing the basket.
    #[error(transparent)]
    Basket(#[from] BasketError),

    /// IO error
    #[error("IO error")]
    IO,
}

/// One populated category of the basket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    /// Item code
    pub code: ItemCode,

    /// Item name
    pub name: String,

    /// Units bought
    pub quantity: Quantity,

    /// Price of one unit
    pub unit_price: Price,

    /// Cost and savings of the line
    pub cost: Cost,

    /// Offer text, if the item has a promotion
    pub offer: Option<String>,
}

/// Snapshot of a priced basket.
#[derive(Debug, Clone)]
pub struct Receipt {
    lines: SmallVec<[ReceiptLine; 8]>,
    cost: Cost,
    currency: &'static Currency,
}

impl Receipt {
    /// Build a receipt from the engine's live basket.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a populated category cannot be priced.
    pub fn from_engine(engine: &BasketEngine) -> Result<Self, ReceiptError> {
        let catalogue = engine.catalogue();

        let lines = engine
            .populated_categories()
            .into_iter()
            .filter_map(|code| catalogue.get(code))
            .map(|item| -> Result<ReceiptLine, BasketError> {
                Ok(ReceiptLine {
                    code: item.code(),
                    name: item.name().to_string(),
                    quantity: engine.item_count(Some(item.code()))?,
                    unit_price: item.unit_price(),
                    cost: engine.total(Some(item.code()))?,
                    offer: item.offer_description(),
                })
            })
            .collect::<Result<SmallVec<_>, _>>()?;

        Ok(Receipt {
            lines,
            cost: engine.total(None)?,
            currency: catalogue.currency(),
        })
    }

    /// Lines for every populated category, in catalogue order.
    pub fn lines(&self) -> &[ReceiptLine] {
        &self.lines
    }

    /// Total cost before any promotion applications
    pub fn subtotal(&self) -> u64 {
        self.cost.subtotal()
    }

    /// Total amount payable
    pub fn total(&self) -> u64 {
        self.cost.total
    }

    /// Savings made by promotions
    pub fn savings(&self) -> u64 {
        self.cost.savings
    }

    /// Savings as a fraction of the subtotal.
    pub fn savings_percent(&self) -> Percentage {
        let subtotal = self.subtotal();

        if subtotal == 0 {
            return Percentage::from(0.0);
        }

        Percentage::from(Decimal::from(self.savings()) / Decimal::from(subtotal))
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Writes the receipt as a table followed by a summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiptError::IO`] if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        push_receipt_header(&mut builder);
        append_item_rows(self, &mut builder);
        write_receipt_table(&mut out, builder)?;
        write_receipt_summary(&mut out, self)
    }
}

fn push_receipt_header(builder: &mut Builder) {
    builder.push_record(["Code", "Item", "Qty", "Unit Price", "Cost", "Savings", "Offer"]);
}

fn append_item_rows(receipt: &Receipt, builder: &mut Builder) {
    let currency = receipt.currency;

    for line in &receipt.lines {
        let savings = if line.cost.savings == 0 {
            String::new()
        } else {
            format!("-{}", line.cost.savings_money(currency))
        };

        builder.push_record([
            line.code.to_string(),
            line.name.clone(),
            format!("x{}", line.quantity),
            line.unit_price.to_money(currency).to_string(),
            line.cost.total_money(currency).to_string(),
            savings,
            line.offer.clone().unwrap_or_default(),
        ]);
    }
}

fn write_receipt_table(out: &mut impl io::Write, builder: Builder) -> Result<(), ReceiptError> {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());
    let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(1, separator);

    table.with(theme);
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..6), Alignment::right());

    writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)
}

fn write_receipt_summary(out: &mut impl io::Write, receipt: &Receipt) -> Result<(), ReceiptError> {
    let currency = receipt.currency;
    let percent_points = percent_points_from_fractional_percentage(receipt.savings_percent());

    let rows = [
        ("Subtotal:", Cost::new(receipt.subtotal(), 0).total_money(currency).to_string()),
        ("Total:", receipt.cost.total_money(currency).to_string()),
        (
            "Savings:",
            format!("({percent_points:.2}%) {}", receipt.cost.savings_money(currency)),
        ),
    ];

    let label_width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let value_width = rows.iter().map(|(_, value)| value.len()).max().unwrap_or(0);

    for (label, value) in rows {
        writeln!(out, " {label:>label_width$}  {value:>value_width$}")
            .map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Converts a fractional percentage to percent points for display.
fn percent_points_from_fractional_percentage(percentage: Percentage) -> Decimal {
    ((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2)
}
