//! Catalogue
//!
//! A catalogue maps each item code to its [`PricedItem`]. It is validated once,
//! at construction, and never changes afterwards.

use std::collections::{BTreeMap, btree_map::Entry};

use rustc_hash::FxHashMap;
use rusty_money::iso::{Currency, GBP};
use thiserror::Error;

use crate::{
    codes::{ItemCode, ItemCodeError},
    error::ErrorKind,
    items::PricedItem,
    prices::{Price, Quantity},
    promotions::Promotion,
};

/// Errors raised while building a catalogue.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogueError {
    /// No entries were supplied.
    #[error("catalogue must contain at least one item")]
    Empty,

    /// An entry key is not a valid item code.
    #[error(transparent)]
    MalformedCode(#[from] ItemCodeError),

    /// A rule did not have exactly four fields.
    #[error("pricing rule must have 4 fields (price, group size, offer quantity, offer price), got {0}")]
    RuleArity(usize),

    /// The same code was supplied twice.
    #[error("item {0} appears more than once")]
    DuplicateCode(ItemCode),

    /// Unit price was zero or negative.
    #[error("item {0} has non-positive price {1}")]
    NonPositivePrice(ItemCode, i64),

    /// Multi-buy group size was zero or negative.
    #[error("item {0} has non-positive multi-buy group size {1}")]
    NonPositiveGroupSize(ItemCode, i64),

    /// One of the offer fields was negative.
    #[error("item {0} has a negative offer field")]
    NegativeOffer(ItemCode),

    /// Both the offer quantity and the offer price were set.
    #[error("item {0} sets both an offer quantity and an offer price")]
    ConflictingOffers(ItemCode),

    /// A complete group would cost more with the offer than without it.
    #[error("item {0} has an offer that costs more than the full price")]
    OfferExceedsFullPrice(ItemCode),
}

impl CatalogueError {
    /// Taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogueError::MalformedCode(_) | CatalogueError::RuleArity(_) => {
                ErrorKind::InvalidArgument
            }
            CatalogueError::Empty
            | CatalogueError::DuplicateCode(_)
            | CatalogueError::NonPositivePrice(..)
            | CatalogueError::NonPositiveGroupSize(..)
            | CatalogueError::NegativeOffer(_)
            | CatalogueError::ConflictingOffers(_)
            | CatalogueError::OfferExceedsFullPrice(_) => ErrorKind::InvalidConfiguration,
        }
    }
}

/// Raw pricing rule: `[unit price, group size, offer quantity charged, offer group price]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingRule {
    /// Unit price in minor units
    pub unit_price: i64,

    /// Multi-buy group size (`1` for no grouping)
    pub group_size: i64,

    /// Units charged per group, `0` if unused
    pub offer_quantity_charged: i64,

    /// Price per group, `0` if unused
    pub offer_group_price: i64,
}

impl PricingRule {
    /// Creates a rule from its four fields.
    pub const fn new(
        unit_price: i64,
        group_size: i64,
        offer_quantity_charged: i64,
        offer_group_price: i64,
    ) -> Self {
        Self {
            unit_price,
            group_size,
            offer_quantity_charged,
            offer_group_price,
        }
    }

    /// Validates the rule and builds the catalogue entry for `code`.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogueError`] describing the first violated invariant.
    pub fn into_item(self, code: ItemCode, name: String) -> Result<PricedItem, CatalogueError> {
        let unit_price = positive(self.unit_price)
            .ok_or(CatalogueError::NonPositivePrice(code, self.unit_price))?;

        let group_size = positive(self.group_size)
            .ok_or(CatalogueError::NonPositiveGroupSize(code, self.group_size))?;

        let (Ok(charged), Ok(group_price)) = (
            u64::try_from(self.offer_quantity_charged),
            u64::try_from(self.offer_group_price),
        ) else {
            return Err(CatalogueError::NegativeOffer(code));
        };

        let promotion = match (charged, group_price) {
            (0, 0) => Promotion::None,
            (_, 0) => Promotion::PayFor {
                group_size,
                charged,
            },
            (0, _) => Promotion::GroupPrice {
                group_size,
                price: Price::new(group_price),
            },
            _ => return Err(CatalogueError::ConflictingOffers(code)),
        };

        // A group of one can never be discounted.
        let promotion = if group_size == 1 {
            Promotion::None
        } else {
            promotion
        };

        if let Some((size, group_cost)) = promotion.group_cost(Price::new(unit_price)) {
            if group_cost > unit_price.saturating_mul(size) {
                return Err(CatalogueError::OfferExceedsFullPrice(code));
            }
        }

        Ok(PricedItem::with_name(
            code,
            name,
            Price::new(unit_price),
            promotion,
        ))
    }
}

impl From<[i64; 4]> for PricingRule {
    fn from([unit_price, group_size, charged, group_price]: [i64; 4]) -> Self {
        PricingRule::new(unit_price, group_size, charged, group_price)
    }
}

impl TryFrom<&[i64]> for PricingRule {
    type Error = CatalogueError;

    fn try_from(fields: &[i64]) -> Result<Self, Self::Error> {
        <[i64; 4]>::try_from(fields)
            .map(PricingRule::from)
            .map_err(|_err| CatalogueError::RuleArity(fields.len()))
    }
}

fn positive(value: i64) -> Option<Quantity> {
    u64::try_from(value).ok().filter(|value| *value > 0)
}

/// Immutable mapping from item code to [`PricedItem`], iterated in code order.
///
/// The order in which entries were supplied is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    items: BTreeMap<ItemCode, PricedItem>,
    currency: &'static Currency,
}

impl Catalogue {
    /// Builds a catalogue from `(code, rule)` pairs, validating every rule.
    ///
    /// # Errors
    ///
    /// - [`CatalogueError::Empty`] if no rules are given.
    /// - [`CatalogueError::MalformedCode`] if a code is not a single character.
    /// - [`CatalogueError::DuplicateCode`] if a code appears twice.
    /// - any rule violation reported by [`PricingRule::into_item`].
    pub fn from_rules<S, R>(rules: impl IntoIterator<Item = (S, R)>) -> Result<Self, CatalogueError>
    where
        S: AsRef<str>,
        R: Into<PricingRule>,
    {
        let items = rules
            .into_iter()
            .map(|(code, rule)| -> Result<PricedItem, CatalogueError> {
                let code: ItemCode = code.as_ref().parse()?;
                let rule: PricingRule = rule.into();

                rule.into_item(code, code.to_string())
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_items(items)
    }

    /// Builds a catalogue from already validated items.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogueError::Empty`] for no items, or
    /// [`CatalogueError::DuplicateCode`] if two items share a code.
    pub fn from_items(items: impl IntoIterator<Item = PricedItem>) -> Result<Self, CatalogueError> {
        let mut map = BTreeMap::new();

        for item in items {
            match map.entry(item.code()) {
                Entry::Vacant(slot) => {
                    slot.insert(item);
                }
                Entry::Occupied(slot) => return Err(CatalogueError::DuplicateCode(*slot.key())),
            }
        }

        if map.is_empty() {
            return Err(CatalogueError::Empty);
        }

        Ok(Self {
            items: map,
            currency: GBP,
        })
    }

    /// Returns the catalogue priced in a different display currency.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Get the entry for a code.
    pub fn get(&self, code: ItemCode) -> Option<&PricedItem> {
        self.items.get(&code)
    }

    /// Check whether a code is in the catalogue.
    pub fn contains(&self, code: ItemCode) -> bool {
        self.items.contains_key(&code)
    }

    /// Iterate over the entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = &PricedItem> {
        self.items.values()
    }

    /// Iterate over the codes in code order.
    pub fn codes(&self) -> impl Iterator<Item = ItemCode> + '_ {
        self.items.keys().copied()
    }

    /// Current unit price of every code.
    pub fn prices(&self) -> FxHashMap<ItemCode, Price> {
        self.iter()
            .map(|item| (item.code(), item.unit_price()))
            .collect()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; an empty catalogue cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the display currency of the catalogue.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}
