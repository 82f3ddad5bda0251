//! Basket

use std::collections::BTreeMap;

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    catalogue::Catalogue,
    codes::ItemCode,
    error::ErrorKind,
    prices::{Price, Quantity},
};

/// Errors related to basket mutation, queries and pricing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BasketError {
    /// The code is not in the catalogue.
    #[error("Item {0} not found")]
    ItemNotFound(ItemCode),

    /// A total was requested for a code outside the basket.
    #[error("Item {0} is not part of the basket")]
    NotInBasket(ItemCode),

    /// An item was removed from a category that is already empty.
    #[error("Item {0} has no units left to remove")]
    EmptyCategory(ItemCode),

    /// A caller-supplied price differs from the catalogue price.
    #[error("Item {code} expected at {expected}, but catalogue price is {actual}")]
    PriceMismatch {
        /// Code whose price drifted
        code: ItemCode,

        /// Price the caller expected
        expected: Price,

        /// Current catalogue price
        actual: Price,
    },
}

impl BasketError {
    /// Taxonomy kind for this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BasketError::ItemNotFound(_) => ErrorKind::NotFound,
            BasketError::NotInBasket(_) => ErrorKind::InvalidArgument,
            BasketError::EmptyCategory(_) => ErrorKind::InvalidState,
            BasketError::PriceMismatch { .. } => ErrorKind::PriceMismatch,
        }
    }
}

/// Quantity of every catalogue code currently selected.
///
/// The basket always holds exactly the catalogue's codes, each with an
/// explicit (possibly zero) quantity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Basket {
    quantities: BTreeMap<ItemCode, Quantity>,
}

impl Basket {
    /// Create an empty basket for every code in the catalogue.
    pub fn for_catalogue(catalogue: &Catalogue) -> Self {
        Basket {
            quantities: catalogue.codes().map(|code| (code, 0)).collect(),
        }
    }

    /// Get the quantity of a code.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if the code is not in the basket.
    pub fn quantity(&self, code: ItemCode) -> Result<Quantity, BasketError> {
        self.quantities
            .get(&code)
            .copied()
            .ok_or(BasketError::ItemNotFound(code))
    }

    /// Add one unit of a code, returning the new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if the code is not in the basket.
    pub fn increment(&mut self, code: ItemCode) -> Result<Quantity, BasketError> {
        let quantity = self.slot(code)?;
        *quantity = quantity.saturating_add(1);

        Ok(*quantity)
    }

    /// Remove one unit of a code, returning the new quantity.
    ///
    /// # Errors
    ///
    /// - [`BasketError::ItemNotFound`] if the code is not in the basket.
    /// - [`BasketError::EmptyCategory`] if the quantity is already zero.
    pub fn decrement(&mut self, code: ItemCode) -> Result<Quantity, BasketError> {
        let quantity = self.slot(code)?;

        if *quantity == 0 {
            return Err(BasketError::EmptyCategory(code));
        }

        *quantity -= 1;

        Ok(*quantity)
    }

    /// Set the quantity of one code, or of every code, to zero.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if the code is not in the basket.
    pub fn clear(&mut self, code: Option<ItemCode>) -> Result<(), BasketError> {
        match code {
            Some(code) => *self.slot(code)? = 0,
            None => self.quantities.values_mut().for_each(|quantity| *quantity = 0),
        }

        Ok(())
    }

    /// Total number of units across every code.
    pub fn units(&self) -> Quantity {
        self.quantities.values().sum()
    }

    /// Codes with a non-zero quantity, in code order.
    pub fn populated(&self) -> SmallVec<[ItemCode; 8]> {
        self.iter()
            .filter(|(_, quantity)| *quantity > 0)
            .map(|(code, _)| code)
            .collect()
    }

    /// Iterate over `(code, quantity)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemCode, Quantity)> + '_ {
        self.quantities
            .iter()
            .map(|(code, quantity)| (*code, *quantity))
    }

    /// Check whether the basket has no units at all.
    pub fn is_empty(&self) -> bool {
        self.units() == 0
    }

    fn slot(&mut self, code: ItemCode) -> Result<&mut Quantity, BasketError> {
        self.quantities
            .get_mut(&code)
            .ok_or(BasketError::ItemNotFound(code))
    }
}
