//! Items

use crate::{
    codes::ItemCode,
    prices::{Price, Quantity},
    pricing::Cost,
    promotions::Promotion,
};

/// An immutable catalogue entry: a code, a unit price and a multi-buy promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedItem {
    code: ItemCode,
    name: String,
    unit_price: Price,
    promotion: Promotion,
}

impl PricedItem {
    /// Creates a new item named after its code.
    pub fn new(code: ItemCode, unit_price: Price, promotion: Promotion) -> Self {
        Self::with_name(code, code.to_string(), unit_price, promotion)
    }

    /// Creates a new item with a display name.
    pub fn with_name(
        code: ItemCode,
        name: impl Into<String>,
        unit_price: Price,
        promotion: Promotion,
    ) -> Self {
        Self {
            code,
            name: name.into(),
            unit_price,
            promotion,
        }
    }

    /// Returns the code of the item
    pub fn code(&self) -> ItemCode {
        self.code
    }

    /// Returns the display name of the item
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of a single unit
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Returns the multi-buy promotion
    pub fn promotion(&self) -> &Promotion {
        &self.promotion
    }

    /// Size of the promotion group (`1` means no grouping).
    pub fn multibuy_group_size(&self) -> Quantity {
        self.promotion.group_size()
    }

    /// Units charged per group for "N for the price of K" offers, otherwise `0`.
    pub fn offer_quantity_charged(&self) -> Quantity {
        self.promotion.quantity_charged()
    }

    /// Price per group for "N for a fixed price" offers, otherwise zero.
    pub fn offer_group_price(&self) -> Price {
        self.promotion.group_price()
    }

    /// Human-readable offer text, or `None` if the item has no promotion.
    pub fn offer_description(&self) -> Option<String> {
        match self.promotion {
            Promotion::None => None,
            Promotion::PayFor { .. } | Promotion::GroupPrice { .. } => {
                Some(self.promotion.to_string())
            }
        }
    }

    /// Calculates the cost of `quantity` units, applying the promotion to
    /// every complete group and charging the remainder at full price.
    pub fn cost(&self, quantity: Quantity) -> Cost {
        let full_price = self.unit_price.saturating_mul(quantity);

        let total = match self.promotion.group_cost(self.unit_price) {
            Some((group_size, group_cost)) if group_size > 1 => {
                let full_groups = quantity / group_size;
                let remainder = quantity % group_size;

                group_cost
                    .saturating_mul(full_groups)
                    .saturating_add(self.unit_price.saturating_mul(remainder))
            }
            _ => full_price,
        };

        Cost::new(total, full_price.saturating_sub(total))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn pear() -> Result<PricedItem, crate::codes::ItemCodeError> {
        Ok(PricedItem::with_name(
            ItemCode::new('P')?,
            "Pear",
            Price::new(30),
            Promotion::PayFor {
                group_size: 3,
                charged: 2,
            },
        ))
    }

    fn banana() -> Result<PricedItem, crate::codes::ItemCodeError> {
        Ok(PricedItem::new(
            ItemCode::new('B')?,
            Price::new(40),
            Promotion::GroupPrice {
                group_size: 3,
                price: Price::new(100),
            },
        ))
    }

    #[test]
    fn zero_quantity_costs_nothing() -> TestResult {
        assert_eq!(pear()?.cost(0), Cost::new(0, 0));
        assert_eq!(banana()?.cost(0), Cost::new(0, 0));

        Ok(())
    }

    #[test]
    fn below_group_threshold_is_full_price() -> TestResult {
        assert_eq!(pear()?.cost(2), Cost::new(60, 0));

        Ok(())
    }

    #[test]
    fn promotion_applies_to_every_complete_group() -> TestResult {
        // Two discounted groups of three, plus one unit at full price.
        assert_eq!(pear()?.cost(7), Cost::new(150, 60));
        assert_eq!(banana()?.cost(7), Cost::new(240, 40));

        Ok(())
    }

    #[test]
    fn no_promotion_charges_every_unit() -> TestResult {
        let apple = PricedItem::new(ItemCode::new('A')?, Price::new(25), Promotion::None);

        assert_eq!(apple.cost(4), Cost::new(100, 0));
        assert_eq!(apple.multibuy_group_size(), 1);
        assert_eq!(apple.offer_description(), None);

        Ok(())
    }

    #[test]
    fn total_plus_savings_is_full_price() -> TestResult {
        for item in [pear()?, banana()?] {
            for quantity in 0..=20 {
                let cost = item.cost(quantity);

                assert_eq!(
                    cost.total + cost.savings,
                    quantity * *item.unit_price(),
                    "quantity {quantity} of {}",
                    item.code()
                );
            }
        }

        Ok(())
    }

    #[test]
    fn grouping_is_exhaustive() -> TestResult {
        for item in [pear()?, banana()?] {
            let group_size = item.multibuy_group_size();

            for quantity in 0..=20 {
                let grouped = group_size * (quantity / group_size);
                let remainder = quantity % group_size;

                assert_eq!(
                    item.cost(quantity).total,
                    item.cost(grouped).total + item.cost(remainder).total,
                    "quantity {quantity} of {}",
                    item.code()
                );
            }
        }

        Ok(())
    }

    #[test]
    fn raw_offer_accessors_reflect_promotion() -> TestResult {
        let pear = pear()?;
        let banana = banana()?;

        assert_eq!(pear.name(), "Pear");
        assert_eq!(pear.offer_quantity_charged(), 2);
        assert_eq!(pear.offer_group_price(), Price::default());
        assert_eq!(banana.name(), "B");
        assert_eq!(banana.offer_quantity_charged(), 0);
        assert_eq!(banana.offer_group_price(), Price::new(100));
        assert_eq!(
            banana.offer_description().as_deref(),
            Some("Get 3 for 100p")
        );

        Ok(())
    }
}
