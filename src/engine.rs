//! Basket engine
//!
//! [`BasketEngine`] owns one basket bound to one catalogue, prices it, and
//! pushes every change to its registered listeners before returning.
//!
//! A speculative edit session works on a clone: the clone starts with the same
//! basket and catalogue but no listeners, collects edits privately, and is
//! either dropped (discard) or pushed back into the original with
//! [`BasketEngine::copy_to`] (commit), which notifies the original's listeners.

use std::{fmt, rc::Rc};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::{
    basket::{Basket, BasketError},
    catalogue::{Catalogue, CatalogueError, PricingRule},
    codes::ItemCode,
    listeners::{BasketListener, ListenerSet, SignalStrength},
    prices::{Price, Quantity},
    pricing::{Cost, total_cost},
};

/// A prospective transaction: the codes being bought and the unit prices the
/// buyer was shown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Item codes, one entry per unit
    pub codes: Vec<ItemCode>,

    /// Unit price of each code as displayed to the buyer
    pub expected_prices: FxHashMap<ItemCode, Price>,
}

/// Checkout engine: a basket, its catalogue and the listeners following it.
pub struct BasketEngine {
    catalogue: Rc<Catalogue>,
    basket: Basket,
    listeners: ListenerSet,
}

impl BasketEngine {
    /// Create an engine with an empty basket over the given catalogue.
    pub fn new(catalogue: Catalogue) -> Self {
        let basket = Basket::for_catalogue(&catalogue);

        Self {
            catalogue: Rc::new(catalogue),
            basket,
            listeners: ListenerSet::new(),
        }
    }

    /// Create an engine from `(code, rule)` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogueError`] if any rule is invalid; see [`Catalogue::from_rules`].
    pub fn from_rules<S, R>(rules: impl IntoIterator<Item = (S, R)>) -> Result<Self, CatalogueError>
    where
        S: AsRef<str>,
        R: Into<PricingRule>,
    {
        Ok(Self::new(Catalogue::from_rules(rules)?))
    }

    /// Get the catalogue.
    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Get the basket.
    pub fn basket(&self) -> &Basket {
        &self.basket
    }

    /// Add one unit of `code` to the basket and notify listeners.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if `code` is not in the catalogue.
    pub fn scan(&mut self, code: ItemCode, strength: SignalStrength) -> Result<Quantity, BasketError> {
        let quantity = self.basket.increment(code)?;

        debug!(%code, quantity, %strength, "scanned item");

        self.notify(strength);

        Ok(quantity)
    }

    /// Remove one unit of `code` from the basket and notify listeners.
    ///
    /// # Errors
    ///
    /// - [`BasketError::ItemNotFound`] if `code` is not in the catalogue.
    /// - [`BasketError::EmptyCategory`] if there are no units of `code` to
    ///   remove; nothing changes and no notification is sent.
    pub fn unscan(
        &mut self,
        code: ItemCode,
        strength: SignalStrength,
    ) -> Result<Quantity, BasketError> {
        let quantity = self.basket.decrement(code)?;

        debug!(%code, quantity, %strength, "unscanned item");

        self.notify(strength);

        Ok(quantity)
    }

    /// Empty one category, or the whole basket when `code` is `None`, then
    /// notify listeners once.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if `code` is not in the catalogue.
    pub fn clear_basket(
        &mut self,
        code: Option<ItemCode>,
        strength: SignalStrength,
    ) -> Result<(), BasketError> {
        self.basket.clear(code)?;

        match code {
            Some(code) => debug!(%code, %strength, "cleared category"),
            None => debug!(%strength, "cleared basket"),
        }

        self.notify(strength);

        Ok(())
    }

    /// Quantity of `code`, or the number of units in the whole basket when
    /// `code` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::ItemNotFound`] if `code` is not in the catalogue.
    pub fn item_count(&self, code: Option<ItemCode>) -> Result<Quantity, BasketError> {
        match code {
            Some(code) => self.basket.quantity(code),
            None => Ok(self.basket.units()),
        }
    }

    /// Codes with at least one unit in the basket, in catalogue order.
    pub fn populated_categories(&self) -> SmallVec<[ItemCode; 8]> {
        self.basket.populated()
    }

    /// Cost and savings of one category, or of the whole basket when `code` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`BasketError::NotInBasket`] if `code` is not part of the basket.
    pub fn total(&self, code: Option<ItemCode>) -> Result<Cost, BasketError> {
        if let Some(code) = code {
            let quantity = self
                .basket
                .quantity(code)
                .map_err(|_err| BasketError::NotInBasket(code))?;

            let item = self
                .catalogue
                .get(code)
                .ok_or(BasketError::NotInBasket(code))?;

            return Ok(item.cost(quantity));
        }

        Ok(total_cost(self.basket.iter().filter_map(|(code, quantity)| {
            self.catalogue.get(code).map(|item| (item, quantity))
        })))
    }

    /// Price an arbitrary transaction against the catalogue, independently of
    /// the live basket.
    ///
    /// Every code must be in the catalogue, and every expected price must match
    /// the catalogue's current price. Units are tallied per code and priced
    /// with the same multi-buy rules as [`BasketEngine::total`].
    ///
    /// # Errors
    ///
    /// - [`BasketError::ItemNotFound`] if a listed code, or a code in
    ///   `expected_prices`, is not in the catalogue.
    /// - [`BasketError::PriceMismatch`] if an expected price has drifted from
    ///   the catalogue price.
    pub fn price_list(
        &self,
        codes: &[ItemCode],
        expected_prices: &FxHashMap<ItemCode, Price>,
    ) -> Result<u64, BasketError> {
        let mut tally: FxHashMap<ItemCode, Quantity> = FxHashMap::default();

        for &code in codes {
            if !self.catalogue.contains(code) {
                return Err(BasketError::ItemNotFound(code));
            }

            *tally.entry(code).or_default() += 1;
        }

        for (&code, &expected) in expected_prices {
            let actual = self
                .catalogue
                .get(code)
                .ok_or(BasketError::ItemNotFound(code))?
                .unit_price();

            if actual != expected {
                warn!(%code, %expected, %actual, "price drift detected");

                return Err(BasketError::PriceMismatch {
                    code,
                    expected,
                    actual,
                });
            }
        }

        let cost = total_cost(self.catalogue.iter().filter_map(|item| {
            tally
                .get(&item.code())
                .map(|&quantity| (item, quantity))
        }));

        Ok(cost.total)
    }

    /// The live basket expanded into a transaction: each code repeated by its
    /// quantity, in catalogue order, with the catalogue's current prices.
    pub fn pending_transaction(&self) -> Transaction {
        let codes = self
            .basket
            .iter()
            .flat_map(|(code, quantity)| {
                std::iter::repeat_n(code, usize::try_from(quantity).unwrap_or(usize::MAX))
            })
            .collect();

        Transaction {
            codes,
            expected_prices: self.catalogue.prices(),
        }
    }

    /// Price the live basket as a transaction, then empty the basket.
    ///
    /// Returns the amount paid. Listeners are notified once, by the clear.
    ///
    /// # Errors
    ///
    /// Propagates any [`BasketError`] from [`BasketEngine::price_list`]; the
    /// basket is left untouched in that case.
    pub fn complete_transaction(&mut self, strength: SignalStrength) -> Result<u64, BasketError> {
        let transaction = self.pending_transaction();
        let paid = self.price_list(&transaction.codes, &transaction.expected_prices)?;

        debug!(paid, units = transaction.codes.len(), "completed transaction");

        self.clear_basket(None, strength)?;

        Ok(paid)
    }

    /// Register a listener, returning `false` if it was already registered.
    pub fn register(&mut self, listener: Rc<dyn BasketListener>) -> bool {
        self.listeners.insert(listener)
    }

    /// Unregister a listener, returning `false` if it was not registered.
    pub fn unregister<L: ?Sized>(&mut self, listener: &Rc<L>) -> bool {
        self.listeners.remove(listener)
    }

    /// Check whether a listener is registered.
    pub fn is_registered<L: ?Sized>(&self, listener: &Rc<L>) -> bool {
        self.listeners.contains(listener)
    }

    /// Get the number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Invoke every registered listener with this engine and `strength`.
    pub fn notify(&self, strength: SignalStrength) {
        self.listeners.notify(self, strength);
    }

    /// Overwrite `target`'s basket and catalogue with this engine's, then
    /// notify `target`'s listeners with [`SignalStrength::Strong`].
    ///
    /// This engine's listeners are not notified.
    pub fn copy_to(&self, target: &mut BasketEngine) {
        target.catalogue = Rc::clone(&self.catalogue);
        target.basket = self.basket.clone();

        debug!(units = target.basket.units(), "copied basket to target engine");

        target.notify(SignalStrength::Strong);
    }
}

impl Clone for BasketEngine {
    /// An independent copy of the basket and catalogue, with no listeners.
    fn clone(&self) -> Self {
        Self {
            catalogue: Rc::clone(&self.catalogue),
            basket: self.basket.clone(),
            listeners: ListenerSet::new(),
        }
    }
}

impl fmt::Debug for BasketEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasketEngine")
            .field("catalogue", &self.catalogue)
            .field("basket", &self.basket)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use testresult::TestResult;

    use crate::error::ErrorKind;

    use super::*;

    /// Records every notification with the basket total it observed.
    #[derive(Debug, Default)]
    struct Recorder {
        seen: RefCell<Vec<(SignalStrength, Quantity, u64)>>,
    }

    impl BasketListener for Recorder {
        fn on_basket_changed(&self, engine: &BasketEngine, strength: SignalStrength) {
            let units = engine.item_count(None).unwrap_or_default();
            let total = engine.total(None).map(|cost| cost.total).unwrap_or_default();

            self.seen.borrow_mut().push((strength, units, total));
        }
    }

    impl Recorder {
        fn calls(&self) -> usize {
            self.seen.borrow().len()
        }
    }

    fn code(c: char) -> Result<ItemCode, crate::codes::ItemCodeError> {
        ItemCode::new(c)
    }

    fn engine() -> Result<BasketEngine, CatalogueError> {
        BasketEngine::from_rules([
            ("A", [25, 1, 0, 0]),
            ("B", [40, 3, 0, 100]),
            ("P", [30, 3, 2, 0]),
        ])
    }

    #[test]
    fn new_engine_is_empty() -> TestResult {
        let engine = engine()?;

        assert_eq!(engine.item_count(None)?, 0);
        assert!(engine.populated_categories().is_empty());
        assert_eq!(engine.total(None)?, Cost::default());
        assert_eq!(engine.listener_count(), 0);

        Ok(())
    }

    #[test]
    fn scan_notifies_with_fresh_totals() -> TestResult {
        let mut engine = engine()?;
        let recorder = Rc::new(Recorder::default());
        engine.register(recorder.clone());

        engine.scan(code('A')?, SignalStrength::Strong)?;
        engine.scan(code('B')?, SignalStrength::Weak)?;

        assert_eq!(
            *recorder.seen.borrow(),
            vec![
                (SignalStrength::Strong, 1, 25),
                (SignalStrength::Weak, 2, 65)
            ]
        );

        Ok(())
    }

    #[test]
    fn scan_unknown_code_fails_without_notification() -> TestResult {
        let mut engine = engine()?;
        let recorder = Rc::new(Recorder::default());
        engine.register(recorder.clone());

        let err = engine.scan(code('Z')?, SignalStrength::Strong).err();

        assert_eq!(err.as_ref().map(BasketError::kind), Some(ErrorKind::NotFound));
        assert_eq!(recorder.calls(), 0);

        Ok(())
    }

    #[test]
    fn scan_then_unscan_restores_quantity_with_two_notifications() -> TestResult {
        let mut engine = engine()?;
        let recorder = Rc::new(Recorder::default());
        engine.register(recorder.clone());
        let a = code('A')?;

        engine.scan(a, SignalStrength::Strong)?;
        assert_eq!(engine.unscan(a, SignalStrength::Strong)?, 0);

        assert_eq!(engine.item_count(Some(a))?, 0);
        assert_eq!(recorder.calls(), 2);

        Ok(())
    }

    #[test]
    fn unscan_empty_category_is_invalid_state() -> TestResult {
        let mut engine = engine()?;
        let recorder = Rc::new(Recorder::default());
        engine.register(recorder.clone());
        let p = code('P')?;

        let err = engine.unscan(p, SignalStrength::Strong).err();

        assert_eq!(err, Some(BasketError::EmptyCategory(p)));
        assert_eq!(err.as_ref().map(BasketError::kind), Some(ErrorKind::InvalidState));
        assert_eq!(engine.item_count(Some(p))?, 0);
        assert_eq!(recorder.calls(), 0);

        Ok(())
    }

    #[test]
    fn clear_basket_notifies_once() -> TestResult {
        let mut engine = engine()?;
        let a = code('A')?;
        let b = code('B')?;

        engine.scan(a, SignalStrength::Strong)?;
        engine.scan(b, SignalStrength::Strong)?;
        engine.scan(b, SignalStrength::Strong)?;

        let recorder = Rc::new(Recorder::default());
        engine.register(recorder.clone());

        engine.clear_basket(Some(b), SignalStrength::Weak)?;
        assert_eq!(engine.item_count(None)?, 1);

        engine.clear_basket(None, SignalStrength::Strong)?;
        assert_eq!(engine.item_count(None)?, 0);
        assert_eq!(engine.item_count(Some(a))?, 0);

        assert_eq!(
            *recorder.seen.borrow(),
            vec![(SignalStrength::Weak, 1, 25), (SignalStrength::Strong, 0, 0)]
        );

        Ok(())
    }

    #[test]
    fn item_count_unknown_code_is_not_found() -> TestResult {
        let engine = engine()?;
        let z = code('Z')?;

        assert_eq!(engine.item_count(Some(z)), Err(BasketError::ItemNotFound(z)));

        Ok(())
    }

    #[test]
    fn total_for_one_category() -> TestResult {
        let mut engine = engine()?;
        let p = code('P')?;

        for _ in 0..4 {
            engine.scan(p, SignalStrength::Weak)?;
        }

        assert_eq!(engine.total(Some(p))?, Cost::new(90, 30));

        Ok(())
    }

    #[test]
    fn total_outside_basket_is_invalid_argument() -> TestResult {
        let engine = engine()?;
        let z = code('Z')?;

        let err = engine.total(Some(z)).err();

        assert_eq!(err, Some(BasketError::NotInBasket(z)));
        assert_eq!(err.as_ref().map(BasketError::kind), Some(ErrorKind::InvalidArgument));

        Ok(())
    }

    #[test]
    fn register_twice_notifies_once() -> TestResult {
        let mut engine = engine()?;
        let recorder = Rc::new(Recorder::default());

        assert!(engine.register(recorder.clone()));
        assert!(!engine.register(recorder.clone()));

        engine.notify(SignalStrength::Strong);

        assert_eq!(recorder.calls(), 1);

        Ok(())
    }

    #[test]
    fn unregister_stops_notifications() -> TestResult {
        let mut engine = engine()?;
        let recorder = Rc::new(Recorder::default());
        engine.register(recorder.clone());

        assert!(engine.unregister(&recorder));
        assert!(!engine.unregister(&recorder));
        assert!(!engine.is_registered(&recorder));

        engine.scan(code('A')?, SignalStrength::Strong)?;

        assert_eq!(recorder.calls(), 0);

        Ok(())
    }

    #[test]
    fn clone_copies_state_but_not_listeners() -> TestResult {
        let mut original = engine()?;
        let recorder = Rc::new(Recorder::default());
        original.register(recorder.clone());
        original.scan(code('B')?, SignalStrength::Strong)?;

        let mut copy = original.clone();

        assert_eq!(copy.listener_count(), 0);
        assert_eq!(copy.item_count(None)?, 1);

        copy.scan(code('B')?, SignalStrength::Weak)?;

        assert_eq!(original.item_count(None)?, 1);
        assert_eq!(recorder.calls(), 1);

        Ok(())
    }

    #[test]
    fn copy_to_notifies_target_listeners_only() -> TestResult {
        let mut source = engine()?;
        let mut target = engine()?;
        let source_listener = Rc::new(Recorder::default());
        let target_listener = Rc::new(Recorder::default());
        source.register(source_listener.clone());
        target.register(target_listener.clone());

        source.scan(code('A')?, SignalStrength::Strong)?;
        source.copy_to(&mut target);

        assert_eq!(source_listener.calls(), 1);
        assert_eq!(
            *target_listener.seen.borrow(),
            vec![(SignalStrength::Strong, 1, 25)]
        );
        assert_eq!(target.total(None)?, source.total(None)?);
        assert_eq!(target.listener_count(), 1);

        Ok(())
    }

    #[test]
    fn pending_transaction_expands_basket() -> TestResult {
        let mut engine = engine()?;
        let a = code('A')?;
        let b = code('B')?;

        engine.scan(b, SignalStrength::Strong)?;
        engine.scan(a, SignalStrength::Strong)?;
        engine.scan(b, SignalStrength::Strong)?;

        let transaction = engine.pending_transaction();

        assert_eq!(transaction.codes, vec![a, b, b]);
        assert_eq!(transaction.expected_prices.get(&b), Some(&Price::new(40)));

        Ok(())
    }

    #[test]
    fn complete_transaction_pays_and_clears() -> TestResult {
        let mut engine = engine()?;
        let recorder = Rc::new(Recorder::default());
        let b = code('B')?;

        for _ in 0..3 {
            engine.scan(b, SignalStrength::Strong)?;
        }

        engine.register(recorder.clone());

        assert_eq!(engine.complete_transaction(SignalStrength::Strong)?, 100);
        assert_eq!(engine.item_count(None)?, 0);
        assert_eq!(recorder.calls(), 1);

        Ok(())
    }

    #[test]
    fn price_list_rejects_unknown_codes() -> TestResult {
        let engine = engine()?;
        let z = code('Z')?;

        assert_eq!(
            engine.price_list(&[z], &FxHashMap::default()),
            Err(BasketError::ItemNotFound(z))
        );

        let mut expected = FxHashMap::default();
        expected.insert(z, Price::new(25));

        assert_eq!(
            engine.price_list(&[code('A')?], &expected),
            Err(BasketError::ItemNotFound(z))
        );

        Ok(())
    }

    #[test]
    fn price_list_rejects_drifted_prices() -> TestResult {
        let engine = engine()?;
        let a = code('A')?;
        let mut expected = FxHashMap::default();
        expected.insert(a, Price::new(100));

        let err = engine.price_list(&[a], &expected).err();

        assert_eq!(
            err,
            Some(BasketError::PriceMismatch {
                code: a,
                expected: Price::new(100),
                actual: Price::new(25),
            })
        );
        assert_eq!(err.as_ref().map(BasketError::kind), Some(ErrorKind::PriceMismatch));

        Ok(())
    }

    #[test]
    fn debug_shows_listener_count() -> TestResult {
        let mut engine = engine()?;
        engine.register(Rc::new(Recorder::default()));

        assert!(format!("{engine:?}").contains("listeners: 1"));

        Ok(())
    }

    #[test]
    fn listener_sees_post_decrement_state_once() -> TestResult {
        #[derive(Debug, Default)]
        struct Last(Cell<Option<Quantity>>);

        impl BasketListener for Last {
            fn on_basket_changed(&self, engine: &BasketEngine, _: SignalStrength) {
                self.0.set(engine.item_count(None).ok());
            }
        }

        let mut engine = engine()?;
        let last = Rc::new(Last::default());
        engine.register(last.clone());
        let a = code('A')?;

        engine.scan(a, SignalStrength::Strong)?;
        engine.scan(a, SignalStrength::Strong)?;
        engine.unscan(a, SignalStrength::Weak)?;

        assert_eq!(last.0.get(), Some(1));

        Ok(())
    }
}
