use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::errors::OrderBookError;
use crate::order::Order;
use crate::price_heap::PriceHeap;
use crate::price_level::PriceLevel;
use crate::side::Side;

/// One side of the book: a [`PriceHeap`] giving O(log n) best-price
/// discovery plus a `HashMap` from price to its [`PriceLevel`].
///
/// The heap and map are kept in lockstep: a price is in the heap iff its
/// level exists in the map and is non-empty. A level that empties itself
/// during `trade_volume` is removed from both.
#[derive(Debug, Clone)]
pub struct Mbl {
    side: Side,
    heap: PriceHeap,
    levels: HashMap<Decimal, PriceLevel>,
}

impl Mbl {
    pub fn new(side: Side) -> Self {
        Mbl {
            side,
            heap: PriceHeap::new(side),
            levels: HashMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn depth(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains_price(&self, price: Decimal) -> bool {
        self.levels.contains_key(&price)
    }

    pub fn best_price(&self) -> Decimal {
        self.heap.best_price()
    }

    pub fn top_prices(&self, n: usize) -> Vec<Decimal> {
        self.heap.top(n)
    }

    /// Public wrapper over the marketability test, used by
    /// `OrderBook::overlap_levels` which needs it from outside this module.
    pub fn qualifies(&self, price: Decimal, limit: Decimal) -> bool {
        self.level_is_marketable(price, limit)
    }

    pub fn best_level(&self) -> Option<&PriceLevel> {
        self.levels.get(&self.heap.best_price())
    }

    fn best_level_mut(&mut self) -> Option<&mut PriceLevel> {
        let price = self.heap.best_price();
        self.levels.get_mut(&price)
    }

    pub fn level(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    /// Creates an empty level at `price` if one does not already exist.
    pub fn append_level(&mut self, price: Decimal) {
        if !self.levels.contains_key(&price) {
            self.levels.insert(price, PriceLevel::new(price));
            self.heap.push(price);
        }
    }

    /// Removes `price`'s level entirely, discarding any resting orders.
    pub fn delete_level(&mut self, price: Decimal) {
        if self.levels.remove(&price).is_some() {
            self.heap.remove(price);
        }
    }

    /// Removes and returns the best level, if any.
    pub fn pop_level(&mut self) -> Option<PriceLevel> {
        let price = self.heap.pop()?;
        self.levels.remove(&price)
    }

    /// Adds `order` to its price's level, creating the level if needed.
    pub fn add_order(&mut self, order: Order) -> Result<usize, OrderBookError> {
        let price = order.price;
        self.append_level(price);
        let level = self.levels.get_mut(&price).expect("just appended");
        level.push_order(order)
    }

    pub fn remove_order(&mut self, price: Decimal, order_id: &str) -> Result<Order, OrderBookError> {
        let level = self
            .levels
            .get_mut(&price)
            .ok_or_else(|| OrderBookError::NotFound {
                order_id: order_id.to_string(),
            })?;
        let removed = level.remove_order_by_id(order_id)?;
        if level.is_empty() {
            self.delete_level(price);
        }
        Ok(removed)
    }

    pub fn modify_order(&mut self, price: Decimal, new_order: Order) -> Result<Option<usize>, OrderBookError> {
        let level = self
            .levels
            .get_mut(&price)
            .ok_or_else(|| OrderBookError::NotFound {
                order_id: new_order.order_id.clone(),
            })?;
        level.modify_order(new_order)
    }

    /// Sweeps `volume` off the best level(s), walking toward the worst price
    /// until the demand is exhausted or the side empties. Any level fully
    /// drained along the way is removed from both the heap and the map.
    ///
    /// Returns `(remaining, consumed)` where `consumed` is ordered
    /// best-price-first, then FIFO within each level, and each entry pairs
    /// the (possibly still-resting, now-reduced) maker order with the qty
    /// taken from it in this call.
    pub fn trade_volume(&mut self, volume: u64) -> (u64, Vec<(Order, u64)>) {
        let limit = match self.side {
            Side::Sell => Decimal::MAX,
            Side::Buy => Decimal::MIN,
        };
        self.trade_volume_up_to(volume, limit)
    }

    /// True when a resting price on this (contra) side is marketable
    /// against an aggressor's `limit` price: a Sell level is marketable iff
    /// its price is at-or-below a Buy aggressor's limit; a Buy level is
    /// marketable iff its price is at-or-above a Sell aggressor's limit.
    fn level_is_marketable(&self, price: Decimal, limit: Decimal) -> bool {
        match self.side {
            Side::Sell => price <= limit,
            Side::Buy => price >= limit,
        }
    }

    /// Like [`Mbl::trade_volume`] but stops consuming once the best
    /// remaining level's price no longer qualifies against `limit` — the
    /// core of `OrderBook::place`'s cross-consumption for a Limit order.
    pub fn trade_volume_up_to(&mut self, volume: u64, limit: Decimal) -> (u64, Vec<(Order, u64)>) {
        let mut remaining = volume;
        let mut consumed = Vec::new();

        while remaining > 0 && !self.is_empty() {
            if !self.level_is_marketable(self.best_price(), limit) {
                break;
            }

            let (level_remaining, mut filled) = {
                let level = self.best_level_mut().expect("heap non-empty implies level present");
                level.trade_volume(remaining)
            };
            consumed.append(&mut filled);

            let drained = self
                .best_level()
                .map(|level| level.is_empty())
                .unwrap_or(true);
            if drained {
                self.pop_level();
            }

            if level_remaining == remaining {
                // Nothing could be taken from the best level (shouldn't
                // happen if it was non-empty) — avoid looping forever.
                break;
            }
            remaining = level_remaining;
        }

        (remaining, consumed)
    }

    /// Total liquidity available at prices that qualify against `limit`,
    /// without mutating anything — used for a `FillOrKill` precheck.
    pub fn marketable_volume_up_to(&self, limit: Decimal) -> u64 {
        let mut total = 0u64;
        for price in self.heap.top(self.heap.len()) {
            if !self.level_is_marketable(price, limit) {
                break;
            }
            if let Some(level) = self.levels.get(&price) {
                total += level.size();
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NewOrderRequest;
    use crate::timestamp::Timestamp;

    fn mk(id: &str, side: Side, price: &str, qty: u64, t: i64) -> Order {
        let req = NewOrderRequest::limit(id, "BTCUSD", side, price.parse().unwrap(), qty);
        Order::from_request(req, Timestamp::from_millis(t)).unwrap()
    }

    fn p(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn add_order_creates_level_and_tracks_best_price() {
        let mut mbl = Mbl::new(Side::Buy);
        mbl.add_order(mk("A", Side::Buy, "100", 5, 1)).unwrap();
        mbl.add_order(mk("B", Side::Buy, "105", 5, 2)).unwrap();
        assert_eq!(mbl.best_price(), p("105"));
        assert_eq!(mbl.depth(), 2);
    }

    #[test]
    fn remove_order_deletes_emptied_level() {
        let mut mbl = Mbl::new(Side::Buy);
        mbl.add_order(mk("A", Side::Buy, "100", 5, 1)).unwrap();
        mbl.remove_order(p("100"), "A").unwrap();
        assert!(mbl.is_empty());
        assert!(!mbl.contains_price(p("100")));
    }

    #[test]
    fn trade_volume_sweeps_across_levels_best_first() {
        let mut mbl = Mbl::new(Side::Sell);
        mbl.add_order(mk("A", Side::Sell, "100", 5, 1)).unwrap();
        mbl.add_order(mk("B", Side::Sell, "101", 5, 2)).unwrap();

        let (remaining, consumed) = mbl.trade_volume(8);
        assert_eq!(remaining, 0);
        assert_eq!(consumed.len(), 2);
        assert_eq!(consumed[0].0.order_id, "A");
        assert_eq!(consumed[0].0.leaves_qty, 0);
        assert_eq!(consumed[0].1, 5);
        assert_eq!(consumed[1].0.order_id, "B");
        assert_eq!(consumed[1].0.leaves_qty, 2);
        assert_eq!(consumed[1].1, 3);

        assert_eq!(mbl.depth(), 1);
        assert_eq!(mbl.best_price(), p("101"));
    }

    #[test]
    fn trade_volume_exceeding_total_liquidity_leaves_remainder() {
        let mut mbl = Mbl::new(Side::Sell);
        mbl.add_order(mk("A", Side::Sell, "100", 5, 1)).unwrap();
        let (remaining, consumed) = mbl.trade_volume(20);
        assert_eq!(remaining, 15);
        assert_eq!(consumed.len(), 1);
        assert!(mbl.is_empty());
    }

    #[test]
    fn pop_level_returns_best_and_removes_it() {
        let mut mbl = Mbl::new(Side::Buy);
        mbl.add_order(mk("A", Side::Buy, "100", 5, 1)).unwrap();
        mbl.add_order(mk("B", Side::Buy, "105", 5, 2)).unwrap();
        let popped = mbl.pop_level().unwrap();
        assert_eq!(popped.level_price(), p("105"));
        assert_eq!(mbl.best_price(), p("100"));
    }
}
