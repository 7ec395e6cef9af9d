use std::collections::HashMap;
use std::ops::Index;

use rust_decimal::Decimal;

use crate::config::OrderBookConfig;
use crate::errors::OrderBookError;
use crate::mbl::Mbl;
use crate::normalize::{decimal_from_f64, normalize_price};
use crate::order::Order;
use crate::order_type::{OrderType, TimeCondition};
use crate::price_level::PriceLevel;
use crate::side::Side;
use crate::status::OrderStatus;
use crate::trade::{Fill, TickDirection, Trade};

/// Emitted by [`OrderBook::place`]: the (possibly updated) order, the
/// granular per-maker [`Fill`]s it generated, and the tape-level [`Trade`]s
/// (one per fill, carrying `tickDirection` relative to the book's last
/// print) for any downstream market-data consumer.
#[derive(Debug, Clone)]
pub struct PlaceReport {
    pub order: Order,
    pub fills: Vec<Fill>,
    pub trades: Vec<Trade>,
    pub remaining_qty: u64,
}

/// The external facade: two [`Mbl`]s (Buy/Sell) plus an `orderID -> (side,
/// price)` index giving O(1) cancel/amend lookups, per spec.md §4.4.
///
/// Invariant upheld across every public method returning successfully:
/// the book is never crossed at rest (`buy.best_price < sell.best_price`,
/// or one side is empty).
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: String,
    tick_price: Decimal,
    max_depth: i64,
    buy: Mbl,
    sell: Mbl,
    index: HashMap<String, (Side, Decimal)>,
    match_seq: u64,
    last_trade: Option<(Decimal, TickDirection)>,
}

impl OrderBook {
    pub fn new(config: OrderBookConfig) -> Self {
        OrderBook {
            symbol: config.symbol,
            tick_price: config.tick_price,
            max_depth: config.max_depth,
            buy: Mbl::new(Side::Buy),
            sell: Mbl::new(Side::Sell),
            index: HashMap::new(),
            match_seq: 0,
            last_trade: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn tick_price(&self) -> Decimal {
        self.tick_price
    }

    pub fn max_depth(&self) -> i64 {
        self.max_depth
    }

    fn mbl(&self, side: Side) -> &Mbl {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    fn mbl_mut(&mut self, side: Side) -> &mut Mbl {
        match side {
            Side::Buy => &mut self.buy,
            Side::Sell => &mut self.sell,
        }
    }

    fn next_match_id(&mut self, order_id: &str) -> String {
        self.match_seq += 1;
        format!("{order_id}-{}", self.match_seq)
    }

    /// The aggressive-consumption limit a marketable order is allowed to
    /// trade up to: the book-best-possible price for `Market`, else the
    /// order's own normalized limit price.
    fn effective_limit(order: &Order) -> Decimal {
        match order.ord_type {
            OrderType::Market => match order.side {
                Side::Buy => Decimal::MAX,
                Side::Sell => Decimal::ZERO,
            },
            _ => order.price,
        }
    }

    /// The aggregate new-order entry point: normalizes price, consumes
    /// marketable contra-side liquidity in price-time order, then rests any
    /// remainder per the order's time-in-force. See spec.md §4.4.
    pub fn place(&mut self, mut order: Order) -> Result<PlaceReport, OrderBookError> {
        if self.index.contains_key(&order.order_id) {
            return Err(OrderBookError::DuplicateOrder {
                order_id: order.order_id,
            });
        }

        order.price = normalize_price(order.price, self.tick_price)?;
        let limit = Self::effective_limit(&order);
        let contra_side = order.side.flip();

        if order.time_in_force == TimeCondition::FillOrKill {
            let available = self.mbl(contra_side).marketable_volume_up_to(limit);
            if available < order.leaves_qty {
                return Err(OrderBookError::InsufficientLiquidity {
                    order_id: order.order_id,
                    requested: order.leaves_qty,
                });
            }
        }

        let trd_match_id = self.next_match_id(&order.order_id);
        let (remaining, consumed) = self.mbl_mut(contra_side).trade_volume_up_to(order.leaves_qty, limit);

        let filled_qty = order.leaves_qty - remaining;
        order.leaves_qty = remaining;
        order.cum_qty += filled_qty;
        if filled_qty > 0 {
            let target = if remaining == 0 { OrderStatus::Filled } else { OrderStatus::PartiallyFilled };
            order.ord_status = order.ord_status.migrate(target).unwrap_or(order.ord_status);
        }

        let mut fills = Vec::with_capacity(consumed.len());
        let mut trades = Vec::with_capacity(consumed.len());
        for (maker, taken) in &consumed {
            fills.push(Fill {
                price: maker.price,
                qty: *taken,
                taker_order_id: order.order_id.clone(),
                maker_order_id: maker.order_id.clone(),
                trd_match_id: trd_match_id.clone(),
            });

            let tick_direction = TickDirection::classify(maker.price, self.last_trade);
            self.last_trade = Some((maker.price, tick_direction));
            trades.push(Trade::new(
                order.timestamp,
                self.symbol.clone(),
                order.side,
                *taken,
                maker.price,
                tick_direction,
                trd_match_id.clone(),
            ));
            tracing::trace!(
                taker_order_id = %order.order_id,
                maker_order_id = %maker.order_id,
                price = %maker.price,
                qty = *taken,
                "fill"
            );

            if maker.leaves_qty == 0 {
                self.index.remove(&maker.order_id);
            }
        }

        let wants_to_rest = order.ord_type.is_restable()
            && matches!(order.time_in_force, TimeCondition::GoodTillCancel | TimeCondition::Day);

        if order.leaves_qty > 0 && wants_to_rest {
            let order_id = order.order_id.clone();
            let side = order.side;
            let price = order.price;
            self.mbl_mut(side).add_order(order.clone())?;
            self.index.insert(order_id, (side, price));
            tracing::info!(order_id = %order.order_id, side = %order.side, price = %order.price, leaves_qty = order.leaves_qty, "order rested");
        } else if order.leaves_qty > 0 {
            // IOC remainder, or a non-restable type (Market) left over: discarded, not resting.
            order.ord_status = order.ord_status.migrate(OrderStatus::Canceled).unwrap_or(order.ord_status);
            tracing::info!(order_id = %order.order_id, leaves_qty = order.leaves_qty, "order remainder discarded, not resting");
        } else {
            tracing::info!(order_id = %order.order_id, fills = fills.len(), "order fully filled");
        }

        let remaining_qty = order.leaves_qty;
        Ok(PlaceReport { order, fills, trades, remaining_qty })
    }

    /// Effective only while the order is still resting; racing a cancel
    /// against a match that already completed the order returns `NotFound`.
    pub fn cancel(&mut self, order_id: &str) -> Result<Order, OrderBookError> {
        let (side, price) = self
            .index
            .remove(order_id)
            .ok_or_else(|| OrderBookError::NotFound {
                order_id: order_id.to_string(),
            })?;
        self.mbl_mut(side).remove_order(price, order_id)
    }

    /// If `new_qty <= current leaves_qty` and `new_price` is absent or
    /// unchanged, the order is resized in place, preserving FIFO priority.
    /// Any price change or size increase is a `cancel` + `place` (priority
    /// is lost), matching the contract spec.md §4.4 requires.
    pub fn amend(&mut self, order_id: &str, new_qty: u64, new_price: Option<f64>) -> Result<PlaceReport, OrderBookError> {
        let &(side, price) = self.index.get(order_id).ok_or_else(|| OrderBookError::NotFound {
            order_id: order_id.to_string(),
        })?;

        let normalized_new_price = match new_price {
            Some(raw) => Some(normalize_price(decimal_from_f64(raw)?, self.tick_price)?),
            None => None,
        };

        let existing = self
            .mbl(side)
            .level(price)
            .and_then(|level| level.get_by_id(order_id))
            .cloned()
            .ok_or_else(|| OrderBookError::NotFound {
                order_id: order_id.to_string(),
            })?;

        let same_price = normalized_new_price.map_or(true, |p| p == existing.price);
        let size_down = new_qty <= existing.leaves_qty;

        if same_price && size_down {
            let mut updated = existing.clone();
            updated.leaves_qty = new_qty;
            self.mbl_mut(side).modify_order(price, updated.clone())?;
            Ok(PlaceReport {
                order: updated,
                fills: Vec::new(),
                trades: Vec::new(),
                remaining_qty: new_qty,
            })
        } else {
            let cancelled = self.cancel(order_id)?;
            let reposted = Order {
                order_id: cancelled.order_id,
                cl_ord_id: cancelled.cl_ord_id,
                symbol: cancelled.symbol,
                side: cancelled.side,
                price: normalized_new_price.unwrap_or(cancelled.price),
                order_qty: new_qty,
                leaves_qty: new_qty,
                cum_qty: 0,
                ord_status: OrderStatus::New,
                time_in_force: cancelled.time_in_force,
                ord_type: cancelled.ord_type,
                timestamp: cancelled.timestamp,
                transact_time: cancelled.transact_time,
            };
            self.place(reposted)
        }
    }

    pub fn best_bid(&self) -> Decimal {
        self.buy.best_price()
    }

    pub fn best_ask(&self) -> Decimal {
        self.sell.best_price()
    }

    pub fn spread(&self) -> Decimal {
        self.sell.best_price() - self.buy.best_price()
    }

    pub fn depth(&self, side: Side) -> usize {
        self.mbl(side).depth()
    }

    pub fn top(&self, side: Side, n: usize) -> Vec<Decimal> {
        self.mbl(side).top_prices(n)
    }

    /// Whether the book is crossed: only possible transiently mid-`place`,
    /// never true once a public method returns.
    pub fn is_crossed(&self) -> bool {
        !self.buy.is_empty() && !self.sell.is_empty() && self.buy.best_price() >= self.sell.best_price()
    }

    /// Whether `price` falls strictly inside the open bid/ask gap.
    pub fn in_gap(&self, price: Decimal) -> bool {
        !self.buy.is_empty() && !self.sell.is_empty() && self.buy.best_price() < price && price < self.sell.best_price()
    }

    /// The contra-side prices (best-first) that would be marketable against
    /// an order of `side` resting at `price`.
    pub fn overlap_levels(&self, side: Side, price: Decimal) -> Vec<Decimal> {
        let contra = self.mbl(side.flip());
        contra
            .top_prices(contra.depth())
            .into_iter()
            .take_while(|&p| contra.qualifies(p, price))
            .collect()
    }

    /// Price-level lookup sugar (`book[price]` in the source); looks on
    /// whichever side currently owns that exact price.
    pub fn level_at(&self, price: Decimal) -> Option<&PriceLevel> {
        self.buy.level(price).or_else(|| self.sell.level(price))
    }
}

impl Index<Side> for OrderBook {
    type Output = Mbl;

    fn index(&self, side: Side) -> &Mbl {
        self.mbl(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::NewOrderRequest;
    use crate::timestamp::Timestamp;

    fn book(tick: f64) -> OrderBook {
        OrderBook::new(OrderBookConfig::unbounded("BTCUSD", tick).unwrap())
    }

    fn order(id: &str, side: Side, price: f64, qty: u64, tif: TimeCondition) -> Order {
        let req = NewOrderRequest::limit(id, "BTCUSD", side, price, qty).time_in_force(tif);
        Order::from_request(req, Timestamp::from_millis(1)).unwrap()
    }

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    /// S1: empty book, resting Buy limit order.
    #[test]
    fn s1_resting_limit_order_sets_best_bid() {
        let mut book = book(0.5);
        let report = book
            .place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel))
            .unwrap();
        assert!(report.fills.is_empty());
        assert_eq!(report.remaining_qty, 10);
        assert_eq!(book.best_bid(), d("100.0"));
    }

    /// S2: continue S1, resting Sell sets best_ask/spread.
    #[test]
    fn s2_resting_sell_sets_spread() {
        let mut book = book(0.5);
        book.place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel)).unwrap();
        book.place(order("B", Side::Sell, 101.0, 5, TimeCondition::GoodTillCancel)).unwrap();
        assert_eq!(book.best_ask(), d("101.0"));
        assert_eq!(book.spread(), d("1.0"));
    }

    /// S3: IOC Sell crosses into resting Buy, partial fill, no resting remainder.
    #[test]
    fn s3_ioc_partial_fill_against_resting_buy() {
        let mut book = book(0.5);
        book.place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel)).unwrap();
        book.place(order("B", Side::Sell, 101.0, 5, TimeCondition::GoodTillCancel)).unwrap();

        let report = book
            .place(order("C", Side::Sell, 100.0, 3, TimeCondition::ImmediateOrCancel))
            .unwrap();

        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.fills[0].maker_order_id, "A");
        assert_eq!(report.fills[0].qty, 3);
        assert_eq!(report.fills[0].price, d("100.0"));
        assert_eq!(report.remaining_qty, 0);
        assert_eq!(book.level_at(d("100.0")).map(|l| l.size()).unwrap_or(0), 7);

        assert_eq!(report.trades.len(), 1);
        assert_eq!(report.trades[0].price, d("100.0"));
        assert_eq!(report.trades[0].size, 3);
        assert_eq!(report.trades[0].tick_direction, TickDirection::PlusTick);
    }

    #[test]
    fn successive_trades_at_same_price_are_zero_tick() {
        let mut book = book(0.5);
        book.place(order("A", Side::Sell, 100.0, 20, TimeCondition::GoodTillCancel)).unwrap();

        let first = book
            .place(order("B", Side::Buy, 100.0, 5, TimeCondition::ImmediateOrCancel))
            .unwrap();
        let second = book
            .place(order("C", Side::Buy, 100.0, 5, TimeCondition::ImmediateOrCancel))
            .unwrap();

        assert_eq!(first.trades[0].tick_direction, TickDirection::PlusTick);
        assert_eq!(second.trades[0].tick_direction, TickDirection::ZeroPlusTick);
    }

    /// S4: continue S3, a resting Sell sweeps the rest of A and rests its remainder.
    #[test]
    fn s4_resting_sell_sweeps_remainder_and_rests() {
        let mut book = book(0.5);
        book.place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel)).unwrap();
        book.place(order("B", Side::Sell, 101.0, 5, TimeCondition::GoodTillCancel)).unwrap();
        book.place(order("C", Side::Sell, 100.0, 3, TimeCondition::ImmediateOrCancel)).unwrap();

        let report = book
            .place(order("D", Side::Sell, 99.5, 20, TimeCondition::GoodTillCancel))
            .unwrap();

        assert_eq!(report.fills.len(), 1);
        assert_eq!(report.fills[0].maker_order_id, "A");
        assert_eq!(report.fills[0].qty, 7);
        assert_eq!(report.remaining_qty, 13);
        assert_eq!(book.best_ask(), d("99.5"));
        assert_eq!(book.best_bid(), Decimal::ZERO);
    }

    /// S10: FOK cannot be fully filled, no mutation, InsufficientLiquidity.
    #[test]
    fn s10_fok_insufficient_liquidity_is_rejected_without_side_effect() {
        let mut book = book(0.5);
        book.place(order("A", Side::Sell, 100.0, 15, TimeCondition::GoodTillCancel)).unwrap();

        let err = book
            .place(order("B", Side::Buy, 100.0, 20, TimeCondition::FillOrKill))
            .unwrap_err();
        assert!(matches!(err, OrderBookError::InsufficientLiquidity { .. }));
        assert_eq!(book.depth(Side::Buy), 0);
        assert_eq!(book.best_bid(), Decimal::ZERO);
        assert_eq!(book.level_at(d("100.0")).unwrap().size(), 15);
    }

    #[test]
    fn cancel_removes_resting_order_and_frees_level() {
        let mut book = book(0.5);
        book.place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel)).unwrap();
        let cancelled = book.cancel("A").unwrap();
        assert_eq!(cancelled.order_id, "A");
        assert!(book.level_at(d("100.0")).is_none());
        assert!(matches!(book.cancel("A").unwrap_err(), OrderBookError::NotFound { .. }));
    }

    #[test]
    fn amend_size_down_preserves_priority() {
        let mut book = book(0.5);
        book.place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel)).unwrap();
        book.place(order("B", Side::Buy, 100.0, 5, TimeCondition::GoodTillCancel)).unwrap();

        book.amend("A", 2, None).unwrap();
        let level = book.level_at(d("100.0")).unwrap();
        assert_eq!(level.get(0).unwrap().order_id, "A");
        assert_eq!(level.get(0).unwrap().leaves_qty, 2);
    }

    #[test]
    fn amend_size_up_loses_priority_via_cancel_repost() {
        let mut book = book(0.5);
        book.place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel)).unwrap();
        book.place(order("B", Side::Buy, 100.0, 5, TimeCondition::GoodTillCancel)).unwrap();

        book.amend("A", 50, None).unwrap();
        let level = book.level_at(d("100.0")).unwrap();
        // A was cancelled and reposted to the back of the queue; B is now head.
        assert_eq!(level.get(0).unwrap().order_id, "B");
        assert_eq!(level.get(1).unwrap().order_id, "A");
        assert_eq!(level.get(1).unwrap().leaves_qty, 50);
    }

    #[test]
    fn is_crossed_is_false_once_any_side_is_empty() {
        let book = book(0.5);
        assert!(!book.is_crossed());
    }

    #[test]
    fn duplicate_order_id_anywhere_on_book_is_rejected() {
        let mut book = book(0.5);
        book.place(order("A", Side::Buy, 100.0, 10, TimeCondition::GoodTillCancel)).unwrap();
        let err = book
            .place(order("A", Side::Sell, 200.0, 1, TimeCondition::GoodTillCancel))
            .unwrap_err();
        assert!(matches!(err, OrderBookError::DuplicateOrder { .. }));
    }
}
