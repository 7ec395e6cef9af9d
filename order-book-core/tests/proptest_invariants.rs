//! Property-based tests for the six invariants of spec.md §8, run over
//! randomly generated order sequences.

use order_book_core::config::OrderBookConfig;
use order_book_core::normalize::normalize_price;
use order_book_core::order::NewOrderRequest;
use order_book_core::order::Order;
use order_book_core::order_book::OrderBook;
use order_book_core::order_type::TimeCondition;
use order_book_core::side::Side;
use order_book_core::timestamp::Timestamp;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn price_strategy() -> impl Strategy<Value = f64> {
    (1i64..=1000i64).prop_map(|v| v as f64)
}

fn quantity_strategy() -> impl Strategy<Value = u64> {
    1u64..=1_000u64
}

fn side_strategy() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Buy), Just(Side::Sell)]
}

fn fresh_book() -> OrderBook {
    OrderBook::new(OrderBookConfig::unbounded("BTCUSD", 1.0).unwrap())
}

fn place(book: &mut OrderBook, id: String, side: Side, price: f64, qty: u64) {
    let request = NewOrderRequest::limit(id, "BTCUSD", side, price, qty);
    let order = Order::from_request(request, Timestamp::from_millis(0)).unwrap();
    let _ = book.place(order);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Invariant 1: the book is never crossed once `place` returns.
    #[test]
    fn uncrossed_at_rest(
        orders in prop::collection::vec((side_strategy(), price_strategy(), quantity_strategy()), 1..80)
    ) {
        let mut book = fresh_book();
        for (idx, (side, price, qty)) in orders.into_iter().enumerate() {
            place(&mut book, idx.to_string(), side, price, qty);
            prop_assert!(!book.is_crossed());
        }
    }

    /// Invariant 2: each level's cached `size()` equals the sum of
    /// `leaves_qty` over the orders actually resting in it.
    #[test]
    fn conservation_of_resting_quantity(
        orders in prop::collection::vec((side_strategy(), price_strategy(), quantity_strategy()), 1..80)
    ) {
        let mut book = fresh_book();
        for (idx, (side, price, qty)) in orders.into_iter().enumerate() {
            place(&mut book, idx.to_string(), side, price, qty);
        }
        for side in [Side::Buy, Side::Sell] {
            for price in book.top(side, book.depth(side)) {
                let level = book.level_at(price).unwrap();
                let per_order: u64 = (0..level.count()).filter_map(|i| level.get(i)).map(|o| o.leaves_qty).sum();
                prop_assert_eq!(level.size(), per_order);
            }
        }
    }

    /// Invariant 3: the fill tape's price is monotone non-improving for the
    /// aggressor, and within one price the makers appear in FIFO order.
    #[test]
    fn fills_are_price_time_ordered(
        resting in prop::collection::vec((price_strategy(), quantity_strategy()), 1..20),
        incoming_qty in quantity_strategy(),
    ) {
        let mut book = fresh_book();
        for (idx, (price, qty)) in resting.iter().enumerate() {
            place(&mut book, format!("r{idx}"), Side::Sell, *price, *qty);
        }

        let request = NewOrderRequest::limit("aggressor", "BTCUSD", Side::Buy, 100_000.0, incoming_qty)
            .time_in_force(TimeCondition::ImmediateOrCancel);
        let order = Order::from_request(request, Timestamp::from_millis(0)).unwrap();
        if let Ok(report) = book.place(order) {
            for window in report.fills.windows(2) {
                prop_assert!(window[0].price <= window[1].price, "aggressor fill prices regressed");
            }
        }
    }

    /// Invariant 4: every visible price level is non-empty (an emptied level
    /// is removed from both the heap and the map, never left dangling).
    #[test]
    fn every_level_is_non_empty(
        orders in prop::collection::vec((side_strategy(), price_strategy(), quantity_strategy()), 1..80)
    ) {
        let mut book = fresh_book();
        for (idx, (side, price, qty)) in orders.into_iter().enumerate() {
            place(&mut book, idx.to_string(), side, price, qty);
        }
        for side in [Side::Buy, Side::Sell] {
            for price in book.top(side, book.depth(side)) {
                let size = book.level_at(price).map(|l| l.size()).unwrap_or(0);
                prop_assert!(size > 0, "empty level left registered at {price}");
            }
        }
    }

    /// Invariant 5: placing then cancelling a non-marketable GTC order
    /// restores best_bid/best_ask/depth to what they were before.
    #[test]
    fn place_then_cancel_is_a_round_trip(
        price in price_strategy(),
        qty in quantity_strategy(),
    ) {
        let mut book = fresh_book();
        // Keep it non-marketable: no contra-side liquidity exists at all.
        let before_bid = book.best_bid();
        let before_ask = book.best_ask();
        let before_depth = book.depth(Side::Buy);

        place(&mut book, "roundtrip".to_string(), Side::Buy, price, qty);
        book.cancel("roundtrip").unwrap();

        prop_assert_eq!(book.best_bid(), before_bid);
        prop_assert_eq!(book.best_ask(), before_ask);
        prop_assert_eq!(book.depth(Side::Buy), before_depth);
    }

    /// Invariant 6: normalization is idempotent.
    #[test]
    fn normalization_is_idempotent(raw in 1i64..10_000_000i64, tick_cents in 1i64..10_000i64) {
        let price = Decimal::from(raw) / Decimal::from(100);
        let tick = Decimal::from(tick_cents) / Decimal::from(10_000);
        let once = normalize_price(price, tick).unwrap();
        let twice = normalize_price(once, tick).unwrap();
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn regression_empty_book_sentinels() {
    let book = fresh_book();
    assert_eq!(book.best_bid(), Decimal::ZERO);
    assert_eq!(book.best_ask(), Decimal::MAX);
}

#[test]
fn regression_trade_volume_exact_total_empties_side() {
    let mut book = fresh_book();
    place(&mut book, "A".to_string(), Side::Sell, 100.0, 10);
    let request = NewOrderRequest::limit("B", "BTCUSD", Side::Buy, 100.0, 10).time_in_force(TimeCondition::ImmediateOrCancel);
    let order = Order::from_request(request, Timestamp::from_millis(0)).unwrap();
    let report = book.place(order).unwrap();
    assert_eq!(report.remaining_qty, 0);
    assert_eq!(book.depth(Side::Sell), 0);
}
