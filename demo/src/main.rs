//! # Order Book Demo
//!
//! Demonstrates various features and behaviors of the order book implementation.
//!
//! This demo shows:
//! - Basic order matching
//! - Partial fills
//! - Price-time priority
//! - Complex market scenarios

use order_book_core::config::OrderBookConfig;
use order_book_core::order::{NewOrderRequest, Order};
use order_book_core::order_book::{OrderBook, PlaceReport};
use order_book_core::side::Side;
use order_book_core::timestamp::Timestamp;
use order_book_core::OrderBookError;

/// Main entry point that runs all demo scenarios.
fn main() {
    println!("=== Limit Order Book Demo ===\n");

    let config = OrderBookConfig::unbounded("BTCUSD", 0.01).expect("valid demo configuration");

    let mut book1 = OrderBook::new(config.clone());
    demo_basic_matching(&mut book1);

    let mut book2 = OrderBook::new(config.clone());
    demo_partial_fills(&mut book2);

    let mut book3 = OrderBook::new(config.clone());
    demo_price_time_priority(&mut book3);

    let mut book4 = OrderBook::new(config);
    demo_complex_scenario(&mut book4);
}

/// Demonstrates basic order matching between buy and sell orders.
///
/// Shows how a buy order at a specific price matches exactly with
/// a sell order at the same price.
fn demo_basic_matching(book: &mut OrderBook) {
    println!("-----------------------");
    println!("1. Basic Matching Demo:");
    println!("-----------------------");

    let report = place_order(book, Side::Buy, 100.0, 10, "1").expect("failed to place BUY order");
    print_report(&report);
    print_book_state(book);

    let report = place_order(book, Side::Sell, 100.0, 10, "2").expect("failed to place SELL order");
    print_report(&report);
    print_book_state(book);
}

/// Demonstrates partial order fills.
///
/// Shows what happens when orders are only partially matched,
/// leaving remaining quantity in the book.
fn demo_partial_fills(book: &mut OrderBook) {
    println!("---------------------");
    println!("2. Partial Fill Demo:");
    println!("---------------------");

    place_order(book, Side::Buy, 100.0, 15, "1").expect("failed to place BUY order");

    let report = place_order(book, Side::Sell, 100.0, 10, "2").expect("failed to place SELL order");
    print_report(&report);
    print_book_state(book);

    let report = place_order(book, Side::Sell, 100.0, 10, "3").expect("failed to place SELL order");
    print_report(&report);
    print_book_state(book);
}

/// Demonstrates price-time priority matching rules.
///
/// Shows how orders are matched first by best price, then by
/// arrival time (FIFO) for orders at the same price level.
fn demo_price_time_priority(book: &mut OrderBook) {
    println!("----------------------------");
    println!("3. Price-Time Priority Demo:");
    println!("----------------------------");

    place_order(book, Side::Buy, 99.0, 10, "1").unwrap();
    place_order(book, Side::Buy, 100.0, 10, "2").unwrap();
    place_order(book, Side::Buy, 100.0, 10, "3").unwrap();

    print_book_state(book);

    let report = place_order(book, Side::Sell, 99.0, 25, "4").unwrap();
    print_report(&report);
    print_book_state(book);
}

/// Demonstrates a complex market scenario with multiple price levels.
///
/// Shows aggressive orders that cross the spread and match against
/// multiple price levels, illustrating realistic market behavior.
fn demo_complex_scenario(book: &mut OrderBook) {
    println!("---------------------------");
    println!("4. Complex Market Scenario:");
    println!("---------------------------");

    println!("Building initial order book:");
    place_order(book, Side::Buy, 98.0, 20, "1").unwrap();
    place_order(book, Side::Buy, 99.0, 15, "2").unwrap();
    place_order(book, Side::Buy, 100.0, 10, "3").unwrap();
    place_order(book, Side::Sell, 101.0, 10, "4").unwrap();
    place_order(book, Side::Sell, 102.0, 15, "5").unwrap();
    place_order(book, Side::Sell, 103.0, 20, "6").unwrap();

    print_book_state(book);

    println!("\nLarge aggressive BUY order crosses spread:");
    let report = place_order(book, Side::Buy, 102.0, 30, "7").unwrap();
    print_report(&report);
    print_book_state(book);

    println!("\nLarge aggressive SELL order:");
    let report = place_order(book, Side::Sell, 98.0, 40, "8").unwrap();
    print_report(&report);
    print_book_state(book);
}

/// Places a plain GTC limit order, printing what was submitted.
fn place_order(
    book: &mut OrderBook,
    side: Side,
    price: f64,
    quantity: u64,
    id: &str,
) -> Result<PlaceReport, OrderBookError> {
    println!("--Placing {side} order: ID={id}, Price={price}, Qty={quantity}");
    let request = NewOrderRequest::limit(id, book.symbol(), side, price, quantity);
    let order = Order::from_request(request, Timestamp::from_millis(0))?;
    book.place(order)
}

/// Prints the fills produced by a `place` call.
fn print_report(report: &PlaceReport) {
    if report.fills.is_empty() {
        println!("--No trades executed");
    } else {
        println!("--Trades executed:");
        for fill in &report.fills {
            println!(
                "----Trade: {} @ {} (maker: {}, taker: {})",
                fill.qty, fill.price, fill.maker_order_id, fill.taker_order_id
            );
        }
    }
}

/// Prints the current state of the order book showing best bid and ask.
fn print_book_state(book: &OrderBook) {
    println!("--Book state:");
    let best_bid = book.best_bid();
    if best_bid.is_zero() {
        println!("----Best BUY:  None");
    } else {
        let qty = book.level_at(best_bid).map(|l| l.size()).unwrap_or(0);
        println!("----Best BUY:  {qty} @ {best_bid}");
    }

    let best_ask = book.best_ask();
    if best_ask.is_zero() {
        println!("----Best SELL: None");
    } else {
        let qty = book.level_at(best_ask).map(|l| l.size()).unwrap_or(0);
        println!("----Best SELL: {qty} @ {best_ask}");
    }
    println!();
}
