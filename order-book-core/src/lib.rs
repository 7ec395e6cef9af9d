//! # Order Book Core
//!
//! An in-memory limit order book for a single trading instrument:
//! two opposing sides of resting limit orders organized by price, answering
//! best-bid/best-ask and depth queries in better-than-linear time, and
//! executing aggressive trades against resting liquidity under strict
//! price-time priority.
//!
//! ## Example
//!
//! ```rust
//! use order_book_core::config::OrderBookConfig;
//! use order_book_core::order::NewOrderRequest;
//! use order_book_core::order_book::OrderBook;
//! use order_book_core::order::Order;
//! use order_book_core::side::Side;
//! use order_book_core::timestamp::Timestamp;
//!
//! let config = OrderBookConfig::unbounded("BTCUSD", 0.5).unwrap();
//! let mut book = OrderBook::new(config);
//!
//! let buy = Order::from_request(
//!     NewOrderRequest::limit("A", "BTCUSD", Side::Buy, 100.0, 10),
//!     Timestamp::from_millis(0),
//! ).unwrap();
//! let report = book.place(buy).unwrap();
//! assert!(report.fills.is_empty());
//! assert_eq!(book.best_bid().to_string(), "100.0");
//! ```

pub mod config;
pub mod errors;
pub mod mbl;
pub mod normalize;
pub mod order;
pub mod order_book;
pub mod order_type;
pub mod price_heap;
pub mod price_level;
pub mod side;
pub mod status;
pub mod timestamp;
pub mod trade;

pub use config::OrderBookConfig;
pub use errors::{OrderBookError, Result};
pub use order::{NewOrderRequest, Order};
pub use order_book::{OrderBook, PlaceReport};
pub use order_type::{OrderType, TimeCondition};
pub use side::Side;
pub use status::OrderStatus;
pub use trade::{Fill, TickDirection, Trade};
