use derive_more::{Display, Error};
use rust_decimal::Decimal;

/// Error taxonomy for every fallible order-book operation.
///
/// Every variant is surfaced to the caller; the core recovers nothing by
/// itself except the stale-price case inside `PriceHeap::remove`, which
/// logs at `warn` and returns instead of erroring (cancels of an
/// already-emptied level must be idempotent).
#[derive(Display, Error, Debug, Clone, PartialEq)]
pub enum OrderBookError {
    /// Bad `tick_price`, unsupported side/enum name, etc. Fatal at construction.
    #[display("invalid configuration: {_0}")]
    InvalidConfiguration(String),

    /// Missing required field, zero qty, qty/side sign mismatch, non-finite price.
    #[display("invalid order: {_0}")]
    InvalidOrder(String),

    /// Order price doesn't match the target price level.
    #[display("order {order_id} price {got} does not match level price {expected}")]
    PriceMismatch {
        order_id: String,
        expected: Decimal,
        got: Decimal,
    },

    /// `orderID` already resident on the book.
    #[display("order {order_id} already exists")]
    DuplicateOrder { order_id: String },

    /// Cancel/amend referencing an unknown `orderID`.
    #[display("order {order_id} not found")]
    NotFound { order_id: String },

    /// `PriceLevel::modify_order` refuses a size-increase; caller must cancel + repost.
    #[display("modify_order on {order_id} would increase leavesQty; cancel and repost instead")]
    ModifyWouldIncreasePriority { order_id: String },

    /// A `FillOrKill` order could not be fully filled against available liquidity.
    #[display("insufficient liquidity to fill order {order_id} for qty {requested}")]
    InsufficientLiquidity { order_id: String, requested: u64 },

    /// Book invariant violated (bug); should never surface in production.
    #[display("book crossed at rest: best_buy {best_buy} >= best_sell {best_sell}")]
    BookCrossedAtRest {
        best_buy: Decimal,
        best_sell: Decimal,
    },

    /// Timestamp value did not parse as epoch-millis, float seconds, or ISO-8601.
    #[display("invalid timestamp: {_0}")]
    InvalidTimestamp(String),

    /// Enum value did not match an integer or case-insensitive name.
    #[display("invalid {expected}: {got}")]
    InvalidEnum { expected: &'static str, got: String },
}

// Note: `IllegalStatusTransition` from the design's error taxonomy has no
// variant here. `OrderStatus::migrate` rejects illegal transitions by
// returning `None` ("no change") rather than raising, per spec.

pub type Result<T> = std::result::Result<T, OrderBookError>;
