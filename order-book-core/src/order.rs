use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;

use crate::errors::OrderBookError;
use crate::normalize::decimal_from_f64;
use crate::order_type::{OrderType, TimeCondition};
use crate::side::Side;
use crate::status::OrderStatus;
use crate::timestamp::Timestamp;

/// An order payload as handed to [`crate::order_book::OrderBook::place`].
///
/// Mirrors the JSON-compatible object in spec.md §6: only `order_id` is
/// strictly required. If `order_qty` is supplied as a signed quantity and
/// `side` is `None`, the sign determines the side and the magnitude becomes
/// `order_qty`; if both are supplied they must agree.
#[derive(Debug, Clone)]
pub struct NewOrderRequest {
    pub order_id: String,
    pub cl_ord_id: Option<String>,
    pub symbol: String,
    pub side: Option<Side>,
    pub price: f64,
    pub order_qty: i64,
    pub ord_type: OrderType,
    pub time_in_force: TimeCondition,
    pub timestamp: Option<Timestamp>,
}

impl NewOrderRequest {
    /// A plain GTC limit order, the common case.
    pub fn limit(order_id: impl Into<String>, symbol: impl Into<String>, side: Side, price: f64, qty: u64) -> Self {
        NewOrderRequest {
            order_id: order_id.into(),
            cl_ord_id: None,
            symbol: symbol.into(),
            side: Some(side),
            price,
            order_qty: qty as i64,
            ord_type: OrderType::Limit,
            time_in_force: TimeCondition::GoodTillCancel,
            timestamp: None,
        }
    }

    pub fn time_in_force(mut self, tif: TimeCondition) -> Self {
        self.time_in_force = tif;
        self
    }
}

/// A resting or in-flight order.
///
/// Two orders compare equal iff their `order_id` and `timestamp` match; the
/// hash is defined on `order_id` alone (an order's identity is its id, but
/// equality additionally distinguishes re-submissions at a different time).
#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: String,
    pub cl_ord_id: Option<String>,
    pub symbol: String,
    pub side: Side,
    pub price: Decimal,
    pub order_qty: u64,
    pub leaves_qty: u64,
    pub cum_qty: u64,
    pub ord_status: OrderStatus,
    pub time_in_force: TimeCondition,
    pub ord_type: OrderType,
    pub timestamp: Timestamp,
    pub transact_time: Option<Timestamp>,
}

impl Order {
    /// Validates a request and produces a resting-ready `Order` at `New`
    /// status, normalized price not yet applied (the book normalizes on
    /// `place`/`add_order`).
    pub fn from_request(req: NewOrderRequest, timestamp: Timestamp) -> Result<Order, OrderBookError> {
        if req.order_id.trim().is_empty() {
            return Err(OrderBookError::InvalidOrder("orderID is required".to_string()));
        }
        if req.order_qty == 0 {
            return Err(OrderBookError::InvalidOrder(format!(
                "order {} quantity is 0, no order placed",
                req.order_id
            )));
        }

        let side = match req.side {
            Some(side) => {
                let sign_side = Side::from_signed_qty(req.order_qty)?;
                if sign_side != side {
                    return Err(OrderBookError::InvalidOrder(format!(
                        "order {} quantity[{}] mismatch with order side[{}]",
                        req.order_id, req.order_qty, side
                    )));
                }
                side
            }
            None => Side::from_signed_qty(req.order_qty)?,
        };

        let price = decimal_from_f64(req.price)?;
        if price.is_sign_negative() {
            return Err(OrderBookError::InvalidOrder(format!(
                "order {} price {} must be non-negative",
                req.order_id, price
            )));
        }

        let order_qty = req.order_qty.unsigned_abs();

        Ok(Order {
            order_id: req.order_id,
            cl_ord_id: req.cl_ord_id,
            symbol: req.symbol,
            side,
            price,
            order_qty,
            leaves_qty: order_qty,
            cum_qty: 0,
            ord_status: OrderStatus::New,
            time_in_force: req.time_in_force,
            ord_type: req.ord_type,
            timestamp: req.timestamp.unwrap_or(timestamp),
            transact_time: None,
        })
    }

    /// "Worth" used for sorting raw order lists outside the book (price *
    /// leavesQty), falling back to timestamp when two orders hash equal —
    /// mirrors `Order.__lt__` in the original source.
    fn worth(&self) -> Decimal {
        self.price * Decimal::from(self.leaves_qty)
    }
}

impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id && self.timestamp == other.timestamp
    }
}
impl Eq for Order {}

impl Hash for Order {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.order_id.hash(state);
    }
}

impl PartialOrd for Order {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.order_id != other.order_id {
            Some(self.worth().cmp(&other.worth()))
        } else {
            Some(self.timestamp.cmp(&other.timestamp))
        }
    }
}
