use derive_more::Display;

use crate::errors::OrderBookError;

/// Lifecycle status of an [`crate::order::Order`].
///
/// Legal transitions form a directed graph whose only outbound edges leave
/// `New` and `PartiallyFilled` — see [`OrderStatus::migrate`].
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Canceled,
    New,
    PartiallyFilled,
    PartiallyFilledCanceled,
    Filled,
    Rejected,
}

impl OrderStatus {
    /// Terminal statuses have no legal outbound transition.
    pub fn is_finished(self) -> bool {
        !matches!(self, OrderStatus::New | OrderStatus::PartiallyFilled)
    }

    /// Attempts to move from `self` to `to`, returning the resulting status
    /// or `None` if the transition is illegal ("no change", never raised).
    pub fn migrate(self, to: OrderStatus) -> Option<OrderStatus> {
        if self.is_finished() || to == OrderStatus::New {
            return None;
        }

        use OrderStatus::*;
        match (self, to) {
            (New, Canceled) => Some(Canceled),
            (New, PartiallyFilled) => Some(PartiallyFilled),
            (New, Filled) => Some(Filled),
            (New, Rejected) => Some(Rejected),
            (PartiallyFilled, PartiallyFilled) => Some(PartiallyFilled),
            (PartiallyFilled, PartiallyFilledCanceled) => Some(PartiallyFilledCanceled),
            (PartiallyFilled, Filled) => Some(Filled),
            (PartiallyFilled, Rejected) => Some(Rejected),
            _ => None,
        }
    }

    pub fn parse(value: &str) -> Result<OrderStatus, OrderBookError> {
        use OrderStatus::*;
        match value.trim().to_ascii_lowercase().as_str() {
            "canceled" | "cancelled" => Ok(Canceled),
            "new" => Ok(New),
            "partiallyfilled" => Ok(PartiallyFilled),
            "partiallyfilledcanceled" | "partiallyfilledcancelled" => Ok(PartiallyFilledCanceled),
            "filled" => Ok(Filled),
            "rejected" => Ok(Rejected),
            _ => Err(OrderBookError::InvalidEnum {
                expected: "OrderStatus",
                got: value.to_string(),
            }),
        }
    }
}
