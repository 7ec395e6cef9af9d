use rust_decimal::Decimal;
use validator::Validate;

use crate::errors::OrderBookError;
use crate::normalize::decimal_from_f64;

/// Constructor contract for an [`crate::order_book::OrderBook`]: a single
/// trading symbol, its tick size, and an optional resting-order depth cap.
///
/// `max_depth` is accepted and carried but never enforced — the mature
/// revisions of the reference implementation accept it without consulting
/// it; treated here as informational per spec.
#[derive(Debug, Clone, Validate)]
pub struct OrderBookConfig {
    #[validate(length(min = 1, message = "symbol must not be empty"))]
    pub symbol: String,
    #[validate(custom(function = "validate_tick_price"))]
    pub tick_price: Decimal,
    pub max_depth: i64,
}

fn validate_tick_price(tick: &Decimal) -> Result<(), validator::ValidationError> {
    if *tick <= Decimal::ZERO {
        return Err(validator::ValidationError::new("tick_price must be strictly positive"));
    }
    Ok(())
}

impl OrderBookConfig {
    /// `max_depth < 0` means unbounded.
    pub fn new(symbol: impl Into<String>, tick_price: f64, max_depth: i64) -> Result<Self, OrderBookError> {
        let tick_price = decimal_from_f64(tick_price)?;
        let config = OrderBookConfig {
            symbol: symbol.into(),
            tick_price,
            max_depth,
        };
        config
            .validate()
            .map_err(|e| OrderBookError::InvalidConfiguration(e.to_string()))?;
        Ok(config)
    }

    pub fn unbounded(symbol: impl Into<String>, tick_price: f64) -> Result<Self, OrderBookError> {
        Self::new(symbol, tick_price, -1)
    }
}
