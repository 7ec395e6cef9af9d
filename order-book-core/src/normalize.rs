use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::OrderBookError;

/// Snaps a raw price to the nearest multiple of `tick` using decimal
/// arithmetic, so that price equality is exact and hashable (`15.486` with
/// tick `0.01` must become exactly `15.49`, never `15.490000000000001`).
///
/// Ties on exact halves round to even (banker's rounding), matching the
/// reference implementation's `Decimal.normalize()` behavior.
pub fn normalize_price(price: Decimal, tick: Decimal) -> Result<Decimal, OrderBookError> {
    if tick <= Decimal::ZERO {
        return Err(OrderBookError::InvalidConfiguration(format!(
            "tick_price must be strictly positive, got {tick}"
        )));
    }

    let ticks = (price / tick).round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
    let normalized = ticks * tick;
    let normalized = normalized.normalize();
    tracing::debug!(%price, %tick, %normalized, "normalize price");
    Ok(normalized)
}

/// Parses an `f64` into a `Decimal`, rejecting non-finite values.
pub fn decimal_from_f64(value: f64) -> Result<Decimal, OrderBookError> {
    if !value.is_finite() {
        return Err(OrderBookError::InvalidOrder(format!(
            "price/quantity must be finite, got {value}"
        )));
    }
    Decimal::from_f64_retain(value)
        .map(|d| d.normalize())
        .ok_or_else(|| OrderBookError::InvalidOrder(format!("could not represent {value} as a decimal")))
}
