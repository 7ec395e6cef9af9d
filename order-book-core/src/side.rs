use derive_more::Display;

use crate::errors::OrderBookError;

/// Which side of the book an order rests on.
///
/// The integer value is used directly by [`crate::price_heap::PriceHeap`] to
/// invert comparisons so one heap implementation serves both sides: Buy is
/// `+1`, Sell is `-1`.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[cfg_attr(feature = "cli", value(rename_all = "lower"))]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// `+1` for Buy, `-1` for Sell.
    pub fn value(self) -> i8 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }

    /// Returns the opposite side.
    pub fn flip(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Parses either the integer value (`1`/`-1`) or a case-insensitive name.
    pub fn parse(value: &str) -> Result<Side, OrderBookError> {
        match value.trim() {
            "1" => return Ok(Side::Buy),
            "-1" => return Ok(Side::Sell),
            _ => {}
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::Buy),
            "sell" => Ok(Side::Sell),
            _ => Err(OrderBookError::InvalidEnum {
                expected: "Side",
                got: value.to_string(),
            }),
        }
    }

    /// Derives a side from the sign of a raw signed quantity, per spec: when
    /// `orderQty` is supplied as a signed magnitude and `side` is absent,
    /// the sign determines the side.
    pub fn from_signed_qty(qty: i64) -> Result<Side, OrderBookError> {
        if qty > 0 {
            Ok(Side::Buy)
        } else if qty < 0 {
            Ok(Side::Sell)
        } else {
            Err(OrderBookError::InvalidOrder(
                "cannot derive side from a zero quantity".to_string(),
            ))
        }
    }
}
