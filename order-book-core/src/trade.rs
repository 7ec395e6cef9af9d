use derive_more::Display;
use rust_decimal::Decimal;

use crate::side::Side;
use crate::timestamp::Timestamp;

/// Uptick/downtick classification of a trade relative to the previous one
/// on the same book, following standard tape conventions.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickDirection {
    PlusTick,
    ZeroPlusTick,
    MinusTick,
    ZeroMinusTick,
}

impl TickDirection {
    pub fn classify(price: Decimal, previous: Option<(Decimal, TickDirection)>) -> TickDirection {
        match previous {
            None => TickDirection::PlusTick,
            Some((prev_price, prev_tick)) => {
                use std::cmp::Ordering::*;
                match price.cmp(&prev_price) {
                    Greater => TickDirection::PlusTick,
                    Less => TickDirection::MinusTick,
                    Equal => match prev_tick {
                        TickDirection::PlusTick | TickDirection::ZeroPlusTick => TickDirection::ZeroPlusTick,
                        TickDirection::MinusTick | TickDirection::ZeroMinusTick => TickDirection::ZeroMinusTick,
                    },
                }
            }
        }
    }
}

/// A completed trade between a resting maker order and an incoming taker.
///
/// Two trades compare equal iff `trd_match_id` and `side` match.
#[derive(Display, Debug, Clone)]
#[display("Trade: {size} {symbol} @ {price} (side: {side}, match: {trd_match_id})")]
pub struct Trade {
    pub timestamp: Timestamp,
    pub symbol: String,
    /// Aggressor side.
    pub side: Side,
    pub size: u64,
    pub price: Decimal,
    pub tick_direction: TickDirection,
    pub trd_match_id: String,
    /// `size * price`, in quote-currency terms.
    pub gross_value: Decimal,
}

impl Trade {
    pub fn new(
        timestamp: Timestamp,
        symbol: impl Into<String>,
        side: Side,
        size: u64,
        price: Decimal,
        tick_direction: TickDirection,
        trd_match_id: impl Into<String>,
    ) -> Self {
        let gross_value = price * Decimal::from(size);
        Trade {
            timestamp,
            symbol: symbol.into(),
            side,
            size,
            price,
            tick_direction,
            trd_match_id: trd_match_id.into(),
            gross_value,
        }
    }
}

impl PartialEq for Trade {
    fn eq(&self, other: &Self) -> bool {
        self.trd_match_id == other.trd_match_id && self.side == other.side
    }
}
impl Eq for Trade {}

/// One resting order consumed by an aggressive order, as reported in a
/// [`crate::order_book::PlaceReport`]'s `fills` list.
#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub price: Decimal,
    pub qty: u64,
    pub taker_order_id: String,
    pub maker_order_id: String,
    pub trd_match_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ts() -> Timestamp {
        Timestamp::from_millis(0)
    }

    #[test]
    fn first_trade_is_a_plus_tick() {
        assert_eq!(TickDirection::classify(Decimal::from_str("1").unwrap(), None), TickDirection::PlusTick);
    }

    #[test]
    fn equal_price_after_uptick_is_zero_plus() {
        let prev = (Decimal::from_str("100").unwrap(), TickDirection::PlusTick);
        let got = TickDirection::classify(Decimal::from_str("100").unwrap(), Some(prev));
        assert_eq!(got, TickDirection::ZeroPlusTick);
    }

    #[test]
    fn equal_price_after_downtick_is_zero_minus() {
        let prev = (Decimal::from_str("100").unwrap(), TickDirection::MinusTick);
        let got = TickDirection::classify(Decimal::from_str("100").unwrap(), Some(prev));
        assert_eq!(got, TickDirection::ZeroMinusTick);
    }

    #[test]
    fn trade_equality_is_on_match_id_and_side() {
        let a = Trade::new(ts(), "BTCUSD", Side::Buy, 1, Decimal::from_str("1").unwrap(), TickDirection::PlusTick, "m1");
        let b = Trade::new(ts(), "BTCUSD", Side::Buy, 999, Decimal::from_str("500").unwrap(), TickDirection::MinusTick, "m1");
        assert_eq!(a, b);
    }

    #[test]
    fn gross_value_is_price_times_size() {
        let t = Trade::new(ts(), "BTCUSD", Side::Buy, 3, Decimal::from_str("10").unwrap(), TickDirection::PlusTick, "m1");
        assert_eq!(t.gross_value, Decimal::from_str("30").unwrap());
    }
}
