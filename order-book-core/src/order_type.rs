use derive_more::Display;

use crate::errors::OrderBookError;

/// Order type. The core implements Limit/Market semantics on the resting
/// book; Stop/Pegged variants are stored as metadata but never activated
/// here (activation is out of scope — see spec.md §3).
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
    MarketIfTouched,
    LimitIfTouched,
    MarketWithLeftOverAsLimit,
    Pegged,
}

impl OrderType {
    /// Whether this type rests on the book (Limit, GTC/Day) as opposed to
    /// being consumed immediately or held inert as unactivated metadata.
    pub fn is_restable(self) -> bool {
        matches!(self, OrderType::Limit)
    }

    pub fn parse(value: &str) -> Result<OrderType, OrderBookError> {
        use OrderType::*;
        match value.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(Market),
            "limit" => Ok(Limit),
            "stop" => Ok(Stop),
            "stoplimit" => Ok(StopLimit),
            "marketiftouched" => Ok(MarketIfTouched),
            "limitiftouched" => Ok(LimitIfTouched),
            "marketwithleftoveraslimit" => Ok(MarketWithLeftOverAsLimit),
            "pegged" => Ok(Pegged),
            _ => Err(OrderBookError::InvalidEnum {
                expected: "OrderType",
                got: value.to_string(),
            }),
        }
    }
}

/// Time-in-force condition governing how long an order rests and whether a
/// partial fill is acceptable.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeCondition {
    Day,
    GoodTillCancel,
    ImmediateOrCancel,
    FillOrKill,
}

impl TimeCondition {
    pub fn parse(value: &str) -> Result<TimeCondition, OrderBookError> {
        use TimeCondition::*;
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Day),
            "goodtillcancel" | "gtc" => Ok(GoodTillCancel),
            "immediateorcancel" | "ioc" => Ok(ImmediateOrCancel),
            "fillorkill" | "fok" => Ok(FillOrKill),
            _ => Err(OrderBookError::InvalidEnum {
                expected: "TimeCondition",
                got: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_type_parses_case_insensitively() {
        assert_eq!(OrderType::parse("limit").unwrap(), OrderType::Limit);
        assert_eq!(OrderType::parse("STOP").unwrap(), OrderType::Stop);
        assert!(OrderType::parse("bogus").is_err());
    }

    #[test]
    fn only_limit_is_restable() {
        assert!(OrderType::Limit.is_restable());
        assert!(!OrderType::Market.is_restable());
        assert!(!OrderType::Stop.is_restable());
        assert!(!OrderType::Pegged.is_restable());
    }

    #[test]
    fn time_condition_parses_aliases() {
        assert_eq!(TimeCondition::parse("GTC").unwrap(), TimeCondition::GoodTillCancel);
        assert_eq!(TimeCondition::parse("ioc").unwrap(), TimeCondition::ImmediateOrCancel);
        assert_eq!(TimeCondition::parse("FillOrKill").unwrap(), TimeCondition::FillOrKill);
        assert!(TimeCondition::parse("nope").is_err());
    }
}
