use chrono::{DateTime, TimeZone, Utc};

use crate::errors::OrderBookError;

/// A point in time accepted as either an integer epoch-millis, a float
/// seconds, or an ISO-8601 string (`YYYY-MM-DDTHH:MM:SS.sssZ`, UTC).
///
/// Internally stored as milliseconds since the epoch, matching the `Order`
/// struct's `timestamp`/`transactTime` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

/// Raw, unparsed timestamp input as accepted across the wire/API boundary.
#[derive(Debug, Clone)]
pub enum RawTimestamp {
    EpochMillis(i64),
    EpochSeconds(f64),
    Iso8601(String),
}

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    pub fn millis(self) -> i64 {
        self.0
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }

    pub fn parse(raw: RawTimestamp) -> Result<Timestamp, OrderBookError> {
        match raw {
            RawTimestamp::EpochMillis(millis) => Ok(Timestamp(millis)),
            RawTimestamp::EpochSeconds(secs) => {
                if !secs.is_finite() {
                    return Err(OrderBookError::InvalidTimestamp(format!(
                        "non-finite epoch seconds: {secs}"
                    )));
                }
                Ok(Timestamp((secs * 1000.0).round() as i64))
            }
            RawTimestamp::Iso8601(ref s) => {
                let dt = DateTime::parse_from_rfc3339(s)
                    .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ"))
                    .map_err(|e| {
                        OrderBookError::InvalidTimestamp(format!("{s}: {e}"))
                    })?;
                Ok(Timestamp(dt.timestamp_millis()))
            }
        }
    }
}
