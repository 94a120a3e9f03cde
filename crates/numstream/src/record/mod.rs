//! Timestamped random-number records and their unbounded lazy generator.
//!
//! A [`Record`] carries exactly three fields, always serialized in the order
//! `index`, `time`, `number`:
//!
//! ```json
//! {"index":0,"time":"2025-01-01T00:00:00.000Z","number":1234}
//! ```

mod generator;

pub use generator::*;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer, ser::Error as _};

/// A single generated record.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Record {
    /// Zero-based position in the session's sequence.
    pub index: u64,
    /// Capture time, in milliseconds since the Unix epoch. Serialized as an
    /// RFC 3339 UTC string with millisecond precision.
    #[serde(serialize_with = "serialize_rfc3339_millis")]
    pub time: u64,
    /// Random number in `[0, 2^128)`.
    pub number: u128,
}

impl Record {
    /// Returns the capture time as a [`DateTime`], or `None` if it lies
    /// outside the range `chrono` can represent.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.time)
            .ok()
            .and_then(DateTime::from_timestamp_millis)
    }
}

fn serialize_rfc3339_millis<S: Serializer>(millis: &u64, serializer: S) -> Result<S::Ok, S::Error> {
    let time = i64::try_from(*millis)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .ok_or_else(|| S::Error::custom(format!("timestamp {millis}ms is out of range")))?;
    serializer.serialize_str(&time.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_fields_in_fixed_order() {
        let record = Record {
            index: 7,
            time: 1_735_689_600_123,
            number: 42,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"index":7,"time":"2025-01-01T00:00:00.123Z","number":42}"#
        );
    }

    #[test]
    fn serializes_full_width_numbers_without_precision_loss() {
        let record = Record {
            index: 0,
            time: 0,
            number: u128::MAX,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.ends_with(r#""number":340282366920938463463374607431768211455}"#));
    }

    #[test]
    fn out_of_range_time_is_rejected() {
        let record = Record {
            index: 0,
            time: u64::MAX,
            number: 1,
        };
        assert!(serde_json::to_string(&record).is_err());
        assert!(record.datetime().is_none());
    }

    #[test]
    fn datetime_matches_millis() {
        let record = Record {
            index: 0,
            time: 1_000,
            number: 0,
        };
        assert_eq!(record.datetime().unwrap().timestamp_millis(), 1_000);
    }
}
