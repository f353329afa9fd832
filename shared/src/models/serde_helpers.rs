//! Common serde helpers for IDs and timestamps
//!
//! IDs are 64-bit integers in the database but travel as JSON strings to
//! avoid precision loss in clients that read them as IEEE 754 doubles.
//! Deserialization accepts both forms:
//! - string "1234567890123" (from API JSON)
//! - native integer (from older payloads and test fixtures)
//!
//! Timestamps are Unix millis in the database and RFC 3339 strings on the
//! wire, with the same dual-format tolerance on input.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serializer};
use std::fmt;

struct FlexibleId;

impl<'de> Visitor<'de> for FlexibleId {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an i64 or a string containing an i64")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(value).map_err(|_| de::Error::custom(format!("ID out of range: {}", value)))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        value
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("invalid ID: {}", value)))
    }
}

struct FlexibleMillis;

impl<'de> Visitor<'de> for FlexibleMillis {
    type Value = i64;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an RFC 3339 datetime string or Unix millis")
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(value)
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(value)
            .map_err(|_| de::Error::custom(format!("timestamp out of range: {}", value)))
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.timestamp_millis())
            .map_err(|_| de::Error::custom(format!("invalid datetime: {}", value)))
    }
}

/// Render Unix millis as an RFC 3339 UTC string
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// i64 ID as "1234567890123" string
pub mod id_string {
    use super::*;

    pub fn serialize<S>(id: &i64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    pub fn deserialize<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(FlexibleId)
    }
}

/// Option<i64> ID serialization
pub mod option_id_string {
    use super::*;

    pub fn serialize<S>(id: &Option<i64>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => s.serialize_some(&id.to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrap(#[serde(with = "super::id_string")] i64);

        Option::<Wrap>::deserialize(d).map(|opt| opt.map(|w| w.0))
    }
}

/// Unix millis as RFC 3339 UTC string
pub mod datetime_millis {
    use super::*;

    pub fn serialize<S>(millis: &i64, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.serialize_str(&millis_to_rfc3339(*millis))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        d.deserialize_any(FlexibleMillis)
    }
}

/// Option<i64> millis serialization
pub mod option_datetime_millis {
    use super::*;

    pub fn serialize<S>(millis: &Option<i64>, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match millis {
            Some(m) => s.serialize_some(&millis_to_rfc3339(*m)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Option<i64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrap(#[serde(with = "super::datetime_millis")] i64);

        Option::<Wrap>::deserialize(d).map(|opt| opt.map(|w| w.0))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        #[serde(with = "super::id_string")]
        id: i64,
        #[serde(with = "super::datetime_millis")]
        at: i64,
    }

    #[test]
    fn ids_serialize_as_strings() {
        let record = Record {
            id: 9_007_199_254_740_993, // would lose precision as a JSON double
            at: 0,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "9007199254740993");
    }

    #[test]
    fn ids_deserialize_from_string_or_number() {
        let from_string: Record =
            serde_json::from_value(serde_json::json!({ "id": "42", "at": 0 })).unwrap();
        let from_number: Record =
            serde_json::from_value(serde_json::json!({ "id": 42, "at": 0 })).unwrap();
        assert_eq!(from_string, from_number);

        let err = serde_json::from_value::<Record>(serde_json::json!({ "id": "b01", "at": 0 }));
        assert!(err.is_err());
    }

    #[test]
    fn millis_round_trip_as_rfc3339() {
        let record = Record {
            id: 1,
            at: 1_748_804_400_000, // 2025-06-01T19:00:00Z
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["at"], "2025-06-01T19:00:00.000Z");

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back.at, record.at);

        // integer millis are accepted too
        let from_int: Record =
            serde_json::from_value(serde_json::json!({ "id": 1, "at": 1_748_804_400_000_i64 }))
                .unwrap();
        assert_eq!(from_int.at, record.at);
    }
}
