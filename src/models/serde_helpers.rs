//! Serde helpers for timestamps coming from JavaScript
//!
//! Callers hand us whatever their date pickers produce: naive local
//! timestamps, bare dates, `Date.toISOString()` instants, or the epoch
//! milliseconds of `Date.getTime()`. Everything is normalized to a naive
//! local wall-clock value, which is what the printed forms show.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{de, Deserialize, Deserializer, Serializer};

const SERIALIZE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A timestamp as it arrives on the wire
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Text(String),
    EpochMillis(f64),
}

impl RawTimestamp {
    fn is_blank(&self) -> bool {
        matches!(self, RawTimestamp::Text(raw) if raw.trim().is_empty())
    }

    fn resolve(self) -> Result<NaiveDateTime, String> {
        match self {
            RawTimestamp::Text(raw) => parse_datetime(&raw),
            RawTimestamp::EpochMillis(millis) => from_epoch_millis(millis),
        }
    }
}

/// Local wall-clock time for milliseconds since the Unix epoch
pub fn from_epoch_millis(millis: f64) -> Result<NaiveDateTime, String> {
    if !millis.is_finite() {
        return Err(format!("timestamp {} is not a finite number", millis));
    }
    DateTime::from_timestamp_millis(millis.trunc() as i64)
        .map(|instant| instant.with_timezone(&Local).naive_local())
        .ok_or_else(|| format!("timestamp {} is out of range", millis))
}

/// Parse a timestamp in any of the accepted shapes
pub fn parse_datetime(raw: &str) -> Result<NaiveDateTime, String> {
    let raw = raw.trim();

    // RFC 3339 instants carry an offset; show them in local time
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }

    Err(format!("unrecognized timestamp '{}'", raw))
}

/// `#[serde(with = "flexible_datetime")]` for required timestamps
pub mod flexible_datetime {
    use super::*;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format(SERIALIZE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawTimestamp::deserialize(deserializer)?
            .resolve()
            .map_err(de::Error::custom)
    }
}

/// `#[serde(default, with = "flexible_datetime_opt")]` for optional timestamps
pub mod flexible_datetime_opt {
    use super::*;

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(v) => serializer.serialize_some(&v.format(SERIALIZE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawTimestamp>::deserialize(deserializer)? {
            Some(raw) if !raw.is_blank() => raw.resolve().map(Some).map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// `#[serde(with = "flexible_date")]` for calendar dates
pub mod flexible_date {
    use super::*;

    pub fn serialize<S>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawTimestamp::deserialize(deserializer)?
            .resolve()
            .map(|timestamp| timestamp.date())
            .map_err(de::Error::custom)
    }
}
