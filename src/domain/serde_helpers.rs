//! Serde adapters shared by the request and response types.

use serde::{de, Deserialize, Deserializer, Serializer};
use chrono::NaiveDateTime;

use crate::db::TIMESTAMP_FORMAT;

/// Distinguishes an absent key from an explicit `null` on nullable columns:
/// absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
/// Pair with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Timestamps go over the wire in the same form they are stored.
pub mod timestamp {
    use super::*;

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(de::Error::custom)
    }
}

/// Accepts `true`/`false` as well as the `0`/`1` integers SQLite clients
/// tend to send for boolean columns.
pub mod flexible_bool {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrInt {
        Bool(bool),
        Int(i64),
    }

    fn to_bool<E: de::Error>(value: BoolOrInt) -> Result<bool, E> {
        match value {
            BoolOrInt::Bool(b) => Ok(b),
            BoolOrInt::Int(0) => Ok(false),
            BoolOrInt::Int(1) => Ok(true),
            BoolOrInt::Int(other) => Err(E::custom(format!(
                "expected a boolean or 0/1, got {}",
                other
            ))),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        to_bool(BoolOrInt::deserialize(deserializer)?)
    }

    pub fn option<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<BoolOrInt>::deserialize(deserializer)?
            .map(to_bool)
            .transpose()
    }
}
