//! Adapters for the scalars the Zabbix API encodes unconventionally.
//!
//! The API sends most integers and booleans as JSON strings (`"3"`, `"1"`)
//! and is not consistent about it between endpoints, so every adapter here
//! accepts both the string and the bare-number form. Each adapter is usable
//! as a newtype or, through `serde_with`, on a field of the native type:
//!
//! ```ignore
//! #[serde_as(as = "UnixTimestamp")]
//! clock: DateTime<Utc>,
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

use crate::error::CodecError;

/// Seconds since the Unix epoch, UTC. `0` is a valid value and decodes to
/// the epoch itself.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct UnixTimestamp(pub DateTime<Utc>);

impl UnixTimestamp {
    /// # Errors
    ///
    /// Returns [`CodecError::MalformedTimestamp`] when `secs` is outside the
    /// range chrono can represent.
    pub fn from_secs(secs: i64) -> Result<Self, CodecError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| CodecError::MalformedTimestamp(secs.to_string()))
    }

    #[must_use]
    pub fn secs(self) -> i64 {
        self.0.timestamp()
    }

    #[must_use]
    pub fn is_epoch(self) -> bool {
        self.secs() == 0
    }
}

impl FromStr for UnixTimestamp {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs = s
            .parse::<i64>()
            .map_err(|_| CodecError::MalformedTimestamp(s.to_string()))?;
        Self::from_secs(secs)
    }
}

impl From<UnixTimestamp> for DateTime<Utc> {
    fn from(value: UnixTimestamp) -> Self {
        value.0
    }
}

impl From<DateTime<Utc>> for UnixTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value)
    }
}

struct TimestampVisitor;

impl TimestampVisitor {
    fn reject<E: de::Error>(raw: impl fmt::Display) -> E {
        E::custom(CodecError::MalformedTimestamp(raw.to_string()))
    }
}

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = UnixTimestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a unix timestamp as a number or numeral string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        UnixTimestamp::from_secs(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let secs = i64::try_from(v).map_err(|_| Self::reject(v))?;
        self.visit_i64(secs)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(Self::reject(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Err(Self::reject(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(Self::reject("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(Self::reject("null"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Self::Value, A::Error> {
        Err(Self::reject("array"))
    }

    fn visit_map<A: MapAccess<'de>>(self, _map: A) -> Result<Self::Value, A::Error> {
        Err(Self::reject("object"))
    }
}

impl<'de> Deserialize<'de> for UnixTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

/// Timestamps go back on the wire as plain JSON numbers.
impl Serialize for UnixTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.secs())
    }
}

impl<'de> DeserializeAs<'de, DateTime<Utc>> for UnixTimestamp {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        Self::deserialize(deserializer).map(|ts| ts.0)
    }
}

impl SerializeAs<DateTime<Utc>> for UnixTimestamp {
    fn serialize_as<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp())
    }
}

/// Boolean carried as `"0"` / `"1"`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ZbxBool(pub bool);

impl ZbxBool {
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        if self.0 { "1" } else { "0" }
    }
}

impl FromStr for ZbxBool {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "0" => Ok(Self(false)),
            "1" => Ok(Self(true)),
            other => Err(CodecError::MalformedBoolean(other.to_string())),
        }
    }
}

impl From<bool> for ZbxBool {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl From<ZbxBool> for bool {
    fn from(value: ZbxBool) -> Self {
        value.0
    }
}

struct BoolVisitor;

impl BoolVisitor {
    fn reject<E: de::Error>(raw: impl fmt::Display) -> E {
        E::custom(CodecError::MalformedBoolean(raw.to_string()))
    }
}

impl<'de> Visitor<'de> for BoolVisitor {
    type Value = ZbxBool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(r#""0" or "1""#)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        match v {
            0 => Ok(ZbxBool(false)),
            1 => Ok(ZbxBool(true)),
            other => Err(Self::reject(other)),
        }
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        match u64::try_from(v) {
            Ok(v) => self.visit_u64(v),
            Err(_) => Err(Self::reject(v)),
        }
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(Self::reject(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Err(Self::reject(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(Self::reject("null"))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(Self::reject("null"))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, _seq: A) -> Result<Self::Value, A::Error> {
        Err(Self::reject("array"))
    }

    fn visit_map<A: MapAccess<'de>>(self, _map: A) -> Result<Self::Value, A::Error> {
        Err(Self::reject("object"))
    }
}

impl<'de> Deserialize<'de> for ZbxBool {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(BoolVisitor)
    }
}

impl Serialize for ZbxBool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> DeserializeAs<'de, bool> for ZbxBool {
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Self::deserialize(deserializer).map(|b| b.0)
    }
}

impl SerializeAs<bool> for ZbxBool {
    fn serialize_as<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        ZbxBool(*value).serialize(serializer)
    }
}

/// Integer-valued field sent as a numeral string, e.g. `"severity": "3"`.
///
/// Works for any `T` convertible from and into `i64`, which covers the
/// enum-like codes in [`crate::types`].
pub struct NumericString;

struct NumberVisitor;

impl NumberVisitor {
    fn reject<E: de::Error>(raw: impl fmt::Display) -> E {
        E::custom(CodecError::MalformedNumber(raw.to_string()))
    }
}

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or numeral string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(v)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v).map_err(|_| Self::reject(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse::<i64>().map_err(|_| Self::reject(v))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Err(Self::reject(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Err(Self::reject(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Err(Self::reject("null"))
    }
}

impl<'de, T> DeserializeAs<'de, T> for NumericString
where
    T: From<i64>,
{
    fn deserialize_as<D: Deserializer<'de>>(deserializer: D) -> Result<T, D::Error> {
        deserializer.deserialize_any(NumberVisitor).map(T::from)
    }
}

impl<T> SerializeAs<T> for NumericString
where
    T: Copy + Into<i64>,
{
    fn serialize_as<S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        let raw: i64 = (*value).into();
        serializer.collect_str(&raw)
    }
}
