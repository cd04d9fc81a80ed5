use std::fmt;
use std::time::Duration;

use humantime::{format_duration, parse_duration};
use serde::de::{self, Visitor};
use serde_with::{DeserializeAs, SerializeAs};

/// Duration written as a humantime string (`"30s"`, `"1m 30s"`) or as a bare
/// number of seconds.
pub(crate) struct HumantimeDuration;

struct DurationVisitor;

impl Visitor<'_> for DurationVisitor {
    type Value = Duration;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a duration such as \"30s\" or a number of seconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_duration(v.trim()).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Duration::from_secs(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        u64::try_from(v)
            .map(Duration::from_secs)
            .map_err(|_| E::custom(format!("negative duration: {v}")))
    }
}

impl<'de> DeserializeAs<'de, Duration> for HumantimeDuration {
    fn deserialize_as<D>(deserializer: D) -> std::result::Result<Duration, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(DurationVisitor)
    }
}

impl SerializeAs<Duration> for HumantimeDuration {
    fn serialize_as<S>(value: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format_duration(*value).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::HumantimeDuration;
    use serde::Deserialize;
    use serde_with::serde_as;
    use std::time::Duration;

    #[serde_as]
    #[derive(Deserialize)]
    struct Sample {
        #[serde_as(as = "Option<HumantimeDuration>")]
        duration: Option<Duration>,
    }

    fn parse(raw: &str) -> Option<Duration> {
        match serde_json::from_str::<Sample>(raw) {
            Ok(value) => value.duration,
            Err(err) => panic!("failed to parse sample json {raw}: {err}"),
        }
    }

    #[test]
    fn humantime_duration_parses_strings() {
        assert_eq!(parse(r#"{"duration":"5s"}"#), Some(Duration::from_secs(5)));
        assert_eq!(parse(r#"{"duration":"1m 30s"}"#), Some(Duration::from_secs(90)));
    }

    #[test]
    fn humantime_duration_accepts_bare_seconds() {
        assert_eq!(parse(r#"{"duration":12}"#), Some(Duration::from_secs(12)));
        assert_eq!(parse(r#"{"duration":null}"#), None);
    }
}
