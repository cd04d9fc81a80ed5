use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::DeserializeAs;

use crate::codec::NumericString;

/// Declares an integer-coded API enum that keeps unknown codes decodable.
///
/// Generated types convert to and from `i64`, serialize as plain integers
/// (request side) and deserialize from numbers or numeral strings.
macro_rules! wire_code_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = $code:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            Other(i64),
        }

        impl From<i64> for $name {
            fn from(code: i64) -> Self {
                match code {
                    $($code => Self::$variant,)+
                    other => Self::Other(other),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                match value {
                    $($name::$variant => $code,)+
                    $name::Other(code) => code,
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(i64::from(*self))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <NumericString as DeserializeAs<'de, i64>>::deserialize_as(deserializer)
                    .map(Self::from)
            }
        }
    };
}

wire_code_enum! {
    /// Subsystem that produced an event.
    pub enum EventSource {
        Trigger = 0,
        Discovery = 1,
        AutoRegistration = 2,
        Internal = 3,
        Service = 4,
    }
}

wire_code_enum! {
    /// Kind of monitored object an event refers to.
    pub enum EventObject {
        Trigger = 0,
        DiscoveredHost = 1,
        DiscoveredService = 2,
        AutoRegisteredHost = 3,
        Item = 4,
        LldRule = 5,
        Service = 6,
    }
}

wire_code_enum! {
    pub enum Severity {
        NotClassified = 0,
        Information = 1,
        Warning = 2,
        Average = 3,
        High = 4,
        Disaster = 5,
    }
}

impl Default for EventSource {
    fn default() -> Self {
        Self::Trigger
    }
}

impl Default for EventObject {
    fn default() -> Self {
        Self::Trigger
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::NotClassified
    }
}

/// Human-readable label for a severity code.
///
/// Codes outside `0..=5` map to an empty label rather than an error; callers
/// rendering unknown severities get a blank column.
#[must_use]
pub const fn severity_label(key: i64) -> &'static str {
    match key {
        0 => "not classified",
        1 => "information",
        2 => "warning",
        3 => "average",
        4 => "high",
        5 => "disaster",
        _ => "",
    }
}

impl Severity {
    #[must_use]
    pub fn code(self) -> i64 {
        i64::from(self)
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        severity_label(self.code())
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<i64>() {
            return match Self::from(code) {
                Self::Other(other) => Err(format!("unknown severity code: {other}")),
                known => Ok(known),
            };
        }
        match s.to_ascii_lowercase().replace(['-', '_'], " ").as_str() {
            "not classified" | "nc" => Ok(Self::NotClassified),
            "info" | "information" => Ok(Self::Information),
            "warn" | "warning" => Ok(Self::Warning),
            "average" => Ok(Self::Average),
            "high" => Ok(Self::High),
            "disaster" => Ok(Self::Disaster),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// Value of a `select*` or `output` directive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectQuery {
    /// `"extend"`: return every property of the sub-object.
    Extend,
    /// Return only the named properties.
    Fields(Vec<String>),
}

impl SelectQuery {
    pub fn fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(fields.into_iter().map(Into::into).collect())
    }
}

impl Serialize for SelectQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Extend => serializer.serialize_str("extend"),
            Self::Fields(fields) => fields.serialize(serializer),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// How tag filters combine.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EvalType {
    #[default]
    AndOr,
    Or,
}

impl Serialize for EvalType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::AndOr => 0,
            Self::Or => 2,
        })
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TagOperator {
    #[default]
    Like,
    Equal,
    NotLike,
    NotEqual,
    Exists,
    NotExists,
}

impl Serialize for TagOperator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(match self {
            Self::Like => 0,
            Self::Equal => 1,
            Self::NotLike => 2,
            Self::NotEqual => 3,
            Self::Exists => 4,
            Self::NotExists => 5,
        })
    }
}
