use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

use crate::codec::{NumericString, UnixTimestamp, ZbxBool};
use crate::error::ZbxError;
use crate::types::{EventObject, EventSource, Severity};

/// An active or recently resolved problem as returned by `problem.get`.
///
/// Nested collections are empty when the matching `select*` parameter was
/// not sent; that case is not distinguished from a selected but empty
/// collection.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(try_from = "RawProblem", into = "RawProblem")]
pub struct Problem {
    pub event_id: String,
    pub source: EventSource,
    pub object_type: EventObject,
    pub object_id: String,
    pub clock: DateTime<Utc>,
    /// `None` while the problem is still active.
    pub recovery: Option<Recovery>,
    pub correlation_id: Option<String>,
    pub user_id: Option<String>,
    pub name: String,
    pub severity: Severity,
    pub acknowledged: bool,
    pub suppressed: bool,
    pub opdata: String,
    /// Newest first, as delivered.
    pub acknowledges: Vec<ProblemAcknowledge>,
    pub suppression_data: Vec<ProblemSuppression>,
    pub tags: Vec<Tag>,
}

/// The recovery event that resolved a problem.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Recovery {
    pub event_id: String,
    pub clock: DateTime<Utc>,
}

impl Problem {
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.recovery.is_some()
    }
}

/// A problem update: acknowledgement, message, severity change, etc.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ProblemAcknowledge {
    #[serde(rename = "acknowledgeid")]
    pub acknowledge_id: String,
    #[serde(rename = "userid", default)]
    pub user_id: String,
    #[serde(rename = "eventid", default)]
    pub event_id: String,
    #[serde_as(as = "UnixTimestamp")]
    #[serde(default)]
    pub clock: DateTime<Utc>,
    #[serde(default)]
    pub message: String,
    #[serde_as(as = "NumericString")]
    #[serde(default)]
    pub action: AcknowledgeActions,
    #[serde_as(as = "NumericString")]
    #[serde(default)]
    pub old_severity: Severity,
    #[serde_as(as = "NumericString")]
    #[serde(default)]
    pub new_severity: Severity,
}

/// Bit mask of the actions performed by a problem update.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct AcknowledgeActions(pub i64);

impl AcknowledgeActions {
    pub const CLOSE: Self = Self(1);
    pub const ACKNOWLEDGE: Self = Self(2);
    pub const MESSAGE: Self = Self(4);
    pub const CHANGE_SEVERITY: Self = Self(8);
    pub const UNACKNOWLEDGE: Self = Self(16);
    pub const SUPPRESS: Self = Self(32);
    pub const UNSUPPRESS: Self = Self(64);
    pub const CHANGE_TO_CAUSE: Self = Self(128);
    pub const CHANGE_TO_SYMPTOM: Self = Self(256);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl From<i64> for AcknowledgeActions {
    fn from(bits: i64) -> Self {
        Self(bits)
    }
}

impl From<AcknowledgeActions> for i64 {
    fn from(value: AcknowledgeActions) -> Self {
        value.0
    }
}

/// A maintenance suppressing a problem.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
pub struct ProblemSuppression {
    #[serde(rename = "maintenanceid")]
    pub maintenance_id: String,
    /// Epoch means suppressed indefinitely.
    #[serde_as(as = "UnixTimestamp")]
    #[serde(default)]
    pub suppress_until: DateTime<Utc>,
    #[serde(rename = "userid", default)]
    pub user_id: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub tag: String,
    #[serde(default)]
    pub value: String,
}

/// Wire shape of a problem, before the record invariants are checked.
#[serde_as]
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct RawProblem {
    #[serde(rename = "eventid")]
    event_id: String,
    #[serde_as(as = "NumericString")]
    source: EventSource,
    #[serde(rename = "object")]
    #[serde_as(as = "NumericString")]
    object_type: EventObject,
    #[serde(rename = "objectid")]
    object_id: String,
    #[serde_as(as = "UnixTimestamp")]
    clock: DateTime<Utc>,
    #[serde(rename = "r_eventid")]
    recovery_event_id: String,
    #[serde(rename = "r_clock")]
    #[serde_as(as = "UnixTimestamp")]
    recovery_clock: DateTime<Utc>,
    #[serde(rename = "correlationid")]
    correlation_id: String,
    #[serde(rename = "userid")]
    user_id: String,
    name: String,
    #[serde_as(as = "NumericString")]
    severity: Severity,
    #[serde_as(as = "ZbxBool")]
    acknowledged: bool,
    #[serde_as(as = "ZbxBool")]
    suppressed: bool,
    opdata: String,
    #[serde_as(as = "DefaultOnNull")]
    acknowledges: Vec<ProblemAcknowledge>,
    #[serde_as(as = "DefaultOnNull")]
    suppression_data: Vec<ProblemSuppression>,
    #[serde_as(as = "DefaultOnNull")]
    tags: Vec<Tag>,
}

/// The API uses `"0"` (and occasionally `""`) for an unset reference.
fn reference(id: String) -> Option<String> {
    if id.is_empty() || id == "0" {
        None
    } else {
        Some(id)
    }
}

impl TryFrom<RawProblem> for Problem {
    type Error = ZbxError;

    fn try_from(value: RawProblem) -> Result<Self, Self::Error> {
        if value.event_id.is_empty() {
            return Err(ZbxError::InvalidField {
                field: "eventid",
                message: "problem has no event id".to_string(),
            });
        }

        let recovery_clock = value.recovery_clock;
        let recovery = match (reference(value.recovery_event_id), recovery_clock.timestamp()) {
            (None, 0) => None,
            (Some(event_id), secs) if secs != 0 => Some(Recovery {
                event_id,
                clock: recovery_clock,
            }),
            (event_id, secs) => {
                return Err(ZbxError::InvalidField {
                    field: "r_eventid",
                    message: format!(
                        "recovery event {event_id:?} and recovery clock {secs} must be set together"
                    ),
                });
            }
        };

        Ok(Self {
            event_id: value.event_id,
            source: value.source,
            object_type: value.object_type,
            object_id: value.object_id,
            clock: value.clock,
            recovery,
            correlation_id: reference(value.correlation_id),
            user_id: reference(value.user_id),
            name: value.name,
            severity: value.severity,
            acknowledged: value.acknowledged,
            suppressed: value.suppressed,
            opdata: value.opdata,
            acknowledges: value.acknowledges,
            suppression_data: value.suppression_data,
            tags: value.tags,
        })
    }
}

impl From<Problem> for RawProblem {
    fn from(value: Problem) -> Self {
        let (recovery_event_id, recovery_clock) = value.recovery.map_or_else(
            || ("0".to_string(), DateTime::<Utc>::default()),
            |r| (r.event_id, r.clock),
        );
        Self {
            event_id: value.event_id,
            source: value.source,
            object_type: value.object_type,
            object_id: value.object_id,
            clock: value.clock,
            recovery_event_id,
            recovery_clock,
            correlation_id: value.correlation_id.unwrap_or_else(|| "0".to_string()),
            user_id: value.user_id.unwrap_or_else(|| "0".to_string()),
            name: value.name,
            severity: value.severity,
            acknowledged: value.acknowledged,
            suppressed: value.suppressed,
            opdata: value.opdata,
            acknowledges: value.acknowledges,
            suppression_data: value.suppression_data,
            tags: value.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{AcknowledgeActions, Problem, Tag};
    use crate::types::{EventObject, EventSource, Severity};

    fn active_problem() -> Value {
        json!({
            "eventid": "1245463",
            "source": "0",
            "object": "0",
            "objectid": "15112",
            "clock": "1472457242",
            "ns": "209442442",
            "r_eventid": "0",
            "r_clock": "0",
            "r_ns": "0",
            "correlationid": "0",
            "userid": "0",
            "name": "Zabbix agent on localhost is unreachable for 5 minutes",
            "acknowledged": "1",
            "severity": "3",
            "suppressed": "0",
            "opdata": ""
        })
    }

    fn decode(raw: Value) -> Result<Problem, serde_json::Error> {
        serde_json::from_value(raw)
    }

    fn decode_ok(raw: Value) -> Problem {
        match decode(raw) {
            Ok(problem) => problem,
            Err(err) => panic!("problem failed to decode: {err}"),
        }
    }

    #[test]
    fn decodes_scalar_fields_to_native_types() {
        let problem = decode_ok(active_problem());
        assert_eq!(problem.event_id, "1245463");
        assert_eq!(problem.source, EventSource::Trigger);
        assert_eq!(problem.object_type, EventObject::Trigger);
        assert_eq!(problem.object_id, "15112");
        assert_eq!(problem.clock.timestamp(), 1_472_457_242);
        assert_eq!(problem.severity, Severity::Average);
        assert!(problem.acknowledged);
        assert!(!problem.suppressed);
        assert!(problem.correlation_id.is_none());
        assert!(problem.user_id.is_none());
        assert!(!problem.is_resolved());
    }

    #[test]
    fn resolved_problem_carries_recovery_pair() {
        let mut raw = active_problem();
        raw["r_eventid"] = json!("1245470");
        raw["r_clock"] = json!("1472457300");
        let problem = decode_ok(raw);
        let recovery = match problem.recovery {
            Some(recovery) => recovery,
            None => panic!("expected a recovery"),
        };
        assert_eq!(recovery.event_id, "1245470");
        assert_eq!(recovery.clock.timestamp(), 1_472_457_300);
    }

    #[test]
    fn half_set_recovery_is_rejected() {
        let mut only_id = active_problem();
        only_id["r_eventid"] = json!("1245470");
        assert!(decode(only_id).is_err());

        let mut only_clock = active_problem();
        only_clock["r_clock"] = json!(1_472_457_300);
        assert!(decode(only_clock).is_err());
    }

    #[test]
    fn empty_event_id_is_rejected() {
        let mut raw = active_problem();
        raw["eventid"] = json!("");
        assert!(decode(raw).is_err());
        assert!(decode(json!({"name": "no id"})).is_err());
    }

    #[test]
    fn malformed_scalars_fail_decoding() {
        let mut raw = active_problem();
        raw["acknowledged"] = json!("yes");
        let err = match decode(raw) {
            Ok(problem) => panic!("decoded {problem:?}"),
            Err(err) => err.to_string(),
        };
        assert!(err.contains("malformed boolean"), "{err}");

        let mut raw = active_problem();
        raw["clock"] = json!("yesterday");
        assert!(decode(raw).is_err());
    }

    #[test]
    fn missing_and_empty_tags_are_indistinguishable() {
        let without = decode_ok(active_problem());

        let mut raw = active_problem();
        raw["tags"] = json!([]);
        let selected = decode_ok(raw);

        let mut raw = active_problem();
        raw["tags"] = Value::Null;
        let null = decode_ok(raw);

        assert!(without.tags.is_empty());
        assert_eq!(without, selected);
        assert_eq!(without, null);
    }

    #[test]
    fn nested_collections_keep_server_order() {
        let mut raw = active_problem();
        raw["acknowledges"] = json!([
            {
                "acknowledgeid": "2",
                "userid": "1",
                "eventid": "1245463",
                "clock": "1472457290",
                "message": "escalated",
                "action": "14",
                "old_severity": "3",
                "new_severity": "4"
            },
            {
                "acknowledgeid": "1",
                "userid": "1",
                "eventid": "1245463",
                "clock": "1472457281",
                "message": "problem solved",
                "action": "6",
                "old_severity": "0",
                "new_severity": "0"
            }
        ]);
        raw["suppression_data"] = json!([{"maintenanceid": "15", "suppress_until": "1472511600"}]);
        raw["tags"] = json!([
            {"tag": "service", "value": "web"},
            {"tag": "env", "value": "prod"}
        ]);

        let problem = decode_ok(raw);
        let ids: Vec<&str> = problem
            .acknowledges
            .iter()
            .map(|ack| ack.acknowledge_id.as_str())
            .collect();
        assert_eq!(ids, ["2", "1"]);

        let latest = &problem.acknowledges[0];
        assert!(latest.action.contains(AcknowledgeActions::CHANGE_SEVERITY));
        assert!(latest.action.contains(AcknowledgeActions::MESSAGE));
        assert!(!latest.action.contains(AcknowledgeActions::CLOSE));
        assert_eq!(latest.new_severity, Severity::High);

        assert_eq!(problem.suppression_data[0].maintenance_id, "15");
        assert_eq!(problem.suppression_data[0].suppress_until.timestamp(), 1_472_511_600);
        assert_eq!(
            problem.tags,
            vec![
                Tag {
                    tag: "service".to_string(),
                    value: "web".to_string()
                },
                Tag {
                    tag: "env".to_string(),
                    value: "prod".to_string()
                },
            ]
        );
    }

    #[test]
    fn encodes_back_to_wire_shape() {
        let problem = decode_ok(active_problem());
        let encoded = match serde_json::to_value(&problem) {
            Ok(encoded) => encoded,
            Err(err) => panic!("problem failed to encode: {err}"),
        };
        assert_eq!(encoded["severity"], json!("3"));
        assert_eq!(encoded["acknowledged"], json!("1"));
        assert_eq!(encoded["clock"], json!(1_472_457_242));
        assert_eq!(encoded["r_eventid"], json!("0"));
        assert_eq!(encoded["r_clock"], json!(0));
        assert_eq!(decode_ok(encoded), problem);
    }
}
