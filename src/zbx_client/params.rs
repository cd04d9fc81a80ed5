use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_with::serde_as;

use crate::codec::UnixTimestamp;
use crate::types::{EvalType, EventObject, SelectQuery, Severity, SortOrder, TagOperator};

/// Options shared by every `<object>.get` method.
#[derive(Clone, Debug, Default, Serialize)]
pub struct GetParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<SelectQuery>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(rename = "sortfield", skip_serializing_if = "Vec::is_empty")]
    pub sort_field: Vec<String>,
    #[serde(rename = "sortorder", skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editable: Option<bool>,
}

/// Parameters for `problem.get`.
///
/// Every filter is optional; unset filters are left out of the request.
/// Build one with struct update syntax:
///
/// ```
/// use zbxapi::types::SelectQuery;
/// use zbxapi::zbx_client::ProblemGetParams;
///
/// let params = ProblemGetParams {
///     recent: Some(true),
///     select_tags: Some(SelectQuery::Extend),
///     ..ProblemGetParams::default()
/// };
/// # let _ = params;
/// ```
#[serde_as]
#[derive(Clone, Debug, Default, Serialize)]
pub struct ProblemGetParams {
    #[serde(flatten)]
    pub base: GetParameters,

    #[serde(rename = "eventids", skip_serializing_if = "Vec::is_empty")]
    pub event_ids: Vec<String>,

    /// Problems on hosts in any of these host groups.
    #[serde(rename = "groupids", skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<String>,

    #[serde(rename = "hostids", skip_serializing_if = "Vec::is_empty")]
    pub host_ids: Vec<String>,

    #[serde(rename = "objectids", skip_serializing_if = "Vec::is_empty")]
    pub object_ids: Vec<String>,

    #[serde(rename = "applicationids", skip_serializing_if = "Vec::is_empty")]
    pub application_ids: Vec<String>,

    /// Always sent; the API treats problems as trigger problems by default.
    #[serde(rename = "object")]
    pub object_type: EventObject,

    /// `Some(true)` keeps acknowledged problems only, `Some(false)` keeps
    /// unacknowledged ones only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub suppressed: Option<bool>,

    /// Only honoured for trigger problems.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub severities: Vec<Severity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaltype: Option<EvalType>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagFilter>,

    /// Include problems resolved within the server's `ok_period`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent: Option<bool>,

    #[serde(rename = "eventid_from", skip_serializing_if = "Option::is_none")]
    pub event_id_from: Option<String>,

    #[serde(rename = "eventid_till", skip_serializing_if = "Option::is_none")]
    pub event_id_till: Option<String>,

    #[serde_as(as = "Option<UnixTimestamp>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_from: Option<DateTime<Utc>>,

    #[serde_as(as = "Option<UnixTimestamp>")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_till: Option<DateTime<Utc>>,

    /// Problem updates, newest first.
    #[serde(rename = "selectAcknowledges", skip_serializing_if = "Option::is_none")]
    pub select_acknowledges: Option<SelectQuery>,

    /// Maintenances currently suppressing the problem.
    #[serde(rename = "selectSuppressionData", skip_serializing_if = "Option::is_none")]
    pub select_suppression_data: Option<SelectQuery>,

    #[serde(rename = "selectTags", skip_serializing_if = "Option::is_none")]
    pub select_tags: Option<SelectQuery>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TagFilter {
    pub tag: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    pub operator: TagOperator,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    use super::{GetParameters, ProblemGetParams, TagFilter};
    use crate::types::{EvalType, SelectQuery, Severity, SortOrder, TagOperator};

    fn encode(params: &ProblemGetParams) -> Value {
        match serde_json::to_value(params) {
            Ok(value) => value,
            Err(err) => panic!("params failed to encode: {err}"),
        }
    }

    #[test]
    fn default_params_only_send_object_type() {
        assert_eq!(encode(&ProblemGetParams::default()), json!({"object": 0}));
    }

    #[test]
    fn false_filters_are_sent() {
        let params = ProblemGetParams {
            acknowledged: Some(false),
            recent: Some(false),
            ..ProblemGetParams::default()
        };
        assert_eq!(
            encode(&params),
            json!({"object": 0, "acknowledged": false, "recent": false})
        );
    }

    #[test]
    fn full_params_use_wire_names() {
        let params = ProblemGetParams {
            base: GetParameters {
                output: Some(SelectQuery::Extend),
                limit: Some(10),
                sort_field: vec!["eventid".to_string()],
                sort_order: Some(SortOrder::Desc),
                editable: None,
            },
            host_ids: vec!["10084".to_string()],
            severities: vec![Severity::High, Severity::Disaster],
            evaltype: Some(EvalType::Or),
            tags: vec![TagFilter {
                tag: "service".to_string(),
                value: "db".to_string(),
                operator: TagOperator::Equal,
            }],
            event_id_from: Some("100".to_string()),
            time_from: Utc.timestamp_opt(1_472_457_281, 0).single(),
            select_acknowledges: Some(SelectQuery::Extend),
            select_suppression_data: Some(SelectQuery::Extend),
            select_tags: Some(SelectQuery::fields(["tag"])),
            ..ProblemGetParams::default()
        };

        assert_eq!(
            encode(&params),
            json!({
                "output": "extend",
                "limit": 10,
                "sortfield": ["eventid"],
                "sortorder": "DESC",
                "hostids": ["10084"],
                "object": 0,
                "severities": [4, 5],
                "evaltype": 2,
                "tags": [{"tag": "service", "value": "db", "operator": 1}],
                "eventid_from": "100",
                "time_from": 1_472_457_281,
                "selectAcknowledges": "extend",
                "selectSuppressionData": "extend",
                "selectTags": ["tag"]
            })
        );
    }
}
