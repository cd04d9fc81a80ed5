use serde::{Deserialize, Serialize};
use serde_json::Value;

const BODY_PREVIEW_LIMIT: usize = 256;

/// Response envelope. `result` stays untyped here so that a malformed
/// envelope and a result that does not fit the caller's type can be told
/// apart.
#[derive(Debug, Deserialize)]
pub(super) struct RpcEnvelope {
    #[allow(dead_code)]
    pub(super) jsonrpc: String,
    #[serde(default)]
    pub(super) result: Option<Value>,
    #[serde(default)]
    pub(super) error: Option<RpcError>,
    #[allow(dead_code)]
    #[serde(default)]
    pub(super) id: Value,
}

#[derive(Debug, Deserialize)]
pub(super) struct RpcError {
    pub(super) code: i64,
    pub(super) message: String,
    #[serde(default)]
    pub(super) data: Option<String>,
}

#[derive(Serialize)]
pub(super) struct RpcRequest<'a> {
    pub(super) jsonrpc: &'static str,
    pub(super) method: &'a str,
    pub(super) params: &'a Value,
    pub(super) id: u64,
    pub(super) auth: &'a str,
}

pub(super) fn body_preview(body: &[u8]) -> String {
    if body.is_empty() {
        return "<empty>".to_string();
    }
    let end = body.len().min(BODY_PREVIEW_LIMIT);
    let mut preview = String::from_utf8_lossy(&body[..end]).to_string();
    if body.len() > BODY_PREVIEW_LIMIT {
        preview.push_str("...");
    }
    preview.replace('\n', "\\n")
}

#[cfg(test)]
mod tests {
    use super::{RpcEnvelope, body_preview};

    #[test]
    fn preview_truncates_and_escapes() {
        let long = "a\n".repeat(200);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(!preview.contains('\n'));
        assert_eq!(body_preview(b""), "<empty>");
    }

    #[test]
    fn envelope_keeps_null_result_distinct_from_empty() {
        let empty: RpcEnvelope =
            match serde_json::from_str(r#"{"jsonrpc":"2.0","result":[],"id":1}"#) {
                Ok(env) => env,
                Err(err) => panic!("envelope rejected: {err}"),
            };
        assert_eq!(empty.result, Some(serde_json::json!([])));

        let missing: RpcEnvelope = match serde_json::from_str(r#"{"jsonrpc":"2.0","id":1}"#) {
            Ok(env) => env,
            Err(err) => panic!("envelope rejected: {err}"),
        };
        assert!(missing.result.is_none());
        assert!(missing.error.is_none());
    }
}
