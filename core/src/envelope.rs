//! The JSON envelope wrapped around every well-formed Yext API response.
//!
//! ```json
//! {"meta": {"uuid": "...", "errors": [{"code": 2000, "type": "FATAL_ERROR", "message": "..."}]},
//!  "response": {}}
//! ```
//!
//! The shape of `response` depends on the endpoint, so the transport layer
//! keeps it as an untyped `serde_json::Value` and the resource wrappers
//! decode it into their own types. `meta` is read on a best-effort basis:
//! a success body never fails because its metadata looks unusual.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Severity of a message in `meta.errors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    FatalError,
    NonFatalError,
    Warning,
    /// A severity this SDK does not know yet.
    #[serde(other)]
    Unknown,
}

/// One entry of `meta.errors`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub code: i64,
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: MessageType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<ResponseMessage>,
}

fn unknown_kind() -> MessageType {
    MessageType::Unknown
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A decoded success body. Missing fields default instead of failing: the
/// API does not promise every body has the full shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    #[serde(default)]
    pub meta: ResponseMeta,
    #[serde(default)]
    pub response: T,
}

impl ApiResponse {
    /// Split a decoded success body into envelope parts without validating
    /// it. `response` is taken as is (null when missing); `meta` falls back
    /// to its default when it does not have the documented shape.
    pub fn from_value(body: Value) -> Self {
        let Value::Object(mut fields) = body else {
            return Self::default();
        };
        let response = fields.remove("response").unwrap_or_default();
        let meta = match fields.remove("meta") {
            Some(meta) => serde_json::from_value(meta).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "ignoring malformed response meta");
                ResponseMeta::default()
            }),
            None => ResponseMeta::default(),
        };
        Self { meta, response }
    }

    /// Decode the opaque `response` payload into the caller's type.
    pub fn into_response<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.response).map_err(ApiError::Deserialization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_full_envelope() {
        let envelope: ApiResponse = serde_json::from_value(json!({
            "meta": {
                "uuid": "abc",
                "errors": [{"code": 2000, "type": "WARNING", "message": "heads up"}]
            },
            "response": {"id": "loc1"}
        }))
        .unwrap();
        assert_eq!(envelope.meta.uuid, "abc");
        assert_eq!(envelope.meta.errors[0].kind, MessageType::Warning);
        assert_eq!(envelope.meta.errors[0].code, 2000);
        assert_eq!(envelope.response, json!({"id": "loc1"}));
    }

    #[test]
    fn missing_meta_and_response_default() {
        let envelope: ApiResponse = serde_json::from_str("{}").unwrap();
        assert!(envelope.meta.errors.is_empty());
        assert!(envelope.response.is_null());
    }

    #[test]
    fn severity_wire_names() {
        let kinds: Vec<MessageType> =
            serde_json::from_str(r#"["FATAL_ERROR","NON_FATAL_ERROR","WARNING"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                MessageType::FatalError,
                MessageType::NonFatalError,
                MessageType::Warning
            ]
        );
    }

    #[test]
    fn unknown_severity_is_tolerated() {
        let envelope = ApiResponse::from_value(json!({
            "meta": {"uuid": "u", "errors": [{"code": 1, "type": "INFO", "message": "m"}]},
            "response": {"a": 1}
        }));
        assert_eq!(envelope.meta.errors[0].kind, MessageType::Unknown);
        assert_eq!(envelope.meta.errors[0].message, "m");
        assert_eq!(envelope.response, json!({"a": 1}));
    }

    #[test]
    fn null_uuid_and_errors_default() {
        let envelope = ApiResponse::from_value(json!({
            "meta": {"uuid": null, "errors": null},
            "response": {"a": 1}
        }));
        assert_eq!(envelope.meta.uuid, "");
        assert!(envelope.meta.errors.is_empty());
        assert_eq!(envelope.response, json!({"a": 1}));
    }

    #[test]
    fn malformed_meta_keeps_response() {
        let envelope = ApiResponse::from_value(json!({
            "meta": "unexpected",
            "response": [1, 2, 3]
        }));
        assert_eq!(envelope.meta, ResponseMeta::default());
        assert_eq!(envelope.response, json!([1, 2, 3]));
    }

    #[test]
    fn non_object_body_has_null_response() {
        let envelope = ApiResponse::from_value(json!([1, 2]));
        assert!(envelope.response.is_null());
        assert!(envelope.meta.errors.is_empty());
    }

    #[test]
    fn into_response_reports_shape_mismatch() {
        let envelope = ApiResponse {
            meta: ResponseMeta::default(),
            response: json!("not an object"),
        };
        let err = envelope
            .into_response::<std::collections::BTreeMap<String, String>>()
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
