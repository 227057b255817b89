use serde::Deserialize;
use serde_json::Value;

use crate::domain::{OK_CODE, SendSmsResponse};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Server-reported failure extracted from a decoded body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteFailure {
    pub code: Option<String>,
    pub message: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SendSmsJsonResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    biz_id: Option<String>,
    #[serde(default)]
    request_id: Option<String>,
}

pub fn decode_json_response(body: &str) -> Result<Value, TransportError> {
    Ok(serde_json::from_str(body)?)
}

/// Error fields of a response body, without judging whether it is an error.
pub fn remote_failure_fields(body: &Value) -> RemoteFailure {
    let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_owned);
    RemoteFailure {
        code: field("Code"),
        message: field("Message"),
        request_id: field("RequestId"),
    }
}

/// `Some` when the body carries a `Code` other than `OK`.
///
/// Bodies without a `Code` are passed through; business codes are not interpreted further.
pub fn remote_failure(body: &Value) -> Option<RemoteFailure> {
    let failure = remote_failure_fields(body);
    match failure.code.as_deref() {
        Some(code) if code != OK_CODE => Some(failure),
        _ => None,
    }
}

pub fn decode_send_sms_response(body: &Value) -> Result<SendSmsResponse, TransportError> {
    let parsed = SendSmsJsonResponse::deserialize(body)?;
    Ok(SendSmsResponse {
        code: parsed.code,
        message: parsed.message,
        biz_id: parsed.biz_id,
        request_id: parsed.request_id,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decode_rejects_non_json() {
        assert!(matches!(
            decode_json_response("<html>oops</html>"),
            Err(TransportError::Json(_))
        ));
    }

    #[test]
    fn decode_keeps_shape_and_key_case() {
        let value = decode_json_response(r#"{"Code":"OK","Nested":[1,{"A":null}]}"#).unwrap();
        assert_eq!(value, json!({ "Code": "OK", "Nested": [1, { "A": null }] }));
    }

    #[test]
    fn ok_code_is_not_a_failure() {
        assert_eq!(remote_failure(&json!({ "Code": "OK", "Message": "OK" })), None);
        assert_eq!(remote_failure(&json!({ "Result": true })), None);
        assert_eq!(remote_failure(&json!([1, 2])), None);
    }

    #[test]
    fn non_ok_code_is_reported_with_context() {
        let body = json!({
            "Code": "isv.BUSINESS_LIMIT_CONTROL",
            "Message": "触发分钟级流控Permits:1",
            "RequestId": "2184201F-BFB3-446B-B1F2-C746B7BF0657"
        });

        assert_eq!(
            remote_failure(&body),
            Some(RemoteFailure {
                code: Some("isv.BUSINESS_LIMIT_CONTROL".to_owned()),
                message: Some("触发分钟级流控Permits:1".to_owned()),
                request_id: Some("2184201F-BFB3-446B-B1F2-C746B7BF0657".to_owned()),
            })
        );
    }

    #[test]
    fn decode_send_sms_response_reads_pascal_case_fields() {
        let body = json!({
            "Message": "OK",
            "RequestId": "F655A8D5-B967-440B-8683-DAD6FF8DE990",
            "Code": "OK",
            "BizId": "900619746936498440^0"
        });

        let response = decode_send_sms_response(&body).unwrap();
        assert!(response.is_ok());
        assert_eq!(response.biz_id.as_deref(), Some("900619746936498440^0"));
        assert_eq!(
            response.request_id.as_deref(),
            Some("F655A8D5-B967-440B-8683-DAD6FF8DE990")
        );
    }

    #[test]
    fn decode_send_sms_response_requires_code() {
        assert!(decode_send_sms_response(&json!({ "Message": "OK" })).is_err());
    }
}
