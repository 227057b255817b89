use chrono::{DateTime, Utc};

use crate::domain::{AccessKeyId, ApiRequest, ParameterSet, RegionId};

pub const ACTION_FIELD: &str = "Action";

pub const API_VERSION: &str = "2017-05-25";
pub const RESPONSE_FORMAT: &str = "json";
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
pub const SIGNATURE_VERSION: &str = "1.0";

/// `Timestamp` format: ISO 8601 in UTC, second precision (`2020-01-01T00:00:00Z`).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_timestamp(now: DateTime<Utc>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// Fresh `SignatureNonce`; a random UUID makes collisions negligible.
pub fn new_nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parameters every RPC call carries, independent of the action.
pub fn public_params(
    access_key_id: &AccessKeyId,
    region_id: &RegionId,
    timestamp: String,
    nonce: String,
) -> ParameterSet {
    ParameterSet::from([
        (AccessKeyId::FIELD.to_owned(), access_key_id.as_str().to_owned()),
        ("Timestamp".to_owned(), timestamp),
        ("Format".to_owned(), RESPONSE_FORMAT.to_owned()),
        ("SignatureMethod".to_owned(), SIGNATURE_METHOD.to_owned()),
        ("SignatureVersion".to_owned(), SIGNATURE_VERSION.to_owned()),
        ("SignatureNonce".to_owned(), nonce),
        ("Version".to_owned(), API_VERSION.to_owned()),
        (RegionId::FIELD.to_owned(), region_id.as_str().to_owned()),
    ])
}

/// Merge public params, then `Action`, then the request's own params; later entries win.
pub fn merge_params<R>(public: ParameterSet, request: &R) -> ParameterSet
where
    R: ApiRequest + ?Sized,
{
    let mut params = public;
    params.insert(ACTION_FIELD.to_owned(), request.action().to_owned());
    params.extend(request.params());
    params
}
