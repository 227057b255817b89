use chrono::{DateTime, Utc};

use crate::domain::{ApiRequest, Credentials, ParameterSet, RegionId};
use crate::transport::public_params::{format_timestamp, merge_params, public_params};
use crate::transport::signature::{SIGNATURE_FIELD, sign_params};

/// Every RPC call is sent as a form POST.
pub const HTTP_METHOD: &str = "POST";

/// Assemble the full parameter set for `request` and attach its `Signature`.
///
/// `now` and `nonce` are injected so the output is reproducible in tests.
pub fn signed_params<R>(
    credentials: &Credentials,
    region_id: &RegionId,
    request: &R,
    now: DateTime<Utc>,
    nonce: String,
) -> ParameterSet
where
    R: ApiRequest + ?Sized,
{
    // The canonical query carries recipients and template values; keep it out of logs.
    log::trace!("signing {} with nonce {nonce}", request.action());
    let public = public_params(
        credentials.access_key_id(),
        region_id,
        format_timestamp(now),
        nonce,
    );
    let mut params = merge_params(public, request);
    // A caller-supplied `Signature` must not leak into the string-to-sign.
    params.remove(SIGNATURE_FIELD);

    let signature = sign_params(
        HTTP_METHOD,
        &params,
        credentials.access_key_secret().expose(),
    );
    params.insert(SIGNATURE_FIELD.to_owned(), signature);
    params
}

/// `application/x-www-form-urlencoded` body for the signed set, in canonical key order.
pub fn encode_form(params: &ParameterSet) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}
