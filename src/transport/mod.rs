//! Transport layer: signing and wire-format details (serialization/deserialization).

mod canonical;
mod public_params;
mod response;
mod signature;
mod signed_request;

pub use canonical::{canonicalize, percent_encode};
pub use public_params::{API_VERSION, new_nonce};
pub use response::{
    decode_json_response, decode_send_sms_response, remote_failure, remote_failure_fields,
};
pub use signature::{sign, sign_params, string_to_sign};
pub use signed_request::{encode_form, signed_params};
