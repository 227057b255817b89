//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{ApiRequest, CustomRequest, ParameterSet, SendSms};
pub use response::{KeyCase, OK_CODE, SendSmsResponse, normalize_keys};
pub use validation::ValidationError;
pub use value::{AccessKeyId, AccessKeySecret, Credentials, RegionId};
