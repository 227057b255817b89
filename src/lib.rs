//! Typed Rust client for the Aliyun Dysms (SMS) HTTP API.
//!
//! The crate is split into a domain layer of validated types and request builders,
//! a transport layer for the RPC signature and wire format, and a small client
//! layer orchestrating one signed POST per call.
//!
//! ```rust,no_run
//! use dysms::{Credentials, DysmsClient, SendSms};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), dysms::DysmsError> {
//!     let client = DysmsClient::new(Credentials::new("<access key id>", "<access key secret>")?);
//!     let request = SendSms::new()
//!         .phone_number("13800000000")
//!         .sign_name("Acme")
//!         .template_code("SMS_71390007")
//!         .template_param(&serde_json::json!({ "code": "1234" }))?;
//!     let response = client.send_sms(&request).await?;
//!     println!("accepted: {:?}", response.biz_id);
//!     Ok(())
//! }
//! ```
//!
//! Operations without a typed builder go through [`CustomRequest`] and
//! [`DysmsClient::execute`], which return the decoded JSON body as is.
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{
    ALIBABA_CLOUD_ACCESS_KEY_ID, ALIBABA_CLOUD_ACCESS_KEY_SECRET, DEFAULT_ENDPOINT,
    DEFAULT_TIMEOUT, DysmsClient, DysmsClientBuilder, DysmsError,
};
pub use domain::{
    AccessKeyId, AccessKeySecret, ApiRequest, Credentials, CustomRequest, KeyCase, OK_CODE,
    ParameterSet, RegionId, SendSms, SendSmsResponse, ValidationError, normalize_keys,
};
pub use transport::{API_VERSION, canonicalize, percent_encode, sign, sign_params, string_to_sign};
