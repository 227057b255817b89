use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::validation::ValidationError;

/// Flat, string-valued request parameters.
///
/// Keys are unique and kept in byte-wise order, which is the order the signer needs.
pub type ParameterSet = BTreeMap<String, String>;

/// A remote operation: its `Action` name plus the operation-specific parameters.
///
/// The client merges these parameters on top of the public ones, so a key returned
/// here replaces a public parameter of the same name.
pub trait ApiRequest {
    fn action(&self) -> &str;

    fn params(&self) -> ParameterSet;
}

impl<T: ApiRequest + ?Sized> ApiRequest for &T {
    fn action(&self) -> &str {
        (**self).action()
    }

    fn params(&self) -> ParameterSet {
        (**self).params()
    }
}

/// Builder for the `SendSms` operation.
///
/// ```rust
/// use dysms::{ApiRequest, SendSms};
///
/// let request = SendSms::new()
///     .phone_numbers(["13800000000", "13900000000"])
///     .sign_name("Acme")
///     .template_code("SMS_001")
///     .template_param(&serde_json::json!({ "code": "123" }))
///     .unwrap();
///
/// assert_eq!(request.params()["PhoneNumbers"], "13800000000,13900000000");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendSms {
    phone_numbers: Vec<String>,
    sign_name: Option<String>,
    template_code: Option<String>,
    template_param: Option<String>,
    sms_up_extend_code: Option<String>,
    out_id: Option<String>,
}

impl SendSms {
    pub const ACTION: &'static str = "SendSms";

    pub const PHONE_NUMBERS: &'static str = "PhoneNumbers";
    pub const SIGN_NAME: &'static str = "SignName";
    pub const TEMPLATE_CODE: &'static str = "TemplateCode";
    pub const TEMPLATE_PARAM: &'static str = "TemplateParam";
    pub const SMS_UP_EXTEND_CODE: &'static str = "SmsUpExtendCode";
    pub const OUT_ID: &'static str = "OutId";

    pub fn new() -> Self {
        Self::default()
    }

    /// Set one recipient, replacing any previously set recipients.
    pub fn phone_number(self, value: impl Into<String>) -> Self {
        self.phone_numbers([value])
    }

    /// Set the recipients; they are sent comma-joined in `PhoneNumbers`.
    ///
    /// Batch sends may be delivered with a small delay; prefer single-recipient
    /// requests for time-sensitive messages (verification codes).
    pub fn phone_numbers<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.phone_numbers = values
            .into_iter()
            .map(|value| value.into().trim().to_owned())
            .collect();
        self
    }

    /// Approved signature shown as the message sender.
    pub fn sign_name(mut self, value: impl Into<String>) -> Self {
        self.sign_name = Some(value.into());
        self
    }

    /// Approved template id, e.g. `SMS_71390007`.
    pub fn template_code(mut self, value: impl Into<String>) -> Self {
        self.template_code = Some(value.into());
        self
    }

    /// Template variables, encoded as a JSON object.
    ///
    /// Arrays are encoded as objects keyed by index and `null`/unit become `{}`,
    /// so the parameter is always a JSON object. A top-level scalar is rejected
    /// with [`ValidationError::InvalidParameterType`].
    pub fn template_param<T>(mut self, value: &T) -> Result<Self, ValidationError>
    where
        T: Serialize + ?Sized,
    {
        self.template_param = Some(encode_json_object(Self::TEMPLATE_PARAM, value)?);
        Ok(self)
    }

    /// Upstream extension code appended to the sender number.
    pub fn sms_up_extend_code(mut self, value: impl Into<String>) -> Self {
        self.sms_up_extend_code = Some(value.into());
        self
    }

    /// Caller-side id echoed back in delivery receipts.
    pub fn out_id(mut self, value: impl Into<String>) -> Self {
        self.out_id = Some(value.into());
        self
    }

    /// Check that the fields required by the `SendSms` operation are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.phone_numbers.is_empty() || self.phone_numbers.iter().any(String::is_empty) {
            return Err(ValidationError::Empty {
                field: Self::PHONE_NUMBERS,
            });
        }
        if is_blank(self.sign_name.as_deref()) {
            return Err(ValidationError::Empty {
                field: Self::SIGN_NAME,
            });
        }
        if is_blank(self.template_code.as_deref()) {
            return Err(ValidationError::Empty {
                field: Self::TEMPLATE_CODE,
            });
        }
        Ok(())
    }
}

impl ApiRequest for SendSms {
    fn action(&self) -> &str {
        Self::ACTION
    }

    fn params(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        if !self.phone_numbers.is_empty() {
            params.insert(Self::PHONE_NUMBERS.to_owned(), self.phone_numbers.join(","));
        }
        let optional = [
            (Self::SIGN_NAME, &self.sign_name),
            (Self::TEMPLATE_CODE, &self.template_code),
            (Self::TEMPLATE_PARAM, &self.template_param),
            (Self::SMS_UP_EXTEND_CODE, &self.sms_up_extend_code),
            (Self::OUT_ID, &self.out_id),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                params.insert(key.to_owned(), value.clone());
            }
        }
        params
    }
}

/// Descriptor for operations without a typed builder, e.g. `QuerySendDetails`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRequest {
    action: String,
    params: ParameterSet,
}

impl CustomRequest {
    pub const ACTION_FIELD: &'static str = "Action";
    /// Reported as the field of a `param_json` failure; the reason starts with the key.
    pub const PARAM_JSON_FIELD: &'static str = "param_json";

    /// Create a request for `action`; the name must be non-empty after trimming.
    pub fn new(action: impl Into<String>) -> Result<Self, ValidationError> {
        let action = action.into();
        let trimmed = action.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::ACTION_FIELD,
            });
        }
        Ok(Self {
            action: trimmed.to_owned(),
            params: ParameterSet::new(),
        })
    }

    /// Add or replace a text parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add or replace a parameter carrying JSON-encoded text.
    pub fn param_json<T>(
        mut self,
        key: impl Into<String>,
        value: &T,
    ) -> Result<Self, ValidationError>
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        let encoded =
            serde_json::to_string(value).map_err(|err| ValidationError::InvalidParameterType {
                field: Self::PARAM_JSON_FIELD,
                reason: format!("{key}: {err}"),
            })?;
        self.params.insert(key, encoded);
        Ok(self)
    }
}

impl ApiRequest for CustomRequest {
    fn action(&self) -> &str {
        &self.action
    }

    fn params(&self) -> ParameterSet {
        self.params.clone()
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|value| value.trim().is_empty())
}

fn encode_json_object<T>(field: &'static str, value: &T) -> Result<String, ValidationError>
where
    T: Serialize + ?Sized,
{
    let invalid = |reason: String| ValidationError::InvalidParameterType { field, reason };

    let value = serde_json::to_value(value).map_err(|err| invalid(err.to_string()))?;
    let object = match force_object(value) {
        Value::Object(map) => map,
        other => return Err(invalid(format!("expected a JSON object, got {other}"))),
    };
    serde_json::to_string(&object).map_err(|err| invalid(err.to_string()))
}

// Arrays become index-keyed objects at every depth; a top-level null becomes `{}`.
fn force_object(value: Value) -> Value {
    match value {
        Value::Null => Value::Object(Map::new()),
        other => force_nested(other),
    }
}

fn force_nested(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Object(
            items
                .into_iter()
                .enumerate()
                .map(|(idx, item)| (idx.to_string(), force_nested(item)))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, force_nested(item)))
                .collect(),
        ),
        scalar => scalar,
    }
}
