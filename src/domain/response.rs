use serde_json::{Map, Value};

/// `Code` value the API uses for success.
pub const OK_CODE: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendSmsResponse {
    pub code: String,
    pub message: Option<String>,
    /// Delivery receipt id, present when the message was accepted.
    pub biz_id: Option<String>,
    pub request_id: Option<String>,
}

impl SendSmsResponse {
    pub fn is_ok(&self) -> bool {
        self.code == OK_CODE
    }
}

/// Target case for [`normalize_keys`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCase {
    Lower,
    Upper,
}

/// Rewrite every object key in `value` to `case`, at every depth.
///
/// Arrays keep their order and scalars are untouched. When two keys collapse to the
/// same normalized key, the one visited last wins.
pub fn normalize_keys(value: Value, case: KeyCase) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| {
                    let key = match case {
                        KeyCase::Lower => key.to_lowercase(),
                        KeyCase::Upper => key.to_uppercase(),
                    };
                    (key, normalize_keys(item, case))
                })
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| normalize_keys(item, case))
                .collect(),
        ),
        scalar => scalar,
    }
}
