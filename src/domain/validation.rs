use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidParameterType { field: &'static str, reason: String },
    InvalidEndpoint { input: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidParameterType { field, reason } => {
                write!(f, "{field} cannot be encoded as a text parameter: {reason}")
            }
            Self::InvalidEndpoint { input } => {
                write!(f, "invalid endpoint (expected http or https URL): {input}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty {
            field: "AccessKeyId",
        };
        assert_eq!(err.to_string(), "AccessKeyId must not be empty");

        let err = ValidationError::InvalidParameterType {
            field: "TemplateParam",
            reason: "expected a JSON object".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "TemplateParam cannot be encoded as a text parameter: expected a JSON object"
        );

        let err = ValidationError::InvalidEndpoint {
            input: "ftp://x".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid endpoint (expected http or https URL): ftp://x"
        );
    }
}
