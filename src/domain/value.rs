use std::fmt;

use crate::domain::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Aliyun `AccessKeyId`.
///
/// Invariant: non-empty after trimming.
pub struct AccessKeyId(String);

impl AccessKeyId {
    /// Public parameter name used by the RPC API (`AccessKeyId`).
    pub const FIELD: &'static str = "AccessKeyId";

    /// Create a validated [`AccessKeyId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, PartialEq, Eq)]
/// Aliyun `AccessKeySecret`, the HMAC key material.
///
/// Invariant: must not be empty (whitespace is preserved). `Debug` output is redacted.
pub struct AccessKeySecret(String);

impl AccessKeySecret {
    /// Name used in error messages. The secret itself is never sent on the wire.
    pub const FIELD: &'static str = "AccessKeySecret";

    /// Create a validated [`AccessKeySecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessKeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessKeySecret(**redacted**)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Credential pair used to sign every request.
pub struct Credentials {
    access_key_id: AccessKeyId,
    access_key_secret: AccessKeySecret,
}

impl Credentials {
    /// Validate both halves of the credential pair.
    pub fn new(
        access_key_id: impl Into<String>,
        access_key_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            access_key_id: AccessKeyId::new(access_key_id)?,
            access_key_secret: AccessKeySecret::new(access_key_secret)?,
        })
    }

    pub fn access_key_id(&self) -> &AccessKeyId {
        &self.access_key_id
    }

    pub fn access_key_secret(&self) -> &AccessKeySecret {
        &self.access_key_secret
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Aliyun region id (`RegionId`), e.g. `cn-hangzhou`.
///
/// Invariant: non-empty after trimming.
pub struct RegionId(String);

impl RegionId {
    pub const FIELD: &'static str = "RegionId";

    /// Region used when the client is not configured otherwise.
    pub const DEFAULT: &'static str = "cn-hangzhou";

    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RegionId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}
