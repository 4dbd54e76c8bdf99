use std::fmt::{Debug, Formatter};

use crate::ValidationError;

/// Provider credential. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(input: impl Into<String>) -> Result<Self, ValidationError> {
        let value = input.into().trim().to_owned();
        if value.is_empty() {
            return Err(ValidationError::EmptyApiKey);
        }
        Ok(Self(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_is_redacted() {
        let key = ApiKey::new("secret-123").expect("valid key");
        assert_eq!(format!("{key:?}"), "ApiKey(<redacted>)");
        assert_eq!(key.expose(), "secret-123");
    }

    #[test]
    fn rejects_blank_key() {
        assert_eq!(ApiKey::new("  "), Err(ValidationError::EmptyApiKey));
    }
}
