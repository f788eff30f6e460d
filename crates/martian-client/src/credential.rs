//! Secure handling of the Martian API key.
//!
//! The key is wrapped in [`secrecy::SecretString`] immediately on load:
//! it cannot appear in `Debug`/`Display` output, it is zeroed on drop, and
//! every use site has to say `.expose()` out loud.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ClientError;

/// Where a credential was loaded from. Useful when debugging configuration
/// without exposing the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Loaded from an environment variable.
    Environment,
    /// Provided programmatically.
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// The securely-stored API key.
#[derive(Clone)]
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
}

impl ApiCredential {
    /// Wrap a key provided programmatically.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source: CredentialSource::Programmatic,
        }
    }

    /// Load the key from an environment variable.
    pub fn from_env(env_var: &str) -> Result<Self, ClientError> {
        std::env::var(env_var)
            .map(|v| Self {
                value: SecretString::from(v),
                source: CredentialSource::Environment,
            })
            .map_err(|_| {
                ClientError::NotConfigured(format!(
                    "Martian API key not set: configure the {env_var} environment variable"
                ))
            })
    }

    /// Expose the key for use in an Authorization header.
    ///
    /// Only call this at the point of use; never store the exposed value.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    /// Whether the key is empty.
    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    /// Where this credential came from.
    pub fn source(&self) -> CredentialSource {
        self.source
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Martian API key from {} [REDACTED]", self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_redacted_in_debug_and_display() {
        let secret = "mk-super-secret-key-12345";
        let cred = ApiCredential::new(secret);

        let debug = format!("{:?}", cred);
        assert!(!debug.contains(secret), "key exposed in Debug!");
        assert!(debug.contains("[REDACTED]"));

        let display = format!("{}", cred);
        assert!(!display.contains(secret), "key exposed in Display!");
        assert!(display.contains("programmatic"));
    }

    #[test]
    fn test_expose_returns_value() {
        let cred = ApiCredential::new("mk-key");
        assert_eq!(cred.expose(), "mk-key");
        assert!(!cred.is_empty());
        assert_eq!(cred.source(), CredentialSource::Programmatic);
    }

    #[test]
    fn test_from_env_missing_is_not_configured() {
        let result = ApiCredential::from_env("MARTIAN_TEST_KEY_THAT_DOES_NOT_EXIST");
        assert!(matches!(result, Err(ClientError::NotConfigured(_))));
    }

    #[test]
    fn test_from_env_reads_variable() {
        std::env::set_var("MARTIAN_TEST_KEY_PRESENT", "env-key");
        let cred = ApiCredential::from_env("MARTIAN_TEST_KEY_PRESENT").unwrap();
        assert_eq!(cred.expose(), "env-key");
        assert_eq!(cred.source(), CredentialSource::Environment);
        std::env::remove_var("MARTIAN_TEST_KEY_PRESENT");
    }
}
