use std::fmt;

use secrecy::ExposeSecret;
use secrecy::SecretString;
use serde::Deserialize;
use serde::Deserializer;

use super::errors::JwtError;

/// Shared HMAC secret used to sign and verify tokens.
///
/// Constructed once at startup and handed to [`JwtHandler`](super::JwtHandler).
/// The secret is never printed: `Debug` output is redacted.
pub struct SigningKey(SecretString);

impl SigningKey {
    /// HS256 keys shorter than the hash output (256 bits) are rejected.
    pub const MIN_LENGTH: usize = 32;

    /// Create a signing key from a secret.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is empty or shorter than [`Self::MIN_LENGTH`] bytes
    pub fn new(secret: impl Into<String>) -> Result<Self, JwtError> {
        let secret = secret.into();

        if secret.is_empty() {
            return Err(JwtError::InvalidKey("secret is empty".to_string()));
        }

        if secret.len() < Self::MIN_LENGTH {
            return Err(JwtError::InvalidKey(format!(
                "secret must be at least {} bytes, got {}",
                Self::MIN_LENGTH,
                secret.len()
            )));
        }

        Ok(Self(SecretString::from(secret)))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl Clone for SigningKey {
    fn clone(&self) -> Self {
        Self(SecretString::from(self.0.expose_secret().to_owned()))
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for SigningKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secret = String::deserialize(deserializer)?;
        SigningKey::new(secret).map_err(serde::de::Error::custom)
    }
}
