use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

/// Issuer, audience and timing rules shared by token issuance and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPolicy {
    pub issuer: String,
    pub audience: String,
    /// Time between `iat` and `exp`.
    pub lifetime: Duration,
    /// How far in the future an `iat` may lie before the token is rejected.
    pub max_clock_skew: Duration,
}

impl TokenPolicy {
    pub const DEFAULT_ISSUER: &'static str = "auth-service";
    pub const DEFAULT_AUDIENCE: &'static str = "api-service";
    pub const DEFAULT_LIFETIME_MINUTES: i64 = 15;
    pub const DEFAULT_MAX_CLOCK_SKEW_SECONDS: i64 = 30;

    pub fn new(issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer: issuer.into(),
            audience: audience.into(),
            ..Self::default()
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_max_clock_skew(mut self, max_clock_skew: Duration) -> Self {
        self.max_clock_skew = max_clock_skew;
        self
    }
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            issuer: Self::DEFAULT_ISSUER.to_string(),
            audience: Self::DEFAULT_AUDIENCE.to_string(),
            lifetime: Duration::minutes(Self::DEFAULT_LIFETIME_MINUTES),
            max_clock_skew: Duration::seconds(Self::DEFAULT_MAX_CLOCK_SKEW_SECONDS),
        }
    }
}

/// Claim set carried by every issued token.
///
/// All fields are mandatory: a token lacking any of them is rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (identity identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Build claims for `subject` issued at `issued_at` under `policy`.
    ///
    /// # Arguments
    /// * `subject` - Identity identifier
    /// * `policy` - Issuer, audience and lifetime to apply
    /// * `issued_at` - Unix timestamp of issuance
    pub fn new(subject: impl ToString, policy: &TokenPolicy, issued_at: i64) -> Self {
        Self {
            sub: subject.to_string(),
            iss: policy.issuer.clone(),
            aud: policy.audience.clone(),
            iat: issued_at,
            exp: issued_at + policy.lifetime.num_seconds(),
        }
    }

    /// Set expiration (Unix timestamp).
    pub fn with_expiration(mut self, exp: i64) -> Self {
        self.exp = exp;
        self
    }

    /// Set issued at (Unix timestamp).
    pub fn with_issued_at(mut self, iat: i64) -> Self {
        self.iat = iat;
        self
    }

    /// Set issuer.
    pub fn with_issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = iss.into();
        self
    }

    /// Set audience.
    pub fn with_audience(mut self, aud: impl Into<String>) -> Self {
        self.aud = aud.into();
        self
    }

    /// Check if token is expired. A token is no longer valid at its `exp` second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    /// Check if `iat` lies further in the future than `max_skew_seconds`.
    pub fn is_issued_in_future(&self, current_timestamp: i64, max_skew_seconds: i64) -> bool {
        self.iat > current_timestamp + max_skew_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_claims() {
        let policy = TokenPolicy::default();
        let claims = Claims::new(42, &policy, 1_000_000);

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "auth-service");
        assert_eq!(claims.aud, "api-service");
        assert_eq!(claims.iat, 1_000_000);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_policy_lifetime() {
        let policy = TokenPolicy::new("issuer", "audience").with_lifetime(Duration::minutes(5));
        let claims = Claims::new("user", &policy, 0);

        assert_eq!(claims.iss, "issuer");
        assert_eq!(claims.aud, "audience");
        assert_eq!(claims.exp, 300);
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::new("user", &TokenPolicy::default(), 0).with_expiration(1000);

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_is_issued_in_future() {
        let claims = Claims::new("user", &TokenPolicy::default(), 1030);

        assert!(!claims.is_issued_in_future(1000, 30));
        assert!(claims.is_issued_in_future(999, 30));
    }

    #[test]
    fn test_serialized_claim_names() {
        let claims = Claims::new("7", &TokenPolicy::default(), 10);
        let value = serde_json::to_value(&claims).unwrap();

        assert_eq!(value["sub"], "7");
        assert_eq!(value["iss"], "auth-service");
        assert_eq!(value["aud"], "api-service");
        assert_eq!(value["iat"], 10);
        assert_eq!(value["exp"], 910);
    }
}
