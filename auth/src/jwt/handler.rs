use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::decode_header;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde_json::Map;
use serde_json::Value;

use super::claims::Claims;
use super::claims::TokenPolicy;
use super::errors::JwtError;
use super::key::SigningKey;

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// JWT token handler for issuing and validating tokens.
///
/// Tokens are always signed with HS256. Validation accepts HS256 only; any
/// other declared algorithm is refused before the signature is looked at.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    policy: TokenPolicy,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `key` - Shared HMAC secret (already checked for minimum length)
    /// * `policy` - Issuer, audience, lifetime and clock skew to enforce
    pub fn new(key: &SigningKey, policy: TokenPolicy) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            algorithm: Algorithm::HS256,
            policy,
        }
    }

    pub fn policy(&self) -> &TokenPolicy {
        &self.policy
    }

    /// Issue a token for `subject`, valid from now for the policy lifetime.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue(&self, subject: &str) -> Result<IssuedToken, JwtError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issue a token for `subject` as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: i64) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(subject, &self.policy, now);
        let token = self.sign(&claims)?;

        Ok(IssuedToken { token, claims })
    }

    /// Sign an arbitrary claim set with the handler's key and algorithm.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Validate a token against the current time.
    ///
    /// # Errors
    /// See [`Self::validate_at`].
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Validate a token as if the current time were `now`.
    ///
    /// Checks, in order: structure, declared algorithm, signature, required
    /// claims, issuer, audience, expiry and issued-at skew.
    ///
    /// # Errors
    /// * `Malformed` - Token is not a decodable compact JWS with the expected claims
    /// * `AlgorithmMismatch` - Header declares anything other than HS256
    /// * `InvalidSignature` - Signature does not match the signing key
    /// * `MissingClaim` - A required registered claim is absent
    /// * `InvalidIssuer` / `InvalidAudience` - Claim differs from the policy
    /// * `TokenExpired` - `now >= exp`
    /// * `IssuedInFuture` - `iat` beyond the tolerated clock skew
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let header = decode_header(token).map_err(|e| JwtError::Malformed(e.to_string()))?;

        if header.alg != self.algorithm {
            return Err(JwtError::AlgorithmMismatch(format!("{:?}", header.alg)));
        }

        // Decoded untyped first so jsonwebtoken's required-claim check runs
        // before the typed conversion can fail on a missing field.
        let token_data =
            decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation())
                .map_err(|e| Self::map_decode_error(e, header.alg))?;

        let raw_claims = token_data.claims;

        if !raw_claims.contains_key("iat") {
            return Err(JwtError::MissingClaim("iat".to_string()));
        }

        let claims: Claims = serde_json::from_value(Value::Object(raw_claims))
            .map_err(|e| JwtError::Malformed(e.to_string()))?;

        if claims.is_expired(now) {
            return Err(JwtError::TokenExpired);
        }

        if claims.is_issued_in_future(now, self.policy.max_clock_skew.num_seconds()) {
            return Err(JwtError::IssuedInFuture);
        }

        Ok(claims)
    }

    fn map_decode_error(err: jsonwebtoken::errors::Error, alg: Algorithm) -> JwtError {
        match err.kind() {
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::InvalidAlgorithm => JwtError::AlgorithmMismatch(format!("{:?}", alg)),
            ErrorKind::InvalidIssuer => JwtError::InvalidIssuer,
            ErrorKind::InvalidAudience => JwtError::InvalidAudience,
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::MissingRequiredClaim(claim) => JwtError::MissingClaim(claim.clone()),
            _ => JwtError::Malformed(err.to_string()),
        }
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.algorithms = vec![self.algorithm];
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        validation.set_issuer(&[self.policy.issuer.as_str()]);
        validation.set_audience(&[self.policy.audience.as_str()]);
        // Time checks run against the caller-supplied clock in validate_at.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.leeway = 0;
        validation
    }
}
