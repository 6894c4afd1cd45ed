//! Token verification.

use std::collections::HashSet;
use std::str::FromStr;

use heron_core::Claims;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::error::VerifyError;

/// Options passed to every verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Accept tokens whose `exp` claim lies in the past.
    pub ignore_expiration: bool,
}

/// A service that checks a token against a secret and returns its claims.
///
/// Implementations must fail on a bad signature or a malformed token. They
/// may be called from many tasks at once.
pub trait TokenVerifier: Send + Sync {
    /// Verifies `token` with `secret`.
    fn verify(&self, token: &str, secret: &str, options: VerifyOptions) -> Result<Claims, VerifyError>;
}

/// HMAC-signed JSON Web Token verifier.
///
/// Accepts HS256 unless configured otherwise. Claims are decoded as a
/// free-form JSON object and no registered claim is required, so a token
/// without `exp` verifies. When `exp` is present it is checked unless
/// [`VerifyOptions::ignore_expiration`] is set.
///
/// # Example
///
/// ```rust
/// use heron_auth::{JwtVerifier, TokenVerifier, VerifyOptions};
///
/// let verifier = JwtVerifier::new();
/// let result = verifier.verify("not-a-jwt", "secret", VerifyOptions { ignore_expiration: true });
/// assert!(result.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct JwtVerifier {
    algorithms: Vec<Algorithm>,
}

impl Default for JwtVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl JwtVerifier {
    /// Creates a verifier accepting HS256.
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithms: vec![Algorithm::HS256],
        }
    }

    /// Creates a verifier accepting the named HMAC algorithms.
    ///
    /// # Errors
    ///
    /// Fails if a name is unknown, is not an HMAC algorithm, or the list is
    /// empty.
    pub fn with_algorithms<I, S>(names: I) -> Result<Self, VerifyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut algorithms = Vec::new();
        for name in names {
            let name = name.as_ref();
            let algorithm = Algorithm::from_str(name)
                .map_err(|_| VerifyError::new(format!("unknown algorithm '{name}'")))?;
            if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
                return Err(VerifyError::new(format!(
                    "algorithm '{name}' is not an HMAC algorithm"
                )));
            }
            algorithms.push(algorithm);
        }
        if algorithms.is_empty() {
            return Err(VerifyError::new("no algorithms configured"));
        }
        Ok(Self { algorithms })
    }

    /// Returns the accepted algorithms.
    #[must_use]
    pub fn algorithms(&self) -> &[Algorithm] {
        &self.algorithms
    }

    fn validation(&self, options: VerifyOptions) -> Validation {
        let mut validation = Validation::new(self.algorithms[0]);
        validation.algorithms.clone_from(&self.algorithms);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = !options.ignore_expiration;
        validation.validate_aud = false;
        validation
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str, secret: &str, options: VerifyOptions) -> Result<Claims, VerifyError> {
        let key = DecodingKey::from_secret(secret.as_bytes());
        decode::<Claims>(token, &key, &self.validation(options))
            .map(|data| data.claims)
            .map_err(|e| VerifyError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret";

    fn sign(claims: &serde_json::Value, secret: &str, algorithm: Algorithm) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn lenient() -> VerifyOptions {
        VerifyOptions {
            ignore_expiration: true,
        }
    }

    fn strict() -> VerifyOptions {
        VerifyOptions {
            ignore_expiration: false,
        }
    }

    #[test]
    fn test_valid_token_without_exp() {
        let token = sign(&json!({ "sub": "user-1" }), SECRET, Algorithm::HS256);
        let claims = JwtVerifier::new().verify(&token, SECRET, strict()).unwrap();
        assert_eq!(claims.subject(), Some("user-1"));
    }

    #[test]
    fn test_wrong_secret_fails() {
        let token = sign(&json!({ "sub": "user-1" }), "other", Algorithm::HS256);
        assert!(JwtVerifier::new().verify(&token, SECRET, lenient()).is_err());
    }

    #[test]
    fn test_malformed_token_fails() {
        assert!(JwtVerifier::new().verify("a.b.c", SECRET, lenient()).is_err());
        assert!(JwtVerifier::new().verify("", SECRET, lenient()).is_err());
    }

    #[test]
    fn test_expired_token_respects_option() {
        let token = sign(&json!({ "sub": "old", "exp": 1_000_000 }), SECRET, Algorithm::HS256);
        let verifier = JwtVerifier::new();

        assert!(verifier.verify(&token, SECRET, strict()).is_err());
        let claims = verifier.verify(&token, SECRET, lenient()).unwrap();
        assert_eq!(claims.subject(), Some("old"));
    }

    #[test]
    fn test_audience_is_not_enforced() {
        let token = sign(&json!({ "sub": "u", "aud": "other-service" }), SECRET, Algorithm::HS256);
        assert!(JwtVerifier::new().verify(&token, SECRET, strict()).is_ok());
    }

    #[test]
    fn test_algorithm_selection() {
        let token = sign(&json!({ "sub": "u" }), SECRET, Algorithm::HS512);

        assert!(JwtVerifier::new().verify(&token, SECRET, lenient()).is_err());

        let verifier = JwtVerifier::with_algorithms(["HS256", "HS512"]).unwrap();
        assert_eq!(verifier.algorithms(), &[Algorithm::HS256, Algorithm::HS512]);
        assert!(verifier.verify(&token, SECRET, lenient()).is_ok());
    }

    #[test]
    fn test_rejects_non_hmac_algorithms() {
        assert!(JwtVerifier::with_algorithms(["RS256"]).is_err());
        assert!(JwtVerifier::with_algorithms(["nope"]).is_err());
        assert!(JwtVerifier::with_algorithms(Vec::<String>::new()).is_err());
    }
}
