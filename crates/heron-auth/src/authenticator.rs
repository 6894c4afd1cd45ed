//! The bearer-token gate in front of auth-bound routes.

use std::fmt;
use std::sync::Arc;

use heron_core::Claims;
use heron_router::RouteDefinition;
use http::header::AUTHORIZATION;
use http::HeaderMap;

use crate::error::{AuthError, Rejection};
use crate::verifier::{JwtVerifier, TokenVerifier, VerifyOptions};

/// Prefix a credential must start with, byte for byte.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Authentication settings for one server instance.
///
/// `ignore_expiration` has no implicit value: whoever builds the policy
/// decides whether expired tokens are accepted.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthPolicy {
    /// Shared HMAC signing secret. `None` makes auth-bound routes fail with 500.
    pub secret: Option<String>,
    /// Accept tokens after their `exp` claim has passed.
    pub ignore_expiration: bool,
}

impl AuthPolicy {
    /// Creates a policy.
    pub fn new(secret: Option<String>, ignore_expiration: bool) -> Self {
        Self {
            secret,
            ignore_expiration,
        }
    }
}

impl fmt::Debug for AuthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthPolicy")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("ignore_expiration", &self.ignore_expiration)
            .finish()
    }
}

/// Validates bearer tokens for routes that bind token claims.
///
/// # Example
///
/// ```rust
/// use heron_auth::{AuthError, AuthPolicy, Authenticator, Rejection};
/// use heron_router::{ClaimSelector, HttpMethod, ParamBinding, PathPattern, RouteDefinition};
/// use http::HeaderMap;
///
/// let auth = Authenticator::jwt(AuthPolicy::new(Some("secret".into()), true));
///
/// let open = RouteDefinition::new(HttpMethod::Get, PathPattern::parse("/ping").unwrap(), "ping");
/// assert_eq!(auth.authenticate(&open, &HeaderMap::new()), Ok(None));
///
/// let guarded = open.clone().bind(ParamBinding::Auth(ClaimSelector::All));
/// assert_eq!(
///     auth.authenticate(&guarded, &HeaderMap::new()),
///     Err(AuthError::Unauthorized(Rejection::MissingHeader))
/// );
/// ```
#[derive(Clone)]
pub struct Authenticator {
    verifier: Arc<dyn TokenVerifier>,
    policy: AuthPolicy,
}

impl Authenticator {
    /// Creates an authenticator with a custom verifier.
    pub fn new(verifier: Arc<dyn TokenVerifier>, policy: AuthPolicy) -> Self {
        Self { verifier, policy }
    }

    /// Creates an authenticator using the default [`JwtVerifier`].
    pub fn jwt(policy: AuthPolicy) -> Self {
        Self::new(Arc::new(JwtVerifier::new()), policy)
    }

    /// Returns the policy.
    #[must_use]
    pub fn policy(&self) -> &AuthPolicy {
        &self.policy
    }

    /// Authenticates a request for `route`.
    ///
    /// Routes without an auth binding return `Ok(None)` without looking at the
    /// headers. Otherwise the `Authorization` header must carry
    /// `Bearer <token>` and the token must verify against the configured
    /// secret.
    pub fn authenticate(
        &self,
        route: &RouteDefinition,
        headers: &HeaderMap,
    ) -> Result<Option<Claims>, AuthError> {
        if !route.requires_auth() {
            return Ok(None);
        }

        let header = headers
            .get(AUTHORIZATION)
            .ok_or(Rejection::MissingHeader)?;
        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(Rejection::NotBearer)?;

        let secret = self.policy.secret.as_deref().ok_or(AuthError::MissingSecret)?;

        let options = VerifyOptions {
            ignore_expiration: self.policy.ignore_expiration,
        };
        let claims = self
            .verifier
            .verify(token, secret, options)
            .map_err(Rejection::from)?;

        tracing::debug!(
            operation_id = %route.operation_id(),
            subject = claims.subject().unwrap_or("-"),
            "bearer token verified"
        );
        Ok(Some(claims))
    }
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VerifyError;
    use heron_router::{ClaimSelector, HttpMethod, ParamBinding, PathPattern};
    use http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const SECRET: &str = "s3cret";

    fn guarded() -> RouteDefinition {
        RouteDefinition::new(HttpMethod::Get, PathPattern::parse("/me").unwrap(), "me.get")
            .bind(ParamBinding::Auth(ClaimSelector::named("sub")))
    }

    fn bearer(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn token(claims: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn authenticator(ignore_expiration: bool) -> Authenticator {
        Authenticator::jwt(AuthPolicy::new(Some(SECRET.into()), ignore_expiration))
    }

    /// Counts calls so tests can prove the verifier was never reached.
    struct CountingVerifier(AtomicUsize);

    impl TokenVerifier for CountingVerifier {
        fn verify(&self, _: &str, _: &str, _: VerifyOptions) -> Result<Claims, VerifyError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Claims::new())
        }
    }

    #[test]
    fn test_valid_token() {
        let headers = bearer(&format!("Bearer {}", token(&json!({ "sub": "u1" }))));
        let claims = authenticator(false).authenticate(&guarded(), &headers).unwrap().unwrap();
        assert_eq!(claims.subject(), Some("u1"));
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            authenticator(true).authenticate(&guarded(), &HeaderMap::new()),
            Err(AuthError::Unauthorized(Rejection::MissingHeader))
        );
    }

    #[test]
    fn test_prefix_is_exact() {
        let raw = token(&json!({ "sub": "u1" }));
        for value in [format!("bearer {raw}"), format!("Bearer{raw}"), format!("Basic {raw}")] {
            assert_eq!(
                authenticator(true).authenticate(&guarded(), &bearer(&value)),
                Err(AuthError::Unauthorized(Rejection::NotBearer)),
                "{value}"
            );
        }
    }

    #[test]
    fn test_invalid_token() {
        let err = authenticator(true)
            .authenticate(&guarded(), &bearer("Bearer garbage"))
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(Rejection::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_follows_policy() {
        let headers = bearer(&format!(
            "Bearer {}",
            token(&json!({ "sub": "u1", "exp": 1_000_000 }))
        ));

        assert!(authenticator(false).authenticate(&guarded(), &headers).is_err());
        let claims = authenticator(true).authenticate(&guarded(), &headers).unwrap();
        assert_eq!(claims.unwrap().subject(), Some("u1"));
    }

    #[test]
    fn test_missing_secret() {
        let auth = Authenticator::jwt(AuthPolicy::new(None, true));
        assert_eq!(
            auth.authenticate(&guarded(), &bearer("Bearer anything")),
            Err(AuthError::MissingSecret)
        );
    }

    #[test]
    fn test_missing_header_checked_before_secret() {
        let auth = Authenticator::jwt(AuthPolicy::new(None, true));
        assert_eq!(
            auth.authenticate(&guarded(), &HeaderMap::new()),
            Err(AuthError::Unauthorized(Rejection::MissingHeader))
        );
    }

    #[test]
    fn test_open_route_skips_verification() {
        let verifier = Arc::new(CountingVerifier(AtomicUsize::new(0)));
        let auth = Authenticator::new(verifier.clone(), AuthPolicy::new(Some(SECRET.into()), true));
        let open = RouteDefinition::new(HttpMethod::Get, PathPattern::parse("/").unwrap(), "root");

        assert_eq!(auth.authenticate(&open, &bearer("Bearer x")), Ok(None));
        assert_eq!(verifier.0.load(Ordering::SeqCst), 0);

        assert!(auth.authenticate(&guarded(), &bearer("Bearer x")).is_ok());
        assert_eq!(verifier.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_policy_debug_redacts_secret() {
        let debug = format!("{:?}", AuthPolicy::new(Some("hunter2".into()), true));
        assert!(!debug.contains("hunter2"));
    }
}
