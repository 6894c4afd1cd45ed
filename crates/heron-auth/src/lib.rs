//! Bearer token authentication for Heron.
//!
//! Only routes that bind token claims are authenticated. For those, the
//! [`Authenticator`] reads the `Authorization` header, requires the exact
//! `Bearer ` prefix, and hands the token to a [`TokenVerifier`] together with
//! the configured secret. The verified [`Claims`](heron_core::Claims) are then
//! available to the route's auth bindings.
//!
//! # Expired tokens
//!
//! [`AuthPolicy::ignore_expiration`] decides whether tokens are accepted past
//! their `exp` claim. Setting it is an explicit security relaxation and is
//! logged at startup by the server.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod authenticator;
mod error;
mod verifier;

pub use authenticator::{AuthPolicy, Authenticator, BEARER_PREFIX};
pub use error::{AuthError, Rejection, VerifyError};
pub use heron_core::Claims;
pub use verifier::{JwtVerifier, TokenVerifier, VerifyOptions};
