//! Binding resolution.
//!
//! Turns a route's declared bindings into the positional argument list its
//! operation is invoked with.

use heron_core::{Arguments, Claims};
use heron_router::{ClaimSelector, ParamBinding};
use serde_json::Value;

use crate::error::ExtractionError;
use crate::extracted::ExtractedParams;

/// Resolves `bindings` against the extracted request values and claims.
///
/// Arguments are produced strictly in binding order, one per binding, no
/// matter how many values the request carries. `Header(_)` always binds the
/// full header object. `Auth(Named(n))` binds `null` when the claim is absent.
///
/// # Errors
///
/// Returns [`ExtractionError::MissingClaims`] if an auth binding is resolved
/// while `claims` is `None`.
///
/// # Example
///
/// ```rust
/// use heron_core::Claims;
/// use heron_extract::{resolve_bindings, ExtractedParams};
/// use heron_router::{ClaimSelector, ParamBinding};
/// use serde_json::json;
///
/// let extracted = ExtractedParams {
///     body: json!({ "qty": 3 }),
///     path_params: json!({}),
///     headers: json!({}),
///     query: json!({ "page": "2" }),
/// };
/// let claims = Claims::try_from(json!({ "sub": "user-1" })).unwrap();
///
/// let args = resolve_bindings(
///     &[ParamBinding::WholeBody, ParamBinding::Auth(ClaimSelector::named("sub"))],
///     &extracted,
///     Some(&claims),
/// )
/// .unwrap();
///
/// assert_eq!(args.len(), 2);
/// assert_eq!(args.get(0), Some(&json!({ "qty": 3 })));
/// assert_eq!(args.get(1), Some(&json!("user-1")));
/// ```
pub fn resolve_bindings(
    bindings: &[ParamBinding],
    extracted: &ExtractedParams,
    claims: Option<&Claims>,
) -> Result<Arguments, ExtractionError> {
    let mut args = Arguments::with_capacity(bindings.len());
    for (position, binding) in bindings.iter().enumerate() {
        let value = match binding {
            ParamBinding::WholeBody => extracted.body.clone(),
            ParamBinding::WholeParams => extracted.path_params.clone(),
            ParamBinding::WholeQuery => extracted.query.clone(),
            ParamBinding::Header(_) => extracted.headers.clone(),
            ParamBinding::Auth(selector) => {
                let claims = claims.ok_or(ExtractionError::MissingClaims { position })?;
                match selector {
                    ClaimSelector::All => claims.to_value(),
                    ClaimSelector::Named(name) => claims.get(name).cloned().unwrap_or(Value::Null),
                }
            }
        };
        args.push(value);
    }
    Ok(args)
}
