//! Operations and positional arguments.
//!
//! An operation is the handler a route points at. Handlers are written as
//! ordinary async functions over a tuple of typed arguments; registration
//! erases them into an [`Operation`] that takes an [`Arguments`] list and
//! yields the serialized JSON response.
//!
//! # Example
//!
//! ```
//! use heron_core::{Arguments, HeronError, OperationRegistry};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Order {
//!     qty: u32,
//! }
//!
//! async fn create_order((order, sub): (Order, String)) -> Result<serde_json::Value, HeronError> {
//!     Ok(json!({ "qty": order.qty, "owner": sub }))
//! }
//!
//! let mut registry = OperationRegistry::new();
//! registry.register("orders.create", create_order);
//! assert_eq!(registry.arity("orders.create"), Some(2));
//!
//! # tokio_test::block_on(async {
//! let op = registry.get("orders.create").unwrap();
//! let body = op
//!     .invoke(Arguments::from(vec![json!({ "qty": 3 }), json!("user-1")]))
//!     .await
//!     .unwrap();
//! assert_eq!(&body[..], br#"{"owner":"user-1","qty":3}"#);
//! # });
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{HeronError, HeronResult};

/// Positional handler arguments, in binding order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments(Vec<Value>);

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty list with room for `capacity` arguments.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Appends the next positional argument.
    pub fn push(&mut self, value: Value) {
        self.0.push(value);
    }

    /// Returns the argument at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.0.get(position)
    }

    /// Returns the number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the arguments in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    /// Consumes the list, returning the raw values.
    #[must_use]
    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Arguments {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Arguments {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Conversion from positional [`Arguments`] into a handler's typed input.
///
/// Implemented for `()` and for tuples of up to eight
/// [`DeserializeOwned`] types. `ARITY` is the number of arguments the
/// handler expects and is checked against a route's bindings at startup.
pub trait FromArguments: Sized {
    /// Number of positional arguments.
    const ARITY: usize;

    /// Converts the arguments. A value that does not deserialize into its
    /// target type is a bad request; a wrong argument count is internal.
    fn from_arguments(args: Arguments) -> HeronResult<Self>;
}

fn check_arity(expected: usize, args: &Arguments) -> HeronResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(HeronError::internal(format!(
            "operation expects {expected} arguments, got {}",
            args.len()
        )))
    }
}

impl FromArguments for () {
    const ARITY: usize = 0;

    fn from_arguments(args: Arguments) -> HeronResult<Self> {
        check_arity(0, &args)
    }
}

macro_rules! impl_from_arguments {
    ($arity:expr; $($ty:ident),+) => {
        impl<$($ty: DeserializeOwned),+> FromArguments for ($($ty,)+) {
            const ARITY: usize = $arity;

            fn from_arguments(args: Arguments) -> HeronResult<Self> {
                check_arity(Self::ARITY, &args)?;
                let mut values = args.into_iter().enumerate();
                Ok(($(
                    {
                        let (position, value) = values
                            .next()
                            .ok_or_else(|| HeronError::internal("argument list ended early"))?;
                        serde_json::from_value::<$ty>(value).map_err(|e| {
                            HeronError::bad_request(format!("argument {position}: {e}"))
                        })?
                    },
                )+))
            }
        }
    };
}

impl_from_arguments!(1; A);
impl_from_arguments!(2; A, B);
impl_from_arguments!(3; A, B, C);
impl_from_arguments!(4; A, B, C, D);
impl_from_arguments!(5; A, B, C, D, E);
impl_from_arguments!(6; A, B, C, D, E, F);
impl_from_arguments!(7; A, B, C, D, E, F, G);
impl_from_arguments!(8; A, B, C, D, E, F, G, H);

/// Boxed future returned by an erased operation.
pub type BoxedOperationFuture = Pin<Box<dyn Future<Output = HeronResult<Bytes>> + Send>>;

type ErasedOperation = Arc<dyn Fn(Arguments) -> BoxedOperationFuture + Send + Sync>;

/// A type-erased handler.
///
/// Invoking it converts the arguments, awaits the handler and serializes the
/// handler's result to JSON bytes.
#[derive(Clone)]
pub struct Operation {
    arity: usize,
    call: ErasedOperation,
}

impl Operation {
    /// Erases a typed handler.
    pub fn new<Args, Res, F, Fut>(handler: F) -> Self
    where
        Args: FromArguments + Send + 'static,
        Res: Serialize + Send + 'static,
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HeronResult<Res>> + Send + 'static,
    {
        let handler = Arc::new(handler);
        let call: ErasedOperation = Arc::new(move |args: Arguments| {
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let input = Args::from_arguments(args)?;
                let output = handler(input).await?;
                let bytes = serde_json::to_vec(&output).map_err(|e| {
                    HeronError::internal_with_source("failed to serialize operation result", e)
                })?;
                Ok(Bytes::from(bytes))
            })
        });

        Self {
            arity: Args::ARITY,
            call,
        }
    }

    /// Returns the number of positional arguments the handler takes.
    #[must_use]
    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the handler.
    pub fn invoke(&self, args: Arguments) -> BoxedOperationFuture {
        (self.call)(args)
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Operations keyed by operation id.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: HashMap<String, Operation>,
}

impl OperationRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a typed handler under `operation_id`, replacing any earlier one.
    pub fn register<Args, Res, F, Fut>(&mut self, operation_id: impl Into<String>, handler: F)
    where
        Args: FromArguments + Send + 'static,
        Res: Serialize + Send + 'static,
        F: Fn(Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HeronResult<Res>> + Send + 'static,
    {
        self.insert(operation_id, Operation::new(handler));
    }

    /// Registers an already erased operation.
    pub fn insert(&mut self, operation_id: impl Into<String>, operation: Operation) {
        self.operations.insert(operation_id.into(), operation);
    }

    /// Looks up an operation.
    #[must_use]
    pub fn get(&self, operation_id: &str) -> Option<&Operation> {
        self.operations.get(operation_id)
    }

    /// Returns true if an operation is registered under `operation_id`.
    #[must_use]
    pub fn contains(&self, operation_id: &str) -> bool {
        self.operations.contains_key(operation_id)
    }

    /// Returns an operation's arity.
    #[must_use]
    pub fn arity(&self, operation_id: &str) -> Option<usize> {
        self.get(operation_id).map(Operation::arity)
    }

    /// Returns the number of registered operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Returns true if no operations are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterates the registered operation ids, in no particular order.
    pub fn operation_ids(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use serde_json::json;

    #[test]
    fn test_arity_constants() {
        assert_eq!(<() as FromArguments>::ARITY, 0);
        assert_eq!(<(String,) as FromArguments>::ARITY, 1);
        assert_eq!(<(Value, Value, Value) as FromArguments>::ARITY, 3);
    }

    #[test]
    fn test_from_arguments_keeps_positions() {
        let args = Arguments::from(vec![json!(1), json!("two")]);
        let (a, b): (u32, String) = FromArguments::from_arguments(args).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, "two");
    }

    #[test]
    fn test_wrong_count_is_internal() {
        let err = <(u32,)>::from_arguments(Arguments::new()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);

        let err = <()>::from_arguments(Arguments::from(vec![json!(null)])).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_wrong_type_is_bad_request() {
        let err = <(u32,)>::from_arguments(Arguments::from(vec![json!("x")])).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::BadRequest);
        assert!(err.public_message().contains("argument 0"));
    }

    #[tokio::test]
    async fn test_operation_serializes_result() {
        let op = Operation::new(|(name,): (String,)| async move {
            Ok::<_, HeronError>(json!({ "hello": name }))
        });
        assert_eq!(op.arity(), 1);

        let bytes = op.invoke(Arguments::from(vec![json!("heron")])).await.unwrap();
        assert_eq!(&bytes[..], br#"{"hello":"heron"}"#);
    }

    #[tokio::test]
    async fn test_operation_propagates_handler_error() {
        let op = Operation::new(|(): ()| async { Err::<Value, _>(HeronError::internal("boom")) });
        let err = op.invoke(Arguments::new()).await.unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_registry() {
        let mut registry = OperationRegistry::new();
        assert!(registry.is_empty());

        registry.register("health.check", |(): ()| async { Ok(json!({ "ok": true })) });
        registry.register("users.get", |(params,): (Value,)| async move { Ok(params) });

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("users.get"));
        assert_eq!(registry.arity("health.check"), Some(0));
        assert_eq!(registry.arity("users.get"), Some(1));
        assert_eq!(registry.arity("missing"), None);
    }
}
