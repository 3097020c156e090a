use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;

/// Rejection raised by a [`Schema`]; the message is reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct SchemaRejected(pub String);

impl SchemaRejected {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A structural check over decoded content. `parse` returns the accepted
/// (possibly normalized) value, or fails with the reason for rejection.
///
/// Validators that report failure through a returned value rather than an
/// `Err` need a small adapter on the caller's side.
pub trait Schema: Send + Sync {
    fn parse(&self, value: &Value) -> Result<Value, SchemaRejected>;
}

impl<F> Schema for F
where
    F: Fn(&Value) -> Result<Value, SchemaRejected> + Send + Sync,
{
    fn parse(&self, value: &Value) -> Result<Value, SchemaRejected> {
        self(value)
    }
}

/// Accepts a value iff it deserializes into `T`; the accepted value is `T`
/// serialized back, so serde defaults are filled in.
pub struct TypedSchema<T> {
    _target: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T> {
    pub fn new() -> Self {
        Self {
            _target: PhantomData,
        }
    }
}

impl<T> Default for TypedSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema for TypedSchema<T>
where
    T: DeserializeOwned + Serialize,
{
    fn parse(&self, value: &Value) -> Result<Value, SchemaRejected> {
        let typed: T = serde_json::from_value(value.clone())
            .map_err(|err| SchemaRejected::new(err.to_string()))?;
        serde_json::to_value(typed).map_err(|err| SchemaRejected::new(err.to_string()))
    }
}
