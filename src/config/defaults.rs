//! Default descriptors
//!
//! What an option falls back to when nothing has been set explicitly.

use serde_json::Value as Json;
use std::fmt;
use std::rc::Rc;

use super::node::Configuration;
use super::value::Value;
use crate::error::BoxError;

type DeferredFn = dyn Fn(&Configuration) -> Result<Value, BoxError>;

/// A computation evaluated each time its option is read.
///
/// The closure receives the owning node so it can read sibling options.
#[derive(Clone)]
pub struct Deferred(Rc<DeferredFn>);

impl Deferred {
    /// Fallible computation. Errors surface from `get` as `ConfigError::Deferred`.
    pub fn new<F, T>(f: F) -> Self
    where
        F: Fn(&Configuration) -> Result<T, BoxError> + 'static,
        T: Into<Value>,
    {
        Self(Rc::new(move |node: &Configuration| -> Result<Value, BoxError> {
            f(node).map(Into::into)
        }))
    }

    /// Infallible computation.
    pub fn from_fn<F, T>(f: F) -> Self
    where
        F: Fn(&Configuration) -> T + 'static,
        T: Into<Value>,
    {
        Self(Rc::new(move |node: &Configuration| -> Result<Value, BoxError> {
            Ok(f(node).into())
        }))
    }

    pub(crate) fn call(&self, node: &Configuration) -> Result<Value, BoxError> {
        (self.0)(node)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Deferred(..)")
    }
}

/// Two deferreds are equal only when they are the same computation.
impl PartialEq for Deferred {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// How an undeclared-but-unset option still yields a value.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultDescriptor {
    /// A constant (possibly absent).
    Literal(Value),
    /// Evaluated on every read against the owning node.
    Deferred(Deferred),
    /// Sub-options live in a child node.
    Nested(Configuration),
}

impl Default for DefaultDescriptor {
    fn default() -> Self {
        DefaultDescriptor::Literal(Value::Absent)
    }
}

impl DefaultDescriptor {
    pub fn is_nested(&self) -> bool {
        matches!(self, DefaultDescriptor::Nested(_))
    }

    pub fn as_nested(&self) -> Option<&Configuration> {
        match self {
            DefaultDescriptor::Nested(node) => Some(node),
            _ => None,
        }
    }

    /// Container-typed literals become nested nodes: a node literal is used
    /// as-is, and a JSON object becomes a node whose defaults are its entries.
    pub(crate) fn normalize(self) -> Self {
        match self {
            DefaultDescriptor::Literal(Value::Node(node)) => DefaultDescriptor::Nested(node),
            DefaultDescriptor::Literal(Value::Literal(Json::Object(map))) => {
                DefaultDescriptor::Nested(Configuration::from_defaults(map))
            }
            DefaultDescriptor::Literal(Value::Literal(Json::Null)) => {
                DefaultDescriptor::Literal(Value::Absent)
            }
            other => other,
        }
    }
}

impl From<Value> for DefaultDescriptor {
    fn from(value: Value) -> Self {
        DefaultDescriptor::Literal(value)
    }
}

impl From<Deferred> for DefaultDescriptor {
    fn from(deferred: Deferred) -> Self {
        DefaultDescriptor::Deferred(deferred)
    }
}

impl From<Configuration> for DefaultDescriptor {
    fn from(node: Configuration) -> Self {
        DefaultDescriptor::Nested(node)
    }
}

impl From<Json> for DefaultDescriptor {
    fn from(json: Json) -> Self {
        DefaultDescriptor::Literal(Value::from(json))
    }
}

macro_rules! descriptor_from_literal {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for DefaultDescriptor {
                fn from(value: $ty) -> Self {
                    DefaultDescriptor::Literal(Value::from(value))
                }
            }
        )*
    };
}

descriptor_from_literal!(bool, i32, i64, u32, u64, f64, &str, String);
