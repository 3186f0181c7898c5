//! Configuration tree
//!
//! A [`Configuration`] node resolves each option in this order:
//! 1. Explicitly-set value (or nested child)
//! 2. Declared default (literal, deferred computation, or nested node)
//! 3. [`Value::Absent`]

mod defaults;
mod merge;
mod name;
mod node;
mod value;

pub use defaults::{DefaultDescriptor, Deferred};
pub use name::OptionName;
pub use node::Configuration;
pub use value::Value;
