//! Configurator - declarative option trees
//!
//! This crate gives a host a hierarchical set of named options with
//! defaults, lazily-evaluated defaults and nested sub-configurations.
//! Hosts embed a [`ConfigSlot`], declare options through [`Options`], and
//! read or write them through [`Configuration`].

pub mod bridge;
pub mod config;
pub mod error;
pub mod host;
pub mod option;

pub use bridge::Member;
pub use config::{Configuration, DefaultDescriptor, Deferred, OptionName, Value};
pub use error::{BoxError, ConfigError, Result};
pub use host::ConfigSlot;
pub use option::Options;
