//! Option declaration
//!
//! Anything that owns a [`Configuration`] can declare options on it. Nodes
//! implement [`Options`] against themselves, so nested blocks use the same
//! calls as hosts.

use crate::config::{Configuration, DefaultDescriptor, OptionName};

/// Declaration surface over an owned configuration node.
///
/// Declarations only ever touch defaults, never set values.
pub trait Options {
    /// The node declarations apply to.
    fn config(&mut self) -> &mut Configuration;

    /// Declare `name` with a default. Literals, [`crate::Deferred`]
    /// computations and nested nodes are all accepted.
    fn option(
        &mut self,
        name: impl Into<OptionName>,
        default: impl Into<DefaultDescriptor>,
    ) -> &mut Self {
        self.config().declare_option(name, default);
        self
    }

    /// Declare `name` as a nested configuration. `block` runs immediately
    /// against the fresh child to declare its sub-options.
    fn option_with<F>(&mut self, name: impl Into<OptionName>, block: F) -> &mut Self
    where
        F: FnOnce(&mut Configuration),
    {
        self.config().declare_nested(name, block);
        self
    }

    /// Declare each name with an absent default.
    fn options<I>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: Into<OptionName>,
    {
        for name in names {
            self.option(name, DefaultDescriptor::default());
        }
        self
    }
}

impl Options for Configuration {
    fn config(&mut self) -> &mut Configuration {
        self
    }
}
