//! Host binding
//!
//! A host embeds one [`ConfigSlot`]. The slot creates the host's top-level
//! node on first use, and [`ConfigSlot::attach`] throws it away so the next
//! access starts from a fresh node.

use tracing::debug;

use crate::config::Configuration;
use crate::error::Result;
use crate::option::Options;

/// Per-host configuration state.
#[derive(Debug, Clone, Default)]
pub struct ConfigSlot {
    configuration: Option<Configuration>,
}

impl ConfigSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifecycle hook for (re)attaching configuration to a host. Discards
    /// any node left over from a previous attachment.
    pub fn attach(&mut self) {
        if self.configuration.take().is_some() {
            debug!("discarded previous configuration on attach");
        }
    }

    /// Whether the top-level node has been created yet.
    pub fn is_initialized(&self) -> bool {
        self.configuration.is_some()
    }

    /// The host's top-level node, created on first call.
    pub fn config(&mut self) -> &mut Configuration {
        self.configuration.get_or_insert_with(|| {
            debug!("initialized host configuration");
            Configuration::new()
        })
    }

    /// Run `block` against the top-level node and return the node.
    pub fn configure<F>(&mut self, block: F) -> Result<&mut Configuration>
    where
        F: FnOnce(&mut Configuration) -> Result<()>,
    {
        let config = self.config();
        block(&mut *config)?;
        Ok(config)
    }
}

impl Options for ConfigSlot {
    fn config(&mut self) -> &mut Configuration {
        ConfigSlot::config(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConfigError;
    use serde_json::json;

    #[test]
    fn test_lazy_initialization() {
        let mut slot = ConfigSlot::new();
        assert!(!slot.is_initialized());
        slot.config();
        assert!(slot.is_initialized());
    }

    #[test]
    fn test_same_node_across_calls() {
        let mut slot = ConfigSlot::new();
        slot.config().set("fps", 60);
        assert_eq!(slot.config().get("fps").unwrap(), json!(60));
    }

    #[test]
    fn test_attach_resets() {
        let mut slot = ConfigSlot::new();
        slot.option("fps", 30);
        slot.config().set("fps", 60);

        slot.attach();
        assert!(!slot.is_initialized());
        assert!(!slot.config().is_declared("fps"));
        assert!(slot.config().get("fps").unwrap().is_absent());
    }

    #[test]
    fn test_configure_block() {
        let mut slot = ConfigSlot::new();
        slot.option("do_something", "now!");

        let config = slot
            .configure(|config| {
                config.set("do_something", "later...");
                Ok(())
            })
            .unwrap();
        assert_eq!(config.get("do_something").unwrap(), json!("later..."));
    }

    #[test]
    fn test_configure_propagates_errors() {
        let mut slot = ConfigSlot::new();
        let result = slot.configure(|config| {
            config.set_with("fps", Some(60.into()), Some(crate::Deferred::from_fn(|_| 30)))
        });
        assert!(matches!(result, Err(ConfigError::AmbiguousSet { .. })));
    }
}
