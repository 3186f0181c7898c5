//! Error types for configuration trees.

use crate::config::OptionName;

/// Boxed error returned by a failing deferred computation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `set` received conflicting arguments (a value and a block, or
    /// more than one value through the accessor bridge).
    #[error("ambiguous set invocation for option `{name}`: {reason}")]
    AmbiguousSet { name: OptionName, reason: String },

    /// A deferred computation failed while resolving `name`.
    #[error("deferred value for option `{name}` failed: {source}")]
    Deferred {
        name: OptionName,
        #[source]
        source: BoxError,
    },

    /// A deferred computation asked for its own option while being evaluated.
    #[error("cyclic deferred evaluation of option `{name}`")]
    Cycle { name: OptionName },

    /// A dotted path crossed an option that does not hold a nested configuration.
    #[error("`{path}` is not a nested configuration")]
    NotNested { path: String },

    /// Empty option name or empty path segment.
    #[error("invalid option name: {name:?}")]
    InvalidName { name: String },

    /// An override layer was neither a mapping nor null.
    #[error("override layer {index} is not a mapping")]
    InvalidLayer { index: usize },
}

impl ConfigError {
    pub(crate) fn ambiguous(name: &OptionName, reason: impl Into<String>) -> Self {
        Self::AmbiguousSet {
            name: name.clone(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_ambiguous_message() {
        let err = ConfigError::ambiguous(&OptionName::from("fps"), "value and block both given");
        assert_eq!(
            err.to_string(),
            "ambiguous set invocation for option `fps`: value and block both given"
        );
    }

    #[test]
    fn test_deferred_exposes_source() {
        let err = ConfigError::Deferred {
            name: OptionName::from("payment_method"),
            source: "gateway unavailable".into(),
        };
        assert!(err.to_string().contains("payment_method"));
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("gateway unavailable"));
    }
}
