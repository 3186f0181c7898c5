//! Option names
//!
//! Names are symbolic identifiers. `fps`, `"fps"` and the symbol spelling
//! `:fps` all normalise to the same key.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::error::{ConfigError, Result};

/// Normalised option name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionName(String);

impl OptionName {
    /// Normalise a raw name, stripping a leading `:` sigil and surrounding whitespace.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        Self(trimmed.strip_prefix(':').unwrap_or(trimmed).to_string())
    }

    /// Like [`OptionName::new`], but rejects names that normalise to nothing.
    pub fn parse(raw: impl AsRef<str>) -> Result<Self> {
        let name = Self::new(raw.as_ref());
        if name.0.is_empty() {
            return Err(ConfigError::InvalidName {
                name: raw.as_ref().to_string(),
            });
        }
        Ok(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for OptionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OptionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OptionName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for OptionName {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&String> for OptionName {
    fn from(raw: &String) -> Self {
        Self::new(raw)
    }
}

impl From<&OptionName> for OptionName {
    fn from(name: &OptionName) -> Self {
        name.clone()
    }
}

/// Split a dotted path (`"sub.sub.name"`) into option names.
pub(crate) fn split_path(path: &str) -> Result<Vec<OptionName>> {
    path.split('.').map(OptionName::parse).collect()
}
