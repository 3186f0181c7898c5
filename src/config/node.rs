//! The configuration node
//!
//! A node pairs explicitly-set values with declared defaults. Reads consult
//! the set values first, then the defaults, and evaluate deferred
//! computations on every read against the node itself.

use serde_json::{Map, Value as Json};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, trace, warn};

use super::defaults::{DefaultDescriptor, Deferred};
use super::name::{split_path, OptionName};
use super::value::Value;
use crate::error::{BoxError, ConfigError, Result};

/// Explicitly-set scalar or deferred value.
#[derive(Debug, Clone, PartialEq)]
enum Stored {
    Value(Value),
    Deferred(Deferred),
}

/// A configuration node.
///
/// Explicitly-set nested nodes live in `children`, everything else that was
/// set lives in `values`. A name is present in at most one of the two.
pub struct Configuration {
    values: BTreeMap<OptionName, Stored>,
    children: BTreeMap<OptionName, Configuration>,
    defaults: BTreeMap<OptionName, DefaultDescriptor>,
    evaluating: RefCell<BTreeSet<OptionName>>,
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
            children: BTreeMap::new(),
            defaults: BTreeMap::new(),
            evaluating: RefCell::new(BTreeSet::new()),
        }
    }

    /// Build a node by setting every entry of `map` through [`Configuration::set`].
    pub fn from_values(map: Map<String, Json>) -> Self {
        let mut node = Self::new();
        node.apply_partial(map);
        node
    }

    /// Build a node that declares every entry of `map` as a default.
    /// Nested objects become nested nodes. Empty keys are skipped.
    pub fn from_defaults(map: Map<String, Json>) -> Self {
        let mut node = Self::new();
        for (key, default) in map {
            match OptionName::parse(&key) {
                Ok(name) => node.declare_option(name, default),
                Err(_) => {
                    warn!(key = %key, "skipping default with an empty option name");
                }
            }
        }
        node
    }

    /// Declared defaults, keyed by option name.
    pub fn defaults(&self) -> &BTreeMap<OptionName, DefaultDescriptor> {
        &self.defaults
    }

    pub fn default_of(&self, name: impl Into<OptionName>) -> Option<&DefaultDescriptor> {
        self.defaults.get(&name.into())
    }

    pub fn is_declared(&self, name: impl Into<OptionName>) -> bool {
        self.defaults.contains_key(&name.into())
    }

    /// True when an explicit value (or nested child) has been set.
    pub fn is_set(&self, name: impl Into<OptionName>) -> bool {
        let name = name.into();
        self.values.contains_key(&name) || self.children.contains_key(&name)
    }

    /// Every declared or set name, sorted.
    pub fn keys(&self) -> Vec<OptionName> {
        let names: BTreeSet<&OptionName> = self
            .defaults
            .keys()
            .chain(self.values.keys())
            .chain(self.children.keys())
            .collect();
        names.into_iter().cloned().collect()
    }

    /// Register `name` with a default. Redeclaring replaces the previous default.
    pub fn declare_option(
        &mut self,
        name: impl Into<OptionName>,
        default: impl Into<DefaultDescriptor>,
    ) {
        let name = name.into();
        let default = default.into().normalize();
        debug!(option = %name, nested = default.is_nested(), "declared option");
        self.defaults.insert(name, default);
    }

    /// Declare `name` as a nested configuration whose sub-options are declared
    /// right away by `block`.
    pub fn declare_nested<F>(&mut self, name: impl Into<OptionName>, block: F)
    where
        F: FnOnce(&mut Configuration),
    {
        let mut child = Configuration::new();
        block(&mut child);
        self.declare_option(name, DefaultDescriptor::Nested(child));
    }

    /// Resolve `name`: explicit value, else default, else [`Value::Absent`].
    pub fn get(&self, name: impl Into<OptionName>) -> Result<Value> {
        let name = name.into();
        trace!(option = %name, "get");

        if let Some(stored) = self.values.get(&name) {
            return match stored {
                Stored::Value(value) => Ok(value.clone()),
                Stored::Deferred(deferred) => self.evaluate(&name, deferred),
            };
        }
        if let Some(child) = self.children.get(&name) {
            return Ok(Value::Node(child.clone()));
        }
        match self.defaults.get(&name) {
            Some(DefaultDescriptor::Literal(value)) => Ok(value.clone()),
            Some(DefaultDescriptor::Deferred(deferred)) => self.evaluate(&name, deferred),
            Some(DefaultDescriptor::Nested(child)) => Ok(Value::Node(child.clone())),
            None => Ok(Value::Absent),
        }
    }

    /// Store `value` under `name`.
    ///
    /// A JSON object is a partial override of the nested node at `name`:
    /// only the keys it names change.
    pub fn set(&mut self, name: impl Into<OptionName>, value: impl Into<Value>) {
        let name = name.into();
        match value.into() {
            Value::Literal(Json::Object(map)) => self.merge_mapping(name, map),
            Value::Node(child) => {
                trace!(option = %name, "set nested node");
                self.values.remove(&name);
                self.children.insert(name, child);
            }
            value => {
                trace!(option = %name, "set value");
                let value = if value.is_absent() { Value::Absent } else { value };
                self.children.remove(&name);
                self.values.insert(name, Stored::Value(value));
            }
        }
    }

    /// Store a computation that runs on each read of `name`.
    pub fn set_deferred(&mut self, name: impl Into<OptionName>, deferred: Deferred) {
        let name = name.into();
        trace!(option = %name, "set deferred value");
        self.children.remove(&name);
        self.values.insert(name, Stored::Deferred(deferred));
    }

    /// General form of `set`: a value, a block, or neither (stores absent).
    ///
    /// Supplying both a non-absent value and a block is rejected.
    pub fn set_with(
        &mut self,
        name: impl Into<OptionName>,
        value: Option<Value>,
        block: Option<Deferred>,
    ) -> Result<()> {
        let name = name.into();
        let value = value.filter(|v| !v.is_absent());
        match (value, block) {
            (Some(value), Some(_)) => {
                let kind = if value.is_mapping() { "mapping" } else { "value" };
                Err(ConfigError::ambiguous(
                    &name,
                    format!("both a {} and a block were given", kind),
                ))
            }
            (None, Some(block)) => {
                self.set_deferred(name, block);
                Ok(())
            }
            (value, None) => {
                self.set(name, value.unwrap_or_default());
                Ok(())
            }
        }
    }

    /// Drop the explicit value so reads fall back to the default.
    /// Returns whether anything was removed.
    pub fn unset(&mut self, name: impl Into<OptionName>) -> bool {
        let name = name.into();
        let removed_value = self.values.remove(&name).is_some();
        let removed_child = self.children.remove(&name).is_some();
        removed_value || removed_child
    }

    /// Borrow the nested node at `name`: the set child, else the default child.
    pub fn node(&self, name: impl Into<OptionName>) -> Option<&Configuration> {
        let name = name.into();
        if self.values.contains_key(&name) {
            return None;
        }
        self.children
            .get(&name)
            .or_else(|| self.defaults.get(&name).and_then(DefaultDescriptor::as_nested))
    }

    /// Mutable access to the nested node at `name`, creating it if needed.
    ///
    /// The child is the set child if there is one, else an independent copy
    /// of the default child, else a fresh node. A scalar set at `name` is
    /// replaced.
    pub fn node_mut(&mut self, name: impl Into<OptionName>) -> &mut Configuration {
        let name = name.into();
        self.values.remove(&name);
        let defaults = &self.defaults;
        self.children.entry(name).or_insert_with_key(|name| {
            defaults
                .get(name)
                .and_then(DefaultDescriptor::as_nested)
                .cloned()
                .unwrap_or_default()
        })
    }

    /// Run `block` against the nested node at `name` (see [`Configuration::node_mut`]).
    pub fn configure<F>(&mut self, name: impl Into<OptionName>, block: F) -> Result<()>
    where
        F: FnOnce(&mut Configuration) -> Result<()>,
    {
        block(self.node_mut(name))
    }

    /// Resolve a dotted path such as `"advanced_options.fps"`.
    ///
    /// Each parent segment must resolve to a nested node, whether it is set,
    /// declared, or produced by a deferred computation.
    pub fn get_path(&self, path: &str) -> Result<Value> {
        let parts = split_path(path)?;
        self.get_parts(&parts, 0)
    }

    fn get_parts(&self, parts: &[OptionName], depth: usize) -> Result<Value> {
        let Some(part) = parts.get(depth) else {
            return Ok(Value::Absent);
        };
        if depth + 1 == parts.len() {
            return self.get(part);
        }
        if let Some(child) = self.node(part) {
            return child.get_parts(parts, depth + 1);
        }
        match self.get(part)? {
            Value::Node(child) => child.get_parts(parts, depth + 1),
            _ => Err(ConfigError::NotNested {
                path: join(&parts[..=depth]),
            }),
        }
    }

    /// Mutable access to the node at a dotted path, creating nodes along the way.
    ///
    /// Segments that hold a scalar or deferred value are rejected with
    /// `NotNested`, as `get_path` does.
    pub fn node_path_mut(&mut self, path: &str) -> Result<&mut Configuration> {
        let parts = split_path(path)?;
        let mut current = self;
        for (depth, part) in parts.iter().enumerate() {
            if current.holds_scalar(part) {
                return Err(ConfigError::NotNested {
                    path: join(&parts[..=depth]),
                });
            }
            current = current.node_mut(part);
        }
        Ok(current)
    }

    /// Set the option at a dotted path.
    ///
    /// Unlike a partial override through `set`, a path never replaces a scalar
    /// parent; see [`Configuration::node_path_mut`].
    pub fn set_path(&mut self, path: &str, value: impl Into<Value>) -> Result<()> {
        let (parent, last) = match path.rsplit_once('.') {
            Some((parent, last)) => (Some(parent), last),
            None => (None, path),
        };
        let name = OptionName::parse(last)?;
        let target = match parent {
            Some(parent) => self.node_path_mut(parent)?,
            None => self,
        };
        target.set(name, value);
        Ok(())
    }

    /// True when `name` resolves to something other than a nested node or absent.
    fn holds_scalar(&self, name: &OptionName) -> bool {
        if self.values.contains_key(name) {
            return true;
        }
        if self.children.contains_key(name) {
            return false;
        }
        match self.defaults.get(name) {
            Some(DefaultDescriptor::Literal(value)) => !value.is_absent(),
            Some(DefaultDescriptor::Deferred(_)) => true,
            Some(DefaultDescriptor::Nested(_)) | None => false,
        }
    }

    /// Get a config value as u64
    pub fn get_u64(&self, path: &str) -> Result<Option<u64>> {
        Ok(self.get_path(path)?.as_u64())
    }

    /// Get a config value as string
    pub fn get_str(&self, path: &str) -> Result<Option<String>> {
        Ok(self.get_path(path)?.as_str().map(str::to_string))
    }

    /// Get a config value as bool
    pub fn get_bool(&self, path: &str) -> Result<Option<bool>> {
        Ok(self.get_path(path)?.as_bool())
    }

    /// Snapshot every known option as JSON, evaluating deferred values.
    pub fn to_json(&self) -> Result<Json> {
        let mut map = Map::new();
        for name in self.keys() {
            let value = self.get(&name)?.to_json()?;
            map.insert(name.to_string(), value);
        }
        Ok(Json::Object(map))
    }

    fn evaluate(&self, name: &OptionName, deferred: &Deferred) -> Result<Value> {
        if !self.evaluating.borrow_mut().insert(name.clone()) {
            return Err(ConfigError::Cycle { name: name.clone() });
        }
        trace!(option = %name, "evaluating deferred value");
        let result = deferred.call(self);
        self.evaluating.borrow_mut().remove(name);
        result.map_err(|source| deferred_error(name, source))
    }
}

/// Cycles keep their identity. Every other failure is attributed to `name`.
fn deferred_error(name: &OptionName, source: BoxError) -> ConfigError {
    match source.downcast::<ConfigError>() {
        Ok(err) => match *err {
            cycle @ ConfigError::Cycle { .. } => cycle,
            other => ConfigError::Deferred {
                name: name.clone(),
                source: Box::new(other),
            },
        },
        Err(source) => ConfigError::Deferred {
            name: name.clone(),
            source,
        },
    }
}

fn join(parts: &[OptionName]) -> String {
    parts
        .iter()
        .map(OptionName::as_str)
        .collect::<Vec<_>>()
        .join(".")
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Configuration {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            children: self.children.clone(),
            defaults: self.defaults.clone(),
            evaluating: RefCell::new(BTreeSet::new()),
        }
    }
}

impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
            && self.children == other.children
            && self.defaults == other.defaults
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("values", &self.values)
            .field("children", &self.children)
            .field("defaults", &self.defaults)
            .finish()
    }
}
