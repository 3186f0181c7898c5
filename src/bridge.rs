//! Accessor bridge
//!
//! Routes attribute-style member access (`fps`, `fps=`, `fps(60)`) to
//! [`Configuration::get`] and [`Configuration::set_with`].

use crate::config::{Configuration, Deferred, OptionName, Value};
use crate::error::{ConfigError, Result};

/// A parsed member name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    /// `name`
    Get(OptionName),
    /// `name=`
    Set(OptionName),
}

impl Member {
    /// Parse a raw member name. A trailing `=` marks a setter.
    pub fn parse(member: &str) -> Result<Self> {
        match member.strip_suffix('=') {
            Some(name) => Ok(Member::Set(OptionName::parse(name)?)),
            None => Ok(Member::Get(OptionName::parse(member)?)),
        }
    }

    pub fn name(&self) -> &OptionName {
        match self {
            Member::Get(name) | Member::Set(name) => name,
        }
    }
}

impl Configuration {
    /// Dispatch a member access.
    ///
    /// It is a write when the member ends in `=`, when arguments are passed,
    /// or when a block is given; otherwise it is a read. Reads return the
    /// resolved value, writes return [`Value::Absent`].
    pub fn dispatch(
        &mut self,
        member: &str,
        args: Vec<Value>,
        block: Option<Deferred>,
    ) -> Result<Value> {
        let member = Member::parse(member)?;
        let is_setter = matches!(member, Member::Set(_)) || !args.is_empty() || block.is_some();
        if !is_setter {
            return self.get(member.name());
        }

        if args.len() > 1 {
            return Err(ConfigError::ambiguous(
                member.name(),
                format!("expected at most one value, got {}", args.len()),
            ));
        }
        let value = args.into_iter().next();
        self.set_with(member.name(), value, block)?;
        Ok(Value::Absent)
    }
}
