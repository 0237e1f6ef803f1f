//! Conditional continuation of a builder chain.
//!
//! `if_set`, `if_has_arg` and friends return a [`Branch`]. When the condition
//! held the branch forwards every call to the builder; otherwise it is inert
//! and every call is a no-op, so
//!
//! ```
//! use aliaspp::{CommandBuilder, ValueRequirement};
//! let mut cb = CommandBuilder::detached();
//! cb.base("git branch");
//! cb.if_set("D", ValueRequirement::RequireValue)
//!     .update_flag("D", |v| format!("pablo/{v}"))
//!     .unwrap();
//! assert_eq!(cb.build_command().unwrap(), "git branch");
//! ```
//!
//! reads as a single statement without an `if`.

use crate::builder::{CommandBuilder, Connector, FlagOptions, Lookup, ValueRequirement};
use crate::error::Result;

/// Either the builder a condition held for, or nothing.
#[derive(Debug)]
pub enum Branch<'a> {
    Active(&'a mut CommandBuilder),
    Inert,
}

impl<'a> Branch<'a> {
    pub(crate) fn when(holds: bool, cb: &'a mut CommandBuilder) -> Self {
        if holds { Branch::Active(cb) } else { Branch::Inert }
    }

    /// Whether calls on this branch reach a builder.
    pub fn is_active(&self) -> bool {
        matches!(self, Branch::Active(_))
    }

    pub fn into_inner(self) -> Option<&'a mut CommandBuilder> {
        match self {
            Branch::Active(cb) => Some(cb),
            Branch::Inert => None,
        }
    }

    fn map(self, f: impl FnOnce(&mut CommandBuilder)) -> Self {
        match self {
            Branch::Active(cb) => {
                f(&mut *cb);
                Branch::Active(cb)
            }
            Branch::Inert => Branch::Inert,
        }
    }

    fn try_map(self, f: impl FnOnce(&mut CommandBuilder) -> Result<()>) -> Result<Self> {
        match self {
            Branch::Active(cb) => {
                f(&mut *cb)?;
                Ok(Branch::Active(cb))
            }
            Branch::Inert => Ok(Branch::Inert),
        }
    }

    pub fn base(self, command: impl Into<String>) -> Self {
        self.map(|cb| {
            cb.base(command);
        })
    }

    pub fn update_arg<F>(self, index: usize, transform: F) -> Result<Self>
    where
        F: FnOnce(&str) -> String,
    {
        self.try_map(|cb| cb.update_arg(index, transform).map(drop))
    }

    pub fn append_arg<'v>(self, value: impl Into<Option<&'v str>>) -> Self {
        self.map(|cb| {
            cb.append_arg(value);
        })
    }

    pub fn set_flag<'v>(self, name: &str, value: impl Into<Option<&'v str>>) -> Self {
        self.map(|cb| {
            cb.set_flag(name, value);
        })
    }

    pub fn set_flag_with<'v>(
        self,
        name: &str,
        value: impl Into<Option<&'v str>>,
        options: FlagOptions,
    ) -> Result<Self> {
        self.try_map(|cb| cb.set_flag_with(name, value, options).map(drop))
    }

    /// Set a flag from a positional argument. An inert branch reads nothing.
    pub fn set_flag_from_arg(self, name: &str, index: usize, lookup: Lookup<'_>) -> Result<Self> {
        self.try_map(|cb| cb.set_flag_from_arg(name, index, lookup).map(drop))
    }

    pub fn update_flag<F>(self, name: &str, transform: F) -> Result<Self>
    where
        F: FnOnce(&str) -> String,
    {
        self.try_map(|cb| cb.update_flag(name, transform).map(drop))
    }

    pub fn remove_flag(self, name: &str) -> Self {
        self.map(|cb| {
            cb.remove_flag(name);
        })
    }

    pub fn save_to_env(self, flag: &str, env_name: &str) -> Result<Self> {
        self.try_map(|cb| cb.save_to_env(flag, env_name).map(drop))
    }

    pub fn clear_from_env(self, env_name: &str) -> Self {
        self.map(|cb| {
            cb.clear_from_env(env_name);
        })
    }

    /// Chain a command; the returned branch continues on the chained builder.
    pub fn append_command(self, base: &str, connector: Connector) -> Result<Branch<'a>> {
        match self {
            Branch::Active(cb) => cb.append_command(base, connector).map(Branch::Active),
            Branch::Inert => Ok(Branch::Inert),
        }
    }

    /// `None` on an inert branch; nothing is consumed then.
    pub fn get_arg(&mut self, index: usize, lookup: Lookup<'_>) -> Result<Option<String>> {
        match self {
            Branch::Active(cb) => cb.get_arg(index, lookup).map(Some),
            Branch::Inert => Ok(None),
        }
    }

    /// `None` on an inert branch, and for a presence-only flag.
    pub fn get_flag(&self, name: &str, lookup: Lookup<'_>) -> Result<Option<String>> {
        match self {
            Branch::Active(cb) => cb.get_flag(name, lookup),
            Branch::Inert => Ok(None),
        }
    }

    pub fn get_from_env(&self, name: &str, default: Option<&str>) -> Option<String> {
        match self {
            Branch::Active(cb) => cb.get_from_env(name, default),
            Branch::Inert => None,
        }
    }

    pub fn is_set(&self, name: &str, requirement: ValueRequirement) -> bool {
        matches!(self, Branch::Active(cb) if cb.is_set(name, requirement))
    }

    pub fn is_not_set(&self, name: &str) -> bool {
        matches!(self, Branch::Active(cb) if cb.is_not_set(name))
    }

    pub fn has_arg(&self, index: usize) -> bool {
        matches!(self, Branch::Active(cb) if cb.has_arg(index))
    }

    pub fn not_has_arg(&self, index: usize) -> bool {
        matches!(self, Branch::Active(cb) if cb.not_has_arg(index))
    }

    pub fn if_set(self, name: &str, requirement: ValueRequirement) -> Self {
        self.narrow(|cb| cb.is_set(name, requirement))
    }

    pub fn if_not_set(self, name: &str) -> Self {
        self.narrow(|cb| cb.is_not_set(name))
    }

    pub fn if_has_arg(self, index: usize) -> Self {
        self.narrow(|cb| cb.has_arg(index))
    }

    pub fn if_not_has_arg(self, index: usize) -> Self {
        self.narrow(|cb| cb.not_has_arg(index))
    }

    fn narrow(self, holds: impl FnOnce(&CommandBuilder) -> bool) -> Self {
        match self {
            Branch::Active(cb) => {
                let holds = holds(&*cb);
                Branch::when(holds, cb)
            }
            Branch::Inert => Branch::Inert,
        }
    }
}
