use crate::branch::Branch;
use crate::command::ExitCode;
use crate::error::{AliasError, Result};
use crate::shell;
use crate::store::{SharedStore, Store};
use crate::tokenizer::{self, DRY_RUN_FLAG, Flag, Flags, ParsedArgs};
use std::collections::BTreeSet;
use std::fmt;
use std::io::Write;

/// Operator joining a chained command to the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connector {
    /// `&&`: run only if the previous command succeeded.
    #[default]
    And,
    /// `||`: run only if the previous command failed.
    Or,
    /// `;`: run unconditionally afterwards.
    Then,
    /// `|`: feed the previous command's output in.
    Pipe,
}

impl Connector {
    pub fn as_str(self) -> &'static str {
        match self {
            Connector::And => "&&",
            Connector::Or => "||",
            Connector::Then => ";",
            Connector::Pipe => "|",
        }
    }
}

impl fmt::Display for Connector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a flag's value has to look like for [`CommandBuilder::is_set`] to hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValueRequirement {
    /// Any set flag qualifies.
    #[default]
    Any,
    /// The flag must carry a value.
    RequireValue,
    /// The flag must be presence-only.
    RequireNoValue,
}

/// How [`CommandBuilder::get_arg`] and [`CommandBuilder::get_flag`] behave on a miss.
///
/// By default a miss is an error with a generic message and a found argument
/// is consumed (left out of the composed command).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup<'a> {
    default: Option<&'a str>,
    error: Option<&'a str>,
    consume: bool,
}

impl Default for Lookup<'_> {
    fn default() -> Self {
        Self {
            default: None,
            error: None,
            consume: true,
        }
    }
}

impl<'a> Lookup<'a> {
    /// Fail on a miss with the generic message.
    pub fn required() -> Self {
        Self::default()
    }

    /// Return `default` on a miss instead of failing.
    pub fn or(default: &'a str) -> Self {
        Self {
            default: Some(default),
            ..Self::default()
        }
    }

    /// Message reported when the lookup fails.
    pub fn error(mut self, message: &'a str) -> Self {
        self.error = Some(message);
        self
    }

    /// Leave a found argument in the composed command.
    pub fn keep(mut self) -> Self {
        self.consume = false;
        self
    }
}

/// Knobs of [`CommandBuilder::set_flag_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagOptions {
    /// Replace a flag that is already set.
    pub overwrite: bool,
    /// Force `-name` (1) or `--name` (2). `None` picks by name length.
    pub dashes: Option<u8>,
}

impl Default for FlagOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            dashes: None,
        }
    }
}

impl FlagOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave an existing flag untouched.
    pub fn keep_existing(mut self) -> Self {
        self.overwrite = false;
        self
    }

    pub fn dashes(mut self, dashes: u8) -> Self {
        self.dashes = Some(dashes);
        self
    }

    fn double_dash(&self, name: &str) -> Result<bool> {
        match self.dashes {
            Some(1) => Ok(false),
            Some(2) => Ok(true),
            Some(n) => Err(AliasError::InvalidDashSpec(n)),
            None => Ok(name.chars().count() > 1),
        }
    }
}

/// Mutable description of the command an alias expands to.
///
/// A builder starts from the tokenized command line, gets reshaped by a
/// transform through the fluent API below, and is finally consumed by
/// [`CommandBuilder::execute`]. Arguments read with consuming semantics are
/// only marked; they disappear when the command is serialized, so indices
/// stay stable while the transform runs.
///
/// Chained commands created with [`CommandBuilder::append_command`] share the
/// parent's store.
#[derive(Debug)]
pub struct CommandBuilder {
    base: String,
    args: Vec<String>,
    flags: Flags,
    consumed: BTreeSet<usize>,
    store: SharedStore,
    chain: Vec<(CommandBuilder, Connector)>,
}

impl CommandBuilder {
    /// Empty builder backed by `store`.
    pub fn new(store: SharedStore) -> Self {
        Self {
            base: String::new(),
            args: Vec::new(),
            flags: Flags::new(),
            consumed: BTreeSet::new(),
            store,
            chain: Vec::new(),
        }
    }

    /// Empty builder with a private in-memory store.
    pub fn detached() -> Self {
        Self::new(Store::in_memory().shared())
    }

    /// Builder pre-populated from the raw tokens that followed the alias name.
    pub fn from_args<S: AsRef<str>>(tokens: &[S], store: SharedStore) -> Self {
        Self::from_parsed(tokenizer::tokenize(tokens), store)
    }

    /// Builder pre-populated from already tokenized arguments.
    ///
    /// Values are kept as typed; quoting happens when the command is built.
    pub fn from_parsed(parsed: ParsedArgs, store: SharedStore) -> Self {
        let mut cb = Self::new(store);
        cb.args = parsed.args;
        cb.flags = parsed.flags;
        cb
    }

    /// Set the base command, replacing any previous one.
    pub fn base(&mut self, command: impl Into<String>) -> &mut Self {
        self.base = command.into();
        self
    }

    pub fn base_command(&self) -> &str {
        &self.base
    }

    /// Positional arguments as currently held, consumed ones included.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn flags(&self) -> &Flags {
        &self.flags
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Read the positional argument at `index`.
    ///
    /// On a miss the lookup's default is returned, or `ArgumentMissing` when
    /// there is none. A found argument is consumed unless the lookup says
    /// [`Lookup::keep`]; a default consumes nothing.
    pub fn get_arg(&mut self, index: usize, lookup: Lookup<'_>) -> Result<String> {
        match self.args.get(index) {
            Some(value) => {
                let value = value.clone();
                if lookup.consume {
                    self.consumed.insert(index);
                }
                Ok(value)
            }
            None => lookup
                .default
                .map(str::to_owned)
                .ok_or_else(|| AliasError::argument_missing(index, lookup.error)),
        }
    }

    /// Replace the argument at `index` with `transform(current)`, cleaned.
    pub fn update_arg<F>(&mut self, index: usize, transform: F) -> Result<&mut Self>
    where
        F: FnOnce(&str) -> String,
    {
        let slot = self
            .args
            .get_mut(index)
            .ok_or_else(|| AliasError::argument_missing(index, None))?;
        *slot = clean_value(&transform(slot.as_str()));
        Ok(self)
    }

    /// Append a cleaned trailing argument. `None` does nothing.
    pub fn append_arg<'v>(&mut self, value: impl Into<Option<&'v str>>) -> &mut Self {
        if let Some(value) = value.into() {
            self.args.push(clean_value(value));
        }
        self
    }

    /// Value of flag `name`; `Ok(None)` for a presence-only flag.
    ///
    /// On a miss the lookup's default is returned, or `FlagMissing`.
    pub fn get_flag(&self, name: &str, lookup: Lookup<'_>) -> Result<Option<String>> {
        match self.flags.get(name) {
            Some(flag) => Ok(flag.value.clone()),
            None => lookup
                .default
                .map(|d| Some(d.to_owned()))
                .ok_or_else(|| AliasError::flag_missing(name, lookup.error)),
        }
    }

    /// Set flag `name`, replacing an existing one. Dashes follow the name length.
    pub fn set_flag<'v>(&mut self, name: &str, value: impl Into<Option<&'v str>>) -> &mut Self {
        let double_dash = name.chars().count() > 1;
        self.insert_flag(name, value.into(), double_dash);
        self
    }

    /// Set flag `name` with explicit overwrite and dash handling.
    ///
    /// Fails with `InvalidDashSpec` when `options.dashes` is neither 1 nor 2.
    pub fn set_flag_with<'v>(
        &mut self,
        name: &str,
        value: impl Into<Option<&'v str>>,
        options: FlagOptions,
    ) -> Result<&mut Self> {
        let double_dash = options.double_dash(name)?;
        if options.overwrite || !self.flags.contains_key(name) {
            self.insert_flag(name, value.into(), double_dash);
        }
        Ok(self)
    }

    /// Set flag `name` to the positional argument at `index`, consuming it.
    pub fn set_flag_from_arg(
        &mut self,
        name: &str,
        index: usize,
        lookup: Lookup<'_>,
    ) -> Result<&mut Self> {
        let value = self.get_arg(index, lookup)?;
        Ok(self.set_flag(name, value.as_str()))
    }

    /// Replace the value of flag `name` with `transform(current)`, cleaned.
    ///
    /// A presence-only flag is handed an empty string. The dash style is kept.
    pub fn update_flag<F>(&mut self, name: &str, transform: F) -> Result<&mut Self>
    where
        F: FnOnce(&str) -> String,
    {
        let flag = self
            .flags
            .get_mut(name)
            .ok_or_else(|| AliasError::flag_missing(name, None))?;
        let current = flag.value.as_deref().unwrap_or_default();
        flag.value = Some(clean_value(&transform(current)));
        Ok(self)
    }

    /// Remove flag `name` if present.
    pub fn remove_flag(&mut self, name: &str) -> &mut Self {
        self.flags.shift_remove(name);
        self
    }

    pub fn is_set(&self, name: &str, requirement: ValueRequirement) -> bool {
        match (self.flags.get(name), requirement) {
            (None, _) => false,
            (Some(_), ValueRequirement::Any) => true,
            (Some(flag), ValueRequirement::RequireValue) => flag.value.is_some(),
            (Some(flag), ValueRequirement::RequireNoValue) => flag.value.is_none(),
        }
    }

    pub fn is_not_set(&self, name: &str) -> bool {
        !self.flags.contains_key(name)
    }

    pub fn has_arg(&self, index: usize) -> bool {
        index < self.args.len()
    }

    pub fn not_has_arg(&self, index: usize) -> bool {
        !self.has_arg(index)
    }

    /// Continue the chain only if flag `name` is set as required.
    pub fn if_set(&mut self, name: &str, requirement: ValueRequirement) -> Branch<'_> {
        let holds = self.is_set(name, requirement);
        Branch::when(holds, self)
    }

    pub fn if_not_set(&mut self, name: &str) -> Branch<'_> {
        let holds = self.is_not_set(name);
        Branch::when(holds, self)
    }

    pub fn if_has_arg(&mut self, index: usize) -> Branch<'_> {
        let holds = self.has_arg(index);
        Branch::when(holds, self)
    }

    pub fn if_not_has_arg(&mut self, index: usize) -> Branch<'_> {
        let holds = self.not_has_arg(index);
        Branch::when(holds, self)
    }

    /// Look `name` up in the persisted store.
    pub fn get_from_env(&self, name: &str, default: Option<&str>) -> Option<String> {
        self.store
            .borrow()
            .get(name)
            .or(default)
            .map(str::to_owned)
    }

    /// Persist the value of flag `flag` under `env_name`.
    ///
    /// A presence-only flag is stored as an empty string.
    pub fn save_to_env(&mut self, flag: &str, env_name: &str) -> Result<&mut Self> {
        let value = match self.flags.get(flag) {
            Some(f) => f.value.clone().unwrap_or_default(),
            None => {
                let message = format!(
                    "Cannot save {flag} to environment variable because it is not set"
                );
                return Err(AliasError::flag_missing(flag, Some(message.as_str())));
            }
        };
        self.store.borrow_mut().save(env_name, value);
        Ok(self)
    }

    pub fn clear_from_env(&mut self, env_name: &str) -> &mut Self {
        self.store.borrow_mut().clear(env_name);
        self
    }

    /// Chain a new command after this one and return it for configuration.
    ///
    /// The chained builder starts empty apart from `base` and shares this
    /// builder's store.
    pub fn append_command(&mut self, base: &str, connector: Connector) -> Result<&mut CommandBuilder> {
        if base.trim().is_empty() {
            return Err(AliasError::InvalidArgument(
                "chained command needs a base command".to_owned(),
            ));
        }
        let mut next = CommandBuilder::new(self.store.clone());
        next.base(base);
        let slot = self.chain.len();
        self.chain.push((next, connector));
        Ok(&mut self.chain[slot].0)
    }

    /// Serialize the builder into a single command line.
    ///
    /// Consumed arguments are left out, flags follow in insertion order and
    /// chained commands come last, each behind its connector. The reserved
    /// dry-run flag is never emitted.
    pub fn build_command(&self) -> Result<String> {
        let mut command = self.base.trim().to_owned();
        if command.is_empty() {
            return Err(AliasError::BaseCommandUnset);
        }

        let remaining: Vec<String> = self
            .args
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.consumed.contains(i))
            .map(|(_, arg)| clean_value(arg))
            .collect();
        if !remaining.is_empty() {
            command.push(' ');
            command.push_str(&remaining.join(" "));
        }

        for (name, flag) in self.flags.iter().filter(|(n, _)| *n != DRY_RUN_FLAG) {
            command.push_str(if flag.double_dash { " --" } else { " -" });
            command.push_str(name);
            if let Some(value) = &flag.value {
                command.push(' ');
                command.push_str(&clean_value(value));
            }
        }

        for (next, connector) in &self.chain {
            let next = next.build_command()?;
            if !next.is_empty() {
                command.push_str(&format!(" {connector} {next}"));
            }
        }

        Ok(command)
    }

    /// Whether the reserved dry-run flag was given on the command line.
    pub fn dry_run_requested(&self) -> bool {
        self.flags.contains_key(DRY_RUN_FLAG)
    }

    /// Build the command and run it, or print it on stdout for a dry run.
    ///
    /// The builder is consumed: nothing can be done with it afterwards.
    pub fn execute(self, dry_run: bool) -> Result<ExitCode> {
        self.execute_to(dry_run, &mut std::io::stdout())
    }

    /// Like [`CommandBuilder::execute`], writing a dry run to `out`.
    pub fn execute_to(self, dry_run: bool, out: &mut dyn Write) -> Result<ExitCode> {
        let command = self.build_command()?;
        if dry_run || self.dry_run_requested() {
            log::debug!("dry run: {command}");
            writeln!(out, "{command}")?;
            return Ok(0);
        }
        shell::run(&command)
    }

    fn insert_flag(&mut self, name: &str, value: Option<&str>, double_dash: bool) {
        let flag = Flag::new(value.map(clean_value), double_dash);
        self.flags.insert(name.to_owned(), flag);
    }
}

/// Trim a value and wrap it in double quotes if it contains a space.
///
/// Already quoted values are left as they are, so cleaning is idempotent.
/// Nothing is escaped.
pub fn clean_value(value: &str) -> String {
    let value = value.trim();
    let quoted = value.len() >= 2 && value.starts_with('"') && value.ends_with('"');
    if value.contains(' ') && !quoted {
        format!("\"{value}\"")
    } else {
        value.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn builder(tokens: &[&str]) -> CommandBuilder {
        CommandBuilder::from_args(tokens, Store::in_memory().shared())
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value("  main "), "main");
        assert_eq!(clean_value("Build Complete"), "\"Build Complete\"");
        assert_eq!(clean_value("\"Build Complete\""), "\"Build Complete\"");
        assert_eq!(clean_value(""), "");
    }

    #[test]
    fn test_base_unset_fails() {
        let cb = builder(&["a"]);
        assert!(matches!(cb.build_command(), Err(AliasError::BaseCommandUnset)));

        let mut cb = builder(&[]);
        cb.base("   ");
        assert!(matches!(cb.build_command(), Err(AliasError::BaseCommandUnset)));
    }

    #[test]
    fn test_base_is_overwritten() {
        let mut cb = builder(&[]);
        cb.base("git").base("git status");
        assert_eq!(cb.build_command().unwrap(), "git status");
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut cb = builder(&["x", "y", "-v", "--name", "n"]);
        cb.base("tool");
        cb.get_arg(0, Lookup::required()).unwrap();
        let first = cb.build_command().unwrap();
        assert_eq!(first, "tool y -v --name n");
        assert_eq!(cb.build_command().unwrap(), first);
    }

    #[test]
    fn test_consumed_argument_is_dropped_others_keep_order() {
        let mut cb = builder(&["a", "b", "c"]);
        cb.base("cmd");
        assert_eq!(cb.get_arg(1, Lookup::required()).unwrap(), "b");
        assert_eq!(cb.get_arg(1, Lookup::required()).unwrap(), "b");
        assert_eq!(cb.build_command().unwrap(), "cmd a c");
    }

    #[test]
    fn test_get_arg_keep_and_defaults() {
        let mut cb = builder(&["a"]);
        cb.base("cmd");
        assert_eq!(cb.get_arg(0, Lookup::required().keep()).unwrap(), "a");
        assert_eq!(cb.get_arg(5, Lookup::or("fallback")).unwrap(), "fallback");
        assert_eq!(cb.build_command().unwrap(), "cmd a");
    }

    #[test]
    fn test_get_arg_missing_reports_custom_error() {
        let mut cb = builder(&[]);
        let err = cb
            .get_arg(0, Lookup::required().error("Please provide a commit message"))
            .unwrap_err();
        assert!(matches!(err, AliasError::ArgumentMissing { index: 0, .. }));
        assert_eq!(err.to_string(), "Please provide a commit message");
    }

    #[test]
    fn test_update_arg() {
        let mut cb = builder(&["feature"]);
        cb.base("git checkout")
            .update_arg(0, |v| format!("ns/{v}"))
            .unwrap();
        assert_eq!(cb.build_command().unwrap(), "git checkout ns/feature");

        assert!(matches!(
            cb.update_arg(3, |v| v.to_owned()),
            Err(AliasError::ArgumentMissing { index: 3, .. })
        ));
    }

    #[test]
    fn test_append_arg() {
        let mut cb = builder(&[]);
        cb.base("echo")
            .append_arg("hello world")
            .append_arg(None)
            .append_arg(" x ");
        assert_eq!(cb.build_command().unwrap(), "echo \"hello world\" x");
    }

    #[test]
    fn test_get_flag() {
        let cb = builder(&["-b", "main", "-v"]);
        assert_eq!(cb.get_flag("b", Lookup::required()).unwrap().as_deref(), Some("main"));
        assert_eq!(cb.get_flag("v", Lookup::required()).unwrap(), None);
        assert_eq!(
            cb.get_flag("x", Lookup::or("d")).unwrap().as_deref(),
            Some("d")
        );
        let err = cb.get_flag("x", Lookup::required()).unwrap_err();
        assert!(matches!(err, AliasError::FlagMissing { .. }));
        assert_eq!(err.to_string(), "Flag 'x' not set");
    }

    #[test]
    fn test_set_flag_without_overwrite_is_noop() {
        let mut cb = builder(&[]);
        cb.base("git commit").set_flag("m", "bye");
        cb.set_flag_with("m", "hi", FlagOptions::new().keep_existing())
            .unwrap();
        assert_eq!(cb.get_flag("m", Lookup::required()).unwrap().as_deref(), Some("bye"));
        assert_eq!(cb.build_command().unwrap(), "git commit -m bye");
    }

    #[test]
    fn test_set_flag_dash_rules() {
        let mut cb = builder(&[]);
        cb.base("x")
            .set_flag("a", None)
            .set_flag("long", None)
            .set_flag_with("message", "hi", FlagOptions::new().dashes(1))
            .unwrap()
            .set_flag_with("b", None, FlagOptions::new().dashes(2))
            .unwrap();
        assert_eq!(cb.build_command().unwrap(), "x -a --long -message hi --b");

        assert!(matches!(
            cb.set_flag_with("c", None, FlagOptions::new().dashes(3)),
            Err(AliasError::InvalidDashSpec(3))
        ));
        assert!(cb.is_not_set("c"));
    }

    #[test]
    fn test_replaced_flag_keeps_position() {
        let mut cb = builder(&["-D", "topic", "--force"]);
        cb.base("git branch").set_flag("D", "ns/topic");
        assert_eq!(cb.build_command().unwrap(), "git branch -D ns/topic --force");
    }

    #[test]
    fn test_update_flag() {
        let mut cb = builder(&["-b", "topic", "-v"]);
        cb.base("git checkout")
            .update_flag("b", |v| format!("pablo/{v}"))
            .unwrap();
        assert_eq!(cb.build_command().unwrap(), "git checkout -b pablo/topic -v");
        assert!(matches!(
            cb.update_flag("missing", |v| v.to_owned()),
            Err(AliasError::FlagMissing { .. })
        ));
    }

    #[test]
    fn test_set_flag_from_arg_consumes() {
        let mut cb = builder(&["fix bug", "extra"]);
        cb.base("git commit")
            .set_flag_from_arg("m", 0, Lookup::required())
            .unwrap();
        assert_eq!(cb.build_command().unwrap(), "git commit extra -m \"fix bug\"");
    }

    #[test]
    fn test_remove_flag_is_lenient() {
        let mut cb = builder(&["-a", "--bb", "-c"]);
        cb.base("x").remove_flag("bb").remove_flag("nope");
        assert_eq!(cb.build_command().unwrap(), "x -a -c");
    }

    #[test]
    fn test_predicates() {
        let cb = builder(&["pos", "-v", "-b", "main"]);
        assert!(cb.is_set("v", ValueRequirement::Any));
        assert!(cb.is_set("v", ValueRequirement::RequireNoValue));
        assert!(!cb.is_set("v", ValueRequirement::RequireValue));
        assert!(cb.is_set("b", ValueRequirement::RequireValue));
        assert!(!cb.is_set("b", ValueRequirement::RequireNoValue));
        assert!(cb.is_not_set("x"));
        assert!(cb.has_arg(0));
        assert!(cb.not_has_arg(1));
    }

    #[test]
    fn test_if_set_on_missing_flag_is_inert() {
        let mut cb = builder(&["a"]);
        cb.base("cmd");
        let before = cb.build_command().unwrap();

        let branch = cb.if_set("x", ValueRequirement::Any);
        assert!(!branch.is_active());
        branch
            .set_flag("y", "1")
            .append_arg("b")
            .remove_flag("a")
            .base("other");

        assert_eq!(cb.build_command().unwrap(), before);
    }

    #[test]
    fn test_if_has_arg_branches() {
        let mut cb = builder(&[]);
        cb.base("git checkout");
        cb.if_has_arg(0)
            .update_arg(0, |v| format!("pablo/{v}"))
            .unwrap();
        cb.if_not_has_arg(0).append_arg("master");
        assert_eq!(cb.build_command().unwrap(), "git checkout master");
    }

    #[test]
    fn test_env_bridge() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("env");
        let store = Store::open(&path).shared();

        let mut cb = CommandBuilder::from_args(&["-p", "pablo", "--quiet"], store.clone());
        cb.save_to_env("p", "prefix").unwrap();
        cb.save_to_env("quiet", "quiet").unwrap();
        assert_eq!(cb.get_from_env("prefix", None).as_deref(), Some("pablo"));
        assert_eq!(cb.get_from_env("quiet", None).as_deref(), Some(""));
        assert_eq!(cb.get_from_env("other", Some("d")).as_deref(), Some("d"));
        assert_eq!(cb.get_from_env("other", None), None);

        let err = cb.save_to_env("missing", "x").unwrap_err();
        assert!(matches!(err, AliasError::FlagMissing { .. }));

        cb.clear_from_env("quiet");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "prefix=pablo\n");
    }

    #[test]
    fn test_chained_command() {
        let mut cb = builder(&["--alert"]);
        cb.base("make build");
        assert!(cb.is_set("alert", ValueRequirement::Any));
        cb.remove_flag("alert");
        cb.append_command("terminal-notifier", Connector::Then)
            .unwrap()
            .set_flag_with("message", "Build Complete", FlagOptions::new().dashes(1))
            .unwrap();
        assert_eq!(
            cb.build_command().unwrap(),
            "make build ; terminal-notifier -message \"Build Complete\""
        );
    }

    #[test]
    fn test_chain_shares_store_and_nests() {
        let mut cb = builder(&[]);
        cb.base("a");
        cb.store().borrow_mut().save("k", "v");
        let next = cb.append_command("b", Connector::And).unwrap();
        assert_eq!(next.get_from_env("k", None).as_deref(), Some("v"));
        next.append_command("c", Connector::Or).unwrap();
        cb.append_command("d", Connector::Pipe).unwrap();
        assert_eq!(cb.build_command().unwrap(), "a && b || c | d");
    }

    #[test]
    fn test_append_command_rejects_blank_base() {
        let mut cb = builder(&[]);
        assert!(matches!(
            cb.append_command("  ", Connector::And),
            Err(AliasError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_dry_run_flag_is_not_emitted_and_forces_dry_run() {
        let mut cb = builder(&["feature", "--alias-dry-run"]);
        cb.base("git checkout");
        assert!(cb.dry_run_requested());
        assert_eq!(cb.build_command().unwrap(), "git checkout feature");

        let mut out = Vec::new();
        let code = cb.execute_to(false, &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap(), "git checkout feature\n");
    }

    #[test]
    fn test_execute_dry_run_without_base_fails() {
        let cb = builder(&[]);
        let mut out = Vec::new();
        assert!(matches!(
            cb.execute_to(true, &mut out),
            Err(AliasError::BaseCommandUnset)
        ));
        assert!(out.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_runs_in_host_shell() {
        let mut cb = builder(&["4"]);
        cb.base("exit");
        let mut out = Vec::new();
        assert_eq!(cb.execute_to(false, &mut out).unwrap(), 4);
        assert!(out.is_empty());
    }

    #[test]
    fn test_parsed_values_with_spaces_are_quoted() {
        let mut cb = builder(&["-m", "fix bug"]);
        cb.base("git commit");
        assert_eq!(cb.build_command().unwrap(), "git commit -m \"fix bug\"");
    }

    #[test]
    fn test_parsed_values_stay_raw_for_transforms() {
        let mut cb = builder(&["fix bug", "-m", "fix bug"]);
        assert_eq!(cb.get_arg(0, Lookup::required()).unwrap(), "fix bug");
        assert_eq!(
            cb.get_flag("m", Lookup::required()).unwrap().as_deref(),
            Some("fix bug")
        );

        let mut cb = builder(&["my branch"]);
        cb.base("git checkout");
        cb.update_arg(0, |v| format!("ns/{v}")).unwrap();
        assert_eq!(cb.build_command().unwrap(), "git checkout \"ns/my branch\"");
    }
}
