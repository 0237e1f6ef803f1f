use crate::builder::CommandBuilder;
use crate::command::{ExitCode, Literal, Transform};
use crate::error::{AliasError, Result};
use crate::store::{SharedStore, Store};
use indexmap::IndexMap;
use regex::Regex;
use std::fmt::Write as _;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::rc::Rc;
use std::sync::LazyLock;

static ALIAS_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_.-]*$").expect("static regex must compile")
});

/// Table of aliases known to one process, in registration order.
///
/// The registry is built once by the entry point and handed to dispatch.
/// Several names may share one transform.
///
/// Example
/// ```
/// use aliaspp::{CommandBuilder, Registry, Store};
/// let mut aliases = Registry::new();
/// aliases
///     .register("gc", |cb: &mut CommandBuilder| -> aliaspp::Result<()> {
///         cb.base("git checkout");
///         Ok(())
///     })
///     .unwrap();
/// let mut out = Vec::new();
/// let code = aliases
///     .dispatch_to("gc", &["main"], Store::in_memory().shared(), true, &mut out)
///     .unwrap();
/// assert_eq!(code, 0);
/// assert_eq!(out, b"git checkout main\n");
/// ```
#[derive(Default)]
pub struct Registry {
    aliases: IndexMap<String, Rc<dyn Transform>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `transform` under `name`.
    ///
    /// Fails if the name is taken or isn't a plain shell word.
    pub fn register(&mut self, name: &str, transform: impl Transform + 'static) -> Result<&mut Self> {
        self.insert(name, Rc::new(transform))
    }

    /// Register one transform under several names.
    pub fn register_many(
        &mut self,
        names: &[&str],
        transform: impl Transform + 'static,
    ) -> Result<&mut Self> {
        let shared: Rc<dyn Transform> = Rc::new(transform);
        for name in names {
            self.insert(name, shared.clone())?;
        }
        Ok(self)
    }

    /// Register several aliases that differ only in their base command.
    ///
    /// Each name first gets its base, then `transform` runs on top.
    pub fn register_bases<I, N, C>(
        &mut self,
        pairs: I,
        transform: impl Transform + 'static,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: Into<String>,
    {
        let then: Rc<dyn Transform> = Rc::new(transform);
        for (name, command) in pairs {
            let based = Based {
                base: Literal::new(command),
                then: then.clone(),
            };
            self.insert(name.as_ref(), Rc::new(based))?;
        }
        Ok(self)
    }

    /// Register aliases that only set a base command.
    pub fn register_literals<I, N, C>(&mut self, pairs: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (N, C)>,
        N: AsRef<str>,
        C: Into<String>,
    {
        for (name, command) in pairs {
            self.insert(name.as_ref(), Rc::new(Literal::new(command)))?;
        }
        Ok(self)
    }

    /// Register every `name=command` line of the file at `path` as a literal alias.
    /// Lines starting with `#` are comments.
    ///
    /// Returns how many aliases were added.
    pub fn load_literals(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let file = Store::open(path);
        let pairs: Vec<(String, String)> = file
            .entries()
            .filter(|(name, _)| !name.trim_start().starts_with('#'))
            .map(|(name, command)| (name.trim().to_owned(), command.trim().to_owned()))
            .collect();
        let count = pairs.len();
        self.register_literals(pairs)?;
        log::debug!("loaded {count} literal aliases");
        Ok(count)
    }

    fn insert(&mut self, name: &str, transform: Rc<dyn Transform>) -> Result<&mut Self> {
        let name = name.trim();
        if !ALIAS_NAME.is_match(name) {
            return Err(AliasError::InvalidAliasName(name.to_owned()));
        }
        if self.aliases.contains_key(name) {
            return Err(AliasError::DuplicateAlias(name.to_owned()));
        }
        self.aliases.insert(name.to_owned(), transform);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Alias names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Build the command `name` expands to for `args`, without running it.
    pub fn prepare<S: AsRef<str>>(
        &self,
        name: &str,
        args: &[S],
        store: SharedStore,
    ) -> Result<CommandBuilder> {
        let transform = self
            .aliases
            .get(name)
            .ok_or_else(|| AliasError::AliasNotFound(name.to_owned()))?;
        let mut cb = CommandBuilder::from_args(args, store);
        transform.apply(&mut cb)?;
        Ok(cb)
    }

    /// Expand alias `name` with `args` and run the result.
    ///
    /// Returns the exit code of the composed command, or 0 for a dry run.
    pub fn dispatch<S: AsRef<str>>(
        &self,
        name: &str,
        args: &[S],
        store: SharedStore,
        dry_run: bool,
    ) -> Result<ExitCode> {
        let cb = self.prepare(name, args, store)?;
        cb.execute(dry_run)
    }

    /// Like [`Registry::dispatch`], writing a dry run to `out`.
    pub fn dispatch_to<S: AsRef<str>>(
        &self,
        name: &str,
        args: &[S],
        store: SharedStore,
        dry_run: bool,
        out: &mut dyn Write,
    ) -> Result<ExitCode> {
        let cb = self.prepare(name, args, store)?;
        cb.execute_to(dry_run, out)
    }

    /// Shell `alias` lines forwarding every registered name to `program`.
    pub fn shell_aliases(&self, program: &str) -> String {
        let mut script = String::new();
        for name in self.names() {
            // Writing into a String can't fail.
            let _ = writeln!(script, "alias {name}=\"{program} {name}\"");
        }
        script
    }

    /// Write [`Registry::shell_aliases`] to `target`, replacing its contents.
    pub fn install(&self, program: &str, target: impl AsRef<Path>) -> Result<()> {
        let target = target.as_ref();
        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(target, self.shell_aliases(program))?;
        log::info!("installed {} aliases into {}", self.len(), target.display());
        Ok(())
    }
}

/// A literal base followed by a transform shared with other aliases.
struct Based {
    base: Literal,
    then: Rc<dyn Transform>,
}

impl Transform for Based {
    fn apply(&self, cb: &mut CommandBuilder) -> Result<()> {
        self.base.apply(cb)?;
        self.then.apply(cb)
    }
}
