use crate::error::{AliasError, Result};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Store handle shared between a builder and the builders chained to it.
pub type SharedStore = Rc<RefCell<Store>>;

/// Small persistent key-value store shared by aliases across invocations.
///
/// The store is backed by one text file holding `key=value` per line. The
/// whole file is loaded on [`Store::open`] and rewritten on every mutation.
/// Memory is authoritative: when a write fails the in-memory map keeps the
/// new value and the file is left stale. Such failures are logged, never
/// returned.
///
/// There is no locking. Two invocations racing on the same file may lose
/// writes.
#[derive(Debug, Clone, Default)]
pub struct Store {
    path: Option<PathBuf>,
    vars: IndexMap<String, String>,
}

impl Store {
    /// Open (or create) the store file at `path`.
    ///
    /// A leading `~` is expanded to the home directory and missing parent
    /// directories are created. Lines without `=` or that are not UTF-8 are
    /// skipped. A file that exists but can't be read is never overwritten:
    /// the store then lives in memory only.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = expand_home(path.as_ref());
        let mut store = Self {
            path: Some(path.clone()),
            vars: IndexMap::new(),
        };

        match fs::read(&path) {
            Ok(contents) => {
                store.vars = parse_lines(&contents);
                log::debug!("loaded {} entries from {}", store.vars.len(), path.display());
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("store file {} not found, creating a new one", path.display());
                if let Err(e) = store.write_file() {
                    log::warn!("{e}");
                }
            }
            Err(source) => {
                log::warn!("{}; changes stay in memory", AliasError::StoreIo { path, source });
                store.path = None;
            }
        }

        store
    }

    /// A store with no backing file. Mutations only touch memory.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Wrap the store into a handle builders can share.
    pub fn shared(self) -> SharedStore {
        Rc::new(RefCell::new(self))
    }

    /// File backing this store, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the value of a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Set or override a variable, then rewrite the file.
    pub fn save(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
        self.persist();
    }

    /// Remove a variable. Absent keys leave the file untouched.
    pub fn clear(&mut self, name: &str) {
        if self.vars.shift_remove(name).is_some() {
            self.persist();
        }
    }

    /// Iterate over all entries in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn persist(&self) {
        if let Err(e) = self.write_file() {
            log::warn!("{e}; keeping in-memory value");
        }
    }

    fn write_file(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| AliasError::StoreIo {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let contents: String = self
            .vars
            .iter()
            .map(|(k, v)| format!("{k}={v}\n"))
            .collect();
        fs::write(path, contents).map_err(io_err)
    }
}

fn parse_lines(contents: &[u8]) -> IndexMap<String, String> {
    contents
        .split(|b| *b == b'\n')
        .filter_map(|line| match std::str::from_utf8(line) {
            Ok(line) => Some(line),
            Err(e) => {
                log::warn!("skipping store line that is not UTF-8: {e}");
                None
            }
        })
        .filter_map(|line| line.trim().split_once('='))
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

/// Expand a leading `~` into the user's home directory.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}
