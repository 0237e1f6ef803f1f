use crate::store::expand_home;
use std::env as stdenv;
use std::path::{Path, PathBuf};

/// Environment variable overriding the default home directory.
pub const HOME_VAR: &str = "ALIASPP_HOME";

/// Where aliaspp keeps its files.
///
/// The home directory is chosen in this order:
/// - an explicit directory (the `--home` option of the binary),
/// - the `ALIASPP_HOME` environment variable,
/// - `~/.aliaspp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the store, the literal alias file and the install target.
    pub home: PathBuf,
}

impl Config {
    /// Resolve the home directory from an explicit choice or the process environment.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let home = match explicit {
            Some(dir) => expand_home(dir),
            None => match stdenv::var_os(HOME_VAR).filter(|v| !v.is_empty()) {
                Some(dir) => expand_home(Path::new(&dir)),
                None => default_home(),
            },
        };
        Self { home }
    }

    /// Key-value store shared by all aliases.
    pub fn store_path(&self) -> PathBuf {
        self.home.join("env")
    }

    /// `name=command` lines registered as literal aliases.
    pub fn literals_path(&self) -> PathBuf {
        self.home.join("aliases")
    }

    /// Shell script of `alias` lines written by install.
    pub fn install_path(&self) -> PathBuf {
        self.home.join(".aliases")
    }
}

fn default_home() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".aliaspp"),
        None => PathBuf::from(".aliaspp"),
    }
}
