//! Shared, reloadable configuration with typed lookups.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::{Element, Error, Result, parser, path};

/// A loaded configuration that many threads can query while it is
/// occasionally reloaded.
///
/// Reloading holds the write lock for the whole parse and swaps the new
/// tree in only when parsing succeeds, so readers see either the previous
/// tree or the new one in full. Every query copies its result out before
/// releasing the read lock.
///
/// # Example
///
/// ```rust
/// use tagconf::Conf;
///
/// let conf: Conf = "<db><host1>ip=10.0.0.1\nport=3306</host1></db>".parse().unwrap();
///
/// assert_eq!(conf.get_domain("/db"), vec!["host1"]);
/// for host in conf.get_domain("/db") {
///     assert_eq!(conf.get_string(&format!("/db/{}<ip>", host)), "10.0.0.1");
///     assert_eq!(conf.get_int(&format!("/db/{}<port>", host)), 3306);
/// }
/// assert_eq!(conf.get_int_with_def("/db/host1/timeout", 30), 30);
/// ```
#[derive(Debug, Default)]
pub struct Conf {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    root: Element,

    /// The buffer `root` was built from.
    content: Vec<u8>,
}

impl Conf {
    /// Create a configuration with an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let conf = Self::new();
        conf.init_from_file(path)?;
        Ok(conf)
    }

    /// Load a configuration from raw bytes.
    pub fn from_bytes(content: &[u8]) -> Result<Self> {
        let conf = Self::new();
        conf.init_from_bytes(content)?;
        Ok(conf)
    }

    /// Replace the tree with the contents of a file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or a format error
    /// if it does not parse. The previous tree is kept on failure.
    pub fn init_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loading config file");
        self.init_from_bytes(&content)
    }

    /// Replace the tree with the parsed `content`.
    pub fn init_from_str(&self, content: &str) -> Result<()> {
        self.init_from_bytes(content.as_bytes())
    }

    /// Replace the tree with the parsed `content`.
    ///
    /// # Errors
    ///
    /// Returns a format error if `content` does not parse. The previous
    /// tree is kept on failure.
    pub fn init_from_bytes(&self, content: &[u8]) -> Result<()> {
        let mut state = self.write();

        match parser::parse_bytes(content) {
            Ok(root) => {
                state.root = root;
                state.content = content.to_vec();
                debug!(bytes = content.len(), "config loaded");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "config not loaded, keeping previous tree");
                Err(err)
            }
        }
    }

    /// The buffer the current tree was built from.
    pub fn content(&self) -> Vec<u8> {
        self.read().content.clone()
    }

    /// The value at `path`, or the lookup error if it does not exist.
    pub fn value(&self, path: &str) -> Result<String> {
        path::get_value(&self.read().root, path)
    }

    /// The sections directly under `path`, or the lookup error if it does
    /// not exist.
    pub fn domain(&self, path: &str) -> Result<Vec<String>> {
        path::get_domain(&self.read().root, path)
    }

    /// The value at `path`, or `default` if it does not exist.
    pub fn get_string_with_def(&self, path: &str, default: &str) -> String {
        self.value(path).unwrap_or_else(|_| default.to_string())
    }

    /// The value at `path`, or an empty string if it does not exist.
    pub fn get_string(&self, path: &str) -> String {
        self.get_string_with_def(path, "")
    }

    /// The value at `path` as an integer, or `default` if it does not exist
    /// or is not a decimal integer.
    pub fn get_int_with_def(&self, path: &str, default: i64) -> i64 {
        self.parsed(path).unwrap_or(default)
    }

    pub fn get_int(&self, path: &str) -> i64 {
        self.get_int_with_def(path, 0)
    }

    /// Like [`Conf::get_int_with_def`], also falling back to `default` when
    /// the value does not fit in an `i32`.
    pub fn get_int32_with_def(&self, path: &str, default: i32) -> i32 {
        self.parsed(path).unwrap_or(default)
    }

    pub fn get_int32(&self, path: &str) -> i32 {
        self.get_int32_with_def(path, 0)
    }

    /// The value at `path` as a boolean, or `default` if it does not exist
    /// or is not one of `1 t T TRUE true True 0 f F FALSE false False`.
    pub fn get_bool_with_def(&self, path: &str, default: bool) -> bool {
        self.value(path)
            .ok()
            .and_then(|value| parse_bool(&value))
            .unwrap_or(default)
    }

    pub fn get_bool(&self, path: &str) -> bool {
        self.get_bool_with_def(path, false)
    }

    /// Names of the sections directly under `path`, in document order.
    ///
    /// A missing path yields an empty list; use [`Conf::domain`] to tell the
    /// two apart.
    pub fn get_domain(&self, path: &str) -> Vec<String> {
        self.domain(path).unwrap_or_default()
    }

    /// The values directly under `path`, keyed by name. A missing path
    /// yields an empty map.
    pub fn get_map(&self, path: &str) -> IndexMap<String, String> {
        path::get_map(&self.read().root, path)
    }

    fn parsed<T: FromStr>(&self, path: &str) -> Option<T> {
        self.value(path).ok().and_then(|value| value.parse().ok())
    }

    // State is only replaced wholesale; a poisoned lock still guards a complete tree.
    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FromStr for Conf {
    type Err = Error;

    fn from_str(content: &str) -> Result<Self> {
        Self::from_bytes(content.as_bytes())
    }
}

/// Dumps the whole tree, see [`Element`]'s `Display`.
impl fmt::Display for Conf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.read().root)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
