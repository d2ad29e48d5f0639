use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the content store root.
pub const CAS_ROOT_VAR: &str = "CONCH_CAS_ROOT";
/// Environment variable naming the chat model.
pub const MODEL_VAR: &str = "CONCH_MODEL";

pub const DEFAULT_MODEL: &str = "claude-sonnet";

/// Session configuration resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub cas_root: PathBuf,
    pub model: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var_os(name))
    }

    /// Resolve configuration using `lookup` to read variables.
    ///
    /// The store root is `$CONCH_CAS_ROOT`, then `$HOME/.conch/cas`, then
    /// `.conch/cas` under the working directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());

        let cas_root = non_empty(CAS_ROOT_VAR)
            .map(PathBuf::from)
            .or_else(|| non_empty("HOME").map(|home| PathBuf::from(home).join(".conch").join("cas")))
            .unwrap_or_else(|| PathBuf::from(".conch").join("cas"));
        let model = non_empty(MODEL_VAR)
            .map(|v| v.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Self { cas_root, model }
    }

    pub fn with_cas_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.cas_root = root.into();
        self
    }
}
