use crate::decode::{Cursor, EnvDecode};
use crate::error::{LoadError, format_load_error};
use crate::keys::{self, ENV_ASSIGNER, EnvPair};
use std::env;
use tracing::{debug, trace};

/// Loads configuration for one prefix
///
/// # Example
/// ```rust
/// use std::collections::HashMap;
/// use envtree::Loader;
///
/// let mut limits: HashMap<String, u32> = HashMap::new();
/// Loader::new("limits")
///     .load_entries(["LIMITS_UPLOAD=10", "LIMITS_DOWNLOAD=20"], &mut limits)
///     .unwrap();
///
/// assert_eq!(limits["upload"], 10);
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    prefix: String,
    dotenv: bool,
}

impl Loader {
    /// Create a loader for variables named `PREFIX_...`, case-insensitively
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            dotenv: false,
        }
    }

    /// Read a `.env` file into the process environment before loading
    ///
    /// Variables already set in the environment take precedence.
    pub fn with_dotenv(mut self, dotenv: bool) -> Self {
        self.dotenv = dotenv;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Load from the process environment
    pub fn load<T: EnvDecode>(&self, target: &mut T) -> Result<(), LoadError> {
        if self.dotenv {
            match dotenvy::dotenv() {
                Ok(path) => debug!(path = %path.display(), "loaded .env file"),
                Err(e) => trace!(error = %e, "no .env file loaded"),
            }
        }

        let pairs = env::vars_os().filter_map(|(name, value)| {
            match (name.into_string(), value.into_string()) {
                (Ok(name), Ok(value)) => Some((name, value)),
                (name, _) => {
                    trace!(name = ?name, "skipping environment variable that is not valid unicode");
                    None
                }
            }
        });
        self.load_pairs(pairs, target)
    }

    /// Load from raw `NAME=VALUE` entries
    pub fn load_entries<T, I, S>(&self, entries: I, target: &mut T) -> Result<(), LoadError>
    where
        T: EnvDecode,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validate_prefix()?;
        self.apply(keys::select_entries(&self.prefix, entries), target)
    }

    /// Load from `(name, value)` pairs
    pub fn load_pairs<T, I, K, V>(&self, pairs: I, target: &mut T) -> Result<(), LoadError>
    where
        T: EnvDecode,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.validate_prefix()?;
        self.apply(keys::select_pairs(&self.prefix, pairs), target)
    }

    fn validate_prefix(&self) -> Result<(), LoadError> {
        if self.prefix.is_empty() || self.prefix.contains(ENV_ASSIGNER) {
            return Err(LoadError::InvalidPrefix {
                prefix: self.prefix.clone(),
            });
        }
        Ok(())
    }

    fn apply<T: EnvDecode>(&self, pairs: Vec<EnvPair>, target: &mut T) -> Result<(), LoadError> {
        debug!(
            prefix = %self.prefix,
            selected = pairs.len(),
            "loading configuration from environment"
        );
        for pair in &pairs {
            if !target.decode(Cursor::from_pair(pair))? {
                trace!(key = %pair.name, "variable matched no declared field");
            }
        }
        Ok(())
    }
}

/// Load variables named `PREFIX_...` from the process environment into `target`
pub fn load<T: EnvDecode>(prefix: &str, target: &mut T) -> Result<(), LoadError> {
    Loader::new(prefix).load(target)
}

/// Load raw `NAME=VALUE` entries selected by `prefix` into `target`
pub fn load_entries<T, I, S>(prefix: &str, entries: I, target: &mut T) -> Result<(), LoadError>
where
    T: EnvDecode,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Loader::new(prefix).load_entries(entries, target)
}

/// Load `(name, value)` pairs selected by `prefix` into `target`
pub fn load_pairs<T, I, K, V>(prefix: &str, pairs: I, target: &mut T) -> Result<(), LoadError>
where
    T: EnvDecode,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Loader::new(prefix).load_pairs(pairs, target)
}

/// Reads a single environment variable, falling back to `default` when it
/// is unset or empty
pub fn get_env(key: &str, default: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

/// Trait for loading a whole configuration value from the environment
///
/// Implemented for every [`EnvDecode`] type with a [`Default`]. A `.env`
/// file in the working directory is read first when present.
pub trait Load: EnvDecode + Default {
    /// Load configuration from environment, panicking on errors
    fn load(prefix: &str) -> Self {
        match Self::load_or_error(prefix) {
            Ok(value) => value,
            Err(e) => panic!("{}", format_load_error(&e)),
        }
    }

    /// Load configuration from environment, returning errors instead of panicking
    fn load_or_error(prefix: &str) -> Result<Self, LoadError> {
        let mut value = Self::default();
        Loader::new(prefix).with_dotenv(true).load(&mut value)?;
        Ok(value)
    }
}

impl<T: EnvDecode + Default> Load for T {}
