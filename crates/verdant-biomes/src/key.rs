//! Namespaced biome identifiers (`namespace:path`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace assumed when a key string has no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Stable identifier of a biome. Equality and hashing of biome nodes go
/// through this key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BiomeKey {
    namespace: String,
    path: String,
}

/// Errors produced when building or parsing a [`BiomeKey`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BiomeKeyError {
    #[error("biome key is empty")]
    Empty,
    #[error("invalid biome namespace: {0:?}")]
    InvalidNamespace(String),
    #[error("invalid biome path: {0:?}")]
    InvalidPath(String),
}

impl BiomeKey {
    /// Creates a key, validating both parts.
    ///
    /// Namespaces allow `[a-z0-9_.-]`; paths additionally allow `/`.
    pub fn new(
        namespace: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, BiomeKeyError> {
        let namespace = namespace.into();
        let path = path.into();
        if namespace.is_empty() || !namespace.chars().all(is_namespace_char) {
            return Err(BiomeKeyError::InvalidNamespace(namespace));
        }
        if path.is_empty() || !path.chars().all(is_path_char) {
            return Err(BiomeKeyError::InvalidPath(path));
        }
        Ok(Self { namespace, path })
    }

    /// Namespace part, before the `:`.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path part, after the `:`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Group name used for this biome in the config store: `"{namespace}.{path}"`.
    pub fn config_group(&self) -> String {
        format!("{}.{}", self.namespace, self.path)
    }
}

fn is_namespace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl fmt::Display for BiomeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for BiomeKey {
    type Err = BiomeKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(BiomeKeyError::Empty);
        }
        match s.split_once(':') {
            Some((namespace, path)) => Self::new(namespace, path),
            None => Self::new(DEFAULT_NAMESPACE, s),
        }
    }
}
