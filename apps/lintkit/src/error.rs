//! Error types shared by the registry, resolver, and loaders.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while registering, loading, or resolving presets.
///
/// Every failure is reported synchronously at load/resolve time; nothing is
/// retried and no partially-merged configuration is ever returned.
#[derive(Debug, Error)]
pub enum Error {
    /// A preset with the same name is already registered.
    #[error("preset '{name}' is already registered")]
    DuplicateName { name: String },

    /// Lookup of a preset that was never registered.
    #[error("preset '{name}' is not registered")]
    NotFound { name: String },

    /// Malformed glob, cyclic `extends`, or an unparseable rule directive.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Failed to read a preset or config file.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A preset or config file could not be decoded.
    #[error("failed to parse '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

impl Error {
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName { name: name.into() }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// True for errors caused by the configuration data itself.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_preset() {
        assert_eq!(
            Error::duplicate_name("flat").to_string(),
            "preset 'flat' is already registered"
        );
        assert_eq!(
            Error::not_found("legacy").to_string(),
            "preset 'legacy' is not registered"
        );
        let e = Error::configuration("cyclic extends: a -> a");
        assert!(e.is_configuration());
        assert_eq!(e.to_string(), "configuration error: cyclic extends: a -> a");
    }
}
