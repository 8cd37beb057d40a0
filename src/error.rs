//! Error types shared by the service and its collaborators.

use std::path::PathBuf;

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Logical classification callers can match on without inspecting messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AlreadyConfigured,
    NotConfigured,
    MissingArgument,
    RemoteError,
    IoError,
}

/// Shipper errors. Validation messages are user-facing and fixed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Non empty config already present")]
    AlreadyConfigured,

    #[error("{0}")]
    NotConfigured(&'static str),

    #[error("{0}")]
    MissingArgument(&'static str),

    #[error("{step}: {message}")]
    Remote { step: &'static str, message: String },

    #[error("could not {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl Error {
    /// Wrap a remote collaborator failure, keeping its whole cause chain.
    pub fn remote(step: &'static str, err: anyhow::Error) -> Self {
        Error::Remote {
            step,
            message: format!("{:#}", err),
        }
    }

    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AlreadyConfigured => ErrorKind::AlreadyConfigured,
            Error::NotConfigured(_) => ErrorKind::NotConfigured,
            Error::MissingArgument(_) => ErrorKind::MissingArgument,
            Error::Remote { .. } => ErrorKind::RemoteError,
            Error::Io { .. } | Error::InvalidConfig { .. } | Error::Serialize(_) => {
                ErrorKind::IoError
            }
        }
    }
}
