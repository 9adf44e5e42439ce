//! Error types for VastuMesh

use std::fmt;
use std::path::PathBuf;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// VastuMesh error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File missing, unreadable, or unwritable
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Raster bytes are not a decodable image
    #[error("Failed to decode image {}: {source}", path.display())]
    Decode {
        /// Image file that failed to decode
        path: PathBuf,
        /// Underlying decoder error
        #[source]
        source: image::ImageError,
    },

    /// Metadata or parameters out of range, or malformed input files
    #[error("Validation error: {0}")]
    Validation(String),

    /// Grid has no occupied cells, so there is nothing to export
    #[error("Mesh for map '{name}' has no faces")]
    EmptyMesh {
        /// Map name
        name: String,
    },

    /// Tool configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Coarse category of this error, used for batch reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Validation(_) => ErrorKind::Validation,
            Error::EmptyMesh { .. } => ErrorKind::EmptyMesh,
            Error::Config(_) => ErrorKind::Config,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

/// Error category without payload
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`Error::Io`]
    Io,
    /// See [`Error::Decode`]
    Decode,
    /// See [`Error::Validation`]
    Validation,
    /// See [`Error::EmptyMesh`]
    EmptyMesh,
    /// See [`Error::Config`]
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Io => "IOError",
            ErrorKind::Decode => "DecodeError",
            ErrorKind::Validation => "ValidationError",
            ErrorKind::EmptyMesh => "EmptyMeshError",
            ErrorKind::Config => "ConfigError",
        };
        f.write_str(name)
    }
}
