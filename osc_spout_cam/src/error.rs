//! Error types for the OSC camera
//!
//! `DecodeError` describes why a datagram could not be read; `Error` is the
//! crate-wide error used by the listener, the GPU device, the registry and
//! the configuration loader.

use thiserror::Error;

/// Result type for OSC camera operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an OSC packet cannot be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer ended before the element being read
    #[error("truncated packet: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// Packet or bundle element size is not a multiple of 4
    #[error("misaligned size {0} (must be a multiple of 4)")]
    Misaligned(usize),

    /// An OSC string has no NUL terminator inside the buffer
    #[error("unterminated string at offset {0}")]
    UnterminatedString(usize),

    /// A string argument or type tag string is not valid UTF-8
    #[error("invalid UTF-8 string at offset {0}")]
    InvalidUtf8(usize),

    /// Address does not start with '/'
    #[error("invalid address {0:?}")]
    InvalidAddress(String),

    /// Bundle header is not `#bundle`
    #[error("invalid bundle header")]
    InvalidBundle,

    /// Bundle element size is negative or exceeds the bundle
    #[error("invalid bundle element size {0}")]
    InvalidElementSize(i32),

    /// Bundles nested deeper than the decoder allows
    #[error("bundle nesting deeper than {0} levels")]
    TooDeep(usize),

    /// Type tag character not defined by OSC 1.0
    #[error("unknown type tag {0:?}")]
    UnknownTypeTag(char),

    /// An argument was read with the wrong type
    #[error("expected type tag {expected:?}, found {found:?}")]
    TypeMismatch { expected: char, found: char },

    /// Fewer or more arguments than the message requires
    #[error("{address} expects {expected} arguments, got {found}")]
    ArgumentCount {
        address: String,
        expected: usize,
        found: usize,
    },
}

/// OSC camera errors
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// Malformed datagram
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Socket error
    #[error("I/O error: {0}")]
    Io(String),

    /// GPU backend error (texture creation, copy, flush)
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Invalid resource (missing native handle, unsupported format)
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// Initialization failed (listener, render thread)
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Publish registry rejected an operation
    #[error("Registry error: {0}")]
    Registry(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
