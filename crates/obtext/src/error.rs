//! Error types for the obtext crate
//!
//! Errors fall into two groups. `Config` and `Format` signal programmer
//! error and are raised at construction or parse time. `Decode`,
//! `AuthFailure` and `AutodecFailure` signal bad input, a wrong key or a
//! rotated-out key and are recoverable by the caller.
//!
//! No variant ever carries key material, plaintext or ciphertext bytes.

use thiserror::Error;

/// Result type alias using the crate [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building ciphers or transforming obtext
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Key does not fit the scheme, or a keyless call named a keyed scheme
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed format tag, unknown scheme or unknown encoding name
    #[error("invalid format: {0}")]
    Format(String),

    /// Malformed text encoding, envelope or scheme mismatch
    #[error("decode failed: {0}")]
    Decode(String),

    /// The cipher primitive rejected the ciphertext
    #[error("authentication failed")]
    AuthFailure,

    /// No autodec candidate produced a plaintext
    #[error("no candidate matched")]
    AutodecFailure,

    /// The cipher primitive failed for a reason other than authentication
    #[error("cipher primitive failure: {0}")]
    Primitive(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Config,
    Format,
    Decode,
    AuthFailure,
    AutodecFailure,
    Primitive,
}

impl Error {
    /// Get the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Config,
            Self::Format(_) => ErrorKind::Format,
            Self::Decode(_) => ErrorKind::Decode,
            Self::AuthFailure => ErrorKind::AuthFailure,
            Self::AutodecFailure => ErrorKind::AutodecFailure,
            Self::Primitive(_) => ErrorKind::Primitive,
        }
    }

    /// Whether the caller can recover (bad input, wrong or rotated-out key)
    /// as opposed to a programming or primitive-level fault
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::AuthFailure | Self::AutodecFailure
        )
    }
}

impl From<base64::DecodeError> for Error {
    fn from(_: base64::DecodeError) -> Self {
        Self::Decode("invalid base64 encoding".into())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(_: hex::FromHexError) -> Self {
        Self::Decode("invalid hex encoding".into())
    }
}
