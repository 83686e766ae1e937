//! Key handling
//!
//! Keys are raw byte strings supplied by the caller. A key is checked
//! against a scheme's required length before any cipher object is built
//! and is wiped from memory when dropped.

use crate::{Error, Result, Scheme};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::rngs::OsRng;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A symmetric master key
///
/// Keys have no equality operator; compare derived values instead.
///
/// ```compile_fail
/// let a = obtext::Key::testing();
/// let b = obtext::Key::testing();
/// let _ = a == b;
/// ```
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    bytes: Vec<u8>,
}

impl Key {
    /// Create from raw bytes. Length is validated per scheme.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Decode a hex key
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s.trim())
            .map_err(|_| Error::Config("key is not valid hex".into()))?;
        Ok(Self { bytes })
    }

    /// Decode a URL-safe, unpadded base64 key
    pub fn from_base64(s: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(s.trim())
            .map_err(|_| Error::Config("key is not valid base64".into()))?;
        Ok(Self { bytes })
    }

    /// Generate a random key of the length `scheme` requires
    pub fn generate(scheme: Scheme) -> Self {
        let mut bytes = vec![0u8; scheme.key_len()];
        rand::RngCore::fill_bytes(&mut OsRng, &mut bytes);
        Self { bytes }
    }

    /// The fixed, public key used by keyless testing operations
    pub fn testing() -> Self {
        Self {
            bytes: vec![0u8; crate::scheme::MASTER_KEY_SIZE],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(&self.bytes)
    }

    /// Check the key length against `scheme`
    pub fn validate_for(&self, scheme: Scheme) -> Result<()> {
        let required = scheme.key_len();
        if self.bytes.len() != required {
            return Err(Error::Config(format!(
                "{} requires a {}-byte key, got {} bytes",
                scheme,
                required,
                self.bytes.len()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Key([REDACTED; {}])", self.bytes.len())
    }
}

impl From<&[u8]> for Key {
    fn from(bytes: &[u8]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

impl From<Vec<u8>> for Key {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl<const N: usize> From<[u8; N]> for Key {
    fn from(bytes: [u8; N]) -> Self {
        Self::from_bytes(&bytes)
    }
}

impl<const N: usize> From<&[u8; N]> for Key {
    fn from(bytes: &[u8; N]) -> Self {
        Self::from_bytes(bytes)
    }
}

/// Generate a random key for `scheme`, hex encoded
pub fn generate_key(scheme: Scheme) -> String {
    Key::generate(scheme).to_hex()
}

/// Generate a random key for `scheme` as raw bytes
pub fn generate_key_bytes(scheme: Scheme) -> Vec<u8> {
    Key::generate(scheme).as_bytes().to_vec()
}

/// Generate a random key for `scheme`, base64 encoded.
///
/// Keys containing `-` or `_` are redrawn so the string stays selectable
/// with a double click.
pub fn generate_key_base64(scheme: Scheme) -> String {
    loop {
        let encoded = Key::generate(scheme).to_base64();
        if !encoded.contains(['-', '_']) {
            return encoded;
        }
    }
}
