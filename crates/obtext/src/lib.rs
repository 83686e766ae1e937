//! # Obtext
//!
//! Symmetric encryption envelopes serialized as plaintext-safe strings.
//!
//! An obtext is `encoding(tag ++ blob)`: a one-byte scheme tag followed by
//! the cipher output, rendered in Crockford base32, RFC 4648 base32,
//! URL-safe base64 or hex. The embedded tag lets a decoder find the scheme
//! without out-of-band metadata, and lets autodec reject malformed input
//! before running a cipher.
//!
//! This crate provides:
//! - **Scheme registry**: AES-CBC, AES-GCM-SIV and AES-SIV schemes plus two
//!   pass-through testing schemes
//! - **Format tags**: `scheme:encoding` strings such as `ob32p:c32`
//! - **Cipher types**: [`ObCipher`] (fixed format), [`Ob`] (selectable
//!   format) and [`ObMulti`] (key rotation and scheme migration)
//! - **Autodec**: trial decode over an ordered candidate set
//!
//! ## Example
//!
//! ```rust
//! use obtext::{generate_key, Key, Ob, Oboron};
//!
//! let key = Key::from_hex(&generate_key(obtext::Scheme::Ob32p))?;
//! let ob = Ob::new("ob32p:c32", key)?;
//! let obtext = ob.enc("hello")?;
//! assert_eq!(ob.dec(&obtext)?, "hello");
//! # Ok::<(), obtext::Error>(())
//! ```

pub mod autodec;
pub mod cipher;
pub mod encoding;
pub mod envelope;
pub mod error;
pub mod format;
pub mod keys;
pub mod multi;
pub mod ob;
pub mod provider;
pub mod scheme;

pub use autodec::{autodec, autodec_any, autodec_keyless, autodec_with, Candidate};
pub use cipher::{ObCipher, Oboron};
pub use encoding::Encoding;
pub use envelope::{open_envelope, seal_envelope, Envelope};
pub use error::{Error, ErrorKind, Result};
pub use format::{Format, IntoFormat};
pub use keys::{generate_key, generate_key_base64, generate_key_bytes, Key};
pub use multi::ObMulti;
pub use ob::Ob;
pub use provider::{AesProvider, CipherProvider};
pub use scheme::{Scheme, SchemeDescriptor, SecurityClass};

/// Encrypt `plaintext` under `format` and `key`
pub fn enc(format: impl IntoFormat, key: impl Into<Key>, plaintext: &str) -> Result<String> {
    ObCipher::new(format, key)?.enc(plaintext)
}

/// Decrypt `obtext`, accepting any embedded scheme the format's policy allows
pub fn dec(format: impl IntoFormat, key: impl Into<Key>, obtext: &str) -> Result<String> {
    ObCipher::new(format, key)?.dec(obtext)
}

/// Decrypt `obtext`, requiring the embedded scheme to match `format`
pub fn dec_strict(format: impl IntoFormat, key: impl Into<Key>, obtext: &str) -> Result<String> {
    ObCipher::new(format, key)?.dec_strict(obtext)
}

/// Encode with a testing scheme; no key is involved
pub fn enc_keyless(format: impl IntoFormat, plaintext: &str) -> Result<String> {
    keyless_cipher(format)?.enc(plaintext)
}

/// Decode obtext produced by a testing scheme
pub fn dec_keyless(format: impl IntoFormat, obtext: &str) -> Result<String> {
    keyless_cipher(format)?.dec(obtext)
}

fn keyless_cipher(format: impl IntoFormat) -> Result<ObCipher> {
    let format = format.into_format()?;
    if !format.scheme().is_testing() {
        return Err(Error::Config(format!(
            "{} requires a key; keyless operations only support testing schemes",
            format.scheme()
        )));
    }
    ObCipher::new(format, Key::testing())
}
