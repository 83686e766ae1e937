//! Single-scheme cipher and the shared enc/dec pipeline
//!
//! Encode path: UTF-8 bytes -> provider seal -> envelope tag -> text
//! encoding. Decode runs the same steps in reverse and checks the embedded
//! scheme against the configured one before any cipher operation.

use crate::envelope::{open_envelope, seal_envelope};
use crate::provider::{AesProvider, CipherProvider};
use crate::{Encoding, Error, Format, IntoFormat, Key, Result, Scheme};

/// Capability interface shared by every cipher type
pub trait Oboron {
    /// Encrypt and encode a plaintext string
    fn enc(&self, plaintext: &str) -> Result<String>;

    /// Decode and decrypt, accepting any embedded scheme the configured
    /// scheme's policy allows
    fn dec(&self, obtext: &str) -> Result<String>;

    /// Decode and decrypt, rejecting obtext whose embedded scheme differs
    /// from the configured one
    fn dec_strict(&self, obtext: &str) -> Result<String>;

    fn format(&self) -> Format;

    fn scheme(&self) -> Scheme {
        self.format().scheme()
    }

    fn encoding(&self) -> Encoding {
        self.format().encoding()
    }

    /// Key as lower-case hex
    fn key(&self) -> String {
        hex::encode(self.key_bytes())
    }

    fn key_bytes(&self) -> &[u8];
}

/// Check a key against the format's scheme
pub(crate) fn check_key(format: Format, key: &Key) -> Result<()> {
    key.validate_for(format.scheme())
}

pub(crate) fn seal_text<P: CipherProvider>(
    provider: &P,
    format: Format,
    key: &Key,
    plaintext: &str,
) -> Result<String> {
    let scheme = format.scheme();
    let blob = provider.seal(scheme.descriptor(), key, plaintext.as_bytes())?;
    Ok(format.encoding().encode(&seal_envelope(scheme, &blob)))
}

pub(crate) fn open_text<P: CipherProvider>(
    provider: &P,
    format: Format,
    key: &Key,
    obtext: &str,
    strict: bool,
) -> Result<String> {
    let bytes = format.encoding().decode(obtext)?;
    let (embedded, blob) = open_envelope(&bytes)?;
    let configured = format.scheme();

    if strict && embedded != configured {
        return Err(Error::Decode(format!(
            "scheme mismatch: expected {}, found {}",
            configured, embedded
        )));
    }
    if !strict && !configured.accepts_embedded(embedded) {
        tracing::debug!(%configured, %embedded, "refusing embedded scheme");
        return Err(Error::Decode(format!(
            "{} obtext cannot be read by a {} cipher",
            embedded, configured
        )));
    }

    let plaintext = provider.open(embedded.descriptor(), key, blob)?;
    into_utf8(plaintext)
}

pub(crate) fn into_utf8(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| Error::Decode("plaintext is not valid UTF-8".into()))
}

/// Cipher bound to one scheme, one encoding and one key
#[derive(Clone)]
pub struct ObCipher<P = AesProvider> {
    format: Format,
    key: Key,
    provider: P,
}

impl ObCipher {
    pub fn new(format: impl IntoFormat, key: impl Into<Key>) -> Result<Self> {
        Self::with_provider(format, key, AesProvider)
    }
}

impl<P: CipherProvider> ObCipher<P> {
    /// Build with a custom cipher primitive provider
    pub fn with_provider(
        format: impl IntoFormat,
        key: impl Into<Key>,
        provider: P,
    ) -> Result<Self> {
        let format = format.into_format()?;
        let key = key.into();
        check_key(format, &key)?;
        Ok(Self {
            format,
            key,
            provider,
        })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P: CipherProvider> Oboron for ObCipher<P> {
    fn enc(&self, plaintext: &str) -> Result<String> {
        seal_text(&self.provider, self.format, &self.key, plaintext)
    }

    fn dec(&self, obtext: &str) -> Result<String> {
        open_text(&self.provider, self.format, &self.key, obtext, false)
    }

    fn dec_strict(&self, obtext: &str) -> Result<String> {
        open_text(&self.provider, self.format, &self.key, obtext, true)
    }

    fn format(&self) -> Format {
        self.format
    }

    fn key_bytes(&self) -> &[u8] {
        self.key.as_bytes()
    }
}

impl<P> std::fmt::Debug for ObCipher<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObCipher")
            .field("format", &self.format)
            .field("key", &self.key)
            .finish()
    }
}

macro_rules! scheme_constructors {
    ($($name:ident => $scheme:ident),* $(,)?) => {
        impl ObCipher {
            $(
                #[doc = concat!(
                    "`", stringify!($name), "` cipher, Crockford base32 unless `encoding` is given"
                )]
                pub fn $name(key: impl Into<Key>, encoding: Option<Encoding>) -> Result<Self> {
                    Self::new(Format::new(Scheme::$scheme, encoding.unwrap_or_default()), key)
                }
            )*
        }
    };
}

scheme_constructors! {
    ob00 => Ob00,
    ob01 => Ob01,
    ob21p => Ob21p,
    ob31 => Ob31,
    ob31p => Ob31p,
    ob32 => Ob32,
    ob32p => Ob32p,
    ob70 => Ob70,
    ob71 => Ob71,
}
