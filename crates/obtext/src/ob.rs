//! Flexible dispatch
//!
//! [`Ob`] holds one key and a selectable format. The format can be changed
//! in place or overridden for a single call.

use crate::cipher::{check_key, open_text, seal_text, Oboron};
use crate::provider::{AesProvider, CipherProvider};
use crate::{Encoding, Format, IntoFormat, Key, Result, Scheme};

/// One key, any format
#[derive(Clone)]
pub struct Ob<P = AesProvider> {
    format: Format,
    key: Key,
    provider: P,
}

impl Ob {
    pub fn new(format: impl IntoFormat, key: impl Into<Key>) -> Result<Self> {
        Self::with_provider(format, key, AesProvider)
    }
}

impl<P: CipherProvider> Ob<P> {
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

    /// Encrypt under `format` without changing the configured one
    pub fn enc_as(&self, format: impl IntoFormat, plaintext: &str) -> Result<String> {
        let format = format.into_format()?;
        check_key(format, &self.key)?;
        seal_text(&self.provider, format, &self.key, plaintext)
    }

    /// Decrypt as if configured for `format`
    pub fn dec_as(&self, format: impl IntoFormat, obtext: &str) -> Result<String> {
        let format = format.into_format()?;
        check_key(format, &self.key)?;
        open_text(&self.provider, format, &self.key, obtext, false)
    }

    pub fn set_format(&mut self, format: impl IntoFormat) -> Result<()> {
        let format = format.into_format()?;
        check_key(format, &self.key)?;
        self.format = format;
        Ok(())
    }

    pub fn set_scheme(&mut self, scheme: Scheme) -> Result<()> {
        self.set_format(Format::new(scheme, self.format.encoding()))
    }

    pub fn set_encoding(&mut self, encoding: Encoding) -> Result<()> {
        self.set_format(Format::new(self.format.scheme(), encoding))
    }
}

impl<P: CipherProvider> Oboron for Ob<P> {
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

impl<P> std::fmt::Debug for Ob<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ob")
            .field("format", &self.format)
            .field("key", &self.key)
            .finish()
    }
}
