//! Envelope codec
//!
//! An envelope is the scheme tag byte followed by the cipher primitive's
//! output: `[tag:1][blob]`. Opening validates only the wire shape (known
//! tag, plausible blob length) so malformed input is rejected before any
//! cipher operation runs.

use crate::{Error, Result, Scheme};

/// A scheme-tagged ciphertext blob
#[derive(Clone, PartialEq, Eq)]
pub struct Envelope {
    pub scheme: Scheme,
    pub blob: Vec<u8>,
}

impl Envelope {
    pub fn new(scheme: Scheme, blob: Vec<u8>) -> Self {
        Self { scheme, blob }
    }

    /// Serialize to tagged bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        seal_envelope(self.scheme, &self.blob)
    }

    /// Parse tagged bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (scheme, blob) = open_envelope(bytes)?;
        Ok(Self::new(scheme, blob.to_vec()))
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("scheme", &self.scheme)
            .field("blob_len", &self.blob.len())
            .finish()
    }
}

/// Prefix the scheme tag onto a ciphertext blob
pub fn seal_envelope(scheme: Scheme, blob: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(blob.len() + 1);
    out.push(scheme.tag());
    out.extend_from_slice(blob);
    out
}

/// Split tagged bytes into scheme and blob, borrowing the blob
pub fn open_envelope(bytes: &[u8]) -> Result<(Scheme, &[u8])> {
    let (&tag, blob) = bytes
        .split_first()
        .ok_or_else(|| Error::Decode("empty envelope".into()))?;

    let scheme = Scheme::from_tag(tag).ok_or_else(|| {
        tracing::trace!(tag, "envelope rejected: unknown scheme tag");
        Error::Decode("unknown scheme tag".into())
    })?;

    if !scheme.descriptor().accepts_blob_len(blob.len()) {
        tracing::trace!(%scheme, len = blob.len(), "envelope rejected: malformed blob length");
        return Err(Error::Decode(format!(
            "malformed {} ciphertext length",
            scheme
        )));
    }

    Ok((scheme, blob))
}
