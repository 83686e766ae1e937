//! Trial decode over a candidate set
//!
//! Each distinct encoding among the candidates decodes the obtext once and
//! each decoded value opens its envelope once. Only candidates whose scheme
//! matches the embedded tag reach the cipher primitive, in caller order.
//! The first candidate that opens to valid UTF-8 wins.
//!
//! Failure is reported as [`Error::AutodecFailure`] with no detail about
//! which step eliminated which candidate. Provider faults other than an
//! authentication failure are propagated.

use crate::cipher::{check_key, into_utf8};
use crate::envelope::open_envelope;
use crate::provider::{AesProvider, CipherProvider};
use crate::{Encoding, Error, Format, IntoFormat, Key, Result, Scheme};

/// A (key, format) pair tried during autodec
#[derive(Clone, Debug)]
pub struct Candidate {
    key: Key,
    format: Format,
}

impl Candidate {
    pub fn new(format: impl IntoFormat, key: impl Into<Key>) -> Result<Self> {
        let format = format.into_format()?;
        let key = key.into();
        check_key(format, &key)?;
        Ok(Self { key, format })
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn scheme(&self) -> Scheme {
        self.format.scheme()
    }

    pub fn encoding(&self) -> Encoding {
        self.format.encoding()
    }
}

/// Run autodec with the default provider
pub fn autodec(candidates: &[Candidate], obtext: &str) -> Result<String> {
    autodec_with(&AesProvider, candidates, obtext)
}

/// Run autodec with a caller-supplied provider
pub fn autodec_with<P: CipherProvider>(
    provider: &P,
    candidates: &[Candidate],
    obtext: &str,
) -> Result<String> {
    // one decode per distinct encoding, in first-seen order
    let mut decoded: Vec<(Encoding, Option<Vec<u8>>)> = Vec::new();
    for candidate in candidates {
        let encoding = candidate.encoding();
        if decoded.iter().all(|(seen, _)| *seen != encoding) {
            decoded.push((encoding, encoding.decode(obtext).ok()));
        }
    }

    let opened: Vec<(Encoding, Scheme, &[u8])> = decoded
        .iter()
        .filter_map(|(encoding, bytes)| {
            let bytes = bytes.as_deref()?;
            let (scheme, blob) = open_envelope(bytes).ok()?;
            Some((*encoding, scheme, blob))
        })
        .collect();

    let mut attempted = 0usize;
    for candidate in candidates {
        let Some((_, embedded, blob)) = opened
            .iter()
            .find(|(encoding, _, _)| *encoding == candidate.encoding())
        else {
            continue;
        };
        if *embedded != candidate.scheme() {
            continue;
        }

        attempted += 1;
        match provider.open(embedded.descriptor(), &candidate.key, blob) {
            Ok(plaintext) => {
                if let Ok(text) = into_utf8(plaintext) {
                    tracing::trace!(attempted, "autodec matched");
                    return Ok(text);
                }
            }
            Err(Error::AuthFailure) => {}
            Err(e) => return Err(e),
        }
    }

    tracing::debug!(
        candidates = candidates.len(),
        decoded = opened.len(),
        attempted,
        "autodec exhausted candidates"
    );
    Err(Error::AutodecFailure)
}

/// Autodec with format detection: every key is tried under every secure
/// scheme and every encoding whose alphabet fits the obtext
pub fn autodec_any(keys: &[Key], obtext: &str) -> Result<String> {
    let encodings = Encoding::detect_candidates(obtext);
    let mut candidates = Vec::with_capacity(keys.len() * encodings.len() * Scheme::SECURE.len());
    for key in keys {
        for &encoding in &encodings {
            for scheme in Scheme::SECURE {
                candidates.push(Candidate::new(Format::new(scheme, encoding), key)?);
            }
        }
    }
    autodec(&candidates, obtext)
}

/// Autodec restricted to the testing schemes under the public testing key
pub fn autodec_keyless(obtext: &str) -> Result<String> {
    let key = Key::testing();
    let mut candidates = Vec::with_capacity(Scheme::TESTING.len() * Encoding::ALL.len());
    for scheme in Scheme::TESTING {
        for encoding in Encoding::ALL {
            candidates.push(Candidate::new(Format::new(scheme, encoding), &key)?);
        }
    }
    autodec(&candidates, obtext)
}
