//! Multi-key, multi-scheme dispatch
//!
//! [`ObMulti`] keeps an ordered candidate list for key rotation and scheme
//! migration. Encryption always uses the active candidate; decryption runs
//! autodec over the whole list in order, so list newest keys first.

use crate::autodec::{autodec_with, Candidate};
use crate::cipher::{seal_text, Oboron};
use crate::provider::{AesProvider, CipherProvider};
use crate::{Error, Format, Result};

#[derive(Clone)]
pub struct ObMulti<P = AesProvider> {
    candidates: Vec<Candidate>,
    active: usize,
    provider: P,
}

impl ObMulti {
    /// The first candidate becomes active
    pub fn new(candidates: Vec<Candidate>) -> Result<Self> {
        Self::with_provider(candidates, AesProvider)
    }
}

impl<P: CipherProvider> ObMulti<P> {
    pub fn with_provider(candidates: Vec<Candidate>, provider: P) -> Result<Self> {
        if candidates.is_empty() {
            return Err(Error::Config("at least one candidate is required".into()));
        }
        Ok(Self {
            candidates,
            active: 0,
            provider,
        })
    }

    /// Make the candidate at `index` active
    pub fn with_active(mut self, index: usize) -> Result<Self> {
        self.set_active(index)?;
        Ok(self)
    }

    pub fn set_active(&mut self, index: usize) -> Result<()> {
        if index >= self.candidates.len() {
            return Err(Error::Config(format!(
                "active index {} out of range for {} candidates",
                index,
                self.candidates.len()
            )));
        }
        self.active = index;
        Ok(())
    }

    /// Append an older candidate, tried after the existing ones
    pub fn push_candidate(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    /// Put `candidate` first and make it active
    pub fn rotate(&mut self, candidate: Candidate) {
        self.candidates.insert(0, candidate);
        self.active = 0;
        tracing::debug!(candidates = self.candidates.len(), "rotated to new active candidate");
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn active(&self) -> &Candidate {
        &self.candidates[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }
}

impl<P: CipherProvider> Oboron for ObMulti<P> {
    fn enc(&self, plaintext: &str) -> Result<String> {
        let active = self.active();
        seal_text(&self.provider, active.format(), active.key(), plaintext)
    }

    fn dec(&self, obtext: &str) -> Result<String> {
        autodec_with(&self.provider, &self.candidates, obtext)
    }

    /// Candidates always match the embedded scheme exactly, so this is
    /// the same as [`Oboron::dec`]
    fn dec_strict(&self, obtext: &str) -> Result<String> {
        self.dec(obtext)
    }

    fn format(&self) -> Format {
        self.active().format()
    }

    fn key_bytes(&self) -> &[u8] {
        self.active().key().as_bytes()
    }
}

impl<P> std::fmt::Debug for ObMulti<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObMulti")
            .field("candidates", &self.candidates)
            .field("active", &self.active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autodec::tests::CountingProvider;
    use crate::{generate_key_bytes, ObCipher, Scheme};

    fn candidate(format: &str) -> Candidate {
        Candidate::new(format, generate_key_bytes(Scheme::Ob32p)).unwrap()
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(ObMulti::new(vec![]), Err(Error::Config(_))));
    }

    #[test]
    fn test_enc_uses_active() {
        let multi = ObMulti::new(vec![candidate("ob32:hex"), candidate("ob31:b64")])
            .unwrap()
            .with_active(1)
            .unwrap();
        assert_eq!(multi.format().to_string(), "ob31:b64");
        let obtext = multi.enc("x").unwrap();
        let single = ObCipher::new("ob31:b64", multi.key_bytes()).unwrap();
        assert_eq!(single.dec_strict(&obtext).unwrap(), "x");
        assert_eq!(multi.dec(&obtext).unwrap(), "x");
    }

    #[test]
    fn test_set_active_out_of_range() {
        let mut multi = ObMulti::new(vec![candidate("ob32p:c32")]).unwrap();
        assert!(matches!(multi.set_active(1), Err(Error::Config(_))));
        assert_eq!(multi.active_index(), 0);
    }

    #[test]
    fn test_rotate_keeps_old_obtext_readable() {
        let mut multi = ObMulti::new(vec![candidate("ob32p:c32")]).unwrap();
        let old_obtext = multi.enc("before rotation").unwrap();

        multi.rotate(candidate("ob32p:c32"));
        assert_eq!(multi.candidates().len(), 2);
        assert_eq!(multi.active_index(), 0);

        let new_obtext = multi.enc("after rotation").unwrap();
        assert_eq!(multi.dec(&old_obtext).unwrap(), "before rotation");
        assert_eq!(multi.dec(&new_obtext).unwrap(), "after rotation");
    }

    #[test]
    fn test_scheme_migration() {
        let key = generate_key_bytes(Scheme::Ob01);
        let legacy = ObCipher::ob01(key.as_slice(), None).unwrap();
        let old_obtext = legacy.enc("migrated").unwrap();

        let mut multi =
            ObMulti::new(vec![Candidate::new("ob32p:c32", key.as_slice()).unwrap()]).unwrap();
        multi.push_candidate(Candidate::new("ob01:c32", key.as_slice()).unwrap());
        assert_eq!(multi.dec(&old_obtext).unwrap(), "migrated");
        assert_eq!(multi.scheme(), Scheme::Ob32p);
    }

    #[test]
    fn test_custom_provider_counts_trials() {
        let provider = CountingProvider::default();
        let multi = ObMulti::with_provider(
            vec![candidate("ob32:c32"), candidate("ob32:c32"), candidate("ob32:c32")],
            provider.clone(),
        )
        .unwrap()
        .with_active(2)
        .unwrap();
        let obtext = multi.enc("third").unwrap();
        assert_eq!(multi.dec(&obtext).unwrap(), "third");
        assert_eq!(provider.opens(), 3);
    }

    #[test]
    fn test_debug_hides_keys() {
        let multi = ObMulti::new(vec![candidate("ob32p:c32")]).unwrap();
        assert!(format!("{:?}", multi).contains("REDACTED"));
    }
}
