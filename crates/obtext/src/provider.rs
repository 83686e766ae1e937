//! Cipher primitive providers
//!
//! A provider performs the raw seal/open for one scheme given its
//! descriptor. The envelope tag and text encoding are layered on top by the
//! dispatch types; a provider only ever sees the blob.
//!
//! Sub-keys are sliced from the 64-byte master key:
//!
//! | use                     | bytes  |
//! |-------------------------|--------|
//! | AES-128-CBC key         | 0..16  |
//! | deterministic CBC IV    | 16..32 |
//! | AES-256-GCM-SIV key     | 32..64 |
//! | AES-256-SIV key pair    | 0..64  |

use crate::scheme::{AES_BLOCK_SIZE, GCM_SIV_NONCE_SIZE, SIV_NONCE_SIZE};
use crate::{Error, Key, Result, Scheme, SchemeDescriptor};
use aes_gcm_siv::{
    aead::{Aead, KeyInit},
    Aes256GcmSiv, Nonce,
};
use aes_siv::siv::Aes256Siv;
use cbc::cipher::{
    block_padding::{NoPadding, Pkcs7},
    BlockDecryptMut, BlockEncryptMut, KeyIvInit,
};
use rand::rngs::OsRng;
use std::sync::Arc;

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Filler appended by the legacy scheme up to the block boundary
const LEGACY_PAD_BYTE: u8 = b'=';

/// Seal/open contract consumed by the dispatch types.
///
/// `open` returns [`Error::AuthFailure`] when the primitive rejects the
/// blob (bad tag, bad padding, wrong key). Any other error is treated as a
/// fault in the provider and is propagated by callers.
pub trait CipherProvider: Send + Sync {
    fn seal(&self, descriptor: &SchemeDescriptor, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>>;

    fn open(&self, descriptor: &SchemeDescriptor, key: &Key, blob: &[u8]) -> Result<Vec<u8>>;
}

impl<P: CipherProvider + ?Sized> CipherProvider for &P {
    fn seal(&self, descriptor: &SchemeDescriptor, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>> {
        (**self).seal(descriptor, key, plaintext)
    }

    fn open(&self, descriptor: &SchemeDescriptor, key: &Key, blob: &[u8]) -> Result<Vec<u8>> {
        (**self).open(descriptor, key, blob)
    }
}

impl<P: CipherProvider + ?Sized> CipherProvider for Arc<P> {
    fn seal(&self, descriptor: &SchemeDescriptor, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>> {
        (**self).seal(descriptor, key, plaintext)
    }

    fn open(&self, descriptor: &SchemeDescriptor, key: &Key, blob: &[u8]) -> Result<Vec<u8>> {
        (**self).open(descriptor, key, blob)
    }
}

/// Provider backed by the RustCrypto AES, CBC, AES-GCM-SIV and AES-SIV
/// implementations
#[derive(Debug, Clone, Copy, Default)]
pub struct AesProvider;

impl AesProvider {
    pub fn new() -> Self {
        Self
    }
}

impl CipherProvider for AesProvider {
    fn seal(&self, descriptor: &SchemeDescriptor, key: &Key, plaintext: &[u8]) -> Result<Vec<u8>> {
        let key = master_key(descriptor, key)?;
        match descriptor.scheme {
            Scheme::Ob00 => legacy_cbc_seal(key, plaintext),
            Scheme::Ob01 => {
                Ok(cbc_encryptor(key, cbc_iv(key))?.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
            }
            Scheme::Ob21p => {
                let mut iv = [0u8; AES_BLOCK_SIZE];
                rand::RngCore::fill_bytes(&mut OsRng, &mut iv);
                let ciphertext =
                    cbc_encryptor(key, &iv)?.encrypt_padded_vec_mut::<Pkcs7>(plaintext);
                Ok([iv.as_slice(), ciphertext.as_slice()].concat())
            }
            Scheme::Ob31 => gcm_siv_seal(key, &[0u8; GCM_SIV_NONCE_SIZE], plaintext),
            Scheme::Ob31p => {
                let mut nonce = [0u8; GCM_SIV_NONCE_SIZE];
                rand::RngCore::fill_bytes(&mut OsRng, &mut nonce);
                let sealed = gcm_siv_seal(key, &nonce, plaintext)?;
                Ok([nonce.as_slice(), sealed.as_slice()].concat())
            }
            Scheme::Ob32 => {
                let no_headers: [&[u8]; 0] = [];
                siv_cipher(key)?
                    .encrypt(no_headers, plaintext)
                    .map_err(|_| Error::Primitive("AES-SIV encryption failed".into()))
            }
            Scheme::Ob32p => {
                let mut nonce = [0u8; SIV_NONCE_SIZE];
                rand::RngCore::fill_bytes(&mut OsRng, &mut nonce);
                let sealed = siv_cipher(key)?
                    .encrypt([nonce.as_slice()], plaintext)
                    .map_err(|_| Error::Primitive("AES-SIV encryption failed".into()))?;
                Ok([nonce.as_slice(), sealed.as_slice()].concat())
            }
            Scheme::Ob70 => Ok(plaintext.to_vec()),
            Scheme::Ob71 => Ok(plaintext.iter().rev().copied().collect()),
        }
    }

    fn open(&self, descriptor: &SchemeDescriptor, key: &Key, blob: &[u8]) -> Result<Vec<u8>> {
        if !descriptor.accepts_blob_len(blob.len()) {
            return Err(Error::AuthFailure);
        }
        let key = master_key(descriptor, key)?;
        match descriptor.scheme {
            Scheme::Ob00 => legacy_cbc_open(key, blob),
            Scheme::Ob01 => cbc_decryptor(key, cbc_iv(key))?
                .decrypt_padded_vec_mut::<Pkcs7>(blob)
                .map_err(|_| Error::AuthFailure),
            Scheme::Ob21p => {
                let (iv, ciphertext) = blob.split_at(AES_BLOCK_SIZE);
                cbc_decryptor(key, iv)?
                    .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                    .map_err(|_| Error::AuthFailure)
            }
            Scheme::Ob31 => gcm_siv_open(key, &[0u8; GCM_SIV_NONCE_SIZE], blob),
            Scheme::Ob31p => {
                let (nonce, sealed) = blob.split_at(GCM_SIV_NONCE_SIZE);
                gcm_siv_open(key, nonce, sealed)
            }
            Scheme::Ob32 => {
                let no_headers: [&[u8]; 0] = [];
                siv_cipher(key)?
                    .decrypt(no_headers, blob)
                    .map_err(|_| Error::AuthFailure)
            }
            Scheme::Ob32p => {
                let (nonce, sealed) = blob.split_at(SIV_NONCE_SIZE);
                siv_cipher(key)?
                    .decrypt([nonce], sealed)
                    .map_err(|_| Error::AuthFailure)
            }
            Scheme::Ob70 => Ok(blob.to_vec()),
            Scheme::Ob71 => Ok(blob.iter().rev().copied().collect()),
        }
    }
}

fn master_key<'k>(descriptor: &SchemeDescriptor, key: &'k Key) -> Result<&'k [u8]> {
    if descriptor.requires_key && key.len() != descriptor.key_len {
        return Err(Error::Config(format!(
            "{} requires a {}-byte key, got {} bytes",
            descriptor.scheme,
            descriptor.key_len,
            key.len()
        )));
    }
    Ok(key.as_bytes())
}

fn cbc_key(key: &[u8]) -> &[u8] {
    &key[..AES_BLOCK_SIZE]
}

fn cbc_iv(key: &[u8]) -> &[u8] {
    &key[AES_BLOCK_SIZE..2 * AES_BLOCK_SIZE]
}

fn gcm_siv_key(key: &[u8]) -> &[u8] {
    &key[32..64]
}

fn cbc_encryptor(key: &[u8], iv: &[u8]) -> Result<Aes128CbcEnc> {
    Aes128CbcEnc::new_from_slices(cbc_key(key), iv)
        .map_err(|_| Error::Primitive("invalid AES-CBC key or IV length".into()))
}

fn cbc_decryptor(key: &[u8], iv: &[u8]) -> Result<Aes128CbcDec> {
    Aes128CbcDec::new_from_slices(cbc_key(key), iv)
        .map_err(|_| Error::Primitive("invalid AES-CBC key or IV length".into()))
}

fn legacy_cbc_seal(key: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    if plaintext.is_empty() {
        return Ok(Vec::new());
    }
    let padded_len = plaintext.len().div_ceil(AES_BLOCK_SIZE) * AES_BLOCK_SIZE;
    let mut padded = plaintext.to_vec();
    padded.resize(padded_len, LEGACY_PAD_BYTE);
    Ok(cbc_encryptor(key, cbc_iv(key))?.encrypt_padded_vec_mut::<NoPadding>(&padded))
}

// Trailing '=' in the plaintext is indistinguishable from padding and is lost.
fn legacy_cbc_open(key: &[u8], blob: &[u8]) -> Result<Vec<u8>> {
    if blob.is_empty() {
        return Ok(Vec::new());
    }
    let mut plaintext = cbc_decryptor(key, cbc_iv(key))?
        .decrypt_padded_vec_mut::<NoPadding>(blob)
        .map_err(|_| Error::AuthFailure)?;
    let end = plaintext
        .iter()
        .rposition(|&b| b != LEGACY_PAD_BYTE)
        .map_or(0, |i| i + 1);
    plaintext.truncate(end);
    Ok(plaintext)
}

fn gcm_siv_seal(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256GcmSiv::new_from_slice(gcm_siv_key(key))
        .map_err(|_| Error::Primitive("invalid AES-GCM-SIV key length".into()))?;
    cipher
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|_| Error::Primitive("AES-GCM-SIV encryption failed".into()))
}

fn gcm_siv_open(key: &[u8], nonce: &[u8], sealed: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256GcmSiv::new_from_slice(gcm_siv_key(key))
        .map_err(|_| Error::Primitive("invalid AES-GCM-SIV key length".into()))?;
    cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| Error::AuthFailure)
}

fn siv_cipher(key: &[u8]) -> Result<Aes256Siv> {
    Aes256Siv::new_from_slice(key)
        .map_err(|_| Error::Primitive("invalid AES-SIV key length".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn key() -> Key {
        Key::from_bytes(&(0u8..64).collect::<Vec<_>>())
    }

    #[rstest]
    #[case(Scheme::Ob00)]
    #[case(Scheme::Ob01)]
    #[case(Scheme::Ob21p)]
    #[case(Scheme::Ob31)]
    #[case(Scheme::Ob31p)]
    #[case(Scheme::Ob32)]
    #[case(Scheme::Ob32p)]
    #[case(Scheme::Ob70)]
    #[case(Scheme::Ob71)]
    fn test_seal_open(#[case] scheme: Scheme) {
        let provider = AesProvider;
        let d = scheme.descriptor();
        let plaintexts = [
            &b""[..],
            b"a",
            b"exactly sixteen!",
            b"a somewhat longer plaintext value",
        ];
        for plaintext in plaintexts {
            let blob = provider.seal(d, &key(), plaintext).unwrap();
            assert!(d.accepts_blob_len(blob.len()), "{} blob len {}", scheme, blob.len());
            assert_eq!(provider.open(d, &key(), &blob).unwrap(), plaintext, "{}", scheme);
        }
    }

    #[test]
    fn test_blob_layout_sizes() {
        let provider = AesProvider;
        let len = |scheme: Scheme| {
            provider.seal(scheme.descriptor(), &key(), b"hello").unwrap().len()
        };
        assert_eq!(len(Scheme::Ob00), 16);
        assert_eq!(len(Scheme::Ob01), 16);
        assert_eq!(len(Scheme::Ob21p), 32);
        assert_eq!(len(Scheme::Ob31), 5 + 16);
        assert_eq!(len(Scheme::Ob31p), 12 + 5 + 16);
        assert_eq!(len(Scheme::Ob32), 16 + 5);
        assert_eq!(len(Scheme::Ob32p), 16 + 16 + 5);
    }

    #[test]
    fn test_wrong_key_fails_auth() {
        let provider = AesProvider;
        let other = Key::from_bytes(&[9u8; 64]);
        for scheme in [Scheme::Ob31, Scheme::Ob31p, Scheme::Ob32, Scheme::Ob32p] {
            let d = scheme.descriptor();
            let blob = provider.seal(d, &key(), b"secret").unwrap();
            assert_eq!(provider.open(d, &other, &blob), Err(Error::AuthFailure), "{}", scheme);
        }
    }

    #[test]
    fn test_tampered_blob_fails_auth() {
        let provider = AesProvider;
        for scheme in [Scheme::Ob31, Scheme::Ob31p, Scheme::Ob32, Scheme::Ob32p] {
            let d = scheme.descriptor();
            let mut blob = provider.seal(d, &key(), b"secret").unwrap();
            let last = blob.len() - 1;
            blob[last] ^= 0x01;
            assert_eq!(provider.open(d, &key(), &blob), Err(Error::AuthFailure), "{}", scheme);
        }
    }

    #[test]
    fn test_short_blob_is_auth_failure() {
        let d = Scheme::Ob32p.descriptor();
        assert_eq!(AesProvider.open(d, &key(), &[0u8; 8]), Err(Error::AuthFailure));
    }

    #[test]
    fn test_wrong_key_length_is_config() {
        let d = Scheme::Ob32.descriptor();
        let short = Key::from_bytes(&[1u8; 32]);
        assert!(matches!(AesProvider.seal(d, &short, b"x"), Err(Error::Config(_))));
    }

    #[test]
    fn test_byte_reversal() {
        let blob = AesProvider.seal(Scheme::Ob71.descriptor(), &Key::testing(), b"abc").unwrap();
        assert_eq!(blob, b"cba");
    }

    #[test]
    fn test_probabilistic_nonces_differ() {
        let d = Scheme::Ob32p.descriptor();
        let a = AesProvider.seal(d, &key(), b"same").unwrap();
        let b = AesProvider.seal(d, &key(), b"same").unwrap();
        assert_ne!(a, b);
    }
}
