//! Scheme registry
//!
//! Static catalog of cipher schemes. Each scheme carries a one-byte envelope
//! tag, its security class, its key length and the minimum length of a
//! well-formed ciphertext blob.
//!
//! Tag byte layout: `[tier:3][scheme:4][probabilistic:1]`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Size of the master key accepted by every scheme (512 bits)
pub const MASTER_KEY_SIZE: usize = 64;

/// AES block size
pub const AES_BLOCK_SIZE: usize = 16;

/// Size of an AEAD authentication tag or SIV
pub const TAG_SIZE: usize = 16;

/// Nonce size for AES-GCM-SIV
pub const GCM_SIV_NONCE_SIZE: usize = 12;

/// Nonce size for probabilistic AES-SIV
pub const SIV_NONCE_SIZE: usize = 16;

/// Security posture of a scheme, ordered from weakest to strongest.
///
/// `NoOpTesting` sorts first and is never chosen by default selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityClass {
    /// Pass-through, never secure
    NoOpTesting,
    /// Legacy AES-CBC with a key-derived IV
    InsecureLegacy,
    /// AES-CBC without integrity (obfuscation grade)
    Unauthenticated,
    /// AEAD with a plaintext-derived synthetic IV
    AuthenticatedDeterministic,
    /// AEAD with a random nonce
    AuthenticatedProbabilistic,
}

impl SecurityClass {
    /// Get the identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoOpTesting => "no_op_testing",
            Self::InsecureLegacy => "insecure_legacy",
            Self::Unauthenticated => "unauthenticated",
            Self::AuthenticatedDeterministic => "authenticated_deterministic",
            Self::AuthenticatedProbabilistic => "authenticated_probabilistic",
        }
    }
}

impl fmt::Display for SecurityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cipher scheme identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Scheme {
    /// Legacy AES-128-CBC
    Ob00,
    /// Deterministic AES-128-CBC
    Ob01,
    /// Probabilistic AES-128-CBC
    Ob21p,
    /// Deterministic AES-256-GCM-SIV
    Ob31,
    /// Probabilistic AES-256-GCM-SIV
    Ob31p,
    /// Deterministic AES-256-SIV
    Ob32,
    /// Probabilistic AES-256-SIV
    #[default]
    Ob32p,
    /// Identity (testing)
    Ob70,
    /// Byte reversal (testing)
    Ob71,
}

/// Static description of a scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemeDescriptor {
    pub scheme: Scheme,
    /// Envelope tag byte
    pub tag: u8,
    /// Required key length in bytes
    pub key_len: usize,
    /// Whether the key participates in the transform
    pub requires_key: bool,
    /// Same plaintext and key always yield the same obtext
    pub deterministic: bool,
    /// Ciphertext integrity is checked on open
    pub authenticated: bool,
    pub security_class: SecurityClass,
    /// Shortest well-formed ciphertext blob
    pub min_blob_len: usize,
    /// Blob length (after `block_offset`) must be a multiple of this
    pub block_multiple: usize,
    /// Leading bytes excluded from the block-multiple check (CBC IV)
    pub block_offset: usize,
    /// Primitive name, for display
    pub algorithm: &'static str,
}

impl SchemeDescriptor {
    /// Whether `len` is a plausible blob length for this scheme
    pub fn accepts_blob_len(&self, len: usize) -> bool {
        if len < self.min_blob_len {
            return false;
        }
        self.block_multiple <= 1 || (len - self.block_offset) % self.block_multiple == 0
    }
}

static REGISTRY: [SchemeDescriptor; 9] = [
    SchemeDescriptor {
        scheme: Scheme::Ob00,
        tag: 0x00,
        key_len: MASTER_KEY_SIZE,
        requires_key: true,
        deterministic: true,
        authenticated: false,
        security_class: SecurityClass::InsecureLegacy,
        min_blob_len: 0,
        block_multiple: AES_BLOCK_SIZE,
        block_offset: 0,
        algorithm: "AES-128-CBC (legacy padding)",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob01,
        tag: 0x02,
        key_len: MASTER_KEY_SIZE,
        requires_key: true,
        deterministic: true,
        authenticated: false,
        security_class: SecurityClass::Unauthenticated,
        min_blob_len: AES_BLOCK_SIZE,
        block_multiple: AES_BLOCK_SIZE,
        block_offset: 0,
        algorithm: "AES-128-CBC",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob21p,
        tag: 0x23,
        key_len: MASTER_KEY_SIZE,
        requires_key: true,
        deterministic: false,
        authenticated: false,
        security_class: SecurityClass::Unauthenticated,
        min_blob_len: 2 * AES_BLOCK_SIZE,
        block_multiple: AES_BLOCK_SIZE,
        block_offset: AES_BLOCK_SIZE,
        algorithm: "AES-128-CBC (random IV)",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob31,
        tag: 0x62,
        key_len: MASTER_KEY_SIZE,
        requires_key: true,
        deterministic: true,
        authenticated: true,
        security_class: SecurityClass::AuthenticatedDeterministic,
        min_blob_len: TAG_SIZE,
        block_multiple: 1,
        block_offset: 0,
        algorithm: "AES-256-GCM-SIV",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob31p,
        tag: 0x63,
        key_len: MASTER_KEY_SIZE,
        requires_key: true,
        deterministic: false,
        authenticated: true,
        security_class: SecurityClass::AuthenticatedProbabilistic,
        min_blob_len: GCM_SIV_NONCE_SIZE + TAG_SIZE,
        block_multiple: 1,
        block_offset: 0,
        algorithm: "AES-256-GCM-SIV (random nonce)",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob32,
        tag: 0x64,
        key_len: MASTER_KEY_SIZE,
        requires_key: true,
        deterministic: true,
        authenticated: true,
        security_class: SecurityClass::AuthenticatedDeterministic,
        min_blob_len: TAG_SIZE,
        block_multiple: 1,
        block_offset: 0,
        algorithm: "AES-256-SIV",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob32p,
        tag: 0x65,
        key_len: MASTER_KEY_SIZE,
        requires_key: true,
        deterministic: false,
        authenticated: true,
        security_class: SecurityClass::AuthenticatedProbabilistic,
        min_blob_len: SIV_NONCE_SIZE + TAG_SIZE,
        block_multiple: 1,
        block_offset: 0,
        algorithm: "AES-256-SIV (random nonce)",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob70,
        tag: 0xE0,
        key_len: MASTER_KEY_SIZE,
        requires_key: false,
        deterministic: true,
        authenticated: false,
        security_class: SecurityClass::NoOpTesting,
        min_blob_len: 0,
        block_multiple: 1,
        block_offset: 0,
        algorithm: "identity",
    },
    SchemeDescriptor {
        scheme: Scheme::Ob71,
        tag: 0xE2,
        key_len: MASTER_KEY_SIZE,
        requires_key: false,
        deterministic: true,
        authenticated: false,
        security_class: SecurityClass::NoOpTesting,
        min_blob_len: 0,
        block_multiple: 1,
        block_offset: 0,
        algorithm: "byte reversal",
    },
];

/// Look up the static descriptor for a scheme
pub fn lookup(scheme: Scheme) -> &'static SchemeDescriptor {
    &REGISTRY[scheme.index()]
}

/// All registered descriptors, in declaration order
pub fn descriptors() -> &'static [SchemeDescriptor] {
    &REGISTRY
}

impl Scheme {
    /// Every scheme, in declaration order
    pub const ALL: [Scheme; 9] = [
        Scheme::Ob00,
        Scheme::Ob01,
        Scheme::Ob21p,
        Scheme::Ob31,
        Scheme::Ob31p,
        Scheme::Ob32,
        Scheme::Ob32p,
        Scheme::Ob70,
        Scheme::Ob71,
    ];

    /// Schemes eligible for default and auto-detected selection,
    /// strongest first
    pub const SECURE: [Scheme; 6] = [
        Scheme::Ob32p,
        Scheme::Ob31p,
        Scheme::Ob32,
        Scheme::Ob31,
        Scheme::Ob21p,
        Scheme::Ob01,
    ];

    /// Pass-through schemes used by the keyless variants
    pub const TESTING: [Scheme; 2] = [Scheme::Ob70, Scheme::Ob71];

    fn index(self) -> usize {
        match self {
            Self::Ob00 => 0,
            Self::Ob01 => 1,
            Self::Ob21p => 2,
            Self::Ob31 => 3,
            Self::Ob31p => 4,
            Self::Ob32 => 5,
            Self::Ob32p => 6,
            Self::Ob70 => 7,
            Self::Ob71 => 8,
        }
    }

    /// Get the identifier string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ob00 => "ob00",
            Self::Ob01 => "ob01",
            Self::Ob21p => "ob21p",
            Self::Ob31 => "ob31",
            Self::Ob31p => "ob31p",
            Self::Ob32 => "ob32",
            Self::Ob32p => "ob32p",
            Self::Ob70 => "ob70",
            Self::Ob71 => "ob71",
        }
    }

    /// Get the static descriptor
    pub fn descriptor(&self) -> &'static SchemeDescriptor {
        lookup(*self)
    }

    /// Envelope tag byte
    pub fn tag(&self) -> u8 {
        self.descriptor().tag
    }

    /// Resolve an envelope tag byte
    pub fn from_tag(tag: u8) -> Option<Scheme> {
        REGISTRY.iter().find(|d| d.tag == tag).map(|d| d.scheme)
    }

    pub fn key_len(&self) -> usize {
        self.descriptor().key_len
    }

    pub fn is_deterministic(&self) -> bool {
        self.descriptor().deterministic
    }

    pub fn is_probabilistic(&self) -> bool {
        !self.is_deterministic()
    }

    pub fn is_authenticated(&self) -> bool {
        self.descriptor().authenticated
    }

    pub fn is_testing(&self) -> bool {
        self.security_class() == SecurityClass::NoOpTesting
    }

    pub fn security_class(&self) -> SecurityClass {
        self.descriptor().security_class
    }

    /// Whether a cipher configured for `self` may open obtext that
    /// carries the `embedded` scheme without strict mode.
    ///
    /// Keyed ciphers accept every keyed scheme so older obtext sharing the
    /// key stays readable. Testing and keyed schemes never mix.
    pub fn accepts_embedded(&self, embedded: Scheme) -> bool {
        self.is_testing() == embedded.is_testing()
    }
}

impl FromStr for Scheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Scheme::ALL
            .iter()
            .copied()
            .find(|scheme| scheme.as_str() == lower)
            .ok_or_else(|| Error::Format(format!("unknown scheme '{}'", s)))
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Scheme {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Scheme {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
