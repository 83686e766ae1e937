//! Text encodings for obtext
//!
//! Reversible, all-or-nothing mappings between raw bytes and a
//! plaintext-safe alphabet. Every decoder rejects characters outside its
//! alphabet, impossible lengths and non-canonical trailing bits.

use crate::{Error, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use data_encoding::{Specification, BASE32_NOPAD};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Crockford base32 alphabet, lower-case output
const CROCKFORD_SYMBOLS: &str = "0123456789abcdefghjkmnpqrstvwxyz";

/// Crockford base32: lower-case canonical output, case-insensitive decode
/// with the confusable folds `o -> 0` and `i, l -> 1`.
static BASE32_CROCKFORD: LazyLock<data_encoding::Encoding> = LazyLock::new(|| {
    let mut crockford = Specification::new();
    crockford.symbols.push_str(CROCKFORD_SYMBOLS);
    crockford.translate.from.push_str("ABCDEFGHJKMNPQRSTVWXYZOoIiLl");
    crockford.translate.to.push_str("abcdefghjkmnpqrstvwxyz001111");
    crockford
        .encoding()
        .expect("crockford alphabet is statically valid")
});

/// Text encoding identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    /// Crockford base32, lower-case (`c32`)
    #[default]
    Base32Crockford,
    /// RFC 4648 base32, upper-case, unpadded (`b32`)
    Base32Rfc,
    /// URL-safe base64, unpadded (`b64`)
    Base64,
    /// Lower-case hexadecimal (`hex`)
    Hex,
}

impl Encoding {
    /// Every encoding, in declaration order
    pub const ALL: [Encoding; 4] = [
        Encoding::Base32Crockford,
        Encoding::Base32Rfc,
        Encoding::Base64,
        Encoding::Hex,
    ];

    /// Short identifier used in format tags
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base32Crockford => "c32",
            Self::Base32Rfc => "b32",
            Self::Base64 => "b64",
            Self::Hex => "hex",
        }
    }

    /// Long, descriptive name
    pub fn long_name(&self) -> &'static str {
        match self {
            Self::Base32Crockford => "base32crockford",
            Self::Base32Rfc => "base32rfc",
            Self::Base64 => "base64",
            Self::Hex => "hex",
        }
    }

    /// Encode bytes to text
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base32Crockford => BASE32_CROCKFORD.encode(bytes),
            Self::Base32Rfc => BASE32_NOPAD.encode(bytes),
            Self::Base64 => URL_SAFE_NO_PAD.encode(bytes),
            Self::Hex => hex::encode(bytes),
        }
    }

    /// Decode text to bytes
    pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Self::Base32Crockford => BASE32_CROCKFORD
                .decode(text.as_bytes())
                .map_err(|_| Error::Decode("invalid base32crockford encoding".into())),
            Self::Base32Rfc => BASE32_NOPAD
                .decode(text.as_bytes())
                .map_err(|_| Error::Decode("invalid base32rfc encoding".into())),
            Self::Base64 => Ok(URL_SAFE_NO_PAD.decode(text)?),
            Self::Hex => Ok(hex::decode(text)?),
        }
    }

    /// Whether every character of `text` belongs to this encoding's
    /// accepted input alphabet. Says nothing about length validity.
    pub fn alphabet_admits(&self, text: &str) -> bool {
        let admits: fn(u8) -> bool = match self {
            Self::Base32Crockford => |b| {
                let lower = b.to_ascii_lowercase();
                CROCKFORD_SYMBOLS.as_bytes().contains(&lower) || matches!(lower, b'o' | b'i' | b'l')
            },
            Self::Base32Rfc => |b| b.is_ascii_uppercase() || (b'2'..=b'7').contains(&b),
            Self::Base64 => |b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_',
            Self::Hex => |b| b.is_ascii_hexdigit(),
        };
        text.bytes().all(admits)
    }

    /// Encodings whose alphabet can contain `text`, most specific first
    pub fn detect_candidates(text: &str) -> Vec<Encoding> {
        [
            Encoding::Hex,
            Encoding::Base32Crockford,
            Encoding::Base32Rfc,
            Encoding::Base64,
        ]
        .into_iter()
        .filter(|encoding| encoding.alphabet_admits(text))
        .collect()
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "c32" | "base32crockford" => Ok(Self::Base32Crockford),
            "b32" | "base32rfc" => Ok(Self::Base32Rfc),
            "b64" | "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            _ => Err(Error::Format(format!("unknown encoding '{}'", s))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Encoding {
    fn serialize<S: serde::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Encoding {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
