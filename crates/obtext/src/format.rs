//! Format tags
//!
//! A [`Format`] pairs a [`Scheme`] with an [`Encoding`]. Its canonical text
//! form is `"{scheme}:{encoding}"` in lower case, e.g. `ob32p:c32`. Parsing
//! is case-insensitive.

use crate::{Encoding, Error, Result, Scheme};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Scheme and encoding pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Format {
    scheme: Scheme,
    encoding: Encoding,
}

impl Format {
    pub const fn new(scheme: Scheme, encoding: Encoding) -> Self {
        Self { scheme, encoding }
    }

    /// Format with the default (Crockford base32) encoding
    pub fn with_scheme(scheme: Scheme) -> Self {
        Self::new(scheme, Encoding::default())
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Parse a format tag such as `ob31:b64`
    pub fn parse(s: &str) -> Result<Self> {
        let (scheme, encoding) = s
            .split_once(':')
            .ok_or_else(|| Error::Format(format!("expected 'scheme:encoding', got '{}'", s)))?;
        if scheme.is_empty() || encoding.is_empty() || encoding.contains(':') {
            return Err(Error::Format(format!(
                "expected 'scheme:encoding', got '{}'",
                s
            )));
        }
        Ok(Self::new(scheme.parse()?, encoding.parse()?))
    }

    /// Every scheme and encoding combination
    pub fn all() -> impl Iterator<Item = Format> {
        Scheme::ALL
            .into_iter()
            .flat_map(|scheme| Encoding::ALL.into_iter().map(move |e| Format::new(scheme, e)))
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.encoding)
    }
}

impl TryFrom<String> for Format {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Format> for String {
    fn from(format: Format) -> Self {
        format.to_string()
    }
}

/// Types that can be turned into a [`Format`]
pub trait IntoFormat {
    fn into_format(self) -> Result<Format>;
}

impl IntoFormat for Format {
    fn into_format(self) -> Result<Format> {
        Ok(self)
    }
}

impl IntoFormat for &Format {
    fn into_format(self) -> Result<Format> {
        Ok(*self)
    }
}

impl IntoFormat for &str {
    fn into_format(self) -> Result<Format> {
        Format::parse(self)
    }
}

impl IntoFormat for String {
    fn into_format(self) -> Result<Format> {
        Format::parse(&self)
    }
}

impl IntoFormat for &String {
    fn into_format(self) -> Result<Format> {
        Format::parse(self)
    }
}

impl IntoFormat for Scheme {
    fn into_format(self) -> Result<Format> {
        Ok(Format::with_scheme(self))
    }
}
