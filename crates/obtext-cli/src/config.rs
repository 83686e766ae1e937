//! CLI configuration
//!
//! Layers, lowest precedence first: built-in defaults, an optional config
//! file, `OB_*` environment variables, then command-line flags.

use anyhow::Context;
use config::{Config, Environment, File};
use obtext::{Candidate, Format, Key};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by every subcommand
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CliConfig {
    /// Format tag used for enc and dec
    pub format: String,
    /// Current key (hex or base64)
    pub key: Option<String>,
    /// Older keys tried after `key` by autodec, newest first
    pub previous_keys: Vec<String>,
    /// Reject obtext whose embedded scheme differs from `format`
    pub strict: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            format: Format::default().to_string(),
            key: None,
            previous_keys: Vec::new(),
            strict: false,
        }
    }
}

impl CliConfig {
    /// Load defaults, then `path` if given, then the environment
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix("OB")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("previous_keys"),
        );

        let config = builder
            .build()
            .context("failed to build configuration")?
            .try_deserialize::<CliConfig>()
            .context("failed to deserialize configuration")?;

        config.format().context("invalid format in configuration")?;
        Ok(config)
    }

    pub fn format(&self) -> anyhow::Result<Format> {
        Ok(self.format.parse::<Format>()?)
    }

    /// The current key, if one is configured
    pub fn key(&self) -> anyhow::Result<Option<Key>> {
        self.key.as_deref().map(parse_key).transpose()
    }

    /// Current key followed by previous keys
    pub fn keys(&self) -> anyhow::Result<Vec<Key>> {
        self.key
            .iter()
            .chain(self.previous_keys.iter())
            .map(|k| parse_key(k))
            .collect()
    }

    /// Every configured key paired with the configured format
    pub fn candidates(&self) -> anyhow::Result<Vec<Candidate>> {
        let format = self.format()?;
        self.keys()?
            .into_iter()
            .map(|key| Ok(Candidate::new(format, key)?))
            .collect()
    }
}

/// Parse a key given as hex, falling back to URL-safe base64
pub fn parse_key(text: &str) -> anyhow::Result<Key> {
    Key::from_hex(text)
        .or_else(|_| Key::from_base64(text))
        .map_err(|_| anyhow::anyhow!("key must be hex or URL-safe base64"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use obtext::Scheme;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.format().unwrap(), Format::default());
        assert!(config.key().unwrap().is_none());
        assert!(config.keys().unwrap().is_empty());
        assert!(!config.strict);
    }

    #[test]
    fn test_key_order() {
        let current = obtext::generate_key(Scheme::Ob32p);
        let previous = obtext::generate_key(Scheme::Ob32p);
        let config = CliConfig {
            key: Some(current.clone()),
            previous_keys: vec![previous.clone()],
            ..Default::default()
        };
        let keys = config.keys().unwrap();
        assert_eq!(keys[0].to_hex(), current);
        assert_eq!(keys[1].to_hex(), previous);
        assert_eq!(config.candidates().unwrap().len(), 2);
    }

    #[test]
    fn test_base64_key_accepted() {
        let b64 = obtext::generate_key_base64(Scheme::Ob32);
        assert_eq!(parse_key(&b64).unwrap().len(), 64);
    }

    #[test]
    fn test_garbage_key_error_does_not_echo_input() {
        let err = parse_key("not a key!").unwrap_err();
        assert!(!err.to_string().contains("not a key!"));
    }
}
