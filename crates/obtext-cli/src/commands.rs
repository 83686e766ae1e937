//! Subcommand execution
//!
//! Every command returns the text to print on stdout so the logic can be
//! exercised without a process boundary.

use crate::cli::{Cli, Command, GlobalArgs, Shell};
use crate::config::{parse_key, CliConfig};
use anyhow::{bail, Context};
use clap::CommandFactory;
use obtext::{
    autodec_any, autodec_keyless, dec_keyless, enc_keyless, generate_key, generate_key_base64,
    scheme, Encoding, Ob, Oboron, Scheme,
};

/// Overlay command-line flags onto a loaded configuration
pub fn apply_flags(mut config: CliConfig, global: &GlobalArgs, command: &Command) -> CliConfig {
    if let Some(format) = &global.format {
        config.format = format.clone();
    }
    if let Some((current, previous)) = global.keys.split_first() {
        config.key = Some(current.clone());
        config.previous_keys = previous.to_vec();
    }
    if let Command::Dec { strict: true, .. } = command {
        config.strict = true;
    }
    config
}

/// Run one command. `input` is the TEXT argument or stdin contents.
pub fn execute(
    command: &Command,
    config: &CliConfig,
    keyless: bool,
    input: Option<&str>,
) -> anyhow::Result<String> {
    match command {
        Command::Enc { .. } => {
            let plaintext = required(input)?;
            if keyless {
                return Ok(enc_keyless(config.format()?, plaintext)?);
            }
            Ok(keyed(config)?.enc(plaintext)?)
        }
        Command::Dec { .. } => {
            let obtext = required(input)?.trim();
            if keyless {
                return Ok(dec_keyless(config.format()?, obtext)?);
            }
            let ob = keyed(config)?;
            let plaintext = if config.strict {
                ob.dec_strict(obtext)
            } else {
                ob.dec(obtext)
            };
            Ok(plaintext?)
        }
        Command::Autodec { .. } => {
            let obtext = required(input)?.trim();
            if keyless {
                return Ok(autodec_keyless(obtext)?);
            }
            let keys = config.keys()?;
            if keys.is_empty() {
                bail!("autodec needs at least one key (--key, OB_KEY or the config file)");
            }
            tracing::debug!(keys = keys.len(), "running autodec");
            Ok(autodec_any(&keys, obtext)?)
        }
        Command::Keygen { scheme, base64 } => {
            let scheme: Scheme = scheme.parse()?;
            if *base64 {
                Ok(generate_key_base64(scheme))
            } else {
                Ok(generate_key(scheme))
            }
        }
        Command::Formats => Ok(formats_table()),
        Command::Completion { shell } => completion_script(*shell),
    }
}

/// Render the completion script for `shell`
pub fn completion_script(shell: Shell) -> anyhow::Result<String> {
    let mut script = Vec::new();
    clap_complete::generate(shell, &mut Cli::command(), "ob", &mut script);
    String::from_utf8(script).context("completion script is not valid UTF-8")
}

fn required(input: Option<&str>) -> anyhow::Result<&str> {
    input.context("no input given")
}

fn keyed(config: &CliConfig) -> anyhow::Result<Ob> {
    let key = config.key()?.context(
        "a key is required (--key, OB_KEY or the config file); use --keyless for testing schemes",
    )?;
    Ok(Ob::new(config.format()?, key)?)
}

/// Registry listing printed by `ob formats`
pub fn formats_table() -> String {
    let mut out = format!(
        "{:<7} {:<5} {:<29} {:<32} {}\n",
        "SCHEME", "TAG", "CLASS", "ALGORITHM", "KEY"
    );
    for d in scheme::descriptors() {
        let key = if d.requires_key {
            format!("{} bytes", d.key_len)
        } else {
            "none".to_string()
        };
        out.push_str(&format!(
            "{:<7} 0x{:02x}  {:<29} {:<32} {}\n",
            d.scheme.as_str(),
            d.tag,
            d.security_class.as_str(),
            d.algorithm,
            key
        ));
    }
    let encodings: Vec<String> = Encoding::ALL
        .iter()
        .map(|e| format!("{} ({})", e.as_str(), e.long_name()))
        .collect();
    out.push_str(&format!("\nencodings: {}", encodings.join(", ")));
    out
}
