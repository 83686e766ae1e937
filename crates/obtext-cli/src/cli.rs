//! Command-line arguments

use clap::{Args, Parser, Subcommand};
pub use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ob")]
#[command(about = "Encrypt and encode text as obtext")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Format tag, e.g. ob32p:c32
    #[arg(short, long, global = true)]
    pub format: Option<String>,

    /// Key as hex or URL-safe base64. Repeat to give autodec older
    /// keys, newest first.
    #[arg(short, long = "key", global = true)]
    pub keys: Vec<String>,

    /// Use the public testing key (testing schemes only)
    #[arg(long, global = true)]
    pub keyless: bool,

    /// Config file (TOML, JSON or YAML)
    #[arg(short, long, global = true, env = "OB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, env = "OB_DEBUG")]
    pub debug: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Encrypt TEXT (or stdin)
    Enc {
        text: Option<String>,
    },
    /// Decrypt OBTEXT (or stdin) with the configured format and key
    Dec {
        text: Option<String>,

        /// Reject obtext produced by a different scheme
        #[arg(long)]
        strict: bool,
    },
    /// Decrypt OBTEXT (or stdin) trying every configured key and format
    Autodec {
        text: Option<String>,
    },
    /// Generate a random key
    Keygen {
        /// Scheme the key is for
        #[arg(short, long, default_value = "ob32p")]
        scheme: String,

        /// Print URL-safe base64 instead of hex
        #[arg(long)]
        base64: bool,
    },
    /// List the available schemes and encodings
    Formats,
    /// Print a shell completion script
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}
