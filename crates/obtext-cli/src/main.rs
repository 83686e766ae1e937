//! ob - obtext command-line tool

use anyhow::Context;
use clap::Parser;
use obtext_cli::{apply_flags, execute, Cli, CliConfig, Command};
use std::io::Read;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr; stdout carries obtext and plaintext only
    let log_level = if cli.global.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("obtext={0},obtext_cli={0}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig::load(cli.global.config.as_deref())?;
    let config = apply_flags(config, &cli.global, &cli.command);

    let input = match &cli.command {
        Command::Enc { text } | Command::Dec { text, .. } | Command::Autodec { text } => {
            Some(match text {
                Some(text) => text.clone(),
                None => read_stdin()?,
            })
        }
        Command::Keygen { .. } | Command::Formats | Command::Completion { .. } => None,
    };

    let output = execute(&cli.command, &config, cli.global.keyless, input.as_deref())?;
    println!("{}", output);
    Ok(())
}

fn read_stdin() -> anyhow::Result<String> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read stdin")?;
    // drop the newline a shell pipe adds
    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    Ok(buffer)
}
