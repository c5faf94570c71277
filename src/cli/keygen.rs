// ABOUTME: CLI keygen command
//
// Generates an RSA key pair with the configured defaults, overridden by flags

use anyhow::{Context, Result};
use serde::Serialize;

use super::{KeygenArgs, OutputFormat};
use crate::config::WelcomeConfig;
use crate::keygen::{generate_key_pair, KeyGenOverrides, KeyGenRequest, KeyOptions};

/// JSON output structure for keygen command
#[derive(Debug, Serialize)]
pub struct KeygenOutput {
    pub key_size: usize,
    pub public_exponent: u64,
    pub encrypted: bool,
    pub private_file: Option<String>,
    pub public_file: Option<String>,
}

/// Merge flags over the config defaults
pub fn build_request(args: &KeygenArgs, config: &WelcomeConfig) -> KeyGenRequest {
    let defaults = config.key.request();
    let options = KeyOptions::new(
        args.public_exponent.unwrap_or(defaults.options.public_exponent),
        args.key_size.unwrap_or(defaults.options.key_size),
    );

    defaults.merged(KeyGenOverrides {
        password: args.password.clone(),
        options: Some(options),
        private_file: args.private_file.clone(),
        public_file: args.public_file.clone(),
    })
}

pub async fn execute(args: KeygenArgs, format: OutputFormat) -> Result<()> {
    let config = WelcomeConfig::load().context("Failed to load configuration")?;
    let request = build_request(&args, &config);

    let output = KeygenOutput {
        key_size: request.options.key_size,
        public_exponent: request.options.public_exponent,
        encrypted: request.encryption_password().is_some(),
        private_file: request.private_file.as_ref().map(|p| p.display().to_string()),
        public_file: request.public_file.as_ref().map(|p| p.display().to_string()),
    };

    tokio::task::spawn_blocking(move || generate_key_pair(&request))
        .await
        .context("Key generation task failed")?
        .context("Failed to generate key pair")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!(
                "Generated {}-bit RSA key pair (e = {})",
                output.key_size, output.public_exponent
            );
            if let Some(path) = &output.private_file {
                let note = if output.encrypted { "encrypted" } else { "unencrypted" };
                println!("  Private key: {} ({})", path, note);
            }
            if let Some(path) = &output.public_file {
                println!("  Public key:  {}", path);
            }
        }
    }

    Ok(())
}
