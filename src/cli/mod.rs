// ABOUTME: CLI argument parsing and command routing for amdr-welcome
//
// Provides command-line interface for:
// - Running the welcome wizard (tui, default)
// - Generating an RSA key pair headlessly (keygen)
// - Sending a one-off HTTP request (request)

pub mod keygen;
pub mod request;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// AMDR welcome wizard and setup helpers
#[derive(Parser)]
#[command(name = "amdr-welcome")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Launch the welcome wizard (default if no command given)
    Tui(TuiArgs),

    /// Generate an RSA key pair
    Keygen(KeygenArgs),

    /// Send an HTTP request and print the response
    Request(RequestArgs),
}

/// Arguments for the tui command
#[derive(clap::Args, Default)]
pub struct TuiArgs {
    /// Run the wizard even if it was already completed
    #[arg(long)]
    pub reset: bool,
}

/// Arguments for the keygen command
#[derive(clap::Args)]
pub struct KeygenArgs {
    /// Encrypt the private key with this password
    #[arg(long, short)]
    pub password: Option<String>,

    /// Modulus size in bits
    #[arg(long)]
    pub key_size: Option<usize>,

    /// Public exponent
    #[arg(long)]
    pub public_exponent: Option<u64>,

    /// Where to write the private key (PKCS8 PEM)
    #[arg(long)]
    pub private_file: Option<PathBuf>,

    /// Where to write the public key (PKCS1 PEM)
    #[arg(long)]
    pub public_file: Option<PathBuf>,
}

/// Arguments for the request command
#[derive(clap::Args)]
pub struct RequestArgs {
    /// Target URL
    pub url: String,

    /// HTTP method
    #[arg(long, short = 'X', default_value = "GET")]
    pub method: String,

    /// Extra header as `Name: value`, may be repeated
    #[arg(long = "header", short = 'H')]
    pub headers: Vec<String>,

    /// Request body
    #[arg(long, short)]
    pub data: Option<String>,

    /// Timeout in seconds
    #[arg(long, default_value = "10")]
    pub timeout: u64,
}
