// ABOUTME: Configuration management for amdr-welcome
// Wizard preferences (slide timing, key defaults, connectivity target) stored as TOML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::keygen::{KeyGenRequest, KeyOptions};

pub mod onboarding;

pub use onboarding::OnboardingConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeConfig {
    /// Application version
    #[serde(default = "default_version")]
    pub version: String,

    /// Page slide duration in milliseconds
    #[serde(default = "default_slide_duration_ms")]
    pub slide_duration_ms: u64,

    /// Defaults for the key pair page
    #[serde(default)]
    pub key: KeyDefaults,

    /// URL probed by the connectivity page
    #[serde(default = "default_connectivity_url")]
    pub connectivity_url: String,

    /// HTTP method used for the connectivity probe
    #[serde(default = "default_connectivity_method")]
    pub connectivity_method: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDefaults {
    /// RSA modulus size in bits
    #[serde(default = "default_key_size")]
    pub key_size: usize,

    /// RSA public exponent
    #[serde(default = "default_public_exponent")]
    pub public_exponent: u64,

    /// Where the private key is written (PKCS8 PEM)
    #[serde(default = "default_private_file")]
    pub private_file: PathBuf,

    /// Where the public key is written (PKCS1 PEM)
    #[serde(default = "default_public_file")]
    pub public_file: PathBuf,
}

impl Default for KeyDefaults {
    fn default() -> Self {
        Self {
            key_size: default_key_size(),
            public_exponent: default_public_exponent(),
            private_file: default_private_file(),
            public_file: default_public_file(),
        }
    }
}

impl KeyDefaults {
    pub const fn options(&self) -> KeyOptions {
        KeyOptions::new(self.public_exponent, self.key_size)
    }

    /// Generation request without a password
    pub fn request(&self) -> KeyGenRequest {
        KeyGenRequest {
            password: None,
            options: self.options(),
            private_file: Some(self.private_file.clone()),
            public_file: Some(self.public_file.clone()),
        }
    }
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_slide_duration_ms() -> u64 {
    1000
}

fn default_key_size() -> usize {
    KeyOptions::default().key_size
}

fn default_public_exponent() -> u64 {
    KeyOptions::default().public_exponent
}

fn default_key_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".amdr-welcome").join("keys"))
        .unwrap_or_else(|| PathBuf::from(".amdr-welcome/keys"))
}

fn default_private_file() -> PathBuf {
    default_key_dir().join("id_rsa.pem")
}

fn default_public_file() -> PathBuf {
    default_key_dir().join("id_rsa.pub.pem")
}

fn default_connectivity_url() -> String {
    "http://localhost:5000/".to_string()
}

fn default_connectivity_method() -> String {
    "GET".to_string()
}

impl Default for WelcomeConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            slide_duration_ms: default_slide_duration_ms(),
            key: KeyDefaults::default(),
            connectivity_url: default_connectivity_url(),
            connectivity_method: default_connectivity_method(),
        }
    }
}

impl WelcomeConfig {
    /// Load configuration from the user config directory
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit file, defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        Ok(())
    }

    /// `~/.amdr-welcome/config/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::user_config_dir()?.join("config.toml"))
    }

    /// Get user configuration directory
    pub fn user_config_dir() -> Result<PathBuf> {
        Ok(base_dir()?.join("config"))
    }

    pub const fn slide_duration(&self) -> Duration {
        Duration::from_millis(self.slide_duration_ms)
    }
}

/// Base amdr-welcome directory in the user's home
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".amdr-welcome"))
}
