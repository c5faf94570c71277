// ABOUTME: RSA key pair generation with PEM output
// Private keys are PKCS8 (password-encrypted when a password is set), public keys PKCS1

use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rsa::pkcs1::EncodeRsaPublicKey;
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Errors from key generation or PEM export
#[derive(Debug, Error)]
pub enum KeyGenError {
    #[error("Key generation failed: {0}")]
    Generate(#[from] rsa::Error),

    #[error("Failed to encode private key: {0}")]
    EncodePrivate(#[from] rsa::pkcs8::Error),

    #[error("Failed to encode public key: {0}")]
    EncodePublic(#[from] rsa::pkcs1::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Key generation task failed: {0}")]
    Task(String),
}

/// Key size and public exponent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyOptions {
    pub public_exponent: u64,
    pub key_size: usize,
}

impl KeyOptions {
    pub const fn new(public_exponent: u64, key_size: usize) -> Self {
        Self {
            public_exponent,
            key_size,
        }
    }
}

impl Default for KeyOptions {
    fn default() -> Self {
        Self::new(65537, 4096)
    }
}

/// Everything needed for one generation run
#[derive(Debug, Clone, Default)]
pub struct KeyGenRequest {
    /// Empty or missing means the private key is written unencrypted
    pub password: Option<String>,
    pub options: KeyOptions,
    pub private_file: Option<PathBuf>,
    pub public_file: Option<PathBuf>,
}

impl KeyGenRequest {
    /// The password to encrypt with, if any
    pub fn encryption_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Apply per-call overrides on top of these values
    pub fn merged(&self, overrides: KeyGenOverrides) -> Self {
        Self {
            password: overrides.password.or_else(|| self.password.clone()),
            options: overrides.options.unwrap_or(self.options),
            private_file: overrides.private_file.or_else(|| self.private_file.clone()),
            public_file: overrides.public_file.or_else(|| self.public_file.clone()),
        }
    }
}

/// Per-call replacements for a generator's defaults
#[derive(Debug, Clone, Default)]
pub struct KeyGenOverrides {
    pub password: Option<String>,
    pub options: Option<KeyOptions>,
    pub private_file: Option<PathBuf>,
    pub public_file: Option<PathBuf>,
}

/// A generated key pair
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub private: RsaPrivateKey,
    pub public: RsaPublicKey,
}

impl KeyPair {
    /// Public half as PKCS1 PEM
    pub fn public_pem(&self) -> Result<String, KeyGenError> {
        Ok(self.public.to_pkcs1_pem(LineEnding::LF)?)
    }
}

/// Generate a key pair and write whichever PEM files were requested
pub fn generate_key_pair(request: &KeyGenRequest) -> Result<KeyPair, KeyGenError> {
    let KeyOptions {
        public_exponent,
        key_size,
    } = request.options;

    info!("Generating {}-bit RSA key (e = {})", key_size, public_exponent);
    let mut rng = OsRng;
    let private =
        RsaPrivateKey::new_with_exp(&mut rng, key_size, &BigUint::from(public_exponent))?;
    let public = RsaPublicKey::from(&private);

    if let Some(path) = &request.private_file {
        let pem = match request.encryption_password() {
            Some(password) => {
                private.to_pkcs8_encrypted_pem(&mut rng, password.as_bytes(), LineEnding::LF)?
            }
            None => private.to_pkcs8_pem(LineEnding::LF)?,
        };
        write_pem(path, pem.as_bytes())?;
        info!(
            "Wrote private key to {} (encrypted: {})",
            path.display(),
            request.encryption_password().is_some()
        );
    }

    if let Some(path) = &request.public_file {
        let pem = public.to_pkcs1_pem(LineEnding::LF)?;
        write_pem(path, pem.as_bytes())?;
        info!("Wrote public key to {}", path.display());
    }

    Ok(KeyPair { private, public })
}

fn write_pem(path: &Path, contents: &[u8]) -> Result<(), KeyGenError> {
    let wrap = |source| KeyGenError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    fs::write(path, contents).map_err(wrap)
}

/// Outcome delivered by `KeyPairGenerator`
#[derive(Debug)]
pub enum KeyGenEvent {
    /// `request` is what was actually written, overrides applied
    Completed { pair: KeyPair, request: KeyGenRequest },
    Failed(KeyGenError),
}

/// Runs key generation off the UI task and reports back over a channel
#[derive(Debug, Clone)]
pub struct KeyPairGenerator {
    defaults: KeyGenRequest,
    events: mpsc::UnboundedSender<KeyGenEvent>,
}

impl KeyPairGenerator {
    pub fn new(defaults: KeyGenRequest) -> (Self, mpsc::UnboundedReceiver<KeyGenEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { defaults, events }, rx)
    }

    pub const fn defaults(&self) -> &KeyGenRequest {
        &self.defaults
    }

    /// Generate with `overrides` applied; every failure is reported as `KeyGenEvent::Failed`
    pub async fn gen_key(&self, overrides: KeyGenOverrides) {
        let request = self.defaults.merged(overrides);
        let job = request.clone();

        let event = match tokio::task::spawn_blocking(move || generate_key_pair(&job)).await {
            Ok(Ok(pair)) => KeyGenEvent::Completed { pair, request },
            Ok(Err(e)) => {
                error!("Key generation failed: {}", e);
                KeyGenEvent::Failed(e)
            }
            Err(e) => {
                error!("Key generation task panicked or was cancelled: {}", e);
                KeyGenEvent::Failed(KeyGenError::Task(e.to_string()))
            }
        };

        if self.events.send(event).is_err() {
            error!("Key generation finished but nobody is listening");
        }
    }
}
