// ABOUTME: Welcome wizard completion tracking
// Decides whether the wizard runs at startup and records when it was finished

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Completion state persisted to disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnboardingConfig {
    /// Whether the wizard has been completed
    #[serde(default)]
    pub completed: bool,

    /// When the wizard was completed (ISO 8601 timestamp)
    #[serde(default)]
    pub completed_at: Option<String>,

    /// Version that completed the wizard
    /// Used to trigger the wizard again on major updates
    #[serde(default = "default_version")]
    pub version: String,

    /// Whether a key pair was generated during the wizard
    #[serde(default)]
    pub generated_keys: bool,

    /// Status code of the last connectivity check, if one ran
    #[serde(default)]
    pub last_connectivity_status: Option<u16>,
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            completed: false,
            completed_at: None,
            version: default_version(),
            generated_keys: false,
            last_connectivity_status: None,
        }
    }
}

impl OnboardingConfig {
    /// `~/.amdr-welcome/config/welcome.toml`
    pub fn config_path() -> Result<PathBuf> {
        Ok(super::base_dir()?.join("config").join("welcome.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read welcome state from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse welcome state from {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directories exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize welcome state")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write welcome state to {}", path.display()))?;

        Ok(())
    }

    /// Mark the wizard as completed
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.completed_at = Some(Utc::now().to_rfc3339());
        self.version = default_version();
    }

    /// True when never completed or the major version changed since
    pub fn needs_welcome(&self) -> bool {
        if !self.completed {
            return true;
        }

        let current_major = env!("CARGO_PKG_VERSION").split('.').next().unwrap_or("0");
        let saved_major = self.version.split('.').next().unwrap_or("0");

        current_major != saved_major
    }

    /// Forget completion so the wizard runs again
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = OnboardingConfig::default();
        assert!(!config.completed);
        assert!(config.completed_at.is_none());
        assert!(config.needs_welcome());
    }

    #[test]
    fn test_mark_completed() {
        let mut config = OnboardingConfig::default();
        config.mark_completed();

        assert!(config.completed);
        assert!(config.completed_at.is_some());
        assert!(!config.needs_welcome());
    }

    #[test]
    fn test_major_version_change_reruns_wizard() {
        let mut config = OnboardingConfig::default();
        config.mark_completed();
        config.version = "999.0.0".to_string();
        assert!(config.needs_welcome());
    }

    #[test]
    fn test_reset() {
        let mut config = OnboardingConfig::default();
        config.mark_completed();
        config.generated_keys = true;

        config.reset();

        assert!(!config.completed);
        assert!(!config.generated_keys);
    }

    #[test]
    fn test_persisted_state_survives_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("welcome.toml");

        let mut config = OnboardingConfig::default();
        config.mark_completed();
        config.last_connectivity_status = Some(200);
        config.save_to(&path).unwrap();

        let loaded = OnboardingConfig::load_from(&path).unwrap();
        assert!(loaded.completed);
        assert_eq!(loaded.last_connectivity_status, Some(200));
    }
}
