use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::settings::VoiceSettings;

/// JSON file holding the persisted [`VoiceSettings`].
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn load(&self) -> Result<VoiceSettings> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no voice settings file; using defaults");
            return Ok(VoiceSettings::default());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed reading settings file {}", self.path.display()))?;
        let settings: VoiceSettings =
            serde_json::from_str(&raw).context("failed parsing voice settings json")?;
        Ok(settings)
    }

    pub fn save(&self, settings: &VoiceSettings) -> Result<()> {
        let Some(parent) = self.path.parent() else {
            anyhow::bail!("settings path has no parent")
        };
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed creating {}", parent.display()))?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)
            .with_context(|| format!("failed writing settings file {}", self.path.display()))?;
        Ok(())
    }
}
