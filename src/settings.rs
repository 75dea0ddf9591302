use serde::{Deserialize, Serialize};

use crate::{
    catalog::{CommandCatalog, VoiceCommand},
    model::DEFAULT_HISTORY_LIMIT,
    provider::RecognitionConfig,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    /// Voice control toggle; `start` is a no-op while disabled.
    pub enabled: bool,
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
    pub history_limit: usize,
    /// Appended after the built-in catalog.
    pub custom_commands: Vec<VoiceCommand>,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
            history_limit: DEFAULT_HISTORY_LIMIT,
            custom_commands: Vec::new(),
        }
    }
}

impl VoiceSettings {
    pub fn recognition_config(&self) -> RecognitionConfig {
        RecognitionConfig {
            language: self.language.clone(),
            continuous: self.continuous,
            interim_results: self.interim_results,
        }
    }

    pub fn catalog(&self) -> CommandCatalog {
        if self.custom_commands.is_empty() {
            CommandCatalog::builtin()
        } else {
            CommandCatalog::with_extra(self.custom_commands.iter().cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let settings: VoiceSettings =
            serde_json::from_str(r#"{"enabled": false, "language": "en-GB"}"#).expect("parse");
        assert!(!settings.enabled);
        assert_eq!(settings.recognition_config().language, "en-GB");
        assert_eq!(settings.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(settings.recognition_config().continuous);
    }

    #[test]
    fn custom_commands_extend_catalog() {
        let settings: VoiceSettings = serde_json::from_str(
            r#"{"custom_commands": [{
                "id": "probe",
                "phrase": "launch probe",
                "action": "mission:start",
                "category": "mission",
                "description": "Start the probe mission"
            }]}"#,
        )
        .expect("parse");
        let catalog = settings.catalog();
        assert_eq!(catalog.len(), CommandCatalog::builtin().len() + 1);
        assert!(catalog.get("probe").is_some());
    }
}
