use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::VoiceCommand;

pub const DEFAULT_HISTORY_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Listening,
    Processing,
}

impl SessionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Listening => "Listening",
            SessionPhase::Processing => "Processing",
        }
    }
}

/// Observable state of one voice session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VoiceSession {
    pub is_listening: bool,
    pub is_processing: bool,
    pub current_transcript: String,
    /// Phrase of the most recently matched command.
    pub last_command: Option<String>,
    pub confidence: f32,
}

impl VoiceSession {
    pub fn phase(&self) -> SessionPhase {
        if self.is_processing {
            SessionPhase::Processing
        } else if self.is_listening {
            SessionPhase::Listening
        } else {
            SessionPhase::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedCommand {
    #[serde(flatten)]
    pub command: VoiceCommand,
    /// Recognition confidence as a percentage.
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
}

impl ExecutedCommand {
    pub fn new(command: VoiceCommand, confidence: f32, timestamp: DateTime<Utc>) -> Self {
        Self {
            command,
            confidence: confidence_percent(confidence),
            timestamp,
        }
    }
}

pub fn confidence_percent(confidence: f32) -> u8 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Recently executed commands, newest first.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<ExecutedCommand>,
    capacity: usize,
}

impl CommandHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, entry: ExecutedCommand) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExecutedCommand> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&ExecutedCommand> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::CommandCatalog;

    #[test]
    fn default_session_is_idle() {
        let session = VoiceSession::default();
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.current_transcript.is_empty());
        assert_eq!(session.last_command, None);
    }

    #[test]
    fn processing_takes_precedence_over_listening() {
        let session = VoiceSession {
            is_listening: true,
            is_processing: true,
            ..VoiceSession::default()
        };
        assert_eq!(session.phase().label(), "Processing");
    }

    #[test]
    fn history_evicts_oldest_beyond_capacity() {
        let catalog = CommandCatalog::builtin();
        let mut history = CommandHistory::default();
        for command in catalog.iter().take(7) {
            history.record(ExecutedCommand::new(command.clone(), 0.9, Utc::now()));
        }
        let ids: Vec<_> = history.iter().map(|e| e.command.id.as_str()).collect();
        let expected: Vec<_> = catalog.commands()[..7]
            .iter()
            .skip(2)
            .rev()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn confidence_becomes_percentage() {
        assert_eq!(confidence_percent(0.874), 87);
        assert_eq!(confidence_percent(1.0), 100);
        assert_eq!(confidence_percent(1.4), 100);
    }

    #[test]
    fn executed_command_serializes_flat() {
        let command = CommandCatalog::builtin().commands()[1].clone();
        let entry = ExecutedCommand::new(command, 0.5, Utc::now());
        let value = serde_json::to_value(&entry).expect("serialize entry");
        assert_eq!(value["phrase"], "show agents");
        assert_eq!(value["confidence"], 50);
    }
}
