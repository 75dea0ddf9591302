use std::{collections::VecDeque, sync::mpsc::Receiver};

use chrono::Utc;

use crate::{
    catalog::CommandCatalog,
    dispatcher::Dispatcher,
    matcher::CommandMatcher,
    model::{CommandHistory, ExecutedCommand, SessionPhase, VoiceSession},
    provider::{
        RecognitionAdapter, RecognitionBatch, RecognitionEvent, RecognitionSink, Transcripts,
    },
    settings::VoiceSettings,
};

/// Work items in arrival order. A final transcript is matched in its own
/// step, so the session is observably `Processing` in between.
enum Step {
    Recognition { run: u64, event: RecognitionEvent },
    Resolve { transcript: String, confidence: f32 },
}

/// Adapter callbacks are queued and applied by `step` / `pump` on the owner's
/// event loop. Dropping the session stops the adapter.
pub struct VoiceCommandSession {
    session: VoiceSession,
    settings: VoiceSettings,
    catalog: CommandCatalog,
    history: CommandHistory,
    adapter: Box<dyn RecognitionAdapter>,
    dispatcher: Dispatcher,
    events: Option<Receiver<RecognitionEvent>>,
    queue: VecDeque<Step>,
    run: u64,
    outstanding: usize,
}

impl VoiceCommandSession {
    pub fn new(
        settings: VoiceSettings,
        adapter: Box<dyn RecognitionAdapter>,
        dispatcher: Dispatcher,
    ) -> Self {
        let catalog = settings.catalog();
        Self::with_catalog(settings, catalog, adapter, dispatcher)
    }

    pub fn with_catalog(
        settings: VoiceSettings,
        catalog: CommandCatalog,
        adapter: Box<dyn RecognitionAdapter>,
        dispatcher: Dispatcher,
    ) -> Self {
        Self {
            session: VoiceSession::default(),
            history: CommandHistory::with_capacity(settings.history_limit),
            settings,
            catalog,
            adapter,
            dispatcher,
            events: None,
            queue: VecDeque::new(),
            run: 0,
            outstanding: 0,
        }
    }

    pub fn session(&self) -> &VoiceSession {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    pub fn is_supported(&self) -> bool {
        self.adapter.is_supported()
    }

    pub fn adapter_name(&self) -> &'static str {
        self.adapter.display_name()
    }

    /// Returns whether a new recognition stream was opened.
    pub fn start(&mut self) -> bool {
        if !self.settings.enabled {
            tracing::debug!("voice control disabled; start ignored");
            return false;
        }
        if !self.adapter.is_supported() {
            tracing::debug!(
                adapter = self.adapter.display_name(),
                "speech recognition unsupported"
            );
            return false;
        }
        if self.session.is_listening {
            return false;
        }

        let (sink, rx) = RecognitionSink::channel();
        if let Err(err) = self.adapter.start(&self.settings.recognition_config(), sink) {
            tracing::warn!(code = err.code(), error = %err, "failed to start speech recognition");
            return false;
        }

        self.run += 1;
        self.events = Some(rx);
        self.session.is_listening = true;
        tracing::info!(
            adapter = self.adapter.display_name(),
            language = %self.settings.language,
            "voice control listening"
        );
        true
    }

    /// Ask the adapter to stop. The session stays listening until the
    /// adapter reports the end.
    pub fn stop(&mut self) {
        if !self.session.is_listening {
            return;
        }
        tracing::debug!("stopping speech recognition");
        self.adapter.stop();
    }

    pub fn toggle(&mut self) {
        if self.session.is_listening {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Turn voice control on or off. Disabling stops an active stream.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.settings.enabled = enabled;
        if !enabled {
            self.stop();
        }
    }

    /// Apply the oldest pending event. Returns false when nothing was pending.
    pub fn step(&mut self) -> bool {
        self.drain_adapter();
        let Some(step) = self.queue.pop_front() else {
            return false;
        };

        match step {
            Step::Recognition { run, event } => self.apply(run, event),
            Step::Resolve {
                transcript,
                confidence,
            } => self.resolve(&transcript, confidence),
        }
        true
    }

    /// Apply every pending event, including ones queued while applying.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while self.step() {
            applied += 1;
        }
        applied
    }

    fn drain_adapter(&mut self) {
        if let Some(rx) = &self.events {
            let run = self.run;
            self.queue
                .extend(rx.try_iter().map(|event| Step::Recognition { run, event }));
        }
    }

    fn apply(&mut self, run: u64, event: RecognitionEvent) {
        if run != self.run {
            tracing::trace!(run, "dropping event from a previous recognition run");
            return;
        }

        match event {
            RecognitionEvent::Result(batch) => {
                if self.session.is_listening {
                    self.on_result(&batch);
                }
            }
            RecognitionEvent::Error(err) => {
                tracing::warn!(code = err.code(), error = %err, "speech recognition error");
                self.session.is_listening = false;
                self.session.is_processing = false;
                self.outstanding = 0;
                self.queue.retain(|step| !matches!(step, Step::Resolve { .. }));
                self.events = None;
            }
            RecognitionEvent::Ended => {
                if self.session.is_listening {
                    tracing::debug!("speech recognition ended");
                }
                self.session.is_listening = false;
                self.events = None;
            }
        }
    }

    fn on_result(&mut self, batch: &RecognitionBatch) {
        let Transcripts {
            interim,
            final_text,
        } = batch.transcripts();
        if let Some(confidence) = batch.confidence() {
            self.session.confidence = confidence;
        }

        if !final_text.is_empty() {
            tracing::debug!(transcript = %final_text, "final transcript");
            self.session.current_transcript = final_text.clone();
            self.session.is_processing = true;
            self.outstanding += 1;
            self.queue.push_back(Step::Resolve {
                transcript: final_text,
                confidence: self.session.confidence,
            });
        } else if !interim.is_empty() {
            self.session.current_transcript = interim;
        }
    }

    fn resolve(&mut self, transcript: &str, confidence: f32) {
        self.outstanding = self.outstanding.saturating_sub(1);
        self.session.is_processing = self.outstanding > 0;
        // A newer interim may have replaced the text being resolved.
        if self.session.current_transcript == transcript {
            self.session.current_transcript.clear();
        }

        let Some(command) = CommandMatcher::new(&self.catalog).find(transcript).cloned() else {
            tracing::debug!(transcript, "no voice command matched");
            return;
        };

        tracing::info!(
            command = %command.id,
            phrase = %command.phrase,
            confidence,
            "voice command recognized"
        );
        self.session.last_command = Some(command.phrase.clone());
        let action = command.action.clone();
        self.history
            .record(ExecutedCommand::new(command, confidence, Utc::now()));
        self.dispatcher.execute(&action);
    }
}

impl Drop for VoiceCommandSession {
    fn drop(&mut self) {
        if self.events.is_some() {
            self.adapter.stop();
        }
    }
}
