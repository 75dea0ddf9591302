use std::sync::{mpsc, Arc, Mutex, MutexGuard};

use crate::error::RecognitionError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionConfig {
    pub language: String,
    pub continuous: bool,
    pub interim_results: bool,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
    /// Confidence of the transcription (0.0 to 1.0)
    pub confidence: f32,
}

impl RecognitionResult {
    pub fn new(transcript: impl Into<String>, is_final: bool, confidence: f32) -> Self {
        Self {
            transcript: transcript.into(),
            is_final,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn interim(transcript: impl Into<String>, confidence: f32) -> Self {
        Self::new(transcript, false, confidence)
    }

    pub fn final_result(transcript: impl Into<String>, confidence: f32) -> Self {
        Self::new(transcript, true, confidence)
    }
}

/// One recognizer callback; results before `result_index` are already settled.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognitionBatch {
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcripts {
    pub interim: String,
    pub final_text: String,
}

impl RecognitionBatch {
    pub fn new(result_index: usize, results: Vec<RecognitionResult>) -> Self {
        Self {
            result_index,
            results,
        }
    }

    pub fn single(result: RecognitionResult) -> Self {
        Self::new(0, vec![result])
    }

    fn fresh(&self) -> &[RecognitionResult] {
        self.results.get(self.result_index..).unwrap_or(&[])
    }

    pub fn transcripts(&self) -> Transcripts {
        let mut out = Transcripts::default();
        for result in self.fresh() {
            if result.is_final {
                out.final_text.push_str(&result.transcript);
            } else {
                out.interim.push_str(&result.transcript);
            }
        }
        out
    }

    pub fn confidence(&self) -> Option<f32> {
        self.fresh().first().map(|result| result.confidence)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Result(RecognitionBatch),
    Error(RecognitionError),
    /// The recognizer stopped listening (silence timeout or after `stop`).
    Ended,
}

#[derive(Debug, Clone)]
pub struct RecognitionSink {
    tx: mpsc::Sender<RecognitionEvent>,
}

impl RecognitionSink {
    pub fn channel() -> (Self, mpsc::Receiver<RecognitionEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: RecognitionEvent) -> bool {
        if self.tx.send(event).is_err() {
            tracing::trace!("recognition event dropped; session disposed");
            return false;
        }
        true
    }
}

pub trait RecognitionAdapter: Send {
    fn display_name(&self) -> &'static str;
    fn is_supported(&self) -> bool;
    fn start(
        &mut self,
        config: &RecognitionConfig,
        sink: RecognitionSink,
    ) -> Result<(), RecognitionError>;
    /// Advisory; the adapter eventually emits [`RecognitionEvent::Ended`].
    fn stop(&mut self);
}

#[derive(Default)]
pub struct NullAdapter;

impl RecognitionAdapter for NullAdapter {
    fn display_name(&self) -> &'static str {
        "Unavailable"
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn start(
        &mut self,
        _config: &RecognitionConfig,
        _sink: RecognitionSink,
    ) -> Result<(), RecognitionError> {
        Err(RecognitionError::Unsupported)
    }

    fn stop(&mut self) {}
}

#[derive(Debug, Default)]
struct SimulatedState {
    sink: Option<RecognitionSink>,
    config: Option<RecognitionConfig>,
    starts: usize,
    refuse_with: Option<RecognitionError>,
}

/// Scripted speech source; pair with a [`SimulatedMicrophone`] to feed it.
pub struct SimulatedAdapter {
    state: Arc<Mutex<SimulatedState>>,
}

#[derive(Clone)]
pub struct SimulatedMicrophone {
    state: Arc<Mutex<SimulatedState>>,
}

fn lock(state: &Mutex<SimulatedState>) -> MutexGuard<'_, SimulatedState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl SimulatedAdapter {
    pub fn new() -> (Self, SimulatedMicrophone) {
        let state = Arc::new(Mutex::new(SimulatedState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            SimulatedMicrophone { state },
        )
    }
}

impl RecognitionAdapter for SimulatedAdapter {
    fn display_name(&self) -> &'static str {
        "Simulated microphone"
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn start(
        &mut self,
        config: &RecognitionConfig,
        sink: RecognitionSink,
    ) -> Result<(), RecognitionError> {
        let mut state = lock(&self.state);
        if let Some(err) = state.refuse_with.take() {
            return Err(err);
        }
        state.starts += 1;
        state.config = Some(config.clone());
        state.sink = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        // The recognizer acknowledges a stop later, through the sink.
        if let Some(sink) = lock(&self.state).sink.take() {
            sink.emit(RecognitionEvent::Ended);
        }
    }
}

impl SimulatedMicrophone {
    fn emit(&self, event: RecognitionEvent) -> bool {
        let state = lock(&self.state);
        match &state.sink {
            Some(sink) => sink.emit(event),
            None => false,
        }
    }

    pub fn batch(&self, batch: RecognitionBatch) -> bool {
        self.emit(RecognitionEvent::Result(batch))
    }

    pub fn interim(&self, text: &str, confidence: f32) -> bool {
        self.batch(RecognitionBatch::single(RecognitionResult::interim(text, confidence)))
    }

    pub fn final_result(&self, text: &str, confidence: f32) -> bool {
        self.batch(RecognitionBatch::single(RecognitionResult::final_result(
            text, confidence,
        )))
    }

    /// Error followed by end, as platform recognizers do.
    pub fn fail(&self, err: RecognitionError) -> bool {
        let sent = self.emit(RecognitionEvent::Error(err));
        self.end();
        sent
    }

    pub fn end(&self) -> bool {
        let sent = self.emit(RecognitionEvent::Ended);
        lock(&self.state).sink = None;
        sent
    }

    pub fn refuse_next_start(&self, err: RecognitionError) {
        lock(&self.state).refuse_with = Some(err);
    }

    pub fn start_count(&self) -> usize {
        lock(&self.state).starts
    }

    pub fn is_active(&self) -> bool {
        lock(&self.state).sink.is_some()
    }

    pub fn last_config(&self) -> Option<RecognitionConfig> {
        lock(&self.state).config.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn splits_interim_and_final_from_result_index() {
        let batch = RecognitionBatch::new(
            1,
            vec![
                RecognitionResult::final_result("already settled ", 0.9),
                RecognitionResult::final_result("show ", 0.8),
                RecognitionResult::final_result("agents", 0.7),
                RecognitionResult::interim("and", 0.2),
                RecognitionResult::interim(" then", 0.1),
            ],
        );
        assert_eq!(
            batch.transcripts(),
            Transcripts {
                interim: "and then".to_string(),
                final_text: "show agents".to_string(),
            }
        );
        assert_eq!(batch.confidence(), Some(0.8));
    }

    #[test]
    fn out_of_range_index_yields_nothing() {
        let batch = RecognitionBatch::new(3, vec![RecognitionResult::interim("x", 0.5)]);
        assert_eq!(batch.transcripts(), Transcripts::default());
        assert_eq!(batch.confidence(), None);
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(RecognitionResult::interim("x", 1.7).confidence, 1.0);
        assert_eq!(RecognitionResult::interim("x", -0.2).confidence, 0.0);
    }

    #[test]
    fn sink_reports_disposed_session() {
        let (sink, rx) = RecognitionSink::channel();
        assert!(sink.emit(RecognitionEvent::Ended));
        drop(rx);
        assert!(!sink.emit(RecognitionEvent::Ended));
    }

    #[test]
    fn null_adapter_is_unsupported() {
        let mut adapter = NullAdapter;
        let (sink, _rx) = RecognitionSink::channel();
        assert!(!adapter.is_supported());
        assert_eq!(
            adapter.start(&RecognitionConfig::default(), sink),
            Err(RecognitionError::Unsupported)
        );
    }

    #[test]
    fn simulated_stop_acknowledges_through_sink() {
        let (mut adapter, mic) = SimulatedAdapter::new();
        let (sink, rx) = RecognitionSink::channel();
        adapter
            .start(&RecognitionConfig::default(), sink)
            .expect("start simulated adapter");
        assert!(mic.is_active());
        assert!(mic.interim("show", 0.4));
        adapter.stop();
        assert!(!mic.is_active());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], RecognitionEvent::Ended);
    }

    #[test]
    fn microphone_is_silent_before_start() {
        let (_adapter, mic) = SimulatedAdapter::new();
        assert!(!mic.final_result("show agents", 0.9));
        assert_eq!(mic.start_count(), 0);
    }
}
