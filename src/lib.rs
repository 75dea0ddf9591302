pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod matcher;
pub mod model;
pub mod provider;
pub mod settings;
pub mod state_machine;
pub mod store;

pub use catalog::{CommandAction, CommandCatalog, CommandCategory, Route, VoiceCommand};
pub use dispatcher::{ActionHandler, DispatchOutcome, Dispatcher, LoggingActionHandler};
pub use error::RecognitionError;
pub use matcher::CommandMatcher;
pub use model::{CommandHistory, ExecutedCommand, SessionPhase, VoiceSession};
pub use provider::{
    NullAdapter, RecognitionAdapter, RecognitionBatch, RecognitionConfig, RecognitionEvent,
    RecognitionResult, RecognitionSink, SimulatedAdapter, SimulatedMicrophone,
};
pub use settings::VoiceSettings;
pub use state_machine::VoiceCommandSession;
pub use store::SettingsStore;
