use anyhow::Result;

use crate::catalog::CommandAction;

/// Effects behind matched voice commands.
pub trait ActionHandler: Send {
    fn handle(&mut self, action: &CommandAction) -> Result<()>;
}

/// Handler with no backend; every effect is logged only.
#[derive(Default)]
pub struct LoggingActionHandler;

impl ActionHandler for LoggingActionHandler {
    fn handle(&mut self, action: &CommandAction) -> Result<()> {
        match action {
            CommandAction::Navigate(route) => {
                tracing::info!(route = route.slug(), "navigating");
            }
            CommandAction::SpawnAgent => tracing::info!("spawning agent"),
            CommandAction::PauseAgents => tracing::info!("pausing all agents"),
            CommandAction::ResumeAgents => tracing::info!("resuming all agents"),
            CommandAction::StartMission => tracing::info!("starting mission"),
            CommandAction::AbortMission => tracing::info!("aborting mission"),
            CommandAction::EmergencyStop => tracing::warn!("emergency stop requested"),
            CommandAction::SystemStatus => tracing::info!("reporting system status"),
            CommandAction::ShowHelp => tracing::info!("showing voice command help"),
            CommandAction::Unknown(id) => tracing::debug!(action = %id, "no effect for action"),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    /// The action id names no known effect.
    Ignored,
    /// The handler returned an error; it was logged.
    Failed,
}

pub struct Dispatcher {
    handler: Box<dyn ActionHandler>,
}

impl Dispatcher {
    pub fn new(handler: Box<dyn ActionHandler>) -> Self {
        Self { handler }
    }

    pub fn execute(&mut self, action: &CommandAction) -> DispatchOutcome {
        if let CommandAction::Unknown(id) = action {
            tracing::warn!(action = %id, "unknown voice action ignored");
            return DispatchOutcome::Ignored;
        }

        match self.handler.handle(action) {
            Ok(()) => {
                tracing::debug!(%action, "voice action dispatched");
                DispatchOutcome::Handled
            }
            Err(err) => {
                tracing::error!(%action, error = %format!("{err:#}"), "voice action failed");
                DispatchOutcome::Failed
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Box::new(LoggingActionHandler))
    }
}
