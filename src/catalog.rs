use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandCategory {
    Navigation,
    Agent,
    Mission,
    System,
}

impl CommandCategory {
    pub const ALL: [CommandCategory; 4] = [
        CommandCategory::Navigation,
        CommandCategory::Agent,
        CommandCategory::Mission,
        CommandCategory::System,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CommandCategory::Navigation => "Navigation",
            CommandCategory::Agent => "Agents",
            CommandCategory::Mission => "Missions",
            CommandCategory::System => "System",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Dashboard,
    Agents,
    Tasks,
    Teams,
    MissionControl,
    Integrations,
    Resources,
}

impl Route {
    const ALL: [Route; 7] = [
        Route::Dashboard,
        Route::Agents,
        Route::Tasks,
        Route::Teams,
        Route::MissionControl,
        Route::Integrations,
        Route::Resources,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Route::Dashboard => "dashboard",
            Route::Agents => "agents",
            Route::Tasks => "tasks",
            Route::Teams => "teams",
            Route::MissionControl => "mission-control",
            Route::Integrations => "integrations",
            Route::Resources => "resources",
        }
    }

    fn from_slug(slug: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|route| route.slug() == slug)
    }
}

/// Serialized as its id (`"navigate:agents"`); unrecognized ids map to `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommandAction {
    Navigate(Route),
    SpawnAgent,
    PauseAgents,
    ResumeAgents,
    StartMission,
    AbortMission,
    EmergencyStop,
    SystemStatus,
    ShowHelp,
    Unknown(String),
}

impl CommandAction {
    pub fn from_id(id: &str) -> Self {
        let id = id.trim();
        if let Some(slug) = id.strip_prefix("navigate:") {
            return match Route::from_slug(slug) {
                Some(route) => CommandAction::Navigate(route),
                None => CommandAction::Unknown(id.to_string()),
            };
        }
        match id {
            "agent:spawn" => CommandAction::SpawnAgent,
            "agent:pause-all" => CommandAction::PauseAgents,
            "agent:resume-all" => CommandAction::ResumeAgents,
            "mission:start" => CommandAction::StartMission,
            "mission:abort" => CommandAction::AbortMission,
            "system:emergency-stop" => CommandAction::EmergencyStop,
            "system:status" => CommandAction::SystemStatus,
            "system:help" => CommandAction::ShowHelp,
            other => CommandAction::Unknown(other.to_string()),
        }
    }

    pub fn id(&self) -> String {
        match self {
            CommandAction::Navigate(route) => format!("navigate:{}", route.slug()),
            CommandAction::SpawnAgent => "agent:spawn".to_string(),
            CommandAction::PauseAgents => "agent:pause-all".to_string(),
            CommandAction::ResumeAgents => "agent:resume-all".to_string(),
            CommandAction::StartMission => "mission:start".to_string(),
            CommandAction::AbortMission => "mission:abort".to_string(),
            CommandAction::EmergencyStop => "system:emergency-stop".to_string(),
            CommandAction::SystemStatus => "system:status".to_string(),
            CommandAction::ShowHelp => "system:help".to_string(),
            CommandAction::Unknown(id) => id.clone(),
        }
    }
}

impl From<String> for CommandAction {
    fn from(id: String) -> Self {
        CommandAction::from_id(&id)
    }
}

impl From<CommandAction> for String {
    fn from(action: CommandAction) -> Self {
        action.id()
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCommand {
    pub id: String,
    /// Lowercase trigger phrase, matched as a substring of the transcript.
    pub phrase: String,
    pub action: CommandAction,
    pub category: CommandCategory,
    pub description: String,
}

impl VoiceCommand {
    pub fn new(
        id: impl Into<String>,
        phrase: impl Into<String>,
        action: CommandAction,
        category: CommandCategory,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            phrase: phrase.into().trim().to_lowercase(),
            action,
            category,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandCatalog {
    commands: Vec<VoiceCommand>,
}

impl CommandCatalog {
    pub fn new(commands: Vec<VoiceCommand>) -> Self {
        let commands = commands
            .into_iter()
            .map(|mut command| {
                command.phrase = command.phrase.trim().to_lowercase();
                command
            })
            .collect();
        let catalog = Self { commands };
        for (first, second) in catalog.overlapping_phrases() {
            tracing::warn!(
                first = %first.phrase,
                second = %second.phrase,
                "catalog phrases overlap; the earlier entry wins"
            );
        }
        catalog
    }

    pub fn builtin() -> Self {
        use CommandAction::*;
        use CommandCategory::*;

        Self::new(vec![
            VoiceCommand::new(
                "nav-dashboard",
                "go to dashboard",
                Navigate(Route::Dashboard),
                Navigation,
                "Open the main dashboard",
            ),
            VoiceCommand::new(
                "nav-agents",
                "show agents",
                Navigate(Route::Agents),
                Navigation,
                "Open the agent overview",
            ),
            VoiceCommand::new(
                "nav-tasks",
                "show tasks",
                Navigate(Route::Tasks),
                Navigation,
                "Open the task board",
            ),
            VoiceCommand::new(
                "nav-teams",
                "show teams",
                Navigate(Route::Teams),
                Navigation,
                "Open the team panels",
            ),
            VoiceCommand::new(
                "nav-mission-control",
                "open mission control",
                Navigate(Route::MissionControl),
                Navigation,
                "Open mission control",
            ),
            VoiceCommand::new(
                "nav-integrations",
                "show integrations",
                Navigate(Route::Integrations),
                Navigation,
                "Open the integrations page",
            ),
            VoiceCommand::new(
                "nav-resources",
                "open resources",
                Navigate(Route::Resources),
                Navigation,
                "Browse offline resources",
            ),
            VoiceCommand::new(
                "agent-spawn",
                "create agent",
                SpawnAgent,
                Agent,
                "Spawn a new agent",
            ),
            VoiceCommand::new(
                "agent-pause",
                "pause all agents",
                PauseAgents,
                Agent,
                "Pause every running agent",
            ),
            VoiceCommand::new(
                "agent-resume",
                "resume all agents",
                ResumeAgents,
                Agent,
                "Resume every paused agent",
            ),
            VoiceCommand::new(
                "mission-start",
                "start mission",
                StartMission,
                Mission,
                "Start the selected mission simulation",
            ),
            VoiceCommand::new(
                "mission-abort",
                "abort mission",
                AbortMission,
                Mission,
                "Abort the running mission simulation",
            ),
            VoiceCommand::new(
                "system-emergency-stop",
                "emergency stop",
                EmergencyStop,
                System,
                "Halt all agents and missions immediately",
            ),
            VoiceCommand::new(
                "system-status",
                "system status",
                SystemStatus,
                System,
                "Report platform health",
            ),
            VoiceCommand::new(
                "system-help",
                "what can i say",
                ShowHelp,
                System,
                "List the available voice commands",
            ),
        ])
    }

    pub fn with_extra(extra: impl IntoIterator<Item = VoiceCommand>) -> Self {
        let mut commands = Self::builtin().commands;
        commands.extend(extra);
        Self::new(commands)
    }

    pub fn commands(&self) -> &[VoiceCommand] {
        &self.commands
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VoiceCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&VoiceCommand> {
        self.commands.iter().find(|command| command.id == id)
    }

    pub fn by_category(&self) -> Vec<(CommandCategory, Vec<&VoiceCommand>)> {
        CommandCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let group: Vec<_> = self
                    .commands
                    .iter()
                    .filter(|command| command.category == category)
                    .collect();
                (!group.is_empty()).then_some((category, group))
            })
            .collect()
    }

    /// Pairs `(earlier, later)` where one phrase contains the other; `earlier` wins.
    pub fn overlapping_phrases(&self) -> Vec<(&VoiceCommand, &VoiceCommand)> {
        let matchable: Vec<_> = self
            .commands
            .iter()
            .filter(|command| !command.phrase.is_empty())
            .collect();
        let mut pairs = Vec::new();
        for (index, earlier) in matchable.iter().enumerate() {
            for later in &matchable[index + 1..] {
                if earlier.phrase.contains(&later.phrase)
                    || later.phrase.contains(&earlier.phrase)
                {
                    pairs.push((*earlier, *later));
                }
            }
        }
        pairs
    }
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
