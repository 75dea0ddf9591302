use std::{
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use agent_deck_voice::{
    Dispatcher, RecognitionError, SettingsStore, SimulatedAdapter, SimulatedMicrophone,
    VoiceCommandSession, VoiceSettings,
};

#[derive(Parser)]
#[command(name = "deck-voice", about = "Voice command console for the agent deck")]
struct Cli {
    /// Voice settings file
    #[arg(long, env = "DECK_VOICE_SETTINGS", default_value = "deck-voice.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the recognized phrases
    Commands {
        #[arg(long)]
        json: bool,
    },
    /// Type transcripts on stdin as if spoken
    Listen,
    /// Turn voice control on or off
    Enable {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = SettingsStore::new(cli.settings);
    let settings = store.load()?;

    match cli.command {
        Command::Commands { json } => {
            let catalog = settings.catalog();
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.commands())?);
                return Ok(());
            }
            for (category, commands) in catalog.by_category() {
                println!("{}", category.label());
                for command in commands {
                    println!("  \"{}\"  {}", command.phrase, command.description);
                }
            }
        }
        Command::Enable { enabled } => {
            let settings = VoiceSettings {
                enabled,
                ..settings
            };
            store.save(&settings)?;
            println!("voice control {}", if enabled { "enabled" } else { "disabled" });
        }
        Command::Listen => {
            let (adapter, mic) = SimulatedAdapter::new();
            let mut session =
                VoiceCommandSession::new(settings, Box::new(adapter), Dispatcher::default());
            session.start();
            print_state(&session);
            listen(&mut session, &mic)?;
        }
    }

    Ok(())
}

/// Plain lines are final transcripts, `~text` is interim, `:start`, `:stop`,
/// `:end`, `:error <code>`, `:history` and `:quit` drive the session.
fn listen(session: &mut VoiceCommandSession, mic: &SimulatedMicrophone) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed reading stdin")?;
        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) => break,
            (":start", _) => {
                session.start();
            }
            (":stop", _) => session.stop(),
            (":end", _) => {
                mic.end();
            }
            (":error", code) => {
                mic.fail(RecognitionError::from_code(code));
            }
            (":history", _) => {
                for entry in session.history().iter() {
                    println!(
                        "{}  {:>3}%  {}",
                        entry.timestamp.format("%H:%M:%S"),
                        entry.confidence,
                        entry.command.phrase
                    );
                }
                continue;
            }
            _ if line.is_empty() => continue,
            _ => match line.strip_prefix('~') {
                Some(interim) => {
                    mic.interim(interim, 0.5);
                }
                None => {
                    mic.final_result(line, 0.9);
                }
            },
        }
        session.pump();
        print_state(session);
    }
    Ok(())
}

fn print_state(session: &VoiceCommandSession) {
    let state = session.session();
    println!(
        "[{}] transcript={:?} last={} confidence={:.2}",
        session.phase().label(),
        state.current_transcript,
        state.last_command.as_deref().unwrap_or("-"),
        state.confidence
    );
}
