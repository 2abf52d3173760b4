//! Line-oriented command surface.
//!
//! Input lines parse into a closed [`Command`] enum before anything touches
//! state; unknown verbs and bad arguments fail at the parse step with no
//! state change. Every command error is recovered at this boundary—the
//! process only exits via `exit` or an interrupt.

pub mod render;

use std::path::PathBuf;

use thiserror::Error;

use crate::models::RegistryError;
use crate::store::{SharedRegistry, Store};

/// Everything the tracker understands at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a new session, ending the current one if it is still open.
    New,
    /// Assign incident tasks to the active session.
    Incidents { count: u64 },
    /// Assign catalog tasks to the active session.
    Catalog { count: u64 },
    /// Toggle the active session's break state.
    ToggleBreak,
    /// End the active session.
    End,
    /// Show the active session's timing, counters, and breaks.
    SessionStatus,
    /// List all sessions with the active marker.
    SessionList,
    /// Make the session with this 1-based ordinal active.
    SessionSwitch { ordinal: usize },
    /// Append to the active session's log, or dump it when no message.
    Log { message: Option<String> },
    /// Save a snapshot, to `path` or the default.
    Save { path: Option<PathBuf> },
    /// Load a snapshot, replacing the in-memory registry wholesale.
    Load { path: Option<PathBuf> },
    Help,
    Exit,
}

/// Why a command was refused. None of these are fatal; the loop continues.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("invalid command: {0:?}")]
    InvalidCommand(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("persistence error: {0:#}")]
    Persistence(#[from] anyhow::Error),
}

impl Command {
    /// Parse one input line. Empty lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (trimmed, ""),
        };

        let command = match verb {
            "new" => Self::expect_no_args(Command::New, verb, rest)?,
            "inc" => Command::Incidents {
                count: Self::parse_count(rest)?,
            },
            "cat" => Command::Catalog {
                count: Self::parse_count(rest)?,
            },
            "break" => Self::expect_no_args(Command::ToggleBreak, verb, rest)?,
            "end" => Self::expect_no_args(Command::End, verb, rest)?,
            "session" => match rest {
                "" => Command::SessionStatus,
                "list" => Command::SessionList,
                other => Command::SessionSwitch {
                    ordinal: other.parse().map_err(|_| {
                        CommandError::InvalidArgument(format!("invalid session: {other:?}"))
                    })?,
                },
            },
            "log" => Command::Log {
                message: (!rest.is_empty()).then(|| rest.to_string()),
            },
            "save" => Command::Save {
                path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
            },
            "load" => Command::Load {
                path: (!rest.is_empty()).then(|| PathBuf::from(rest)),
            },
            "help" => Self::expect_no_args(Command::Help, verb, rest)?,
            "exit" => Self::expect_no_args(Command::Exit, verb, rest)?,
            unknown => return Err(CommandError::InvalidCommand(unknown.to_string())),
        };
        Ok(Some(command))
    }

    /// Task count argument: defaults to 1, must be a non-negative integer.
    fn parse_count(rest: &str) -> Result<u64, CommandError> {
        if rest.is_empty() {
            return Ok(1);
        }
        rest.parse().map_err(|_| {
            CommandError::InvalidArgument(format!("invalid count: {rest:?}"))
        })
    }

    fn expect_no_args(command: Command, verb: &str, rest: &str) -> Result<Command, CommandError> {
        if rest.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::InvalidArgument(format!(
                "'{verb}' takes no arguments"
            )))
        }
    }
}

/// Whether the loop should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit,
}

/// Executes parsed commands against the shared registry.
pub struct Repl {
    registry: SharedRegistry,
    store: Store,
}

impl Repl {
    pub fn new(registry: SharedRegistry, store: Store) -> Self {
        Self { registry, store }
    }

    /// Parse and execute one line, printing output and recovered errors.
    pub fn handle_line(&self, line: &str) -> Outcome {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Outcome::Continue,
            Err(e) => {
                println!("[Error] {e}");
                return Outcome::Continue;
            }
        };
        if command == Command::Exit {
            return Outcome::Exit;
        }
        match self.execute(command) {
            Ok(output) if output.is_empty() => {}
            Ok(output) => println!("{output}"),
            Err(e) => println!("[Error] {e}"),
        }
        Outcome::Continue
    }

    /// Execute one command, returning its rendered output.
    pub fn execute(&self, command: Command) -> Result<String, CommandError> {
        match command {
            Command::New => {
                let mut registry = self.registry.write().expect("registry lock poisoned");
                let id = registry.create_session();
                tracing::info!(session = id, "created session");
                Ok(format!("New session created: Session {id}"))
            }
            Command::Incidents { count } => {
                let mut registry = self.registry.write().expect("registry lock poisoned");
                let roster = registry.roster().clone();
                let shares = registry
                    .active_session_mut()?
                    .assign_incidents(&roster, count)
                    .map_err(RegistryError::from)?;
                Ok(render::assignments("Incident Assignments", &shares))
            }
            Command::Catalog { count } => {
                let mut registry = self.registry.write().expect("registry lock poisoned");
                let roster = registry.roster().clone();
                let shares = registry
                    .active_session_mut()?
                    .assign_catalog(&roster, count)
                    .map_err(RegistryError::from)?;
                Ok(render::assignments("Catalog Assignments", &shares))
            }
            Command::ToggleBreak => {
                let mut registry = self.registry.write().expect("registry lock poisoned");
                let session = registry.active_session_mut()?;
                if session.on_break {
                    session.end_break();
                    Ok("Break ended!".to_string())
                } else {
                    session.start_break().map_err(RegistryError::from)?;
                    Ok("Break started!".to_string())
                }
            }
            Command::End => {
                let mut registry = self.registry.write().expect("registry lock poisoned");
                registry.active_session_mut()?.end();
                Ok("Current session ended!".to_string())
            }
            Command::SessionStatus => {
                let registry = self.registry.read().expect("registry lock poisoned");
                let session = registry.active_session()?;
                Ok(render::session_status(session, registry.roster()))
            }
            Command::SessionList => {
                let registry = self.registry.read().expect("registry lock poisoned");
                Ok(render::session_list(&registry))
            }
            Command::SessionSwitch { ordinal } => {
                let mut registry = self.registry.write().expect("registry lock poisoned");
                let session = registry.set_active(ordinal)?;
                Ok(format!("[Info] Active session set to: Session {}", session.id))
            }
            Command::Log { message: Some(message) } => {
                let mut registry = self.registry.write().expect("registry lock poisoned");
                registry.active_session_mut()?.log.append(message);
                Ok(String::new())
            }
            Command::Log { message: None } => {
                let registry = self.registry.read().expect("registry lock poisoned");
                Ok(render::session_log(&registry.active_session()?.log))
            }
            Command::Save { path } => {
                let store = match path {
                    Some(path) => Store::new(path),
                    None => self.store.clone(),
                };
                let view = self.registry.read().expect("registry lock poisoned").clone();
                store.save(&view)?;
                Ok(format!("[Info] Saved to: {}", store.path().display()))
            }
            Command::Load { path } => {
                let store = match path {
                    Some(path) => Store::new(path),
                    None => self.store.clone(),
                };
                let loaded = store.load()?;
                *self.registry.write().expect("registry lock poisoned") = loaded;
                Ok(format!("[Info] Loaded from: {}", store.path().display()))
            }
            Command::Help => Ok(render::help().to_string()),
            Command::Exit => Ok(String::new()),
        }
    }
}
