use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::roster::Roster;
use super::session::{Session, SessionError};

/// Operations rejected by the session directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("no active session; run 'new' to start one")]
    NoActiveSession,

    #[error("no such session: {0}")]
    InvalidSessionReference(usize),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Ordered directory of every session ever created, plus the active pointer.
///
/// Sessions are append-only; ids are exactly `1..=len` in creation order and
/// are never reused. Exactly one session is active for command routing at a
/// time (none before the first `new`), independent of whether that session
/// has ended—users may switch back to an ended session to inspect it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registry {
    roster: Roster,
    #[serde(default)]
    sessions: Vec<Session>,
    #[serde(default)]
    active: Option<usize>,
}

impl Registry {
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            sessions: Vec::new(),
            active: None,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Start a new session and make it active. An unended active session is
    /// ended first, so at most one session is ever open for new work.
    pub fn create_session(&mut self) -> u64 {
        if let Some(idx) = self.active {
            if !self.sessions[idx].ended {
                self.sessions[idx].end();
            }
        }
        let id = self.sessions.len() as u64 + 1;
        self.sessions.push(Session::new(id, self.roster.len()));
        self.active = Some(self.sessions.len() - 1);
        id
    }

    /// Switch the active pointer to the session with 1-based `ordinal`.
    /// Touches nothing but the pointer; the target session's own state
    /// (ended, on break) is left exactly as it was.
    pub fn set_active(&mut self, ordinal: usize) -> Result<&Session, RegistryError> {
        if ordinal == 0 || ordinal > self.sessions.len() {
            return Err(RegistryError::InvalidSessionReference(ordinal));
        }
        self.active = Some(ordinal - 1);
        Ok(&self.sessions[ordinal - 1])
    }

    pub fn active_session(&self) -> Result<&Session, RegistryError> {
        self.active
            .and_then(|idx| self.sessions.get(idx))
            .ok_or(RegistryError::NoActiveSession)
    }

    pub fn active_session_mut(&mut self) -> Result<&mut Session, RegistryError> {
        let idx = self.active.ok_or(RegistryError::NoActiveSession)?;
        self.sessions
            .get_mut(idx)
            .ok_or(RegistryError::NoActiveSession)
    }

    /// Sessions in creation order, each flagged with whether it is active.
    pub fn list(&self) -> impl Iterator<Item = (&Session, bool)> {
        let active = self.active;
        self.sessions
            .iter()
            .enumerate()
            .map(move |(i, s)| (s, Some(i) == active))
    }

    /// Structural checks applied to a decoded snapshot before it replaces
    /// the live registry: id sequence, active pointer range, distributor
    /// counter consistency against the snapshot's roster.
    pub fn validate(&self) -> anyhow::Result<()> {
        let roster_len = self.roster.len();
        for (i, session) in self.sessions.iter().enumerate() {
            if session.id != i as u64 + 1 {
                anyhow::bail!(
                    "session at position {} has id {}, expected {}",
                    i,
                    session.id,
                    i + 1
                );
            }
            if !session.catalog.is_consistent(roster_len)
                || !session.incidents.is_consistent(roster_len)
            {
                anyhow::bail!("session {} has counters inconsistent with the roster", session.id);
            }
            // on_break holds exactly when there is one open break
            let open_breaks = session.breaks.iter().filter(|b| b.ended_at.is_none()).count();
            if open_breaks > 1 || (open_breaks == 1) != session.on_break {
                anyhow::bail!("session {} has a malformed break list", session.id);
            }
        }
        if let Some(idx) = self.active {
            if idx >= self.sessions.len() {
                anyhow::bail!("active session index {} is out of range", idx);
            }
        }
        Ok(())
    }
}
