use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::distributor::{summarize_shares, AssignedShare, Distributor};
use super::log::SessionLog;
use super::roster::Roster;

/// One break interval within a session. `ended_at` is `None` while the
/// break is still open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Break {
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// Operations rejected by a session's lifecycle rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("session {0} has already ended")]
    Ended(u64),
}

/// One on-call shift.
///
/// A session owns two independent [`Distributor`]s—one for catalog tasks,
/// one for incidents—its break intervals, and its log. Lifecycle:
/// `Working` on creation, `OnBreak` while a break is open, `Ended` once
/// closed out. `Ended` is terminal: no assignment or break may follow it,
/// and ending twice keeps the first `ended_at`.
///
/// At most one break is open at a time, and only while `on_break` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: u64,
    pub catalog: Distributor,
    pub incidents: Distributor,
    #[serde(default)]
    pub breaks: Vec<Break>,
    #[serde(default)]
    pub on_break: bool,
    #[serde(default)]
    pub ended: bool,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub ended_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub log: SessionLog,
}

impl Session {
    pub fn new(id: u64, roster_len: usize) -> Self {
        let mut log = SessionLog::new();
        log.info("Session Started");
        Self {
            id,
            catalog: Distributor::new(roster_len),
            incidents: Distributor::new(roster_len),
            breaks: Vec::new(),
            on_break: false,
            ended: false,
            started_at: Utc::now(),
            ended_at: None,
            log,
        }
    }

    /// Distribute `count` catalog tasks. An open break is closed first.
    pub fn assign_catalog(
        &mut self,
        roster: &Roster,
        count: u64,
    ) -> Result<Vec<AssignedShare>, SessionError> {
        self.assign(roster, count, Category::Catalog)
    }

    /// Distribute `count` incident tasks. An open break is closed first.
    pub fn assign_incidents(
        &mut self,
        roster: &Roster,
        count: u64,
    ) -> Result<Vec<AssignedShare>, SessionError> {
        self.assign(roster, count, Category::Incident)
    }

    fn assign(
        &mut self,
        roster: &Roster,
        count: u64,
        category: Category,
    ) -> Result<Vec<AssignedShare>, SessionError> {
        if self.ended {
            return Err(SessionError::Ended(self.id));
        }
        if self.on_break {
            self.end_break();
        }
        let distributor = match category {
            Category::Catalog => &mut self.catalog,
            Category::Incident => &mut self.incidents,
        };
        let shares = distributor.assign(roster, count);
        self.log.append(format!(
            "[{}] {} {{{}}}",
            category.label(),
            count,
            summarize_shares(&shares)
        ));
        Ok(shares)
    }

    /// Open a break. No-op while already on break; rejected once ended.
    pub fn start_break(&mut self) -> Result<(), SessionError> {
        if self.ended {
            return Err(SessionError::Ended(self.id));
        }
        if self.on_break {
            return Ok(());
        }
        self.on_break = true;
        self.log.info("Break Started");
        self.breaks.push(Break {
            started_at: Utc::now(),
            ended_at: None,
        });
        Ok(())
    }

    /// Close the open break. No-op when not on break.
    pub fn end_break(&mut self) {
        if !self.on_break {
            return;
        }
        self.on_break = false;
        self.log.info("Break Ended");
        if let Some(open) = self.breaks.iter_mut().rev().find(|b| b.ended_at.is_none()) {
            open.ended_at = Some(Utc::now());
        }
    }

    /// End the session, closing any open break. Idempotent: a second call
    /// keeps the original `ended_at`.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        if self.on_break {
            self.end_break();
        }
        self.ended = true;
        self.ended_at = Some(Utc::now());
        self.log.info("Session Ended");
    }
}

#[derive(Debug, Clone, Copy)]
enum Category {
    Catalog,
    Incident,
}

impl Category {
    fn label(&self) -> &'static str {
        match self {
            Self::Catalog => "CAT",
            Self::Incident => "INC",
        }
    }
}
