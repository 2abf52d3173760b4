//! Human-readable rendering of timestamps, durations, and reports.

use chrono::{DateTime, Local, TimeDelta, Utc};

use crate::models::{AssignedShare, Distributor, Registry, Roster, Session, SessionLog};

/// Short local-time format used everywhere a timestamp is shown,
/// e.g. `Fri 29 Aug, 02:15:09 PM`.
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%a %d %b, %I:%M:%S %p")
        .to_string()
}

/// Compact duration: `01h 02m 03s`, zero components omitted.
pub fn duration(delta: TimeDelta) -> String {
    let total = delta.num_seconds().max(0);
    let (hours, rest) = (total / 3600, total % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours:02}h"));
    }
    if minutes > 0 {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{minutes:02}m"));
    }
    if seconds > 0 || out.is_empty() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(&format!("{seconds:02}s"));
    }
    out
}

/// One assignment batch, one person per line.
pub fn assignments(heading: &str, shares: &[AssignedShare]) -> String {
    let mut out = format!("{heading}:");
    for share in shares {
        out.push_str(&format!("\n{}: {}", share.person, share.count));
    }
    out
}

fn distributor_details(out: &mut String, label: &str, distributor: &Distributor, roster: &Roster) {
    out.push_str(&format!("\n{label}: {}", distributor.total()));
    if distributor.total() > 0 {
        out.push_str("\nDetails:");
        for (i, count) in distributor.counts().iter().enumerate() {
            out.push_str(&format!("\n{} -> {}", roster.person(i).unwrap_or("?"), count));
        }
        if let Some(last) = distributor.last_assignee(roster) {
            out.push_str(&format!("\nLast assignee: {last}"));
        }
    }
}

/// The `session` status report: timing, both distributors, breaks.
pub fn session_status(session: &Session, roster: &Roster) -> String {
    let mut out = String::new();
    match session.ended_at {
        Some(ended_at) => out.push_str(&format!(
            "Session timing: {} - {} [ {} ]",
            timestamp(session.started_at),
            timestamp(ended_at),
            duration(ended_at - session.started_at)
        )),
        None => out.push_str(&format!(
            "Session started at: {} [ {} ago]",
            timestamp(session.started_at),
            duration(Utc::now() - session.started_at)
        )),
    }
    out.push('\n');
    distributor_details(&mut out, "Catalog tasks", &session.catalog, roster);
    out.push('\n');
    distributor_details(&mut out, "Incident tasks", &session.incidents, roster);
    out.push_str(&format!("\n\nBreaks taken: {}", session.breaks.len()));
    if !session.breaks.is_empty() {
        out.push_str("\n\nBreak details:");
        for (i, b) in session.breaks.iter().enumerate() {
            match b.ended_at {
                Some(ended_at) => out.push_str(&format!(
                    "\n{} -> {} - {} [ {} ]",
                    i + 1,
                    timestamp(b.started_at),
                    timestamp(ended_at),
                    duration(ended_at - b.started_at)
                )),
                None => out.push_str(&format!(
                    "\n{} -> {} - (ongoing)",
                    i + 1,
                    timestamp(b.started_at)
                )),
            }
        }
    }
    out
}

/// The `session list` view, active session marked with `*`.
pub fn session_list(registry: &Registry) -> String {
    if registry.sessions().is_empty() {
        return "No sessions yet. Run 'new' to start one.".to_string();
    }
    registry
        .list()
        .map(|(session, active)| {
            let marker = if active { "* " } else { "" };
            format!("{marker}Session: {}", session.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dump of a session log, one entry per line.
pub fn session_log(log: &SessionLog) -> String {
    if log.is_empty() {
        return "(log is empty)".to_string();
    }
    log.entries()
        .iter()
        .map(|entry| match entry.tag {
            Some(tag) => format!("[{}] [{}] {}", timestamp(entry.at), tag.as_str(), entry.text),
            None => format!("[{}] {}", timestamp(entry.at), entry.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn help() -> &'static str {
    "\
new -> Starts a new on-call session
inc [<x>] -> Assigns x new incident tasks (default 1)
cat [<x>] -> Assigns x new catalog tasks (default 1)
break -> Starts/stops a break on the active session
end -> Ends the active session
session -> Shows the active session's status
session list -> Lists all sessions
session <x> -> Switches the active session
log [<message>] -> Views/appends to the active session's log
save [<path>] -> Saves a snapshot (default path if omitted)
load [<path>] -> Loads a snapshot (default path if omitted)
help -> Shows this help
exit -> Exits the tracker"
}
