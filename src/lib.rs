//! oncall-rota: an interactive on-call tracker.
//!
//! Records who is on duty, distributes incoming catalog and incident tasks
//! fairly across a fixed roster, tracks breaks and session timing, and
//! persists the whole history as durable snapshots.

pub mod models;
pub mod repl;
pub mod store;
