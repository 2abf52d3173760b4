//! Domain models for oncall-rota.
//!
//! # Core Concepts
//!
//! - [`Roster`]: The fixed, ordered list of people eligible for assignment.
//!   Index order is the round-robin order; immutable for the process lifetime.
//! - [`Distributor`]: Fair-share counter over the roster. Splits each batch
//!   into an equal base share plus a cyclically-assigned remainder.
//! - [`Session`]: One on-call shift. Owns two distributors (catalog and
//!   incident tasks), its break intervals, and its log. Sessions are
//!   **permanent**—once created they are only ever mutated, never deleted,
//!   so old shifts remain available for audit.
//! - [`SessionLog`]: Append-only, capped log of timestamped entries.
//! - [`Registry`]: Ordered collection of all sessions plus the active
//!   pointer. Exactly one session receives commands at a time.

mod distributor;
mod log;
mod registry;
mod roster;
mod session;

pub use distributor::*;
pub use log::*;
pub use registry::*;
pub use roster::*;
pub use session::*;
