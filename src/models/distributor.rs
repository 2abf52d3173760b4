use serde::{Deserialize, Serialize};

use super::roster::Roster;

/// One person's share of a single assignment batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedShare {
    pub person: String,
    pub count: u64,
}

/// Fair round-robin counter over the roster.
///
/// Each batch of `n` tasks is split into an equal base share for everyone
/// (`n / N`) plus a remainder (`n % N`) handed out one unit at a time,
/// cycling through the roster. The cursor remembers who received the last
/// remainder unit, so fairness carries across batches: `None` means no
/// remainder unit has ever been assigned.
///
/// Invariant: `counts.iter().sum() == total` after every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distributor {
    cursor: Option<usize>,
    counts: Vec<u64>,
    total: u64,
}

impl Distributor {
    pub fn new(roster_len: usize) -> Self {
        Self {
            cursor: None,
            counts: vec![0; roster_len],
            total: 0,
        }
    }

    /// Distribute a batch of `count` tasks across the roster.
    ///
    /// Returns each person's share in the order they first received a unit
    /// in this call. The sum of the returned counts always equals `count`;
    /// `count == 0` is a no-op that returns no shares and mutates nothing.
    pub fn assign(&mut self, roster: &Roster, count: u64) -> Vec<AssignedShare> {
        let persons = roster.len();
        let base = count / persons as u64;
        let remainder = (count % persons as u64) as usize;

        let mut shares: Vec<AssignedShare> = Vec::new();
        if base > 0 {
            // everybody gets this many at minimum
            for (i, person) in roster.iter().enumerate() {
                self.counts[i] += base;
                shares.push(AssignedShare {
                    person: person.to_string(),
                    count: base,
                });
            }
        }
        for _ in 0..remainder {
            let next = match self.cursor {
                Some(current) => (current + 1) % persons,
                None => 0,
            };
            self.cursor = Some(next);
            self.counts[next] += 1;
            let person = roster.person(next).unwrap_or_default();
            match shares.iter_mut().find(|s| s.person == person) {
                Some(share) => share.count += 1,
                None => shares.push(AssignedShare {
                    person: person.to_string(),
                    count: 1,
                }),
            }
        }
        self.total += count;
        shares
    }

    /// Per-person assignment counters, in roster order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total tasks assigned through this distributor.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Roster index of the last remainder-unit recipient, if any.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Name of the last remainder-unit recipient, if any.
    pub fn last_assignee<'a>(&self, roster: &'a Roster) -> Option<&'a str> {
        self.cursor.and_then(|i| roster.person(i))
    }

    /// Check internal consistency against a roster of `roster_len` people.
    /// Used when accepting a decoded snapshot.
    pub fn is_consistent(&self, roster_len: usize) -> bool {
        self.counts.len() == roster_len
            && self.counts.iter().sum::<u64>() == self.total
            && self.cursor.map_or(true, |c| c < roster_len)
    }
}

/// Compact `name:count` rendering of a batch, in share order.
pub fn summarize_shares(shares: &[AssignedShare]) -> String {
    shares
        .iter()
        .map(|s| format!("{}:{}", s.person, s.count))
        .collect::<Vec<_>>()
        .join(", ")
}
