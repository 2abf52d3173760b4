use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Roster used when none is given on the command line.
pub const DEFAULT_PERSONS: [&str; 6] = ["Bernice", "Jose", "Karen", "Karina", "Luis", "Ricardo"];

/// The fixed, ordered list of people eligible for task assignment.
///
/// Index order is the round-robin order. A roster never changes for the
/// lifetime of the process; counters sized against it stay valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    persons: Vec<String>,
}

/// Rejected roster configurations.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster must have at least one person")]
    Empty,

    #[error("roster contains duplicate person: {0}")]
    Duplicate(String),
}

impl Roster {
    pub fn new(persons: Vec<String>) -> Result<Self, RosterError> {
        if persons.is_empty() {
            return Err(RosterError::Empty);
        }
        for (i, person) in persons.iter().enumerate() {
            if persons[..i].contains(person) {
                return Err(RosterError::Duplicate(person.clone()));
            }
        }
        Ok(Self { persons })
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn person(&self, index: usize) -> Option<&str> {
        self.persons.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.persons.iter().map(String::as_str)
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            persons: DEFAULT_PERSONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Roster {
    type Error = RosterError;

    fn try_from(persons: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(persons)
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.persons
    }
}
