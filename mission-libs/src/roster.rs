use crate::participant::Participant;
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Everyone who submitted availability, keyed by name.
///
/// Persisted as a plain array of participants; iteration (and so the grid's
/// column order) follows the names.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Roster {
    participants: BTreeMap<String, Participant>,
}

impl Roster {
    pub fn new() -> Roster {
        Roster::default()
    }

    /// Inserts or replaces the participant with the same name, returning the
    /// entry it replaced.
    pub fn upsert(&mut self, participant: Participant) -> Option<Participant> {
        self.participants
            .insert(participant.name.clone(), participant)
    }

    pub fn get(&self, name: &str) -> Option<&Participant> {
        self.participants.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.participants.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> + Clone {
        self.participants.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.participants.keys().map(String::as_str)
    }
}

impl FromIterator<Participant> for Roster {
    /// Later entries win over earlier ones with the same name
    fn from_iter<T: IntoIterator<Item = Participant>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for participant in iter {
            roster.upsert(participant);
        }
        roster
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Participant>::deserialize(deserializer).map(|list| list.into_iter().collect())
    }
}

/// Names that confirmed they will attend, in confirmation order.
///
/// Names are not checked against the roster here; `Board::confirm` only
/// lets registered names in.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>")]
pub struct ConfirmedSet(Vec<String>);

impl ConfirmedSet {
    pub fn new() -> ConfirmedSet {
        ConfirmedSet::default()
    }

    /// Returns `false` when the name was already confirmed
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            false
        } else {
            self.0.push(name.to_string());
            true
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|confirmed| confirmed == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// # Examples
    /// ```
    /// use mission_libs::roster::ConfirmedSet;
    ///
    /// let mut confirmed = ConfirmedSet::new();
    /// assert_eq!(confirmed.summary(), "Confirmed users: None");
    ///
    /// confirmed.insert("ana");
    /// confirmed.insert("bo");
    /// assert_eq!(confirmed.summary(), "Confirmed users: ana, bo");
    /// ```
    pub fn summary(&self) -> String {
        if self.is_empty() {
            "Confirmed users: None".to_string()
        } else {
            format!("Confirmed users: {}", self.iter().join(", "))
        }
    }
}

impl From<Vec<String>> for ConfirmedSet {
    /// Drops repeated names, keeping the first occurrence
    fn from(names: Vec<String>) -> Self {
        ConfirmedSet(names.into_iter().unique().collect())
    }
}
