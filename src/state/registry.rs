//! User registry.
//!
//! Maps usernames to their records. Keys are kept ordered so the persisted
//! file is stable between saves.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::leaderboard::{self, Leaderboard};
use super::record::UserRecord;

/// Username to record mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry {
    users: BTreeMap<String, UserRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a user.
    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    /// Look up a user for mutation.
    pub fn get_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users.get_mut(username)
    }

    /// Get a user's record, inserting a fresh one if needed.
    ///
    /// Does not persist; the caller decides when to save.
    pub fn get_or_create(&mut self, username: &str) -> &mut UserRecord {
        self.users
            .entry(username.to_string())
            .or_insert_with(UserRecord::new)
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, username: impl Into<String>, record: UserRecord) {
        self.users.insert(username.into(), record);
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// All users in username order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UserRecord)> {
        self.users.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Top `n` users by wins.
    pub fn top(&self, n: usize) -> Leaderboard {
        leaderboard::top(self, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_get_or_create_inserts_once() {
        let mut registry = Registry::new();
        assert!(registry.get("alice").is_none());

        registry.get_or_create("alice").games_won = 2;
        assert_eq!(registry.len(), 1);

        let record = registry.get_or_create("alice");
        assert_eq!(record.games_won, 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_iter_is_ordered() {
        let mut registry = Registry::new();
        registry.get_or_create("carol");
        registry.get_or_create("alice");
        registry.get_or_create("bob");

        let names: Vec<&str> = registry.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut registry = Registry::new();
        let mut record = UserRecord::new();
        record.registered_at = None;
        registry.insert("alice", record);

        let value = serde_json::to_value(&registry).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "alice": {
                    "in_game": false,
                    "attempts_remaining": 0,
                    "games_played": 0,
                    "games_won": 0,
                    "secret_number": 0
                }
            })
        );
    }
}
