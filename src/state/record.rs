//! Per-user game record.
//!
//! A record is both the persisted stats row and the source of the user's
//! session phase. The phase is derived from the flat fields so the stored
//! JSON stays a plain object per user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a user currently is in the guessing game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No round in progress
    Idle,

    /// Guessing round in progress
    InGame { secret: u32, attempts_remaining: u32 },
}

impl SessionPhase {
    pub fn is_in_game(&self) -> bool {
        matches!(self, Self::InGame { .. })
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::InGame {
                attempts_remaining, ..
            } => write!(f, "InGame({} attempts left)", attempts_remaining),
        }
    }
}

/// Stats and session state for a single user.
///
/// Field aliases accept the key names written by older stats files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// A guessing round is active
    #[serde(alias = "game")]
    pub in_game: bool,

    /// Wrong guesses left in the current round
    #[serde(alias = "number_attempts")]
    pub attempts_remaining: u32,

    /// Finished rounds (won or lost, not cancelled)
    #[serde(alias = "number_games")]
    pub games_played: u32,

    /// Rounds won
    #[serde(alias = "number_wins")]
    pub games_won: u32,

    /// Target number, meaningful only while `in_game`
    #[serde(alias = "random_number")]
    pub secret_number: u32,

    /// First interaction, absent for records from older files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Fresh record for a user seen for the first time.
    pub fn new() -> Self {
        Self {
            in_game: false,
            attempts_remaining: 0,
            games_played: 0,
            games_won: 0,
            secret_number: 0,
            registered_at: Some(Utc::now()),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.in_game && self.attempts_remaining > 0 {
            SessionPhase::InGame {
                secret: self.secret_number,
                attempts_remaining: self.attempts_remaining,
            }
        } else {
            SessionPhase::Idle
        }
    }

    pub fn is_in_game(&self) -> bool {
        self.phase().is_in_game()
    }

    /// Begin a round with the given secret.
    pub(crate) fn start_round(&mut self, secret: u32, attempts: u32) {
        self.in_game = true;
        self.secret_number = secret;
        self.attempts_remaining = attempts;
    }

    /// Close the round as a win.
    pub(crate) fn record_win(&mut self) {
        self.in_game = false;
        self.games_played += 1;
        self.games_won += 1;
    }

    /// Consume one attempt. Returns the attempts left afterwards.
    pub(crate) fn consume_attempt(&mut self) -> u32 {
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        self.attempts_remaining
    }

    /// Close the round as a loss.
    pub(crate) fn record_loss(&mut self) {
        self.in_game = false;
        self.games_played += 1;
    }

    /// Abandon the round without touching the counters.
    pub(crate) fn cancel_round(&mut self) {
        self.in_game = false;
    }
}

impl Default for UserRecord {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_record_is_idle() {
        let record = UserRecord::new();
        assert_eq!(record.phase(), SessionPhase::Idle);
        assert_eq!(record.games_played, 0);
        assert_eq!(record.games_won, 0);
        assert!(record.registered_at.is_some());
    }

    #[test]
    fn test_new_records_are_independent() {
        let mut a = UserRecord::new();
        let b = UserRecord::new();
        a.games_played = 3;
        assert_eq!(b.games_played, 0);
    }

    #[test]
    fn test_round_lifecycle() {
        let mut record = UserRecord::new();
        record.start_round(42, 5);
        assert_eq!(
            record.phase(),
            SessionPhase::InGame {
                secret: 42,
                attempts_remaining: 5
            }
        );

        assert_eq!(record.consume_attempt(), 4);
        record.record_win();
        assert!(!record.is_in_game());
        assert_eq!(record.games_played, 1);
        assert_eq!(record.games_won, 1);
    }

    #[test]
    fn test_consume_attempt_never_negative() {
        let mut record = UserRecord::new();
        assert_eq!(record.consume_attempt(), 0);
    }

    #[test]
    fn test_zero_attempts_is_idle() {
        let mut record = UserRecord::new();
        record.in_game = true;
        record.attempts_remaining = 0;
        assert_eq!(record.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_legacy_keys() {
        let json = r#"{
            "game": true,
            "number_attempts": 3,
            "number_wins": 2,
            "number_games": 4,
            "random_number": 17
        }"#;
        let record: UserRecord = serde_json::from_str(json).unwrap();
        assert_eq!(
            record,
            UserRecord {
                in_game: true,
                attempts_remaining: 3,
                games_played: 4,
                games_won: 2,
                secret_number: 17,
                registered_at: None,
            }
        );
    }

    #[test]
    fn test_display() {
        let phase = SessionPhase::InGame {
            secret: 10,
            attempts_remaining: 2,
        };
        assert_eq!(format!("{}", phase), "InGame(2 attempts left)");
    }
}
