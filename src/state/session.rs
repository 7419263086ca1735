//! Guessing session state machine.
//!
//! Every incoming message is classified into a [`SessionEvent`] and applied
//! to the sender's record. The result is a list of [`Reply`] values for the
//! transport to render, plus whether anything needs to be persisted.
//!
//! # State Diagram
//!
//! ```text
//!                 accept
//!   ┌────────┐ ───────────────────▶ ┌──────────┐
//!   │  Idle  │                      │  InGame  │ ──┐ wrong guess
//!   └────────┘ ◀─────────────────── └──────────┘ ◀─┘ (attempts - 1)
//!               correct guess
//!               last attempt used
//!               cancel
//! ```

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::leaderboard::{Leaderboard, DEFAULT_LEADERBOARD_SIZE};
use super::record::{SessionPhase, UserRecord};
use super::registry::Registry;

/// Attempts granted per round.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Smallest secret number.
pub const DEFAULT_SECRET_MIN: u32 = 1;

/// Largest secret number.
pub const DEFAULT_SECRET_MAX: u32 = 100;

/// Tunable game parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    pub max_attempts: u32,
    pub secret_min: u32,
    pub secret_max: u32,
    pub leaderboard_size: usize,
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            secret_min: DEFAULT_SECRET_MIN,
            secret_max: DEFAULT_SECRET_MAX,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

/// Words that count as opting in or out of a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    #[serde(rename = "user_answers_approval")]
    pub approval: Vec<String>,

    #[serde(rename = "user_answers_rejection")]
    pub rejection: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            approval: ["yes", "sure", "play", "ok"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rejection: ["no", "nope", "later"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Vocabulary {
    pub fn is_approval(&self, text: &str) -> bool {
        matches_any(&self.approval, text)
    }

    pub fn is_rejection(&self, text: &str) -> bool {
        matches_any(&self.rejection, text)
    }
}

fn matches_any(words: &[String], text: &str) -> bool {
    let text = text.to_lowercase();
    words.iter().any(|w| w.to_lowercase() == text)
}

/// Incoming user intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Greeting / registration
    Start,
    Help,
    /// Opt in to a new round
    Accept,
    /// Decline a new round
    Decline,
    Cancel,
    Guess(u64),
    Leaderboard,
    Stats,
    /// Anything unrecognized
    Other,
}

impl SessionEvent {
    /// Classify raw message text.
    ///
    /// Commands win over vocabulary words, which win over numbers. Only
    /// ASCII digits form a guess. A run of digits too large for `u64`
    /// saturates and is always too high.
    pub fn parse(text: &str, vocabulary: &Vocabulary) -> Self {
        let text = text.trim();

        if let Some(command) = text.strip_prefix('/') {
            let name = command.split_whitespace().next().unwrap_or("");
            let name = name.split('@').next().unwrap_or(name);
            return match name.to_ascii_lowercase().as_str() {
                "start" => Self::Start,
                "help" => Self::Help,
                "stat" | "stats" => Self::Stats,
                "cancel" => Self::Cancel,
                "top" => Self::Leaderboard,
                _ => Self::Other,
            };
        }

        if vocabulary.is_approval(text) {
            return Self::Accept;
        }
        if vocabulary.is_rejection(text) {
            return Self::Decline;
        }

        if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
            return Self::Guess(text.parse().unwrap_or(u64::MAX));
        }

        Self::Other
    }
}

/// Response classification for the transport to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    Help,
    RegistrationRequired,
    GameStarted,
    /// A round is running, only numbers are accepted
    AlreadyInGame,
    /// Declined a round while idle
    Declined,
    GameCancelled,
    NothingToCancel,
    /// Guess was above the secret
    NumberIsSmaller { attempts_left: u32 },
    /// Guess was below the secret
    NumberIsBigger { attempts_left: u32 },
    Won { secret: u32 },
    OutOfAttempts { secret: u32 },
    Leaderboard(Leaderboard),
    Stats { games_played: u32, games_won: u32 },
    UnavailableDuringGame,
    NotANumber,
    NotACommand,
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub replies: Vec<Reply>,
    /// Registry was modified and should be saved
    pub changed: bool,
}

impl Outcome {
    fn changed(replies: Vec<Reply>) -> Self {
        Self {
            replies,
            changed: true,
        }
    }

    fn unchanged(reply: Reply) -> Self {
        Self {
            replies: vec![reply],
            changed: false,
        }
    }
}

/// Apply an event from `username` to the registry.
///
/// Unknown users can only register; every other event is answered with
/// [`Reply::RegistrationRequired`] and leaves the registry untouched.
pub fn apply<R: Rng>(
    registry: &mut Registry,
    username: &str,
    event: SessionEvent,
    rules: &GameRules,
    rng: &mut R,
) -> Outcome {
    let Some(mut record) = registry.get(username).cloned() else {
        if event == SessionEvent::Start {
            registry.get_or_create(username);
            tracing::info!("Registered new user {}", username);
            return Outcome::changed(vec![Reply::Welcome]);
        }
        return Outcome::unchanged(Reply::RegistrationRequired);
    };

    let outcome = transition(&mut record, event, registry, rules, rng);
    if outcome.changed {
        registry.insert(username, record);
    }
    outcome
}

fn transition<R: Rng>(
    record: &mut UserRecord,
    event: SessionEvent,
    registry: &Registry,
    rules: &GameRules,
    rng: &mut R,
) -> Outcome {
    use SessionEvent as E;
    use SessionPhase::*;

    match (record.phase(), event) {
        (_, E::Help) => Outcome::unchanged(Reply::Help),

        (Idle, E::Start) => Outcome::unchanged(Reply::Welcome),
        (InGame { .. }, E::Start) => Outcome::unchanged(Reply::AlreadyInGame),

        (Idle, E::Accept) => {
            let max = rules.secret_max.max(rules.secret_min);
            let secret = rng.gen_range(rules.secret_min..=max);
            record.start_round(secret, rules.max_attempts.max(1));
            tracing::info!("New round started, {} attempts", record.attempts_remaining);
            Outcome::changed(vec![Reply::GameStarted])
        }
        (InGame { .. }, E::Accept) => Outcome::unchanged(Reply::AlreadyInGame),

        (Idle, E::Decline) => Outcome::unchanged(Reply::Declined),
        (InGame { .. }, E::Decline) => Outcome::unchanged(Reply::AlreadyInGame),

        (Idle, E::Cancel) => Outcome::unchanged(Reply::NothingToCancel),
        (InGame { .. }, E::Cancel) => {
            record.cancel_round();
            tracing::info!("Round cancelled");
            Outcome::changed(vec![Reply::GameCancelled])
        }

        (Idle, E::Guess(_)) => Outcome::unchanged(Reply::NotACommand),
        (InGame { secret, .. }, E::Guess(guess)) => take_guess(record, secret, guess),

        (Idle, E::Leaderboard) => {
            Outcome::unchanged(Reply::Leaderboard(registry.top(rules.leaderboard_size)))
        }
        (InGame { .. }, E::Leaderboard) => Outcome::unchanged(Reply::UnavailableDuringGame),

        (Idle, E::Stats) => Outcome::unchanged(Reply::Stats {
            games_played: record.games_played,
            games_won: record.games_won,
        }),
        (InGame { .. }, E::Stats) => Outcome::unchanged(Reply::UnavailableDuringGame),

        (Idle, E::Other) => Outcome::unchanged(Reply::NotACommand),
        (InGame { .. }, E::Other) => Outcome::unchanged(Reply::NotANumber),
    }
}

fn take_guess(record: &mut UserRecord, secret: u32, guess: u64) -> Outcome {
    let mut replies = Vec::with_capacity(2);

    match guess.cmp(&u64::from(secret)) {
        Ordering::Equal => {
            record.record_win();
            tracing::info!("Round won, secret was {}", secret);
            return Outcome::changed(vec![Reply::Won { secret }]);
        }
        Ordering::Greater => {
            let attempts_left = record.consume_attempt();
            replies.push(Reply::NumberIsSmaller { attempts_left });
        }
        Ordering::Less => {
            let attempts_left = record.consume_attempt();
            replies.push(Reply::NumberIsBigger { attempts_left });
        }
    }

    if record.attempts_remaining == 0 {
        record.record_loss();
        tracing::info!("Round lost, secret was {}", secret);
        replies.push(Reply::OutOfAttempts { secret });
    }

    Outcome::changed(replies)
}
