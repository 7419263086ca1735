//! State management module for the guessing game.
//!
//! This module provides the core state types:
//!
//! - `record` - Per-user stats and session phase
//! - `registry` - Username to record mapping
//! - `store` - JSON file persistence
//! - `session` - Event classification and the guessing state machine
//! - `leaderboard` - Top players by wins
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          AppState                            │
//! │                                                              │
//! │  ┌──────────────────┐   save after     ┌──────────────────┐  │
//! │  │     Registry     │ ───────────────▶ │  RegistryStore   │  │
//! │  │                  │   each change    │                  │  │
//! │  │ username →       │                  │  stats.json      │  │
//! │  │   UserRecord     │ ◀─────────────── │                  │  │
//! │  └────────┬─────────┘   load once      └──────────────────┘  │
//! │           │                                                  │
//! │           ▼                                                  │
//! │  ┌──────────────────────────────────────────────────────┐    │
//! │  │              session::apply (per event)              │    │
//! │  │                                                      │    │
//! │  │   Idle ──accept──▶ InGame ──win / out / cancel──▶ Idle│    │
//! │  └──────────────────────────────────────────────────────┘    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use guess_state::state::{AppState, RegistryStore, GameRules, SessionEvent};
//!
//! let mut app = AppState::open(RegistryStore::new("stats.json"), GameRules::default());
//! app.handle("alice", SessionEvent::Start);
//! app.handle("alice", SessionEvent::Accept);
//! let replies = app.handle("alice", SessionEvent::Guess(50));
//! ```

pub mod leaderboard;
pub mod record;
pub mod registry;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use leaderboard::{Leaderboard, Standing, DEFAULT_LEADERBOARD_SIZE};
pub use record::{SessionPhase, UserRecord};
pub use registry::Registry;
pub use session::{
    GameRules, Outcome, Reply, SessionEvent, Vocabulary, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_SECRET_MAX, DEFAULT_SECRET_MIN,
};
pub use store::{RegistryStore, StoreError};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Combined application state.
///
/// Owns the registry and its store. Events are applied one at a time through
/// `&mut self`; embedders handling messages concurrently should put the whole
/// `AppState` behind a single lock.
#[derive(Debug)]
pub struct AppState {
    registry: Registry,
    store: RegistryStore,
    rules: GameRules,
    rng: StdRng,
}

impl AppState {
    /// Load the registry from `store`.
    pub fn open(store: RegistryStore, rules: GameRules) -> Self {
        Self::with_rng(store, rules, StdRng::from_entropy())
    }

    /// Like [`AppState::open`] with a caller supplied RNG.
    pub fn with_rng(store: RegistryStore, rules: GameRules, rng: StdRng) -> Self {
        let registry = store.load();
        tracing::info!(
            "Loaded {} users from {}",
            registry.len(),
            store.path().display()
        );
        Self {
            registry,
            store,
            rules,
            rng,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    pub fn store(&self) -> &RegistryStore {
        &self.store
    }

    /// Get a user's record if registered.
    pub fn user(&self, username: &str) -> Option<&UserRecord> {
        self.registry.get(username)
    }

    /// Current leaderboard.
    pub fn leaderboard(&self) -> Leaderboard {
        self.registry.top(self.rules.leaderboard_size)
    }

    /// Apply one event and persist if anything changed.
    ///
    /// A failed save is logged; the in-memory registry stays authoritative
    /// and the next successful save catches the file up.
    pub fn handle(&mut self, username: &str, event: SessionEvent) -> Vec<Reply> {
        tracing::debug!("Event {:?} from {}", event, username);

        let outcome = session::apply(
            &mut self.registry,
            username,
            event,
            &self.rules,
            &mut self.rng,
        );

        if outcome.changed {
            if let Err(e) = self.store.save(&self.registry) {
                tracing::error!(
                    "Failed to save stats to {}: {}",
                    self.store.path().display(),
                    e
                );
            }
        }

        outcome.replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn app_in(dir: &std::path::Path) -> AppState {
        AppState::with_rng(
            RegistryStore::new(dir.join("stats.json")),
            GameRules::default(),
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_start_persists_new_user() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        assert_eq!(app.handle("alice", SessionEvent::Start), vec![Reply::Welcome]);

        let reloaded = app.store().load();
        assert_eq!(reloaded.get("alice"), app.user("alice"));
    }

    #[test]
    fn test_unknown_user_does_not_write() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path());

        assert_eq!(
            app.handle("mallory", SessionEvent::Accept),
            vec![Reply::RegistrationRequired]
        );
        assert!(!dir.path().join("stats.json").exists());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_open_logs_load_once() {
        let dir = tempdir().unwrap();
        let mut registry = Registry::new();
        registry.get_or_create("alice");
        RegistryStore::new(dir.path().join("stats.json"))
            .save(&registry)
            .unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let app = app_in(dir.path());
            assert_eq!(app.registry().len(), 1);
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("Loaded 1 users").count(), 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut app = app_in(dir.path());
            app.handle("alice", SessionEvent::Start);
            app.handle("alice", SessionEvent::Accept);
        }

        let app = app_in(dir.path());
        let alice = app.user("alice").unwrap();
        assert!(alice.is_in_game());
        assert_eq!(alice.attempts_remaining, DEFAULT_MAX_ATTEMPTS);
    }
}
