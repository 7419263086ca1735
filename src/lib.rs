//! Guess State Library
//!
//! This crate provides state management for a chat-based number-guessing
//! game.
//!
//! # Overview
//!
//! - **User Registry** - Per-user stats and session state, persisted to a
//!   JSON file after every change.
//!
//! - **Session State Machine** - Idle / in-game transitions driven by an
//!   explicit event enum, with higher/lower feedback and a fixed number of
//!   attempts per round.
//!
//! - **Leaderboard** - Top players by wins.
//!
//! - **Front end** - Text templates and image decoration for a chat
//!   transport to deliver.
//!
//! # Design Principles
//!
//! 1. **State machines validate transitions** - Every (phase, event) pair has
//!    an explicit reply; unknown users get a registration prompt.
//!
//! 2. **No networking** - This crate is pure state plus file persistence; the
//!    transport lives elsewhere.
//!
//! 3. **Single writer** - Events are applied one at a time through `&mut`.
//!
//! # Example
//!
//! ```rust
//! use guess_state::state::{AppState, GameRules, Reply, RegistryStore, SessionEvent};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = RegistryStore::new(dir.path().join("stats.json"));
//! let mut app = AppState::open(store, GameRules::default());
//!
//! assert_eq!(app.handle("alice", SessionEvent::Start), vec![Reply::Welcome]);
//! assert_eq!(app.handle("alice", SessionEvent::Accept), vec![Reply::GameStarted]);
//! assert!(app.user("alice").unwrap().is_in_game());
//! ```

pub mod bot;
pub mod config;
pub mod image;
pub mod state;
pub mod texts;

pub use bot::{GuessBot, Response};
pub use config::{ConfigError, GuessConfig};
pub use image::{ImageSource, StaticImage};
pub use texts::Texts;

// Re-export everything from state module at crate root
pub use state::*;
