//! Leaderboard ranking.
//!
//! Users with at least one win, ordered by wins descending. Equal wins are
//! ordered by username descending.

use std::cmp::Ordering;

use super::registry::Registry;

/// Default number of leaderboard entries.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 3;

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub username: String,
    pub wins: u32,
}

/// Ranking result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Leaderboard {
    /// Nobody has won a game yet
    NoWinners,

    /// Ranked standings, best first
    Ranked(Vec<Standing>),
}

impl Leaderboard {
    pub fn standings(&self) -> &[Standing] {
        match self {
            Self::NoWinners => &[],
            Self::Ranked(standings) => standings,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::NoWinners)
    }
}

fn rank(a: &Standing, b: &Standing) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.username.cmp(&a.username))
}

/// Compute the top `n` users.
///
/// Registry keys are unique, so each user appears at most once.
pub fn top(registry: &Registry, n: usize) -> Leaderboard {
    let mut standings: Vec<Standing> = registry
        .iter()
        .filter(|(_, record)| record.games_won > 0)
        .map(|(username, record)| Standing {
            username: username.to_string(),
            wins: record.games_won,
        })
        .collect();

    standings.sort_by(rank);
    standings.truncate(n);

    if standings.is_empty() {
        Leaderboard::NoWinners
    } else {
        Leaderboard::Ranked(standings)
    }
}
