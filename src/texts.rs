//! Reply captions.
//!
//! Each [`Reply`] maps to a symbolic template key. Templates use `{param}`
//! placeholders filled by name. A JSON catalog can override any subset of
//! keys; the rest keep their built-in defaults.

use std::fmt::Display;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, Result};
use crate::state::{GameRules, Leaderboard, Reply, Vocabulary};

/// Template catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Texts {
    pub text_start: String,
    pub text_help: String,
    pub text_stat: String,
    pub text_approval_game: String,
    pub text_rejection_game: String,
    pub text_end_game: String,
    pub text_not_cancel: String,
    pub text_already_in_game: String,
    pub text_unavailable_in_game: String,
    pub text_not_digit: String,
    pub text_not_command: String,
    pub text_number_is_small: String,
    pub text_number_is_big: String,
    pub text_number_is_number: String,
    pub text_null_attempts: String,
    pub text_top_prize: String,
    pub text_users_top_prize: String,
    pub text_lack_prizes: String,
    pub registration_requirement_text: String,

    #[serde(flatten)]
    pub vocabulary: Vocabulary,
}

impl Default for Texts {
    fn default() -> Self {
        Self {
            text_start: "Hi, {name}! Let's play \"Guess the number\".\n\
                I pick a number from {min} to {max} and you have {attempts} attempts to find it.\n\n\
                Ready? Answer: {approval}\nNot now? Answer: {rejection}"
                .to_string(),
            text_help: "I pick a number from {min} to {max}, you have {attempts} attempts.\n\
                After each wrong guess I tell you whether my number is bigger or smaller.\n\n\
                /help - rules\n/cancel - leave the game\n/stat - your statistics\n/top - best players"
                .to_string(),
            text_stat: "Games played: {cnt_games}\nGames won: {cnt_prizes}".to_string(),
            text_approval_game: "Great! I picked a number from {min} to {max}. Try to guess it!"
                .to_string(),
            text_rejection_game: "Okay. Whenever you want to play, say: {approval}".to_string(),
            text_end_game: "You left the game. To play again, say: {approval}".to_string(),
            text_not_cancel: "We are not playing right now, there is nothing to cancel."
                .to_string(),
            text_already_in_game: "We are already playing! Send me a number from {min} to {max}."
                .to_string(),
            text_unavailable_in_game: "Not available during a game. Send a number or /cancel."
                .to_string(),
            text_not_digit: "That is not a number. Send a number from {min} to {max}."
                .to_string(),
            text_not_command: "I don't know that command. Send /help for the list."
                .to_string(),
            text_number_is_small: "My number is smaller. Attempts left: {cnt}".to_string(),
            text_number_is_big: "My number is bigger. Attempts left: {cnt}".to_string(),
            text_number_is_number: "You got it, the number was {number}!\n\
                Play again? Say: {approval}"
                .to_string(),
            text_null_attempts: "No attempts left. My number was {number}.\n\
                Play again? Say: {approval}"
                .to_string(),
            text_top_prize: "{m}. {name}: {cnt}".to_string(),
            text_users_top_prize: "Top players:\n{top_users}".to_string(),
            text_lack_prizes: "Nobody has won yet. Be the first!".to_string(),
            registration_requirement_text: "Please send /start to register first.".to_string(),
            vocabulary: Vocabulary::default(),
        }
    }
}

/// Replace `{key}` placeholders by name in a single pass.
///
/// Substituted values are copied verbatim and never expanded again. Unknown
/// placeholders and stray braces are kept.
pub fn fill(template: &str, params: &[(&str, &dyn Display)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let found = after.find('}').and_then(|close| {
            let key = &after[..close];
            params
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (close, value))
        });

        match found {
            Some((close, value)) => {
                out.push_str(&value.to_string());
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

impl Texts {
    /// Load a catalog, keeping defaults for missing keys.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let texts: Texts = serde_json::from_str(&contents)?;
        if texts.vocabulary.approval.is_empty() {
            return Err(ConfigError::invalid("approval word list is empty"));
        }
        Ok(texts)
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Caption for a reply.
    ///
    /// `name` is the display name used in the greeting.
    pub fn render(&self, reply: &Reply, name: &str, rules: &GameRules) -> String {
        let approval = self.vocabulary.approval.join(" ");
        let rejection = self.vocabulary.rejection.join(" ");
        let range: [(&str, &dyn Display); 3] = [
            ("min", &rules.secret_min),
            ("max", &rules.secret_max),
            ("attempts", &rules.max_attempts),
        ];

        match reply {
            Reply::Welcome => fill(
                &self.text_start,
                &[
                    ("name", &name),
                    ("min", &rules.secret_min),
                    ("max", &rules.secret_max),
                    ("attempts", &rules.max_attempts),
                    ("approval", &approval),
                    ("rejection", &rejection),
                ],
            ),
            Reply::Help => fill(&self.text_help, &range),
            Reply::RegistrationRequired => self.registration_requirement_text.clone(),
            Reply::GameStarted => fill(&self.text_approval_game, &range),
            Reply::AlreadyInGame => fill(&self.text_already_in_game, &range),
            Reply::Declined => fill(&self.text_rejection_game, &[("approval", &approval)]),
            Reply::GameCancelled => fill(&self.text_end_game, &[("approval", &approval)]),
            Reply::NothingToCancel => self.text_not_cancel.clone(),
            Reply::NumberIsSmaller { attempts_left } => {
                fill(&self.text_number_is_small, &[("cnt", attempts_left)])
            }
            Reply::NumberIsBigger { attempts_left } => {
                fill(&self.text_number_is_big, &[("cnt", attempts_left)])
            }
            Reply::Won { secret } => fill(
                &self.text_number_is_number,
                &[("number", secret), ("approval", &approval)],
            ),
            Reply::OutOfAttempts { secret } => fill(
                &self.text_null_attempts,
                &[("number", secret), ("approval", &approval)],
            ),
            Reply::Leaderboard(board) => self.render_leaderboard(board),
            Reply::Stats {
                games_played,
                games_won,
            } => fill(
                &self.text_stat,
                &[("cnt_games", games_played), ("cnt_prizes", games_won)],
            ),
            Reply::UnavailableDuringGame => self.text_unavailable_in_game.clone(),
            Reply::NotANumber => fill(&self.text_not_digit, &range),
            Reply::NotACommand => self.text_not_command.clone(),
        }
    }

    fn render_leaderboard(&self, board: &Leaderboard) -> String {
        match board {
            Leaderboard::NoWinners => self.text_lack_prizes.clone(),
            Leaderboard::Ranked(standings) => {
                let lines: Vec<String> = standings
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        let handle = format!("@{}", s.username);
                        fill(
                            &self.text_top_prize,
                            &[("m", &(i + 1)), ("name", &handle), ("cnt", &s.wins)],
                        )
                    })
                    .collect();
                fill(
                    &self.text_users_top_prize,
                    &[("top_users", &lines.join("\n"))],
                )
            }
        }
    }
}
