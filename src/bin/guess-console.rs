use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use guess_state::{GuessBot, GuessConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Play the guessing game from a terminal.
///
/// Each input line is one chat message. Prefix a line with `name:` to send
/// it as another user.
#[derive(Parser)]
#[command(name = "guess-console")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Stats file, overrides the config
    #[arg(short, long)]
    stats: Option<PathBuf>,

    /// Username for lines without a `name:` prefix
    #[arg(short, long, default_value = "player")]
    user: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn split_sender<'a>(line: &'a str, default_user: &'a str) -> (&'a str, &'a str) {
    match line.split_once(':') {
        Some((name, text)) if !name.trim().is_empty() && !name.contains(char::is_whitespace) => {
            (name.trim(), text.trim())
        }
        _ => (default_user, line.trim()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "guess_state={}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = match &cli.config {
        Some(path) => GuessConfig::load(path)?,
        None => GuessConfig::default(),
    };
    if let Some(stats) = cli.stats {
        config.stats_path = stats;
    }

    let mut bot = GuessBot::from_config(&config)?;

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let (user, text) = split_sender(&line, &cli.user);
        for response in bot.respond(user, user, text) {
            writeln!(stdout, "[{}]\n{}\n", response.image_url, response.caption)?;
        }
        stdout.flush()?;
    }

    Ok(())
}
