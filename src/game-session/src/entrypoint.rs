use std::{future::Future, io, io::Write, str::FromStr, time::Duration};

use common::model::{
    game::{Choice, ParseChoiceError},
    locale::{Language, ParseLanguageError},
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, Level};

use crate::{
    model::state::SessionState,
    service::{
        opponent::{RandomMove, Strategy},
        session::GameSession,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub cooldown: Duration,
    pub default_language: Language,
    pub lock_language_during_cooldown: bool,
    // Fixed seed for the computer's moves; random from the OS otherwise
    pub opponent_seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            cooldown: Duration::from_millis(1000),
            default_language: Language::default(),
            lock_language_during_cooldown: false,
            opponent_seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    lookup(key)
        .map(|value| {
            value.trim().parse::<T>().map_err(|e| ConfigError {
                key,
                value,
                reason: e.to_string(),
            })
        })
        .transpose()
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with `RPS_COOLDOWN_MS`, `RPS_LANGUAGE`,
    /// `RPS_LOCK_LANGUAGE` and `RPS_SEED`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = SessionConfig::default();
        if let Some(millis) = parse_var::<u64>(&lookup, "RPS_COOLDOWN_MS")? {
            config.cooldown = Duration::from_millis(millis);
        }
        if let Some(language) = parse_var::<Language>(&lookup, "RPS_LANGUAGE")? {
            config.default_language = language;
        }
        if let Some(lock) = parse_var::<bool>(&lookup, "RPS_LOCK_LANGUAGE")? {
            config.lock_language_during_cooldown = lock;
        }
        config.opponent_seed = parse_var::<u64>(&lookup, "RPS_SEED")?;
        Ok(config)
    }

    pub fn strategy(&self) -> Box<dyn Strategy> {
        match self.opponent_seed {
            Some(seed) => Box::new(RandomMove::seeded(seed)),
            None => Box::new(RandomMove::new()),
        }
    }
}

pub fn init_logging() {
    // Init logging, ignore error if already set
    let _ = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(Level::DEBUG)
        .with_writer(io::stderr)
        .try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play(Choice),
    Language(Language),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Choice(#[from] ParseChoiceError),
    #[error(transparent)]
    Language(#[from] ParseLanguageError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("q") {
            return Ok(Command::Quit);
        }
        if let Some(code) = line.strip_prefix("lang ") {
            return Ok(Command::Language(code.parse()?));
        }
        Ok(Command::Play(line.parse()?))
    }
}

fn render_header(session: &GameSession, output: &mut impl Write) -> io::Result<()> {
    let locale = session.locale();
    writeln!(output, "{}", locale.title)?;
    writeln!(output, "{}", locale.choose_option)?;
    let buttons: Vec<String> = Choice::ALL
        .iter()
        .map(|choice| format!("{} {}", choice.glyph(), choice.name()))
        .collect();
    let languages: Vec<&str> = Language::ALL.iter().map(|l| l.code()).collect();
    writeln!(
        output,
        "[{}]  lang <{}>  quit",
        buttons.join(" | "),
        languages.join("|")
    )
}

fn render_state(
    session: &GameSession,
    state: &SessionState,
    output: &mut impl Write,
) -> io::Result<()> {
    let locale = session.locale();
    let glyph = |choice: Option<Choice>| choice.map_or(" ", |c| c.glyph());
    writeln!(
        output,
        "{}  vs({})  {}   {}: {}: {}  {}: {}{}",
        glyph(state.last_player_choice),
        state.result_color.unwrap_or("-"),
        glyph(state.last_computer_choice),
        locale.scores,
        locale.your_score,
        state.player_score,
        locale.computer_score,
        state.computer_score,
        if state.input_locked { "  ⏳" } else { "" },
    )
}

/// Feeds commands read from `input` into the session and writes each
/// published snapshot to `output`, until `quit`, end of input or `shutdown`.
pub async fn serve<R, W>(
    mut session: GameSession,
    input: R,
    mut output: W,
    shutdown: impl Future<Output = ()>,
) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut receiver = session.subscribe();
    receiver.mark_unchanged();
    tokio::pin!(shutdown);

    info!("Serving game session {}", session.id());
    render_header(&session, &mut output)?;
    loop {
        tokio::select! {
            biased;
            changed = receiver.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = receiver.borrow_and_update().clone();
                render_state(&session, &state, &mut output)?;
            }
            _ = &mut shutdown => {
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Play(choice)) => {
                        if session.submit_choice(choice).is_none() {
                            writeln!(output, "⏳")?;
                        }
                    }
                    Ok(Command::Language(language)) => {
                        if session.set_language(language) {
                            render_header(&session, &mut output)?;
                        }
                    }
                    Ok(Command::Quit) => break,
                    Err(e) => writeln!(output, "{}", e)?,
                }
            }
        }
    }
    session.teardown();
    output.flush()?;
    info!("Game session {} finished", session.id());
    Ok(())
}
