use std::{
    collections::VecDeque,
    fs,
    sync::{Arc, Mutex},
    time::Duration,
};

use common::model::{
    game::{Choice, Outcome},
    locale::{Language, LocaleTable},
};
use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, info, Level};

use crate::{
    entrypoint::SessionConfig,
    service::{opponent::Strategy, session::GameSession},
};

#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
enum Event {
    Submit {
        choice: Choice,
        opponent: Choice,
        accepted: bool,
    },
    SetLanguage {
        language: Language,
    },
    Advance {
        ms: u64,
    },
    Teardown,
    Expect(Expectation),
    Comment {
        text: String,
    },
}

#[derive(Deserialize, Debug)]
struct Expectation {
    last_player_choice: Option<Choice>,
    last_computer_choice: Option<Choice>,
    last_outcome: Option<Outcome>,
    result_color: Option<String>,
    input_locked: Option<bool>,
    player_score: Option<u32>,
    computer_score: Option<u32>,
    active_language: Option<Language>,
    cleared: Option<bool>,
}

#[derive(Deserialize)]
pub struct TestCase {
    #[serde(default)]
    lock_language_during_cooldown: bool,
    sequence: Vec<Event>,
}

// Hands out whatever move the runner queued for the next round
struct Queued(Arc<Mutex<VecDeque<Choice>>>);

impl Strategy for Queued {
    fn make_move(&mut self) -> Choice {
        self.0
            .lock()
            .expect("Opponent queue poisoned")
            .pop_front()
            .expect("No opponent move queued")
    }
}

impl TestCase {
    pub fn load(name: &str) -> Self {
        let file_path = env!("CARGO_MANIFEST_DIR").to_string() + "/test/data/" + name;
        let text = fs::read_to_string(&file_path)
            .unwrap_or_else(|e| panic!("Unable to read {}: {}", file_path, e));
        serde_json::from_str(&text).expect("Could not parse test case")
    }

    pub async fn run(&self) {
        // Init logging, ignore error if already set
        let _ = tracing_subscriber::fmt()
            .with_line_number(true)
            .with_file(true)
            .with_max_level(Level::DEBUG)
            .with_test_writer()
            .try_init();

        let opponent = Arc::new(Mutex::new(VecDeque::new()));
        let config = SessionConfig {
            lock_language_during_cooldown: self.lock_language_during_cooldown,
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(
            config,
            LocaleTable::embedded().expect("Embedded locales should be valid"),
            Box::new(Queued(opponent.clone())),
        )
        .expect("Failed to create session");

        for (step, event) in self.sequence.iter().enumerate() {
            debug!("Step {}: {:?}", step, event);
            match event {
                Event::Submit {
                    choice,
                    opponent: computer,
                    accepted,
                } => {
                    opponent
                        .lock()
                        .expect("Opponent queue poisoned")
                        .push_back(*computer);
                    let round = session.submit_choice(*choice);
                    assert_eq!(round.is_some(), *accepted, "step {}", step);
                    // An ignored submission must not consume the queued move
                    opponent.lock().expect("Opponent queue poisoned").clear();
                }
                Event::SetLanguage { language } => {
                    session.set_language(*language);
                }
                Event::Advance { ms } => sleep(Duration::from_millis(*ms)).await,
                Event::Teardown => session.teardown(),
                Event::Expect(expected) => Self::check(&session, expected, step),
                Event::Comment { text } => info!("Comment: {}", text),
            }
        }
    }

    fn check(session: &GameSession, expected: &Expectation, step: usize) {
        let state = session.snapshot();
        if let Some(choice) = expected.last_player_choice {
            assert_eq!(state.last_player_choice, Some(choice), "step {}", step);
        }
        if let Some(choice) = expected.last_computer_choice {
            assert_eq!(state.last_computer_choice, Some(choice), "step {}", step);
        }
        if let Some(outcome) = expected.last_outcome {
            assert_eq!(state.last_outcome, Some(outcome), "step {}", step);
        }
        if let Some(color) = &expected.result_color {
            assert_eq!(state.result_color, Some(color.as_str()), "step {}", step);
        }
        if let Some(locked) = expected.input_locked {
            assert_eq!(state.input_locked, locked, "step {}", step);
        }
        if let Some(score) = expected.player_score {
            assert_eq!(state.player_score, score, "step {}", step);
        }
        if let Some(score) = expected.computer_score {
            assert_eq!(state.computer_score, score, "step {}", step);
        }
        if let Some(language) = expected.active_language {
            assert_eq!(state.active_language, language, "step {}", step);
        }
        if expected.cleared == Some(true) {
            assert_eq!(state.last_player_choice, None, "step {}", step);
            assert_eq!(state.last_computer_choice, None, "step {}", step);
            assert_eq!(state.result_color, None, "step {}", step);
        }
    }
}

mod tests {
    use super::TestCase;

    #[tokio::test(start_paused = true)]
    async fn win_then_cooldown() {
        TestCase::load("win_then_cooldown.json").run().await;
    }

    #[tokio::test(start_paused = true)]
    async fn mixed_rounds() {
        TestCase::load("mixed_rounds.json").run().await;
    }

    #[tokio::test(start_paused = true)]
    async fn language_switching() {
        TestCase::load("language_switching.json").run().await;
    }

    #[tokio::test(start_paused = true)]
    async fn locked_language_switching() {
        TestCase::load("locked_language_switching.json").run().await;
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_mid_cooldown() {
        TestCase::load("teardown_mid_cooldown.json").run().await;
    }
}
