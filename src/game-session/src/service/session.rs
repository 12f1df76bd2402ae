use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use common::model::{
    game::{resolve, Choice, Outcome},
    id::Id,
    locale::{Language, LocaleError, LocaleStrings, LocaleTable},
};
use thiserror::Error;
use tokio::{runtime::Handle, sync::watch};
use tracing::{debug, info, warn};

use crate::{
    entrypoint::SessionConfig,
    model::state::{RoundReport, SessionState},
    service::{cooldown::Cooldown, opponent::Strategy},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("game session must be created inside a tokio runtime: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
    #[error(transparent)]
    Locale(#[from] LocaleError),
}

/// Owns the state of one game view: takes the player's moves, draws the
/// computer's, keeps score and holds input back for a cooldown after each
/// round.
///
/// State changes are published through a `watch` channel, one snapshot per
/// operation, so observers never see a round half-applied.
pub struct GameSession {
    id: Id,
    config: SessionConfig,
    locales: LocaleTable,
    strategy: Box<dyn Strategy>,
    state: Arc<watch::Sender<SessionState>>,
    // Bumped on teardown so an unlock that already fired becomes a no-op
    epoch: Arc<AtomicU64>,
    cooldown: Cooldown,
}

impl GameSession {
    pub fn new(
        config: SessionConfig,
        locales: LocaleTable,
        strategy: Box<dyn Strategy>,
    ) -> Result<Self, SessionError> {
        locales.validate()?;
        let runtime = Handle::try_current()?;
        let (state, _) = watch::channel(SessionState::initial(config.default_language));
        let id = Id::new();
        info!("Created game session {}", id);
        Ok(GameSession {
            id,
            config,
            locales,
            strategy,
            state: Arc::new(state),
            epoch: Arc::new(AtomicU64::new(0)),
            cooldown: Cooldown::new(runtime),
        })
    }

    /// Plays one round. Returns `None` if input is locked by a cooldown, in
    /// which case nothing changes.
    pub fn submit_choice(&mut self, choice: Choice) -> Option<RoundReport> {
        let locked = self.state.borrow().input_locked;
        if locked {
            warn!("Session {} ignored {} during cooldown", self.id, choice);
            return None;
        }

        let computer = self.strategy.make_move();
        let round = RoundReport {
            player: choice,
            computer,
            outcome: resolve(choice, computer),
        };
        self.state.send_modify(|state| state.apply_round(&round));
        debug!(
            "Session {}: {} vs {} -> {:?}",
            self.id, round.player, round.computer, round.outcome
        );

        self.schedule_unlock();
        Some(round)
    }

    fn schedule_unlock(&mut self) {
        let state = Arc::downgrade(&self.state);
        let epoch = self.epoch.clone();
        let expected = epoch.load(Ordering::SeqCst);
        let id = self.id;
        self.cooldown.schedule(self.config.cooldown, move || {
            // Session may be gone by the time this fires
            let Some(state) = state.upgrade() else {
                return;
            };
            let unlocked = state.send_if_modified(|state| {
                if epoch.load(Ordering::SeqCst) != expected || !state.input_locked {
                    return false;
                }
                state.input_locked = false;
                true
            });
            if unlocked {
                debug!("Session {} accepting input again", id);
            }
        });
    }

    /// Switches the display language. Returns `false` if the change was
    /// ignored because the session is configured to lock language switching
    /// during the cooldown.
    pub fn set_language(&mut self, language: Language) -> bool {
        let lock_language = self.config.lock_language_during_cooldown;
        let mut ignored = false;
        self.state.send_if_modified(|state| {
            if lock_language && state.input_locked {
                ignored = true;
                return false;
            }
            if state.active_language == language {
                return false;
            }
            state.active_language = language;
            true
        });
        if ignored {
            warn!(
                "Session {} ignored language {} during cooldown",
                self.id, language
            );
        } else {
            debug!("Session {} language set to {}", self.id, language);
        }
        !ignored
    }

    /// Cancels any pending cooldown and puts every field back to its initial
    /// value. Safe to call repeatedly.
    pub fn teardown(&mut self) {
        self.cooldown.cancel();
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let initial = SessionState::initial(self.config.default_language);
        let changed = self.state.send_if_modified(|state| {
            if *state == initial {
                return false;
            }
            *state = initial.clone();
            true
        });
        if changed {
            info!("Tore down game session {}", self.id);
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Strings for the active language.
    pub fn locale(&self) -> &LocaleStrings {
        self.locales.get(self.active_language())
    }

    pub fn last_player_choice(&self) -> Option<Choice> {
        self.state.borrow().last_player_choice
    }

    pub fn last_computer_choice(&self) -> Option<Choice> {
        self.state.borrow().last_computer_choice
    }

    pub fn last_outcome(&self) -> Option<Outcome> {
        self.state.borrow().last_outcome
    }

    pub fn result_color(&self) -> Option<&'static str> {
        self.state.borrow().result_color
    }

    pub fn input_locked(&self) -> bool {
        self.state.borrow().input_locked
    }

    pub fn player_score(&self) -> u32 {
        self.state.borrow().player_score
    }

    pub fn computer_score(&self) -> u32 {
        self.state.borrow().computer_score
    }

    pub fn active_language(&self) -> Language {
        self.state.borrow().active_language
    }

    pub fn rounds_played(&self) -> u32 {
        self.state.borrow().rounds_played
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
