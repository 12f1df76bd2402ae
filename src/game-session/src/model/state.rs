use common::model::{
    game::{Choice, Outcome},
    locale::Language,
};
use serde::Serialize;

/// Everything the presentation layer renders. Published as a whole after
/// each batch of writes.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub last_player_choice: Option<Choice>,
    pub last_computer_choice: Option<Choice>,
    pub last_outcome: Option<Outcome>,
    pub result_color: Option<&'static str>,
    pub input_locked: bool,
    pub player_score: u32,
    pub computer_score: u32,
    pub active_language: Language,
    pub rounds_played: u32,
}

impl SessionState {
    pub fn initial(language: Language) -> Self {
        SessionState {
            last_player_choice: None,
            last_computer_choice: None,
            last_outcome: None,
            result_color: None,
            input_locked: false,
            player_score: 0,
            computer_score: 0,
            active_language: language,
            rounds_played: 0,
        }
    }

    pub(crate) fn apply_round(&mut self, round: &RoundReport) {
        self.input_locked = true;
        self.last_player_choice = Some(round.player);
        self.last_computer_choice = Some(round.computer);
        self.last_outcome = Some(round.outcome);
        self.result_color = Some(round.outcome.indicator_color());
        match round.outcome {
            Outcome::Win => self.player_score += 1,
            Outcome::Loss => self.computer_score += 1,
            Outcome::Tie => {}
        }
        self.rounds_played += 1;
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    pub player: Choice,
    pub computer: Choice,
    pub outcome: Outcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(player: Choice, computer: Choice) -> RoundReport {
        RoundReport {
            player,
            computer,
            outcome: common::model::game::resolve(player, computer),
        }
    }

    #[test]
    fn win_bumps_player_only() {
        let mut state = SessionState::initial(Language::En);
        state.apply_round(&round(Choice::Rock, Choice::Scissors));
        assert_eq!((state.player_score, state.computer_score), (1, 0));
        assert_eq!(state.result_color, Some("#07ff27"));
        assert!(state.input_locked);
    }

    #[test]
    fn tie_keeps_scores() {
        let mut state = SessionState::initial(Language::En);
        state.apply_round(&round(Choice::Paper, Choice::Paper));
        assert_eq!((state.player_score, state.computer_score), (0, 0));
        assert_eq!(state.last_outcome, Some(Outcome::Tie));
        assert_eq!(state.rounds_played, 1);
    }

    #[test]
    fn snapshot_serializes() {
        let mut state = SessionState::initial(Language::Es);
        state.apply_round(&round(Choice::Scissors, Choice::Rock));
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["last_player_choice"], "scissors");
        assert_eq!(json["last_outcome"], "loss");
        assert_eq!(json["computer_score"], 1);
        assert_eq!(json["active_language"], "es");
    }
}
