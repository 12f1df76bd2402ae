use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Tie,
    Win,
    Loss,
}

impl Outcome {
    /// Background color of the "vs" badge after a round.
    pub fn indicator_color(&self) -> &'static str {
        match self {
            Outcome::Win => "#07ff27",
            Outcome::Loss => "#f44336",
            Outcome::Tie => "#07fffc",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

// Row: player, column: computer. Ordered like `Choice::ALL`.
const OUTCOMES: [[Outcome; 3]; 3] = [
    // rock vs rock, paper, scissors
    [Outcome::Tie, Outcome::Loss, Outcome::Win],
    // paper
    [Outcome::Win, Outcome::Tie, Outcome::Loss],
    // scissors
    [Outcome::Loss, Outcome::Win, Outcome::Tie],
];

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    fn index(self) -> usize {
        match self {
            Choice::Rock => 0,
            Choice::Paper => 1,
            Choice::Scissors => 2,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Choice::Rock => "✊",
            Choice::Paper => "✋",
            Choice::Scissors => "✌️",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }

    /// `None` when both sides picked the same thing.
    pub fn beats(&self, other: &Choice) -> Option<bool> {
        match resolve(*self, *other) {
            Outcome::Tie => None,
            Outcome::Win => Some(true),
            Outcome::Loss => Some(false),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown choice {0:?}, expected rock, paper or scissors")]
pub struct ParseChoiceError(pub String);

impl FromStr for Choice {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rock" | "r" => Ok(Choice::Rock),
            "paper" | "p" => Ok(Choice::Paper),
            "scissors" | "s" => Ok(Choice::Scissors),
            _ => Err(ParseChoiceError(s.to_owned())),
        }
    }
}

/// Outcome of a round from the player's point of view.
pub fn resolve(player: Choice, computer: Choice) -> Outcome {
    OUTCOMES[player.index()][computer.index()]
}
