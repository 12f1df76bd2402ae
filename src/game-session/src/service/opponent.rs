use common::model::game::Choice;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Picks the computer's move for a round.
pub trait Strategy: Send {
    fn make_move(&mut self) -> Choice;
}

// Uniform over the three choices, independent across rounds
pub struct RandomMove {
    rng: StdRng,
}

impl RandomMove {
    pub fn new() -> Self {
        RandomMove {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomMove {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomMove {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for RandomMove {
    fn make_move(&mut self) -> Choice {
        Choice::ALL[self.rng.random_range(0..Choice::ALL.len())]
    }
}

/// Replays a fixed list of moves, wrapping around at the end.
pub struct Scripted {
    moves: Vec<Choice>,
    next: usize,
}

impl Scripted {
    pub fn new(moves: Vec<Choice>) -> Self {
        assert!(!moves.is_empty(), "Scripted opponent needs at least one move");
        Scripted { moves, next: 0 }
    }
}

impl Strategy for Scripted {
    fn make_move(&mut self) -> Choice {
        let choice = self.moves[self.next];
        self.next = (self.next + 1) % self.moves.len();
        choice
    }
}
