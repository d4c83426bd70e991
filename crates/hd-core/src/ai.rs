use serde::{Deserialize, Serialize};

/// Autonomous behavior attached to a monster.
///
/// This is pure data; the behavior itself runs in the turn engine. The closed
/// enum replaces the original system's dynamic behavior lookup so that saved
/// games never reference executable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ai {
    /// Chase the player while visible; attack when adjacent.
    Basic,
    /// Stumble diagonally (or stand still) for a number of turns, then
    /// return to the wrapped behavior.
    Confused {
        /// The behavior restored once the confusion wears off.
        previous: Box<Ai>,
        /// Turns of confusion remaining.
        turns: i32,
    },
}

impl Ai {
    /// Wrap an existing behavior in a confusion effect.
    pub fn confused(previous: Ai, turns: i32) -> Self {
        Self::Confused {
            previous: Box::new(previous),
            turns,
        }
    }
}
