use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Character level and experience progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    /// Current character level, starting at 1.
    pub current_level: i32,
    /// Experience accumulated toward the next level.
    pub current_xp: i32,
    /// Base experience required for a level-up.
    pub xp_base: i32,
    /// Additional experience required per current level.
    pub xp_factor: i32,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Default for Level {
    fn default() -> Self {
        Self::new()
    }
}

impl Level {
    /// Start at level 1 with the standard progression curve.
    pub fn new() -> Self {
        Self {
            current_level: 1,
            current_xp: 0,
            xp_base: 200,
            xp_factor: 150,
            owner: EntityId::default(),
        }
    }

    /// Experience needed to reach the next level.
    pub fn experience_to_next_level(&self) -> i32 {
        self.xp_base + self.current_level * self.xp_factor
    }

    /// Accumulate experience; returns `true` on a level-up.
    ///
    /// Levels at most once per call: excess experience carries forward
    /// without being re-checked against the new threshold.
    pub fn add_xp(&mut self, xp: i32) -> bool {
        self.current_xp += xp;

        if self.current_xp > self.experience_to_next_level() {
            self.current_xp -= self.experience_to_next_level();
            self.current_level += 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_at_level_one_is_350() {
        let level = Level::new();
        assert_eq!(level.experience_to_next_level(), 350);
    }

    #[test]
    fn exactly_threshold_does_not_level() {
        let mut level = Level::new();
        assert!(!level.add_xp(350));
        assert_eq!(level.current_level, 1);
        assert_eq!(level.current_xp, 350);
    }

    #[test]
    fn one_past_threshold_levels_with_carry() {
        let mut level = Level::new();
        assert!(level.add_xp(351));
        assert_eq!(level.current_level, 2);
        assert_eq!(level.current_xp, 1);
    }

    #[test]
    fn levels_at_most_once_per_call() {
        let mut level = Level::new();
        // 350 + 500 = 850 would clear both the level-1 and level-2
        // thresholds, but only one level-up happens per call.
        assert!(level.add_xp(851));
        assert_eq!(level.current_level, 2);
        assert_eq!(level.current_xp, 501);
    }
}
