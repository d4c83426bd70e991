use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Which way a staircase leads.
///
/// A two-variant enum rather than a signed integer: an invalid direction is
/// unrepresentable instead of being asserted at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StairDirection {
    /// Toward the surface (shallower depth).
    Up,
    /// Deeper into the dungeon.
    Down,
}

/// Staircase capability connecting two dungeon floors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stairs {
    /// Travel direction.
    pub direction: StairDirection,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Stairs {
    /// Stairs leading down.
    pub fn down() -> Self {
        Self {
            direction: StairDirection::Down,
            owner: EntityId::default(),
        }
    }

    /// Stairs leading up.
    pub fn up() -> Self {
        Self {
            direction: StairDirection::Up,
            owner: EntityId::default(),
        }
    }
}
