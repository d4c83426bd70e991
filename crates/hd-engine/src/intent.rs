/// The stat raised by a level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelUpChoice {
    /// +20 base maximum hit points and +20 current hit points.
    Hp,
    /// +1 base attack power.
    Strength,
    /// +1 base defense.
    Defense,
}

/// One abstract player action. The engine consumes exactly one per tick.
///
/// Intents carry no knowledge of the current state; the engine decides what
/// each one means (or ignores it) based on the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Step or attack one tile in the given direction.
    Move {
        /// Horizontal offset, -1..=1.
        dx: i32,
        /// Vertical offset, -1..=1.
        dy: i32,
    },
    /// Pass the turn.
    Wait,
    /// Pick up the item at the player's tile.
    Pickup,
    /// Open the inventory for item use.
    OpenInventory,
    /// Open the inventory for dropping.
    OpenDropMenu,
    /// Act on the inventory item at this index (use or drop, per state).
    SelectItem(usize),
    /// Take the stairs at the player's tile.
    TakeStairs,
    /// Resolve the pending level-up.
    LevelUp(LevelUpChoice),
    /// Open the character sheet.
    OpenCharacterScreen,
    /// Target a tile (targeting mode only).
    Click {
        /// Targeted column.
        x: i32,
        /// Targeted row.
        y: i32,
    },
    /// Leave the current modal state or abort targeting.
    Cancel,
}
