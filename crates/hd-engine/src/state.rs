use serde::{Deserialize, Serialize};

/// The turn engine's finite-state machine.
///
/// Modal states (inventory, targeting, level-up, character screen, message
/// box) suspend normal turn flow; the engine remembers one previous state to
/// return to when the modal closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Waiting for the player's action.
    PlayerTurn,
    /// Monsters are acting. Transient within a single tick.
    EnemyTurn,
    /// The player is dead. Terminal for play; viewing modals still works.
    PlayerDead,
    /// Inventory overlay, selecting an item to use.
    ShowInventory,
    /// Inventory overlay, selecting an item to drop.
    DropInventory,
    /// An item effect is waiting for a targeted tile.
    Targeting,
    /// A level-up choice is pending.
    LevelUp,
    /// The character sheet overlay.
    CharacterScreen,
    /// A plain text overlay driven by the front end.
    MessageBox,
}
