//! Turn engine for Hollowdeep.
//!
//! Drives the whole game loop server-side: one [`Intent`] in, a resolved
//! cascade of world mutations out (movement, combat, deaths, leveling, item
//! effects, buff expiry, floor transitions). Rendering, input translation,
//! and visibility computation live behind the [`Nav`] trait and the front
//! end; the engine never draws.

mod ai;
mod effects;
/// The turn engine itself.
pub mod engine;
/// Engine error types.
pub mod error;
/// Abstract player actions.
pub mod intent;
/// Visibility and pathfinding contract plus the grid implementation.
pub mod nav;
mod save;
/// The engine's finite-state machine.
pub mod state;

pub use engine::TurnEngine;
pub use error::{EngineError, EngineResult};
pub use intent::{Intent, LevelUpChoice};
pub use nav::{GridNav, Nav};
pub use state::GameState;
