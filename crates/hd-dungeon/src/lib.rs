//! Dungeon generation for Hollowdeep.
//!
//! Builds one connected floor per depth (rejection-sampled rooms joined by
//! L-shaped corridors) and populates it with monsters and items drawn from
//! depth-scaled tables. Generation is deterministic for a given RNG state.

/// The static monster/item definition catalog.
pub mod catalog;
/// Room layout: placement, corridors, and stairs.
pub mod layout;
/// Axis-aligned rectangles used during generation.
pub mod rect;
/// Monster/item spawning into generated rooms.
pub mod seeder;
/// Depth-scaled value tables and weighted selection.
pub mod tables;

/// Re-export the catalog handle.
pub use catalog::Catalog;
/// Re-export the layout entry points.
pub use layout::{LayoutConfig, build_floor};
/// Re-export the generation rectangle.
pub use rect::Rect;
