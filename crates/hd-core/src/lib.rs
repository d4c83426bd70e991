//! Core world model for Hollowdeep: entities with optional capabilities,
//! dungeon maps, and the in-world message log.
//!
//! This crate holds data and the pure stat/damage logic that operates on it.
//! It knows nothing about turn order, dungeon generation, or rendering;
//! those live in `hd-dungeon` and `hd-engine`.

/// AI capability data: basic chase-and-attack or timed confusion.
pub mod ai;
/// Timed stat buffs and their per-turn expiry.
pub mod buff;
/// The Combat capability and attack/damage resolution.
pub mod combat;
/// Equipment slots and equippable stat bonuses.
pub mod equipment;
/// Entity types, identifiers, and derived stats.
pub mod entity;
/// Inventory capability owning item entities.
pub mod inventory;
/// The Item capability and the closed item-effect registry.
pub mod item;
/// Character level and experience tracking.
pub mod level;
/// One dungeon floor: tile grid plus its entity list.
pub mod map;
/// Player-facing messages and the wrapping message log.
pub mod message;
/// Stairs capability connecting dungeon floors.
pub mod stairs;

/// Re-export core entity types.
pub use entity::{Color, Entity, EntityId, EntityKind};
/// Re-export combat types.
pub use combat::{Combat, CombatEvent};
/// Re-export the map type.
pub use map::GameMap;
/// Re-export message types.
pub use message::{Message, MessageLog};
