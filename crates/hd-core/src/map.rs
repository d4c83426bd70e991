use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

/// One cell of a dungeon floor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Whether entities can stand here.
    pub walkable: bool,
    /// Whether sight passes through.
    pub transparent: bool,
    /// Whether the player has ever seen this tile. Monotonic: once set it is
    /// never cleared.
    pub explored: bool,
    /// Display glyph.
    pub glyph: char,
}

impl Tile {
    fn wall() -> Self {
        Self {
            walkable: false,
            transparent: false,
            explored: false,
            glyph: '#',
        }
    }
}

/// One dungeon floor: a tile grid plus the entities on it.
///
/// Tiles are mutated only during generation. The entity list preserves
/// registration order, which is also the AI turn order. The player entity is
/// held by the engine and is never part of this list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameMap {
    /// Grid width in tiles.
    pub width: i32,
    /// Grid height in tiles.
    pub height: i32,
    /// Dungeon depth this floor sits at, 1-based.
    pub depth: u32,
    tiles: Vec<Tile>,
    /// Entities on this floor in registration order.
    pub entities: Vec<Entity>,
    /// Where the player enters this floor (first room's center).
    pub entry: (i32, i32),
    /// Where the downstairs sit (last room's center).
    pub exit: (i32, i32),
}

impl GameMap {
    /// Create a floor filled with solid wall.
    pub fn new(width: i32, height: i32, depth: u32) -> Self {
        let count = usize::try_from(width * height).unwrap_or(0);
        Self {
            width,
            height,
            depth,
            tiles: vec![Tile::wall(); count],
            entities: Vec::new(),
            entry: (0, 0),
            exit: (0, 0),
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        usize::try_from(y * self.width + x).unwrap_or(usize::MAX)
    }

    /// Whether a coordinate lies on the grid.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// The tile at a coordinate. Out-of-bounds coordinates yield `None`.
    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if self.in_bounds(x, y) {
            self.tiles.get(self.index(x, y))
        } else {
            None
        }
    }

    /// Mutable access to a tile. Used by generation only.
    pub fn tile_mut(&mut self, x: i32, y: i32) -> Option<&mut Tile> {
        if self.in_bounds(x, y) {
            let index = self.index(x, y);
            self.tiles.get_mut(index)
        } else {
            None
        }
    }

    /// Whether entities can stand at a coordinate.
    pub fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| t.walkable)
    }

    /// Whether sight passes through a coordinate.
    pub fn is_transparent(&self, x: i32, y: i32) -> bool {
        self.tile(x, y).is_some_and(|t| t.transparent)
    }

    /// Carve a tile into open floor.
    pub fn carve(&mut self, x: i32, y: i32) {
        if let Some(tile) = self.tile_mut(x, y) {
            tile.walkable = true;
            tile.transparent = true;
            tile.glyph = '.';
        }
    }

    /// Mark a tile as seen by the player.
    pub fn mark_explored(&mut self, x: i32, y: i32) {
        if let Some(tile) = self.tile_mut(x, y) {
            tile.explored = true;
        }
    }

    // -----------------------------------------------------------------------
    // Entity queries
    // -----------------------------------------------------------------------

    /// Index of the blocking entity standing at a coordinate, if any.
    pub fn blocking_entity_at(&self, x: i32, y: i32) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.blocks && e.x == x && e.y == y)
    }

    /// Index of the first item entity lying at a coordinate, if any.
    pub fn item_at(&self, x: i32, y: i32) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.item.is_some() && e.x == x && e.y == y)
    }

    /// Index of the stairs entity at a coordinate, if any.
    pub fn stairs_at(&self, x: i32, y: i32) -> Option<usize> {
        self.entities
            .iter()
            .position(|e| e.stairs.is_some() && e.x == x && e.y == y)
    }

    /// Whether any entity occupies a coordinate.
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        self.entities.iter().any(|e| e.x == x && e.y == y)
    }

    /// Find an entity on this floor by id.
    pub fn entity_index(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;
    use crate::item::Item;

    #[test]
    fn new_map_is_solid_wall() {
        let map = GameMap::new(10, 10, 1);
        assert!(!map.is_walkable(5, 5));
        assert!(!map.is_transparent(5, 5));
    }

    #[test]
    fn carve_opens_floor() {
        let mut map = GameMap::new(10, 10, 1);
        map.carve(3, 4);
        assert!(map.is_walkable(3, 4));
        assert!(map.is_transparent(3, 4));
        assert_eq!(map.tile(3, 4).unwrap().glyph, '.');
    }

    #[test]
    fn out_of_bounds_is_not_walkable() {
        let map = GameMap::new(10, 10, 1);
        assert!(!map.is_walkable(-1, 0));
        assert!(!map.is_walkable(10, 0));
        assert!(map.tile(0, 10).is_none());
    }

    #[test]
    fn explored_flag_is_set_once() {
        let mut map = GameMap::new(10, 10, 1);
        assert!(!map.tile(2, 2).unwrap().explored);
        map.mark_explored(2, 2);
        assert!(map.tile(2, 2).unwrap().explored);
    }

    #[test]
    fn entity_queries_respect_position_and_capability() {
        let mut map = GameMap::new(10, 10, 1);
        let blocker = Entity::new(EntityKind::Actor, "Orc", 2, 3, 'o').with_blocks(true);
        let loot = Entity::new(EntityKind::Item, "Potion", 2, 3, '!').with_item(Item::passive());
        map.entities.push(blocker);
        map.entities.push(loot);

        assert_eq!(map.blocking_entity_at(2, 3), Some(0));
        assert_eq!(map.item_at(2, 3), Some(1));
        assert_eq!(map.stairs_at(2, 3), None);
        assert!(map.is_occupied(2, 3));
        assert!(!map.is_occupied(4, 4));
    }
}
