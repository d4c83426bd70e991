//! Places monsters and items into freshly carved rooms.

use rand::Rng;
use rand::rngs::StdRng;

use hd_core::map::GameMap;

use crate::catalog::Catalog;
use crate::rect::Rect;
use crate::tables::weighted_choice;

/// Seed one room with monsters and items from the catalog.
///
/// Per-room counts are rolled up to the depth-scaled caps. Each spawn probes
/// one random interior tile; an occupied tile forfeits that spawn rather than
/// re-rolling, so rooms are often under-populated.
pub fn populate_room(map: &mut GameMap, room: &Rect, catalog: &Catalog, rng: &mut StdRng) {
    if room.x2 - room.x1 < 2 || room.y2 - room.y1 < 2 {
        return;
    }
    let depth = map.depth;

    let max_monsters = catalog.max_monsters_per_room.value(depth).max(0);
    let max_items = catalog.max_items_per_room.value(depth).max(0);
    let monster_count = rng.random_range(0..=max_monsters);
    let item_count = rng.random_range(0..=max_items);

    let monster_weights: Vec<i32> = catalog
        .monsters
        .iter()
        .map(|m| m.weight.value(depth))
        .collect();
    for _ in 0..monster_count {
        let x = rng.random_range(room.x1 + 1..=room.x2 - 1);
        let y = rng.random_range(room.y1 + 1..=room.y2 - 1);
        if map.is_occupied(x, y) {
            continue;
        }
        if let Some(index) = weighted_choice(rng, &monster_weights) {
            map.entities.push(catalog.monsters[index].spawn(x, y));
        }
    }

    let item_weights: Vec<i32> = catalog
        .items
        .iter()
        .map(|i| i.weight.value(depth))
        .collect();
    for _ in 0..item_count {
        let x = rng.random_range(room.x1 + 1..=room.x2 - 1);
        let y = rng.random_range(room.y1 + 1..=room.y2 - 1);
        if map.is_occupied(x, y) {
            continue;
        }
        if let Some(index) = weighted_choice(rng, &item_weights) {
            map.entities.push(catalog.items[index].spawn(x, y));
        }
    }
}
