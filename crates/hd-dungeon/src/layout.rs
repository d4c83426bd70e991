use rand::Rng;
use rand::rngs::StdRng;

use hd_core::entity::{Entity, EntityKind};
use hd_core::map::GameMap;
use hd_core::stairs::Stairs;

use crate::catalog::Catalog;
use crate::rect::Rect;
use crate::seeder;

/// Configuration for one floor's layout.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Maximum placement attempts; collisions are discarded, so the actual
    /// room count can be far lower.
    pub max_rooms: u32,
    /// Minimum room width/height.
    pub room_min_size: i32,
    /// Maximum room width/height.
    pub room_max_size: i32,
    /// Floor width in tiles.
    pub map_width: i32,
    /// Floor height in tiles.
    pub map_height: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_rooms: 10_000,
            room_min_size: 6,
            room_max_size: 10,
            map_width: 75,
            map_height: 75,
        }
    }
}

impl LayoutConfig {
    /// Set the maximum placement attempts.
    pub fn with_max_rooms(mut self, max_rooms: u32) -> Self {
        self.max_rooms = max_rooms;
        self
    }

    /// Set the room size bounds.
    pub fn with_room_size(mut self, min: i32, max: i32) -> Self {
        self.room_min_size = min;
        self.room_max_size = max;
        self
    }

    /// Set the floor dimensions.
    pub fn with_map_size(mut self, width: i32, height: i32) -> Self {
        self.map_width = width;
        self.map_height = height;
        self
    }
}

/// Generate one fully populated floor at the given depth.
///
/// Rooms are rejection-sampled up to `max_rooms` attempts; each accepted room
/// after the first is joined to its nearest predecessor by an L-shaped
/// corridor. The first room's center becomes the entry point and player
/// start; the last room's center receives the downstairs, and floors below
/// depth 1 get upstairs at the entry. Every room except the entry room is
/// then seeded with monsters and items.
pub fn build_floor(
    config: &LayoutConfig,
    depth: u32,
    rng: &mut StdRng,
    catalog: &Catalog,
) -> GameMap {
    let mut map = GameMap::new(config.map_width, config.map_height, depth);
    let mut rooms: Vec<Rect> = Vec::new();

    for _ in 0..config.max_rooms {
        let w = rng.random_range(config.room_min_size..=config.room_max_size);
        let h = rng.random_range(config.room_min_size..=config.room_max_size);
        let max_x = config.map_width - w - 2;
        let max_y = config.map_height - h - 2;
        if max_x < 0 || max_y < 0 {
            // Room cannot fit with a one-tile margin; discard the attempt.
            continue;
        }
        let x = rng.random_range(0..=max_x);
        let y = rng.random_range(0..=max_y);

        let new_room = Rect::new(x, y, w, h);
        if rooms.iter().any(|other| new_room.intersects(other)) {
            continue;
        }

        carve_room(&mut map, &new_room);
        let (new_x, new_y) = new_room.center();

        if rooms.is_empty() {
            map.entry = (new_x, new_y);
        } else {
            let (prev_x, prev_y) = nearest_room(&new_room, &rooms).center();
            // The coin flip decides carve order only; both arms connect the
            // same two centers.
            if rng.random_range(0..=1) == 1 {
                carve_h_corridor(&mut map, new_x, prev_x, new_y);
                carve_v_corridor(&mut map, prev_x, prev_y, new_y);
            } else {
                carve_v_corridor(&mut map, new_x, new_y, prev_y);
                carve_h_corridor(&mut map, new_x, prev_x, prev_y);
            }
        }

        rooms.push(new_room);
    }

    for room in rooms.iter().skip(1) {
        seeder::populate_room(&mut map, room, catalog, rng);
    }

    if let Some(last) = rooms.last() {
        map.exit = last.center();
        let (exit_x, exit_y) = map.exit;
        map.entities.push(
            Entity::new(EntityKind::Stairs, "Stairs", exit_x, exit_y, '>')
                .with_stairs(Stairs::down()),
        );
        if depth > 1 {
            let (entry_x, entry_y) = map.entry;
            map.entities.push(
                Entity::new(EntityKind::Stairs, "Stairs", entry_x, entry_y, '<')
                    .with_stairs(Stairs::up()),
            );
        }
    }

    map
}

/// The prior room nearest to `room` by center distance.
///
/// Candidates whose center shares `room`'s exact row or column are excluded
/// (degenerate corridor probes); ties keep the first-found minimum. When the
/// exclusion rules out every candidate, the plain nearest room is used so the
/// floor stays connected.
fn nearest_room<'a>(room: &Rect, others: &'a [Rect]) -> &'a Rect {
    let (x, y) = room.center();

    let mut nearest: Option<(&Rect, i32)> = None;
    for other in others {
        let (other_x, other_y) = other.center();
        if other_x == x || other_y == y {
            continue;
        }
        let d = center_distance(x, y, other_x, other_y);
        if nearest.is_none_or(|(_, best)| d < best) {
            nearest = Some((other, d));
        }
    }

    match nearest {
        Some((room, _)) => room,
        None => others
            .iter()
            .min_by_key(|other| {
                let (other_x, other_y) = other.center();
                center_distance(x, y, other_x, other_y)
            })
            .expect("caller guarantees at least one prior room"),
    }
}

fn center_distance(x1: i32, y1: i32, x2: i32, y2: i32) -> i32 {
    let dx = f64::from(x2 - x1);
    let dy = f64::from(y2 - y1);
    (dx * dx + dy * dy).sqrt() as i32
}

fn carve_room(map: &mut GameMap, room: &Rect) {
    for x in room.x1 + 1..room.x2 {
        for y in room.y1 + 1..room.y2 {
            map.carve(x, y);
        }
    }
}

fn carve_h_corridor(map: &mut GameMap, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        map.carve(x, y);
    }
}

fn carve_v_corridor(map: &mut GameMap, x: i32, y1: i32, y2: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        map.carve(x, y);
    }
}
