use std::collections::{HashSet, VecDeque};

use hd_core::map::GameMap;

/// Visibility and pathfinding consumed by the engine.
///
/// The engine only calls through this trait, so a front end with its own
/// field-of-view implementation can supply it without touching turn logic.
pub trait Nav: std::fmt::Debug {
    /// Boolean visibility mask over the whole grid, row-major, from an
    /// origin tile and a sight radius.
    fn fov(&self, map: &GameMap, origin: (i32, i32), radius: i32) -> Vec<bool>;

    /// The next tile along a shortest walkable path from `from` to `to`.
    ///
    /// Tiles in `blocked` are impassable except for `to` itself. Returns
    /// `None` when no path exists or `from == to`.
    fn next_step(
        &self,
        map: &GameMap,
        from: (i32, i32),
        to: (i32, i32),
        blocked: &[(i32, i32)],
    ) -> Option<(i32, i32)>;
}

/// Grid-based navigation: Bresenham line-of-sight for visibility, BFS over
/// walkable tiles (8-way) for shortest paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct GridNav;

const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

impl Nav for GridNav {
    fn fov(&self, map: &GameMap, origin: (i32, i32), radius: i32) -> Vec<bool> {
        let size = usize::try_from(map.width * map.height).unwrap_or(0);
        let mut mask = vec![false; size];
        let (ox, oy) = origin;

        for y in 0..map.height {
            for x in 0..map.width {
                let (dx, dy) = (x - ox, y - oy);
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                if line_of_sight(map, origin, (x, y)) {
                    mask[usize::try_from(y * map.width + x).unwrap_or(0)] = true;
                }
            }
        }
        mask
    }

    fn next_step(
        &self,
        map: &GameMap,
        from: (i32, i32),
        to: (i32, i32),
        blocked: &[(i32, i32)],
    ) -> Option<(i32, i32)> {
        if from == to {
            return None;
        }
        let size = usize::try_from(map.width * map.height).unwrap_or(0);
        let index = |(x, y): (i32, i32)| usize::try_from(y * map.width + x).unwrap_or(0);
        let blocked: HashSet<(i32, i32)> = blocked.iter().copied().collect();

        let mut parent: Vec<Option<(i32, i32)>> = vec![None; size];
        let mut seen = vec![false; size];
        let mut queue = VecDeque::new();
        seen[index(from)] = true;
        queue.push_back(from);

        while let Some((x, y)) = queue.pop_front() {
            if (x, y) == to {
                // Walk the parent chain back to the tile adjacent to `from`.
                let mut current = to;
                while let Some(previous) = parent[index(current)] {
                    if previous == from {
                        return Some(current);
                    }
                    current = previous;
                }
                return None;
            }
            for (dx, dy) in DIRECTIONS {
                let next = (x + dx, y + dy);
                if !map.is_walkable(next.0, next.1) {
                    continue;
                }
                if blocked.contains(&next) && next != to {
                    continue;
                }
                if !seen[index(next)] {
                    seen[index(next)] = true;
                    parent[index(next)] = Some((x, y));
                    queue.push_back(next);
                }
            }
        }
        None
    }
}

/// Whether every tile strictly between the endpoints is transparent.
/// The far endpoint itself may be opaque, so walls at the sight line's end
/// are still visible.
fn line_of_sight(map: &GameMap, from: (i32, i32), to: (i32, i32)) -> bool {
    let points = bresenham(from, to);
    let interior = points.len().saturating_sub(2);
    points
        .iter()
        .skip(1)
        .take(interior)
        .all(|&(x, y)| map.is_transparent(x, y))
}

fn bresenham(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (mut x, mut y) = from;
    let (x1, y1) = to;
    let dx = (x1 - x).abs();
    let dy = -(y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut points = vec![(x, y)];
    while (x, y) != (x1, y1) {
        let double = 2 * err;
        if double >= dy {
            err += dy;
            x += sx;
        }
        if double <= dx {
            err += dx;
            y += sy;
        }
        points.push((x, y));
    }
    points
}
