//! Monster turn planning.
//!
//! Planning is read-only over the world; the engine applies the returned
//! plan afterward. This keeps a monster's decision logic from holding a
//! mutable borrow of the map it is inspecting.

use rand::Rng;
use rand::rngs::StdRng;

use hd_core::ai::Ai;
use hd_core::entity::{Entity, palette};
use hd_core::map::GameMap;
use hd_core::message::Message;

use crate::nav::Nav;

/// What a monster decided to do this turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AiAction {
    /// Stand still.
    None,
    /// Step to an adjacent tile.
    Move(i32, i32),
    /// Attack the player.
    Attack,
}

/// A monster's resolved turn: the action to apply, the behavior it carries
/// into the next turn, and any messages to log.
#[derive(Debug)]
pub(crate) struct AiPlan {
    pub action: AiAction,
    pub next_ai: Ai,
    pub messages: Vec<Message>,
}

/// Plan one monster turn.
///
/// `visible` is the player's current field-of-view mask; sight is treated as
/// symmetric, so a monster inside it can see the player.
pub(crate) fn plan(
    monster: &Entity,
    ai: Ai,
    player: &Entity,
    map: &GameMap,
    visible: &[bool],
    nav: &dyn Nav,
    rng: &mut StdRng,
) -> AiPlan {
    match ai {
        Ai::Basic => plan_basic(monster, player, map, visible, nav),
        Ai::Confused { previous, turns } if turns > 0 => {
            plan_confused(monster, player, map, rng, previous, turns)
        }
        Ai::Confused { previous, .. } => AiPlan {
            // The restored behavior acts on the next turn, not this one.
            action: AiAction::None,
            next_ai: *previous,
            messages: vec![Message::colored(
                format!("The {} is no longer confused!", monster.name),
                palette::RED,
            )],
        },
    }
}

fn plan_basic(
    monster: &Entity,
    player: &Entity,
    map: &GameMap,
    visible: &[bool],
    nav: &dyn Nav,
) -> AiPlan {
    let mut action = AiAction::None;

    if in_mask(visible, map, monster.x, monster.y) {
        if monster.distance_to(player) >= 2.0 {
            let blocked: Vec<(i32, i32)> = map
                .entities
                .iter()
                .filter(|e| e.blocks && e.id != monster.id)
                .map(|e| (e.x, e.y))
                .collect();
            if let Some((x, y)) = nav.next_step(
                map,
                (monster.x, monster.y),
                (player.x, player.y),
                &blocked,
            ) && (x, y) != (player.x, player.y)
            {
                action = AiAction::Move(x, y);
            }
        } else if player.is_alive() {
            action = AiAction::Attack;
        }
    }

    AiPlan {
        action,
        next_ai: Ai::Basic,
        messages: Vec::new(),
    }
}

fn plan_confused(
    monster: &Entity,
    player: &Entity,
    map: &GameMap,
    rng: &mut StdRng,
    previous: Box<Ai>,
    turns: i32,
) -> AiPlan {
    // Resample until the offset is diagonal or stationary; purely
    // axis-aligned stumbles are rejected.
    let (dx, dy) = loop {
        let dx = rng.random_range(-1..=1);
        let dy = rng.random_range(-1..=1);
        if (dx == 0) == (dy == 0) {
            break (dx, dy);
        }
    };

    let mut action = AiAction::None;
    if (dx, dy) != (0, 0) {
        let (nx, ny) = (monster.x + dx, monster.y + dy);
        if map.is_walkable(nx, ny)
            && map.blocking_entity_at(nx, ny).is_none()
            && (nx, ny) != (player.x, player.y)
        {
            action = AiAction::Move(nx, ny);
        }
    }

    AiPlan {
        action,
        next_ai: Ai::Confused {
            previous,
            turns: turns - 1,
        },
        messages: Vec::new(),
    }
}

fn in_mask(visible: &[bool], map: &GameMap, x: i32, y: i32) -> bool {
    map.in_bounds(x, y)
        && visible
            .get(usize::try_from(y * map.width + x).unwrap_or(usize::MAX))
            .copied()
            .unwrap_or(false)
}
