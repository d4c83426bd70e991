//! Item effect resolution.
//!
//! Effects are a closed registry ([`ItemEffect`]); applying one mutates the
//! world and reports the outcome as combat events. "Failure" paths (no
//! target in range, already at full health) are messages, never errors, and
//! leave the item unconsumed.

use hd_core::ai::Ai;
use hd_core::buff::{Buff, BuffKind};
use hd_core::combat::{self, CombatEvent};
use hd_core::entity::{Entity, palette};
use hd_core::item::ItemEffect;
use hd_core::map::GameMap;
use hd_core::message::Message;

/// Whether the used item should leave the inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UseOutcome {
    /// The effect applied; remove the item.
    Consumed,
    /// The effect did not apply; the item stays.
    NotConsumed,
}

/// World access an effect needs while resolving.
pub(crate) struct EffectCx<'a> {
    pub player: &'a mut Entity,
    pub map: &'a mut GameMap,
    pub visible: &'a [bool],
}

impl EffectCx<'_> {
    fn in_fov(&self, x: i32, y: i32) -> bool {
        self.map.in_bounds(x, y)
            && self
                .visible
                .get(usize::try_from(y * self.map.width + x).unwrap_or(usize::MAX))
                .copied()
                .unwrap_or(false)
    }
}

/// Apply one effect, optionally at a targeted tile.
pub(crate) fn apply(
    effect: ItemEffect,
    target: Option<(i32, i32)>,
    cx: EffectCx<'_>,
) -> (UseOutcome, Vec<CombatEvent>) {
    match effect {
        ItemEffect::Heal { amount } => heal(cx, amount),
        ItemEffect::Lightning {
            damage,
            maximum_range,
        } => lightning(cx, damage, maximum_range),
        ItemEffect::Fireball { damage, radius } => fireball(cx, target, damage, radius),
        ItemEffect::Confuse { turns } => confuse(cx, target, turns),
        ItemEffect::Buff { kind, bonus, turns } => buff(cx, kind, bonus, turns),
    }
}

fn message(text: impl Into<String>, color: (u8, u8, u8)) -> CombatEvent {
    CombatEvent::Message(Message::colored(text, color))
}

fn heal(cx: EffectCx<'_>, amount: i32) -> (UseOutcome, Vec<CombatEvent>) {
    let max_hp = cx.player.max_hp();
    let hp = cx.player.combat.as_ref().map_or(0, |c| c.hp);

    if hp >= max_hp {
        (
            UseOutcome::NotConsumed,
            vec![message("You are already at full health.", palette::YELLOW)],
        )
    } else {
        combat::heal(cx.player, amount);
        (
            UseOutcome::Consumed,
            vec![message(
                "Your wounds start to feel better!",
                palette::GREEN,
            )],
        )
    }
}

/// Strike the nearest visible fighter within range, the user excluded.
fn lightning(cx: EffectCx<'_>, damage: i32, maximum_range: i32) -> (UseOutcome, Vec<CombatEvent>) {
    let mut nearest: Option<(usize, f64)> = None;
    for (index, entity) in cx.map.entities.iter().enumerate() {
        if entity.combat.is_none() || !cx.in_fov(entity.x, entity.y) {
            continue;
        }
        let distance = cx.player.distance_to(entity);
        let best = nearest.map_or(f64::from(maximum_range) + 1.0, |(_, d)| d);
        if distance < best {
            nearest = Some((index, distance));
        }
    }

    match nearest {
        Some((index, _)) => {
            let target = &mut cx.map.entities[index];
            let mut events = vec![message(
                format!(
                    "A lightning bolt strikes the {} with a loud thunder! The damage is {}.",
                    target.name, damage
                ),
                palette::WHITE,
            )];
            events.extend(combat::take_damage(target, damage));
            (UseOutcome::Consumed, events)
        }
        None => (
            UseOutcome::NotConsumed,
            vec![message("No enemy is close enough to strike.", palette::RED)],
        ),
    }
}

/// Burn every fighter within the blast radius, the user included.
fn fireball(
    cx: EffectCx<'_>,
    target: Option<(i32, i32)>,
    damage: i32,
    radius: i32,
) -> (UseOutcome, Vec<CombatEvent>) {
    let Some((tx, ty)) = target else {
        return (UseOutcome::NotConsumed, Vec::new());
    };
    if !cx.in_fov(tx, ty) {
        return (
            UseOutcome::NotConsumed,
            vec![message(
                "You cannot target a tile outside your field of view.",
                palette::YELLOW,
            )],
        );
    }

    let reach = f64::from(radius);
    let mut events = vec![message(
        format!("The fireball explodes, burning everything within {radius} tiles!"),
        palette::ORANGE,
    )];

    if cx.player.distance(tx, ty) <= reach {
        events.push(message(
            format!("The {} gets burned for {} hit points.", cx.player.name, damage),
            palette::ORANGE,
        ));
        events.extend(combat::take_damage(cx.player, damage));
    }
    for entity in cx.map.entities.iter_mut() {
        if entity.combat.is_some() && entity.distance(tx, ty) <= reach {
            events.push(message(
                format!("The {} gets burned for {} hit points.", entity.name, damage),
                palette::ORANGE,
            ));
            events.extend(combat::take_damage(entity, damage));
        }
    }

    (UseOutcome::Consumed, events)
}

/// Wrap the AI of a visible fighter at the targeted tile in confusion.
fn confuse(cx: EffectCx<'_>, target: Option<(i32, i32)>, turns: i32) -> (UseOutcome, Vec<CombatEvent>) {
    let Some((tx, ty)) = target else {
        return (UseOutcome::NotConsumed, Vec::new());
    };
    if !cx.in_fov(tx, ty) {
        return (
            UseOutcome::NotConsumed,
            vec![message(
                "You cannot target a tile outside your field of view.",
                palette::YELLOW,
            )],
        );
    }

    let victim = cx
        .map
        .entities
        .iter_mut()
        .find(|e| e.x == tx && e.y == ty && e.ai.is_some());
    match victim {
        Some(victim) => {
            let previous = victim.ai.take().unwrap_or(Ai::Basic);
            victim.ai = Some(Ai::confused(previous, turns));
            (
                UseOutcome::Consumed,
                vec![message(
                    format!(
                        "The eyes of the {} look vacant, as it starts to stumble around!",
                        victim.name
                    ),
                    palette::LIGHT_GREEN,
                )],
            )
        }
        None => (
            UseOutcome::NotConsumed,
            vec![message(
                "There is no targetable enemy at that location.",
                palette::YELLOW,
            )],
        ),
    }
}

fn buff(cx: EffectCx<'_>, kind: BuffKind, bonus: i32, turns: i32) -> (UseOutcome, Vec<CombatEvent>) {
    cx.player.add_buff(Buff::new(kind, bonus, turns));
    let text = match kind {
        BuffKind::Power => "A surge of strength floods through you!",
        BuffKind::Defense => "Your skin hardens into tough plates!",
        BuffKind::MaxHp => "Vitality floods through your body!",
    };
    (UseOutcome::Consumed, vec![message(text, palette::GREEN)])
}
