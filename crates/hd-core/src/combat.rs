use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, palette};
use crate::message::Message;

/// Hit points, attack and defense stats, and the xp reward for a kill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combat {
    /// Maximum hit points before equipment and buff bonuses.
    pub base_max_hp: i32,
    /// Current hit points.
    pub hp: i32,
    /// Attack power before bonuses.
    pub base_power: i32,
    /// Defense before bonuses.
    pub base_defense: i32,
    /// Experience awarded to whoever lands the killing blow.
    pub xp: i32,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Combat {
    /// Create a combat block at full health.
    pub fn new(hp: i32, defense: i32, power: i32, xp: i32) -> Self {
        Self {
            base_max_hp: hp,
            hp,
            base_power: power,
            base_defense: defense,
            xp,
            owner: EntityId::default(),
        }
    }
}

/// The outcome of an attack or damage application, reported as data.
///
/// Combat never raises recoverable errors: a blocked hit is a message,
/// a lethal hit is a death event carrying the xp reward.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    /// Something to show the player.
    Message(Message),
    /// An entity's hit points dropped to zero or below.
    Death {
        /// The entity that died.
        victim: EntityId,
        /// Experience awarded for the kill.
        xp: i32,
    },
}

/// Resolve one melee attack.
///
/// Damage is the attacker's effective power minus the defender's effective
/// defense; a non-positive result never reduces hit points.
pub fn attack(attacker: &Entity, target: &mut Entity) -> Vec<CombatEvent> {
    let damage = attacker.power() - target.defense();

    if damage > 0 {
        let mut events = vec![CombatEvent::Message(Message::new(format!(
            "{} attacks {} for {} HP of damage!",
            attacker.name, target.name, damage
        )))];
        events.extend(take_damage(target, damage));
        events
    } else {
        vec![CombatEvent::Message(Message::new(format!(
            "{} attacks {}, but does no damage.",
            attacker.name, target.name
        )))]
    }
}

/// Apply raw damage; a death event fires when hit points reach zero.
pub fn take_damage(target: &mut Entity, amount: i32) -> Vec<CombatEvent> {
    let Some(combat) = target.combat.as_mut() else {
        return Vec::new();
    };
    combat.hp -= amount;
    if combat.hp <= 0 {
        vec![CombatEvent::Death {
            victim: combat.owner,
            xp: combat.xp,
        }]
    } else {
        Vec::new()
    }
}

/// Restore hit points up to the effective maximum.
pub fn heal(target: &mut Entity, amount: i32) {
    let max_hp = target.max_hp();
    if let Some(combat) = target.combat.as_mut() {
        combat.hp = (combat.hp + amount).min(max_hp);
    }
}

/// Convert a dead monster into a non-blocking corpse.
///
/// Combat and AI capabilities are removed; only name, glyph and colors change.
pub fn kill_monster(monster: &mut Entity) -> Message {
    let notice = Message::colored(format!("{} is dead!", monster.name), palette::ORANGE);

    monster.glyph = '%';
    monster.fg = palette::RED;
    monster.blocks = false;
    monster.combat = None;
    monster.ai = None;
    monster.name = format!("remains of {}", monster.name);
    monster.kind = crate::entity::EntityKind::Corpse;

    notice
}

/// Mark the player as dead. The player keeps their name and capabilities so
/// the death screen can still show stats.
pub fn kill_player(player: &mut Entity) -> Message {
    player.glyph = '%';
    player.fg = palette::RED;
    Message::colored("You died!", palette::RED)
}
