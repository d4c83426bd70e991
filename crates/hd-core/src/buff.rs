use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId, palette};
use crate::message::Message;

/// Which derived stat a buff modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Bonus attack power.
    Power,
    /// Bonus defense.
    Defense,
    /// Bonus maximum hit points.
    MaxHp,
}

/// A timed, reversible stat modifier owned by exactly one entity.
/// Removal on expiry is permanent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Buff {
    /// The stat being modified.
    pub kind: BuffKind,
    /// Flat bonus applied while active.
    pub bonus: i32,
    /// Turns remaining before expiry.
    pub turns: i32,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Buff {
    /// Create a new buff.
    pub fn new(kind: BuffKind, bonus: i32, turns: i32) -> Self {
        Self {
            kind,
            bonus,
            turns,
            owner: EntityId::default(),
        }
    }

    fn expiry_message(kind: BuffKind) -> Message {
        let text = match kind {
            BuffKind::Power => "You feel your strength return to normal.",
            BuffKind::Defense => "You feel your skin return to normal.",
            BuffKind::MaxHp => "You feel your health return to normal.",
        };
        Message::colored(text, palette::YELLOW)
    }
}

impl Entity {
    /// Advance all buffs by one turn, detaching those that expire.
    ///
    /// Expired MaxHp buffs clamp current hit points down if they now exceed
    /// the reduced maximum.
    pub fn tick_buffs(&mut self) -> Vec<Message> {
        let mut messages = Vec::new();
        let mut clamp_hp = false;

        for buff in &mut self.buffs {
            buff.turns -= 1;
            if buff.turns <= 0 {
                messages.push(Buff::expiry_message(buff.kind));
                if buff.kind == BuffKind::MaxHp {
                    clamp_hp = true;
                }
            }
        }
        self.buffs.retain(|b| b.turns > 0);

        if clamp_hp {
            let max_hp = self.max_hp();
            if let Some(combat) = self.combat.as_mut()
                && combat.hp > max_hp
            {
                combat.hp = max_hp;
            }
        }

        messages
    }
}
