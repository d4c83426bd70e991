use serde::{Deserialize, Serialize};

use crate::buff::BuffKind;
use crate::entity::EntityId;
use crate::message::Message;

/// What an item does when used.
///
/// A closed registry of effects: saved games store one of these tags plus
/// its parameters and never reference executable code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum ItemEffect {
    /// Restore hit points.
    Heal {
        /// Hit points restored.
        amount: i32,
    },
    /// Strike the nearest visible enemy within range.
    Lightning {
        /// Damage dealt to the struck enemy.
        damage: i32,
        /// Maximum strike distance.
        maximum_range: i32,
    },
    /// Damage every fighter near a targeted tile, the user included.
    Fireball {
        /// Damage dealt to each fighter in the blast.
        damage: i32,
        /// Blast radius around the targeted tile.
        radius: i32,
    },
    /// Scramble a visible enemy's behavior for a while.
    Confuse {
        /// Turns the confusion lasts.
        turns: i32,
    },
    /// Grant the user a timed stat buff.
    Buff {
        /// The stat being buffed.
        kind: BuffKind,
        /// Flat bonus while active.
        bonus: i32,
        /// Turns the buff lasts.
        turns: i32,
    },
}

impl ItemEffect {
    /// Whether applying this effect needs a targeted tile.
    pub fn needs_target(self) -> bool {
        matches!(self, Self::Fireball { .. } | Self::Confuse { .. })
    }
}

/// Usability as an item: an optional on-use effect plus targeting metadata.
///
/// An item without an effect is passive; using it either equips it (if
/// equippable) or reports that it cannot be used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// What using the item does, if anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<ItemEffect>,
    /// Prompt shown when the effect enters targeting mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targeting_message: Option<Message>,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Item {
    /// An item with an on-use effect.
    pub fn new(effect: ItemEffect) -> Self {
        Self {
            effect: Some(effect),
            targeting_message: None,
            owner: EntityId::default(),
        }
    }

    /// Set the targeting prompt.
    pub fn with_targeting_message(mut self, message: Message) -> Self {
        self.targeting_message = Some(message);
        self
    }

    /// An item with no on-use effect (equipment, quest items).
    pub fn passive() -> Self {
        Self {
            effect: None,
            targeting_message: None,
            owner: EntityId::default(),
        }
    }
}
