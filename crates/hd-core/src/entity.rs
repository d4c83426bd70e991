use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ai::Ai;
use crate::buff::{Buff, BuffKind};
use crate::combat::Combat;
use crate::equipment::{Equipment, Equippable};
use crate::inventory::Inventory;
use crate::item::Item;
use crate::level::Level;
use crate::stairs::Stairs;

/// Unique identifier for every entity in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Generate a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// An RGB color triple.
pub type Color = (u8, u8, u8);

/// Common display colors, roughly the classic terminal roguelike palette.
pub mod palette {
    use super::Color;

    /// Default foreground.
    pub const WHITE: Color = (255, 255, 255);
    /// Warnings and minor notices.
    pub const YELLOW: Color = (255, 255, 0);
    /// Blood, corpses, the player's demise.
    pub const RED: Color = (255, 0, 0);
    /// Monster death notices.
    pub const ORANGE: Color = (255, 165, 0);
    /// Healing.
    pub const GREEN: Color = (0, 255, 0);
    /// Confusion taking hold.
    pub const LIGHT_GREEN: Color = (63, 255, 63);
    /// Item pickups.
    pub const LIGHT_BLUE: Color = (127, 127, 255);
    /// Restful moments.
    pub const LIGHT_VIOLET: Color = (191, 127, 255);
    /// Targeting prompts.
    pub const LIGHT_CYAN: Color = (127, 255, 255);
    /// Confusion effects.
    pub const LIGHT_PINK: Color = (255, 159, 191);
    /// Orcs.
    pub const DESATURATED_GREEN: Color = (63, 127, 63);
    /// Trolls.
    pub const DARKER_GREEN: Color = (0, 127, 0);
    /// Blades.
    pub const SKY: Color = (0, 191, 255);
    /// Potions.
    pub const VIOLET: Color = (127, 0, 255);
    /// Shields.
    pub const DARKER_ORANGE: Color = (127, 63, 0);
}

/// The broad kind of an entity, driving rendering and engine dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// The one live player character.
    Player,
    /// A monster or NPC that acts on its own turn.
    Actor,
    /// Something that can be picked up and used.
    Item,
    /// A staircase between dungeon floors.
    Stairs,
    /// The remains of a dead actor.
    Corpse,
}

/// A generic world object: the player, monsters, items, stairs, corpses.
///
/// Capabilities are optional sub-objects owned exclusively by their entity.
/// Each capability carries an id-based back-reference to its owner which is
/// rebuilt after deserialization; there is never a second owning edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    /// Stable identity, also used by back-references and equipment slots.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Broad classification.
    pub kind: EntityKind,
    /// Horizontal map position.
    pub x: i32,
    /// Vertical map position.
    pub y: i32,
    /// Display glyph.
    pub glyph: char,
    /// Foreground color.
    pub fg: Color,
    /// Background color.
    pub bg: Color,
    /// Whether this entity blocks movement through its tile.
    pub blocks: bool,
    /// Hit points, attack and defense stats.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combat: Option<Combat>,
    /// Autonomous behavior.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai: Option<Ai>,
    /// Usability as an item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
    /// Carried item entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Inventory>,
    /// Staircase link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stairs: Option<Stairs>,
    /// Experience and level progression.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Level>,
    /// Worn/wielded equipment slots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Equipment>,
    /// Stat bonuses granted when this entity is equipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equippable: Option<Equippable>,
    /// Active timed stat buffs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buffs: Vec<Buff>,
}

impl Entity {
    /// Create an entity with no capabilities, white on black, non-blocking.
    pub fn new(kind: EntityKind, name: impl Into<String>, x: i32, y: i32, glyph: char) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind,
            x,
            y,
            glyph,
            fg: palette::WHITE,
            bg: (0, 0, 0),
            blocks: false,
            combat: None,
            ai: None,
            item: None,
            inventory: None,
            stairs: None,
            level: None,
            equipment: None,
            equippable: None,
            buffs: Vec::new(),
        }
    }

    /// Set the foreground color.
    pub fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Mark the entity as blocking movement.
    pub fn with_blocks(mut self, blocks: bool) -> Self {
        self.blocks = blocks;
        self
    }

    /// Attach a Combat capability.
    pub fn with_combat(mut self, mut combat: Combat) -> Self {
        combat.owner = self.id;
        self.combat = Some(combat);
        self
    }

    /// Attach an AI capability.
    pub fn with_ai(mut self, ai: Ai) -> Self {
        self.ai = Some(ai);
        self
    }

    /// Attach an Item capability.
    pub fn with_item(mut self, mut item: Item) -> Self {
        item.owner = self.id;
        self.item = Some(item);
        self
    }

    /// Attach an Inventory capability.
    pub fn with_inventory(mut self, mut inventory: Inventory) -> Self {
        inventory.owner = self.id;
        self.inventory = Some(inventory);
        self
    }

    /// Attach a Stairs capability.
    pub fn with_stairs(mut self, mut stairs: Stairs) -> Self {
        stairs.owner = self.id;
        self.stairs = Some(stairs);
        self
    }

    /// Attach a Level capability.
    pub fn with_level(mut self, mut level: Level) -> Self {
        level.owner = self.id;
        self.level = Some(level);
        self
    }

    /// Attach an Equipment capability.
    pub fn with_equipment(mut self, mut equipment: Equipment) -> Self {
        equipment.owner = self.id;
        self.equipment = Some(equipment);
        self
    }

    /// Attach an Equippable capability.
    ///
    /// An equippable entity without an Item capability gains a passive one so
    /// it can be picked up and used through the same inventory paths.
    pub fn with_equippable(mut self, mut equippable: Equippable) -> Self {
        equippable.owner = self.id;
        self.equippable = Some(equippable);
        if self.item.is_none() {
            let mut item = Item::passive();
            item.owner = self.id;
            self.item = Some(item);
        }
        self
    }

    /// Attach a timed buff.
    pub fn add_buff(&mut self, mut buff: Buff) {
        buff.owner = self.id;
        self.buffs.push(buff);
    }

    /// Whether the entity has a Combat capability with hit points left.
    pub fn is_alive(&self) -> bool {
        self.combat.as_ref().is_some_and(|c| c.hp > 0)
    }

    // -----------------------------------------------------------------------
    // Derived stats: base + equipped bonuses + matching active buffs
    // -----------------------------------------------------------------------

    /// Effective attack power.
    pub fn power(&self) -> i32 {
        let base = self.combat.as_ref().map_or(0, |c| c.base_power);
        base + self.equipment_bonus(|e| e.power_bonus) + self.buff_bonus(BuffKind::Power)
    }

    /// Effective defense.
    pub fn defense(&self) -> i32 {
        let base = self.combat.as_ref().map_or(0, |c| c.base_defense);
        base + self.equipment_bonus(|e| e.defense_bonus) + self.buff_bonus(BuffKind::Defense)
    }

    /// Effective maximum hit points.
    pub fn max_hp(&self) -> i32 {
        let base = self.combat.as_ref().map_or(0, |c| c.base_max_hp);
        base + self.equipment_bonus(|e| e.max_hp_bonus) + self.buff_bonus(BuffKind::MaxHp)
    }

    fn equipment_bonus(&self, pick: impl Fn(&Equippable) -> i32) -> i32 {
        let (Some(equipment), Some(inventory)) = (&self.equipment, &self.inventory) else {
            return 0;
        };
        [equipment.main_hand, equipment.off_hand]
            .into_iter()
            .flatten()
            .filter_map(|id| inventory.find(id))
            .filter_map(|item| item.equippable.as_ref())
            .map(&pick)
            .sum()
    }

    fn buff_bonus(&self, kind: BuffKind) -> i32 {
        self.buffs
            .iter()
            .filter(|b| b.kind == kind)
            .map(|b| b.bonus)
            .sum()
    }

    // -----------------------------------------------------------------------
    // Geometry
    // -----------------------------------------------------------------------

    /// Euclidean distance to another entity.
    pub fn distance_to(&self, other: &Entity) -> f64 {
        self.distance(other.x, other.y)
    }

    /// Euclidean distance to a coordinate.
    pub fn distance(&self, x: i32, y: i32) -> f64 {
        let dx = f64::from(x - self.x);
        let dy = f64::from(y - self.y);
        (dx * dx + dy * dy).sqrt()
    }

    // -----------------------------------------------------------------------
    // Persistence support
    // -----------------------------------------------------------------------

    /// Rebuild capability owner back-references after deserialization and
    /// drop equipment slots that no longer resolve to an inventory item.
    pub fn restore_owners(&mut self) {
        let id = self.id;
        if let Some(c) = &mut self.combat {
            c.owner = id;
        }
        if let Some(i) = &mut self.item {
            i.owner = id;
        }
        if let Some(s) = &mut self.stairs {
            s.owner = id;
        }
        if let Some(l) = &mut self.level {
            l.owner = id;
        }
        if let Some(e) = &mut self.equippable {
            e.owner = id;
        }
        for buff in &mut self.buffs {
            buff.owner = id;
        }
        if let Some(inventory) = &mut self.inventory {
            inventory.owner = id;
            for item in &mut inventory.items {
                item.restore_owners();
            }
        }
        if let Some(mut equipment) = self.equipment.take() {
            equipment.owner = id;
            let resolves = |slot: Option<EntityId>| {
                slot.filter(|item_id| {
                    self.inventory
                        .as_ref()
                        .is_some_and(|inv| inv.find(*item_id).is_some())
                })
            };
            equipment.main_hand = resolves(equipment.main_hand);
            equipment.off_hand = resolves(equipment.off_hand);
            self.equipment = Some(equipment);
        }
    }
}
