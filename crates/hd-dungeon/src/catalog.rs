use std::sync::LazyLock;

use serde::Deserialize;

use hd_core::ai::Ai;
use hd_core::combat::Combat;
use hd_core::entity::{Color, Entity, EntityKind};
use hd_core::equipment::Equippable;
use hd_core::item::{Item, ItemEffect};
use hd_core::message::Message;

use crate::tables::DepthTable;

/// One monster definition.
#[derive(Debug, Clone, Deserialize)]
pub struct MonsterDef {
    /// Stable identifier used by tests and tooling.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub glyph: char,
    /// Foreground color.
    pub color: Color,
    /// Starting and maximum hit points.
    pub hp: i32,
    /// Base defense.
    pub defense: i32,
    /// Base attack power.
    pub power: i32,
    /// Experience awarded on kill.
    pub xp: i32,
    /// Depth-scaled spawn weight.
    pub weight: DepthTable,
}

/// One item definition.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDef {
    /// Stable identifier used by tests and tooling.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display glyph.
    pub glyph: char,
    /// Foreground color.
    pub color: Color,
    /// Depth-scaled spawn weight.
    pub weight: DepthTable,
    /// On-use effect, if any.
    #[serde(default)]
    pub effect: Option<ItemEffect>,
    /// Prompt shown when the effect enters targeting mode.
    #[serde(default)]
    pub targeting_message: Option<Message>,
    /// Equipment slot and bonuses, if wearable.
    #[serde(default)]
    pub equippable: Option<Equippable>,
}

/// The immutable, process-wide monster/item catalog.
///
/// Loaded once from data embedded at compile time and read-only thereafter.
#[derive(Debug, Deserialize)]
pub struct Catalog {
    /// Cap on monsters seeded per room, scaled by depth.
    pub max_monsters_per_room: DepthTable,
    /// Cap on items seeded per room, scaled by depth.
    pub max_items_per_room: DepthTable,
    /// All known monster definitions.
    pub monsters: Vec<MonsterDef>,
    /// All known item definitions.
    pub items: Vec<ItemDef>,
}

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../data/catalog.json"))
        .expect("embedded catalog is valid JSON")
});

impl Catalog {
    /// The process-wide catalog.
    pub fn global() -> &'static Catalog {
        &CATALOG
    }

    /// Look up a monster definition by identifier.
    pub fn monster(&self, id: &str) -> Option<&MonsterDef> {
        self.monsters.iter().find(|m| m.id == id)
    }

    /// Look up an item definition by identifier.
    pub fn item(&self, id: &str) -> Option<&ItemDef> {
        self.items.iter().find(|i| i.id == id)
    }
}

impl MonsterDef {
    /// Instantiate this monster at a position.
    pub fn spawn(&self, x: i32, y: i32) -> Entity {
        Entity::new(EntityKind::Actor, self.name.clone(), x, y, self.glyph)
            .with_fg(self.color)
            .with_blocks(true)
            .with_combat(Combat::new(self.hp, self.defense, self.power, self.xp))
            .with_ai(Ai::Basic)
    }
}

impl ItemDef {
    /// Instantiate this item at a position.
    pub fn spawn(&self, x: i32, y: i32) -> Entity {
        let item = match self.effect {
            Some(effect) => {
                let mut item = Item::new(effect);
                if let Some(message) = &self.targeting_message {
                    item = item.with_targeting_message(message.clone());
                }
                item
            }
            None => Item::passive(),
        };

        let mut entity = Entity::new(EntityKind::Item, self.name.clone(), x, y, self.glyph)
            .with_fg(self.color)
            .with_item(item);
        if let Some(equippable) = &self.equippable {
            entity = entity.with_equippable(equippable.clone());
        }
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_catalog_parses() {
        let catalog = Catalog::global();
        assert!(!catalog.monsters.is_empty());
        assert!(!catalog.items.is_empty());
    }

    #[test]
    fn orc_definition_matches_bestiary() {
        let orc = Catalog::global().monster("orc").unwrap();
        assert_eq!((orc.hp, orc.defense, orc.power, orc.xp), (20, 0, 4, 35));
        assert_eq!(orc.weight.value(1), 80);
    }

    #[test]
    fn trolls_only_spawn_from_depth_three() {
        let troll = Catalog::global().monster("troll").unwrap();
        assert_eq!(troll.weight.value(1), 0);
        assert_eq!(troll.weight.value(3), 15);
        assert_eq!(troll.weight.value(7), 60);
    }

    #[test]
    fn spawned_monster_fights_and_blocks() {
        let orc = Catalog::global().monster("orc").unwrap().spawn(3, 4);
        assert_eq!(orc.kind, EntityKind::Actor);
        assert!(orc.blocks);
        assert!(orc.combat.is_some());
        assert_eq!(orc.ai, Some(Ai::Basic));
        assert_eq!((orc.x, orc.y), (3, 4));
    }

    #[test]
    fn spawned_equipment_is_also_an_item() {
        let sword = Catalog::global().item("sword").unwrap().spawn(0, 0);
        assert!(sword.equippable.is_some());
        assert!(sword.item.is_some());
        assert!(sword.item.as_ref().unwrap().effect.is_none());
    }

    #[test]
    fn targeted_scrolls_carry_a_prompt() {
        let fireball = Catalog::global().item("fireball_scroll").unwrap();
        assert!(fireball.effect.unwrap().needs_target());
        assert!(fireball.targeting_message.is_some());
    }
}
