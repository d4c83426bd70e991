use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Where an equippable item is worn or wielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Weapon hand.
    MainHand,
    /// Shield hand.
    OffHand,
}

/// Stat bonuses granted while the owning entity is equipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equippable {
    /// The slot this item occupies.
    pub slot: Slot,
    /// Attack power granted.
    pub power_bonus: i32,
    /// Defense granted.
    pub defense_bonus: i32,
    /// Maximum hit points granted.
    pub max_hp_bonus: i32,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Equippable {
    /// Create an equippable block for the given slot.
    pub fn new(slot: Slot, power_bonus: i32, defense_bonus: i32, max_hp_bonus: i32) -> Self {
        Self {
            slot,
            power_bonus,
            defense_bonus,
            max_hp_bonus,
            owner: EntityId::default(),
        }
    }
}

/// A change produced by toggling equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipChange {
    /// The item now occupies its slot.
    Equipped(EntityId),
    /// The item was removed from its slot.
    Dequipped(EntityId),
}

/// Worn/wielded equipment, one optional item id per slot.
///
/// Slots hold ids into the owner's inventory, never the items themselves;
/// the inventory stays the sole owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Equipment {
    /// Item equipped in the weapon hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_hand: Option<EntityId>,
    /// Item equipped in the shield hand.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub off_hand: Option<EntityId>,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Equipment {
    /// Whether the given item currently occupies a slot.
    pub fn is_equipped(&self, id: EntityId) -> bool {
        self.main_hand == Some(id) || self.off_hand == Some(id)
    }

    /// Equip or unequip an item in its slot.
    ///
    /// Equipping into an occupied slot first dequips the previous occupant
    /// and reports it.
    pub fn toggle(&mut self, item: EntityId, slot: Slot) -> Vec<EquipChange> {
        let occupant = match slot {
            Slot::MainHand => &mut self.main_hand,
            Slot::OffHand => &mut self.off_hand,
        };

        let mut changes = Vec::new();
        if *occupant == Some(item) {
            *occupant = None;
            changes.push(EquipChange::Dequipped(item));
        } else {
            if let Some(previous) = occupant.take() {
                changes.push(EquipChange::Dequipped(previous));
            }
            *occupant = Some(item);
            changes.push(EquipChange::Equipped(item));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_equips_then_unequips() {
        let mut equipment = Equipment::default();
        let sword = EntityId::new();

        assert_eq!(
            equipment.toggle(sword, Slot::MainHand),
            vec![EquipChange::Equipped(sword)]
        );
        assert!(equipment.is_equipped(sword));

        assert_eq!(
            equipment.toggle(sword, Slot::MainHand),
            vec![EquipChange::Dequipped(sword)]
        );
        assert!(!equipment.is_equipped(sword));
    }

    #[test]
    fn equipping_over_occupant_dequips_it_first() {
        let mut equipment = Equipment::default();
        let dagger = EntityId::new();
        let sword = EntityId::new();
        equipment.toggle(dagger, Slot::MainHand);

        let changes = equipment.toggle(sword, Slot::MainHand);

        assert_eq!(
            changes,
            vec![EquipChange::Dequipped(dagger), EquipChange::Equipped(sword)]
        );
        assert_eq!(equipment.main_hand, Some(sword));
    }

    #[test]
    fn slots_are_independent() {
        let mut equipment = Equipment::default();
        let sword = EntityId::new();
        let shield = EntityId::new();
        equipment.toggle(sword, Slot::MainHand);
        equipment.toggle(shield, Slot::OffHand);
        assert!(equipment.is_equipped(sword));
        assert!(equipment.is_equipped(shield));
    }
}
