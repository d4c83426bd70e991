use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityId};

/// An ordered collection of carried item entities.
///
/// The inventory is the sole owner of its items; equipment slots refer back
/// into it by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    /// Maximum number of items that can be carried.
    pub capacity: usize,
    /// Carried items, oldest first.
    pub items: Vec<Entity>,
    /// Back-reference to the owning entity (lookup only).
    #[serde(skip)]
    pub owner: EntityId,
}

impl Inventory {
    /// Create an empty inventory with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::new(),
            owner: EntityId::default(),
        }
    }

    /// Whether no more items fit.
    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    /// Number of carried items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is carried.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item, or hand it back unchanged when at capacity.
    pub fn try_add(&mut self, item: Entity) -> Result<(), Entity> {
        if self.is_full() {
            Err(item)
        } else {
            self.items.push(item);
            Ok(())
        }
    }

    /// Remove and return the item at `index`.
    ///
    /// Callers must check bounds first; the turn engine treats an
    /// out-of-range index as user-input misuse before getting here.
    pub fn remove(&mut self, index: usize) -> Entity {
        self.items.remove(index)
    }

    /// Find a carried item by id.
    pub fn find(&self, id: EntityId) -> Option<&Entity> {
        self.items.iter().find(|item| item.id == id)
    }
}
