//! Live entity set and pending-admission set
//!
//! Entities created mid-tick are staged in [`Pending`] and only merged into
//! the [`EntityStore`] at the start of the next tick; dead entities are
//! pruned at the end of a tick. Nothing inserts into or removes from the live
//! set while it is being iterated.
//!
//! Ids increase monotonically and are never reused, so the live set stays
//! sorted by id and an [`EntityId`] doubles as a weak handle: once the entity
//! is pruned, lookups simply miss.

use serde::{Deserialize, Serialize};

use super::entity::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

#[derive(Debug)]
struct Slot {
    id: EntityId,
    /// `None` while the entity is taken out to advance
    entity: Option<Entity>,
}

/// Entities staged for admission at the next tick boundary
#[derive(Debug, Default)]
pub struct Pending {
    next_id: u64,
    entries: Vec<(EntityId, Entity)>,
}

impl Pending {
    /// Stage an entity, returning the id it will keep once admitted
    pub fn stage(&mut self, entity: Entity) -> EntityId {
        let id = self.reserve_id();
        self.entries.push((id, entity));
        id
    }

    /// Allocate an id without staging anything; it never resolves
    pub fn reserve_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liveness of a staged entity, `None` if `id` is not staged
    pub fn is_alive(&self, id: EntityId) -> Option<bool> {
        self.entries
            .iter()
            .find(|(staged, _)| *staged == id)
            .map(|(_, e)| e.is_alive())
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entries.iter().map(|(id, e)| (*id, e))
    }

    /// Drop everything staged; ids keep increasing
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The live entity set, ordered by id
#[derive(Debug, Default)]
pub struct EntityStore {
    slots: Vec<Slot>,
}

impl EntityStore {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Merge every staged entity into the live set
    pub fn admit(&mut self, pending: &mut Pending) -> usize {
        let admitted = pending.entries.len();
        self.slots.extend(pending.entries.drain(..).map(|(id, entity)| Slot {
            id,
            entity: Some(entity),
        }));
        admitted
    }

    /// Remove entities that report not alive
    pub fn prune_dead(&mut self) -> usize {
        let before = self.slots.len();
        self.slots
            .retain(|slot| slot.entity.as_ref().is_none_or(|e| e.is_alive()));
        before - self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Take the entity at `index` out of the set so it can mutate the rest
    pub fn take_at(&mut self, index: usize) -> Option<(EntityId, Entity)> {
        let slot = self.slots.get_mut(index)?;
        slot.entity.take().map(|e| (slot.id, e))
    }

    /// Put back an entity taken with [`EntityStore::take_at`]
    pub fn restore_at(&mut self, index: usize, entity: Entity) {
        debug_assert!(self.slots[index].entity.is_none(), "slot {index} is occupied");
        self.slots[index].entity = Some(entity);
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let index = self.position(id)?;
        self.slots[index].entity.as_ref()
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let index = self.position(id)?;
        self.slots[index].entity.as_mut()
    }

    /// Liveness of a live entity, `None` once it has been pruned
    ///
    /// A taken entity counts as alive: it is the one currently advancing.
    pub fn is_alive(&self, id: EntityId) -> Option<bool> {
        let index = self.position(id)?;
        Some(self.slots[index].entity.as_ref().is_none_or(|e| e.is_alive()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.slots
            .iter()
            .filter_map(|slot| slot.entity.as_ref().map(|e| (slot.id, e)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut Entity)> {
        self.slots
            .iter_mut()
            .filter_map(|slot| slot.entity.as_mut().map(|e| (slot.id, e)))
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.slots.binary_search_by_key(&id, |slot| slot.id).ok()
    }
}

/// Weak-handle query across both sets: staged entities count as existing
pub fn handle_alive(store: &EntityStore, pending: &Pending, id: EntityId) -> bool {
    store
        .is_alive(id)
        .or_else(|| pending.is_alive(id))
        .unwrap_or(false)
}
