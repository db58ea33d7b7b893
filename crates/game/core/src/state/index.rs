//! Cell-to-entity lookup derived from the entity store.
//!
//! The index is a cache and never a source of truth. It is rebuilt wholesale
//! from the store, and it remembers the store generation it was built from so
//! callers can assert that no position changed since.

use std::collections::BTreeMap;

use super::{EntityId, EntityStore, Named, OnMap, Position};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpatialIndex {
    width: u32,
    cells: BTreeMap<usize, Vec<EntityId>>,
    generation: u64,
}

impl SpatialIndex {
    /// Indexes every entity that has both a map position and a name.
    pub fn rebuild(store: &EntityStore, width: u32) -> Self {
        let mut cells: BTreeMap<usize, Vec<EntityId>> = BTreeMap::new();
        let mut skipped = 0usize;

        for (id, (on_map, _)) in store.query::<(OnMap, Named)>() {
            match cell_key(on_map.position, width) {
                Some(key) => cells.entry(key).or_default().push(id),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "entities outside the map were left out of the index");
        }
        tracing::trace!(cells = cells.len(), "spatial index rebuilt");

        Self {
            width,
            cells,
            generation: store.generation(),
        }
    }

    /// Entities at a linearised cell key. Empty for unoccupied cells.
    pub fn lookup(&self, key: usize) -> &[EntityId] {
        self.cells.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn at(&self, position: Position) -> &[EntityId] {
        match cell_key(position, self.width) {
            Some(key) => self.lookup(key),
            None => &[],
        }
    }

    pub fn key(&self, position: Position) -> Option<usize> {
        cell_key(position, self.width)
    }

    /// True when the store changed map-relevant data since this rebuild.
    pub fn is_stale(&self, store: &EntityStore) -> bool {
        self.generation != store.generation()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

fn cell_key(position: Position, width: u32) -> Option<usize> {
    let x = u32::try_from(position.x).ok()?;
    let y = u32::try_from(position.y).ok()?;
    if x >= width {
        return None;
    }
    Some(x as usize + y as usize * width as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Carryable, Entity, EntityKind, Material};

    #[test]
    fn only_named_map_entities_are_indexed() {
        let mut store = EntityStore::new();
        let named = store.create(
            Entity::new()
                .with(OnMap::new(Position::new(2, 1)))
                .with(Named::new(EntityKind::Ladder)),
        );
        // The player carries no name and stays out of the index.
        store.create(Entity::new().with(OnMap::solid(Position::new(2, 1))));
        store.create(Entity::new().with(Carryable::new(Material::Rock)));

        let index = SpatialIndex::rebuild(&store, 10);
        assert_eq!(index.at(Position::new(2, 1)), &[named]);
        assert_eq!(index.lookup(2 + 10), &[named]);
        assert!(index.at(Position::new(0, 0)).is_empty());
        assert!(index.at(Position::new(-1, 0)).is_empty());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn detects_staleness_after_moves() {
        let mut store = EntityStore::new();
        let id = store.create(
            Entity::new()
                .with(OnMap::new(Position::new(0, 0)))
                .with(Named::new(EntityKind::Item(Material::Moss))),
        );
        let index = SpatialIndex::rebuild(&store, 4);
        assert!(!index.is_stale(&store));

        store.set_position(id, Position::new(1, 0));
        assert!(index.is_stale(&store));

        let index = SpatialIndex::rebuild(&store, 4);
        assert!(index.at(Position::new(0, 0)).is_empty());
        assert_eq!(index.at(Position::new(1, 0)), &[id]);
    }
}
