//! Sparse entity/component store.
//!
//! Entities are fixed-layout [`Entity`] records keyed by a monotonically
//! allocated [`EntityId`]. Lookups of missing ids or absent components yield
//! `None`; nothing here panics on a stale id.
//!
//! The store keeps a generation counter that advances on every mutation that
//! can move an entity on or off the map. The spatial index records the
//! generation it was built from, which makes a stale index detectable.

use std::collections::BTreeMap;

use super::{Component, ComponentSet, Entity, EntityId, OnMap, Position};

#[derive(Clone, Debug, Default)]
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u32,
    generation: u64,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            entities: BTreeMap::new(),
            next_id: 1,
            generation: 0,
        }
    }

    /// Inserts a new entity and returns its freshly allocated id.
    pub fn create(&mut self, entity: Entity) -> EntityId {
        let id = EntityId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        if entity.has(ComponentSet::INDEXED) {
            self.touch();
        }
        self.entities.insert(id, entity);
        id
    }

    /// Removes an entity. Unknown ids are ignored.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id)?;
        if removed.on_map.is_some() {
            self.touch();
        }
        Some(removed)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get<C: Component>(&self, id: EntityId) -> Option<&C> {
        self.entities.get(&id)?.get::<C>()
    }

    /// Mutable component access. Borrowing a map-relevant component counts as
    /// a mutation for index staleness purposes.
    pub fn get_mut<C: Component>(&mut self, id: EntityId) -> Option<&mut C> {
        let entity = self.entities.get_mut(&id)?;
        let slot = C::slot_mut(entity).as_mut()?;
        if C::SET.intersects(ComponentSet::INDEXED) {
            self.generation += 1;
        }
        Some(slot)
    }

    /// Attaches or replaces a component. Returns false for an unknown id.
    pub fn add_component<C: Component>(&mut self, id: EntityId, component: C) -> bool {
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        *C::slot_mut(entity) = Some(component);
        if C::SET.intersects(ComponentSet::INDEXED) {
            self.touch();
        }
        true
    }

    pub fn remove_component<C: Component>(&mut self, id: EntityId) -> Option<C> {
        let removed = C::slot_mut(self.entities.get_mut(&id)?).take()?;
        if C::SET.intersects(ComponentSet::INDEXED) {
            self.touch();
        }
        Some(removed)
    }

    pub fn has(&self, id: EntityId, required: ComponentSet) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|entity| entity.has(required))
    }

    pub fn position(&self, id: EntityId) -> Option<Position> {
        self.get::<OnMap>(id).map(|on_map| on_map.position)
    }

    /// Moves an on-map entity. Returns false when it has no [`OnMap`].
    pub fn set_position(&mut self, id: EntityId, position: Position) -> bool {
        match self.get_mut::<OnMap>(id) {
            Some(on_map) => {
                on_map.position = position;
                true
            }
            None => false,
        }
    }

    /// Every entity holding all components of `Q`, in id order, with the
    /// components returned in request order.
    pub fn query<Q: Query>(&self) -> impl Iterator<Item = (EntityId, Q::Item<'_>)> + '_ {
        self.entities
            .iter()
            .filter_map(|(&id, entity)| Q::fetch(entity).map(|item| (id, item)))
    }

    /// Like [`query`](Self::query) restricted to `ids`, preserving their order.
    /// Unknown ids are skipped.
    pub fn query_in<'a, Q: Query>(
        &'a self,
        ids: &'a [EntityId],
    ) -> impl Iterator<Item = (EntityId, Q::Item<'a>)> + 'a {
        ids.iter().filter_map(|&id| {
            let entity = self.entities.get(&id)?;
            Q::fetch(entity).map(|item| (id, item))
        })
    }

    pub fn ids_with(&self, required: ComponentSet) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| entity.has(required))
            .map(|(&id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities.iter().map(|(&id, entity)| (id, entity))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn touch(&mut self) {
        self.generation += 1;
    }
}

/// A statically typed component query: a tuple of [`Component`] types.
pub trait Query {
    type Item<'a>;

    fn required() -> ComponentSet;

    fn fetch(entity: &Entity) -> Option<Self::Item<'_>>;
}

macro_rules! impl_query {
    ($($c:ident),+) => {
        impl<$($c: Component),+> Query for ($($c,)+) {
            type Item<'a> = ($(&'a $c,)+);

            fn required() -> ComponentSet {
                ComponentSet::empty()$(.union($c::SET))+
            }

            fn fetch(entity: &Entity) -> Option<Self::Item<'_>> {
                Some(($(entity.get::<$c>()?,)+))
            }
        }
    };
}

impl_query!(A);
impl_query!(A, B);
impl_query!(A, B, C);
impl_query!(A, B, C, D);
