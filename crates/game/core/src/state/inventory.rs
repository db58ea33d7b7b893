//! Stack-based inventory.
//!
//! An inventory is an ordered sequence of stacks. Each stack is a non-empty
//! run of entity ids sharing one [`Material`].
//!
//! # Invariants
//!
//! - every stack holds at most `stack_limit` ids
//! - there are at most `inventory_limit` stacks
//! - stacks are homogeneous and never empty
//!
//! The inventory records the material alongside each stack, so it can be
//! mutated without reaching back into the entity store. Moving entities on and
//! off the map is the store's job (see [`crate::state::EntityStore`]).

use crate::error::{ErrorSeverity, GameError};

use super::{EntityId, Material};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    #[error("no room for {material} (limit {limit} stacks)")]
    CapacityExceeded { material: Material, limit: usize },

    #[error("{0} is already in this inventory")]
    AlreadyContained(EntityId),
}

impl GameError for InventoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            InventoryError::CapacityExceeded { .. } => ErrorSeverity::Recoverable,
            InventoryError::AlreadyContained(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            InventoryError::CapacityExceeded { .. } => "INVENTORY_CAPACITY_EXCEEDED",
            InventoryError::AlreadyContained(_) => "INVENTORY_ALREADY_CONTAINED",
        }
    }
}

/// A homogeneous group of carried entities.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    material: Material,
    items: Vec<EntityId>,
}

impl Stack {
    fn new(material: Material, first: EntityId) -> Self {
        Self {
            material,
            items: vec![first],
        }
    }

    pub fn material(&self) -> Material {
        self.material
    }

    pub fn items(&self) -> &[EntityId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<EntityId> {
        self.items.first().copied()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains(&id)
    }

    pub fn into_items(self) -> Vec<EntityId> {
        self.items
    }

    /// Display label: `"name"` or `"name (n)"`.
    pub fn label(&self) -> String {
        if self.items.len() == 1 {
            self.material.to_string()
        } else {
            format!("{} ({})", self.material, self.items.len())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inventory {
    stacks: Vec<Stack>,
    stack_limit: usize,
    inventory_limit: usize,
}

impl Inventory {
    pub fn new(stack_limit: usize, inventory_limit: usize) -> Self {
        Self {
            stacks: Vec::new(),
            stack_limit,
            inventory_limit,
        }
    }

    pub fn stack_limit(&self) -> usize {
        self.stack_limit
    }

    pub fn inventory_limit(&self) -> usize {
        self.inventory_limit
    }

    pub fn stacks(&self) -> &[Stack] {
        &self.stacks
    }

    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// All carried ids, stack by stack.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.stacks.iter().flat_map(|stack| stack.items.iter().copied())
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.stacks.iter().any(|stack| stack.contains(id))
    }

    /// First entity of the stack at `index`, used for selection by slot.
    pub fn stack_at(&self, index: usize) -> Option<EntityId> {
        self.stacks.get(index).and_then(Stack::first)
    }

    /// Adds `id` to a same-material stack with room, or opens a new stack.
    ///
    /// On failure the inventory is unchanged.
    pub fn give(&mut self, id: EntityId, material: Material) -> Result<(), InventoryError> {
        if self.contains(id) {
            return Err(InventoryError::AlreadyContained(id));
        }

        let stack_limit = self.stack_limit;
        if let Some(stack) = self
            .stacks
            .iter_mut()
            .find(|stack| stack.material == material && stack.items.len() < stack_limit)
        {
            stack.items.push(id);
            return Ok(());
        }

        if self.stacks.len() < self.inventory_limit && stack_limit > 0 {
            self.stacks.push(Stack::new(material, id));
            Ok(())
        } else {
            Err(InventoryError::CapacityExceeded {
                material,
                limit: self.inventory_limit,
            })
        }
    }

    /// Removes the whole stack containing `id`.
    pub fn drop_stack(&mut self, id: EntityId) -> Option<Stack> {
        let index = self.stacks.iter().position(|stack| stack.contains(id))?;
        Some(self.stacks.remove(index))
    }

    /// Removes a single id wherever it is, pruning an emptied stack.
    pub fn take(&mut self, id: EntityId) -> bool {
        let Some(stack) = self.stacks.iter_mut().find(|stack| stack.contains(id)) else {
            return false;
        };
        stack.items.retain(|&item| item != id);
        self.prune();
        true
    }

    /// Pops one id from the first stack of `material`.
    pub fn remove_of_type(&mut self, material: Material) -> Option<EntityId> {
        let stack = self
            .stacks
            .iter_mut()
            .find(|stack| stack.material == material)?;
        let id = stack.items.pop();
        self.prune();
        id
    }

    /// Pops up to `count` ids of `material`, in stack order then within-stack
    /// order. Returns fewer than `count` when stock runs short.
    pub fn remove_count(&mut self, material: Material, count: usize) -> Vec<EntityId> {
        let mut taken = Vec::with_capacity(count);
        for stack in self
            .stacks
            .iter_mut()
            .filter(|stack| stack.material == material)
        {
            let wanted = count - taken.len();
            if wanted == 0 {
                break;
            }
            let n = wanted.min(stack.items.len());
            taken.extend(stack.items.drain(..n));
        }
        self.prune();
        taken
    }

    pub fn count_of(&self, material: Material) -> usize {
        self.stacks
            .iter()
            .filter(|stack| stack.material == material)
            .map(Stack::len)
            .sum()
    }

    pub fn has_any(&self, material: Material) -> bool {
        self.stacks.iter().any(|stack| stack.material == material)
    }

    pub fn labels(&self) -> Vec<String> {
        self.stacks.iter().map(Stack::label).collect()
    }

    fn prune(&mut self) {
        self.stacks.retain(|stack| !stack.is_empty());
    }
}
