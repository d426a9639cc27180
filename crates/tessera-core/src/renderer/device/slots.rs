// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Allocation of vertex-buffer binding slots.
//!
//! Every live vertex buffer owns one slot, shared by all pipelines. A slot
//! maps onto a hardware binding point of a vertex array: slots beyond the
//! per-array limit spill into further vertex arrays ("groups") that each
//! pipeline creates on demand.

use std::collections::BTreeSet;

/// A vertex-buffer binding slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexSlot(pub u32);

impl VertexSlot {
    /// Index of the vertex-array group holding this slot.
    pub fn group(self, max_bindings: u32) -> u32 {
        self.0 / max_bindings
    }

    /// Binding point of this slot inside its group.
    pub fn binding(self, max_bindings: u32) -> u32 {
        self.0 % max_bindings
    }
}

/// Arena of slot records plus an ordered set of free indices.
///
/// The arena never shrinks; `acquire` always returns the lowest free slot
/// and only grows the arena when none is free.
#[derive(Debug, Default)]
pub struct VertexSlotAllocator {
    occupied: Vec<bool>,
    free: BTreeSet<u32>,
}

impl VertexSlotAllocator {
    /// An allocator with no slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the lowest free slot.
    pub fn acquire(&mut self) -> VertexSlot {
        if let Some(index) = self.free.pop_first() {
            self.occupied[index as usize] = true;
            return VertexSlot(index);
        }
        let index = self.occupied.len() as u32;
        self.occupied.push(true);
        VertexSlot(index)
    }

    /// Returns `slot` to the free set. Returns `false`, changing nothing, when
    /// the slot is unknown or already free.
    pub fn release(&mut self, slot: VertexSlot) -> bool {
        match self.occupied.get_mut(slot.0 as usize) {
            Some(occupied) if *occupied => {
                *occupied = false;
                self.free.insert(slot.0);
                true
            }
            _ => false,
        }
    }

    /// Whether `slot` is currently held.
    pub fn is_occupied(&self, slot: VertexSlot) -> bool {
        self.occupied.get(slot.0 as usize).copied().unwrap_or(false)
    }

    /// Number of slots ever created, i.e. the historical maximum of
    /// concurrently held slots.
    pub fn high_water(&self) -> usize {
        self.occupied.len()
    }

    /// Number of slots currently held.
    pub fn occupied_count(&self) -> usize {
        self.occupied.len() - self.free.len()
    }

    /// Held slots in ascending order.
    pub fn occupied_slots(&self) -> impl Iterator<Item = VertexSlot> + '_ {
        self.occupied
            .iter()
            .enumerate()
            .filter(|(_, held)| **held)
            .map(|(index, _)| VertexSlot(index as u32))
    }
}
