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

//! Id-keyed storage for live resources.

use crate::renderer::api::{BufferId, PipelineId, RenderTargetId, SamplerId, ShaderId, TextureId};
use std::collections::BTreeMap;

/// A typed id allocated by a [`Registry`].
pub(crate) trait ResourceId: Copy + Ord {
    fn from_index(index: usize) -> Self;
}

macro_rules! impl_resource_id {
    ($($id:ty),* $(,)?) => {
        $(
            impl ResourceId for $id {
                fn from_index(index: usize) -> Self {
                    Self(index)
                }
            }
        )*
    };
}

impl_resource_id!(ShaderId, PipelineId, BufferId, SamplerId, TextureId, RenderTargetId);

/// Live entries of one resource kind.
///
/// Ids come from a monotonic counter and are never handed out twice, so an id
/// kept after its resource was destroyed can never alias a newer resource.
/// Iteration follows id order, i.e. creation order.
#[derive(Debug)]
pub(crate) struct Registry<I, E> {
    entries: BTreeMap<I, E>,
    next_id: usize,
}

impl<I: ResourceId, E> Registry<I, E> {
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_id: 0,
        }
    }

    fn generate_id(&mut self) -> I {
        let id = I::from_index(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, entry: E) -> I {
        let id = self.generate_id();
        self.entries.insert(id, entry);
        id
    }

    pub(crate) fn remove(&mut self, id: I) -> Option<E> {
        self.entries.remove(&id)
    }

    pub(crate) fn get(&self, id: I) -> Option<&E> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: I) -> Option<&mut E> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn contains(&self, id: I) -> bool {
        self.entries.contains_key(&id)
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &E> {
        self.entries.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.entries.values_mut()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Removes every entry, keeping the id counter.
    pub(crate) fn drain(&mut self) -> impl Iterator<Item = E> {
        std::mem::take(&mut self.entries).into_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_never_reused() {
        let mut registry: Registry<BufferId, &str> = Registry::new();
        let a = registry.insert("a");
        let b = registry.insert("b");
        assert_eq!(registry.remove(a), Some("a"));
        let c = registry.insert("c");

        assert_eq!((a, b, c), (BufferId(0), BufferId(1), BufferId(2)));
        assert!(!registry.contains(a));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_double_remove_is_harmless() {
        let mut registry: Registry<TextureId, u32> = Registry::new();
        let id = registry.insert(5);
        assert_eq!(registry.remove(id), Some(5));
        assert_eq!(registry.remove(id), None);
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_iteration_follows_creation_order() {
        let mut registry: Registry<PipelineId, char> = Registry::new();
        for c in ['x', 'y', 'z'] {
            registry.insert(c);
        }
        let order: Vec<char> = registry.values().copied().collect();
        assert_eq!(order, ['x', 'y', 'z']);
        let drained: Vec<char> = registry.drain().collect();
        assert_eq!(drained.len(), 3);
        assert_eq!(registry.insert('w'), PipelineId(3));
    }
}
