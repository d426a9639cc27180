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

//! Defines data structures related to GPU buffer resources.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// How a buffer will be used.
///
/// Only [`BufferKind::Vertex`] buffers take part in vertex-binding-slot
/// allocation; the other kinds are plain memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BufferKind {
    /// Uniform or storage data.
    #[default]
    Data,
    /// Element indices.
    Index,
    /// Vertex attributes.
    Vertex,
}

/// A descriptor used to create a [`BufferId`].
#[derive(Debug, Clone, Default)]
pub struct BufferDescriptor<'a> {
    /// An optional debug label for the buffer.
    pub label: Option<Cow<'a, str>>,
    /// What the buffer holds.
    pub kind: BufferKind,
    /// The total size of the buffer in bytes.
    pub size: usize,
    /// Initial contents, at most `size` bytes. The rest is left undefined.
    pub data: Option<Cow<'a, [u8]>>,
}

impl<'a> BufferDescriptor<'a> {
    /// An uninitialised buffer of `size` bytes.
    pub fn new(kind: BufferKind, size: usize) -> Self {
        Self {
            label: None,
            kind,
            size,
            data: None,
        }
    }

    /// A buffer sized for and filled with `contents`.
    pub fn with_contents<T: bytemuck::Pod>(kind: BufferKind, contents: &'a [T]) -> Self {
        let bytes: &'a [u8] = bytemuck::cast_slice(contents);
        Self {
            label: None,
            kind,
            size: bytes.len(),
            data: Some(Cow::Borrowed(bytes)),
        }
    }

    /// Sets the debug label.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// An opaque handle to a GPU buffer resource.
///
/// This ID is returned by [`RenderDevice::create_buffer`](crate::renderer::RenderDevice::create_buffer)
/// and is used to reference the buffer in all subsequent operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BufferId(pub usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_contents_sizes_from_slice() {
        let vertices: [[f32; 2]; 3] = [[0.0, 0.5], [-0.5, -0.5], [0.5, -0.5]];
        let desc = BufferDescriptor::with_contents(BufferKind::Vertex, &vertices);
        assert_eq!(desc.size, 24);
        assert_eq!(desc.data.as_ref().map(|d| d.len()), Some(24));
        assert_eq!(desc.kind, BufferKind::Vertex);
    }

    #[test]
    fn test_new_has_no_data() {
        let desc = BufferDescriptor::new(BufferKind::Index, 64).with_label("indices");
        assert!(desc.data.is_none());
        assert_eq!(desc.label.as_deref(), Some("indices"));
    }
}
