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

//! Registry entries: what the device remembers about each live resource.

use super::slots::VertexSlot;
use crate::renderer::api::{
    BufferId, BufferKind, PipelineState, PixelFormat, ShaderStage, TextureKind, VertexAttrib,
};
use std::collections::BTreeMap;

#[derive(Debug)]
pub(crate) struct ShaderEntry<H> {
    pub(crate) handle: H,
    pub(crate) stage: ShaderStage,
}

/// One vertex array of a pipeline, covering one block of binding slots.
#[derive(Debug)]
pub(crate) struct VertexArrayGroup<H> {
    pub(crate) vertex_array: H,
    /// Buffer the attributes are currently routed to.
    pub(crate) wired_buffer: Option<BufferId>,
    /// Element buffer currently attached.
    pub(crate) element_buffer: Option<BufferId>,
}

impl<H> VertexArrayGroup<H> {
    pub(crate) fn new(vertex_array: H) -> Self {
        Self {
            vertex_array,
            wired_buffer: None,
            element_buffer: None,
        }
    }
}

#[derive(Debug)]
pub(crate) struct PipelineEntry<H> {
    pub(crate) program: H,
    pub(crate) state: PipelineState,
    pub(crate) attribs: Vec<VertexAttrib>,
    /// Keyed by group index (`slot / max_bindings`).
    pub(crate) groups: BTreeMap<u32, VertexArrayGroup<H>>,
}

#[derive(Debug)]
pub(crate) struct BufferEntry<H> {
    pub(crate) handle: H,
    pub(crate) kind: BufferKind,
    pub(crate) size: usize,
    /// Only non-empty vertex buffers hold a slot.
    pub(crate) slot: Option<VertexSlot>,
}

#[derive(Debug)]
pub(crate) struct SamplerEntry<H> {
    pub(crate) handle: H,
}

#[derive(Debug)]
pub(crate) struct TextureEntry<H> {
    pub(crate) handle: H,
    pub(crate) kind: TextureKind,
    pub(crate) format: PixelFormat,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) depth: u32,
}

#[derive(Debug)]
pub(crate) struct RenderTargetEntry<H> {
    pub(crate) handle: H,
}
