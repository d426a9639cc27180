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

//! Keeps vertex buffers wired into every pipeline.
//!
//! The vertex format lives on pipelines while binding slots live on buffers,
//! so each side is notified when the other is created. Both notifications
//! run before the new resource is inserted into its registry.

use super::entries::{BufferEntry, PipelineEntry, VertexArrayGroup};
use super::registry::Registry;
use crate::renderer::api::{BufferId, PipelineId, VertexAttrib};
use crate::renderer::traits::RenderBackend;
use std::collections::BTreeMap;

/// The vertex array of `group`, created with the pipeline's attribute
/// formats on first use.
pub(crate) fn vertex_array_group<'g, B: RenderBackend>(
    backend: &mut B,
    groups: &'g mut BTreeMap<u32, VertexArrayGroup<B::Handle>>,
    attribs: &[VertexAttrib],
    group: u32,
) -> &'g mut VertexArrayGroup<B::Handle> {
    groups.entry(group).or_insert_with(|| {
        log::trace!("Creating vertex array group {group}");
        VertexArrayGroup::new(backend.create_vertex_array(attribs))
    })
}

/// Attaches a freshly created vertex buffer to every live pipeline.
pub(crate) fn on_buffer_created<B: RenderBackend>(
    backend: &mut B,
    pipelines: &mut Registry<PipelineId, PipelineEntry<B::Handle>>,
    buffer: &BufferEntry<B::Handle>,
    max_bindings: u32,
) {
    let Some(slot) = buffer.slot else {
        return;
    };
    for pipeline in pipelines.values_mut() {
        let stride = pipeline.state.vertex_stride;
        let group = vertex_array_group(
            backend,
            &mut pipeline.groups,
            &pipeline.attribs,
            slot.group(max_bindings),
        );
        backend.attach_vertex_buffer(
            group.vertex_array,
            slot.binding(max_bindings),
            buffer.handle,
            stride,
        );
    }
}

/// Attaches every live vertex buffer to a freshly created pipeline.
pub(crate) fn on_pipeline_created<B: RenderBackend>(
    backend: &mut B,
    pipeline: &mut PipelineEntry<B::Handle>,
    buffers: &Registry<BufferId, BufferEntry<B::Handle>>,
    max_bindings: u32,
) {
    let stride = pipeline.state.vertex_stride;
    for buffer in buffers.values() {
        let Some(slot) = buffer.slot else {
            continue;
        };
        let group = vertex_array_group(
            backend,
            &mut pipeline.groups,
            &pipeline.attribs,
            slot.group(max_bindings),
        );
        backend.attach_vertex_buffer(
            group.vertex_array,
            slot.binding(max_bindings),
            buffer.handle,
            stride,
        );
    }
}

/// Drops every cached reference to a destroyed buffer.
pub(crate) fn on_buffer_destroyed<H>(
    pipelines: &mut Registry<PipelineId, PipelineEntry<H>>,
    buffer: BufferId,
) {
    for pipeline in pipelines.values_mut() {
        for group in pipeline.groups.values_mut() {
            if group.wired_buffer == Some(buffer) {
                group.wired_buffer = None;
            }
            if group.element_buffer == Some(buffer) {
                group.element_buffer = None;
            }
        }
    }
}
