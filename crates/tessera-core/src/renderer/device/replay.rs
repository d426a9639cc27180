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

//! In-order replay of a [`CommandList`] onto the backend.
//!
//! Ids are resolved against the registries at this point. A record whose id
//! no longer names a live resource is skipped with a warning; replay goes on
//! with the next record.

use super::bridge;
use super::resources::check_range;
use super::RenderDevice;
use crate::renderer::api::*;
use crate::renderer::traits::{BufferBindingTarget, Capability, FramebufferBlit, RenderBackend};
use std::fmt::Debug;

/// Bind state tracked during one submission.
#[derive(Debug, Default)]
struct ReplayState {
    /// Pipeline applied by the last `BindPipeline`, if it was live.
    pipeline: Option<PipelineId>,
    /// Vertex-array group of that pipeline currently bound.
    group: Option<u32>,
    /// Index buffer selected for following indexed draws.
    index_buffer: Option<BufferId>,
}

fn skip_stale(command: &Command, id: impl Debug) {
    log::warn!("Replay: skipping {} for stale id {:?}", command.name(), id);
}

impl<B: RenderBackend> RenderDevice<B> {
    /// Closes `list` and replays its commands in recorded order.
    ///
    /// Submitting a list that is not recording replays what it retained from
    /// its last recording.
    pub fn submit(&mut self, list: &mut CommandList) {
        if !list.is_recording() {
            log::debug!(
                "Submitting an idle command list again ({} commands)",
                list.len()
            );
        }
        list.finish();

        let mut state = ReplayState::default();
        for command in list.commands() {
            self.replay(&mut state, command);
        }
    }

    fn replay(&mut self, state: &mut ReplayState, command: &Command) {
        match command {
            Command::SetScissor(rect) => self.backend.set_scissor(*rect),
            Command::SetViewport(rect) => self.backend.set_viewport(*rect),
            Command::SetClearDepth(depth) => self.backend.set_clear_depth(*depth),
            Command::SetClearColor(color) => self.backend.set_clear_color(*color),
            Command::Clear(mask) => self.backend.clear(*mask),
            Command::BindPipeline(id) => self.replay_bind_pipeline(state, *id),
            Command::BindStorageBuffer { buffer, index } => {
                if !self.info.supports_storage_buffers {
                    log::warn!("Replay: storage buffers are not supported by this device");
                    return;
                }
                self.replay_bind_buffer_base(command, BufferBindingTarget::Storage, *buffer, *index);
            }
            Command::BindUniformBuffer { buffer, index } => {
                self.replay_bind_buffer_base(command, BufferBindingTarget::Uniform, *buffer, *index);
            }
            Command::BindIndexBuffer(id) => self.replay_bind_index_buffer(state, command, *id),
            Command::BindVertexBuffer(id) => self.replay_bind_vertex_buffer(state, command, *id),
            Command::BindSampler { sampler, index } => match self.samplers.get(*sampler) {
                Some(entry) => self.backend.bind_sampler(*index, entry.handle),
                None => skip_stale(command, sampler),
            },
            Command::BindTexture { texture, index } => match self.textures.get(*texture) {
                Some(entry) => self.backend.bind_texture(*index, entry.kind, entry.handle),
                None => skip_stale(command, texture),
            },
            Command::BindRenderTarget(None) => self.backend.bind_framebuffer(None),
            Command::BindRenderTarget(Some(id)) => match self.render_targets.get(*id) {
                Some(entry) => self.backend.bind_framebuffer(Some(entry.handle)),
                None => skip_stale(command, id),
            },
            Command::WriteBuffer {
                buffer,
                offset,
                data,
            } => {
                let Some(entry) = self.buffers.get(*buffer) else {
                    skip_stale(command, buffer);
                    return;
                };
                if let Err(err) = check_range(*offset, data.len(), entry.size) {
                    log::warn!("Replay: skipping WriteBuffer to {buffer:?}: {err}");
                    return;
                }
                self.backend.write_buffer(entry.handle, *offset, data);
            }
            Command::CopyRenderTarget(copy) => self.replay_copy_render_target(command, copy),
            Command::Draw(args) => {
                let Some(pipeline) = state.pipeline.and_then(|id| self.pipelines.get(id)) else {
                    log::warn!("Replay: skipping Draw with no pipeline bound");
                    return;
                };
                self.backend.draw_arrays(pipeline.state.primitive_mode, args);
            }
            Command::DrawIndexed(args) => {
                let Some(pipeline) = state.pipeline.and_then(|id| self.pipelines.get(id)) else {
                    log::warn!("Replay: skipping DrawIndexed with no pipeline bound");
                    return;
                };
                if state.index_buffer.is_none() {
                    log::warn!("Replay: skipping DrawIndexed with no index buffer bound");
                    return;
                }
                let index_type = pipeline.state.index_type;
                let byte_offset = args.base_index as usize * index_type.size();
                self.backend.draw_elements(
                    pipeline.state.primitive_mode,
                    index_type,
                    args,
                    byte_offset,
                );
            }
        }
    }

    /// Resets every raster feature, then enables what the pipeline asks for.
    fn replay_bind_pipeline(&mut self, state: &mut ReplayState, id: PipelineId) {
        state.group = None;
        for capability in Capability::ALL {
            self.backend.set_capability(capability, false);
        }

        let Some(pipeline) = self.pipelines.get(id) else {
            log::warn!("Replay: stale pipeline {id:?}, applying the null state");
            state.pipeline = None;
            self.backend.use_program(None);
            return;
        };
        let pipeline_state = pipeline.state;
        let program = pipeline.program;

        let blending = pipeline_state.blending;
        if blending.enabled {
            self.backend.set_capability(Capability::Blend, true);
            self.backend
                .set_blend(blending.equation, blending.src_factor, blending.dst_factor);
        }
        let depth = pipeline_state.depth_testing;
        if depth.enabled {
            self.backend.set_capability(Capability::DepthTest, true);
            self.backend.set_depth_func(depth.func);
        }
        let culling = pipeline_state.face_culling;
        if culling.enabled {
            self.backend.set_capability(Capability::CullFace, true);
            self.backend
                .set_cull(culling.cull_face(), culling.front_face());
        }
        if pipeline_state.scissor_test {
            self.backend.set_capability(Capability::ScissorTest, true);
        }
        self.backend.set_fill_mode(pipeline_state.fill_mode);
        self.backend.use_program(Some(program));
        state.pipeline = Some(id);
    }

    fn replay_bind_buffer_base(
        &mut self,
        command: &Command,
        target: BufferBindingTarget,
        id: BufferId,
        index: u32,
    ) {
        match self.buffers.get(id) {
            Some(entry) => self.backend.bind_buffer_base(target, index, entry.handle),
            None => skip_stale(command, id),
        }
    }

    fn replay_bind_index_buffer(&mut self, state: &mut ReplayState, command: &Command, id: BufferId) {
        let Some(buffer) = self.buffers.get(id) else {
            skip_stale(command, id);
            return;
        };
        state.index_buffer = Some(id);

        // Attach right away when a vertex array of the bound pipeline is current.
        let (Some(pipeline), Some(group)) = (state.pipeline, state.group) else {
            return;
        };
        let Some(group) = self
            .pipelines
            .get_mut(pipeline)
            .and_then(|entry| entry.groups.get_mut(&group))
        else {
            return;
        };
        if group.element_buffer != Some(id) {
            self.backend
                .set_element_buffer(group.vertex_array, Some(buffer.handle));
            group.element_buffer = Some(id);
        }
    }

    /// Makes the buffer's vertex-array group current and routes the bound
    /// pipeline's attributes to the buffer's binding point.
    fn replay_bind_vertex_buffer(&mut self, state: &mut ReplayState, command: &Command, id: BufferId) {
        let Some(buffer) = self.buffers.get(id) else {
            skip_stale(command, id);
            return;
        };
        let Some(slot) = buffer.slot else {
            log::warn!("Replay: skipping BindVertexBuffer, {id:?} holds no vertex binding slot");
            return;
        };
        let Some(pipeline) = state.pipeline.and_then(|p| self.pipelines.get_mut(p)) else {
            log::warn!("Replay: skipping BindVertexBuffer with no pipeline bound");
            return;
        };
        let index_handle = state
            .index_buffer
            .and_then(|index| self.buffers.get(index))
            .map(|entry| entry.handle);

        let group_index = slot.group(self.max_bindings);
        let binding = slot.binding(self.max_bindings);
        let group = bridge::vertex_array_group(
            &mut self.backend,
            &mut pipeline.groups,
            &pipeline.attribs,
            group_index,
        );

        if state.group != Some(group_index) {
            self.backend.bind_vertex_array(group.vertex_array);
            state.group = Some(group_index);
        }
        if group.wired_buffer != Some(id) {
            for attrib in &pipeline.attribs {
                self.backend
                    .set_attrib_binding(group.vertex_array, attrib.id, binding);
            }
            group.wired_buffer = Some(id);
        }
        if group.element_buffer != state.index_buffer {
            self.backend.set_element_buffer(group.vertex_array, index_handle);
            group.element_buffer = state.index_buffer;
        }
    }

    /// Blits between render targets and restores the previous binding.
    fn replay_copy_render_target(&mut self, command: &Command, copy: &RenderTargetCopy) {
        let resolve = |target: Option<RenderTargetId>| match target {
            None => Ok(None),
            Some(id) => self
                .render_targets
                .get(id)
                .map(|entry| Some(entry.handle))
                .ok_or(id),
        };
        let (source, destination) = match (resolve(copy.source), resolve(copy.destination)) {
            (Ok(source), Ok(destination)) => (source, destination),
            (Err(id), _) | (_, Err(id)) => {
                skip_stale(command, id);
                return;
            }
        };

        let previous = self.backend.current_framebuffer();
        self.backend.blit_framebuffer(&FramebufferBlit {
            source,
            destination,
            source_region: copy.source_region,
            destination_region: copy.destination_region,
            mask: copy.mask,
            filter: copy.filter,
        });
        self.backend.bind_framebuffer(previous);
    }
}
