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

//! Deferred command recording.
//!
//! A [`CommandList`] buffers [`Command`] records without touching backend
//! state. [`RenderDevice::start_recording`](crate::renderer::RenderDevice::start_recording)
//! opens it, the record methods append, and
//! [`RenderDevice::submit`](crate::renderer::RenderDevice::submit) replays the
//! records strictly in order and closes it again.

use super::buffer::BufferId;
use super::common::{BlitRegion, Rect};
use super::pipeline::PipelineId;
use super::render_target::RenderTargetId;
use super::texture::{SamplerId, TextureId};
use super::util::RenderTargetMask;

/// Arguments of a non-indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawArgs {
    /// Vertices per instance.
    pub vertices: u32,
    /// Instance count.
    pub instances: u32,
    /// First vertex.
    pub base_vertex: u32,
    /// First instance.
    pub base_instance: u32,
}

/// Arguments of an indexed draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DrawIndexedArgs {
    /// Indices per instance.
    pub indices: u32,
    /// Instance count.
    pub instances: u32,
    /// First index, in elements of the pipeline's index type.
    pub base_index: u32,
    /// Value added to every index.
    pub base_vertex: i32,
    /// First instance.
    pub base_instance: u32,
}

/// Parameters of a render target blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTargetCopy {
    /// Source target; `None` reads the default framebuffer.
    pub source: Option<RenderTargetId>,
    /// Destination target; `None` writes the default framebuffer.
    pub destination: Option<RenderTargetId>,
    /// Source corners.
    pub source_region: BlitRegion,
    /// Destination corners.
    pub destination_region: BlitRegion,
    /// Buffers to copy.
    pub mask: RenderTargetMask,
    /// Linear filtering when the regions differ in size.
    pub filter: bool,
}

/// One recorded operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Sets the scissor rectangle.
    SetScissor(Rect),
    /// Sets the viewport rectangle.
    SetViewport(Rect),
    /// Sets the depth clear value.
    SetClearDepth(f32),
    /// Sets the color clear value.
    SetClearColor([f32; 4]),
    /// Clears the selected buffers of the bound render target.
    Clear(RenderTargetMask),
    /// Applies a pipeline's fixed-function state and program.
    BindPipeline(PipelineId),
    /// Binds a buffer to an indexed storage-buffer slot.
    BindStorageBuffer {
        /// The buffer.
        buffer: BufferId,
        /// Binding index.
        index: u32,
    },
    /// Binds a buffer to an indexed uniform-buffer slot.
    BindUniformBuffer {
        /// The buffer.
        buffer: BufferId,
        /// Binding index.
        index: u32,
    },
    /// Selects the index buffer of following indexed draws.
    BindIndexBuffer(BufferId),
    /// Feeds a vertex buffer to the bound pipeline's attributes.
    BindVertexBuffer(BufferId),
    /// Binds a sampler to a texture unit.
    BindSampler {
        /// The sampler.
        sampler: SamplerId,
        /// Texture unit.
        index: u32,
    },
    /// Binds a texture to a texture unit.
    BindTexture {
        /// The texture.
        texture: TextureId,
        /// Texture unit.
        index: u32,
    },
    /// Selects the render target; `None` is the default framebuffer.
    BindRenderTarget(Option<RenderTargetId>),
    /// Uploads bytes into a buffer at replay time.
    WriteBuffer {
        /// The buffer.
        buffer: BufferId,
        /// Byte offset.
        offset: usize,
        /// Bytes copied at record time.
        data: Vec<u8>,
    },
    /// Blits between render targets.
    CopyRenderTarget(RenderTargetCopy),
    /// Non-indexed draw.
    Draw(DrawArgs),
    /// Indexed draw.
    DrawIndexed(DrawIndexedArgs),
}

impl Command {
    /// A short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetScissor(_) => "SetScissor",
            Command::SetViewport(_) => "SetViewport",
            Command::SetClearDepth(_) => "SetClearDepth",
            Command::SetClearColor(_) => "SetClearColor",
            Command::Clear(_) => "Clear",
            Command::BindPipeline(_) => "BindPipeline",
            Command::BindStorageBuffer { .. } => "BindStorageBuffer",
            Command::BindUniformBuffer { .. } => "BindUniformBuffer",
            Command::BindIndexBuffer(_) => "BindIndexBuffer",
            Command::BindVertexBuffer(_) => "BindVertexBuffer",
            Command::BindSampler { .. } => "BindSampler",
            Command::BindTexture { .. } => "BindTexture",
            Command::BindRenderTarget(_) => "BindRenderTarget",
            Command::WriteBuffer { .. } => "WriteBuffer",
            Command::CopyRenderTarget(_) => "CopyRenderTarget",
            Command::Draw(_) => "Draw",
            Command::DrawIndexed(_) => "DrawIndexed",
        }
    }
}

/// Whether a [`CommandList`] accepts new records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RecordingState {
    /// Closed; record calls are dropped.
    #[default]
    Idle,
    /// Open; record calls append.
    Recording,
}

/// An append-only buffer of [`Command`]s.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    state: RecordingState,
    commands: Vec<Command>,
}

impl CommandList {
    /// Creates an empty, idle list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// `true` between `start_recording` and `submit`.
    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Recorded commands, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// `true` when nothing is recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub(crate) fn begin(&mut self) {
        self.commands.clear();
        self.state = RecordingState::Recording;
    }

    pub(crate) fn finish(&mut self) {
        self.state = RecordingState::Idle;
    }

    fn push(&mut self, command: Command) {
        if self.state != RecordingState::Recording {
            log::warn!(
                "CommandList: dropping {} recorded while the list is idle",
                command.name()
            );
            return;
        }
        self.commands.push(command);
    }

    /// Records a scissor rectangle.
    pub fn set_scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.push(Command::SetScissor(Rect::new(x, y, width, height)));
    }

    /// Records a viewport rectangle.
    pub fn set_viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.push(Command::SetViewport(Rect::new(x, y, width, height)));
    }

    /// Records the depth clear value.
    pub fn set_clear_depth(&mut self, depth: f32) {
        self.push(Command::SetClearDepth(depth));
    }

    /// Records an opaque clear color.
    pub fn set_clear_color3(&mut self, r: f32, g: f32, b: f32) {
        self.push(Command::SetClearColor([r, g, b, 1.0]));
    }

    /// Records a clear color.
    pub fn set_clear_color4(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.push(Command::SetClearColor([r, g, b, a]));
    }

    /// Records a clear of the buffers selected by `mask`.
    pub fn clear(&mut self, mask: RenderTargetMask) {
        self.push(Command::Clear(mask));
    }

    /// Records a pipeline bind.
    pub fn bind_pipeline(&mut self, pipeline: PipelineId) {
        self.push(Command::BindPipeline(pipeline));
    }

    /// Records a storage buffer bind at `index`.
    pub fn bind_storage_buffer(&mut self, buffer: BufferId, index: u32) {
        self.push(Command::BindStorageBuffer { buffer, index });
    }

    /// Records a uniform buffer bind at `index`.
    pub fn bind_uniform_buffer(&mut self, buffer: BufferId, index: u32) {
        self.push(Command::BindUniformBuffer { buffer, index });
    }

    /// Records an index buffer bind. Takes effect on the pipeline bound at replay.
    pub fn bind_index_buffer(&mut self, buffer: BufferId) {
        self.push(Command::BindIndexBuffer(buffer));
    }

    /// Records a vertex buffer bind. Takes effect on the pipeline bound at replay.
    pub fn bind_vertex_buffer(&mut self, buffer: BufferId) {
        self.push(Command::BindVertexBuffer(buffer));
    }

    /// Records a sampler bind on texture unit `index`.
    pub fn bind_sampler(&mut self, sampler: SamplerId, index: u32) {
        self.push(Command::BindSampler { sampler, index });
    }

    /// Records a texture bind on texture unit `index`.
    pub fn bind_texture(&mut self, texture: TextureId, index: u32) {
        self.push(Command::BindTexture { texture, index });
    }

    /// Records a render target bind; `None` selects the default framebuffer.
    pub fn bind_render_target(&mut self, target: Option<RenderTargetId>) {
        self.push(Command::BindRenderTarget(target));
    }

    /// Records a buffer upload. `data` is copied into the record.
    pub fn write_buffer(&mut self, buffer: BufferId, offset: usize, data: &[u8]) {
        self.push(Command::WriteBuffer {
            buffer,
            offset,
            data: data.to_vec(),
        });
    }

    /// Records a buffer upload of plain-old-data values.
    pub fn write_buffer_pod<T: bytemuck::Pod>(&mut self, buffer: BufferId, offset: usize, data: &[T]) {
        self.write_buffer(buffer, offset, bytemuck::cast_slice(data));
    }

    /// Records a blit between render targets.
    pub fn copy_render_target(
        &mut self,
        source: Option<RenderTargetId>,
        destination: Option<RenderTargetId>,
        source_region: BlitRegion,
        destination_region: BlitRegion,
        mask: RenderTargetMask,
        filter: bool,
    ) {
        self.push(Command::CopyRenderTarget(RenderTargetCopy {
            source,
            destination,
            source_region,
            destination_region,
            mask,
            filter,
        }));
    }

    /// Records a non-indexed draw.
    pub fn draw(&mut self, vertices: u32, instances: u32, base_vertex: u32, base_instance: u32) {
        self.push(Command::Draw(DrawArgs {
            vertices,
            instances,
            base_vertex,
            base_instance,
        }));
    }

    /// Records an indexed draw.
    pub fn draw_indexed(
        &mut self,
        indices: u32,
        instances: u32,
        base_index: u32,
        base_vertex: i32,
        base_instance: u32,
    ) {
        self.push(Command::DrawIndexed(DrawIndexedArgs {
            indices,
            instances,
            base_index,
            base_vertex,
            base_instance,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_are_dropped_while_idle() {
        let mut list = CommandList::new();
        list.draw(3, 1, 0, 0);
        assert!(list.is_empty());
        assert_eq!(list.state(), RecordingState::Idle);
    }

    #[test]
    fn test_records_append_in_order() {
        let mut list = CommandList::new();
        list.begin();
        list.set_viewport(0, 0, 640, 480);
        list.set_clear_color3(0.1, 0.2, 0.3);
        list.clear(RenderTargetMask::COLOR | RenderTargetMask::DEPTH);
        list.draw(3, 1, 0, 0);

        let names: Vec<_> = list.commands().iter().map(Command::name).collect();
        assert_eq!(names, ["SetViewport", "SetClearColor", "Clear", "Draw"]);
        assert_eq!(list.commands()[1], Command::SetClearColor([0.1, 0.2, 0.3, 1.0]));
    }

    #[test]
    fn test_write_buffer_copies_payload() {
        let mut list = CommandList::new();
        list.begin();
        let mut payload = vec![1u8, 2, 3, 4];
        list.write_buffer(BufferId(7), 4, &payload);
        payload.fill(0);

        match &list.commands()[0] {
            Command::WriteBuffer { buffer, offset, data } => {
                assert_eq!(*buffer, BufferId(7));
                assert_eq!(*offset, 4);
                assert_eq!(data.as_slice(), &[1, 2, 3, 4]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_begin_discards_previous_records() {
        let mut list = CommandList::new();
        list.begin();
        list.write_buffer_pod(BufferId(0), 0, &[1.0f32, 2.0]);
        list.finish();
        assert_eq!(list.len(), 1);

        list.begin();
        assert!(list.is_empty());
        assert!(list.is_recording());
    }
}
