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

//! The [`RenderDevice`]: resource registry, slot bookkeeping and replay.

mod bridge;
mod entries;
mod registry;
mod replay;
mod resources;
pub mod slots;

use self::entries::{
    BufferEntry, PipelineEntry, RenderTargetEntry, SamplerEntry, ShaderEntry, TextureEntry,
};
use self::registry::Registry;
use self::slots::{VertexSlot, VertexSlotAllocator};
use crate::renderer::api::*;
use crate::renderer::debug::{self, DebugLevel, DebugSink};
use crate::renderer::traits::RenderBackend;

/// Where the device is in its per-frame cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameState {
    /// Constructed, or between frames.
    Ready,
    /// `prepare` ran; commands are being submitted.
    Prepared,
    /// The frame was handed to the swap callback.
    Presented,
}

/// Number of live resources of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResourceCounts {
    /// Live shaders.
    pub shaders: usize,
    /// Live pipelines.
    pub pipelines: usize,
    /// Live buffers.
    pub buffers: usize,
    /// Live samplers.
    pub samplers: usize,
    /// Live textures.
    pub textures: usize,
    /// Live render targets.
    pub render_targets: usize,
}

/// Owns every resource created through it and replays command lists onto a
/// [`RenderBackend`].
///
/// Resources are addressed by typed ids that are never reused; the device
/// is the only owner of backend objects and releases whatever is still
/// alive when dropped.
pub struct RenderDevice<B: RenderBackend> {
    backend: B,
    info: DeviceInfo,
    settings: DeviceSettings,
    debug_sink: Option<DebugSink>,
    max_bindings: u32,
    frame: FrameState,
    slots: VertexSlotAllocator,
    shaders: Registry<ShaderId, ShaderEntry<B::Handle>>,
    pipelines: Registry<PipelineId, PipelineEntry<B::Handle>>,
    buffers: Registry<BufferId, BufferEntry<B::Handle>>,
    samplers: Registry<SamplerId, SamplerEntry<B::Handle>>,
    textures: Registry<TextureId, TextureEntry<B::Handle>>,
    render_targets: Registry<RenderTargetId, RenderTargetEntry<B::Handle>>,
}

impl<B: RenderBackend> RenderDevice<B> {
    /// Wraps an initialised backend.
    pub fn new(mut backend: B, descriptor: DeviceDescriptor) -> Self {
        let DeviceDescriptor {
            settings,
            debug_sink,
        } = descriptor;

        let info = backend.device_info();
        let max_bindings = backend.max_vertex_bindings().max(1);
        if let Some(vsync) = settings.vsync {
            backend.set_swap_interval(i32::from(vsync));
        }

        log::info!(
            "Render device '{}' ready: {:?} {}.{}, {} vertex bindings per array",
            settings.label.as_deref().unwrap_or("Unnamed"),
            info.impl_family,
            info.impl_version_major,
            info.impl_version_minor,
            max_bindings
        );

        Self {
            backend,
            info,
            settings,
            debug_sink,
            max_bindings,
            frame: FrameState::Ready,
            slots: VertexSlotAllocator::new(),
            shaders: Registry::new(),
            pipelines: Registry::new(),
            buffers: Registry::new(),
            samplers: Registry::new(),
            textures: Registry::new(),
            render_targets: Registry::new(),
        }
    }

    /// Capabilities of the backend.
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    /// Settings the device was created with.
    pub fn settings(&self) -> &DeviceSettings {
        &self.settings
    }

    /// The backend being driven.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, e.g. to inspect a test backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Binding points per vertex array, as used for slot grouping.
    pub fn max_vertex_bindings(&self) -> u32 {
        self.max_bindings
    }

    /// Current position in the frame cycle.
    pub fn frame_state(&self) -> FrameState {
        self.frame
    }

    /// Number of live resources per kind.
    pub fn resource_counts(&self) -> ResourceCounts {
        ResourceCounts {
            shaders: self.shaders.len(),
            pipelines: self.pipelines.len(),
            buffers: self.buffers.len(),
            samplers: self.samplers.len(),
            textures: self.textures.len(),
            render_targets: self.render_targets.len(),
        }
    }

    /// The binding slot held by a vertex buffer.
    pub fn buffer_slot(&self, buffer: BufferId) -> Option<VertexSlot> {
        self.buffers.get(buffer).and_then(|entry| entry.slot)
    }

    /// The backend object behind a buffer.
    pub fn raw_buffer(&self, buffer: BufferId) -> Option<B::Handle> {
        self.buffers.get(buffer).map(|entry| entry.handle)
    }

    /// The shared slot allocator.
    pub fn slot_allocator(&self) -> &VertexSlotAllocator {
        &self.slots
    }

    /// Vertex-array group indices a pipeline has created so far.
    pub fn pipeline_vertex_arrays(&self, pipeline: PipelineId) -> Option<Vec<u32>> {
        self.pipelines
            .get(pipeline)
            .map(|entry| entry.groups.keys().copied().collect())
    }

    // --- Frame lifecycle ---

    /// Starts a frame by resetting global state other code may have changed.
    pub fn prepare(&mut self) {
        if self.frame == FrameState::Prepared {
            log::debug!("prepare() called twice without present()");
        }
        self.backend.begin_frame();
        self.frame = FrameState::Prepared;
    }

    /// Hands the frame to the swap callback.
    pub fn present(&mut self) {
        if self.frame != FrameState::Prepared {
            log::debug!("present() called in state {:?}", self.frame);
        }
        self.backend.present();
        self.frame = FrameState::Presented;
    }

    /// Enables or disables vertical sync.
    pub fn vsync(&mut self, enabled: bool) {
        self.backend.set_swap_interval(i32::from(enabled));
    }

    /// Notifies the device of a new surface size. The default framebuffer
    /// follows the window, so this has no effect on OpenGL.
    pub fn mode(&mut self, width: u32, height: u32) {
        log::debug!("Surface mode changed to {width}x{height}");
    }

    // --- Command lists ---

    /// A new, idle command list.
    pub fn create_command_list(&self) -> CommandList {
        CommandList::new()
    }

    /// Clears `list` and opens it for recording.
    pub fn start_recording(&mut self, list: &mut CommandList) {
        if list.is_recording() {
            log::debug!("start_recording() on a list that is already recording");
        }
        list.begin();
    }

    /// Destroys every live resource. Ids stay unique afterwards.
    pub fn release_all(&mut self) {
        for target in self.render_targets.drain() {
            self.backend.delete_framebuffer(target.handle);
        }
        for pipeline in self.pipelines.drain() {
            for group in pipeline.groups.into_values() {
                self.backend.delete_vertex_array(group.vertex_array);
            }
            self.backend.delete_program(pipeline.program);
        }
        for shader in self.shaders.drain() {
            self.backend.delete_shader(shader.handle);
        }
        for buffer in self.buffers.drain() {
            if let Some(slot) = buffer.slot {
                self.slots.release(slot);
            }
            self.backend.delete_buffer(buffer.handle);
        }
        for sampler in self.samplers.drain() {
            self.backend.delete_sampler(sampler.handle);
        }
        for texture in self.textures.drain() {
            self.backend.delete_texture(texture.handle);
        }
        log::debug!("Render device released all resources");
    }

    pub(crate) fn emit(&self, level: DebugLevel, text: &str) {
        debug::emit(self.debug_sink.as_ref(), level, text);
    }
}

impl<B: RenderBackend> Drop for RenderDevice<B> {
    fn drop(&mut self) {
        self.release_all();
    }
}
