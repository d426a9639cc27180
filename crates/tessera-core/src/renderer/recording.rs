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

//! An in-memory [`RenderBackend`] that records every call.
//!
//! It lets the device's ordering decisions be checked without a GPU: tests
//! drive a `RenderDevice<RecordingBackend>` and assert on [`BackendCall`]s.
//! Buffer contents are kept so writes can be verified byte for byte.

use crate::renderer::api::*;
use crate::renderer::traits::{
    BufferBindingTarget, BuildOutput, Capability, FramebufferAttachments, FramebufferBlit,
    RenderBackend,
};
use std::collections::HashMap;

/// One call made on a [`RecordingBackend`].
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    CompileShader {
        stage: ShaderStage,
        /// The full GLSL source handed to the compiler, preamble included.
        glsl: Option<String>,
        handle: Option<u32>,
    },
    DeleteShader(u32),
    LinkProgram {
        shaders: Vec<u32>,
        handle: Option<u32>,
    },
    DeleteProgram(u32),
    CreateBuffer {
        handle: u32,
        size: usize,
    },
    WriteBuffer {
        buffer: u32,
        offset: usize,
        len: usize,
    },
    DeleteBuffer(u32),
    CreateVertexArray {
        handle: u32,
        attribs: Vec<VertexAttrib>,
    },
    AttachVertexBuffer {
        vertex_array: u32,
        binding: u32,
        buffer: u32,
        stride: u32,
    },
    DeleteVertexArray(u32),
    CreateSampler(u32),
    DeleteSampler(u32),
    CreateTexture {
        handle: u32,
        kind: TextureKind,
        format: PixelFormat,
        levels: u32,
    },
    WriteTexture {
        texture: u32,
        region: TextureRegion,
        transfer: TransferFormat,
        len: usize,
    },
    DeleteTexture(u32),
    CreateFramebuffer(Option<u32>),
    DeleteFramebuffer(u32),
    SetScissor(Rect),
    SetViewport(Rect),
    SetClearDepth(f32),
    SetClearColor([f32; 4]),
    Clear(RenderTargetMask),
    SetCapability(Capability, bool),
    SetBlend(BlendEquation, BlendFactor, BlendFactor),
    SetDepthFunc(DepthFunc),
    SetCull(CullFace, FrontFace),
    SetFillMode(FillMode),
    UseProgram(Option<u32>),
    BindBufferBase {
        target: BufferBindingTarget,
        index: u32,
        buffer: u32,
    },
    BindVertexArray(u32),
    SetAttribBinding {
        vertex_array: u32,
        attrib: u32,
        binding: u32,
    },
    SetElementBuffer {
        vertex_array: u32,
        buffer: Option<u32>,
    },
    BindSampler {
        unit: u32,
        sampler: u32,
    },
    BindTexture {
        unit: u32,
        kind: TextureKind,
        texture: u32,
    },
    BindFramebuffer(Option<u32>),
    BlitFramebuffer(FramebufferBlit<u32>),
    DrawArrays {
        mode: PrimitiveMode,
        args: DrawArgs,
    },
    DrawElements {
        mode: PrimitiveMode,
        index_type: IndexType,
        args: DrawIndexedArgs,
        byte_offset: usize,
    },
    BeginFrame,
    Present,
    SetSwapInterval(i32),
}

impl BackendCall {
    /// Whether this call is a draw.
    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            BackendCall::DrawArrays { .. } | BackendCall::DrawElements { .. }
        )
    }
}

/// A backend whose handles are plain counters and whose calls are logged.
///
/// GLSL sources containing `#error` fail to compile, and linking zero stages
/// fails, so both failure paths of the device can be exercised.
#[derive(Debug)]
pub struct RecordingBackend {
    info: DeviceInfo,
    max_vertex_bindings: u32,
    max_color_attachments: u32,
    dialect: GlslDialect,
    next_handle: u32,
    calls: Vec<BackendCall>,
    buffers: HashMap<u32, Vec<u8>>,
    framebuffer: Option<u32>,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    /// A backend with 16 vertex bindings per array, accepting GLSL only.
    pub fn new() -> Self {
        Self {
            info: DeviceInfo {
                impl_family: ImplFamily::Recording,
                impl_version_major: 0,
                impl_version_minor: 0,
                supports_anisotropic: false,
                supports_storage_buffers: true,
                supports_shader_format: [false, true],
            },
            max_vertex_bindings: 16,
            max_color_attachments: 8,
            dialect: GlslDialect::Gl33,
            next_handle: 1,
            calls: Vec::new(),
            buffers: HashMap::new(),
            framebuffer: None,
        }
    }

    /// Overrides the number of binding points per vertex array.
    pub fn with_max_vertex_bindings(mut self, max: u32) -> Self {
        self.max_vertex_bindings = max;
        self
    }

    /// Overrides the number of color attachment slots per framebuffer.
    pub fn with_max_color_attachments(mut self, max: u32) -> Self {
        self.max_color_attachments = max;
        self
    }

    /// Overrides the reported capabilities.
    pub fn with_info(mut self, info: DeviceInfo) -> Self {
        self.info = info;
        self
    }

    /// Overrides the GLSL dialect.
    pub fn with_dialect(mut self, dialect: GlslDialect) -> Self {
        self.dialect = dialect;
        self
    }

    /// Every call so far.
    pub fn calls(&self) -> &[BackendCall] {
        &self.calls
    }

    /// Returns and forgets every call so far.
    pub fn take_calls(&mut self) -> Vec<BackendCall> {
        std::mem::take(&mut self.calls)
    }

    /// Contents of a live buffer.
    pub fn buffer_contents(&self, buffer: u32) -> Option<&[u8]> {
        self.buffers.get(&buffer).map(Vec::as_slice)
    }

    /// Number of live buffers.
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    fn allocate(&mut self) -> u32 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    fn record(&mut self, call: BackendCall) {
        self.calls.push(call);
    }
}

fn attachments_complete(attachments: &FramebufferAttachments<u32>) -> bool {
    let has_any = !attachments.color.is_empty()
        || attachments.depth.is_some()
        || attachments.stencil.is_some();
    let colors_ok = attachments
        .color
        .iter()
        .all(|(_, _, format)| !format.is_depth() && !format.is_stencil());
    let mut slots: Vec<u32> = attachments.color.iter().map(|(slot, _, _)| *slot).collect();
    slots.sort_unstable();
    slots.dedup();
    let slots_unique = slots.len() == attachments.color.len();
    let depth_ok = attachments
        .depth
        .map_or(true, |(_, format)| format.is_depth());
    let stencil_ok = attachments
        .stencil
        .map_or(true, |(_, format)| format.is_stencil());
    has_any && colors_ok && slots_unique && depth_ok && stencil_ok
}

impl RenderBackend for RecordingBackend {
    type Handle = u32;

    fn device_info(&self) -> DeviceInfo {
        self.info
    }

    fn max_vertex_bindings(&self) -> u32 {
        self.max_vertex_bindings
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_color_attachments
    }

    fn glsl_dialect(&self) -> GlslDialect {
        self.dialect
    }

    fn compile_shader(&mut self, stage: ShaderStage, code: ShaderCode<'_>) -> BuildOutput<u32> {
        let (glsl, output) = match code {
            ShaderCode::Glsl(source) if source.contains("#error") => (
                Some(source.to_owned()),
                BuildOutput::failure("0:1(1): error: #error directive"),
            ),
            ShaderCode::Glsl(source) => {
                (Some(source.to_owned()), BuildOutput::success(self.allocate()))
            }
            ShaderCode::SpirV(_) => (None, BuildOutput::success(self.allocate())),
        };
        self.record(BackendCall::CompileShader {
            stage,
            glsl,
            handle: output.handle,
        });
        output
    }

    fn delete_shader(&mut self, shader: u32) {
        self.record(BackendCall::DeleteShader(shader));
    }

    fn link_program(&mut self, shaders: &[u32]) -> BuildOutput<u32> {
        let output = if shaders.is_empty() {
            BuildOutput::failure("error: no shaders attached")
        } else {
            BuildOutput::success(self.allocate())
        };
        self.record(BackendCall::LinkProgram {
            shaders: shaders.to_vec(),
            handle: output.handle,
        });
        output
    }

    fn delete_program(&mut self, program: u32) {
        self.record(BackendCall::DeleteProgram(program));
    }

    fn create_buffer(&mut self, size: usize, data: Option<&[u8]>) -> u32 {
        let handle = self.allocate();
        let mut contents = vec![0u8; size];
        if let Some(data) = data {
            contents[..data.len()].copy_from_slice(data);
        }
        self.buffers.insert(handle, contents);
        self.record(BackendCall::CreateBuffer { handle, size });
        handle
    }

    fn write_buffer(&mut self, buffer: u32, offset: usize, data: &[u8]) {
        if let Some(contents) = self.buffers.get_mut(&buffer) {
            contents[offset..offset + data.len()].copy_from_slice(data);
        }
        self.record(BackendCall::WriteBuffer {
            buffer,
            offset,
            len: data.len(),
        });
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.buffers.remove(&buffer);
        self.record(BackendCall::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&mut self, attribs: &[VertexAttrib]) -> u32 {
        let handle = self.allocate();
        self.record(BackendCall::CreateVertexArray {
            handle,
            attribs: attribs.to_vec(),
        });
        handle
    }

    fn attach_vertex_buffer(&mut self, vertex_array: u32, binding: u32, buffer: u32, stride: u32) {
        self.record(BackendCall::AttachVertexBuffer {
            vertex_array,
            binding,
            buffer,
            stride,
        });
    }

    fn delete_vertex_array(&mut self, vertex_array: u32) {
        self.record(BackendCall::DeleteVertexArray(vertex_array));
    }

    fn create_sampler(&mut self, _descriptor: &SamplerDescriptor<'_>) -> u32 {
        let handle = self.allocate();
        self.record(BackendCall::CreateSampler(handle));
        handle
    }

    fn delete_sampler(&mut self, sampler: u32) {
        self.record(BackendCall::DeleteSampler(sampler));
    }

    fn create_texture(&mut self, descriptor: &TextureDescriptor<'_>) -> u32 {
        let handle = self.allocate();
        self.record(BackendCall::CreateTexture {
            handle,
            kind: descriptor.kind,
            format: descriptor.format,
            levels: descriptor.level_count(),
        });
        handle
    }

    fn write_texture(
        &mut self,
        texture: u32,
        _kind: TextureKind,
        region: &TextureRegion,
        transfer: TransferFormat,
        data: &[u8],
    ) {
        self.record(BackendCall::WriteTexture {
            texture,
            region: *region,
            transfer,
            len: data.len(),
        });
    }

    fn delete_texture(&mut self, texture: u32) {
        self.record(BackendCall::DeleteTexture(texture));
    }

    fn create_framebuffer(&mut self, attachments: &FramebufferAttachments<u32>) -> Option<u32> {
        let handle = attachments_complete(attachments).then(|| self.allocate());
        self.record(BackendCall::CreateFramebuffer(handle));
        handle
    }

    fn delete_framebuffer(&mut self, framebuffer: u32) {
        if self.framebuffer == Some(framebuffer) {
            self.framebuffer = None;
        }
        self.record(BackendCall::DeleteFramebuffer(framebuffer));
    }

    fn set_scissor(&mut self, rect: Rect) {
        self.record(BackendCall::SetScissor(rect));
    }

    fn set_viewport(&mut self, rect: Rect) {
        self.record(BackendCall::SetViewport(rect));
    }

    fn set_clear_depth(&mut self, depth: f32) {
        self.record(BackendCall::SetClearDepth(depth));
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        self.record(BackendCall::SetClearColor(color));
    }

    fn clear(&mut self, mask: RenderTargetMask) {
        self.record(BackendCall::Clear(mask));
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        self.record(BackendCall::SetCapability(capability, enabled));
    }

    fn set_blend(&mut self, equation: BlendEquation, src: BlendFactor, dst: BlendFactor) {
        self.record(BackendCall::SetBlend(equation, src, dst));
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        self.record(BackendCall::SetDepthFunc(func));
    }

    fn set_cull(&mut self, face: CullFace, front_face: FrontFace) {
        self.record(BackendCall::SetCull(face, front_face));
    }

    fn set_fill_mode(&mut self, mode: FillMode) {
        self.record(BackendCall::SetFillMode(mode));
    }

    fn use_program(&mut self, program: Option<u32>) {
        self.record(BackendCall::UseProgram(program));
    }

    fn bind_buffer_base(&mut self, target: BufferBindingTarget, index: u32, buffer: u32) {
        self.record(BackendCall::BindBufferBase {
            target,
            index,
            buffer,
        });
    }

    fn bind_vertex_array(&mut self, vertex_array: u32) {
        self.record(BackendCall::BindVertexArray(vertex_array));
    }

    fn set_attrib_binding(&mut self, vertex_array: u32, attrib: u32, binding: u32) {
        self.record(BackendCall::SetAttribBinding {
            vertex_array,
            attrib,
            binding,
        });
    }

    fn set_element_buffer(&mut self, vertex_array: u32, buffer: Option<u32>) {
        self.record(BackendCall::SetElementBuffer {
            vertex_array,
            buffer,
        });
    }

    fn bind_sampler(&mut self, unit: u32, sampler: u32) {
        self.record(BackendCall::BindSampler { unit, sampler });
    }

    fn bind_texture(&mut self, unit: u32, kind: TextureKind, texture: u32) {
        self.record(BackendCall::BindTexture {
            unit,
            kind,
            texture,
        });
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<u32>) {
        self.framebuffer = framebuffer;
        self.record(BackendCall::BindFramebuffer(framebuffer));
    }

    fn current_framebuffer(&mut self) -> Option<u32> {
        self.framebuffer
    }

    fn blit_framebuffer(&mut self, blit: &FramebufferBlit<u32>) {
        // Blitting rebinds the draw framebuffer, as the GL backends do.
        self.framebuffer = blit.destination;
        self.record(BackendCall::BlitFramebuffer(*blit));
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, args: &DrawArgs) {
        self.record(BackendCall::DrawArrays { mode, args: *args });
    }

    fn draw_elements(
        &mut self,
        mode: PrimitiveMode,
        index_type: IndexType,
        args: &DrawIndexedArgs,
        byte_offset: usize,
    ) {
        self.record(BackendCall::DrawElements {
            mode,
            index_type,
            args: *args,
            byte_offset,
        });
    }

    fn begin_frame(&mut self) {
        self.record(BackendCall::BeginFrame);
    }

    fn present(&mut self) {
        self.record(BackendCall::Present);
    }

    fn set_swap_interval(&mut self, interval: i32) {
        self.record(BackendCall::SetSwapInterval(interval));
    }
}
