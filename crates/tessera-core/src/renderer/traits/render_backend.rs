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

//! Defines the [`RenderBackend`] trait and the plain types that cross it.
//!
//! The trait is deliberately low level: it mirrors individual driver calls
//! so that everything with observable ordering (state resets, lazy
//! rebinding, slot wiring) is decided by the [`RenderDevice`] once, and every
//! backend only translates.
//!
//! [`RenderDevice`]: crate::renderer::RenderDevice

use crate::renderer::api::*;
use std::fmt::Debug;

/// Result of a backend compile or link step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput<H> {
    /// The created object, or `None` on failure. On failure the backend has
    /// already released whatever it allocated.
    pub handle: Option<H>,
    /// The compiler or linker info log; may be empty.
    pub log: String,
}

impl<H> BuildOutput<H> {
    /// A successful build with an empty log.
    pub fn success(handle: H) -> Self {
        Self {
            handle: Some(handle),
            log: String::new(),
        }
    }

    /// A failed build.
    pub fn failure(log: impl Into<String>) -> Self {
        Self {
            handle: None,
            log: log.into(),
        }
    }
}

/// Global raster features toggled when a pipeline is bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Color blending.
    Blend,
    /// Depth testing.
    DepthTest,
    /// Face culling.
    CullFace,
    /// Scissor testing.
    ScissorTest,
}

impl Capability {
    /// Every capability, in the order they are reset on pipeline bind.
    pub const ALL: [Capability; 4] = [
        Capability::Blend,
        Capability::DepthTest,
        Capability::CullFace,
        Capability::ScissorTest,
    ];
}

/// Indexed buffer binding points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferBindingTarget {
    /// Uniform blocks.
    Uniform,
    /// Shader storage blocks.
    Storage,
}

/// Resolved attachments of a framebuffer to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramebufferAttachments<H> {
    /// `(slot, texture, format)` of each color attachment.
    pub color: Vec<(u32, H, PixelFormat)>,
    /// Depth texture and its format.
    pub depth: Option<(H, PixelFormat)>,
    /// Stencil texture and its format.
    pub stencil: Option<(H, PixelFormat)>,
}

/// A resolved render target blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferBlit<H> {
    /// Read framebuffer; `None` is the default framebuffer.
    pub source: Option<H>,
    /// Draw framebuffer; `None` is the default framebuffer.
    pub destination: Option<H>,
    /// Source corners.
    pub source_region: BlitRegion,
    /// Destination corners.
    pub destination_region: BlitRegion,
    /// Buffers to copy.
    pub mask: RenderTargetMask,
    /// Linear filtering.
    pub filter: bool,
}

/// A graphics API the [`RenderDevice`](crate::renderer::RenderDevice) can drive.
///
/// All methods run on the thread owning the API context. Methods creating
/// objects return raw backend handles; the device maps them to typed ids
/// and is the only caller that deletes them.
pub trait RenderBackend {
    /// Raw name of any backend object (for OpenGL, a `GLuint`).
    type Handle: Copy + Eq + Debug;

    // --- Capabilities ---

    /// Capabilities reported through [`RenderDevice::info`](crate::renderer::RenderDevice::info).
    fn device_info(&self) -> DeviceInfo;

    /// Binding points addressable by one vertex array. At least 1.
    fn max_vertex_bindings(&self) -> u32;

    /// Color attachment slots of one framebuffer. At least 1.
    fn max_color_attachments(&self) -> u32;

    /// Preamble flavour injected into GLSL sources.
    fn glsl_dialect(&self) -> GlslDialect;

    // --- Shaders and programs ---

    /// Compiles one stage.
    fn compile_shader(&mut self, stage: ShaderStage, code: ShaderCode<'_>) -> BuildOutput<Self::Handle>;

    /// Releases a compiled stage.
    fn delete_shader(&mut self, shader: Self::Handle);

    /// Links compiled stages into a program.
    fn link_program(&mut self, shaders: &[Self::Handle]) -> BuildOutput<Self::Handle>;

    /// Releases a program.
    fn delete_program(&mut self, program: Self::Handle);

    // --- Buffers ---

    /// Allocates `size` bytes, optionally filling the start with `data`.
    fn create_buffer(&mut self, size: usize, data: Option<&[u8]>) -> Self::Handle;

    /// Overwrites `data.len()` bytes at `offset`. The range is already validated.
    fn write_buffer(&mut self, buffer: Self::Handle, offset: usize, data: &[u8]);

    /// Releases a buffer.
    fn delete_buffer(&mut self, buffer: Self::Handle);

    // --- Vertex arrays ---

    /// Creates a vertex array and declares the format of every attribute.
    fn create_vertex_array(&mut self, attribs: &[VertexAttrib]) -> Self::Handle;

    /// Attaches `buffer` to binding point `binding` of `vertex_array`, offset 0.
    fn attach_vertex_buffer(
        &mut self,
        vertex_array: Self::Handle,
        binding: u32,
        buffer: Self::Handle,
        stride: u32,
    );

    /// Releases a vertex array.
    fn delete_vertex_array(&mut self, vertex_array: Self::Handle);

    // --- Samplers, textures, framebuffers ---

    /// Creates a sampler with all of its state.
    fn create_sampler(&mut self, descriptor: &SamplerDescriptor<'_>) -> Self::Handle;

    /// Releases a sampler.
    fn delete_sampler(&mut self, sampler: Self::Handle);

    /// Allocates texture storage.
    fn create_texture(&mut self, descriptor: &TextureDescriptor<'_>) -> Self::Handle;

    /// Uploads texels. Format, region and data length are already validated.
    fn write_texture(
        &mut self,
        texture: Self::Handle,
        kind: TextureKind,
        region: &TextureRegion,
        transfer: TransferFormat,
        data: &[u8],
    );

    /// Releases a texture.
    fn delete_texture(&mut self, texture: Self::Handle);

    /// Creates a framebuffer, or releases it and returns `None` when incomplete.
    fn create_framebuffer(
        &mut self,
        attachments: &FramebufferAttachments<Self::Handle>,
    ) -> Option<Self::Handle>;

    /// Releases a framebuffer.
    fn delete_framebuffer(&mut self, framebuffer: Self::Handle);

    // --- Replay state ---

    /// Sets the scissor rectangle.
    fn set_scissor(&mut self, rect: Rect);

    /// Sets the viewport rectangle.
    fn set_viewport(&mut self, rect: Rect);

    /// Sets the depth clear value.
    fn set_clear_depth(&mut self, depth: f32);

    /// Sets the color clear value.
    fn set_clear_color(&mut self, color: [f32; 4]);

    /// Clears buffers of the bound framebuffer.
    fn clear(&mut self, mask: RenderTargetMask);

    /// Enables or disables a raster feature.
    fn set_capability(&mut self, capability: Capability, enabled: bool);

    /// Sets blend equation and factors.
    fn set_blend(&mut self, equation: BlendEquation, src: BlendFactor, dst: BlendFactor);

    /// Sets the depth comparison.
    fn set_depth_func(&mut self, func: DepthFunc);

    /// Sets culled face and winding.
    fn set_cull(&mut self, face: CullFace, front_face: FrontFace);

    /// Sets polygon rasterisation for both faces.
    fn set_fill_mode(&mut self, mode: FillMode);

    /// Selects the program; `None` unbinds.
    fn use_program(&mut self, program: Option<Self::Handle>);

    /// Binds a buffer to an indexed binding point.
    fn bind_buffer_base(&mut self, target: BufferBindingTarget, index: u32, buffer: Self::Handle);

    /// Makes `vertex_array` current.
    fn bind_vertex_array(&mut self, vertex_array: Self::Handle);

    /// Routes attribute `attrib` of `vertex_array` to binding point `binding`.
    /// `vertex_array` is current when this is called.
    fn set_attrib_binding(&mut self, vertex_array: Self::Handle, attrib: u32, binding: u32);

    /// Sets the element buffer of `vertex_array`, which is current.
    fn set_element_buffer(&mut self, vertex_array: Self::Handle, buffer: Option<Self::Handle>);

    /// Binds a sampler to a texture unit.
    fn bind_sampler(&mut self, unit: u32, sampler: Self::Handle);

    /// Binds a texture to a texture unit.
    fn bind_texture(&mut self, unit: u32, kind: TextureKind, texture: Self::Handle);

    /// Binds a framebuffer for drawing and reading; `None` is the default one.
    fn bind_framebuffer(&mut self, framebuffer: Option<Self::Handle>);

    /// The framebuffer currently bound for drawing.
    fn current_framebuffer(&mut self) -> Option<Self::Handle>;

    /// Copies between framebuffers. May change the framebuffer binding.
    fn blit_framebuffer(&mut self, blit: &FramebufferBlit<Self::Handle>);

    /// Draws non-indexed primitives.
    fn draw_arrays(&mut self, mode: PrimitiveMode, args: &DrawArgs);

    /// Draws indexed primitives; `byte_offset` is the first index's offset
    /// into the element buffer.
    fn draw_elements(
        &mut self,
        mode: PrimitiveMode,
        index_type: IndexType,
        args: &DrawIndexedArgs,
        byte_offset: usize,
    );

    // --- Frame lifecycle ---

    /// Resets ambient state other code may have left behind.
    fn begin_frame(&mut self);

    /// Shows the finished frame.
    fn present(&mut self);

    /// Sets the swap interval (0 disables vsync).
    fn set_swap_interval(&mut self, interval: i32);
}
