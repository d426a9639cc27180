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

use super::indirect::{DrawArraysIndirectCommand, DrawElementsIndirectCommand, INDIRECT_BUFFER_SIZE};
use crate::graphics::opengl::conversions::IntoGl;
use crate::graphics::opengl::debug::DebugHook;
use crate::graphics::opengl::ext::{self, SpecializeShaderFn};
use crate::graphics::opengl::{loader, program, state, GlContext};
use anyhow::bail;
use gl::types::{GLenum, GLint, GLsizei, GLsizeiptr, GLuint};
use std::ffi::c_void;
use std::marker::PhantomData;
use tessera_core::renderer::traits::{
    BufferBindingTarget, BuildOutput, Capability, FramebufferAttachments, FramebufferBlit,
};
use tessera_core::renderer::{
    BlendEquation, BlendFactor, CullFace, DebugLevel, DebugMessage, DepthFunc, DeviceDescriptor,
    DeviceInfo, DrawArgs, DrawIndexedArgs, FillMode, FrontFace, GlslDialect, ImplFamily,
    ImplInfo, IndexType, PrimitiveMode, Rect, RenderBackend, RenderDevice, RenderTargetMask,
    SamplerDescriptor, ShaderCode, ShaderFormat, ShaderStage, TextureDescriptor, TextureKind,
    TextureRegion, TransferFormat, VertexAttrib,
};

/// Drives an OpenGL 4.6 core context.
pub struct Gl46Backend {
    // Unregisters its callback before the context goes away.
    _debug: Option<DebugHook>,
    context: Box<dyn GlContext>,
    max_bindings: u32,
    max_colors: u32,
    specialize_shader: Option<SpecializeShaderFn>,
    indirect_buffer: GLuint,
    _not_send: PhantomData<*const ()>,
}

/// Context requirements of this backend, for the windowing layer.
pub fn poll_impl_info() -> ImplInfo {
    ImplInfo {
        family: ImplFamily::OpenGl,
        core_profile: true,
        version_major: 4,
        version_minor: 6,
    }
}

/// Creates a [`RenderDevice`] on top of an OpenGL 4.6 context.
pub fn create_device(
    context: Box<dyn GlContext>,
    descriptor: DeviceDescriptor,
) -> anyhow::Result<RenderDevice<Gl46Backend>> {
    let backend = Gl46Backend::new(context, &descriptor)?;
    Ok(RenderDevice::new(backend, descriptor))
}

impl Gl46Backend {
    /// Loads the API through `context` and allocates the indirect draw buffer.
    pub fn new(context: Box<dyn GlContext>, descriptor: &DeviceDescriptor) -> anyhow::Result<Self> {
        loader::load(context.as_ref())?;

        if !gl::CreateBuffers::is_loaded() || !gl::DrawElementsIndirect::is_loaded() {
            let text = "OpenGL 4.6 direct state access is required";
            if let Some(sink) = &descriptor.debug_sink {
                sink(&DebugMessage::new(DebugLevel::Error, text));
            }
            bail!(text);
        }

        let debug = match &descriptor.debug_sink {
            Some(sink) if descriptor.settings.debug_output => {
                DebugHook::install(sink.clone(), descriptor.settings.synchronous_debug_output)
            }
            _ => None,
        };

        let specialize_shader = ext::load_specialize_shader(context.as_ref());
        if specialize_shader.is_none() {
            log::warn!("glSpecializeShader is unavailable; SPIR-V shaders will fail to compile");
        }

        let mut indirect_buffer = 0;
        unsafe {
            gl::CreateBuffers(1, &mut indirect_buffer);
            gl::NamedBufferData(
                indirect_buffer,
                INDIRECT_BUFFER_SIZE as GLsizeiptr,
                std::ptr::null(),
                gl::DYNAMIC_DRAW,
            );
            gl::BindBuffer(gl::DRAW_INDIRECT_BUFFER, indirect_buffer);
        }

        Ok(Self {
            _debug: debug,
            context,
            max_bindings: loader::max_vertex_bindings(),
            max_colors: loader::max_color_attachments(),
            specialize_shader,
            indirect_buffer,
            _not_send: PhantomData,
        })
    }

    fn upload_indirect<T: bytemuck::Pod>(&self, record: &T) {
        let bytes = bytemuck::bytes_of(record);
        unsafe {
            gl::NamedBufferSubData(
                self.indirect_buffer,
                0,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr().cast(),
            );
        }
    }
}

impl Drop for Gl46Backend {
    fn drop(&mut self) {
        unsafe { gl::DeleteBuffers(1, &self.indirect_buffer) };
    }
}

/// GLSL is always accepted; SPIR-V only with a resolved `glSpecializeShader`.
fn shader_formats(spirv: bool) -> [bool; ShaderFormat::COUNT] {
    let mut formats = [false; ShaderFormat::COUNT];
    formats[ShaderFormat::Glsl as usize] = true;
    formats[ShaderFormat::SpirV as usize] = spirv;
    formats
}

fn buffer_ptr(data: &[u8]) -> *const c_void {
    data.as_ptr().cast()
}

impl RenderBackend for Gl46Backend {
    type Handle = GLuint;

    fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            impl_family: ImplFamily::OpenGl,
            impl_version_major: 4,
            impl_version_minor: 6,
            supports_anisotropic: true,
            supports_storage_buffers: true,
            supports_shader_format: shader_formats(self.specialize_shader.is_some()),
        }
    }

    fn max_vertex_bindings(&self) -> u32 {
        self.max_bindings
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_colors
    }

    fn glsl_dialect(&self) -> GlslDialect {
        GlslDialect::Gl46
    }

    // --- Shaders and programs ---

    fn compile_shader(&mut self, stage: ShaderStage, code: ShaderCode<'_>) -> BuildOutput<GLuint> {
        match code {
            ShaderCode::Glsl(source) => program::compile_glsl(stage.into_gl(), source),
            ShaderCode::SpirV(binary) => {
                program::compile_spirv(stage.into_gl(), binary, self.specialize_shader)
            }
        }
    }

    fn delete_shader(&mut self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn link_program(&mut self, shaders: &[GLuint]) -> BuildOutput<GLuint> {
        program::link(shaders)
    }

    fn delete_program(&mut self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    // --- Buffers ---

    fn create_buffer(&mut self, size: usize, data: Option<&[u8]>) -> GLuint {
        let mut buffer = 0;
        unsafe {
            gl::CreateBuffers(1, &mut buffer);
            gl::NamedBufferData(buffer, size as GLsizeiptr, std::ptr::null(), gl::DYNAMIC_DRAW);
            if let Some(data) = data.filter(|data| !data.is_empty()) {
                gl::NamedBufferSubData(buffer, 0, data.len() as GLsizeiptr, buffer_ptr(data));
            }
        }
        buffer
    }

    fn write_buffer(&mut self, buffer: GLuint, offset: usize, data: &[u8]) {
        unsafe {
            gl::NamedBufferSubData(
                buffer,
                offset as isize,
                data.len() as GLsizeiptr,
                buffer_ptr(data),
            );
        }
    }

    fn delete_buffer(&mut self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) };
    }

    // --- Vertex arrays ---

    fn create_vertex_array(&mut self, attribs: &[VertexAttrib]) -> GLuint {
        let mut vertex_array = 0;
        unsafe {
            gl::CreateVertexArrays(1, &mut vertex_array);
            for attrib in attribs {
                gl::EnableVertexArrayAttrib(vertex_array, attrib.id);
                if state::is_integer_attrib(attrib) {
                    gl::VertexArrayAttribIFormat(
                        vertex_array,
                        attrib.id,
                        attrib.count as GLint,
                        attrib.kind.into_gl(),
                        attrib.offset,
                    );
                } else {
                    gl::VertexArrayAttribFormat(
                        vertex_array,
                        attrib.id,
                        attrib.count as GLint,
                        attrib.kind.into_gl(),
                        u8::from(attrib.normalized),
                        attrib.offset,
                    );
                }
                gl::VertexArrayAttribBinding(vertex_array, attrib.id, 0);
            }
        }
        vertex_array
    }

    fn attach_vertex_buffer(&mut self, vertex_array: GLuint, binding: u32, buffer: GLuint, stride: u32) {
        unsafe { gl::VertexArrayVertexBuffer(vertex_array, binding, buffer, 0, stride as GLsizei) };
    }

    fn delete_vertex_array(&mut self, vertex_array: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array) };
    }

    // --- Samplers, textures, framebuffers ---

    fn create_sampler(&mut self, descriptor: &SamplerDescriptor<'_>) -> GLuint {
        let mut sampler = 0;
        unsafe { gl::CreateSamplers(1, &mut sampler) };
        state::apply_sampler(sampler, descriptor, true);
        sampler
    }

    fn delete_sampler(&mut self, sampler: GLuint) {
        unsafe { gl::DeleteSamplers(1, &sampler) };
    }

    fn create_texture(&mut self, descriptor: &TextureDescriptor<'_>) -> GLuint {
        let mut texture = 0;
        let levels = descriptor.level_count() as GLsizei;
        let internal = descriptor.format.into_gl();
        let (width, height) = (descriptor.width as GLsizei, descriptor.height as GLsizei);
        unsafe {
            gl::CreateTextures(descriptor.kind.into_gl(), 1, &mut texture);
            match descriptor.kind {
                TextureKind::D2 | TextureKind::Cube => {
                    gl::TextureStorage2D(texture, levels, internal, width, height);
                }
                TextureKind::Array => gl::TextureStorage3D(
                    texture,
                    levels,
                    internal,
                    width,
                    height,
                    descriptor.depth as GLsizei,
                ),
            }
        }
        texture
    }

    fn write_texture(
        &mut self,
        texture: GLuint,
        kind: TextureKind,
        region: &TextureRegion,
        transfer: TransferFormat,
        data: &[u8],
    ) {
        let (format, component) = transfer.into_gl();
        let (width, height) = (region.width as GLsizei, region.height as GLsizei);
        unsafe {
            match kind {
                TextureKind::D2 => gl::TextureSubImage2D(
                    texture,
                    0,
                    region.x,
                    region.y,
                    width,
                    height,
                    format,
                    component,
                    buffer_ptr(data),
                ),
                // Cube faces are addressed as layers.
                TextureKind::Cube | TextureKind::Array => gl::TextureSubImage3D(
                    texture,
                    0,
                    region.x,
                    region.y,
                    region.z,
                    width,
                    height,
                    region.depth as GLsizei,
                    format,
                    component,
                    buffer_ptr(data),
                ),
            }
        }
    }

    fn delete_texture(&mut self, texture: GLuint) {
        unsafe { gl::DeleteTextures(1, &texture) };
    }

    fn create_framebuffer(&mut self, attachments: &FramebufferAttachments<GLuint>) -> Option<GLuint> {
        let mut framebuffer = 0;
        let status = unsafe {
            gl::CreateFramebuffers(1, &mut framebuffer);
            for &(slot, texture, _) in &attachments.color {
                gl::NamedFramebufferTexture(framebuffer, gl::COLOR_ATTACHMENT0 + slot, texture, 0);
            }
            if let Some((texture, _)) = attachments.depth {
                gl::NamedFramebufferTexture(framebuffer, gl::DEPTH_ATTACHMENT, texture, 0);
            }
            if let Some((texture, _)) = attachments.stencil {
                gl::NamedFramebufferTexture(framebuffer, gl::STENCIL_ATTACHMENT, texture, 0);
            }

            let draw_buffers =
                state::draw_buffer_list(attachments.color.iter().map(|(slot, _, _)| *slot));
            if draw_buffers.is_empty() {
                gl::NamedFramebufferDrawBuffer(framebuffer, gl::NONE);
                gl::NamedFramebufferReadBuffer(framebuffer, gl::NONE);
            } else {
                gl::NamedFramebufferDrawBuffers(
                    framebuffer,
                    draw_buffers.len() as GLsizei,
                    draw_buffers.as_ptr(),
                );
                if let Some(first) = attachments.color.iter().map(|(slot, _, _)| *slot).min() {
                    gl::NamedFramebufferReadBuffer(framebuffer, gl::COLOR_ATTACHMENT0 + first);
                }
            }
            gl::CheckNamedFramebufferStatus(framebuffer, gl::FRAMEBUFFER)
        };

        if status == gl::FRAMEBUFFER_COMPLETE {
            Some(framebuffer)
        } else {
            log::debug!("Framebuffer incomplete: status {status:#x}");
            unsafe { gl::DeleteFramebuffers(1, &framebuffer) };
            None
        }
    }

    fn delete_framebuffer(&mut self, framebuffer: GLuint) {
        unsafe { gl::DeleteFramebuffers(1, &framebuffer) };
    }

    // --- Replay state ---

    fn set_scissor(&mut self, rect: Rect) {
        state::set_scissor(rect);
    }

    fn set_viewport(&mut self, rect: Rect) {
        state::set_viewport(rect);
    }

    fn set_clear_depth(&mut self, depth: f32) {
        state::set_clear_depth(depth);
    }

    fn set_clear_color(&mut self, color: [f32; 4]) {
        state::set_clear_color(color);
    }

    fn clear(&mut self, mask: RenderTargetMask) {
        state::clear(mask);
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        state::set_capability(capability, enabled);
    }

    fn set_blend(&mut self, equation: BlendEquation, src: BlendFactor, dst: BlendFactor) {
        state::set_blend(equation, src, dst);
    }

    fn set_depth_func(&mut self, func: DepthFunc) {
        state::set_depth_func(func);
    }

    fn set_cull(&mut self, face: CullFace, front_face: FrontFace) {
        state::set_cull(face, front_face);
    }

    fn set_fill_mode(&mut self, mode: FillMode) {
        state::set_fill_mode(mode);
    }

    fn use_program(&mut self, program: Option<GLuint>) {
        state::use_program(program);
    }

    fn bind_buffer_base(&mut self, target: BufferBindingTarget, index: u32, buffer: GLuint) {
        state::bind_buffer_base(target, index, buffer);
    }

    fn bind_vertex_array(&mut self, vertex_array: GLuint) {
        state::bind_vertex_array(vertex_array);
    }

    fn set_attrib_binding(&mut self, vertex_array: GLuint, attrib: u32, binding: u32) {
        unsafe { gl::VertexArrayAttribBinding(vertex_array, attrib, binding) };
    }

    fn set_element_buffer(&mut self, vertex_array: GLuint, buffer: Option<GLuint>) {
        unsafe { gl::VertexArrayElementBuffer(vertex_array, buffer.unwrap_or(0)) };
    }

    fn bind_sampler(&mut self, unit: u32, sampler: GLuint) {
        state::bind_sampler(unit, sampler);
    }

    fn bind_texture(&mut self, unit: u32, _kind: TextureKind, texture: GLuint) {
        unsafe { gl::BindTextureUnit(unit, texture) };
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<GLuint>) {
        state::bind_framebuffer(framebuffer);
    }

    fn current_framebuffer(&mut self) -> Option<GLuint> {
        state::current_framebuffer()
    }

    fn blit_framebuffer(&mut self, blit: &FramebufferBlit<GLuint>) {
        let (src, dst) = (blit.source_region, blit.destination_region);
        let filter: GLenum = if blit.filter { gl::LINEAR } else { gl::NEAREST };
        unsafe {
            gl::BlitNamedFramebuffer(
                blit.source.unwrap_or(0),
                blit.destination.unwrap_or(0),
                src.x0,
                src.y0,
                src.x1,
                src.y1,
                dst.x0,
                dst.y0,
                dst.x1,
                dst.y1,
                blit.mask.into_gl(),
                filter,
            );
        }
    }

    fn draw_arrays(&mut self, mode: PrimitiveMode, args: &DrawArgs) {
        self.upload_indirect(&DrawArraysIndirectCommand::from(args));
        unsafe { gl::DrawArraysIndirect(mode.into_gl(), std::ptr::null()) };
    }

    fn draw_elements(
        &mut self,
        mode: PrimitiveMode,
        index_type: IndexType,
        args: &DrawIndexedArgs,
        _byte_offset: usize,
    ) {
        // The record carries the first index in elements.
        self.upload_indirect(&DrawElementsIndirectCommand::from(args));
        unsafe {
            gl::DrawElementsIndirect(mode.into_gl(), index_type.into_gl(), std::ptr::null());
        }
    }

    // --- Frame lifecycle ---

    fn begin_frame(&mut self) {
        state::use_program(None);
        state::bind_vertex_array(0);
        unsafe { gl::BindBuffer(gl::DRAW_INDIRECT_BUFFER, self.indirect_buffer) };
    }

    fn present(&mut self) {
        self.context.swap_buffers();
    }

    fn set_swap_interval(&mut self, interval: i32) {
        self.context.set_swap_interval(interval);
    }
}
