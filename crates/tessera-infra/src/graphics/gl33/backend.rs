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

use crate::graphics::opengl::conversions::{allocation_format, IntoGl};
use crate::graphics::opengl::debug::DebugHook;
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

/// Drives an OpenGL 3.3 core context.
pub struct Gl33Backend {
    // Unregisters its callback before the context goes away.
    _debug: Option<DebugHook>,
    context: Box<dyn GlContext>,
    max_bindings: u32,
    max_colors: u32,
    // The context is current on the creating thread only.
    _not_send: PhantomData<*const ()>,
}

/// Context requirements of this backend, for the windowing layer.
pub fn poll_impl_info() -> ImplInfo {
    ImplInfo {
        family: ImplFamily::OpenGl,
        core_profile: true,
        version_major: 3,
        version_minor: 3,
    }
}

/// Creates a [`RenderDevice`] on top of an OpenGL 3.3 context.
pub fn create_device(
    context: Box<dyn GlContext>,
    descriptor: DeviceDescriptor,
) -> anyhow::Result<RenderDevice<Gl33Backend>> {
    let backend = Gl33Backend::new(context, &descriptor)?;
    Ok(RenderDevice::new(backend, descriptor))
}

impl Gl33Backend {
    /// Loads the API through `context` and checks the required extensions.
    pub fn new(context: Box<dyn GlContext>, descriptor: &DeviceDescriptor) -> anyhow::Result<Self> {
        loader::load(context.as_ref())?;

        let has_attrib_binding = gl::VertexAttribFormat::is_loaded()
            && gl::VertexAttribIFormat::is_loaded()
            && gl::VertexAttribBinding::is_loaded()
            && gl::BindVertexBuffer::is_loaded();
        if !has_attrib_binding {
            let text = "GL_ARB_vertex_attrib_binding is required";
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

        Ok(Self {
            _debug: debug,
            context,
            max_bindings: loader::max_vertex_bindings(),
            max_colors: loader::max_color_attachments(),
            _not_send: PhantomData,
        })
    }

    fn with_vertex_array(&self, vertex_array: GLuint, edit: impl FnOnce()) {
        let previous = loader::get_integer(gl::VERTEX_ARRAY_BINDING) as GLuint;
        unsafe { gl::BindVertexArray(vertex_array) };
        edit();
        unsafe { gl::BindVertexArray(previous) };
    }

    fn with_texture(&self, kind: TextureKind, texture: GLuint, edit: impl FnOnce(GLenum)) {
        let query = match kind {
            TextureKind::D2 => gl::TEXTURE_BINDING_2D,
            TextureKind::Cube => gl::TEXTURE_BINDING_CUBE_MAP,
            TextureKind::Array => gl::TEXTURE_BINDING_2D_ARRAY,
        };
        let target = kind.into_gl();
        let previous = loader::get_integer(query) as GLuint;
        unsafe { gl::BindTexture(target, texture) };
        edit(target);
        unsafe { gl::BindTexture(target, previous) };
    }
}

fn buffer_ptr(data: &[u8]) -> *const c_void {
    data.as_ptr().cast()
}

impl RenderBackend for Gl33Backend {
    type Handle = GLuint;

    fn device_info(&self) -> DeviceInfo {
        let mut supports_shader_format = [false; ShaderFormat::COUNT];
        supports_shader_format[ShaderFormat::Glsl as usize] = true;
        DeviceInfo {
            impl_family: ImplFamily::OpenGl,
            impl_version_major: 3,
            impl_version_minor: 3,
            supports_anisotropic: false,
            supports_storage_buffers: false,
            supports_shader_format,
        }
    }

    fn max_vertex_bindings(&self) -> u32 {
        self.max_bindings
    }

    fn max_color_attachments(&self) -> u32 {
        self.max_colors
    }

    fn glsl_dialect(&self) -> GlslDialect {
        GlslDialect::Gl33
    }

    // --- Shaders and programs ---

    fn compile_shader(&mut self, stage: ShaderStage, code: ShaderCode<'_>) -> BuildOutput<GLuint> {
        match code {
            ShaderCode::Glsl(source) => program::compile_glsl(stage.into_gl(), source),
            ShaderCode::SpirV(_) => BuildOutput::failure("SPIR-V is not available on OpenGL 3.3"),
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
            gl::GenBuffers(1, &mut buffer);
            gl::BindBuffer(gl::COPY_WRITE_BUFFER, buffer);
            gl::BufferData(
                gl::COPY_WRITE_BUFFER,
                size as GLsizeiptr,
                std::ptr::null(),
                gl::DYNAMIC_DRAW,
            );
            if let Some(data) = data.filter(|data| !data.is_empty()) {
                gl::BufferSubData(
                    gl::COPY_WRITE_BUFFER,
                    0,
                    data.len() as GLsizeiptr,
                    buffer_ptr(data),
                );
            }
            gl::BindBuffer(gl::COPY_WRITE_BUFFER, 0);
        }
        buffer
    }

    fn write_buffer(&mut self, buffer: GLuint, offset: usize, data: &[u8]) {
        unsafe {
            gl::BindBuffer(gl::COPY_WRITE_BUFFER, buffer);
            gl::BufferSubData(
                gl::COPY_WRITE_BUFFER,
                offset as isize,
                data.len() as GLsizeiptr,
                buffer_ptr(data),
            );
            gl::BindBuffer(gl::COPY_WRITE_BUFFER, 0);
        }
    }

    fn delete_buffer(&mut self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) };
    }

    // --- Vertex arrays ---

    fn create_vertex_array(&mut self, attribs: &[VertexAttrib]) -> GLuint {
        let mut vertex_array = 0;
        unsafe { gl::GenVertexArrays(1, &mut vertex_array) };
        self.with_vertex_array(vertex_array, || unsafe {
            for attrib in attribs {
                gl::EnableVertexAttribArray(attrib.id);
                if state::is_integer_attrib(attrib) {
                    gl::VertexAttribIFormat(
                        attrib.id,
                        attrib.count as GLint,
                        attrib.kind.into_gl(),
                        attrib.offset,
                    );
                } else {
                    gl::VertexAttribFormat(
                        attrib.id,
                        attrib.count as GLint,
                        attrib.kind.into_gl(),
                        u8::from(attrib.normalized),
                        attrib.offset,
                    );
                }
                gl::VertexAttribBinding(attrib.id, 0);
            }
        });
        vertex_array
    }

    fn attach_vertex_buffer(&mut self, vertex_array: GLuint, binding: u32, buffer: GLuint, stride: u32) {
        self.with_vertex_array(vertex_array, || unsafe {
            gl::BindVertexBuffer(binding, buffer, 0, stride as GLsizei);
        });
    }

    fn delete_vertex_array(&mut self, vertex_array: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vertex_array) };
    }

    // --- Samplers, textures, framebuffers ---

    fn create_sampler(&mut self, descriptor: &SamplerDescriptor<'_>) -> GLuint {
        let mut sampler = 0;
        unsafe { gl::GenSamplers(1, &mut sampler) };
        state::apply_sampler(sampler, descriptor, false);
        sampler
    }

    fn delete_sampler(&mut self, sampler: GLuint) {
        unsafe { gl::DeleteSamplers(1, &sampler) };
    }

    fn create_texture(&mut self, descriptor: &TextureDescriptor<'_>) -> GLuint {
        let mut texture = 0;
        unsafe { gl::GenTextures(1, &mut texture) };

        let levels = descriptor.level_count();
        let internal = descriptor.format.into_gl() as GLint;
        let (format, kind) = allocation_format(descriptor.format);
        self.with_texture(descriptor.kind, texture, |target| unsafe {
            gl::TexParameteri(target, gl::TEXTURE_BASE_LEVEL, 0);
            gl::TexParameteri(target, gl::TEXTURE_MAX_LEVEL, levels as GLint - 1);
            for level in 0..levels {
                let width = (descriptor.width >> level).max(1) as GLsizei;
                let height = (descriptor.height >> level).max(1) as GLsizei;
                let level = level as GLint;
                match descriptor.kind {
                    TextureKind::D2 => gl::TexImage2D(
                        target,
                        level,
                        internal,
                        width,
                        height,
                        0,
                        format,
                        kind,
                        std::ptr::null(),
                    ),
                    TextureKind::Cube => {
                        for face in 0..6 {
                            gl::TexImage2D(
                                gl::TEXTURE_CUBE_MAP_POSITIVE_X + face,
                                level,
                                internal,
                                width,
                                height,
                                0,
                                format,
                                kind,
                                std::ptr::null(),
                            );
                        }
                    }
                    TextureKind::Array => gl::TexImage3D(
                        target,
                        level,
                        internal,
                        width,
                        height,
                        descriptor.depth as GLsizei,
                        0,
                        format,
                        kind,
                        std::ptr::null(),
                    ),
                }
            }
        });
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
        self.with_texture(kind, texture, |target| unsafe {
            match kind {
                TextureKind::D2 => gl::TexSubImage2D(
                    target,
                    0,
                    region.x,
                    region.y,
                    width,
                    height,
                    format,
                    component,
                    buffer_ptr(data),
                ),
                TextureKind::Cube => gl::TexSubImage2D(
                    gl::TEXTURE_CUBE_MAP_POSITIVE_X + region.z as GLenum,
                    0,
                    region.x,
                    region.y,
                    width,
                    height,
                    format,
                    component,
                    buffer_ptr(data),
                ),
                TextureKind::Array => gl::TexSubImage3D(
                    target,
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
        });
    }

    fn delete_texture(&mut self, texture: GLuint) {
        unsafe { gl::DeleteTextures(1, &texture) };
    }

    fn create_framebuffer(&mut self, attachments: &FramebufferAttachments<GLuint>) -> Option<GLuint> {
        let previous = state::current_framebuffer();
        let mut framebuffer = 0;
        let status = unsafe {
            gl::GenFramebuffers(1, &mut framebuffer);
            gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer);
            for &(slot, texture, _) in &attachments.color {
                gl::FramebufferTexture(gl::FRAMEBUFFER, gl::COLOR_ATTACHMENT0 + slot, texture, 0);
            }
            if let Some((texture, _)) = attachments.depth {
                gl::FramebufferTexture(gl::FRAMEBUFFER, gl::DEPTH_ATTACHMENT, texture, 0);
            }
            if let Some((texture, _)) = attachments.stencil {
                gl::FramebufferTexture(gl::FRAMEBUFFER, gl::STENCIL_ATTACHMENT, texture, 0);
            }

            let draw_buffers =
                state::draw_buffer_list(attachments.color.iter().map(|(slot, _, _)| *slot));
            if draw_buffers.is_empty() {
                gl::DrawBuffer(gl::NONE);
                gl::ReadBuffer(gl::NONE);
            } else {
                gl::DrawBuffers(draw_buffers.len() as GLsizei, draw_buffers.as_ptr());
                if let Some(first) = attachments.color.iter().map(|(slot, _, _)| *slot).min() {
                    gl::ReadBuffer(gl::COLOR_ATTACHMENT0 + first);
                }
            }
            gl::CheckFramebufferStatus(gl::FRAMEBUFFER)
        };
        state::bind_framebuffer(previous);

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

    fn set_attrib_binding(&mut self, _vertex_array: GLuint, attrib: u32, binding: u32) {
        unsafe { gl::VertexAttribBinding(attrib, binding) };
    }

    fn set_element_buffer(&mut self, _vertex_array: GLuint, buffer: Option<GLuint>) {
        unsafe { gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, buffer.unwrap_or(0)) };
    }

    fn bind_sampler(&mut self, unit: u32, sampler: GLuint) {
        state::bind_sampler(unit, sampler);
    }

    fn bind_texture(&mut self, unit: u32, kind: TextureKind, texture: GLuint) {
        state::bind_texture(unit, kind, texture);
    }

    fn bind_framebuffer(&mut self, framebuffer: Option<GLuint>) {
        state::bind_framebuffer(framebuffer);
    }

    fn current_framebuffer(&mut self) -> Option<GLuint> {
        state::current_framebuffer()
    }

    fn blit_framebuffer(&mut self, blit: &FramebufferBlit<GLuint>) {
        let (src, dst) = (blit.source_region, blit.destination_region);
        let filter = if blit.filter { gl::LINEAR } else { gl::NEAREST };
        unsafe {
            gl::BindFramebuffer(gl::READ_FRAMEBUFFER, blit.source.unwrap_or(0));
            gl::BindFramebuffer(gl::DRAW_FRAMEBUFFER, blit.destination.unwrap_or(0));
            gl::BlitFramebuffer(
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
        let mode = mode.into_gl();
        unsafe {
            if args.base_instance != 0 && gl::DrawArraysInstancedBaseInstance::is_loaded() {
                gl::DrawArraysInstancedBaseInstance(
                    mode,
                    args.base_vertex as GLint,
                    args.vertices as GLsizei,
                    args.instances as GLsizei,
                    args.base_instance,
                );
            } else {
                gl::DrawArraysInstanced(
                    mode,
                    args.base_vertex as GLint,
                    args.vertices as GLsizei,
                    args.instances as GLsizei,
                );
            }
        }
    }

    fn draw_elements(
        &mut self,
        mode: PrimitiveMode,
        index_type: IndexType,
        args: &DrawIndexedArgs,
        byte_offset: usize,
    ) {
        let mode = mode.into_gl();
        let indices = byte_offset as *const c_void;
        unsafe {
            if args.base_instance != 0
                && gl::DrawElementsInstancedBaseVertexBaseInstance::is_loaded()
            {
                gl::DrawElementsInstancedBaseVertexBaseInstance(
                    mode,
                    args.indices as GLsizei,
                    index_type.into_gl(),
                    indices,
                    args.instances as GLsizei,
                    args.base_vertex,
                    args.base_instance,
                );
            } else {
                gl::DrawElementsInstancedBaseVertex(
                    mode,
                    args.indices as GLsizei,
                    index_type.into_gl(),
                    indices,
                    args.instances as GLsizei,
                    args.base_vertex,
                );
            }
        }
    }

    // --- Frame lifecycle ---

    fn begin_frame(&mut self) {
        state::use_program(None);
        state::bind_vertex_array(0);
    }

    fn present(&mut self) {
        self.context.swap_buffers();
    }

    fn set_swap_interval(&mut self, interval: i32) {
        self.context.set_swap_interval(interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impl_info_requests_core_33() {
        let info = poll_impl_info();
        assert_eq!(info.family, ImplFamily::OpenGl);
        assert!(info.core_profile);
        assert_eq!((info.version_major, info.version_minor), (3, 3));
    }
}
