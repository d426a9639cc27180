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

//! Replay-state calls whose OpenGL form does not differ between versions.

use super::conversions::IntoGl;
use super::ext;
use gl::types::{GLenum, GLint, GLuint};
use tessera_core::renderer::traits::{BufferBindingTarget, Capability};
use tessera_core::renderer::{
    BlendEquation, BlendFactor, CullFace, DepthFunc, FillMode, FrontFace, Rect, RenderTargetMask,
    SamplerDescriptor, SamplerFlags, TextureKind, VertexAttrib,
};

pub(crate) fn set_scissor(rect: Rect) {
    unsafe { gl::Scissor(rect.x, rect.y, rect.width, rect.height) };
}

pub(crate) fn set_viewport(rect: Rect) {
    unsafe { gl::Viewport(rect.x, rect.y, rect.width, rect.height) };
}

pub(crate) fn set_clear_depth(depth: f32) {
    unsafe { gl::ClearDepth(f64::from(depth)) };
}

pub(crate) fn set_clear_color(color: [f32; 4]) {
    unsafe { gl::ClearColor(color[0], color[1], color[2], color[3]) };
}

pub(crate) fn clear(mask: RenderTargetMask) {
    let bits = mask.into_gl();
    if bits != 0 {
        unsafe { gl::Clear(bits) };
    }
}

pub(crate) fn set_capability(capability: Capability, enabled: bool) {
    let cap = capability.into_gl();
    unsafe {
        if enabled {
            gl::Enable(cap);
        } else {
            gl::Disable(cap);
        }
    }
}

pub(crate) fn set_blend(equation: BlendEquation, src: BlendFactor, dst: BlendFactor) {
    unsafe {
        gl::BlendEquation(equation.into_gl());
        gl::BlendFunc(src.into_gl(), dst.into_gl());
    }
}

pub(crate) fn set_depth_func(func: DepthFunc) {
    unsafe { gl::DepthFunc(func.into_gl()) };
}

pub(crate) fn set_cull(face: CullFace, front_face: FrontFace) {
    unsafe {
        gl::CullFace(face.into_gl());
        gl::FrontFace(front_face.into_gl());
    }
}

pub(crate) fn set_fill_mode(mode: FillMode) {
    unsafe { gl::PolygonMode(gl::FRONT_AND_BACK, mode.into_gl()) };
}

pub(crate) fn use_program(program: Option<GLuint>) {
    unsafe { gl::UseProgram(program.unwrap_or(0)) };
}

pub(crate) fn bind_buffer_base(target: BufferBindingTarget, index: u32, buffer: GLuint) {
    unsafe { gl::BindBufferBase(target.into_gl(), index, buffer) };
}

pub(crate) fn bind_vertex_array(vertex_array: GLuint) {
    unsafe { gl::BindVertexArray(vertex_array) };
}

pub(crate) fn bind_sampler(unit: u32, sampler: GLuint) {
    unsafe { gl::BindSampler(unit, sampler) };
}

pub(crate) fn bind_framebuffer(framebuffer: Option<GLuint>) {
    unsafe { gl::BindFramebuffer(gl::FRAMEBUFFER, framebuffer.unwrap_or(0)) };
}

pub(crate) fn current_framebuffer() -> Option<GLuint> {
    let mut name: GLint = 0;
    unsafe { gl::GetIntegerv(gl::DRAW_FRAMEBUFFER_BINDING, &mut name) };
    match name {
        0 => None,
        name => GLuint::try_from(name).ok(),
    }
}

fn wrap_mode(flags: SamplerFlags, clamp: SamplerFlags) -> GLint {
    if flags.contains(clamp) {
        gl::CLAMP_TO_EDGE as GLint
    } else {
        gl::REPEAT as GLint
    }
}

/// Writes every parameter of `descriptor` into `sampler`.
///
/// The anisotropy level is only applied when `anisotropic` is set and the
/// descriptor asks for both `FILTER` and `FILTER_ANISO`.
pub(crate) fn apply_sampler(sampler: GLuint, descriptor: &SamplerDescriptor<'_>, anisotropic: bool) {
    let flags = descriptor.flags;
    let filtered = flags.contains(SamplerFlags::FILTER);
    let (min_filter, mag_filter): (GLenum, GLenum) = if filtered {
        (gl::LINEAR, gl::LINEAR)
    } else {
        (gl::NEAREST, gl::NEAREST)
    };

    unsafe {
        gl::SamplerParameteri(sampler, gl::TEXTURE_WRAP_S, wrap_mode(flags, SamplerFlags::CLAMP_S));
        gl::SamplerParameteri(sampler, gl::TEXTURE_WRAP_T, wrap_mode(flags, SamplerFlags::CLAMP_T));
        gl::SamplerParameteri(sampler, gl::TEXTURE_WRAP_R, wrap_mode(flags, SamplerFlags::CLAMP_R));
        gl::SamplerParameteri(sampler, gl::TEXTURE_MIN_FILTER, min_filter as GLint);
        gl::SamplerParameteri(sampler, gl::TEXTURE_MAG_FILTER, mag_filter as GLint);
        gl::SamplerParameterf(sampler, gl::TEXTURE_MIN_LOD, descriptor.min_lod);
        gl::SamplerParameterf(sampler, gl::TEXTURE_MAX_LOD, descriptor.max_lod);
        gl::SamplerParameterf(sampler, gl::TEXTURE_LOD_BIAS, descriptor.lod_bias);

        if let Some(level) = anisotropy_level(descriptor, anisotropic) {
            gl::SamplerParameterf(sampler, ext::TEXTURE_MAX_ANISOTROPY, level);
        }
    }
}

/// Anisotropy level to program into a sampler, if any.
pub(crate) fn anisotropy_level(descriptor: &SamplerDescriptor<'_>, supported: bool) -> Option<f32> {
    let wanted = descriptor
        .flags
        .contains(SamplerFlags::FILTER | SamplerFlags::FILTER_ANISO);
    (supported && wanted).then(|| descriptor.aniso_level.max(1.0))
}

/// Whether the attribute reaches the shader as integers rather than floats.
pub(crate) fn is_integer_attrib(attrib: &VertexAttrib) -> bool {
    attrib.kind.is_integer() && !attrib.normalized
}

pub(crate) fn bind_texture(unit: u32, kind: TextureKind, texture: GLuint) {
    unsafe {
        gl::ActiveTexture(gl::TEXTURE0 + unit);
        gl::BindTexture(kind.into_gl(), texture);
    }
}

/// `glDrawBuffers` list routing fragment output `n` to color attachment `n`.
pub(crate) fn draw_buffer_list(slots: impl Iterator<Item = u32>) -> Vec<GLenum> {
    let slots: Vec<u32> = slots.collect();
    let count = slots.iter().max().map_or(0, |max| *max as usize + 1);
    let mut list = vec![gl::NONE; count];
    for slot in slots {
        list[slot as usize] = gl::COLOR_ATTACHMENT0 + slot;
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::renderer::VertexAttribType;

    #[test]
    fn test_draw_buffer_list_leaves_gaps() {
        let list = draw_buffer_list([2, 0].into_iter());
        assert_eq!(list, vec![gl::COLOR_ATTACHMENT0, gl::NONE, gl::COLOR_ATTACHMENT2]);
        assert!(draw_buffer_list(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_anisotropy_needs_support_and_both_flags() {
        let mut descriptor = SamplerDescriptor {
            flags: SamplerFlags::FILTER | SamplerFlags::FILTER_ANISO,
            aniso_level: 8.0,
            ..Default::default()
        };
        assert_eq!(anisotropy_level(&descriptor, true), Some(8.0));
        assert_eq!(anisotropy_level(&descriptor, false), None);

        descriptor.aniso_level = 0.0;
        assert_eq!(anisotropy_level(&descriptor, true), Some(1.0));

        descriptor.flags = SamplerFlags::FILTER_ANISO;
        assert_eq!(anisotropy_level(&descriptor, true), None);
    }

    #[test]
    fn test_normalized_integer_attributes_read_as_float() {
        let mut attrib = VertexAttrib::new(0, VertexAttribType::U32, 4, 0);
        assert!(is_integer_attrib(&attrib));
        attrib.normalized = true;
        assert!(!is_integer_attrib(&attrib));
        assert!(!is_integer_attrib(&VertexAttrib::new(1, VertexAttribType::F32, 2, 0)));
    }
}
