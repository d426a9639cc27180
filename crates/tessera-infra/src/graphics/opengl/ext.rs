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

//! OpenGL 4.6 tokens and entry points missing from the 4.5 `gl` bindings.

use super::GlContext;
use gl::types::{GLchar, GLenum, GLuint};

/// `GL_SHADER_BINARY_FORMAT_SPIR_V` (GL 4.6, ARB_gl_spirv).
pub(crate) const SHADER_BINARY_FORMAT_SPIR_V: GLenum = 0x9551;

/// `GL_TEXTURE_MAX_ANISOTROPY` (GL 4.6, ARB_texture_filter_anisotropic).
pub(crate) const TEXTURE_MAX_ANISOTROPY: GLenum = 0x84FE;

/// Signature of `glSpecializeShader`.
pub(crate) type SpecializeShaderFn = unsafe extern "system" fn(
    shader: GLuint,
    entry_point: *const GLchar,
    constant_count: GLuint,
    constant_indices: *const GLuint,
    constant_values: *const GLuint,
);

const SPECIALIZE_SHADER_SYMBOLS: [&str; 2] = ["glSpecializeShader", "glSpecializeShaderARB"];

/// Resolves `glSpecializeShader` through `context`, falling back to the ARB
/// name. `None` when the driver exposes neither.
pub(crate) fn load_specialize_shader(context: &dyn GlContext) -> Option<SpecializeShaderFn> {
    SPECIALIZE_SHADER_SYMBOLS.iter().find_map(|symbol| {
        let address = context.get_proc_address(symbol);
        if address.is_null() {
            None
        } else {
            // SAFETY: a non-null address for this symbol is the entry point
            // with the signature declared above.
            Some(unsafe {
                std::mem::transmute::<*const std::ffi::c_void, SpecializeShaderFn>(address)
            })
        }
    })
}
