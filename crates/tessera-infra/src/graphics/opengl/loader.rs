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

//! Function loading and driver queries.

use super::GlContext;
use anyhow::bail;
use gl::types::{GLenum, GLint};
use std::ffi::CStr;

/// Makes `context` current, resolves every entry point through it and logs
/// what the driver reports about itself.
pub(crate) fn load(context: &dyn GlContext) -> anyhow::Result<()> {
    context.make_current();
    gl::load_with(|symbol| context.get_proc_address(symbol));

    if !gl::GetString::is_loaded() || !gl::GetIntegerv::is_loaded() {
        bail!("OpenGL entry points could not be resolved through the context");
    }

    let vendor = get_string(gl::VENDOR);
    let renderer = get_string(gl::RENDERER);
    let version = get_string(gl::VERSION);
    log::info!("OpenGL driver: {vendor} | {renderer} | {version}");
    log::debug!("GLSL version: {}", get_string(gl::SHADING_LANGUAGE_VERSION));

    // Texel rows are tightly packed in every upload.
    unsafe { gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1) };
    Ok(())
}

/// Reads a driver string, or an empty string when unavailable.
pub(crate) fn get_string(name: GLenum) -> String {
    let ptr = unsafe { gl::GetString(name) };
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: the driver returns a static NUL-terminated string.
    unsafe { CStr::from_ptr(ptr.cast()) }
        .to_string_lossy()
        .trim()
        .to_owned()
}

/// Reads a single integer parameter.
pub(crate) fn get_integer(name: GLenum) -> GLint {
    let mut value = 0;
    unsafe { gl::GetIntegerv(name, &mut value) };
    value
}

/// Binding points per vertex array, clamped to at least one.
pub(crate) fn max_vertex_bindings() -> u32 {
    positive_limit(gl::MAX_VERTEX_ATTRIB_BINDINGS)
}

/// Color attachments per framebuffer, clamped to at least one.
pub(crate) fn max_color_attachments() -> u32 {
    positive_limit(gl::MAX_COLOR_ATTACHMENTS)
}

fn positive_limit(name: GLenum) -> u32 {
    u32::try_from(get_integer(name)).unwrap_or(0).max(1)
}
