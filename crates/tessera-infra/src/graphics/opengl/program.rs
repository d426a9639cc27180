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

//! Shader compilation and program linking shared by both backends.

use super::ext::{self, SpecializeShaderFn};
use gl::types::{GLchar, GLenum, GLint, GLsizei, GLuint};
use tessera_core::renderer::traits::BuildOutput;

/// Compiles GLSL `source` into a new shader object of type `kind`.
pub(crate) fn compile_glsl(kind: GLenum, source: &str) -> BuildOutput<GLuint> {
    let Ok(length) = GLint::try_from(source.len()) else {
        return BuildOutput::failure("shader source is too large");
    };
    unsafe {
        let shader = gl::CreateShader(kind);
        let ptr = source.as_ptr() as *const GLchar;
        gl::ShaderSource(shader, 1, &ptr, &length);
        gl::CompileShader(shader);
        finish_compile(shader)
    }
}

/// Loads a SPIR-V module and specializes its `main` entry point.
///
/// `specialize` is the resolved `glSpecializeShader`; without it nothing is
/// sent to the driver.
pub(crate) fn compile_spirv(
    kind: GLenum,
    binary: &[u8],
    specialize: Option<SpecializeShaderFn>,
) -> BuildOutput<GLuint> {
    let Some(specialize) = specialize else {
        return BuildOutput::failure("SPIR-V shaders require glSpecializeShader");
    };
    let Ok(length) = GLsizei::try_from(binary.len()) else {
        return BuildOutput::failure("SPIR-V module is too large");
    };
    unsafe {
        let shader = gl::CreateShader(kind);
        gl::ShaderBinary(
            1,
            &shader,
            ext::SHADER_BINARY_FORMAT_SPIR_V,
            binary.as_ptr().cast(),
            length,
        );
        let entry = b"main\0";
        specialize(
            shader,
            entry.as_ptr() as *const GLchar,
            0,
            std::ptr::null(),
            std::ptr::null(),
        );
        finish_compile(shader)
    }
}

unsafe fn finish_compile(shader: GLuint) -> BuildOutput<GLuint> {
    let mut status = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);
    let log = shader_log(shader);
    if status == GLint::from(gl::TRUE) {
        BuildOutput {
            handle: Some(shader),
            log,
        }
    } else {
        gl::DeleteShader(shader);
        BuildOutput::failure(log)
    }
}

/// Links `shaders` into a new program. The shaders are detached afterwards
/// and stay owned by the caller.
pub(crate) fn link(shaders: &[GLuint]) -> BuildOutput<GLuint> {
    unsafe {
        let program = gl::CreateProgram();
        for &shader in shaders {
            gl::AttachShader(program, shader);
        }
        gl::LinkProgram(program);
        for &shader in shaders {
            gl::DetachShader(program, shader);
        }

        let mut status = 0;
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);
        let log = program_log(program);
        if status == GLint::from(gl::TRUE) {
            BuildOutput {
                handle: Some(program),
                log,
            }
        } else {
            gl::DeleteProgram(program);
            BuildOutput::failure(log)
        }
    }
}

unsafe fn shader_log(shader: GLuint) -> String {
    let mut length = 0;
    gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut length);
    read_log(length, |capacity, written, buffer| {
        gl::GetShaderInfoLog(shader, capacity, written, buffer)
    })
}

unsafe fn program_log(program: GLuint) -> String {
    let mut length = 0;
    gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut length);
    read_log(length, |capacity, written, buffer| {
        gl::GetProgramInfoLog(program, capacity, written, buffer)
    })
}

unsafe fn read_log(length: GLint, fetch: impl FnOnce(GLint, *mut GLint, *mut GLchar)) -> String {
    if length <= 0 {
        return String::new();
    }
    let mut buffer = vec![0u8; length as usize];
    let mut written = 0;
    fetch(length, &mut written, buffer.as_mut_ptr() as *mut GLchar);
    buffer.truncate(written.clamp(0, length) as usize);
    String::from_utf8_lossy(&buffer).trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spirv_without_specialize_entry_point_fails_before_any_call() {
        // --- 1. ARRANGE ---
        let module = [0x03, 0x02, 0x23, 0x07, 0, 0, 0, 0];

        // --- 2. ACT ---
        // No function is loaded in unit tests, so reaching the driver would panic.
        let output = compile_spirv(gl::VERTEX_SHADER, &module, None);

        // --- 3. ASSERT ---
        assert!(output.handle.is_none());
        assert!(output.log.contains("glSpecializeShader"));
    }

    #[test]
    fn test_read_log_truncates_to_written_length() {
        let log = unsafe {
            read_log(16, |_, written, buffer| {
                let text = b"0:1: error  ";
                std::ptr::copy_nonoverlapping(text.as_ptr(), buffer as *mut u8, text.len());
                *written = text.len() as GLint;
            })
        };
        assert_eq!(log, "0:1: error");
        assert!(unsafe { read_log(0, |_, _, _| unreachable!()) }.is_empty());
    }
}
