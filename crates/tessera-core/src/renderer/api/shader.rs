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

//! Shader descriptors and GLSL preprocessing.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// An opaque handle to a compiled shader stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShaderId(pub usize);

/// The pipeline stage a shader runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderStage {
    /// Per-vertex stage.
    Vertex,
    /// Per-fragment stage.
    Fragment,
}

/// The encoding of shader code handed to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderFormat {
    /// A SPIR-V binary module with a `main` entry point.
    SpirV = 0,
    /// GLSL source text, without a `#version` line.
    Glsl = 1,
}

impl ShaderFormat {
    /// Number of shader formats, the length of the capability bitmap.
    pub const COUNT: usize = 2;
}

/// A descriptor used to create a shader.
#[derive(Debug, Clone)]
pub struct ShaderDescriptor<'a> {
    /// An optional debug label, used in error messages.
    pub label: Option<Cow<'a, str>>,
    /// Stage of the shader.
    pub stage: ShaderStage,
    /// Encoding of `code`.
    pub format: ShaderFormat,
    /// GLSL text as UTF-8 bytes, or a SPIR-V binary.
    pub code: Cow<'a, [u8]>,
}

impl<'a> ShaderDescriptor<'a> {
    /// A GLSL shader. The source must not start with a `#version` line; the
    /// device prepends one matching its dialect.
    pub fn glsl(stage: ShaderStage, source: &'a str) -> Self {
        Self {
            label: None,
            stage,
            format: ShaderFormat::Glsl,
            code: Cow::Borrowed(source.as_bytes()),
        }
    }

    /// A SPIR-V shader.
    pub fn spirv(stage: ShaderStage, binary: &'a [u8]) -> Self {
        Self {
            label: None,
            stage,
            format: ShaderFormat::SpirV,
            code: Cow::Borrowed(binary),
        }
    }

    /// Sets the debug label.
    pub fn with_label(mut self, label: impl Into<Cow<'a, str>>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Code handed to a backend compiler after preprocessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderCode<'a> {
    /// Complete GLSL source, preamble included.
    Glsl(&'a str),
    /// A SPIR-V binary.
    SpirV(&'a [u8]),
}

/// The GLSL flavour a backend compiles, which fixes the injected preamble.
///
/// The macro names are part of the shader-facing contract: shaders written
/// for one dialect use them to tell which stage they are compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlslDialect {
    /// `#version 330 core` with `_UVRE_`, `_VERTEX_SHADER_`/`_FRAGMENT_SHADER_` and `_GLSL_`.
    Gl33,
    /// `#version 460 core` with `UVRE_SOURCE` and `VERTEX_SHADER`/`FRAGMENT_SHADER`.
    Gl46,
}

impl GlslDialect {
    /// The lines prepended to every source of `stage`.
    pub fn preamble(self, stage: ShaderStage) -> &'static str {
        match (self, stage) {
            (GlslDialect::Gl33, ShaderStage::Vertex) => {
                "#version 330 core\n#define _UVRE_ 1\n#define _VERTEX_SHADER_ 1\n#define _GLSL_ 1\n"
            }
            (GlslDialect::Gl33, ShaderStage::Fragment) => {
                "#version 330 core\n#define _UVRE_ 1\n#define _FRAGMENT_SHADER_ 1\n#define _GLSL_ 1\n"
            }
            (GlslDialect::Gl46, ShaderStage::Vertex) => {
                "#version 460 core\n#define UVRE_SOURCE 1\n#define VERTEX_SHADER 1\n"
            }
            (GlslDialect::Gl46, ShaderStage::Fragment) => {
                "#version 460 core\n#define UVRE_SOURCE 1\n#define FRAGMENT_SHADER 1\n"
            }
        }
    }

    /// Prepends the stage preamble to `source`.
    pub fn preprocess(self, stage: ShaderStage, source: &str) -> String {
        let preamble = self.preamble(stage);
        let mut out = String::with_capacity(preamble.len() + source.len());
        out.push_str(preamble);
        out.push_str(source);
        out
    }
}
