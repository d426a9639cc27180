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

//! Pipeline state: fixed-function configuration, vertex layout and shaders.

use super::shader::ShaderId;
use super::util::CullFlags;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// An opaque handle to a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PipelineId(pub usize);

/// Width of the elements of an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IndexType {
    /// 16-bit indices.
    #[default]
    U16,
    /// 32-bit indices.
    U32,
}

impl IndexType {
    /// Size of one index in bytes.
    pub const fn size(self) -> usize {
        match self {
            IndexType::U16 => 2,
            IndexType::U32 => 4,
        }
    }
}

/// Primitive topology used by draws.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineStrip,
    LineLoop,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum VertexAttribType {
    /// 32-bit float.
    #[default]
    F32,
    /// Signed 32-bit integer, read as an integer by the shader.
    I32,
    /// Unsigned 32-bit integer, read as an integer by the shader.
    U32,
}

impl VertexAttribType {
    /// Integer attributes are declared with the integer format entry point and
    /// are never normalised.
    pub const fn is_integer(self) -> bool {
        matches!(self, VertexAttribType::I32 | VertexAttribType::U32)
    }
}

/// One attribute of the vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct VertexAttrib {
    /// Attribute location in the vertex shader.
    pub id: u32,
    /// Component type.
    pub kind: VertexAttribType,
    /// Number of components, 1 to 4.
    pub count: u32,
    /// Byte offset inside one vertex.
    pub offset: u32,
    /// Map integer data to `[0, 1]`/`[-1, 1]` (float attributes only).
    pub normalized: bool,
}

impl VertexAttrib {
    /// Creates a non-normalised attribute.
    pub const fn new(id: u32, kind: VertexAttribType, count: u32, offset: u32) -> Self {
        Self {
            id,
            kind,
            count,
            offset,
            normalized: false,
        }
    }
}

/// Blend equation.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendEquation {
    #[default]
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

/// Blend factor.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BlendFactor {
    Zero,
    #[default]
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstColor,
    OneMinusDstColor,
    DstAlpha,
    OneMinusDstAlpha,
}

/// Depth comparison function.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DepthFunc {
    Never,
    Always,
    Equal,
    NotEqual,
    #[default]
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

/// Polygon rasterisation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FillMode {
    /// Filled polygons.
    #[default]
    Filled,
    /// Polygon vertices only.
    Points,
    /// Polygon edges only.
    Wireframe,
}

/// Which faces are discarded when culling is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullFace {
    /// Front faces.
    Front,
    /// Back faces.
    Back,
    /// Both; only points and lines are drawn.
    FrontAndBack,
}

/// Winding order of front faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontFace {
    /// Clockwise.
    Clockwise,
    /// Counter-clockwise.
    CounterClockwise,
}

/// Color blending state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlendState {
    /// Blending is applied.
    pub enabled: bool,
    /// How source and destination are combined.
    pub equation: BlendEquation,
    /// Factor applied to the incoming color.
    pub src_factor: BlendFactor,
    /// Factor applied to the stored color.
    pub dst_factor: BlendFactor,
}

impl BlendState {
    /// Classic `src * a + dst * (1 - a)` alpha blending.
    pub const ALPHA: Self = Self {
        enabled: true,
        equation: BlendEquation::Add,
        src_factor: BlendFactor::SrcAlpha,
        dst_factor: BlendFactor::OneMinusSrcAlpha,
    };
}

/// Depth-test state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DepthState {
    /// Depth testing is applied.
    pub enabled: bool,
    /// Comparison against the stored depth.
    pub func: DepthFunc,
}

/// Face-culling state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CullState {
    /// Culling is applied.
    pub enabled: bool,
    /// Winding and culled faces.
    pub flags: CullFlags,
}

impl CullState {
    /// The culled face: both when `FRONT | BACK`, back when neither flag is set.
    pub fn cull_face(&self) -> CullFace {
        let front = self.flags.contains(CullFlags::FRONT);
        let back = self.flags.contains(CullFlags::BACK);
        match (front, back) {
            (true, true) => CullFace::FrontAndBack,
            (true, false) => CullFace::Front,
            _ => CullFace::Back,
        }
    }

    /// Front-face winding.
    pub fn front_face(&self) -> FrontFace {
        if self.flags.contains(CullFlags::CLOCKWISE) {
            FrontFace::Clockwise
        } else {
            FrontFace::CounterClockwise
        }
    }
}

/// A descriptor used to create a [`PipelineId`].
#[derive(Debug, Clone, Default)]
pub struct PipelineDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Blending state.
    pub blending: BlendState,
    /// Depth-test state.
    pub depth_testing: DepthState,
    /// Face-culling state.
    pub face_culling: CullState,
    /// Enables the scissor test while the pipeline is bound.
    pub scissor_test: bool,
    /// Type of the indices used by indexed draws.
    pub index_type: IndexType,
    /// Topology of draws.
    pub primitive_mode: PrimitiveMode,
    /// Polygon rasterisation mode.
    pub fill_mode: FillMode,
    /// Distance between consecutive vertices in bytes.
    pub vertex_stride: u32,
    /// Vertex layout.
    pub vertex_attribs: Cow<'a, [VertexAttrib]>,
    /// Stages linked into the pipeline program.
    pub shaders: Cow<'a, [ShaderId]>,
}

/// The fixed-function part of a pipeline, kept by the device after creation
/// and applied at every pipeline bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PipelineState {
    /// Blending state.
    pub blending: BlendState,
    /// Depth-test state.
    pub depth_testing: DepthState,
    /// Face-culling state.
    pub face_culling: CullState,
    /// Scissor test enable.
    pub scissor_test: bool,
    /// Index type of indexed draws.
    pub index_type: IndexType,
    /// Topology of draws.
    pub primitive_mode: PrimitiveMode,
    /// Polygon rasterisation mode.
    pub fill_mode: FillMode,
    /// Vertex stride in bytes.
    pub vertex_stride: u32,
}

impl From<&PipelineDescriptor<'_>> for PipelineState {
    fn from(desc: &PipelineDescriptor<'_>) -> Self {
        Self {
            blending: desc.blending,
            depth_testing: desc.depth_testing,
            face_culling: desc.face_culling,
            scissor_test: desc.scissor_test,
            index_type: desc.index_type,
            primitive_mode: desc.primitive_mode,
            fill_mode: desc.fill_mode,
            vertex_stride: desc.vertex_stride,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cull(flags: CullFlags) -> CullState {
        CullState {
            enabled: true,
            flags,
        }
    }

    #[test]
    fn test_cull_face_resolution() {
        assert_eq!(cull(CullFlags::EMPTY).cull_face(), CullFace::Back);
        assert_eq!(cull(CullFlags::BACK).cull_face(), CullFace::Back);
        assert_eq!(cull(CullFlags::FRONT).cull_face(), CullFace::Front);
        assert_eq!(
            cull(CullFlags::FRONT | CullFlags::BACK).cull_face(),
            CullFace::FrontAndBack
        );
    }

    #[test]
    fn test_front_face_winding() {
        assert_eq!(
            cull(CullFlags::BACK).front_face(),
            FrontFace::CounterClockwise
        );
        assert_eq!(
            cull(CullFlags::CLOCKWISE | CullFlags::BACK).front_face(),
            FrontFace::Clockwise
        );
    }

    #[test]
    fn test_index_sizes_and_integer_attribs() {
        assert_eq!(IndexType::U16.size(), 2);
        assert_eq!(IndexType::U32.size(), 4);
        assert!(VertexAttribType::U32.is_integer());
        assert!(!VertexAttribType::F32.is_integer());
    }
}
