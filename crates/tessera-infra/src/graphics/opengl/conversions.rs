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

//! Translation of tessera enums and flags into OpenGL enumerants.

use gl::types::{GLbitfield, GLenum};
use tessera_core::renderer::traits::{BufferBindingTarget, Capability};
use tessera_core::renderer::{
    BlendEquation, BlendFactor, CullFace, DepthFunc, FillMode, FrontFace, IndexType, PixelFormat,
    PrimitiveMode, RenderTargetMask, ShaderStage, TextureKind, TransferChannels,
    TransferComponent, TransferFormat, VertexAttribType,
};

/// A local extension trait to convert tessera types into OpenGL values.
/// This avoids Rust's orphan rules while keeping an idiomatic `.into_gl()` syntax.
pub trait IntoGl<T> {
    /// Consumes self and converts it into an OpenGL value.
    fn into_gl(self) -> T;
}

// --- Pipeline state ---

impl IntoGl<GLenum> for PrimitiveMode {
    fn into_gl(self) -> GLenum {
        match self {
            PrimitiveMode::Points => gl::POINTS,
            PrimitiveMode::Lines => gl::LINES,
            PrimitiveMode::LineStrip => gl::LINE_STRIP,
            PrimitiveMode::LineLoop => gl::LINE_LOOP,
            PrimitiveMode::Triangles => gl::TRIANGLES,
            PrimitiveMode::TriangleStrip => gl::TRIANGLE_STRIP,
            PrimitiveMode::TriangleFan => gl::TRIANGLE_FAN,
        }
    }
}

impl IntoGl<GLenum> for IndexType {
    fn into_gl(self) -> GLenum {
        match self {
            IndexType::U16 => gl::UNSIGNED_SHORT,
            IndexType::U32 => gl::UNSIGNED_INT,
        }
    }
}

impl IntoGl<GLenum> for VertexAttribType {
    fn into_gl(self) -> GLenum {
        match self {
            VertexAttribType::F32 => gl::FLOAT,
            VertexAttribType::I32 => gl::INT,
            VertexAttribType::U32 => gl::UNSIGNED_INT,
        }
    }
}

impl IntoGl<GLenum> for BlendEquation {
    fn into_gl(self) -> GLenum {
        match self {
            BlendEquation::Add => gl::FUNC_ADD,
            BlendEquation::Subtract => gl::FUNC_SUBTRACT,
            BlendEquation::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
            BlendEquation::Min => gl::MIN,
            BlendEquation::Max => gl::MAX,
        }
    }
}

impl IntoGl<GLenum> for BlendFactor {
    fn into_gl(self) -> GLenum {
        match self {
            BlendFactor::Zero => gl::ZERO,
            BlendFactor::One => gl::ONE,
            BlendFactor::SrcColor => gl::SRC_COLOR,
            BlendFactor::OneMinusSrcColor => gl::ONE_MINUS_SRC_COLOR,
            BlendFactor::SrcAlpha => gl::SRC_ALPHA,
            BlendFactor::OneMinusSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
            BlendFactor::DstColor => gl::DST_COLOR,
            BlendFactor::OneMinusDstColor => gl::ONE_MINUS_DST_COLOR,
            BlendFactor::DstAlpha => gl::DST_ALPHA,
            BlendFactor::OneMinusDstAlpha => gl::ONE_MINUS_DST_ALPHA,
        }
    }
}

impl IntoGl<GLenum> for DepthFunc {
    fn into_gl(self) -> GLenum {
        match self {
            DepthFunc::Never => gl::NEVER,
            DepthFunc::Always => gl::ALWAYS,
            DepthFunc::Equal => gl::EQUAL,
            DepthFunc::NotEqual => gl::NOTEQUAL,
            DepthFunc::Less => gl::LESS,
            DepthFunc::LessOrEqual => gl::LEQUAL,
            DepthFunc::Greater => gl::GREATER,
            DepthFunc::GreaterOrEqual => gl::GEQUAL,
        }
    }
}

impl IntoGl<GLenum> for FillMode {
    fn into_gl(self) -> GLenum {
        match self {
            FillMode::Filled => gl::FILL,
            FillMode::Points => gl::POINT,
            FillMode::Wireframe => gl::LINE,
        }
    }
}

impl IntoGl<GLenum> for CullFace {
    fn into_gl(self) -> GLenum {
        match self {
            CullFace::Front => gl::FRONT,
            CullFace::Back => gl::BACK,
            CullFace::FrontAndBack => gl::FRONT_AND_BACK,
        }
    }
}

impl IntoGl<GLenum> for FrontFace {
    fn into_gl(self) -> GLenum {
        match self {
            FrontFace::Clockwise => gl::CW,
            FrontFace::CounterClockwise => gl::CCW,
        }
    }
}

impl IntoGl<GLenum> for Capability {
    fn into_gl(self) -> GLenum {
        match self {
            Capability::Blend => gl::BLEND,
            Capability::DepthTest => gl::DEPTH_TEST,
            Capability::CullFace => gl::CULL_FACE,
            Capability::ScissorTest => gl::SCISSOR_TEST,
        }
    }
}

// --- Resources ---

impl IntoGl<GLenum> for ShaderStage {
    fn into_gl(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl IntoGl<GLenum> for BufferBindingTarget {
    fn into_gl(self) -> GLenum {
        match self {
            BufferBindingTarget::Uniform => gl::UNIFORM_BUFFER,
            BufferBindingTarget::Storage => gl::SHADER_STORAGE_BUFFER,
        }
    }
}

impl IntoGl<GLenum> for TextureKind {
    fn into_gl(self) -> GLenum {
        match self {
            TextureKind::D2 => gl::TEXTURE_2D,
            TextureKind::Cube => gl::TEXTURE_CUBE_MAP,
            TextureKind::Array => gl::TEXTURE_2D_ARRAY,
        }
    }
}

impl IntoGl<GLbitfield> for RenderTargetMask {
    fn into_gl(self) -> GLbitfield {
        let mut bits = 0;
        if self.contains(RenderTargetMask::COLOR) {
            bits |= gl::COLOR_BUFFER_BIT;
        }
        if self.contains(RenderTargetMask::DEPTH) {
            bits |= gl::DEPTH_BUFFER_BIT;
        }
        if self.contains(RenderTargetMask::STENCIL) {
            bits |= gl::STENCIL_BUFFER_BIT;
        }
        bits
    }
}

/// Sized internal format of a texture.
impl IntoGl<GLenum> for PixelFormat {
    fn into_gl(self) -> GLenum {
        use PixelFormat::*;
        match self {
            R8Unorm => gl::R8,
            R8Sint => gl::R8I,
            R8Uint => gl::R8UI,
            R8G8Unorm => gl::RG8,
            R8G8Sint => gl::RG8I,
            R8G8Uint => gl::RG8UI,
            R8G8B8Unorm => gl::RGB8,
            R8G8B8Sint => gl::RGB8I,
            R8G8B8Uint => gl::RGB8UI,
            R8G8B8A8Unorm => gl::RGBA8,
            R8G8B8A8Sint => gl::RGBA8I,
            R8G8B8A8Uint => gl::RGBA8UI,
            R16Unorm => gl::R16,
            R16Sint => gl::R16I,
            R16Uint => gl::R16UI,
            R16Float => gl::R16F,
            R16G16Unorm => gl::RG16,
            R16G16Sint => gl::RG16I,
            R16G16Uint => gl::RG16UI,
            R16G16Float => gl::RG16F,
            R16G16B16Unorm => gl::RGB16,
            R16G16B16Sint => gl::RGB16I,
            R16G16B16Uint => gl::RGB16UI,
            R16G16B16Float => gl::RGB16F,
            R16G16B16A16Unorm => gl::RGBA16,
            R16G16B16A16Sint => gl::RGBA16I,
            R16G16B16A16Uint => gl::RGBA16UI,
            R16G16B16A16Float => gl::RGBA16F,
            R32Sint => gl::R32I,
            R32Uint => gl::R32UI,
            R32Float => gl::R32F,
            R32G32Sint => gl::RG32I,
            R32G32Uint => gl::RG32UI,
            R32G32Float => gl::RG32F,
            R32G32B32Sint => gl::RGB32I,
            R32G32B32Uint => gl::RGB32UI,
            R32G32B32Float => gl::RGB32F,
            R32G32B32A32Sint => gl::RGBA32I,
            R32G32B32A32Uint => gl::RGBA32UI,
            R32G32B32A32Float => gl::RGBA32F,
            D16Unorm => gl::DEPTH_COMPONENT16,
            D32Float => gl::DEPTH_COMPONENT32F,
            S8Uint => gl::STENCIL_INDEX8,
        }
    }
}

/// `(format, type)` pair describing client pixel data.
impl IntoGl<(GLenum, GLenum)> for TransferFormat {
    fn into_gl(self) -> (GLenum, GLenum) {
        let format = match (self.channels, self.integer) {
            (TransferChannels::R, false) => gl::RED,
            (TransferChannels::R, true) => gl::RED_INTEGER,
            (TransferChannels::Rg, false) => gl::RG,
            (TransferChannels::Rg, true) => gl::RG_INTEGER,
            (TransferChannels::Rgb, false) => gl::RGB,
            (TransferChannels::Rgb, true) => gl::RGB_INTEGER,
            (TransferChannels::Rgba, false) => gl::RGBA,
            (TransferChannels::Rgba, true) => gl::RGBA_INTEGER,
        };
        let kind = match self.component {
            TransferComponent::I8 => gl::BYTE,
            TransferComponent::U8 => gl::UNSIGNED_BYTE,
            TransferComponent::I16 => gl::SHORT,
            TransferComponent::U16 => gl::UNSIGNED_SHORT,
            TransferComponent::F16 => gl::HALF_FLOAT,
            TransferComponent::I32 => gl::INT,
            TransferComponent::U32 => gl::UNSIGNED_INT,
            TransferComponent::F32 => gl::FLOAT,
        };
        (format, kind)
    }
}

/// Client format and type used when allocating storage without data.
pub fn allocation_format(format: PixelFormat) -> (GLenum, GLenum) {
    match format {
        PixelFormat::D16Unorm => (gl::DEPTH_COMPONENT, gl::UNSIGNED_SHORT),
        PixelFormat::D32Float => (gl::DEPTH_COMPONENT, gl::FLOAT),
        PixelFormat::S8Uint => (gl::STENCIL_INDEX, gl::UNSIGNED_BYTE),
        other => other
            .transfer_format()
            .map(|transfer| transfer.into_gl())
            .unwrap_or((gl::RGBA, gl::UNSIGNED_BYTE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_formats_use_integer_transfer() {
        let transfer = PixelFormat::R32G32Uint.transfer_format().unwrap();
        assert_eq!(transfer.into_gl(), (gl::RG_INTEGER, gl::UNSIGNED_INT));

        let transfer = PixelFormat::R8G8B8A8Unorm.transfer_format().unwrap();
        assert_eq!(transfer.into_gl(), (gl::RGBA, gl::UNSIGNED_BYTE));
    }

    #[test]
    fn test_half_float_formats_transfer_as_half_float() {
        let transfer = PixelFormat::R16Float.transfer_format().unwrap();
        assert_eq!(transfer.into_gl(), (gl::RED, gl::HALF_FLOAT));
        assert_eq!(PixelFormat::R16Float.into_gl(), gl::R16F);
    }

    #[test]
    fn test_depth_and_stencil_allocation() {
        assert_eq!(PixelFormat::D32Float.into_gl(), gl::DEPTH_COMPONENT32F);
        assert_eq!(
            allocation_format(PixelFormat::D16Unorm),
            (gl::DEPTH_COMPONENT, gl::UNSIGNED_SHORT)
        );
        assert_eq!(
            allocation_format(PixelFormat::S8Uint),
            (gl::STENCIL_INDEX, gl::UNSIGNED_BYTE)
        );
    }

    #[test]
    fn test_clear_mask_bits() {
        let mask = RenderTargetMask::COLOR | RenderTargetMask::STENCIL;
        assert_eq!(mask.into_gl(), gl::COLOR_BUFFER_BIT | gl::STENCIL_BUFFER_BIT);
        assert_eq!(RenderTargetMask::EMPTY.into_gl(), 0);
    }

    #[test]
    fn test_fixed_function_tables() {
        assert_eq!(DepthFunc::LessOrEqual.into_gl(), gl::LEQUAL);
        assert_eq!(FillMode::Wireframe.into_gl(), gl::LINE);
        assert_eq!(CullFace::FrontAndBack.into_gl(), gl::FRONT_AND_BACK);
        assert_eq!(IndexType::U16.into_gl(), gl::UNSIGNED_SHORT);
        assert_eq!(PrimitiveMode::TriangleFan.into_gl(), gl::TRIANGLE_FAN);
    }
}
