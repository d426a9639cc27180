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

//! Defines data structures for textures, their pixel formats and samplers.

use super::util::SamplerFlags;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// An opaque handle to a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextureId(pub usize);

/// An opaque handle to a sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SamplerId(pub usize);

/// The shape of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureKind {
    /// A single 2D image.
    #[default]
    D2,
    /// Six square 2D faces.
    Cube,
    /// A stack of `depth` 2D layers.
    Array,
}

/// Storage format of texture texels.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    R8Unorm,
    R8Sint,
    R8Uint,
    R8G8Unorm,
    R8G8Sint,
    R8G8Uint,
    R8G8B8Unorm,
    R8G8B8Sint,
    R8G8B8Uint,
    #[default]
    R8G8B8A8Unorm,
    R8G8B8A8Sint,
    R8G8B8A8Uint,
    R16Unorm,
    R16Sint,
    R16Uint,
    R16Float,
    R16G16Unorm,
    R16G16Sint,
    R16G16Uint,
    R16G16Float,
    R16G16B16Unorm,
    R16G16B16Sint,
    R16G16B16Uint,
    R16G16B16Float,
    R16G16B16A16Unorm,
    R16G16B16A16Sint,
    R16G16B16A16Uint,
    R16G16B16A16Float,
    R32Sint,
    R32Uint,
    R32Float,
    R32G32Sint,
    R32G32Uint,
    R32G32Float,
    R32G32B32Sint,
    R32G32B32Uint,
    R32G32B32Float,
    R32G32B32A32Sint,
    R32G32B32A32Uint,
    R32G32B32A32Float,
    D16Unorm,
    D32Float,
    S8Uint,
}

/// Channel layout of client pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferChannels {
    /// One channel.
    R,
    /// Two channels.
    Rg,
    /// Three channels.
    Rgb,
    /// Four channels.
    Rgba,
}

impl TransferChannels {
    /// Number of channels.
    pub const fn count(self) -> usize {
        match self {
            TransferChannels::R => 1,
            TransferChannels::Rg => 2,
            TransferChannels::Rgb => 3,
            TransferChannels::Rgba => 4,
        }
    }
}

/// Component type of client pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferComponent {
    /// Signed 8-bit.
    I8,
    /// Unsigned 8-bit.
    U8,
    /// Signed 16-bit.
    I16,
    /// Unsigned 16-bit.
    U16,
    /// IEEE half float.
    F16,
    /// Signed 32-bit.
    I32,
    /// Unsigned 32-bit.
    U32,
    /// IEEE single float.
    F32,
}

impl TransferComponent {
    /// Size of one component in bytes.
    pub const fn size(self) -> usize {
        match self {
            TransferComponent::I8 | TransferComponent::U8 => 1,
            TransferComponent::I16 | TransferComponent::U16 | TransferComponent::F16 => 2,
            TransferComponent::I32 | TransferComponent::U32 | TransferComponent::F32 => 4,
        }
    }
}

/// How client memory is laid out when uploading into a texture of some [`PixelFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferFormat {
    /// Channel layout.
    pub channels: TransferChannels,
    /// Component type.
    pub component: TransferComponent,
    /// Components are read as integers rather than normalised or float values.
    pub integer: bool,
}

impl TransferFormat {
    /// Size of one texel of client data in bytes.
    pub const fn bytes_per_pixel(self) -> usize {
        self.channels.count() * self.component.size()
    }
}

impl PixelFormat {
    /// The client-side layout used to upload texels of this format.
    ///
    /// Depth and stencil formats return `None`: they cannot be written with
    /// the texture upload operations.
    pub fn transfer_format(self) -> Option<TransferFormat> {
        use PixelFormat::*;
        use TransferChannels as C;
        use TransferComponent as T;

        let (channels, component, integer) = match self {
            R8Unorm => (C::R, T::U8, false),
            R8Sint => (C::R, T::I8, true),
            R8Uint => (C::R, T::U8, true),
            R8G8Unorm => (C::Rg, T::U8, false),
            R8G8Sint => (C::Rg, T::I8, true),
            R8G8Uint => (C::Rg, T::U8, true),
            R8G8B8Unorm => (C::Rgb, T::U8, false),
            R8G8B8Sint => (C::Rgb, T::I8, true),
            R8G8B8Uint => (C::Rgb, T::U8, true),
            R8G8B8A8Unorm => (C::Rgba, T::U8, false),
            R8G8B8A8Sint => (C::Rgba, T::I8, true),
            R8G8B8A8Uint => (C::Rgba, T::U8, true),
            R16Unorm => (C::R, T::U16, false),
            R16Sint => (C::R, T::I16, true),
            R16Uint => (C::R, T::U16, true),
            R16Float => (C::R, T::F16, false),
            R16G16Unorm => (C::Rg, T::U16, false),
            R16G16Sint => (C::Rg, T::I16, true),
            R16G16Uint => (C::Rg, T::U16, true),
            R16G16Float => (C::Rg, T::F16, false),
            R16G16B16Unorm => (C::Rgb, T::U16, false),
            R16G16B16Sint => (C::Rgb, T::I16, true),
            R16G16B16Uint => (C::Rgb, T::U16, true),
            R16G16B16Float => (C::Rgb, T::F16, false),
            R16G16B16A16Unorm => (C::Rgba, T::U16, false),
            R16G16B16A16Sint => (C::Rgba, T::I16, true),
            R16G16B16A16Uint => (C::Rgba, T::U16, true),
            R16G16B16A16Float => (C::Rgba, T::F16, false),
            R32Sint => (C::R, T::I32, true),
            R32Uint => (C::R, T::U32, true),
            R32Float => (C::R, T::F32, false),
            R32G32Sint => (C::Rg, T::I32, true),
            R32G32Uint => (C::Rg, T::U32, true),
            R32G32Float => (C::Rg, T::F32, false),
            R32G32B32Sint => (C::Rgb, T::I32, true),
            R32G32B32Uint => (C::Rgb, T::U32, true),
            R32G32B32Float => (C::Rgb, T::F32, false),
            R32G32B32A32Sint => (C::Rgba, T::I32, true),
            R32G32B32A32Uint => (C::Rgba, T::U32, true),
            R32G32B32A32Float => (C::Rgba, T::F32, false),
            D16Unorm | D32Float | S8Uint => return None,
        };

        Some(TransferFormat {
            channels,
            component,
            integer,
        })
    }

    /// Whether the format stores depth values.
    pub fn is_depth(self) -> bool {
        matches!(self, PixelFormat::D16Unorm | PixelFormat::D32Float)
    }

    /// Whether the format stores stencil values.
    pub fn is_stencil(self) -> bool {
        matches!(self, PixelFormat::S8Uint)
    }
}

/// A descriptor used to create a [`TextureId`].
#[derive(Debug, Clone, Default)]
pub struct TextureDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Shape of the texture.
    pub kind: TextureKind,
    /// Texel format.
    pub format: PixelFormat,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Layer count of array textures; ignored otherwise.
    pub depth: u32,
    /// Number of mip levels; zero is treated as one.
    pub mip_levels: u32,
}

impl TextureDescriptor<'_> {
    /// Mip level count actually allocated.
    pub fn level_count(&self) -> u32 {
        self.mip_levels.max(1)
    }
}

/// A box of texels targeted by an upload.
///
/// For cube textures `z` selects the face, for array textures the first layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TextureRegion {
    /// Left texel.
    pub x: i32,
    /// Bottom texel.
    pub y: i32,
    /// Face or first layer.
    pub z: i32,
    /// Width in texels.
    pub width: u32,
    /// Height in texels.
    pub height: u32,
    /// Face count (always 1 for cubes) or layer count.
    pub depth: u32,
}

impl TextureRegion {
    /// Number of texels covered.
    pub fn texel_count(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }
}

/// A descriptor used to create a [`SamplerId`].
#[derive(Debug, Clone)]
pub struct SamplerDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Wrapping and filtering flags.
    pub flags: SamplerFlags,
    /// Maximum anisotropy, used with [`SamplerFlags::FILTER_ANISO`].
    pub aniso_level: f32,
    /// Lowest accessible level of detail.
    pub min_lod: f32,
    /// Highest accessible level of detail.
    pub max_lod: f32,
    /// Bias added to the computed level of detail.
    pub lod_bias: f32,
}

impl Default for SamplerDescriptor<'_> {
    fn default() -> Self {
        Self {
            label: None,
            flags: SamplerFlags::EMPTY,
            aniso_level: 0.0,
            min_lod: -1000.0,
            max_lod: 1000.0,
            lod_bias: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_depth_and_stencil_have_no_transfer_format() {
        assert!(PixelFormat::D16Unorm.transfer_format().is_none());
        assert!(PixelFormat::D32Float.transfer_format().is_none());
        assert!(PixelFormat::S8Uint.transfer_format().is_none());
    }

    #[test]
    fn test_transfer_format_sizes() {
        let rgba8 = PixelFormat::R8G8B8A8Unorm.transfer_format().unwrap();
        assert_eq!(rgba8.channels, TransferChannels::Rgba);
        assert_eq!(rgba8.component, TransferComponent::U8);
        assert!(!rgba8.integer);
        assert_eq!(rgba8.bytes_per_pixel(), 4);

        let rg16i = PixelFormat::R16G16Sint.transfer_format().unwrap();
        assert_eq!(rg16i.component, TransferComponent::I16);
        assert!(rg16i.integer);
        assert_eq!(rg16i.bytes_per_pixel(), 4);

        let rgb32f = PixelFormat::R32G32B32Float.transfer_format().unwrap();
        assert_eq!(rgb32f.bytes_per_pixel(), 12);
    }

    #[test]
    fn test_sampler_defaults() {
        let desc = SamplerDescriptor::default();
        assert!(desc.flags.is_empty());
        assert_relative_eq!(desc.min_lod, -1000.0);
        assert_relative_eq!(desc.max_lod, 1000.0);
        assert_relative_eq!(desc.lod_bias, 0.0);
        assert_relative_eq!(desc.aniso_level, 0.0);
    }

    #[test]
    fn test_zero_mip_levels_means_one() {
        let desc = TextureDescriptor {
            width: 4,
            height: 4,
            ..Default::default()
        };
        assert_eq!(desc.level_count(), 1);
        let region = TextureRegion {
            width: 4,
            height: 2,
            depth: 3,
            ..Default::default()
        };
        assert_eq!(region.texel_count(), 24);
    }
}
