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

//! Render targets: framebuffers assembled from existing textures.

use super::texture::TextureId;
use std::borrow::Cow;

/// An opaque handle to a render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RenderTargetId(pub usize);

/// A texture attached as color output `slot`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorAttachment {
    /// Color attachment index, as addressed by fragment shader outputs.
    pub slot: u32,
    /// The attached texture.
    pub texture: TextureId,
}

/// A descriptor used to create a [`RenderTargetId`].
///
/// Creation fails atomically with
/// [`ResourceError::IncompleteAttachment`](crate::renderer::ResourceError::IncompleteAttachment)
/// when the attachments do not form a complete framebuffer, including when
/// there are none at all.
#[derive(Debug, Clone, Default)]
pub struct RenderTargetDescriptor<'a> {
    /// An optional debug label.
    pub label: Option<Cow<'a, str>>,
    /// Color attachments with explicit slots.
    pub color_attachments: Cow<'a, [ColorAttachment]>,
    /// Depth attachment.
    pub depth_attachment: Option<TextureId>,
    /// Stencil attachment.
    pub stencil_attachment: Option<TextureId>,
}

impl RenderTargetDescriptor<'_> {
    /// `true` when nothing is attached.
    pub fn is_empty(&self) -> bool {
        self.color_attachments.is_empty()
            && self.depth_attachment.is_none()
            && self.stencil_attachment.is_none()
    }
}
