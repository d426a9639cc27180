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

//! Creation, destruction and immediate writes of device resources.

use super::bridge;
use super::entries::{
    BufferEntry, PipelineEntry, RenderTargetEntry, SamplerEntry, ShaderEntry, TextureEntry,
};
use super::RenderDevice;
use crate::renderer::api::*;
use crate::renderer::debug::DebugLevel;
use crate::renderer::error::{PipelineError, ResourceError, ShaderError};
use crate::renderer::traits::{FramebufferAttachments, RenderBackend};
use std::collections::{BTreeMap, BTreeSet};

/// Checks that `size` bytes at `offset` fit in a buffer of `capacity` bytes.
pub(crate) fn check_range(offset: usize, size: usize, capacity: usize) -> Result<(), ResourceError> {
    match offset.checked_add(size) {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(ResourceError::OutOfRange {
            offset,
            size,
            capacity,
        }),
    }
}

fn label_or_unnamed(label: Option<&str>) -> &str {
    label.unwrap_or("Unnamed")
}

impl<B: RenderBackend> RenderDevice<B> {
    // --- Shaders ---

    /// Compiles a single shader stage.
    ///
    /// GLSL sources get the backend dialect's preamble prepended. The
    /// compiler log is forwarded to the debug sink whatever the outcome.
    pub fn create_shader(&mut self, descriptor: &ShaderDescriptor<'_>) -> Result<ShaderId, ResourceError> {
        let label = label_or_unnamed(descriptor.label.as_deref());
        if !self.info.supports(descriptor.format) {
            return Err(ResourceError::InvalidArgument(format!(
                "shader '{label}': format {:?} is not supported by this device",
                descriptor.format
            )));
        }

        let output = match descriptor.format {
            ShaderFormat::Glsl => {
                let source = std::str::from_utf8(&descriptor.code).map_err(|err| {
                    ResourceError::InvalidArgument(format!(
                        "shader '{label}': GLSL source is not valid UTF-8 ({err})"
                    ))
                })?;
                let source = self
                    .backend
                    .glsl_dialect()
                    .preprocess(descriptor.stage, source);
                self.backend
                    .compile_shader(descriptor.stage, ShaderCode::Glsl(&source))
            }
            ShaderFormat::SpirV => {
                if descriptor.code.is_empty() || descriptor.code.len() % 4 != 0 {
                    return Err(ResourceError::InvalidArgument(format!(
                        "shader '{label}': SPIR-V binary length {} is not a non-zero multiple of 4",
                        descriptor.code.len()
                    )));
                }
                self.backend
                    .compile_shader(descriptor.stage, ShaderCode::SpirV(&descriptor.code))
            }
        };

        if !output.log.trim().is_empty() {
            self.emit(DebugLevel::Info, &output.log);
        }
        let handle = output.handle.ok_or_else(|| ShaderError::CompilationFailed {
            label: label.to_owned(),
            details: output.log.clone(),
        })?;

        let id = self.shaders.insert(ShaderEntry {
            handle,
            stage: descriptor.stage,
        });
        log::debug!("Created {:?} shader '{}' with id {:?}", descriptor.stage, label, id);
        Ok(id)
    }

    /// Releases a shader. Pipelines already linked from it are unaffected.
    pub fn destroy_shader(&mut self, id: ShaderId) -> Result<(), ResourceError> {
        let entry = self.shaders.remove(id).ok_or(ResourceError::NotFound)?;
        self.backend.delete_shader(entry.handle);
        Ok(())
    }

    /// The stage of a live shader.
    pub fn shader_stage(&self, id: ShaderId) -> Option<ShaderStage> {
        self.shaders.get(id).map(|entry| entry.stage)
    }

    // --- Pipelines ---

    /// Links a pipeline and wires every live vertex buffer into it.
    pub fn create_pipeline(
        &mut self,
        descriptor: &PipelineDescriptor<'_>,
    ) -> Result<PipelineId, ResourceError> {
        let shaders = descriptor
            .shaders
            .iter()
            .map(|&id| {
                self.shaders
                    .get(id)
                    .map(|entry| entry.handle)
                    .ok_or_else(|| PipelineError::InvalidShader {
                        id,
                        pipeline_label: descriptor.label.as_deref().map(str::to_owned),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self.backend.link_program(&shaders);
        if !output.log.trim().is_empty() {
            self.emit(DebugLevel::Info, &output.log);
        }
        let program = output.handle.ok_or_else(|| PipelineError::LinkFailed {
            label: descriptor.label.as_deref().map(str::to_owned),
            details: output.log.clone(),
        })?;

        let mut entry = PipelineEntry {
            program,
            state: PipelineState::from(descriptor),
            attribs: descriptor.vertex_attribs.to_vec(),
            groups: BTreeMap::new(),
        };
        bridge::vertex_array_group(&mut self.backend, &mut entry.groups, &entry.attribs, 0);
        bridge::on_pipeline_created(&mut self.backend, &mut entry, &self.buffers, self.max_bindings);

        let id = self.pipelines.insert(entry);
        log::debug!(
            "Created pipeline '{}' with id {:?}",
            label_or_unnamed(descriptor.label.as_deref()),
            id
        );
        Ok(id)
    }

    /// Releases a pipeline, its program and all of its vertex arrays.
    pub fn destroy_pipeline(&mut self, id: PipelineId) -> Result<(), ResourceError> {
        let entry = self.pipelines.remove(id).ok_or(ResourceError::NotFound)?;
        for group in entry.groups.into_values() {
            self.backend.delete_vertex_array(group.vertex_array);
        }
        self.backend.delete_program(entry.program);
        Ok(())
    }

    // --- Buffers ---

    /// Allocates a buffer. Non-empty vertex buffers claim a binding slot and
    /// are wired into every live pipeline.
    pub fn create_buffer(&mut self, descriptor: &BufferDescriptor<'_>) -> Result<BufferId, ResourceError> {
        let data = descriptor.data.as_deref();
        if let Some(data) = data {
            if data.len() > descriptor.size {
                return Err(ResourceError::InvalidArgument(format!(
                    "buffer '{}': {} bytes of initial data exceed its size of {} bytes",
                    label_or_unnamed(descriptor.label.as_deref()),
                    data.len(),
                    descriptor.size
                )));
            }
        }

        let handle = self.backend.create_buffer(descriptor.size, data);
        let slot = (descriptor.kind == BufferKind::Vertex && descriptor.size > 0)
            .then(|| self.slots.acquire());
        let entry = BufferEntry {
            handle,
            kind: descriptor.kind,
            size: descriptor.size,
            slot,
        };
        bridge::on_buffer_created(&mut self.backend, &mut self.pipelines, &entry, self.max_bindings);

        let id = self.buffers.insert(entry);
        log::debug!(
            "Created {:?} buffer '{}' ({} bytes) with id {:?}, slot {:?}",
            descriptor.kind,
            label_or_unnamed(descriptor.label.as_deref()),
            descriptor.size,
            id,
            slot
        );
        Ok(id)
    }

    /// Releases a buffer and frees its binding slot.
    pub fn destroy_buffer(&mut self, id: BufferId) -> Result<(), ResourceError> {
        if !self.buffers.contains(id) {
            return Err(ResourceError::NotFound);
        }
        bridge::on_buffer_destroyed(&mut self.pipelines, id);

        let entry = self.buffers.remove(id).ok_or(ResourceError::NotFound)?;
        if let Some(slot) = entry.slot {
            self.slots.release(slot);
        }
        self.backend.delete_buffer(entry.handle);
        Ok(())
    }

    /// Size and kind of a live buffer.
    pub fn buffer_info(&self, id: BufferId) -> Option<(BufferKind, usize)> {
        self.buffers.get(id).map(|entry| (entry.kind, entry.size))
    }

    /// Writes `data` at `offset` immediately. Nothing is written when the
    /// range does not fit.
    pub fn write_buffer(&mut self, id: BufferId, offset: usize, data: &[u8]) -> Result<(), ResourceError> {
        let entry = self.buffers.get(id).ok_or(ResourceError::NotFound)?;
        check_range(offset, data.len(), entry.size)?;
        self.backend.write_buffer(entry.handle, offset, data);
        Ok(())
    }

    /// [`write_buffer`](Self::write_buffer) for a slice of plain values.
    pub fn write_buffer_pod<T: bytemuck::Pod>(
        &mut self,
        id: BufferId,
        offset: usize,
        data: &[T],
    ) -> Result<(), ResourceError> {
        self.write_buffer(id, offset, bytemuck::cast_slice(data))
    }

    // --- Samplers ---

    /// Creates a sampler.
    pub fn create_sampler(&mut self, descriptor: &SamplerDescriptor<'_>) -> Result<SamplerId, ResourceError> {
        if descriptor.min_lod > descriptor.max_lod {
            return Err(ResourceError::InvalidArgument(format!(
                "sampler '{}': min_lod {} exceeds max_lod {}",
                label_or_unnamed(descriptor.label.as_deref()),
                descriptor.min_lod,
                descriptor.max_lod
            )));
        }
        let handle = self.backend.create_sampler(descriptor);
        Ok(self.samplers.insert(SamplerEntry { handle }))
    }

    /// Releases a sampler.
    pub fn destroy_sampler(&mut self, id: SamplerId) -> Result<(), ResourceError> {
        let entry = self.samplers.remove(id).ok_or(ResourceError::NotFound)?;
        self.backend.delete_sampler(entry.handle);
        Ok(())
    }

    // --- Textures ---

    /// Allocates texture storage with `max(1, mip_levels)` levels.
    pub fn create_texture(&mut self, descriptor: &TextureDescriptor<'_>) -> Result<TextureId, ResourceError> {
        let label = label_or_unnamed(descriptor.label.as_deref());
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(ResourceError::InvalidArgument(format!(
                "texture '{label}': dimensions {}x{} must be non-zero",
                descriptor.width, descriptor.height
            )));
        }
        let depth = match descriptor.kind {
            TextureKind::D2 => 1,
            TextureKind::Cube => {
                if descriptor.width != descriptor.height {
                    return Err(ResourceError::InvalidArgument(format!(
                        "texture '{label}': cube faces must be square, got {}x{}",
                        descriptor.width, descriptor.height
                    )));
                }
                6
            }
            TextureKind::Array => {
                if descriptor.depth == 0 {
                    return Err(ResourceError::InvalidArgument(format!(
                        "texture '{label}': array textures need at least one layer"
                    )));
                }
                descriptor.depth
            }
        };

        let handle = self.backend.create_texture(descriptor);
        let id = self.textures.insert(TextureEntry {
            handle,
            kind: descriptor.kind,
            format: descriptor.format,
            width: descriptor.width,
            height: descriptor.height,
            depth,
        });
        log::debug!(
            "Created {:?} texture '{}' ({}x{}x{}, {:?}) with id {:?}",
            descriptor.kind,
            label,
            descriptor.width,
            descriptor.height,
            depth,
            descriptor.format,
            id
        );
        Ok(id)
    }

    /// Releases a texture. Render targets still attached to it keep the
    /// backend's reference semantics.
    pub fn destroy_texture(&mut self, id: TextureId) -> Result<(), ResourceError> {
        let entry = self.textures.remove(id).ok_or(ResourceError::NotFound)?;
        self.backend.delete_texture(entry.handle);
        Ok(())
    }

    /// Uploads a region of a 2D texture.
    #[allow(clippy::too_many_arguments)]
    pub fn write_texture_2d(
        &mut self,
        id: TextureId,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let region = TextureRegion {
            x,
            y,
            z: 0,
            width,
            height,
            depth: 1,
        };
        self.write_texture(id, TextureKind::D2, region, format, data)
    }

    /// Uploads a region of one face (`0..6`) of a cube texture.
    #[allow(clippy::too_many_arguments)]
    pub fn write_texture_cube(
        &mut self,
        id: TextureId,
        face: u32,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        if face >= 6 {
            return Err(ResourceError::InvalidArgument(format!(
                "cube face {face} is out of range 0..6"
            )));
        }
        let region = TextureRegion {
            x,
            y,
            z: face as i32,
            width,
            height,
            depth: 1,
        };
        self.write_texture(id, TextureKind::Cube, region, format, data)
    }

    /// Uploads a box of layers of an array texture.
    #[allow(clippy::too_many_arguments)]
    pub fn write_texture_array(
        &mut self,
        id: TextureId,
        x: i32,
        y: i32,
        z: i32,
        width: u32,
        height: u32,
        depth: u32,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let region = TextureRegion {
            x,
            y,
            z,
            width,
            height,
            depth,
        };
        self.write_texture(id, TextureKind::Array, region, format, data)
    }

    fn write_texture(
        &mut self,
        id: TextureId,
        kind: TextureKind,
        region: TextureRegion,
        format: PixelFormat,
        data: &[u8],
    ) -> Result<(), ResourceError> {
        let entry = self.textures.get(id).ok_or(ResourceError::NotFound)?;
        if entry.kind != kind {
            return Err(ResourceError::InvalidArgument(format!(
                "texture {id:?} is a {:?} texture, not {kind:?}",
                entry.kind
            )));
        }
        let transfer = format.transfer_format().ok_or_else(|| {
            ResourceError::InvalidArgument(format!("pixel format {format:?} cannot be uploaded"))
        })?;

        let fits = |start: i32, len: u32, limit: u32| {
            start >= 0 && (start as u64) + u64::from(len) <= u64::from(limit)
        };
        if !fits(region.x, region.width, entry.width)
            || !fits(region.y, region.height, entry.height)
            || !fits(region.z, region.depth, entry.depth)
        {
            return Err(ResourceError::InvalidArgument(format!(
                "region {region:?} exceeds texture {id:?} of {}x{}x{}",
                entry.width, entry.height, entry.depth
            )));
        }

        let expected = region.texel_count() * transfer.bytes_per_pixel();
        if data.len() < expected {
            return Err(ResourceError::InvalidArgument(format!(
                "texture {id:?}: {} bytes supplied, {expected} needed for {format:?}",
                data.len()
            )));
        }
        if expected == 0 {
            return Ok(());
        }

        self.backend
            .write_texture(entry.handle, kind, &region, transfer, &data[..expected]);
        Ok(())
    }

    // --- Render targets ---

    /// Assembles a framebuffer from live textures.
    ///
    /// Color slots must be distinct and below the backend's
    /// [`max_color_attachments`](RenderBackend::max_color_attachments).
    pub fn create_render_target(
        &mut self,
        descriptor: &RenderTargetDescriptor<'_>,
    ) -> Result<RenderTargetId, ResourceError> {
        let incomplete = || ResourceError::IncompleteAttachment {
            label: descriptor.label.as_deref().map(str::to_owned),
        };
        if descriptor.is_empty() {
            return Err(incomplete());
        }

        let max_colors = self.backend.max_color_attachments();
        let label = label_or_unnamed(descriptor.label.as_deref());
        let mut slots = BTreeSet::new();
        for attachment in descriptor.color_attachments.iter() {
            if attachment.slot >= max_colors {
                return Err(ResourceError::InvalidArgument(format!(
                    "render target '{label}': color slot {} is outside the {max_colors} slots of this device",
                    attachment.slot
                )));
            }
            if !slots.insert(attachment.slot) {
                return Err(ResourceError::InvalidArgument(format!(
                    "render target '{label}': color slot {} is used twice",
                    attachment.slot
                )));
            }
        }

        let resolve = |id: TextureId| {
            self.textures
                .get(id)
                .map(|entry| (entry.handle, entry.format))
                .ok_or(ResourceError::NotFound)
        };
        let mut attachments = FramebufferAttachments {
            color: Vec::with_capacity(descriptor.color_attachments.len()),
            depth: descriptor.depth_attachment.map(resolve).transpose()?,
            stencil: descriptor.stencil_attachment.map(resolve).transpose()?,
        };
        for attachment in descriptor.color_attachments.iter() {
            let (handle, format) = resolve(attachment.texture)?;
            attachments.color.push((attachment.slot, handle, format));
        }

        let handle = self
            .backend
            .create_framebuffer(&attachments)
            .ok_or_else(incomplete)?;
        let id = self.render_targets.insert(RenderTargetEntry { handle });
        log::debug!(
            "Created render target '{}' with id {:?}",
            label_or_unnamed(descriptor.label.as_deref()),
            id
        );
        Ok(id)
    }

    /// Releases a render target. Its textures stay alive.
    pub fn destroy_render_target(&mut self, id: RenderTargetId) -> Result<(), ResourceError> {
        let entry = self.render_targets.remove(id).ok_or(ResourceError::NotFound)?;
        self.backend.delete_framebuffer(entry.handle);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_boundaries() {
        assert!(check_range(0, 16, 16).is_ok());
        assert!(check_range(16, 0, 16).is_ok());
        assert_eq!(
            check_range(8, 9, 16),
            Err(ResourceError::OutOfRange {
                offset: 8,
                size: 9,
                capacity: 16
            })
        );
        assert!(check_range(usize::MAX, 2, 16).is_err());
    }
}
