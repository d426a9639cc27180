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

//! Helpers shared by the device integration tests.

#![allow(dead_code)]

use std::borrow::Cow;
use tessera_core::renderer::{
    BackendCall, BufferDescriptor, BufferId, BufferKind, DeviceDescriptor, DeviceSettings,
    PipelineDescriptor, PipelineId, RecordingBackend, RenderDevice, ShaderDescriptor, ShaderStage,
    VertexAttrib, VertexAttribType,
};

pub const VERTEX_SOURCE: &str = "layout(location = 0) in vec3 a_position;\nvoid main() { gl_Position = vec4(a_position, 1.0); }\n";
pub const FRAGMENT_SOURCE: &str = "out vec4 o_color;\nvoid main() { o_color = vec4(1.0); }\n";

pub type TestDevice = RenderDevice<RecordingBackend>;

pub fn device() -> TestDevice {
    device_with(RecordingBackend::new())
}

pub fn device_with(backend: RecordingBackend) -> TestDevice {
    RenderDevice::new(backend, DeviceDescriptor::new(DeviceSettings::default()))
}

/// A triangle worth of `vec3` positions.
pub fn triangle() -> [[f32; 3]; 3] {
    [[0.0, 0.5, 0.0], [-0.5, -0.5, 0.0], [0.5, -0.5, 0.0]]
}

pub fn vertex_buffer(device: &mut TestDevice) -> BufferId {
    let vertices = triangle();
    device
        .create_buffer(&BufferDescriptor::with_contents(BufferKind::Vertex, &vertices))
        .expect("vertex buffer creation should succeed")
}

/// A pipeline with a single `vec3` position attribute and a 12 byte stride.
pub fn pipeline(device: &mut TestDevice) -> PipelineId {
    pipeline_with(device, PipelineDescriptor::default())
}

/// Fills in shaders, attributes and stride of `descriptor`, then creates it.
pub fn pipeline_with(device: &mut TestDevice, descriptor: PipelineDescriptor<'_>) -> PipelineId {
    let vs = device
        .create_shader(&ShaderDescriptor::glsl(ShaderStage::Vertex, VERTEX_SOURCE))
        .expect("vertex shader should compile");
    let fs = device
        .create_shader(&ShaderDescriptor::glsl(ShaderStage::Fragment, FRAGMENT_SOURCE))
        .expect("fragment shader should compile");
    let descriptor = PipelineDescriptor {
        vertex_stride: 12,
        vertex_attribs: Cow::Owned(vec![VertexAttrib::new(0, VertexAttribType::F32, 3, 0)]),
        shaders: Cow::Owned(vec![vs, fs]),
        ..descriptor
    };
    device
        .create_pipeline(&descriptor)
        .expect("pipeline creation should succeed")
}

/// `(vertex_array, binding)` of every attachment of `buffer` so far.
pub fn attachments_of(device: &TestDevice, buffer: u32) -> Vec<(u32, u32)> {
    device
        .backend()
        .calls()
        .iter()
        .filter_map(|call| match call {
            BackendCall::AttachVertexBuffer {
                vertex_array,
                binding,
                buffer: attached,
                ..
            } if *attached == buffer => Some((*vertex_array, *binding)),
            _ => None,
        })
        .collect()
}
