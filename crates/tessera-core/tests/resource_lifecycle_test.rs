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

mod common;

use std::borrow::Cow;
use std::sync::{Arc, Mutex};
use tessera_core::renderer::{
    BackendCall, BufferDescriptor, BufferKind, ColorAttachment, DebugLevel, DebugMessage,
    DebugSink, DeviceDescriptor, DeviceSettings, FrameState, PipelineDescriptor, PipelineError,
    PixelFormat, RecordingBackend, RenderDevice, RenderTargetDescriptor, ResourceCounts,
    ResourceError, SamplerDescriptor, ShaderDescriptor, ShaderError, ShaderId, ShaderStage,
    TextureDescriptor, TextureId, TextureKind,
};

type Captured = Arc<Mutex<Vec<(DebugLevel, String)>>>;

fn capturing_sink() -> (DebugSink, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let writer = Arc::clone(&captured);
    let sink: DebugSink = Arc::new(move |message: &DebugMessage<'_>| {
        writer
            .lock()
            .unwrap()
            .push((message.level, message.text.to_owned()));
    });
    (sink, captured)
}

fn texture(device: &mut common::TestDevice, kind: TextureKind, format: PixelFormat) -> TextureId {
    device
        .create_texture(&TextureDescriptor {
            kind,
            format,
            width: 4,
            height: 4,
            depth: 2,
            ..Default::default()
        })
        .unwrap()
}

// --- Shaders and pipelines ---

#[test]
fn test_glsl_gets_dialect_preamble() {
    let mut device = common::device();
    device
        .create_shader(&ShaderDescriptor::glsl(ShaderStage::Vertex, common::VERTEX_SOURCE))
        .unwrap();

    let Some(BackendCall::CompileShader {
        glsl: Some(source), ..
    }) = device.backend().calls().first()
    else {
        panic!("expected a GLSL compile call");
    };
    assert!(source.starts_with(
        "#version 330 core\n#define _UVRE_ 1\n#define _VERTEX_SHADER_ 1\n#define _GLSL_ 1\n"
    ));
    assert!(source.ends_with(common::VERTEX_SOURCE));
}

#[test]
fn test_unsupported_shader_format_is_rejected_before_the_backend() {
    let mut device = common::device();
    let words = [0x0723_0203u32, 0x0001_0000];
    let result = device.create_shader(&ShaderDescriptor::spirv(
        ShaderStage::Vertex,
        bytemuck::cast_slice(&words),
    ));

    assert!(matches!(result, Err(ResourceError::InvalidArgument(_))));
    assert!(device.backend().calls().is_empty());
    assert_eq!(device.resource_counts(), ResourceCounts::default());
}

#[test]
fn test_compile_failure_forwards_log_and_registers_nothing() {
    // --- 1. ARRANGE ---
    let (sink, captured) = capturing_sink();
    let mut device = RenderDevice::new(
        RecordingBackend::new(),
        DeviceDescriptor::new(DeviceSettings::default()).with_debug_sink(sink),
    );

    // --- 2. ACT ---
    let result = device.create_shader(
        &ShaderDescriptor::glsl(ShaderStage::Fragment, "#error broken\n").with_label("broken.frag"),
    );

    // --- 3. ASSERT ---
    match result {
        Err(ResourceError::Shader(ShaderError::CompilationFailed { label, details })) => {
            assert_eq!(label, "broken.frag");
            assert!(details.contains("#error"));
        }
        other => panic!("expected a compilation failure, got {other:?}"),
    }
    assert_eq!(device.resource_counts().shaders, 0);
    let captured = captured.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].0, DebugLevel::Info);
}

#[test]
fn test_pipeline_with_unknown_shader_fails() {
    let mut device = common::device();
    let descriptor = PipelineDescriptor {
        label: Some("ghost".into()),
        shaders: Cow::Owned(vec![ShaderId(42)]),
        ..Default::default()
    };

    let result = device.create_pipeline(&descriptor);
    assert_eq!(
        result,
        Err(ResourceError::Pipeline(PipelineError::InvalidShader {
            id: ShaderId(42),
            pipeline_label: Some("ghost".to_owned()),
        }))
    );
    assert!(device.backend().calls().is_empty());
}

#[test]
fn test_link_failure_registers_nothing() {
    let mut device = common::device();
    let result = device.create_pipeline(&PipelineDescriptor::default());

    assert!(matches!(
        result,
        Err(ResourceError::Pipeline(PipelineError::LinkFailed { .. }))
    ));
    assert_eq!(device.resource_counts().pipelines, 0);
    assert!(!device
        .backend()
        .calls()
        .iter()
        .any(|call| matches!(call, BackendCall::CreateVertexArray { .. })));
}

#[test]
fn test_pipeline_creates_group_zero_with_its_attributes() {
    let mut device = common::device();
    let pipeline = common::pipeline(&mut device);

    assert_eq!(device.pipeline_vertex_arrays(pipeline), Some(vec![0]));
    let attribs = device
        .backend()
        .calls()
        .iter()
        .find_map(|call| match call {
            BackendCall::CreateVertexArray { attribs, .. } => Some(attribs.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(attribs.len(), 1);
    assert_eq!(attribs[0].count, 3);
}

// --- Buffers ---

#[test]
fn test_initial_data_larger_than_buffer_is_rejected() {
    let mut device = common::device();
    let oversized = [0u8; 16];
    let descriptor = BufferDescriptor {
        data: Some(Cow::Borrowed(&oversized[..])),
        ..BufferDescriptor::new(BufferKind::Vertex, 8)
    };

    assert!(matches!(
        device.create_buffer(&descriptor),
        Err(ResourceError::InvalidArgument(_))
    ));
    assert_eq!(device.slot_allocator().high_water(), 0);
    assert!(device.backend().calls().is_empty());
}

#[test]
fn test_out_of_range_write_leaves_buffer_untouched() {
    let mut device = common::device();
    let buffer = device
        .create_buffer(&BufferDescriptor::with_contents(BufferKind::Data, &[7u8; 12]))
        .unwrap();
    let handle = device.raw_buffer(buffer).unwrap();

    let result = device.write_buffer(buffer, 8, &[1u8; 16]);

    assert_eq!(
        result,
        Err(ResourceError::OutOfRange {
            offset: 8,
            size: 16,
            capacity: 12
        })
    );
    assert_eq!(device.backend().buffer_contents(handle), Some(&[7u8; 12][..]));
}

#[test]
fn test_write_buffer_pod_writes_native_bytes() {
    let mut device = common::device();
    let buffer = device
        .create_buffer(&BufferDescriptor::new(BufferKind::Index, 8))
        .unwrap();
    let handle = device.raw_buffer(buffer).unwrap();

    device.write_buffer_pod(buffer, 4, &[0x0102_0304u32]).unwrap();

    let contents = device.backend().buffer_contents(handle).unwrap();
    assert_eq!(&contents[4..], &0x0102_0304u32.to_ne_bytes());
}

#[test]
fn test_destroying_unknown_ids_reports_not_found() {
    let mut device = common::device();
    let buffer = common::vertex_buffer(&mut device);
    device.destroy_buffer(buffer).unwrap();
    let calls_before = device.backend().calls().len();

    assert_eq!(device.destroy_buffer(buffer), Err(ResourceError::NotFound));
    assert_eq!(device.destroy_shader(ShaderId(9)), Err(ResourceError::NotFound));
    assert_eq!(device.backend().calls().len(), calls_before);
}

// --- Samplers and textures ---

#[test]
fn test_sampler_rejects_inverted_lod_range() {
    let mut device = common::device();
    let inverted = SamplerDescriptor {
        min_lod: 4.0,
        max_lod: 1.0,
        ..Default::default()
    };
    assert!(matches!(
        device.create_sampler(&inverted),
        Err(ResourceError::InvalidArgument(_))
    ));

    let sampler = device.create_sampler(&SamplerDescriptor::default()).unwrap();
    device.destroy_sampler(sampler).unwrap();
}

#[test]
fn test_texture_storage_has_at_least_one_level() {
    let mut device = common::device();
    texture(&mut device, TextureKind::D2, PixelFormat::R8Unorm);

    assert!(device.backend().calls().iter().any(|call| matches!(
        call,
        BackendCall::CreateTexture { levels: 1, .. }
    )));
}

#[test]
fn test_texture_writes_validate_before_uploading() {
    // --- 1. ARRANGE ---
    let mut device = common::device();
    let flat = texture(&mut device, TextureKind::D2, PixelFormat::R8G8B8A8Unorm);
    let cube = texture(&mut device, TextureKind::Cube, PixelFormat::R8G8B8A8Unorm);
    let layers = texture(&mut device, TextureKind::Array, PixelFormat::R32Float);
    let texels = vec![0u8; 4 * 4 * 4 * 2];
    device.backend_mut().take_calls();

    // --- 2. ACT & ASSERT ---
    let invalid = |result: Result<(), ResourceError>| {
        matches!(result, Err(ResourceError::InvalidArgument(_)))
    };
    // Wrong kind.
    assert!(invalid(device.write_texture_array(
        flat, 0, 0, 0, 4, 4, 1, PixelFormat::R8G8B8A8Unorm, &texels
    )));
    // Cube face out of range.
    assert!(invalid(device.write_texture_cube(
        cube, 6, 0, 0, 4, 4, PixelFormat::R8G8B8A8Unorm, &texels
    )));
    // Depth data cannot be uploaded.
    assert!(invalid(device.write_texture_2d(
        flat, 0, 0, 4, 4, PixelFormat::D32Float, &texels
    )));
    // Too few bytes for the region.
    assert!(invalid(device.write_texture_2d(
        flat, 0, 0, 4, 4, PixelFormat::R8G8B8A8Unorm, &texels[..10]
    )));
    // Region past the edge.
    assert!(invalid(device.write_texture_2d(
        flat, 2, 2, 4, 4, PixelFormat::R8G8B8A8Unorm, &texels
    )));
    assert!(device.backend().calls().is_empty());

    device
        .write_texture_cube(cube, 5, 0, 0, 4, 4, PixelFormat::R8G8B8A8Unorm, &texels)
        .unwrap();
    device
        .write_texture_array(layers, 0, 0, 0, 4, 4, 2, PixelFormat::R32Float, &texels)
        .unwrap();

    let lengths: Vec<usize> = device
        .backend()
        .calls()
        .iter()
        .filter_map(|call| match call {
            BackendCall::WriteTexture { len, .. } => Some(*len),
            _ => None,
        })
        .collect();
    assert_eq!(lengths, vec![64, 128]);
}

// --- Render targets ---

#[test]
fn test_render_target_completeness() {
    let mut device = common::device();
    let color = texture(&mut device, TextureKind::D2, PixelFormat::R8G8B8A8Unorm);
    let depth = texture(&mut device, TextureKind::D2, PixelFormat::D32Float);

    // No attachments at all.
    let empty = device.create_render_target(&RenderTargetDescriptor::default());
    assert!(matches!(
        empty,
        Err(ResourceError::IncompleteAttachment { .. })
    ));

    // A depth texture in a color slot.
    let misplaced = device.create_render_target(&RenderTargetDescriptor {
        color_attachments: vec![ColorAttachment {
            slot: 0,
            texture: depth,
        }]
        .into(),
        ..Default::default()
    });
    assert!(matches!(
        misplaced,
        Err(ResourceError::IncompleteAttachment { .. })
    ));
    assert_eq!(device.resource_counts().render_targets, 0);

    // One color attachment at slot 0 plus depth.
    let target = device.create_render_target(&RenderTargetDescriptor {
        color_attachments: vec![ColorAttachment {
            slot: 0,
            texture: color,
        }]
        .into(),
        depth_attachment: Some(depth),
        ..Default::default()
    });
    assert!(target.is_ok());
    assert_eq!(device.resource_counts().render_targets, 1);
}

#[test]
fn test_render_target_rejects_bad_color_slots() {
    // --- 1. ARRANGE ---
    let mut device = common::device_with(RecordingBackend::new().with_max_color_attachments(4));
    let first = texture(&mut device, TextureKind::D2, PixelFormat::R8G8B8A8Unorm);
    let second = texture(&mut device, TextureKind::D2, PixelFormat::R8G8B8A8Unorm);
    device.backend_mut().take_calls();

    let with_slots = |slots: [u32; 2]| RenderTargetDescriptor {
        color_attachments: vec![
            ColorAttachment {
                slot: slots[0],
                texture: first,
            },
            ColorAttachment {
                slot: slots[1],
                texture: second,
            },
        ]
        .into(),
        ..Default::default()
    };

    // --- 2. ACT ---
    let duplicate = device.create_render_target(&with_slots([1, 1]));
    let past_limit = device.create_render_target(&with_slots([0, 4]));
    let huge = device.create_render_target(&with_slots([0, u32::MAX]));

    // --- 3. ASSERT ---
    for result in [duplicate, past_limit, huge] {
        assert!(
            matches!(result, Err(ResourceError::InvalidArgument(_))),
            "unexpected {result:?}"
        );
    }
    assert_eq!(device.resource_counts().render_targets, 0);
    assert!(!device
        .backend()
        .calls()
        .iter()
        .any(|call| matches!(call, BackendCall::CreateFramebuffer(_))));

    // The highest slot the device offers is still accepted.
    assert!(device.create_render_target(&with_slots([0, 3])).is_ok());
    assert_eq!(device.resource_counts().render_targets, 1);
}

#[test]
fn test_render_target_with_unknown_texture_is_not_found() {
    let mut device = common::device();
    let color = texture(&mut device, TextureKind::D2, PixelFormat::R8G8B8A8Unorm);
    device.destroy_texture(color).unwrap();

    let result = device.create_render_target(&RenderTargetDescriptor {
        color_attachments: vec![ColorAttachment {
            slot: 0,
            texture: color,
        }]
        .into(),
        ..Default::default()
    });
    assert_eq!(result, Err(ResourceError::NotFound));
}

// --- Device ---

#[test]
fn test_frame_lifecycle_and_vsync() {
    let settings = DeviceSettings {
        vsync: Some(true),
        ..Default::default()
    };
    let mut device = RenderDevice::new(RecordingBackend::new(), DeviceDescriptor::new(settings));
    assert_eq!(device.frame_state(), FrameState::Ready);

    device.prepare();
    assert_eq!(device.frame_state(), FrameState::Prepared);
    device.present();
    assert_eq!(device.frame_state(), FrameState::Presented);
    device.vsync(false);
    device.mode(1280, 720);

    assert_eq!(
        device.backend().calls(),
        &[
            BackendCall::SetSwapInterval(1),
            BackendCall::BeginFrame,
            BackendCall::Present,
            BackendCall::SetSwapInterval(0),
        ]
    );
}

#[test]
fn test_release_all_frees_every_backend_object() {
    let mut device = common::device();
    let _pipeline = common::pipeline(&mut device);
    let _buffer = common::vertex_buffer(&mut device);
    let _texture = texture(&mut device, TextureKind::D2, PixelFormat::R8Unorm);
    let _sampler = device.create_sampler(&SamplerDescriptor::default()).unwrap();
    device.backend_mut().take_calls();

    device.release_all();

    assert_eq!(device.resource_counts(), ResourceCounts::default());
    assert_eq!(device.slot_allocator().occupied_count(), 0);
    assert_eq!(device.backend().live_buffers(), 0);
    let calls = device.backend().calls();
    let count = |pred: fn(&BackendCall) -> bool| calls.iter().filter(|call| pred(call)).count();
    assert_eq!(count(|c| matches!(c, BackendCall::DeleteProgram(_))), 1);
    assert_eq!(count(|c| matches!(c, BackendCall::DeleteVertexArray(_))), 1);
    assert_eq!(count(|c| matches!(c, BackendCall::DeleteShader(_))), 2);
    assert_eq!(count(|c| matches!(c, BackendCall::DeleteBuffer(_))), 1);
    assert_eq!(count(|c| matches!(c, BackendCall::DeleteTexture(_))), 1);
    assert_eq!(count(|c| matches!(c, BackendCall::DeleteSampler(_))), 1);
}
