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

use tessera_core::renderer::traits::{BufferBindingTarget, Capability};
use tessera_core::renderer::{
    BackendCall, BlendState, BlitRegion, BufferDescriptor, BufferKind, ColorAttachment,
    DepthFunc, DepthState, DeviceInfo, FillMode, IndexType, PipelineDescriptor, PipelineId,
    RecordingBackend, RecordingState, Rect, RenderBackend, RenderTargetDescriptor,
    RenderTargetId, RenderTargetMask, SamplerDescriptor, TextureDescriptor, TextureKind,
};

fn is_replay_state(call: &BackendCall) -> bool {
    matches!(
        call,
        BackendCall::SetViewport(_) | BackendCall::SetScissor(_) | BackendCall::DrawArrays { .. }
    )
}

fn render_target(device: &mut common::TestDevice) -> RenderTargetId {
    let color = device
        .create_texture(&TextureDescriptor {
            width: 8,
            height: 8,
            ..Default::default()
        })
        .unwrap();
    device
        .create_render_target(&RenderTargetDescriptor {
            color_attachments: vec![ColorAttachment {
                slot: 0,
                texture: color,
            }]
            .into(),
            ..Default::default()
        })
        .unwrap()
}

/// Backend handle of the most recently created buffer, sampler or texture.
fn created_handle(device: &common::TestDevice) -> u32 {
    device
        .backend()
        .calls()
        .iter()
        .rev()
        .find_map(|call| match call {
            BackendCall::CreateBuffer { handle, .. }
            | BackendCall::CreateTexture { handle, .. }
            | BackendCall::CreateSampler(handle) => Some(*handle),
            _ => None,
        })
        .expect("a resource should have been created")
}

#[test]
fn test_draws_replay_in_order_with_latest_state() {
    // --- 1. ARRANGE ---
    let mut device = common::device();
    let pipeline = common::pipeline(&mut device);
    let buffer = common::vertex_buffer(&mut device);
    let mut list = device.create_command_list();

    device.start_recording(&mut list);
    list.bind_pipeline(pipeline);
    list.bind_vertex_buffer(buffer);
    list.set_viewport(0, 0, 640, 480);
    list.draw(3, 1, 0, 0);
    list.set_scissor(10, 10, 20, 20);
    list.set_viewport(0, 0, 320, 240);
    list.draw(3, 2, 0, 0);
    list.draw(3, 3, 0, 0);
    device.backend_mut().take_calls();

    // --- 2. ACT ---
    device.submit(&mut list);

    // --- 3. ASSERT ---
    let mut viewport = None;
    let mut scissor = None;
    let mut observed = Vec::new();
    for call in device.backend().calls().iter().filter(|call| is_replay_state(call)) {
        match call {
            BackendCall::SetViewport(rect) => viewport = Some(*rect),
            BackendCall::SetScissor(rect) => scissor = Some(*rect),
            BackendCall::DrawArrays { args, .. } => observed.push((args.instances, viewport, scissor)),
            _ => unreachable!(),
        }
    }
    assert_eq!(
        observed,
        vec![
            (1, Some(Rect::new(0, 0, 640, 480)), None),
            (2, Some(Rect::new(0, 0, 320, 240)), Some(Rect::new(10, 10, 20, 20))),
            (3, Some(Rect::new(0, 0, 320, 240)), Some(Rect::new(10, 10, 20, 20))),
        ]
    );
    assert_eq!(list.state(), RecordingState::Idle);
}

#[test]
fn test_pipeline_bind_resets_state_before_enabling() {
    let mut device = common::device();
    let blended = common::pipeline_with(
        &mut device,
        PipelineDescriptor {
            blending: BlendState::ALPHA,
            depth_testing: DepthState {
                enabled: true,
                func: DepthFunc::LessOrEqual,
            },
            fill_mode: FillMode::Wireframe,
            ..Default::default()
        },
    );
    let plain = common::pipeline(&mut device);
    let blended_program = program_of(&device, blended);
    let plain_program = program_of(&device, plain);

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_pipeline(blended);
    list.bind_pipeline(plain);
    device.backend_mut().take_calls();

    device.submit(&mut list);

    let disable_all: Vec<BackendCall> = Capability::ALL
        .iter()
        .map(|capability| BackendCall::SetCapability(*capability, false))
        .collect();

    let mut expected = disable_all.clone();
    expected.extend([
        BackendCall::SetCapability(Capability::Blend, true),
        BackendCall::SetBlend(
            BlendState::ALPHA.equation,
            BlendState::ALPHA.src_factor,
            BlendState::ALPHA.dst_factor,
        ),
        BackendCall::SetCapability(Capability::DepthTest, true),
        BackendCall::SetDepthFunc(DepthFunc::LessOrEqual),
        BackendCall::SetFillMode(FillMode::Wireframe),
        BackendCall::UseProgram(Some(blended_program)),
    ]);
    expected.extend(disable_all);
    expected.extend([
        BackendCall::SetFillMode(FillMode::Filled),
        BackendCall::UseProgram(Some(plain_program)),
    ]);
    assert_eq!(device.backend().calls(), expected.as_slice());
}

/// The program handle linked for `pipeline`, read from the call log.
fn program_of(device: &common::TestDevice, pipeline: PipelineId) -> u32 {
    device
        .backend()
        .calls()
        .iter()
        .filter_map(|call| match call {
            BackendCall::LinkProgram { handle, .. } => *handle,
            _ => None,
        })
        .nth(pipeline.0)
        .expect("one link per pipeline")
}

#[test]
fn test_stale_pipeline_applies_null_state_and_skips_draws() {
    let mut device = common::device();
    let pipeline = common::pipeline(&mut device);
    device.destroy_pipeline(pipeline).unwrap();

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_pipeline(pipeline);
    list.draw(3, 1, 0, 0);
    device.backend_mut().take_calls();
    device.submit(&mut list);

    let calls = device.backend().calls();
    assert_eq!(calls.len(), Capability::ALL.len() + 1);
    assert_eq!(calls.last(), Some(&BackendCall::UseProgram(None)));
    assert!(!calls.iter().any(BackendCall::is_draw));
}

#[test]
fn test_vertex_buffer_rebinds_only_on_change() {
    // --- 1. ARRANGE ---
    let mut device = common::device();
    let pipeline = common::pipeline(&mut device);
    let first = common::vertex_buffer(&mut device);
    let second = common::vertex_buffer(&mut device);

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_pipeline(pipeline);
    list.bind_vertex_buffer(first);
    list.bind_vertex_buffer(first);
    list.draw(3, 1, 0, 0);
    list.bind_vertex_buffer(second);
    list.draw(3, 1, 0, 0);
    device.backend_mut().take_calls();

    // --- 2. ACT ---
    device.submit(&mut list);

    // --- 3. ASSERT ---
    let calls = device.backend_mut().take_calls();
    let vertex_array_binds = calls
        .iter()
        .filter(|call| matches!(call, BackendCall::BindVertexArray(_)))
        .count();
    assert_eq!(vertex_array_binds, 1, "both buffers live in group 0");
    let rewires: Vec<u32> = calls
        .iter()
        .filter_map(|call| match call {
            BackendCall::SetAttribBinding { binding, .. } => Some(*binding),
            _ => None,
        })
        .collect();
    assert_eq!(rewires, vec![0, 1]);

    // The group keeps its wiring across submissions; only the array is rebound.
    let mut again = device.create_command_list();
    device.start_recording(&mut again);
    again.bind_pipeline(pipeline);
    again.bind_vertex_buffer(second);
    again.draw(3, 1, 0, 0);
    device.submit(&mut again);

    let calls = device.backend().calls();
    assert!(calls
        .iter()
        .any(|call| matches!(call, BackendCall::BindVertexArray(_))));
    assert!(!calls
        .iter()
        .any(|call| matches!(call, BackendCall::SetAttribBinding { .. })));
}

#[test]
fn test_indexed_draw_uses_index_size_for_byte_offset() {
    let mut device = common::device();
    let pipeline = common::pipeline_with(
        &mut device,
        PipelineDescriptor {
            index_type: IndexType::U32,
            ..Default::default()
        },
    );
    let vertices = common::vertex_buffer(&mut device);
    let indices: [u32; 6] = [0, 1, 2, 2, 1, 0];
    let index_buffer = device
        .create_buffer(&BufferDescriptor::with_contents(BufferKind::Index, &indices))
        .unwrap();
    let index_handle = device.raw_buffer(index_buffer).unwrap();

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_pipeline(pipeline);
    list.bind_index_buffer(index_buffer);
    list.bind_vertex_buffer(vertices);
    list.draw_indexed(3, 1, 3, 0, 0);
    device.backend_mut().take_calls();
    device.submit(&mut list);

    let calls = device.backend().calls();
    assert!(calls.iter().any(|call| matches!(
        call,
        BackendCall::SetElementBuffer { buffer: Some(handle), .. } if *handle == index_handle
    )));
    let offsets: Vec<usize> = calls
        .iter()
        .filter_map(|call| match call {
            BackendCall::DrawElements {
                index_type,
                byte_offset,
                ..
            } => {
                assert_eq!(*index_type, IndexType::U32);
                Some(*byte_offset)
            }
            _ => None,
        })
        .collect();
    assert_eq!(offsets, vec![12]);
}

#[test]
fn test_indexed_draw_without_index_buffer_is_skipped() {
    let mut device = common::device();
    let pipeline = common::pipeline(&mut device);
    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_pipeline(pipeline);
    list.draw_indexed(3, 1, 0, 0, 0);
    device.backend_mut().take_calls();
    device.submit(&mut list);

    assert!(!device.backend().calls().iter().any(BackendCall::is_draw));
}

#[test]
fn test_recorded_write_is_copied_and_applied_at_submit() {
    // --- 1. ARRANGE ---
    let mut device = common::device();
    let buffer = device
        .create_buffer(&BufferDescriptor::new(BufferKind::Data, 8))
        .unwrap();
    let handle = device.raw_buffer(buffer).unwrap();
    let mut payload = vec![1u8, 2, 3, 4];

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.write_buffer(buffer, 2, &payload);
    list.write_buffer(buffer, 6, &[9, 9, 9]);
    payload.fill(0);

    // Nothing reaches the backend before submission.
    assert_eq!(device.backend().buffer_contents(handle), Some(&[0u8; 8][..]));

    // --- 2. ACT ---
    device.submit(&mut list);

    // --- 3. ASSERT ---
    // The second write runs past the end and is skipped entirely.
    assert_eq!(
        device.backend().buffer_contents(handle),
        Some(&[0u8, 0, 1, 2, 3, 4, 0, 0][..])
    );
}

#[test]
fn test_copy_render_target_restores_previous_binding() {
    let mut device = common::device();
    let source = render_target(&mut device);
    let destination = render_target(&mut device);

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_render_target(Some(source));
    list.copy_render_target(
        Some(source),
        Some(destination),
        BlitRegion::from_size(8, 8),
        BlitRegion::from_size(8, 8),
        RenderTargetMask::COLOR,
        false,
    );
    device.backend_mut().take_calls();
    device.submit(&mut list);

    let calls = device.backend().calls();
    let BackendCall::BindFramebuffer(Some(bound)) = calls[0] else {
        panic!("expected the source render target to be bound first, got {calls:?}");
    };
    assert!(matches!(calls[1], BackendCall::BlitFramebuffer(_)));
    assert_eq!(calls[2], BackendCall::BindFramebuffer(Some(bound)));
    assert_eq!(calls.len(), 3);
}

#[test]
fn test_stale_ids_are_skipped_and_replay_continues() {
    let mut device = common::device();
    let target = render_target(&mut device);
    let buffer = device
        .create_buffer(&BufferDescriptor::new(BufferKind::Data, 16))
        .unwrap();
    device.destroy_render_target(target).unwrap();
    device.destroy_buffer(buffer).unwrap();

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_render_target(Some(target));
    list.bind_uniform_buffer(buffer, 0);
    list.write_buffer(buffer, 0, &[1, 2, 3]);
    list.clear(RenderTargetMask::COLOR | RenderTargetMask::DEPTH);
    device.backend_mut().take_calls();
    device.submit(&mut list);

    assert_eq!(
        device.backend().calls(),
        &[BackendCall::Clear(
            RenderTargetMask::COLOR | RenderTargetMask::DEPTH
        )]
    );
}

#[test]
fn test_idle_records_are_dropped_and_resubmit_replays() {
    let mut device = common::device();
    let mut list = device.create_command_list();

    list.set_clear_depth(1.0);
    assert!(list.is_empty(), "records outside recording are dropped");

    device.start_recording(&mut list);
    list.set_clear_color3(0.1, 0.2, 0.3);
    list.clear(RenderTargetMask::COLOR);
    device.backend_mut().take_calls();

    device.submit(&mut list);
    device.submit(&mut list);

    let clears = device
        .backend()
        .calls()
        .iter()
        .filter(|call| matches!(call, BackendCall::Clear(_)))
        .count();
    assert_eq!(clears, 2);
    assert_eq!(
        device.backend().calls()[0],
        BackendCall::SetClearColor([0.1, 0.2, 0.3, 1.0])
    );

    // Starting again discards what was recorded.
    device.start_recording(&mut list);
    assert!(list.is_empty());
}

#[test]
fn test_buffer_binds_reach_their_binding_points() {
    // --- 1. ARRANGE ---
    let mut device = common::device();
    let storage = device
        .create_buffer(&BufferDescriptor::new(BufferKind::Data, 64))
        .unwrap();
    let storage_handle = created_handle(&device);
    let uniform = device
        .create_buffer(&BufferDescriptor::new(BufferKind::Data, 16))
        .unwrap();
    let uniform_handle = created_handle(&device);

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_storage_buffer(storage, 3);
    list.bind_uniform_buffer(uniform, 1);
    device.backend_mut().take_calls();

    // --- 2. ACT ---
    device.submit(&mut list);

    // --- 3. ASSERT ---
    assert_eq!(
        device.backend().calls(),
        &[
            BackendCall::BindBufferBase {
                target: BufferBindingTarget::Storage,
                index: 3,
                buffer: storage_handle,
            },
            BackendCall::BindBufferBase {
                target: BufferBindingTarget::Uniform,
                index: 1,
                buffer: uniform_handle,
            },
        ]
    );
}

#[test]
fn test_storage_bind_without_support_is_skipped() {
    // --- 1. ARRANGE ---
    let info = DeviceInfo {
        supports_storage_buffers: false,
        ..RecordingBackend::new().device_info()
    };
    let mut device = common::device_with(RecordingBackend::new().with_info(info));
    let storage = device
        .create_buffer(&BufferDescriptor::new(BufferKind::Data, 64))
        .unwrap();
    let uniform = device
        .create_buffer(&BufferDescriptor::new(BufferKind::Data, 16))
        .unwrap();
    let uniform_handle = created_handle(&device);

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_storage_buffer(storage, 0);
    list.bind_uniform_buffer(uniform, 0);
    device.backend_mut().take_calls();

    // --- 2. ACT ---
    device.submit(&mut list);

    // --- 3. ASSERT ---
    // Replay carries on past the skipped storage bind.
    assert_eq!(
        device.backend().calls(),
        &[BackendCall::BindBufferBase {
            target: BufferBindingTarget::Uniform,
            index: 0,
            buffer: uniform_handle,
        }]
    );
}

#[test]
fn test_sampler_and_texture_bind_to_their_units() {
    let mut device = common::device();
    let sampler = device.create_sampler(&SamplerDescriptor::default()).unwrap();
    let sampler_handle = created_handle(&device);
    let texture = device
        .create_texture(&TextureDescriptor {
            kind: TextureKind::Cube,
            width: 4,
            height: 4,
            ..Default::default()
        })
        .unwrap();
    let texture_handle = created_handle(&device);

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_sampler(sampler, 2);
    list.bind_texture(texture, 2);
    device.backend_mut().take_calls();
    device.submit(&mut list);

    assert_eq!(
        device.backend().calls(),
        &[
            BackendCall::BindSampler {
                unit: 2,
                sampler: sampler_handle,
            },
            BackendCall::BindTexture {
                unit: 2,
                kind: TextureKind::Cube,
                texture: texture_handle,
            },
        ]
    );
}

#[test]
fn test_vertex_buffers_in_different_groups_switch_vertex_arrays() {
    // --- 1. ARRANGE ---
    // One binding per vertex array puts every vertex buffer in its own group.
    let mut device = common::device_with(RecordingBackend::new().with_max_vertex_bindings(1));
    let pipeline = common::pipeline(&mut device);
    let first = common::vertex_buffer(&mut device);
    let first_handle = created_handle(&device);
    let second = common::vertex_buffer(&mut device);
    let second_handle = created_handle(&device);

    let [(first_array, 0)] = common::attachments_of(&device, first_handle)[..] else {
        panic!("the first buffer should sit at binding 0 of a single vertex array");
    };
    let [(second_array, 0)] = common::attachments_of(&device, second_handle)[..] else {
        panic!("the second buffer should sit at binding 0 of a single vertex array");
    };
    assert_ne!(first_array, second_array);

    let mut list = device.create_command_list();
    device.start_recording(&mut list);
    list.bind_pipeline(pipeline);
    list.bind_vertex_buffer(first);
    list.draw(3, 1, 0, 0);
    list.bind_vertex_buffer(second);
    list.draw(3, 1, 0, 0);
    device.backend_mut().take_calls();

    // --- 2. ACT ---
    device.submit(&mut list);

    // --- 3. ASSERT ---
    let vertex_state: Vec<BackendCall> = device
        .backend()
        .calls()
        .iter()
        .filter(|call| {
            matches!(
                call,
                BackendCall::BindVertexArray(_) | BackendCall::SetAttribBinding { .. }
            )
        })
        .cloned()
        .collect();
    assert_eq!(
        vertex_state,
        vec![
            BackendCall::BindVertexArray(first_array),
            BackendCall::SetAttribBinding {
                vertex_array: first_array,
                attrib: 0,
                binding: 0,
            },
            BackendCall::BindVertexArray(second_array),
            BackendCall::SetAttribBinding {
                vertex_array: second_array,
                attrib: 0,
                binding: 0,
            },
        ]
    );
    let draws = device
        .backend()
        .calls()
        .iter()
        .filter(|call| call.is_draw())
        .count();
    assert_eq!(draws, 2);
}
