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

//! The rendering contracts and the device that drives them.
//!
//! [`api`] holds the value types an application works with: descriptors,
//! typed ids, flags and the [`CommandList`]. [`traits`] holds the
//! [`RenderBackend`] seam that a concrete graphics API implements (the OpenGL
//! backends live in `tessera-infra`). [`device`] ties both together: the
//! [`RenderDevice`] registers every resource, keeps vertex buffers wired into
//! every pipeline, and replays command lists in order.

pub mod api;
pub mod debug;
pub mod device;
pub mod error;
pub mod recording;
pub mod traits;

pub use self::api::*;
pub use self::debug::{log_sink, DebugLevel, DebugMessage, DebugSink};
pub use self::device::slots::{VertexSlot, VertexSlotAllocator};
pub use self::device::{FrameState, RenderDevice, ResourceCounts};
pub use self::error::{PipelineError, ResourceError, ShaderError};
pub use self::recording::{BackendCall, RecordingBackend};
pub use self::traits::RenderBackend;
