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

//! The public, backend-agnostic value types of the rendering API.
//!
//! Everything here is plain data: descriptors used to create resources,
//! the typed ids handed back by the [`RenderDevice`](crate::renderer::RenderDevice),
//! flag sets, enumerations and the [`CommandList`](command::CommandList).

pub mod buffer;
pub mod command;
pub mod common;
pub mod info;
pub mod pipeline;
pub mod render_target;
pub mod shader;
pub mod texture;
pub mod util;

pub use self::buffer::*;
pub use self::command::*;
pub use self::common::*;
pub use self::info::*;
pub use self::pipeline::*;
pub use self::render_target::*;
pub use self::shader::*;
pub use self::texture::*;
pub use self::util::*;
