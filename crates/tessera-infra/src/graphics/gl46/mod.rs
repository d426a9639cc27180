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

//! OpenGL 4.6 core backend.
//!
//! Every object is edited through direct state access, so creating resources
//! never disturbs the bindings used by replay. Draws go through a small
//! indirect buffer that stays bound to `GL_DRAW_INDIRECT_BUFFER`.

mod backend;
mod indirect;

pub use self::backend::{create_device, poll_impl_info, Gl46Backend};
pub use self::indirect::{DrawArraysIndirectCommand, DrawElementsIndirectCommand};
