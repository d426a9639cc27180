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

//! OpenGL 3.3 core backend.
//!
//! Objects are edited by binding them, so every edit restores the binding it
//! disturbed. Vertex formats go through `GL_ARB_vertex_attrib_binding`, which
//! the context must expose.

mod backend;

pub use self::backend::{create_device, poll_impl_info, Gl33Backend};
