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

//! # Tessera Infra
//!
//! OpenGL implementations of the [`RenderBackend`](tessera_core::RenderBackend)
//! trait, plus process-wide logging setup.
//!
//! Two backends are provided, each behind a cargo feature of the same name:
//!
//! * [`graphics::gl33`]: OpenGL 3.3 core with `ARB_vertex_attrib_binding`,
//!   editing objects by binding them.
//! * [`graphics::gl46`]: OpenGL 4.6 core with direct state access, indirect
//!   draws and SPIR-V shaders.
//!
//! Both are created from a [`graphics::opengl::GlContext`], the small set of
//! callbacks the windowing layer provides.

pub mod graphics;
pub mod logging;

pub use graphics::opengl::GlContext;
pub use logging::{init_logging, LoggingConfig};
