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

//! Pieces shared by the OpenGL backends.
//!
//! Every function here issues raw GL calls and assumes the backend's context
//! is current on the calling thread, which backend creation establishes.

mod context;
pub mod conversions;
pub(crate) mod debug;
pub(crate) mod ext;
pub(crate) mod loader;
pub(crate) mod program;
pub(crate) mod state;

pub use self::context::GlContext;
pub use self::conversions::IntoGl;
