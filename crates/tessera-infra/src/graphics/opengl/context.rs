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

use std::ffi::c_void;

/// Callbacks through which a backend talks to the windowing layer.
///
/// The implementing type owns whatever window or context state it needs.
/// A backend keeps its context for its whole lifetime and only calls it from
/// the thread that created the device.
pub trait GlContext {
    /// Address of an OpenGL entry point, or null when unavailable.
    fn get_proc_address(&self, symbol: &str) -> *const c_void;

    /// Makes the OpenGL context current on the calling thread.
    fn make_current(&self);

    /// Sets the swap interval (0 disables vertical sync).
    fn set_swap_interval(&self, interval: i32);

    /// Presents the back buffer.
    fn swap_buffers(&self);
}
