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

//! Device capabilities and device-level configuration.

use crate::renderer::api::shader::ShaderFormat;
use crate::renderer::debug::DebugSink;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The family of graphics API behind a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImplFamily {
    /// OpenGL (core profile).
    OpenGl,
    /// A backend that only records calls, used for testing.
    Recording,
}

/// What a backend needs from the windowing layer before a device can be created.
///
/// Windowing code polls this to know which kind of context to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplInfo {
    /// The API family.
    pub family: ImplFamily,
    /// Whether a core-profile context is required.
    pub core_profile: bool,
    /// Required major version.
    pub version_major: u32,
    /// Required minor version.
    pub version_minor: u32,
}

/// Read-only capabilities of a created device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// The API family.
    pub impl_family: ImplFamily,
    /// Major version of the implementation.
    pub impl_version_major: u32,
    /// Minor version of the implementation.
    pub impl_version_minor: u32,
    /// Samplers honour [`SamplerFlags::FILTER_ANISO`](crate::renderer::SamplerFlags::FILTER_ANISO).
    pub supports_anisotropic: bool,
    /// Storage buffers can be bound.
    pub supports_storage_buffers: bool,
    /// Indexed by `ShaderFormat as usize`.
    pub supports_shader_format: [bool; ShaderFormat::COUNT],
}

impl DeviceInfo {
    /// Whether shaders in `format` can be created on this device.
    pub fn supports(&self, format: ShaderFormat) -> bool {
        self.supports_shader_format[format as usize]
    }
}

/// Serializable device configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// A debug label for logs.
    pub label: Option<String>,
    /// Initial swap interval; `None` leaves the context's setting untouched.
    pub vsync: Option<bool>,
    /// Hook driver debug output into the debug sink when one is installed.
    pub debug_output: bool,
    /// Deliver driver debug output synchronously, on the calling thread.
    pub synchronous_debug_output: bool,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            label: None,
            vsync: None,
            debug_output: true,
            synchronous_debug_output: true,
        }
    }
}

/// Everything needed to create a [`RenderDevice`](crate::renderer::RenderDevice).
#[derive(Clone, Default)]
pub struct DeviceDescriptor {
    /// Plain configuration.
    pub settings: DeviceSettings,
    /// Receives compiler/linker logs and driver messages.
    pub debug_sink: Option<DebugSink>,
}

impl DeviceDescriptor {
    /// A descriptor with the given settings and no debug sink.
    pub fn new(settings: DeviceSettings) -> Self {
        Self {
            settings,
            debug_sink: None,
        }
    }

    /// Installs a debug sink.
    pub fn with_debug_sink(mut self, sink: DebugSink) -> Self {
        self.debug_sink = Some(sink);
        self
    }
}

impl fmt::Debug for DeviceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceDescriptor")
            .field("settings", &self.settings)
            .field("debug_sink", &self.debug_sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_parse_with_defaults() {
        let settings: DeviceSettings =
            serde_json::from_str(r#"{ "label": "main", "vsync": true }"#).unwrap();
        assert_eq!(settings.label.as_deref(), Some("main"));
        assert_eq!(settings.vsync, Some(true));
        assert!(settings.debug_output);
        assert!(settings.synchronous_debug_output);
    }

    #[test]
    fn test_shader_format_bitmap() {
        let info = DeviceInfo {
            impl_family: ImplFamily::OpenGl,
            impl_version_major: 3,
            impl_version_minor: 3,
            supports_anisotropic: false,
            supports_storage_buffers: false,
            supports_shader_format: [false, true],
        };
        assert!(info.supports(ShaderFormat::Glsl));
        assert!(!info.supports(ShaderFormat::SpirV));
    }
}
