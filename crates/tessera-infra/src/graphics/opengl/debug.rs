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

//! Forwards `KHR_debug` driver messages to the application's debug sink.

use gl::types::{GLchar, GLenum, GLsizei, GLuint};
use std::ffi::{c_void, CStr};
use tessera_core::renderer::{DebugLevel, DebugMessage, DebugSink};

/// Keeps the sink alive for as long as the driver may call back into it.
pub(crate) struct DebugHook {
    // Read through the callback's user pointer only.
    _sink: Box<DebugSink>,
}

impl DebugHook {
    /// Registers `sink` as the driver message callback.
    ///
    /// Returns `None` when the context does not expose `KHR_debug`, after
    /// telling the sink so.
    pub(crate) fn install(sink: DebugSink, synchronous: bool) -> Option<Self> {
        if !gl::DebugMessageCallback::is_loaded() {
            sink(&DebugMessage::new(DebugLevel::Warn, "KHR_debug not present"));
            return None;
        }

        let sink = Box::new(sink);
        let user_param = &*sink as *const DebugSink as *const c_void;
        unsafe {
            gl::Enable(gl::DEBUG_OUTPUT);
            if synchronous {
                gl::Enable(gl::DEBUG_OUTPUT_SYNCHRONOUS);
            }
            gl::DebugMessageCallback(Some(message_callback), user_param);
        }
        log::debug!("Driver debug output enabled (synchronous: {synchronous})");
        Some(Self { _sink: sink })
    }
}

impl Drop for DebugHook {
    fn drop(&mut self) {
        unsafe {
            gl::DebugMessageCallback(None, std::ptr::null());
            gl::Disable(gl::DEBUG_OUTPUT);
        }
    }
}

fn level_of(severity: GLenum) -> DebugLevel {
    match severity {
        gl::DEBUG_SEVERITY_HIGH => DebugLevel::Error,
        gl::DEBUG_SEVERITY_MEDIUM => DebugLevel::Warn,
        gl::DEBUG_SEVERITY_LOW => DebugLevel::Info,
        _ => DebugLevel::Debug,
    }
}

extern "system" fn message_callback(
    _source: GLenum,
    _kind: GLenum,
    _id: GLuint,
    severity: GLenum,
    length: GLsizei,
    message: *const GLchar,
    user_param: *mut c_void,
) {
    if message.is_null() || user_param.is_null() {
        return;
    }

    // SAFETY: `user_param` points at the boxed sink owned by a live `DebugHook`;
    // the callback is unregistered before the box is freed.
    let sink = unsafe { &*(user_param as *const DebugSink) };
    // SAFETY: the driver hands out `length` bytes, or a NUL-terminated string
    // when `length` is negative.
    let bytes = unsafe {
        if length < 0 {
            CStr::from_ptr(message).to_bytes()
        } else {
            std::slice::from_raw_parts(message as *const u8, length as usize)
        }
    };
    let text = String::from_utf8_lossy(bytes);
    sink(&DebugMessage::new(level_of(severity), text.trim_end_matches('\0')));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(level_of(gl::DEBUG_SEVERITY_HIGH), DebugLevel::Error);
        assert_eq!(level_of(gl::DEBUG_SEVERITY_MEDIUM), DebugLevel::Warn);
        assert_eq!(level_of(gl::DEBUG_SEVERITY_LOW), DebugLevel::Info);
        assert_eq!(level_of(gl::DEBUG_SEVERITY_NOTIFICATION), DebugLevel::Debug);
    }
}
