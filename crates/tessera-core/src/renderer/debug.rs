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

//! The debug-message sink shared by the device and its backend.
//!
//! Compiler and linker logs produced during resource creation, as well as
//! messages raised by the driver itself, are handed to a single application
//! supplied callback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Severity of a [`DebugMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DebugLevel {
    /// Very verbose tracing output.
    Trace,
    /// Driver notifications.
    Debug,
    /// Informational output, including compiler and linker logs.
    Info,
    /// Something likely wrong but recoverable.
    Warn,
    /// An error reported by the driver.
    Error,
}

impl From<DebugLevel> for log::Level {
    fn from(level: DebugLevel) -> Self {
        match level {
            DebugLevel::Trace => log::Level::Trace,
            DebugLevel::Debug => log::Level::Debug,
            DebugLevel::Info => log::Level::Info,
            DebugLevel::Warn => log::Level::Warn,
            DebugLevel::Error => log::Level::Error,
        }
    }
}

/// A single message delivered to the debug sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugMessage<'a> {
    /// Severity of the message.
    pub level: DebugLevel,
    /// The message text, without a trailing newline guarantee.
    pub text: &'a str,
}

impl<'a> DebugMessage<'a> {
    /// Creates a message.
    pub fn new(level: DebugLevel, text: &'a str) -> Self {
        Self { level, text }
    }
}

impl fmt::Display for DebugMessage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.text)
    }
}

/// Application callback receiving [`DebugMessage`]s.
pub type DebugSink = Arc<dyn Fn(&DebugMessage<'_>) + Send + Sync>;

/// A sink that forwards every message to the `log` facade at the matching level.
pub fn log_sink() -> DebugSink {
    Arc::new(|message: &DebugMessage<'_>| {
        log::log!(
            target: "tessera::debug",
            log::Level::from(message.level),
            "{}",
            message.text.trim_end()
        );
    })
}

/// Delivers `text` to `sink` when one is installed.
pub(crate) fn emit(sink: Option<&DebugSink>, level: DebugLevel, text: &str) {
    if let Some(sink) = sink {
        sink(&DebugMessage::new(level, text));
    }
}
