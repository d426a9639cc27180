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

//! Defines the hierarchy of error types for the rendering subsystem.

use crate::renderer::api::shader::ShaderId;
use std::fmt;

/// An error related to the creation or compilation of a shader.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// The backend compiler rejected the shader.
    CompilationFailed {
        /// A descriptive label for the shader, if available.
        label: String,
        /// The compiler info log.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::CompilationFailed { label, details } => {
                write!(f, "Shader compilation failed for '{label}': {details}")
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to the creation of a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// A shader referenced by the pipeline does not exist.
    InvalidShader {
        /// The unknown shader id.
        id: ShaderId,
        /// The label of the pipeline being created.
        pipeline_label: Option<String>,
    },
    /// The backend failed to link the shader stages into a program.
    LinkFailed {
        /// A descriptive label for the pipeline, if available.
        label: Option<String>,
        /// The linker info log.
        details: String,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::InvalidShader { id, pipeline_label } => {
                write!(
                    f,
                    "Invalid shader {:?} for pipeline '{}'",
                    id,
                    pipeline_label.as_deref().unwrap_or("Unknown")
                )
            }
            PipelineError::LinkFailed { label, details } => {
                write!(
                    f,
                    "Pipeline link failed for '{}': {}",
                    label.as_deref().unwrap_or("Unknown"),
                    details
                )
            }
        }
    }
}

impl std::error::Error for PipelineError {}

/// An error related to the creation or use of a GPU resource.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// A pipeline-specific error occurred.
    Pipeline(PipelineError),
    /// No live resource has the given id.
    NotFound,
    /// The request is malformed or uses a format the operation cannot handle.
    InvalidArgument(String),
    /// The attachments of a render target do not form a complete framebuffer.
    IncompleteAttachment {
        /// The label of the render target, if available.
        label: Option<String>,
    },
    /// A write would reach past the end of a buffer.
    OutOfRange {
        /// Byte offset of the write.
        offset: usize,
        /// Byte length of the write.
        size: usize,
        /// Capacity of the buffer in bytes.
        capacity: usize,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::Pipeline(err) => write!(f, "Pipeline resource error: {err}"),
            ResourceError::NotFound => write!(f, "Resource not found with ID."),
            ResourceError::InvalidArgument(msg) => write!(f, "Invalid argument: {msg}"),
            ResourceError::IncompleteAttachment { label } => write!(
                f,
                "Render target '{}' has an incomplete attachment set",
                label.as_deref().unwrap_or("Unknown")
            ),
            ResourceError::OutOfRange {
                offset,
                size,
                capacity,
            } => write!(
                f,
                "Write of {size} bytes at offset {offset} exceeds buffer capacity of {capacity} bytes"
            ),
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            ResourceError::Pipeline(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

impl From<PipelineError> for ResourceError {
    fn from(err: PipelineError) -> Self {
        ResourceError::Pipeline(err)
    }
}
