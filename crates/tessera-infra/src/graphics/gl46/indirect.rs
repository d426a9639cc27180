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

//! Layouts of the records read by `glDraw*Indirect`.

use bytemuck::{Pod, Zeroable};
use tessera_core::renderer::{DrawArgs, DrawIndexedArgs};

/// One `glDrawArraysIndirect` record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct DrawArraysIndirectCommand {
    /// Vertices per instance.
    pub count: u32,
    /// Instances to draw.
    pub instance_count: u32,
    /// First vertex.
    pub first: u32,
    /// First instance.
    pub base_instance: u32,
}

impl From<&DrawArgs> for DrawArraysIndirectCommand {
    fn from(args: &DrawArgs) -> Self {
        Self {
            count: args.vertices,
            instance_count: args.instances,
            first: args.base_vertex,
            base_instance: args.base_instance,
        }
    }
}

/// One `glDrawElementsIndirect` record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct DrawElementsIndirectCommand {
    /// Indices per instance.
    pub count: u32,
    /// Instances to draw.
    pub instance_count: u32,
    /// First index, in elements.
    pub first_index: u32,
    /// Value added to every index.
    pub base_vertex: i32,
    /// First instance.
    pub base_instance: u32,
}

impl From<&DrawIndexedArgs> for DrawElementsIndirectCommand {
    fn from(args: &DrawIndexedArgs) -> Self {
        Self {
            count: args.indices,
            instance_count: args.instances,
            first_index: args.base_index,
            base_vertex: args.base_vertex,
            base_instance: args.base_instance,
        }
    }
}

/// Size of the indirect buffer: room for the larger record.
pub(crate) const INDIRECT_BUFFER_SIZE: usize = std::mem::size_of::<DrawElementsIndirectCommand>();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_layouts_match_gl() {
        assert_eq!(std::mem::size_of::<DrawArraysIndirectCommand>(), 16);
        assert_eq!(std::mem::size_of::<DrawElementsIndirectCommand>(), 20);
        assert_eq!(INDIRECT_BUFFER_SIZE, 20);
    }

    #[test]
    fn test_indexed_record_from_args() {
        let args = DrawIndexedArgs {
            indices: 6,
            instances: 2,
            base_index: 3,
            base_vertex: -4,
            base_instance: 1,
        };
        let record = DrawElementsIndirectCommand::from(&args);
        assert_eq!(record.first_index, 3);
        assert_eq!(record.base_vertex, -4);
        assert_eq!(
            bytemuck::bytes_of(&record),
            bytemuck::cast_slice::<u32, u8>(&[6, 2, 3, (-4i32) as u32, 1])
        );
    }
}
