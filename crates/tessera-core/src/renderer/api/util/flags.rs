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

//! Flag sets for clears, blits, samplers and face culling.

use crate::tessera_bitflags;

tessera_bitflags! {
    /// Selects which buffers of a render target an operation touches.
    ///
    /// Used by [`CommandList::clear`](crate::renderer::CommandList::clear) and
    /// [`CommandList::copy_render_target`](crate::renderer::CommandList::copy_render_target).
    pub struct RenderTargetMask: u16 {
        /// The color attachments.
        const COLOR = 1 << 0;
        /// The depth attachment.
        const DEPTH = 1 << 1;
        /// The stencil attachment.
        const STENCIL = 1 << 2;
    }
}

tessera_bitflags! {
    /// Wrapping and filtering behaviour of a sampler.
    ///
    /// Coordinates repeat unless the matching `CLAMP_*` flag is raised, and
    /// filtering is nearest-neighbour unless `FILTER` is raised.
    pub struct SamplerFlags: u16 {
        /// Clamp the S coordinate to the edge.
        const CLAMP_S = 1 << 0;
        /// Clamp the T coordinate to the edge.
        const CLAMP_T = 1 << 1;
        /// Clamp the R coordinate to the edge.
        const CLAMP_R = 1 << 2;
        /// Linear filtering.
        const FILTER = 1 << 3;
        /// Anisotropic filtering; only honoured together with `FILTER`.
        const FILTER_ANISO = 1 << 4;
    }
}

tessera_bitflags! {
    /// Winding and culled faces of a pipeline's face-culling state.
    pub struct CullFlags: u16 {
        /// Front faces wind clockwise instead of counter-clockwise.
        const CLOCKWISE = 1 << 0;
        /// Cull front faces.
        const FRONT = 1 << 1;
        /// Cull back faces.
        const BACK = 1 << 2;
    }
}

impl SamplerFlags {
    /// Every clamp flag.
    pub const CLAMP_ALL: Self = Self::from_bits_truncate(
        Self::CLAMP_S.bits() | Self::CLAMP_T.bits() | Self::CLAMP_R.bits(),
    );
}
